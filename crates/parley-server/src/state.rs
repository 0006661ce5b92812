use parley::conversation::Conversation;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub conversation: Arc<Conversation>,
}

impl AppState {
    pub fn new(conversation: Conversation) -> Self {
        Self {
            conversation: Arc::new(conversation),
        }
    }
}
