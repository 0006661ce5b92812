pub mod conversation;
pub mod health;

#[cfg(test)]
pub(crate) mod testing;

use axum::Router;
use tower_http::cors::CorsLayer;

use crate::state::AppState;

pub fn configure(state: AppState) -> Router {
    Router::new()
        .merge(conversation::routes(state))
        .merge(health::routes())
        .layer(CorsLayer::permissive())
}
