pub const ANTHROPIC_HOST: &str = "https://api.anthropic.com";
pub const ANTHROPIC_MODEL: &str = "claude-3-5-sonnet-20241022";
pub const DEFAULT_MAX_TOKENS: i32 = 1024;

#[derive(Debug, Clone)]
pub struct AnthropicProviderConfig {
    pub host: String,
    pub api_key: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<i32>,
}

impl AnthropicProviderConfig {
    pub fn new<S: Into<String>>(api_key: S) -> Self {
        Self {
            host: ANTHROPIC_HOST.to_string(),
            api_key: api_key.into(),
            temperature: None,
            max_tokens: None,
        }
    }
}
