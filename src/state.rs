/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 * - Clone 前提で持つ (内部は Copy/Clone cheap)
 */
use crate::config::Config;

#[derive(Clone, Debug, Default)]
pub struct AppState {
    pub trust_gateway_headers: bool,
}

impl AppState {
    pub fn new(trust_gateway_headers: bool) -> Self {
        Self {
            trust_gateway_headers,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.trust_gateway_headers)
    }
}
