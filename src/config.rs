/*
 * Responsibility
 * - 環境変数の読み込み (PORT, APP_ENV, CORS 許可, gateway header の信頼設定など)
 * - 設定値のバリデーション (不正なら起動失敗)
 *
 * Notes
 * - .env の読み込み (dotenvy) は app::run 側で行う
 */
use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        match std::env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,

    /// gateway が付与する x-user-* header を "current user" として信頼するか
    pub trust_gateway_headers: bool,

    pub request_timeout: Duration,
    pub body_limit_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let port: u16 = parse_var("PORT")?.unwrap_or(3000);
        let addr = SocketAddr::from(([0, 0, 0, 0], port));

        let app_env = AppEnv::from_env();

        let cors_allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        // production では明示的に有効化しない限り信頼しない
        let trust_gateway_headers = match std::env::var("TRUST_GATEWAY_HEADERS") {
            Ok(v) => parse_bool(&v).ok_or(ConfigError::Invalid("TRUST_GATEWAY_HEADERS"))?,
            Err(_) => !app_env.is_production(),
        };

        let request_timeout =
            Duration::from_secs(parse_var("REQUEST_TIMEOUT_SECONDS")?.unwrap_or(30));
        if request_timeout.is_zero() {
            return Err(ConfigError::Invalid("REQUEST_TIMEOUT_SECONDS"));
        }

        let body_limit_bytes = parse_var("BODY_LIMIT_BYTES")?.unwrap_or(1024 * 1024);

        Ok(Self {
            addr,
            app_env,
            cors_allowed_origins,
            trust_gateway_headers,
            request_timeout,
            body_limit_bytes,
        })
    }
}

fn parse_var<T: std::str::FromStr>(key: &'static str) -> Result<Option<T>, ConfigError> {
    match std::env::var(key) {
        Ok(v) => v
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::Invalid(key)),
        Err(_) => Ok(None),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
