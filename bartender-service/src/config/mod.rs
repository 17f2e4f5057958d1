use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

/// Sliding session expiry window: 24 hours.
pub const DEFAULT_SESSION_TTL_SECONDS: i64 = 24 * 60 * 60;

#[derive(Debug, Clone)]
pub struct BartenderConfig {
    pub common: core_config::Config,
    pub redis: RedisConfig,
    pub llm: LlmConfig,
    pub image: ImageConfig,
    pub session: SessionConfig,
    pub otlp_endpoint: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: String,
    pub base_url: String,
    pub chat_model: String,
}

#[derive(Debug, Clone)]
pub struct ImageConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub image_size: String,
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub ttl_seconds: i64,
}

impl BartenderConfig {
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;
        let is_prod = common.is_prod();

        Ok(BartenderConfig {
            common,
            redis: RedisConfig {
                url: get_env("REDIS_URL", Some("redis://localhost:6379"), is_prod)?,
            },
            llm: LlmConfig {
                api_key: get_env("LLM_API_KEY", None, is_prod)?,
                base_url: get_env("LLM_BASE_URL", Some("https://api.deepseek.com/v1"), is_prod)?,
                chat_model: get_env("LLM_CHAT_MODEL", Some("deepseek-v3-250324"), is_prod)?,
            },
            image: ImageConfig {
                api_key: get_env("IMAGE_API_KEY", None, is_prod)?,
                base_url: get_env(
                    "IMAGE_BASE_URL",
                    Some("https://api.siliconflow.cn/v1"),
                    is_prod,
                )?,
                model: get_env(
                    "IMAGE_MODEL",
                    Some("black-forest-labs/FLUX.1-schnell"),
                    is_prod,
                )?,
                image_size: get_env("IMAGE_SIZE", Some("1024x1024"), is_prod)?,
            },
            session: SessionConfig {
                ttl_seconds: parse_ttl(&get_env(
                    "SESSION_TTL_SECONDS",
                    Some(&DEFAULT_SESSION_TTL_SECONDS.to_string()),
                    is_prod,
                )?)?,
            },
            otlp_endpoint: env::var("OTLP_ENDPOINT").ok(),
        })
    }
}

/// A malformed TTL is a configuration error, not something to paper over
/// with the default.
fn parse_ttl(raw: &str) -> Result<i64, AppError> {
    raw.parse().map_err(|e| {
        AppError::ConfigError(anyhow::anyhow!(
            "SESSION_TTL_SECONDS must be an integer number of seconds, got '{}': {}",
            raw,
            e
        ))
    })
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}
