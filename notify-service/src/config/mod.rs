use secrecy::SecretString;
use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct NotifyConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub resend: ResendConfig,
    pub admin: AdminConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResendConfig {
    pub api_url: String,
    pub api_key: SecretString,
    pub from: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    /// Recipient of every signup notification.
    pub email: String,
}

impl NotifyConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        Ok(NotifyConfig {
            common: common_config,
            resend: ResendConfig {
                api_url: get_env("RESEND_API_URL", Some("https://api.resend.com"), is_prod)?,
                api_key: SecretString::new(get_env("RESEND_API_KEY", Some(""), is_prod)?),
                from: get_env(
                    "RESEND_FROM",
                    Some("Validation <onboarding@resend.dev>"),
                    is_prod,
                )?,
                enabled: env::var("RESEND_ENABLED")
                    .unwrap_or_else(|_| "false".to_string())
                    .parse()
                    .unwrap_or(false),
            },
            admin: AdminConfig {
                email: get_env("ADMIN_EMAIL", Some("admin@example.com"), is_prod)?,
            },
        })
    }
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
