use std::{env, fmt::Display, str::FromStr};

use tracing::{info, warn};

use crate::notify::DEFAULT_OUTBOX_CAPACITY;

const DEV_JWT_SECRET: &str = "dev-secret-change-in-production";

/// Runtime configuration, read once at startup
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub token_expiration_days: i64,
    pub magic_link_ttl_minutes: i64,
    pub app_base_url: String,
    pub admin_emails: Vec<String>,
    pub email_retry_attempts: u32,
    pub email_retry_delay_ms: u64,
    pub outbox_capacity: usize,
    pub default_season: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let jwt_secret = var("JWT_SECRET").unwrap_or_else(|_| {
            warn!("JWT_SECRET not set, using development secret");
            DEV_JWT_SECRET.to_string()
        });

        Self {
            port: try_load("PORT", 3000),
            database_url: var("DATABASE_URL").ok(),
            jwt_secret,
            token_expiration_days: try_load("TOKEN_EXPIRATION_DAYS", 30),
            magic_link_ttl_minutes: try_load("MAGIC_LINK_TTL_MINUTES", 15),
            app_base_url: try_load("APP_BASE_URL", "http://localhost:5173".to_string()),
            admin_emails: parse_email_list(&var("ADMIN_EMAILS").unwrap_or_default()),
            email_retry_attempts: try_load("EMAIL_RETRY_ATTEMPTS", 3),
            email_retry_delay_ms: try_load("EMAIL_RETRY_DELAY_MS", 1000),
            outbox_capacity: try_load("OUTBOX_CAPACITY", DEFAULT_OUTBOX_CAPACITY),
            default_season: try_load("DEFAULT_SEASON", "2025".to_string()),
        }
    }

    pub fn is_admin_email(&self, email: &str) -> bool {
        self.admin_emails.iter().any(|admin| admin == email)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            database_url: None,
            jwt_secret: DEV_JWT_SECRET.to_string(),
            token_expiration_days: 30,
            magic_link_ttl_minutes: 15,
            app_base_url: "http://localhost:5173".to_string(),
            admin_emails: Vec::new(),
            email_retry_attempts: 3,
            email_retry_delay_ms: 1000,
            outbox_capacity: DEFAULT_OUTBOX_CAPACITY,
            default_season: "2025".to_string(),
        }
    }
}

fn var(key: &str) -> Result<String, env::VarError> {
    env::var(key)
}

fn try_load<T>(key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|e| {
            warn!("Invalid {key} value {raw:?}: {e}, using default: {default}");
            default
        }),
        Err(_) => {
            info!("{key} not set, using default: {default}");
            default
        }
    }
}

/// Splits a comma separated list, lower-casing and dropping blanks
pub fn parse_email_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|email| email.trim().to_lowercase())
        .filter(|email| !email.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_email_list_normalises_entries() {
        let emails = parse_email_list(" Admin@Example.com, ,commish@pool.net ");
        assert_eq!(emails, vec!["admin@example.com", "commish@pool.net"]);
    }

    #[test]
    fn test_parse_email_list_empty() {
        assert!(parse_email_list("").is_empty());
    }

    #[test]
    fn test_is_admin_email() {
        let config = AppConfig {
            admin_emails: vec!["admin@example.com".to_string()],
            ..AppConfig::default()
        };
        assert!(config.is_admin_email("admin@example.com"));
        assert!(!config.is_admin_email("fan@example.com"));
    }
}
