//! Server configuration.

use std::env;

use sha2::{Digest, Sha512};
use tower_sessions::cookie::Key;

/// Name of the session cookie.
pub const SESSION_COOKIE_NAME: &str = "catalog_session";

/// Database used when `DATABASE_URL` is unset.
pub const DEFAULT_DATABASE_URL: &str = "sqlite:catalogwithusers.db?mode=rwc";

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Database URL.
    pub database_url: String,
    /// Path of the OAuth client-secrets document.
    pub client_secrets_path: String,
    /// Application secret used to sign session cookies.
    pub secret_key: String,
    /// Log level.
    pub log_level: String,
    /// Whether the session cookie carries the `Secure` attribute.
    pub secure_cookies: bool,
}

impl Config {
    /// Creates a configuration with default values and the given secret.
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            client_secrets_path: "client_secrets.json".to_string(),
            secret_key: secret_key.into(),
            log_level: "info".to_string(),
            secure_cookies: false,
        }
    }

    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        let secret_key = env::var("CATALOG_SECRET_KEY")
            .map_err(|_| anyhow::anyhow!("CATALOG_SECRET_KEY is required"))?;
        if secret_key.is_empty() {
            anyhow::bail!("CATALOG_SECRET_KEY must not be empty");
        }

        let defaults = Self::new(secret_key);

        Ok(Self {
            host: env::var("CATALOG_SERVER_HOST").unwrap_or(defaults.host),
            port: env::var("CATALOG_SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
            database_url: env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            client_secrets_path: env::var("CATALOG_CLIENT_SECRETS")
                .unwrap_or(defaults.client_secrets_path),
            secret_key: defaults.secret_key,
            log_level: env::var("CATALOG_LOG_LEVEL").unwrap_or(defaults.log_level),
            secure_cookies: env::var("CATALOG_SECURE_COOKIES")
                .map(|v| parse_flag(&v))
                .unwrap_or(defaults.secure_cookies),
        })
    }

    /// Returns the server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Derives the 64-byte cookie signing key from the application secret.
    pub fn session_key(&self) -> Key {
        let digest = Sha512::digest(self.secret_key.as_bytes());
        Key::from(digest.as_slice())
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_env() {
        // SAFETY: this is the only test touching these variables
        unsafe {
            env::remove_var("CATALOG_SECRET_KEY");
            env::remove_var("CATALOG_SERVER_PORT");
            env::remove_var("DATABASE_URL");
            env::remove_var("CATALOG_SECURE_COOKIES");
        }
        assert!(Config::from_env().is_err());

        unsafe {
            env::set_var("CATALOG_SECRET_KEY", "super_secret_key");
        }
        let config = Config::from_env().unwrap();
        assert_eq!(config.port, 8000);
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.server_addr(), format!("{}:8000", config.host));
        assert!(!config.secure_cookies);

        unsafe {
            env::set_var("CATALOG_SECURE_COOKIES", "true");
        }
        assert!(Config::from_env().unwrap().secure_cookies);
        unsafe {
            env::remove_var("CATALOG_SECURE_COOKIES");
        }
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("1"));
        assert!(parse_flag(" TRUE "));
        assert!(!parse_flag("false"));
        assert!(!parse_flag(""));
    }

    #[test]
    fn test_session_key_is_stable() {
        let a = Config::new("super_secret_key").session_key();
        let b = Config::new("super_secret_key").session_key();
        let c = Config::new("another_key").session_key();
        assert_eq!(a.master(), b.master());
        assert_ne!(a.master(), c.master());
    }
}
