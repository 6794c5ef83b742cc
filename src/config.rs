use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Dev,
    Staging,
    Prod,
}

impl Environment {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "prod" | "production" => Self::Prod,
            "staging" => Self::Staging,
            _ => Self::Dev,
        }
    }

    pub fn is_dev(&self) -> bool {
        matches!(self, Self::Dev)
    }

    pub fn is_prod(&self) -> bool {
        matches!(self, Self::Prod)
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub env: Environment,
    pub server_addr: String,

    // CORS
    pub cors_allow_origins: Vec<String>,

    // Admin login
    pub admin_username: String,
    pub admin_password: String,
    pub session_secret: String,
    pub session_ttl_seconds: u64,

    // Lists
    pub default_page_size: u32,

    // Reply mailer
    pub reply_from: String,
    pub reply_delay_ms: u64,

    pub seed_demo_data: bool,
    pub max_body_bytes: usize,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from any key lookup (the process environment in
    /// production, a map in tests).
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let env = Environment::from_str(&var("ENV").unwrap_or_else(|| "dev".to_string()));
        let server_addr = var("SERVER_ADDR").unwrap_or_else(|| "0.0.0.0:8080".to_string());

        // CORS
        let cors_allow_origins = var("CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|| "http://localhost:3000".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        // Admin login
        let admin_username = var("ADMIN_USERNAME").unwrap_or_else(|| "admin".to_string());
        let admin_password = var("ADMIN_PASSWORD").context("ADMIN_PASSWORD must be set")?;
        let session_secret = var("SESSION_SECRET").context("SESSION_SECRET must be set")?;
        if session_secret.len() < 32 {
            anyhow::bail!("SESSION_SECRET must be at least 32 bytes");
        }
        let session_ttl_seconds = var("SESSION_TTL_SECONDS")
            .and_then(|s| s.parse().ok())
            .unwrap_or(8 * 60 * 60); // one working day

        // Lists
        let default_page_size = var("DEFAULT_PAGE_SIZE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(10u32)
            .clamp(1, 100);

        // Reply mailer
        let reply_from =
            var("REPLY_FROM").unwrap_or_else(|| "no-reply@localhost".to_string());
        let reply_delay_ms = var("REPLY_DELAY_MS")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1500);

        let seed_demo_data = var("SEED_DEMO_DATA")
            .map(|s| matches!(s.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
            .unwrap_or(true);
        let max_body_bytes = var("MAX_BODY_BYTES")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1024 * 1024);

        Ok(Settings {
            env,
            server_addr,
            cors_allow_origins,
            admin_username,
            admin_password,
            session_secret,
            session_ttl_seconds,
            default_page_size,
            reply_from,
            reply_delay_ms,
            seed_demo_data,
            max_body_bytes,
        })
    }

    pub fn reply_delay(&self) -> Duration {
        Duration::from_millis(self.reply_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    #[test]
    fn defaults_apply() {
        let settings =
            Settings::from_lookup(lookup(&[("ADMIN_PASSWORD", "pw"), ("SESSION_SECRET", SECRET)]))
                .unwrap();
        assert_eq!(settings.env, Environment::Dev);
        assert_eq!(settings.server_addr, "0.0.0.0:8080");
        assert_eq!(settings.admin_username, "admin");
        assert_eq!(settings.session_ttl_seconds, 28_800);
        assert_eq!(settings.default_page_size, 10);
        assert_eq!(settings.reply_delay(), Duration::from_millis(1500));
        assert!(settings.seed_demo_data);
        assert_eq!(settings.max_body_bytes, 1_048_576);
    }

    #[test]
    fn required_values_are_enforced() {
        assert!(Settings::from_lookup(lookup(&[("SESSION_SECRET", SECRET)])).is_err());
        assert!(Settings::from_lookup(lookup(&[("ADMIN_PASSWORD", "pw")])).is_err());
        assert!(Settings::from_lookup(lookup(&[
            ("ADMIN_PASSWORD", "pw"),
            ("SESSION_SECRET", "short")
        ]))
        .is_err());
    }

    #[test]
    fn overrides_are_parsed() {
        let settings = Settings::from_lookup(lookup(&[
            ("ENV", "production"),
            ("ADMIN_PASSWORD", "pw"),
            ("SESSION_SECRET", SECRET),
            ("DEFAULT_PAGE_SIZE", "500"),
            ("SEED_DEMO_DATA", "false"),
            ("CORS_ALLOW_ORIGINS", "https://a.example, https://b.example,"),
        ]))
        .unwrap();
        assert!(settings.env.is_prod());
        assert_eq!(settings.default_page_size, 100);
        assert!(!settings.seed_demo_data);
        assert_eq!(settings.cors_allow_origins.len(), 2);
    }
}
