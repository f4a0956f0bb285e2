use serde::Deserialize;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// PostgreSQL database connection URL
    pub database_url: String,

    /// Gemini API key. When absent the service runs on heuristic recommendations only.
    #[serde(default)]
    pub gemini_api_key: Option<String>,

    /// Gemini API base URL
    #[serde(default = "default_gemini_api_url")]
    pub gemini_api_url: String,

    /// Gemini model used for recommendations
    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,

    /// Upper bound for a single generative call, in seconds
    #[serde(default = "default_gemini_timeout_secs")]
    pub gemini_timeout_secs: u64,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Deployment environment (development, production, ...)
    #[serde(default = "default_app_env")]
    pub app_env: String,
}

fn default_gemini_api_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_gemini_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_gemini_timeout_secs() -> u64 {
    15
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_app_env() -> String {
    "development".to_string()
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Load configuration from an explicit set of key/value pairs
    pub fn from_vars<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config = envy::from_iter::<_, Config>(vars)
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        if config.gemini_timeout_secs == 0 {
            anyhow::bail!("GEMINI_TIMEOUT_SECS must be at least 1");
        }
        Ok(config)
    }

    /// Gemini API key, if one is set and non-blank
    pub fn gemini_key(&self) -> Option<&str> {
        self.gemini_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    pub fn gemini_timeout(&self) -> Duration {
        Duration::from_secs(self.gemini_timeout_secs)
    }

    pub fn is_production(&self) -> bool {
        self.app_env.eq_ignore_ascii_case("production")
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_applied() {
        let config =
            Config::from_vars(vars(&[("DATABASE_URL", "postgres://localhost/menu")])).unwrap();

        assert_eq!(config.port, 3000);
        assert_eq!(config.gemini_model, "gemini-2.5-flash");
        assert_eq!(config.gemini_timeout(), Duration::from_secs(15));
        assert_eq!(config.gemini_key(), None);
        assert!(!config.is_production());
        assert_eq!(config.bind_address(), "0.0.0.0:3000");
    }

    #[test]
    fn test_zero_gemini_timeout_rejected() {
        let result = Config::from_vars(vars(&[
            ("DATABASE_URL", "postgres://localhost/menu"),
            ("GEMINI_TIMEOUT_SECS", "0"),
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn test_database_url_required() {
        assert!(Config::from_vars(vars(&[("PORT", "8080")])).is_err());
    }

    #[test]
    fn test_blank_gemini_key_is_ignored() {
        let config = Config::from_vars(vars(&[
            ("DATABASE_URL", "postgres://localhost/menu"),
            ("GEMINI_API_KEY", "   "),
            ("GEMINI_TIMEOUT_SECS", "5"),
            ("APP_ENV", "Production"),
        ]))
        .unwrap();

        assert_eq!(config.gemini_key(), None);
        assert_eq!(config.gemini_timeout(), Duration::from_secs(5));
        assert!(config.is_production());
    }
}
