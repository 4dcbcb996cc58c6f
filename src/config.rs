use std::time::Duration;

use serde::Deserialize;

/// Application configuration loaded from environment variables
///
/// Upstream credentials are optional: a missing key does not stop the server,
/// it makes the affected upstream report itself as unavailable.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// TMDB v3 API key
    #[serde(default)]
    pub tmdb_api_key: Option<String>,

    /// TMDB read access token, sent as a bearer token
    #[serde(default)]
    pub tmdb_access_token: Option<String>,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Locale requested from TMDB for titles and overviews
    #[serde(default = "default_tmdb_language")]
    pub tmdb_language: String,

    /// Gemini API key
    #[serde(default)]
    pub gemini_api_key: Option<String>,

    /// Gemini API base URL
    #[serde(default = "default_gemini_api_url")]
    pub gemini_api_url: String,

    /// Gemini model used for recommendations
    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,

    /// Upper bound for a single title enrichment lookup
    #[serde(default = "default_enrichment_timeout_secs")]
    pub enrichment_timeout_secs: u64,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_language() -> String {
    "es-ES".to_string()
}

fn default_gemini_api_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_gemini_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_enrichment_timeout_secs() -> u64 {
    5
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3001
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn enrichment_timeout(&self) -> Duration {
        Duration::from_secs(self.enrichment_timeout_secs)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_apply_when_env_is_empty() {
        let vars: Vec<(String, String)> = Vec::new();
        let config: Config = envy::from_iter(vars).unwrap();

        assert_eq!(config.tmdb_api_key, None);
        assert_eq!(config.gemini_api_key, None);
        assert_eq!(config.tmdb_api_url, "https://api.themoviedb.org/3");
        assert_eq!(config.tmdb_language, "es-ES");
        assert_eq!(config.gemini_model, "gemini-2.0-flash");
        assert_eq!(config.enrichment_timeout(), Duration::from_secs(5));
        assert_eq!(config.bind_address(), "0.0.0.0:3001");
    }

    #[test]
    fn test_credentials_and_port_read_from_env() {
        let vars = vec![
            ("TMDB_API_KEY".to_string(), "key".to_string()),
            ("TMDB_ACCESS_TOKEN".to_string(), "token".to_string()),
            ("GEMINI_API_KEY".to_string(), "gemini".to_string()),
            ("PORT".to_string(), "8080".to_string()),
        ];
        let config: Config = envy::from_iter(vars).unwrap();

        assert_eq!(config.tmdb_api_key.as_deref(), Some("key"));
        assert_eq!(config.tmdb_access_token.as_deref(), Some("token"));
        assert_eq!(config.gemini_api_key.as_deref(), Some("gemini"));
        assert_eq!(config.port, 8080);
    }
}
