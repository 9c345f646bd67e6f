//! Process configuration, read once at startup from environment variables.

use std::str::FromStr;
use std::{env, fmt};

/// A configuration value that could not be parsed.
#[derive(Debug)]
pub struct SettingsError {
    key: &'static str,
    value: String,
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid value for {}: {:?}", self.key, self.value)
    }
}

impl std::error::Error for SettingsError {}

/// Application settings. Every field has a default; environment variables
/// override them.
#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    /// Origins allowed to call the API from a browser.
    pub cors_origins: Vec<String>,
    pub default_num_points: usize,
    pub max_num_points: usize,
    /// Declared for parity with the deployment surface; no code path
    /// consults these two — every request recomputes from scratch.
    pub enable_cache: bool,
    pub cache_ttl_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            cors_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
            default_num_points: 1000,
            max_num_points: 10_000,
            enable_cache: true,
            cache_ttl_secs: 300,
        }
    }
}

impl Settings {
    /// Builds settings from the environment, falling back to the defaults
    /// for unset variables.
    ///
    /// # Errors
    /// Returns a `SettingsError` if a set variable fails to parse.
    pub fn from_env() -> Result<Self, SettingsError> {
        let defaults = Self::default();

        let mut settings = Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: parse_env("PORT", defaults.port)?,
            cors_origins: defaults.cors_origins,
            default_num_points: parse_env("DEFAULT_NUM_POINTS", defaults.default_num_points)?,
            max_num_points: parse_env("MAX_NUM_POINTS", defaults.max_num_points)?,
            enable_cache: parse_env("ENABLE_CACHE", defaults.enable_cache)?,
            cache_ttl_secs: parse_env("CACHE_TTL_SECS", defaults.cache_ttl_secs)?,
        };
        if let Ok(origins) = env::var("CORS_ORIGINS") {
            settings.cors_origins = origins
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect();
        }

        Ok(settings)
    }

    /// The socket address the listener binds to.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Whether `origin` is allowed to make cross-origin requests.
    pub fn allows_origin(&self, origin: &str) -> bool {
        self.cors_origins.iter().any(|o| o == origin)
    }
}

fn parse_env<T: FromStr>(key: &'static str, default: T) -> Result<T, SettingsError> {
    match env::var(key) {
        Ok(raw) => raw.parse().map_err(|_| SettingsError { key, value: raw }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let settings = Settings::default();
        assert_eq!(settings.addr(), "127.0.0.1:8000");
        assert_eq!(settings.default_num_points, 1000);
        assert!(settings.allows_origin("http://localhost:3000"));
        assert!(!settings.allows_origin("http://evil.example"));
    }
}
