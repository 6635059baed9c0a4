//! Hub configuration
//!
//! Loaded from a YAML file (or string) and then adjusted from the environment:
//!
//! ```yaml
//! api:
//!   base_url: https://hub.example.com/api
//!   timeout_secs: 15
//! cache:
//!   ttl_secs: 120
//!   max_entries: 500
//!   key_prefix: tenant-42
//! ```
//!
//! | Variable | Overrides |
//! |----------|-----------|
//! | `PITCH_HUB_BASE_URL` | `api.base_url` |
//! | `PITCH_HUB_TIMEOUT_SECS` | `api.timeout_secs` |
//! | `PITCH_HUB_API_TOKEN` | `api.api_token` |
//! | `PITCH_HUB_CACHE_TTL_SECS` | `cache.ttl_secs` |

use crate::cache::CacheConfig;
use crate::error::{Error, ErrorContext};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HubConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub cache: CacheSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default, skip_serializing)]
    pub api_token: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            api_token: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_prefix: Option<String>,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            ttl_secs: default_ttl_secs(),
            max_entries: default_max_entries(),
            key_prefix: None,
        }
    }
}

impl CacheSettings {
    pub fn to_cache_config(&self) -> CacheConfig {
        let mut config = CacheConfig::new()
            .with_enabled(self.enabled)
            .with_ttl(Duration::from_secs(self.ttl_secs))
            .with_max_entries(self.max_entries);
        if let Some(ref p) = self.key_prefix {
            config = config.with_key_prefix(p.clone());
        }
        config
    }
}

fn default_base_url() -> String {
    "http://localhost:8080/api".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_enabled() -> bool {
    true
}

fn default_ttl_secs() -> u64 {
    300
}

fn default_max_entries() -> usize {
    1000
}

impl HubConfig {
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: HubConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&content)
    }

    /// Applies `PITCH_HUB_*` variables on top of the loaded values.
    pub fn with_env_overrides(mut self) -> Result<Self> {
        if let Ok(url) = env::var("PITCH_HUB_BASE_URL") {
            self.api.base_url = url;
        }
        if let Some(secs) = parse_env("PITCH_HUB_TIMEOUT_SECS")? {
            self.api.timeout_secs = secs;
        }
        if let Ok(token) = env::var("PITCH_HUB_API_TOKEN") {
            if !token.is_empty() {
                self.api.api_token = Some(token);
            }
        }
        if let Some(secs) = parse_env("PITCH_HUB_CACHE_TTL_SECS")? {
            self.cache.ttl_secs = secs;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.api.base_url).map_err(|e| {
            Error::configuration_with_context(
                "invalid api base url",
                ErrorContext::new()
                    .with_field_path("api.base_url")
                    .with_details(e.to_string())
                    .with_source("config_loader"),
            )
        })?;
        if self.api.timeout_secs == 0 {
            return Err(Error::configuration_with_context(
                "timeout must be greater than zero",
                ErrorContext::new()
                    .with_field_path("api.timeout_secs")
                    .with_source("config_loader"),
            ));
        }
        Ok(())
    }
}

fn parse_env(name: &str) -> Result<Option<u64>> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse::<u64>().map(Some).map_err(|e| {
            Error::configuration_with_context(
                format!("{} must be an unsigned integer", name),
                ErrorContext::new()
                    .with_field_path(name)
                    .with_details(e.to_string())
                    .with_source("config_loader"),
            )
        }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_document() {
        let config = HubConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config.api.timeout_secs, 30);
        assert!(config.cache.enabled);
        assert_eq!(config.cache.ttl_secs, 300);
    }

    #[test]
    fn test_full_document() {
        let yaml = r#"
api:
  base_url: https://hub.example.com/api
  timeout_secs: 5
  api_token: secret
cache:
  enabled: false
  ttl_secs: 10
  max_entries: 20
  key_prefix: t1
"#;
        let config = HubConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.api.base_url, "https://hub.example.com/api");
        assert_eq!(config.api.api_token.as_deref(), Some("secret"));
        let cache = config.cache.to_cache_config();
        assert!(!cache.enabled);
        assert_eq!(cache.default_ttl, Duration::from_secs(10));
        assert_eq!(cache.max_entries, 20);
        assert_eq!(cache.key_prefix.as_deref(), Some("t1"));
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let err = HubConfig::from_yaml_str("api:\n  base_url: not a url\n").unwrap_err();
        assert_eq!(
            err.context().and_then(|c| c.field_path.as_deref()),
            Some("api.base_url")
        );
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        assert!(HubConfig::from_yaml_str("api:\n  timeout_secs: 0\n").is_err());
    }

    #[test]
    fn test_malformed_yaml() {
        assert!(matches!(
            HubConfig::from_yaml_str("api: [unclosed"),
            Err(Error::Yaml(_))
        ));
    }

    // Environment variables are process-wide; tests touching them take this lock.
    static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

    const ENV_VARS: [&str; 4] = [
        "PITCH_HUB_BASE_URL",
        "PITCH_HUB_TIMEOUT_SECS",
        "PITCH_HUB_API_TOKEN",
        "PITCH_HUB_CACHE_TTL_SECS",
    ];

    fn with_env<T>(vars: &[(&str, &str)], f: impl FnOnce() -> T) -> T {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        for name in ENV_VARS {
            env::remove_var(name);
        }
        for (k, v) in vars {
            env::set_var(k, v);
        }
        let out = f();
        for name in ENV_VARS {
            env::remove_var(name);
        }
        out
    }

    #[test]
    fn test_env_overrides_are_applied() {
        let config = with_env(
            &[
                ("PITCH_HUB_BASE_URL", "https://env-override.example.com/v2"),
                ("PITCH_HUB_TIMEOUT_SECS", " 17 "),
                ("PITCH_HUB_API_TOKEN", "env-token-17"),
                ("PITCH_HUB_CACHE_TTL_SECS", "45"),
            ],
            || HubConfig::default().with_env_overrides(),
        )
        .unwrap();
        assert_eq!(config.api.base_url, "https://env-override.example.com/v2");
        assert_eq!(config.api.timeout_secs, 17);
        assert_eq!(config.api.api_token.as_deref(), Some("env-token-17"));
        assert_eq!(config.cache.ttl_secs, 45);
    }

    #[test]
    fn test_unset_env_keeps_loaded_values() {
        let loaded = HubConfig::from_yaml_str("api:\n  timeout_secs: 9\n").unwrap();
        let config = with_env(&[], || loaded.with_env_overrides()).unwrap();
        assert_eq!(config.api.timeout_secs, 9);
        assert_eq!(config.cache.ttl_secs, 300);
    }

    #[test]
    fn test_non_numeric_timeout_env_is_a_configuration_error() {
        let err = with_env(&[("PITCH_HUB_TIMEOUT_SECS", "soon")], || {
            HubConfig::default().with_env_overrides()
        })
        .unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
        assert_eq!(
            err.context().and_then(|c| c.field_path.as_deref()),
            Some("PITCH_HUB_TIMEOUT_SECS")
        );
    }

    #[test]
    fn test_empty_token_env_is_ignored() {
        let mut loaded = HubConfig::default();
        loaded.api.api_token = Some("from-file".to_string());
        let config = with_env(&[("PITCH_HUB_API_TOKEN", "")], || {
            loaded.with_env_overrides()
        })
        .unwrap();
        assert_eq!(config.api.api_token.as_deref(), Some("from-file"));
    }

    #[test]
    fn test_env_base_url_is_validated() {
        let err = with_env(&[("PITCH_HUB_BASE_URL", "not a url")], || {
            HubConfig::default().with_env_overrides()
        })
        .unwrap_err();
        assert_eq!(
            err.context().and_then(|c| c.field_path.as_deref()),
            Some("api.base_url")
        );
    }

    #[test]
    fn test_from_path_reads_yaml_file() {
        let path = env::temp_dir().join(format!(
            "pitch-hub-config-{}-from-path.yaml",
            std::process::id()
        ));
        std::fs::write(
            &path,
            "api:\n  base_url: https://file.example.com\ncache:\n  max_entries: 7\n",
        )
        .unwrap();
        let config = HubConfig::from_path(&path);
        std::fs::remove_file(&path).unwrap();

        let config = config.unwrap();
        assert_eq!(config.api.base_url, "https://file.example.com");
        assert_eq!(config.cache.max_entries, 7);
    }

    #[test]
    fn test_from_path_missing_file_is_io_error() {
        let path = env::temp_dir().join(format!(
            "pitch-hub-config-{}-missing.yaml",
            std::process::id()
        ));
        assert!(matches!(HubConfig::from_path(&path), Err(Error::Io(_))));
    }
}
