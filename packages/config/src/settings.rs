use crate::constants::*;
use std::env;
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;
use url::Url;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid API URL '{url}': {reason}")]
    InvalidApiUrl { url: String, reason: String },
    #[error("Unsupported API URL scheme '{0}' (expected http or https)")]
    UnsupportedScheme(String),
    #[error("Could not determine home directory")]
    NoHomeDir,
}

/// Resolved client configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Base URL of the moderation service, without a trailing slash
    pub api_url: String,
    /// File holding the durable user token
    pub credentials_path: PathBuf,
    /// `tracing_subscriber::EnvFilter` directive
    pub log_filter: String,
    /// Log destination while the terminal UI owns the screen
    pub log_file: PathBuf,
    /// Admin token supplied out of band; never persisted
    pub admin_token: Option<String>,
}

impl Settings {
    /// Read `.env` from the working directory or its parents, then the
    /// process environment. Variables already set win over the file.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!("Loaded environment from {}", path.display());
        }
        Self::from_env()
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_url = normalize_api_url(
            &non_empty(MODVIEW_API_URL).unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        )?;

        let credentials_path = match non_empty(MODVIEW_CREDENTIALS_PATH) {
            Some(path) => PathBuf::from(path),
            None => base_dir(&lookup)?.join(CREDENTIALS_FILE_NAME),
        };

        let log_file = match non_empty(MODVIEW_LOG_FILE) {
            Some(path) => PathBuf::from(path),
            None => base_dir(&lookup)?.join(LOG_FILE_NAME),
        };

        let log_filter =
            non_empty(MODVIEW_LOG).unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        let admin_token = non_empty(MODVIEW_ADMIN_TOKEN).map(|t| t.trim().to_string());

        debug!(
            api_url = %api_url,
            credentials = %credentials_path.display(),
            "Resolved configuration"
        );

        Ok(Settings {
            api_url,
            credentials_path,
            log_filter,
            log_file,
            admin_token,
        })
    }

    /// Replace the service URL, e.g. from a command-line flag
    pub fn with_api_url(mut self, url: &str) -> Result<Self, ConfigError> {
        self.api_url = normalize_api_url(url)?;
        Ok(self)
    }
}

/// Get the path to the Modview directory (~/.modview)
pub fn modview_dir() -> Result<PathBuf, ConfigError> {
    base_dir(&|key: &str| env::var(key).ok())
}

fn base_dir<F>(lookup: &F) -> Result<PathBuf, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    // HOME first so tests can redirect it
    if let Some(home) = lookup(HOME).filter(|h| !h.is_empty()) {
        return Ok(PathBuf::from(home).join(CONFIG_DIR_NAME));
    }
    dirs::home_dir()
        .map(|home| home.join(CONFIG_DIR_NAME))
        .ok_or(ConfigError::NoHomeDir)
}

fn normalize_api_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    let parsed = Url::parse(trimmed).map_err(|e| ConfigError::InvalidApiUrl {
        url: trimmed.to_string(),
        reason: e.to_string(),
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(trimmed.trim_end_matches('/').to_string()),
        other => Err(ConfigError::UnsupportedScheme(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::from_lookup(lookup_from(&[(HOME, "/home/tester")])).unwrap();

        assert_eq!(settings.api_url, DEFAULT_API_URL);
        assert_eq!(
            settings.credentials_path,
            PathBuf::from("/home/tester/.modview/credentials.toml")
        );
        assert_eq!(settings.log_file, PathBuf::from("/home/tester/.modview/modview.log"));
        assert_eq!(settings.log_filter, "info");
        assert!(settings.admin_token.is_none());
    }

    #[test]
    fn test_overrides() {
        let settings = Settings::from_lookup(lookup_from(&[
            (HOME, "/home/tester"),
            (MODVIEW_API_URL, "https://moderation.example.com/"),
            (MODVIEW_CREDENTIALS_PATH, "/tmp/creds.toml"),
            (MODVIEW_LOG, "modview=debug"),
            (MODVIEW_ADMIN_TOKEN, "  admin-secret "),
        ]))
        .unwrap();

        assert_eq!(settings.api_url, "https://moderation.example.com");
        assert_eq!(settings.credentials_path, PathBuf::from("/tmp/creds.toml"));
        assert_eq!(settings.log_filter, "modview=debug");
        assert_eq!(settings.admin_token.as_deref(), Some("admin-secret"));
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let settings = Settings::from_lookup(lookup_from(&[
            (HOME, "/home/tester"),
            (MODVIEW_API_URL, "   "),
            (MODVIEW_ADMIN_TOKEN, ""),
        ]))
        .unwrap();

        assert_eq!(settings.api_url, DEFAULT_API_URL);
        assert!(settings.admin_token.is_none());
    }

    #[test]
    fn test_invalid_url_is_rejected() {
        let err = Settings::from_lookup(lookup_from(&[
            (HOME, "/home/tester"),
            (MODVIEW_API_URL, "not a url"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidApiUrl { .. }));

        let err = Settings::from_lookup(lookup_from(&[
            (HOME, "/home/tester"),
            (MODVIEW_API_URL, "ftp://example.com"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedScheme(scheme) if scheme == "ftp"));
    }

    #[test]
    fn test_with_api_url_override() {
        let settings = Settings::from_lookup(lookup_from(&[(HOME, "/home/tester")]))
            .unwrap()
            .with_api_url("http://127.0.0.1:9000/")
            .unwrap();
        assert_eq!(settings.api_url, "http://127.0.0.1:9000");
    }
}
