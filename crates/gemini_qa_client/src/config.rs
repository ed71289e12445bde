//! Settings file and credential loading.
//! Settings live in `~/.gemini-qa/config.yaml` (api.*). The API key is read from
//! `GEMINI_API_KEY` (environment or `.env`) first and the settings file second.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Name of the variable holding the API key.
pub const CREDENTIAL_VAR: &str = "GEMINI_API_KEY";

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// API section (api_key, base_url, model, timeout_secs).
#[derive(Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct ApiSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl std::fmt::Debug for ApiSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiSection")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Full settings file.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiSection,
}

impl Config {
    pub fn base_url(&self) -> &str {
        self.api.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn model(&self) -> &str {
        self.api.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    /// Whole-request timeout. `None` leaves the transport default in place.
    pub fn timeout(&self) -> Option<Duration> {
        self.api.timeout_secs.map(Duration::from_secs)
    }
}

/// Returns the default settings path: `~/.gemini-qa/config.yaml` (platform-specific).
pub fn default_config_path() -> Option<PathBuf> {
    let home = home_dir()?;
    Some(home.join(".gemini-qa").join("config.yaml"))
}

#[cfg(unix)]
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

#[cfg(windows)]
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("USERPROFILE").map(PathBuf::from)
}

#[cfg(not(any(unix, windows)))]
fn home_dir() -> Option<PathBuf> {
    None
}

/// Load settings from a YAML file.
pub fn load(path: &Path) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load settings from `path` if the file exists, otherwise return defaults.
pub fn load_or_default(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Ok(Config::default());
    }
    load(path)
}

/// The API key. Immutable once loaded; `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential([REDACTED])")
    }
}

/// Load the API key once at startup.
///
/// Reads `.env` from the working directory (without overriding variables that
/// are already set), then looks up [`CREDENTIAL_VAR`], then `api.api_key` in
/// `settings`.
pub fn load_credential(settings: Option<&Config>) -> Result<Credential, ConfigError> {
    if let Ok(path) = dotenv::dotenv() {
        tracing::debug!(path = %path.display(), "loaded .env");
    }
    load_credential_from(|name| std::env::var(name).ok(), settings)
}

/// Same as [`load_credential`] with an injected variable lookup.
/// The value is returned byte-exact; only an empty value counts as missing.
pub fn load_credential_from<F>(lookup: F, settings: Option<&Config>) -> Result<Credential, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(key) = lookup(CREDENTIAL_VAR).filter(|v| !v.is_empty()) {
        return Ok(Credential(key));
    }
    let from_file = settings
        .and_then(|c| c.api.api_key.clone())
        .filter(|v| !v.is_empty());
    match from_file {
        Some(key) => Ok(Credential(key)),
        None => Err(ConfigError::missing_credential()),
    }
}

/// Settings or credential error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} not found! Please set it in a .env file")]
    MissingCredential {
        name: &'static str,
        guidance: String,
    },
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

impl ConfigError {
    fn missing_credential() -> Self {
        let guidance = format!(
            "1. Create a .env file in the project directory\n\
             2. Add this line: {CREDENTIAL_VAR}=your_actual_api_key\n\
             3. Replace 'your_actual_api_key' with your real Gemini API key\n\
             (Alternatively set api.api_key in ~/.gemini-qa/config.yaml)"
        );
        ConfigError::MissingCredential {
            name: CREDENTIAL_VAR,
            guidance,
        }
    }

    /// Remediation steps for the user, when there are any.
    pub fn guidance(&self) -> Option<&str> {
        match self {
            ConfigError::MissingCredential { guidance, .. } => Some(guidance),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings_with_key(key: &str) -> Config {
        let mut cfg = Config::default();
        cfg.api.api_key = Some(key.into());
        cfg
    }

    #[test]
    fn environment_value_is_returned_unchanged() {
        let cred = load_credential_from(|_| Some("  abc-123 \n".into()), None).unwrap();
        assert_eq!(cred.expose(), "  abc-123 \n");
    }

    #[test]
    fn absent_value_is_missing_credential() {
        let err = load_credential_from(|_| None, None).unwrap_err();
        assert!(matches!(err, ConfigError::MissingCredential { name: "GEMINI_API_KEY", .. }));
        let guidance = err.guidance().expect("guidance text");
        assert!(guidance.contains(".env"));
        assert!(guidance.contains("GEMINI_API_KEY=your_actual_api_key"));
    }

    #[test]
    fn empty_value_is_missing_credential() {
        let err = load_credential_from(|_| Some(String::new()), None).unwrap_err();
        assert!(matches!(err, ConfigError::MissingCredential { .. }));
    }

    #[test]
    fn settings_file_is_the_fallback() {
        let cfg = settings_with_key("from-file");
        let cred = load_credential_from(|_| None, Some(&cfg)).unwrap();
        assert_eq!(cred.expose(), "from-file");

        let cred = load_credential_from(|_| Some("from-env".into()), Some(&cfg)).unwrap();
        assert_eq!(cred.expose(), "from-env");
    }

    #[test]
    fn empty_key_in_settings_file_is_missing() {
        let cfg = settings_with_key("");
        let err = load_credential_from(|_| None, Some(&cfg)).unwrap_err();
        assert!(matches!(err, ConfigError::MissingCredential { .. }));
    }

    #[test]
    fn debug_output_is_redacted() {
        let cred = load_credential_from(|_| Some("super-secret".into()), None).unwrap();
        assert!(!format!("{:?}", cred).contains("super-secret"));
        let cfg = settings_with_key("super-secret");
        assert!(!format!("{:?}", cfg).contains("super-secret"));
    }

    #[test]
    fn defaults_apply_when_section_is_empty() {
        let cfg = Config::default();
        assert_eq!(cfg.base_url(), DEFAULT_BASE_URL);
        assert_eq!(cfg.model(), DEFAULT_MODEL);
        assert_eq!(cfg.timeout(), None);
    }
}
