// Connection settings for the REST helper.
//
// Values come from an optional JSON file in the user's home directory and
// are then overridden by environment variables, so a test runner can point
// the helper at another server without touching the file.

use crate::error::{RestError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// URL used when nothing else is configured.
pub const DEFAULT_URL: &str = "http://localhost:5080";

/// Name of the optional config file inside the home directory.
pub const CONFIG_FILE_NAME: &str = ".antmedia_rest.json";

/// Suffix of the local dev-server URL that gets redirected.
const DEV_SERVER_SUFFIX: &str = "localhost:3000";

/// Server URL and credentials used to build a `RestHelper`.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct RestConfig {
    pub url: String,
    pub user: String,
    pub password: String,
}

impl Default for RestConfig {
    fn default() -> Self {
        RestConfig {
            url: DEFAULT_URL.into(),
            user: String::new(),
            password: String::new(),
        }
    }
}

impl RestConfig {
    /// Load `~/.antmedia_rest.json` if it exists, then apply the
    /// `ANTMEDIA_URL`, `ANTMEDIA_USER` and `ANTMEDIA_PASSWORD` variables.
    pub fn from_env() -> Result<Self> {
        let mut config = match default_config_path() {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Parse a config file. Missing keys fall back to the defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| RestError::Config(format!("{}: {}", path.display(), e)))?;
        serde_json::from_str(&data)
            .map_err(|e| RestError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Overwrite fields with whatever `lookup` returns for the env keys.
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("ANTMEDIA_URL") {
            self.url = url;
        }
        if let Some(user) = lookup("ANTMEDIA_USER") {
            self.user = user;
        }
        if let Some(password) = lookup("ANTMEDIA_PASSWORD") {
            self.password = password;
        }
    }
}

/// `~/.antmedia_rest.json`, or `None` when no home directory is known.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
}

/// Resolve the base URL the helper talks to.
///
/// A URL ending in `localhost:3000` (the React dev server of one local
/// setup) is replaced by `http://localhost:5080`. This only covers that
/// environment; every other URL is used verbatim.
pub fn effective_base_url(url: &str) -> String {
    if url.ends_with(DEV_SERVER_SUFFIX) {
        DEFAULT_URL.to_string()
    } else {
        url.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn dev_server_url_is_redirected() {
        assert_eq!(effective_base_url("http://localhost:3000"), "http://localhost:5080");
        assert_eq!(effective_base_url("https://localhost:3000"), "http://localhost:5080");
    }

    #[test]
    fn other_urls_are_kept_verbatim() {
        assert_eq!(effective_base_url("http://10.0.0.7:5080"), "http://10.0.0.7:5080");
        assert_eq!(effective_base_url("http://localhost:3000/"), "http://localhost:3000/");
        assert_eq!(effective_base_url("http://localhost:30001"), "http://localhost:30001");
    }

    #[test]
    fn env_overrides_replace_only_present_keys() {
        let env: HashMap<&str, &str> =
            [("ANTMEDIA_URL", "http://media.test:5080"), ("ANTMEDIA_USER", "ops@test")]
                .into_iter()
                .collect();
        let mut config = RestConfig {
            url: "http://old".into(),
            user: "old".into(),
            password: "secret".into(),
        };
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.url, "http://media.test:5080");
        assert_eq!(config.user, "ops@test");
        assert_eq!(config.password, "secret");
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"user": "admin@test.com"}}"#).unwrap();

        let config = RestConfig::from_file(file.path()).unwrap();
        assert_eq!(config.url, DEFAULT_URL);
        assert_eq!(config.user, "admin@test.com");
        assert_eq!(config.password, "");
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = RestConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, RestError::Config(_)));
    }
}
