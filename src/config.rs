//! Configuration loading.
//!
//! Values are layered: built-in defaults, then the first TOML file found, then
//! environment variables, then command-line flags.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::ConfigError;

pub const DEFAULT_MODEL: &str = "claude-sonnet-4-6";
pub const DEFAULT_COMMIT_STYLE: &str = "conventional";
pub const DEFAULT_LANGUAGE: &str = "en";
pub const DEFAULT_MAX_DIFF_LINES: i64 = 500;

const LOCAL_CONFIG_FILE: &str = ".commitpick.toml";

const ANTHROPIC_KEY_ENV_VAR: &str = "ANTHROPIC_API_KEY";
const GEMINI_KEY_ENV_VAR: &str = "GEMINI_API_KEY";
const MODEL_ENV_VAR: &str = "COMMITPICK_MODEL";
const STYLE_ENV_VAR: &str = "COMMITPICK_COMMIT_STYLE";
const LANGUAGE_ENV_VAR: &str = "COMMITPICK_LANGUAGE";
const MAX_DIFF_LINES_ENV_VAR: &str = "COMMITPICK_MAX_DIFF_LINES";

/// Commit styles the prompt knows about. Other values are passed through.
pub const STYLES: [&str; 4] = ["conventional", "gitmoji", "free", "custom"];

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: String,
    pub model: String,
    pub commit_style: String,
    pub custom_format: String,
    pub language: String,
    pub max_diff_lines: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            commit_style: DEFAULT_COMMIT_STYLE.to_string(),
            custom_format: String::new(),
            language: DEFAULT_LANGUAGE.to_string(),
            max_diff_lines: DEFAULT_MAX_DIFF_LINES,
        }
    }
}

impl Config {
    /// Load defaults, the config file and the environment.
    ///
    /// An explicit path must exist. Without one, `./.commitpick.toml` and
    /// `~/.config/commitpick/config.toml` are tried in that order and a
    /// missing file is not an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_from(explicit, &default_search_paths())
    }

    /// Like [`Config::load`] with a caller-supplied search list.
    pub fn load_from(
        explicit: Option<&Path>,
        search_paths: &[PathBuf],
    ) -> Result<Self, ConfigError> {
        let file = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => search_paths.iter().find(|p| p.is_file()).cloned(),
        };

        let mut config = match file {
            Some(path) => {
                debug!("Loading config from {}", path.display());
                Self::from_file(&path)?
            }
            None => {
                debug!("No config file found, using defaults");
                Self::default()
            }
        };

        config.apply_env();
        Ok(config)
    }

    /// Parse a TOML file. Missing keys take their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    fn apply_env(&mut self) {
        if let Some(key) =
            non_empty_env(ANTHROPIC_KEY_ENV_VAR).or_else(|| non_empty_env(GEMINI_KEY_ENV_VAR))
        {
            self.api_key = key;
        }
        if let Some(model) = non_empty_env(MODEL_ENV_VAR) {
            self.model = model;
        }
        if let Some(style) = non_empty_env(STYLE_ENV_VAR) {
            self.commit_style = style;
        }
        if let Some(language) = non_empty_env(LANGUAGE_ENV_VAR) {
            self.language = language;
        }
        if let Some(raw) = non_empty_env(MAX_DIFF_LINES_ENV_VAR) {
            match raw.parse::<i64>() {
                Ok(lines) => self.max_diff_lines = lines,
                Err(_) => warn!(
                    "Invalid {} value '{}', using {}",
                    MAX_DIFF_LINES_ENV_VAR, raw, self.max_diff_lines
                ),
            }
        }
    }

    /// Apply command-line flags. `None` or blank values keep the current setting.
    pub fn with_overrides(
        mut self,
        style: Option<&str>,
        model: Option<&str>,
        language: Option<&str>,
    ) -> Self {
        let pick = |value: Option<&str>| {
            value
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(String::from)
        };

        if let Some(style) = pick(style) {
            self.commit_style = style;
        }
        if let Some(model) = pick(model) {
            self.model = model;
        }
        if let Some(language) = pick(language) {
            self.language = language;
        }
        self
    }

    /// Ensure a provider can be called.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        if !STYLES.contains(&self.commit_style.as_str()) {
            warn!(
                "Unknown commit style '{}', passing it to the model as-is",
                self.commit_style
            );
        }
        Ok(())
    }
}

/// Candidate config files, most specific first.
pub fn default_search_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".config").join("commitpick").join("config.toml"));
    }
    paths
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    const ALL_VARS: [&str; 6] = [
        ANTHROPIC_KEY_ENV_VAR,
        GEMINI_KEY_ENV_VAR,
        MODEL_ENV_VAR,
        STYLE_ENV_VAR,
        LANGUAGE_ENV_VAR,
        MAX_DIFF_LINES_ENV_VAR,
    ];

    fn with_env<R>(vars: &[(&str, &str)], f: impl FnOnce() -> R) -> R {
        let mut all: Vec<(&str, Option<&str>)> = ALL_VARS.iter().map(|v| (*v, None)).collect();
        for &(name, value) in vars {
            if let Some(slot) = all.iter_mut().find(|slot| slot.0 == name) {
                slot.1 = Some(value);
            }
        }
        temp_env::with_vars(all, f)
    }

    fn write_config(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    #[serial]
    fn test_defaults_without_file() {
        let config = with_env(&[], || Config::load_from(None, &[]).unwrap());
        assert_eq!(config, Config::default());
        assert_eq!(config.model, "claude-sonnet-4-6");
        assert_eq!(config.commit_style, "conventional");
        assert_eq!(config.language, "en");
        assert_eq!(config.max_diff_lines, 500);
        assert!(config.api_key.is_empty());
    }

    #[test]
    #[serial]
    fn test_file_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            "config.toml",
            "api_key = \"sk-ant-file\"\ncommit_style = \"gitmoji\"\nmax_diff_lines = 42\n",
        );

        let config = with_env(&[], || Config::load_from(Some(&path), &[]).unwrap());
        assert_eq!(config.api_key, "sk-ant-file");
        assert_eq!(config.commit_style, "gitmoji");
        assert_eq!(config.max_diff_lines, 42);
        assert_eq!(config.model, DEFAULT_MODEL);
    }

    #[test]
    #[serial]
    fn test_first_existing_search_path_wins() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.toml");
        let first = write_config(&dir, "first.toml", "language = \"pt\"\n");
        let second = write_config(&dir, "second.toml", "language = \"de\"\n");

        let config = with_env(&[], || Config::load_from(None, &[missing, first, second]).unwrap());
        assert_eq!(config.language, "pt");
    }

    #[test]
    #[serial]
    fn test_explicit_missing_file_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nope.toml");
        let err = with_env(&[], || Config::load_from(Some(&path), &[]).unwrap_err());
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    #[serial]
    fn test_invalid_toml_is_error() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "bad.toml", "model = [unterminated\n");
        let err = with_env(&[], || Config::load_from(Some(&path), &[]).unwrap_err());
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    #[serial]
    fn test_env_overrides_file() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            "config.toml",
            "api_key = \"from-file\"\nmodel = \"file-model\"\n",
        );

        let config = with_env(
            &[
                (ANTHROPIC_KEY_ENV_VAR, "sk-ant-env"),
                (MODEL_ENV_VAR, "env-model"),
                (MAX_DIFF_LINES_ENV_VAR, "50"),
            ],
            || Config::load_from(Some(&path), &[]).unwrap(),
        );
        assert_eq!(config.api_key, "sk-ant-env");
        assert_eq!(config.model, "env-model");
        assert_eq!(config.max_diff_lines, 50);
    }

    #[test]
    #[serial]
    fn test_anthropic_key_preferred_over_gemini() {
        let config = with_env(
            &[(ANTHROPIC_KEY_ENV_VAR, "sk-ant-1"), (GEMINI_KEY_ENV_VAR, "AIzaSy-2")],
            || Config::load_from(None, &[]).unwrap(),
        );
        assert_eq!(config.api_key, "sk-ant-1");

        let config = with_env(&[(GEMINI_KEY_ENV_VAR, "AIzaSy-2")], || {
            Config::load_from(None, &[]).unwrap()
        });
        assert_eq!(config.api_key, "AIzaSy-2");
    }

    #[test]
    #[serial]
    fn test_invalid_max_diff_lines_env_is_ignored() {
        let config = with_env(&[(MAX_DIFF_LINES_ENV_VAR, "lots")], || {
            Config::load_from(None, &[]).unwrap()
        });
        assert_eq!(config.max_diff_lines, DEFAULT_MAX_DIFF_LINES);
    }

    #[test]
    fn test_flag_overrides() {
        let config =
            Config::default().with_overrides(Some("gitmoji"), Some("gemini-2.5-flash"), None);
        assert_eq!(config.commit_style, "gitmoji");
        assert_eq!(config.model, "gemini-2.5-flash");
        assert_eq!(config.language, DEFAULT_LANGUAGE);
    }

    #[test]
    fn test_blank_flags_keep_values() {
        let config = Config::default().with_overrides(Some(""), Some("  "), Some(""));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_validate_requires_api_key() {
        let err = Config::default().validate().unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey));
        assert!(err.to_string().contains("ANTHROPIC_API_KEY"));

        let config = Config {
            api_key: "sk-ant-x".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
