//! Configuration loading
//!
//! Each setting resolves in priority order:
//! 1. Command-line argument or environment variable (merged by the binary)
//! 2. TOML config file
//! 3. Compiled default
//!
//! A missing config file is not an error: compiled defaults apply.

use crate::models::DEFAULT_SUBJECTS;
use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default HTTP bind address
pub const DEFAULT_BIND: &str = "127.0.0.1:3000";

/// Default request body limit (5 MiB)
pub const DEFAULT_BODY_LIMIT_BYTES: usize = 5 * 1024 * 1024;

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "UASA_CONFIG";

/// Bootstrap configuration as read from TOML
///
/// Every field is optional; absent fields fall through to compiled defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub bind: Option<String>,

    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// Directory for temporary uploaded roster files
    #[serde(default)]
    pub upload_dir: Option<PathBuf>,

    /// Directory served as static files
    #[serde(default)]
    pub static_dir: Option<PathBuf>,

    #[serde(default)]
    pub body_limit_bytes: Option<usize>,

    /// Subject codes pre-populated on imported students
    #[serde(default)]
    pub subjects: Option<Vec<String>>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    /// Log level or filter directive (trace, debug, info, warn, error)
    #[serde(default)]
    pub level: Option<String>,
}

impl TomlConfig {
    /// Parse a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        toml::from_str(&content).map_err(|e| {
            Error::Config(format!("Failed to parse TOML {}: {}", path.display(), e))
        })
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Failed to parse TOML: {}", e)))
    }
}

/// Command-line / environment overrides
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_file: Option<PathBuf>,
    pub bind: Option<String>,
    pub database_path: Option<PathBuf>,
    pub upload_dir: Option<PathBuf>,
    pub static_dir: Option<PathBuf>,
}

/// Fully resolved service configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub bind: String,
    pub database_path: PathBuf,
    pub upload_dir: PathBuf,
    pub static_dir: PathBuf,
    pub body_limit_bytes: usize,
    pub subjects: Vec<String>,
    pub log_level: String,
    /// Config file the values were read from, if any
    pub config_file: Option<PathBuf>,
}

impl Config {
    /// Locate and read the config file, then apply overrides
    ///
    /// A file named by `--config` or `UASA_CONFIG` must exist. The platform
    /// default location is optional.
    pub fn load(overrides: ConfigOverrides) -> Result<Self> {
        let explicit_path = overrides
            .config_file
            .clone()
            .or_else(|| std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from));

        if let Some(path) = &explicit_path {
            if !path.exists() {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
        }

        match explicit_path.or_else(default_config_path) {
            Some(path) if path.exists() => {
                let toml_config = TomlConfig::load(&path)?;
                let mut config = Self::resolve(overrides, toml_config)?;
                config.config_file = Some(path);
                Ok(config)
            }
            _ => Self::resolve(overrides, TomlConfig::default()),
        }
    }

    /// Merge overrides over TOML values over compiled defaults
    pub fn resolve(overrides: ConfigOverrides, toml_config: TomlConfig) -> Result<Self> {
        let subjects = match toml_config.subjects {
            Some(subjects) => {
                let subjects: Vec<String> =
                    subjects.into_iter().map(|s| s.trim().to_string()).collect();
                if subjects.is_empty() || subjects.iter().any(String::is_empty) {
                    return Err(Error::Config(
                        "subjects must be a non-empty list of non-blank codes".to_string(),
                    ));
                }
                subjects
            }
            None => DEFAULT_SUBJECTS.iter().map(|s| s.to_string()).collect(),
        };

        let body_limit_bytes = toml_config
            .body_limit_bytes
            .unwrap_or(DEFAULT_BODY_LIMIT_BYTES);
        if body_limit_bytes == 0 {
            return Err(Error::Config("body_limit_bytes must be positive".to_string()));
        }

        Ok(Self {
            bind: overrides
                .bind
                .or(toml_config.bind)
                .unwrap_or_else(|| DEFAULT_BIND.to_string()),
            database_path: overrides
                .database_path
                .or(toml_config.database_path)
                .unwrap_or_else(default_database_path),
            upload_dir: overrides
                .upload_dir
                .or(toml_config.upload_dir)
                .unwrap_or_else(default_upload_dir),
            static_dir: overrides
                .static_dir
                .or(toml_config.static_dir)
                .unwrap_or_else(|| PathBuf::from("public")),
            body_limit_bytes,
            subjects,
            log_level: toml_config
                .logging
                .level
                .unwrap_or_else(|| "info".to_string()),
            config_file: None,
        })
    }
}

/// `<config dir>/uasa/config.toml` for the current platform
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("uasa").join("config.toml"))
}

/// `<local data dir>/uasa/uasa.db`, or `./uasa_data/uasa.db` when unknown
fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("uasa"))
        .unwrap_or_else(|| PathBuf::from("./uasa_data"))
        .join("uasa.db")
}

fn default_upload_dir() -> PathBuf {
    std::env::temp_dir().join("uasa-uploads")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_toml_or_overrides() {
        let config = Config::resolve(ConfigOverrides::default(), TomlConfig::default()).unwrap();

        assert_eq!(config.bind, DEFAULT_BIND);
        assert_eq!(config.body_limit_bytes, DEFAULT_BODY_LIMIT_BYTES);
        assert_eq!(config.subjects.len(), 13);
        assert_eq!(config.static_dir, PathBuf::from("public"));
        assert_eq!(config.log_level, "info");
        assert!(config.database_path.ends_with("uasa.db"));
    }

    #[test]
    fn test_toml_values_used_when_no_override() {
        let toml_config = TomlConfig::parse(
            r#"
            bind = "0.0.0.0:8080"
            database_path = "/srv/uasa/kelas.db"
            subjects = ["bm", "bi"]

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();

        let config = Config::resolve(ConfigOverrides::default(), toml_config).unwrap();
        assert_eq!(config.bind, "0.0.0.0:8080");
        assert_eq!(config.database_path, PathBuf::from("/srv/uasa/kelas.db"));
        assert_eq!(config.subjects, vec!["bm", "bi"]);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_override_beats_toml() {
        let toml_config = TomlConfig::parse(r#"bind = "0.0.0.0:8080""#).unwrap();
        let overrides = ConfigOverrides {
            bind: Some("127.0.0.1:9999".to_string()),
            ..Default::default()
        };

        let config = Config::resolve(overrides, toml_config).unwrap();
        assert_eq!(config.bind, "127.0.0.1:9999");
    }

    #[test]
    fn test_empty_subject_list_rejected() {
        let toml_config = TomlConfig::parse("subjects = []").unwrap();
        let result = Config::resolve(ConfigOverrides::default(), toml_config);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_blank_subject_code_rejected() {
        let toml_config = TomlConfig::parse(r#"subjects = ["bm", "  "]"#).unwrap();
        assert!(Config::resolve(ConfigOverrides::default(), toml_config).is_err());
    }

    #[test]
    fn test_zero_body_limit_rejected() {
        let toml_config = TomlConfig::parse("body_limit_bytes = 0").unwrap();
        assert!(Config::resolve(ConfigOverrides::default(), toml_config).is_err());
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let result = TomlConfig::parse("bind = [");
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
