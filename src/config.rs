//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::content::{SiteContent, SiteSettings};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Site configuration: shared settings plus native-only options
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SiteConfig {
    #[serde(flatten)]
    pub settings: SiteSettings,

    /// TOML file replacing the built-in site content
    #[serde(default)]
    pub content_file: Option<PathBuf>,
}

/// Result of the config file lookup
///
/// Runs before logging is set up, so what happened is kept here and reported
/// with [`ConfigLookup::log`] once a subscriber is installed.
#[derive(Debug)]
pub struct ConfigLookup {
    pub config: Config,
    /// File the config came from; `None` means defaults plus environment
    pub loaded_from: Option<PathBuf>,
    /// Files that exist but failed to load, in lookup order
    pub skipped: Vec<(PathBuf, ConfigError)>,
}

impl ConfigLookup {
    pub fn log(&self) {
        for (path, e) in &self.skipped {
            tracing::warn!("Failed to load config from {:?}: {}", path, e);
        }
        match &self.loaded_from {
            Some(path) => tracing::info!("Loaded config from {:?}", path),
            None => tracing::debug!("Using default config with environment overrides"),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = read(path)?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> ConfigLookup {
        let config_paths: Vec<PathBuf> = [
            dirs::config_dir().map(|p| p.join("pasag-tree").join("config.toml")),
            Some(PathBuf::from("./config.toml")),
        ]
        .into_iter()
        .flatten()
        .collect();

        Self::load_first(&config_paths)
    }

    /// Load the first of `paths` that exists and parses
    pub fn load_first(paths: &[PathBuf]) -> ConfigLookup {
        let mut skipped = Vec::new();

        for path in paths.iter().filter(|p| p.exists()) {
            match Self::load_with_env(path) {
                Ok(config) => {
                    return ConfigLookup {
                        config,
                        loaded_from: Some(path.clone()),
                        skipped,
                    }
                }
                Err(e) => skipped.push((path.clone(), e)),
            }
        }

        ConfigLookup {
            config: Self::from_env(),
            loaded_from: None,
            skipped,
        }
    }

    /// Explicit path if given, otherwise the default lookup
    pub fn resolve(path: Option<&Path>) -> Result<ConfigLookup, ConfigError> {
        match path {
            Some(path) => Ok(ConfigLookup {
                config: Self::load_with_env(path)?,
                loaded_from: Some(path.to_path_buf()),
                skipped: Vec::new(),
            }),
            None => Ok(Self::load_default()),
        }
    }

    /// Site content: the configured content file, or the built-in text
    pub fn site_content(&self) -> Result<SiteContent, ConfigError> {
        match &self.site.content_file {
            Some(path) => load_content(path),
            None => Ok(SiteContent::default()),
        }
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply `PASAG_*` overrides looked up through `var`
    fn apply_overrides<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dataset) = var("PASAG_DATASET") {
            self.site.settings.dataset = dataset;
        }
        if let Some(pdf_dir) = var("PASAG_PDF_DIR") {
            self.site.settings.pdf_dir = pdf_dir;
        }

        if let Some(level) = var("PASAG_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("PASAG_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

fn read(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        error: e.to_string(),
    })
}

/// Load replacement site content from a TOML file
pub fn load_content(path: &Path) -> Result<SiteContent, ConfigError> {
    let content = read(path)?;
    toml::from_str(&content).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        error: e.to_string(),
    })
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Pasag Family Tree Configuration
#
# Environment variables override these settings:
# - PASAG_DATASET
# - PASAG_PDF_DIR
# - PASAG_LOG_LEVEL
# - PASAG_LOG_FORMAT

[site]
# Family dataset: a file path or an http(s) URL
dataset = "pasagFamily.json"

# Directory member PDFs are served from
pdf_dir = "pdfs"

# Generations shown in the home stats block
generations = 5

# Tree node started on page load
default_root = "1"

# Initial tree expansion depth
expansion_depth = 1

# Tree nodes that are never drawn
hidden_nodes = ["Folks", "Forefather II", "Forefather III", "Grandfather I", "Grandfather II"]

# Optional TOML file replacing the built-in site text
# content_file = "content.toml"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_parses() {
        let config: Config = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config.site.settings, SiteSettings::default());
        assert!(config.site.content_file.is_none());
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.is_json());
    }

    #[test]
    fn test_partial_config() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(
            &path,
            "[site]\ndataset = \"https://example.org/family.json\"\n\n[logging]\nformat = \"json\"\n",
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.site.settings.dataset, "https://example.org/family.json");
        assert_eq!(config.site.settings.pdf_dir, "pdfs");
        assert_eq!(config.site.settings.generations, 5);
        assert!(config.logging.is_json());
    }

    #[test]
    fn test_missing_file() {
        let err = Config::load(Path::new("/nonexistent/pasag.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_invalid_toml() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[site\ndataset = ").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_lookup_skips_malformed_file() {
        let temp = TempDir::new().unwrap();
        let broken = temp.path().join("broken.toml");
        let good = temp.path().join("config.toml");
        std::fs::write(&broken, "[site\ndataset = ").unwrap();
        std::fs::write(&good, "[site]\ngenerations = 6\n").unwrap();

        let paths = vec![temp.path().join("absent.toml"), broken.clone(), good.clone()];
        let lookup = Config::load_first(&paths);

        assert_eq!(lookup.loaded_from, Some(good));
        assert_eq!(lookup.config.site.settings.generations, 6);
        assert_eq!(lookup.skipped.len(), 1);
        assert_eq!(lookup.skipped[0].0, broken);
        assert!(matches!(lookup.skipped[0].1, ConfigError::Parse { .. }));
        lookup.log();
    }

    #[test]
    fn test_lookup_falls_back_to_defaults() {
        let temp = TempDir::new().unwrap();
        let broken = temp.path().join("config.toml");
        std::fs::write(&broken, "not toml [").unwrap();

        let lookup = Config::load_first(&[broken]);
        assert!(lookup.loaded_from.is_none());
        assert_eq!(lookup.skipped.len(), 1);

        let lookup = Config::load_first(&[]);
        assert!(lookup.loaded_from.is_none());
        assert!(lookup.skipped.is_empty());
    }

    #[test]
    fn test_resolve_explicit_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("site.toml");
        std::fs::write(&path, "[logging]\nlevel = \"warn\"\n").unwrap();

        let lookup = Config::resolve(Some(&path)).unwrap();
        assert_eq!(lookup.loaded_from.as_deref(), Some(path.as_path()));
        assert!(lookup.skipped.is_empty());

        let missing = temp.path().join("missing.toml");
        assert!(matches!(
            Config::resolve(Some(&missing)),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("PASAG_DATASET", "other.json"),
            ("PASAG_LOG_LEVEL", "debug"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.site.settings.dataset, "other.json");
        assert_eq!(config.site.settings.pdf_dir, "pdfs");
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_content_file() {
        let temp = TempDir::new().unwrap();
        let content_path = temp.path().join("content.toml");
        std::fs::write(
            &content_path,
            r#"
home_title = "Reunion 2026"
recent_updates = ["Added two cousins"]

[about]
title = "About"
paragraphs = ["Hello"]

[how_to_use]
title = "Help"
"#,
        )
        .unwrap();

        let mut config = Config::default();
        assert_eq!(config.site_content().unwrap(), SiteContent::default());

        config.site.content_file = Some(content_path);
        let content = config.site_content().unwrap();
        assert_eq!(content.home_title, "Reunion 2026");
        assert_eq!(content.recent_updates, vec!["Added two cousins"]);
        assert!(content.how_to_use.paragraphs.is_empty());
    }
}
