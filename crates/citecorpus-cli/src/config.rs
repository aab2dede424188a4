//! Configuration loading from TOML files

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use citecorpus_store::{BuildConfig, OpenConfig};
use serde::Deserialize;

/// Global configuration for citecorpus
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub build: BuildSection,
    pub open: OpenSection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BuildSection {
    pub batch_size: usize,
    pub memory_limit: String,
    pub threads: usize,
    pub checkpoint_threshold: String,
}

impl Default for BuildSection {
    fn default() -> Self {
        let d = BuildConfig::default();
        Self {
            batch_size: d.batch_size,
            memory_limit: d.memory_limit,
            threads: d.threads,
            checkpoint_threshold: d.checkpoint_threshold,
        }
    }
}

impl BuildSection {
    pub fn to_build_config(&self) -> BuildConfig {
        BuildConfig {
            batch_size: self.batch_size,
            memory_limit: self.memory_limit.clone(),
            threads: self.threads,
            checkpoint_threshold: self.checkpoint_threshold.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct OpenSection {
    pub train_frac: f64,
    pub decode_chunk: usize,
}

impl Default for OpenSection {
    fn default() -> Self {
        let d = OpenConfig::default();
        Self {
            train_frac: d.train_frac,
            decode_chunk: d.decode_chunk,
        }
    }
}

impl OpenSection {
    pub fn to_open_config(self) -> OpenConfig {
        OpenConfig {
            train_frac: self.train_frac,
            decode_chunk: self.decode_chunk,
        }
    }
}

impl Config {
    /// Load configuration from default locations
    ///
    /// Search order:
    /// 1. ./citecorpus.toml (current directory)
    /// 2. ~/.config/citecorpus/config.toml
    ///
    /// If no config file found, returns default config.
    pub fn load() -> Result<Self> {
        let local_config = PathBuf::from("citecorpus.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = directories::ProjectDirs::from("", "", "citecorpus") {
            let user_config = config_dir.config_dir().join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        log::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.build.batch_size, 1024);
        assert_eq!(config.open.train_frac, 0.8);
        assert!(config.build.threads >= 1);
    }

    #[test]
    fn parse_config_toml() {
        let toml = r#"
[build]
batch_size = 4096
memory_limit = "16GB"

[open]
train_frac = 0.9
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.build.batch_size, 4096);
        assert_eq!(config.build.memory_limit, "16GB");
        assert_eq!(config.build.checkpoint_threshold, "1GB");
        assert_eq!(config.open.train_frac, 0.9);
        assert_eq!(config.open.decode_chunk, 8192);
    }

    #[test]
    fn sections_convert_to_library_configs() {
        let config = Config::default();
        let build = config.build.to_build_config();
        assert_eq!(build.batch_size, config.build.batch_size);
        let open = config.open.to_open_config();
        assert!(open.validate().is_ok());
    }

    #[test]
    fn from_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::from_file(&dir.path().join("nope.toml")).is_err());
    }
}
