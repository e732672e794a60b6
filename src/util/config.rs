//! Configuration file support for Gangway.
//!
//! Gangway supports two configuration file locations:
//! - Global: `~/.gangway/config.toml` - User-wide defaults
//! - Project: `.gangway/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Gangway configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Explicit tool paths, bypassing PATH lookup
    pub tools: ToolPaths,

    /// Toolchain settings
    pub toolchain: ToolchainSettings,
}

/// Explicit executable paths for external tools.
///
/// Any unset entry falls back to PATH lookup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolPaths {
    /// Path to the zig executable
    pub zig: Option<PathBuf>,

    /// Path to the conan executable
    pub conan: Option<PathBuf>,

    /// Path to the cmake executable
    pub cmake: Option<PathBuf>,

    /// Path to the ninja executable
    pub ninja: Option<PathBuf>,
}

/// Toolchain settings for cross-compilation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolchainSettings {
    /// Target triple passed to the zig backend (e.g. x86_64-windows-gnu)
    pub target: Option<String>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if the file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create config directory: {}", parent.display())
            })?;
        }

        let contents =
            toml::to_string_pretty(self).with_context(|| "failed to serialize config")?;

        std::fs::write(path, contents)
            .with_context(|| format!("failed to write config: {}", path.display()))?;

        Ok(())
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.tools.zig.is_some() {
            self.tools.zig = other.tools.zig;
        }
        if other.tools.conan.is_some() {
            self.tools.conan = other.tools.conan;
        }
        if other.tools.cmake.is_some() {
            self.tools.cmake = other.tools.cmake;
        }
        if other.tools.ninja.is_some() {
            self.tools.ninja = other.tools.ninja;
        }
        if other.toolchain.target.is_some() {
            self.toolchain.target = other.toolchain.target;
        }
    }

    /// Check if any settings are configured.
    pub fn has_overrides(&self) -> bool {
        self.tools.zig.is_some()
            || self.tools.conan.is_some()
            || self.tools.cmake.is_some()
            || self.tools.ninja.is_some()
            || self.toolchain.target.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_yields_default() {
        let tmp = TempDir::new().unwrap();
        let config = Config::load_or_default(&tmp.path().join("config.toml"));
        assert!(!config.has_overrides());
    }

    #[test]
    fn test_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");

        let mut config = Config::default();
        config.tools.zig = Some(PathBuf::from("/opt/zig/zig"));
        config.toolchain.target = Some("aarch64-windows-gnu".to_string());
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.tools.zig, Some(PathBuf::from("/opt/zig/zig")));
        assert_eq!(
            loaded.toolchain.target.as_deref(),
            Some("aarch64-windows-gnu")
        );
    }

    #[test]
    fn test_merge_project_wins() {
        let mut global = Config::default();
        global.tools.zig = Some(PathBuf::from("/global/zig"));
        global.tools.conan = Some(PathBuf::from("/global/conan"));

        let mut project = Config::default();
        project.tools.zig = Some(PathBuf::from("/project/zig"));

        global.merge(project);
        assert_eq!(global.tools.zig, Some(PathBuf::from("/project/zig")));
        assert_eq!(global.tools.conan, Some(PathBuf::from("/global/conan")));
    }

    #[test]
    fn test_parse_partial() {
        let config: Config = toml::from_str("[tools]\nzig = \"/usr/bin/zig\"\n").unwrap();
        assert_eq!(config.tools.zig, Some(PathBuf::from("/usr/bin/zig")));
        assert!(config.toolchain.target.is_none());
    }
}
