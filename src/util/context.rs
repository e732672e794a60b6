//! Global context for Gangway operations.
//!
//! Provides centralized access to configuration, paths, and environment.
//!
//! The working directory is an explicit field, never read implicitly from
//! the process, so repeated or concurrent sessions against different
//! directories stay independent (and testable).

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{Context, Result};
use directories::ProjectDirs;

use crate::util::config::Config;

/// Fixed subdirectory (under the working directory) that the package
/// resolver deploys artifacts and `.pc` files into.
pub const DEPS_DIR: &str = "gangway_modules";

/// Fixed subdirectory holding the resolver's isolated on-disk home.
pub const CONAN_HOME_DIR: &str = ".conan_store";

/// Fixed subdirectory for the zig compilation caches.
pub const ZIG_CACHE_DIR: &str = ".zig-cache";

/// Project directories for Gangway
static PROJECT_DIRS: LazyLock<Option<ProjectDirs>> =
    LazyLock::new(|| ProjectDirs::from("com", "gangway", "gangway"));

/// Global context containing configuration and paths.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Working directory for this session
    workdir: PathBuf,

    /// Home directory for global Gangway data (~/.gangway/)
    home: PathBuf,

    /// Whether to use verbose output
    verbose: bool,

    /// Merged configuration (global overlaid with project)
    config: Config,
}

impl GlobalContext {
    /// Create a new GlobalContext rooted at the given working directory.
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        let workdir = workdir.into();

        let home = PROJECT_DIRS
            .as_ref()
            .map(|dirs| dirs.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from(".gangway"));

        let mut config = Config::load_or_default(&home.join("config.toml"));
        config.merge(Config::load_or_default(
            &workdir.join(".gangway").join("config.toml"),
        ));

        GlobalContext {
            workdir,
            home,
            verbose: false,
            config,
        }
    }

    /// Create a GlobalContext for the current process directory.
    pub fn from_cwd() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        Ok(Self::new(cwd))
    }

    /// Set verbose mode.
    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    /// Get the working directory for this session.
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Get the Gangway home directory (~/.gangway/).
    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Get the merged configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the dependency-artifact directory under the working tree.
    pub fn deps_dir(&self) -> PathBuf {
        self.workdir.join(DEPS_DIR)
    }

    /// Get the isolated package-resolver home under the working tree.
    pub fn conan_home(&self) -> PathBuf {
        self.workdir.join(CONAN_HOME_DIR)
    }

    /// Get the zig cache directory under the working tree.
    pub fn zig_cache_dir(&self) -> PathBuf {
        self.workdir.join(ZIG_CACHE_DIR)
    }

    /// Get the project-local Gangway directory.
    pub fn project_dir(&self) -> PathBuf {
        self.workdir.join(".gangway")
    }

    /// Get the session-scoped wrapper directory.
    pub fn wrappers_dir(&self) -> PathBuf {
        self.project_dir().join("wrappers")
    }

    /// Check if verbose mode is enabled.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Target triple for the cross-compiling backend.
    ///
    /// Configuration may override the built-in default.
    pub fn target_triple(&self) -> &str {
        self.config
            .toolchain
            .target
            .as_deref()
            .unwrap_or(crate::toolchain::DEFAULT_TARGET_TRIPLE)
    }
}
