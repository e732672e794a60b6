//! External tool resolution.
//!
//! The core treats every external executable purely as "path to runnable
//! tool". The `ToolResolver` trait is the seam: the default implementation
//! consults configuration overrides and then PATH, but callers (and tests)
//! may substitute any source of tool paths.

use std::fmt;
use std::path::PathBuf;

use anyhow::Result;
use thiserror::Error;

use crate::util::config::Config;
use crate::util::process::ProcessBuilder;

/// Logical external tools Gangway drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    /// The zig cross-compiling backend
    Zig,
    /// The conan package resolver
    Conan,
    /// CMake, invoked indirectly by conan recipes
    Cmake,
    /// Ninja, the generator conan is pointed at
    Ninja,
}

impl Tool {
    /// Executable name to look up on PATH.
    pub fn exe_name(&self) -> &'static str {
        match self {
            Tool::Zig => "zig",
            Tool::Conan => "conan",
            Tool::Cmake => "cmake",
            Tool::Ninja => "ninja",
        }
    }

    /// Hint for how to install the tool when it is missing.
    fn install_hint(&self) -> &'static str {
        match self {
            Tool::Zig => "https://ziglang.org/download/",
            Tool::Conan => "pip install conan",
            Tool::Cmake => "https://cmake.org/download/",
            Tool::Ninja => "https://ninja-build.org/",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.exe_name())
    }
}

/// Tool resolution failure.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The tool could not be found via configuration or PATH.
    #[error("{tool} not found on PATH; install it ({hint}) or set [tools] {tool} in config.toml")]
    NotFound {
        /// The logical tool name
        tool: &'static str,
        /// Installation hint
        hint: &'static str,
    },

    /// A configured path points at something that is not executable.
    #[error("configured path for {tool} does not exist: {path}")]
    BadOverride {
        /// The logical tool name
        tool: &'static str,
        /// The configured path
        path: PathBuf,
    },
}

/// Source of usable local executable paths for logical tools.
pub trait ToolResolver {
    /// Resolve a logical tool to a runnable executable path.
    fn resolve(&self, tool: Tool) -> Result<PathBuf, ToolError>;
}

/// Resolver backed by configuration overrides and PATH lookup.
#[derive(Debug, Clone, Default)]
pub struct SystemToolResolver {
    overrides: Config,
}

impl SystemToolResolver {
    /// Create a resolver honoring the given configuration overrides.
    pub fn new(config: &Config) -> Self {
        SystemToolResolver {
            overrides: config.clone(),
        }
    }

    fn override_for(&self, tool: Tool) -> Option<&PathBuf> {
        match tool {
            Tool::Zig => self.overrides.tools.zig.as_ref(),
            Tool::Conan => self.overrides.tools.conan.as_ref(),
            Tool::Cmake => self.overrides.tools.cmake.as_ref(),
            Tool::Ninja => self.overrides.tools.ninja.as_ref(),
        }
    }
}

impl ToolResolver for SystemToolResolver {
    fn resolve(&self, tool: Tool) -> Result<PathBuf, ToolError> {
        if let Some(path) = self.override_for(tool) {
            if path.exists() {
                return Ok(path.clone());
            }
            return Err(ToolError::BadOverride {
                tool: tool.exe_name(),
                path: path.clone(),
            });
        }

        which::which(tool.exe_name()).map_err(|_| ToolError::NotFound {
            tool: tool.exe_name(),
            hint: tool.install_hint(),
        })
    }
}

/// Probed tool availability.
#[derive(Debug, Clone)]
pub enum ToolAvailability {
    /// Tool is present and reported a parseable version
    Available {
        /// Detected version
        version: semver::Version,
    },
    /// Tool is present but its version output was not parseable
    Unversioned,
}

/// Probe a resolved tool's version.
///
/// Zig prints a bare version on `zig version`; conan prints
/// `Conan version X.Y.Z`. Unparseable output degrades to `Unversioned`
/// rather than failing, since the probe is purely diagnostic.
pub fn probe_version(tool: Tool, path: &PathBuf) -> Result<ToolAvailability> {
    let arg = match tool {
        Tool::Zig => "version",
        _ => "--version",
    };

    let output = ProcessBuilder::new(path).arg(arg).exec()?;
    let text = String::from_utf8_lossy(&output.stdout);

    let version = text
        .split_whitespace()
        .filter_map(|word| semver::Version::parse(word.trim()).ok())
        .next();

    Ok(match version {
        Some(version) => ToolAvailability::Available { version },
        None => ToolAvailability::Unversioned,
    })
}
