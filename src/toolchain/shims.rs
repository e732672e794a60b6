//! Synthesis of legacy-toolchain wrapper executables.
//!
//! Package-resolver recipes and the build files they generate expect a
//! GNU-style toolchain reachable as `gcc`, `g++`, `ar`, `ranlib`, and
//! `windres`. One synthesis routine instantiates all of them from a
//! declarative table: forwarding wrappers delegate straight to a backend
//! subcommand, while the resource-compiler wrapper routes through the
//! translator runner's hidden entry point (see [`crate::toolchain::windres`]).
//!
//! Wrappers are plain launcher files - `sh` scripts on Unix hosts, `.cmd`
//! batch files on Windows hosts - and are regenerated per session.
//! Synthesis is idempotent: identical inputs produce byte-identical files.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::util::fs::{ensure_dir, to_forward_slashes};

/// Hidden CLI entry point the windres wrapper dispatches to.
pub const RC_SHIM_SUBCOMMAND: &str = "rc-shim";

/// How a wrapped tool's invocation is rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShimStrategy {
    /// Forward all arguments to a backend subcommand, optionally pinning
    /// the target triple.
    Forward {
        subcommand: &'static str,
        with_target: bool,
    },
    /// Route through the resource-compiler argument translator.
    ResourceTranslator,
}

/// One row of the wrapper table.
#[derive(Debug, Clone, Copy)]
struct ShimSpec {
    tool: &'static str,
    strategy: ShimStrategy,
}

/// The complete facade: logical tool name -> translation strategy.
///
/// The driver wrappers carry the target triple; the archiver family does
/// not, since the backend's `ar`/`ranlib` reject one.
const SHIM_TABLE: &[ShimSpec] = &[
    ShimSpec {
        tool: "gcc",
        strategy: ShimStrategy::Forward {
            subcommand: "cc",
            with_target: true,
        },
    },
    ShimSpec {
        tool: "g++",
        strategy: ShimStrategy::Forward {
            subcommand: "c++",
            with_target: true,
        },
    },
    ShimSpec {
        tool: "ar",
        strategy: ShimStrategy::Forward {
            subcommand: "ar",
            with_target: false,
        },
    },
    ShimSpec {
        tool: "ranlib",
        strategy: ShimStrategy::Forward {
            subcommand: "ranlib",
            with_target: false,
        },
    },
    ShimSpec {
        tool: "windres",
        strategy: ShimStrategy::ResourceTranslator,
    },
];

/// The generated wrapper executables for one build session.
#[derive(Debug, Clone)]
pub struct ShimSet {
    dir: PathBuf,
    translator: PathBuf,
}

impl ShimSet {
    /// Directory holding the wrappers.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The translator runner the windres wrapper delegates to.
    pub fn translator(&self) -> &Path {
        &self.translator
    }

    /// Path of the C driver wrapper.
    pub fn cc(&self) -> PathBuf {
        self.wrapper("gcc")
    }

    /// Path of the C++ driver wrapper.
    pub fn cxx(&self) -> PathBuf {
        self.wrapper("g++")
    }

    /// Path of the archiver wrapper.
    pub fn ar(&self) -> PathBuf {
        self.wrapper("ar")
    }

    /// Path of the ranlib wrapper.
    pub fn ranlib(&self) -> PathBuf {
        self.wrapper("ranlib")
    }

    /// Path of the resource-compiler wrapper.
    pub fn rc(&self) -> PathBuf {
        self.wrapper("windres")
    }

    fn wrapper(&self, tool: &str) -> PathBuf {
        self.dir.join(format!("{}{}", tool, launcher_ext()))
    }
}

/// Materialize the wrapper set into `dir`.
///
/// `backend` is the cross-compiling executable every wrapper ultimately
/// delegates to; `translator_runner` is the executable providing the
/// hidden resource-shim entry point (normally the current binary).
pub fn synthesize(
    dir: &Path,
    backend: &Path,
    triple: &str,
    translator_runner: &Path,
) -> Result<ShimSet> {
    ensure_dir(dir)?;

    for spec in SHIM_TABLE {
        let path = dir.join(format!("{}{}", spec.tool, launcher_ext()));
        let contents = launcher_contents(spec, backend, triple, translator_runner);

        std::fs::write(&path, contents)
            .with_context(|| format!("failed to write wrapper: {}", path.display()))?;
        mark_executable(&path)?;
    }

    Ok(ShimSet {
        dir: dir.to_path_buf(),
        translator: translator_runner.to_path_buf(),
    })
}

/// The command line a wrapper runs, before platform quoting.
fn launcher_argv(
    spec: &ShimSpec,
    backend: &Path,
    triple: &str,
    translator_runner: &Path,
) -> Vec<String> {
    match spec.strategy {
        ShimStrategy::Forward {
            subcommand,
            with_target,
        } => {
            let mut argv = vec![to_forward_slashes(backend), subcommand.to_string()];
            if with_target {
                argv.push("-target".to_string());
                argv.push(triple.to_string());
            }
            argv
        }
        ShimStrategy::ResourceTranslator => vec![
            to_forward_slashes(translator_runner),
            RC_SHIM_SUBCOMMAND.to_string(),
            to_forward_slashes(backend),
        ],
    }
}

#[cfg(unix)]
fn launcher_contents(
    spec: &ShimSpec,
    backend: &Path,
    triple: &str,
    translator_runner: &Path,
) -> String {
    let argv = launcher_argv(spec, backend, triple, translator_runner);
    let quoted: Vec<String> = argv.iter().map(|a| format!("\"{}\"", a)).collect();
    format!("#!/bin/sh\nexec {} \"$@\"\n", quoted.join(" "))
}

#[cfg(windows)]
fn launcher_contents(
    spec: &ShimSpec,
    backend: &Path,
    triple: &str,
    translator_runner: &Path,
) -> String {
    let argv = launcher_argv(spec, backend, triple, translator_runner);
    let quoted: Vec<String> = argv.iter().map(|a| format!("\"{}\"", a)).collect();
    format!("@echo off\r\n{} %*\r\n", quoted.join(" "))
}

#[cfg(unix)]
fn launcher_ext() -> &'static str {
    ""
}

#[cfg(windows)]
fn launcher_ext() -> &'static str {
    ".cmd"
}

#[cfg(unix)]
fn mark_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
        .with_context(|| format!("failed to set permissions: {}", path.display()))
}

#[cfg(windows)]
fn mark_executable(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fixture() -> (TempDir, ShimSet) {
        let tmp = TempDir::new().unwrap();
        let set = synthesize(
            &tmp.path().join("wrappers"),
            Path::new("/opt/zig/zig"),
            "x86_64-windows-gnu",
            Path::new("/usr/local/bin/gangway"),
        )
        .unwrap();
        (tmp, set)
    }

    #[test]
    fn test_synthesize_creates_all_wrappers() {
        let (_tmp, set) = fixture();
        for path in [set.cc(), set.cxx(), set.ar(), set.ranlib(), set.rc()] {
            assert!(path.exists(), "{} missing", path.display());
        }
    }

    #[test]
    fn test_driver_wrapper_pins_subcommand_and_triple() {
        let (_tmp, set) = fixture();
        let cc = std::fs::read_to_string(set.cc()).unwrap();
        assert!(cc.contains("/opt/zig/zig"));
        assert!(cc.contains("\"cc\""));
        assert!(cc.contains("-target"));
        assert!(cc.contains("x86_64-windows-gnu"));

        let cxx = std::fs::read_to_string(set.cxx()).unwrap();
        assert!(cxx.contains("c++"));
    }

    #[test]
    fn test_archiver_wrappers_omit_triple() {
        let (_tmp, set) = fixture();
        for path in [set.ar(), set.ranlib()] {
            let contents = std::fs::read_to_string(path).unwrap();
            assert!(!contents.contains("-target"));
        }
    }

    #[test]
    fn test_windres_wrapper_routes_through_translator() {
        let (_tmp, set) = fixture();
        let rc = std::fs::read_to_string(set.rc()).unwrap();
        assert!(rc.contains("gangway"));
        assert!(rc.contains(RC_SHIM_SUBCOMMAND));
        assert!(rc.contains("/opt/zig/zig"));
    }

    #[test]
    fn test_synthesis_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("wrappers");
        let backend = Path::new("/opt/zig/zig");
        let runner = Path::new("/usr/local/bin/gangway");

        let set = synthesize(&dir, backend, "x86_64-windows-gnu", runner).unwrap();
        let first: Vec<Vec<u8>> = [set.cc(), set.cxx(), set.ar(), set.ranlib(), set.rc()]
            .iter()
            .map(|p| std::fs::read(p).unwrap())
            .collect();

        let set = synthesize(&dir, backend, "x86_64-windows-gnu", runner).unwrap();
        let second: Vec<Vec<u8>> = [set.cc(), set.cxx(), set.ar(), set.ranlib(), set.rc()]
            .iter()
            .map(|p| std::fs::read(p).unwrap())
            .collect();

        assert_eq!(first, second);
    }

    #[cfg(unix)]
    #[test]
    fn test_wrappers_are_executable() {
        use std::os::unix::fs::PermissionsExt;

        let (_tmp, set) = fixture();
        let mode = std::fs::metadata(set.cc()).unwrap().permissions().mode();
        assert_ne!(mode & 0o111, 0);
    }
}
