//! Implementation of `gangway install`: the dependency-resolution session.
//!
//! One session prepares an isolated resolver environment under the working
//! directory, fronts the backend compiler with freshly synthesized shims,
//! then drives `conan install` while classifying its streamed output into
//! build phases for the progress spinner. Success is exactly "the resolver
//! exited zero"; a failed resolution is reported once with the trailing
//! log lines and never retried.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::phase::BuildPhase;
use crate::core::session::BuildSession;
use crate::core::InstallOutcome;
use crate::toolchain::shims;
use crate::util::context::GlobalContext;
use crate::util::fs::{ensure_dir, remove_file_if_exists, to_forward_slashes, write_string};
use crate::util::process::ProcessBuilder;
use crate::util::shell::Shell;
use crate::util::tools::{probe_version, Tool, ToolAvailability, ToolResolver};

/// Default resolver profile written on first use.
///
/// The backend's clang masquerades as MinGW gcc 11 so prebuilt binary
/// queries and recipe compiler checks take the GNU code paths.
const DEFAULT_PROFILE: &str = "[settings]\n\
    os=Windows\n\
    arch=x86_64\n\
    compiler=gcc\n\
    compiler.version=11\n\
    compiler.libcxx=libstdc++11\n\
    compiler.threads=posix\n\
    compiler.exception=seh\n\
    build_type=Release\n";

/// Options for the install operation.
#[derive(Debug, Clone)]
pub struct InstallOptions {
    /// Package reference to resolve (e.g. `zlib/1.3.1`)
    pub package: String,
}

/// Resolve and deploy a package plus its dependency metadata.
///
/// Environment preparation failures are hard errors; a resolver that runs
/// and fails is a reported [`InstallOutcome`], not an `Err`.
pub fn install_package(
    ctx: &GlobalContext,
    resolver: &dyn ToolResolver,
    shell: &Shell,
    opts: &InstallOptions,
) -> Result<InstallOutcome> {
    let conan = resolver.resolve(Tool::Conan)?;
    let cmake = resolver.resolve(Tool::Cmake)?;
    let ninja = resolver.resolve(Tool::Ninja)?;
    let zig = resolver.resolve(Tool::Zig)?;

    if ctx.is_verbose() {
        report_tool_versions(shell, &[(Tool::Conan, &conan), (Tool::Zig, &zig)]);
    }

    let runner = std::env::current_exe().context("failed to locate the gangway executable")?;
    let shim_set = shims::synthesize(
        &ctx.wrappers_dir(),
        &zig,
        ctx.target_triple(),
        &runner,
    )?;

    let conan_home = ctx.conan_home();
    ensure_profile(&conan_home)?;

    // A stale single-package manifest would shadow the --requires request.
    remove_file_if_exists(&ctx.workdir().join("conanfile.txt"))?;

    let env = session_env(ctx, &shim_set, &[&cmake, &ninja])?;

    let extra_vars = serde_json::json!({
        "CMAKE_AR": to_forward_slashes(&shim_set.ar()),
        "CMAKE_RANLIB": to_forward_slashes(&shim_set.ranlib()),
    })
    .to_string();

    let mut cmd = ProcessBuilder::new(&conan)
        .args(["install", "--requires"])
        .arg(&opts.package)
        .args([
            "--build=missing",
            "--deployer=full_deploy",
            "-g",
            "PkgConfigDeps",
        ])
        .arg(format!("--output-folder={}", ctx.deps_dir().display()))
        .args(["-c", "tools.cmake.cmaketoolchain:generator=Ninja"])
        .arg("-c")
        .arg(format!(
            "tools.cmake.cmaketoolchain:extra_variables={}",
            extra_vars
        ))
        .cwd(ctx.workdir());
    for (key, value) in &env {
        cmd = cmd.env(key, value);
    }

    tracing::debug!("resolver command: {}", cmd.display_command());

    let mut session = BuildSession::new(&opts.package, ctx.workdir());
    let spinner = shell.spinner(format!("Initializing resolver for {}...", opts.package));
    let verbose = shell.is_verbose();

    let status = cmd.stream(|line| {
        session.record(line);
        if verbose {
            eprintln!("  {}", line);
        }
        if let Some(phase) = BuildPhase::classify(line) {
            spinner.set_message(phase.description(session.package()));
        }
    })?;
    spinner.finish_and_clear();

    Ok(session.finish(status.code()))
}

/// Write the default resolver profile unless one already exists.
fn ensure_profile(conan_home: &Path) -> Result<()> {
    let profile = conan_home.join("profiles").join("default");
    if !profile.exists() {
        write_string(&profile, DEFAULT_PROFILE)?;
    }
    Ok(())
}

/// Assemble the isolated environment for the resolver child process.
fn session_env(
    ctx: &GlobalContext,
    shim_set: &shims::ShimSet,
    path_tools: &[&PathBuf],
) -> Result<HashMap<String, String>> {
    let mut env = HashMap::new();

    env.insert(
        "CONAN_HOME".to_string(),
        to_forward_slashes(&ctx.conan_home()),
    );

    // Forward slashes keep libtool-style scripts from eating the paths.
    env.insert("CC".to_string(), to_forward_slashes(&shim_set.cc()));
    env.insert("CXX".to_string(), to_forward_slashes(&shim_set.cxx()));
    env.insert("RC".to_string(), to_forward_slashes(&shim_set.rc()));

    // Legacy dependency sources trip modern clang warnings; disable them
    // wholesale so the build proceeds.
    env.insert("CFLAGS".to_string(), "-w".to_string());
    env.insert("CXXFLAGS".to_string(), "-w".to_string());

    let mut paths: Vec<PathBuf> = vec![shim_set.dir().to_path_buf()];
    for tool in path_tools {
        if let Some(dir) = tool.parent() {
            paths.push(dir.to_path_buf());
        }
    }
    if let Some(existing) = std::env::var_os("PATH") {
        paths.extend(std::env::split_paths(&existing));
    }
    let joined = std::env::join_paths(paths).context("failed to assemble PATH")?;
    env.insert("PATH".to_string(), joined.to_string_lossy().into_owned());

    ensure_dir(&ctx.deps_dir())?;

    Ok(env)
}

fn report_tool_versions(shell: &Shell, tools: &[(Tool, &PathBuf)]) {
    for (tool, path) in tools {
        match probe_version(*tool, path) {
            Ok(ToolAvailability::Available { version }) => {
                shell.note(format!("{} {} ({})", tool, version, path.display()));
            }
            Ok(ToolAvailability::Unversioned) => {
                shell.note(format!("{} ({})", tool, path.display()));
            }
            Err(e) => tracing::debug!("version probe for {} failed: {}", tool, e),
        }
    }
}
