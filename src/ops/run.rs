//! Implementation of `gangway run`: single-file compile-and-execute.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::Strictness;
use crate::pkgconf::{self, DependencyFlags};
use crate::toolchain::Language;
use crate::util::context::GlobalContext;
use crate::util::fs::{find_bin_dirs, to_forward_slashes};
use crate::util::process::{is_interrupt, ProcessBuilder};
use crate::util::shell::{Shell, Status};
use crate::util::tools::{Tool, ToolResolver};

/// Options for the run operation.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Source file to compile and execute
    pub source: PathBuf,
}

/// Compile one source file against the resolved dependency flags and, on
/// success, execute it. Returns the executed program's exit code; a
/// compilation failure surfaces the backend diagnostics and returns the
/// compiler's exit code without attempting execution.
pub fn compile_and_run(
    ctx: &GlobalContext,
    resolver: &dyn ToolResolver,
    shell: &Shell,
    opts: &RunOptions,
) -> Result<i32> {
    let zig = resolver.resolve(Tool::Zig)?;

    let lang = Language::from_source(&opts.source);
    let exe = exe_path(&opts.source);
    let deps_dir = ctx.deps_dir();

    // Dependencies are optional; an empty directory simply contributes no
    // flags.
    let flags = pkgconf::parse_dir(&deps_dir, Strictness::Permissive)?;

    let argv = compile_argv(&opts.source, lang, ctx.target_triple(), &flags, &exe);

    shell.status(Status::Compiling, opts.source.display());
    let zig_cache = to_forward_slashes(&ctx.zig_cache_dir());
    let output = ProcessBuilder::new(&zig)
        .args(&argv)
        .cwd(ctx.workdir())
        .env("ZIG_GLOBAL_CACHE_DIR", &zig_cache)
        .env("ZIG_LOCAL_CACHE_DIR", &zig_cache)
        .exec()?;

    if !output.status.success() {
        shell.error("compilation failed");
        eprint!("{}", String::from_utf8_lossy(&output.stderr));
        return Ok(output.status.code().unwrap_or(1));
    }

    shell.status(Status::Running, exe.display());
    execute(ctx, &deps_dir, &exe)
}

/// Assemble the backend compile invocation.
///
/// Fixed flags first (warnings off, fixed optimization, the C++ standard
/// for C++ sources, the target triple), then the discovered dependency
/// flags, then the output path.
fn compile_argv(
    source: &Path,
    lang: Language,
    triple: &str,
    flags: &DependencyFlags,
    exe: &Path,
) -> Vec<String> {
    let mut argv = vec![
        lang.driver_subcommand().to_string(),
        source.display().to_string(),
        "-w".to_string(),
        "-O2".to_string(),
    ];
    if lang == Language::Cxx {
        argv.push("-std=c++17".to_string());
    }
    argv.push("-target".to_string());
    argv.push(triple.to_string());
    argv.extend(flags.cflags.iter().cloned());
    argv.extend(flags.libs.iter().cloned());
    argv.push("-o".to_string());
    argv.push(exe.display().to_string());
    argv
}

/// Derive the output executable path from the source file name.
fn exe_path(source: &Path) -> PathBuf {
    source.with_extension("exe")
}

/// Execute the produced binary with dependency runtime directories on
/// PATH. Termination by user interrupt is a clean stop, not a failure.
fn execute(ctx: &GlobalContext, deps_dir: &Path, exe: &Path) -> Result<i32> {
    let mut paths: Vec<PathBuf> = find_bin_dirs(deps_dir);
    if let Some(existing) = std::env::var_os("PATH") {
        paths.extend(std::env::split_paths(&existing));
    }
    let joined = std::env::join_paths(paths).context("failed to assemble PATH")?;

    // Keep this process alive through Ctrl-C so the child's interrupt can
    // be observed and reported as a clean stop. The handler can only be
    // installed once per process; a second run attempt reuses it.
    let _ = ctrlc::set_handler(|| {});

    let exe = if exe.is_absolute() {
        exe.to_path_buf()
    } else {
        ctx.workdir().join(exe)
    };

    let status = ProcessBuilder::new(&exe)
        .cwd(ctx.workdir())
        .env("PATH", joined.to_string_lossy())
        .status()?;

    if is_interrupt(status) {
        return Ok(0);
    }
    Ok(status.code().unwrap_or(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_flags_only_without_dependencies() {
        let argv = compile_argv(
            Path::new("main.c"),
            Language::C,
            "x86_64-windows-gnu",
            &DependencyFlags::default(),
            Path::new("main.exe"),
        );

        assert_eq!(
            argv,
            [
                "cc",
                "main.c",
                "-w",
                "-O2",
                "-target",
                "x86_64-windows-gnu",
                "-o",
                "main.exe"
            ]
        );
    }

    #[test]
    fn test_cpp_gets_standard_flag() {
        let argv = compile_argv(
            Path::new("app.cpp"),
            Language::Cxx,
            "x86_64-windows-gnu",
            &DependencyFlags::default(),
            Path::new("app.exe"),
        );

        assert_eq!(argv[0], "c++");
        assert!(argv.contains(&"-std=c++17".to_string()));
    }

    #[test]
    fn test_dependency_flags_precede_output() {
        let flags = DependencyFlags {
            cflags: vec!["-I/usr/include".to_string()],
            libs: vec!["-L/usr/lib".to_string(), "-lfoo".to_string()],
        };
        let argv = compile_argv(
            Path::new("main.c"),
            Language::C,
            "x86_64-windows-gnu",
            &flags,
            Path::new("main.exe"),
        );

        let i_include = argv.iter().position(|a| a == "-I/usr/include").unwrap();
        let i_lib = argv.iter().position(|a| a == "-lfoo").unwrap();
        let i_out = argv.iter().position(|a| a == "-o").unwrap();
        assert!(i_include < i_lib && i_lib < i_out);
        assert_eq!(argv.last().unwrap(), "main.exe");
    }

    #[test]
    fn test_exe_path_derivation() {
        assert_eq!(exe_path(Path::new("main.c")), PathBuf::from("main.exe"));
        assert_eq!(
            exe_path(Path::new("dir/app.cpp")),
            PathBuf::from("dir/app.exe")
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_compile_failure_skips_execution() {
        use crate::util::config::Config;
        use crate::util::shell::{ColorChoice, Verbosity};
        use crate::util::tools::SystemToolResolver;
        use tempfile::TempDir;

        let tools = TempDir::new().unwrap();
        let work = TempDir::new().unwrap();

        let fake_zig = tools.path().join("zig");
        std::fs::write(&fake_zig, "#!/bin/sh\necho 'error: boom' >&2\nexit 5\n").unwrap();
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&fake_zig, std::fs::Permissions::from_mode(0o755)).unwrap();
        }

        let mut config = Config::default();
        config.tools.zig = Some(fake_zig);
        let resolver = SystemToolResolver::new(&config);

        let source = work.path().join("main.c");
        std::fs::write(&source, "int main(void) { return 0; }\n").unwrap();

        let ctx = GlobalContext::new(work.path());
        let shell = Shell::new(Verbosity::Quiet, ColorChoice::Never);
        let code = compile_and_run(
            &ctx,
            &resolver,
            &shell,
            &RunOptions {
                source: source.clone(),
            },
        )
        .unwrap();

        // The compiler's exit code is surfaced and nothing was executed.
        assert_eq!(code, 5);
        assert!(!source.with_extension("exe").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_successful_compile_runs_binary() {
        use crate::util::config::Config;
        use crate::util::shell::{ColorChoice, Verbosity};
        use crate::util::tools::SystemToolResolver;
        use tempfile::TempDir;

        let tools = TempDir::new().unwrap();
        let work = TempDir::new().unwrap();

        // A stand-in backend that "compiles" by writing a script which
        // exits 7, so the runner's exit-code plumbing is observable.
        let fake_zig = tools.path().join("zig");
        std::fs::write(
            &fake_zig,
            "#!/bin/sh\n\
             out=\"\"\n\
             while [ $# -gt 0 ]; do\n\
               if [ \"$1\" = \"-o\" ]; then out=\"$2\"; shift; fi\n\
               shift\n\
             done\n\
             printf '#!/bin/sh\\nexit 7\\n' > \"$out\"\n\
             chmod +x \"$out\"\n",
        )
        .unwrap();
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&fake_zig, std::fs::Permissions::from_mode(0o755)).unwrap();
        }

        let mut config = Config::default();
        config.tools.zig = Some(fake_zig);
        let resolver = SystemToolResolver::new(&config);

        let source = work.path().join("main.c");
        std::fs::write(&source, "int main(void) { return 7; }\n").unwrap();

        let ctx = GlobalContext::new(work.path());
        let shell = Shell::new(Verbosity::Quiet, ColorChoice::Never);
        let code = compile_and_run(
            &ctx,
            &resolver,
            &shell,
            &RunOptions { source },
        )
        .unwrap();

        assert_eq!(code, 7);
    }
}
