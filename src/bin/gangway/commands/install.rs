//! `gangway install` - resolve and deploy a package.

use anyhow::Result;

use gangway::ops::{install_package, InstallOptions};
use gangway::util::context::GlobalContext;
use gangway::util::shell::Status;
use gangway::util::tools::SystemToolResolver;

use crate::cli::{GlobalFlags, InstallArgs};
use crate::commands::shell_from;

pub fn execute(globals: GlobalFlags, args: InstallArgs) -> Result<i32> {
    let mut ctx = GlobalContext::from_cwd()?;
    ctx.set_verbose(globals.verbose);
    let shell = shell_from(globals);
    let resolver = SystemToolResolver::new(ctx.config());

    shell.status(Status::Fetching, format!("{} via conan", args.package));

    let outcome = install_package(
        &ctx,
        &resolver,
        &shell,
        &InstallOptions {
            package: args.package,
        },
    )?;

    if outcome.success {
        shell.status(Status::Installed, &outcome.package);
        shell.note(format!(
            "files are in ./{}",
            gangway::util::context::DEPS_DIR
        ));
        Ok(0)
    } else {
        shell.error(format!("installation of {} failed", outcome.package));
        if !outcome.log_tail.is_empty() {
            eprintln!("--- resolver log (last {} lines) ---", outcome.log_tail.len());
            for line in &outcome.log_tail {
                eprintln!("{}", line);
            }
        }
        Ok(outcome.exit_code.unwrap_or(1))
    }
}
