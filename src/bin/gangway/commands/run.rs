//! `gangway run` - compile a single source file and execute it.

use anyhow::Result;

use gangway::ops::{compile_and_run, RunOptions};
use gangway::util::context::GlobalContext;
use gangway::util::tools::SystemToolResolver;

use crate::cli::{GlobalFlags, RunArgs};
use crate::commands::shell_from;

pub fn execute(globals: GlobalFlags, args: RunArgs) -> Result<i32> {
    let mut ctx = GlobalContext::from_cwd()?;
    ctx.set_verbose(globals.verbose);
    let shell = shell_from(globals);
    let resolver = SystemToolResolver::new(ctx.config());

    compile_and_run(
        &ctx,
        &resolver,
        &shell,
        &RunOptions {
            source: args.source,
        },
    )
}
