//! `gangway flags` - show flags resolved from installed dependencies.

use anyhow::Result;

use gangway::core::Strictness;
use gangway::pkgconf;
use gangway::util::context::GlobalContext;

use crate::cli::{FlagsArgs, GlobalFlags};

pub fn execute(_globals: GlobalFlags, args: FlagsArgs) -> Result<i32> {
    let ctx = GlobalContext::from_cwd()?;
    let strictness = if args.strict {
        Strictness::Strict
    } else {
        Strictness::Permissive
    };

    let flags = pkgconf::parse_dir(&ctx.deps_dir(), strictness)?;

    println!("Cflags:");
    for flag in &flags.cflags {
        println!("  {}", flag);
    }
    println!("Libs:");
    for flag in &flags.libs {
        println!("  {}", flag);
    }

    Ok(0)
}
