//! Hidden resource-compiler shim entry point.
//!
//! The generated windres wrapper invokes this with the backend path and
//! the original arguments; the translated child's exit code becomes our
//! own so build systems observe the resource compiler directly.

use anyhow::Result;

use gangway::toolchain::windres;

use crate::cli::RcShimArgs;

pub fn execute(args: RcShimArgs) -> Result<i32> {
    windres::run(&args.backend, &args.args)
}
