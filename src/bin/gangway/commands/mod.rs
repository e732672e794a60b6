//! Command implementations.

pub mod completions;
pub mod flags;
pub mod install;
pub mod rc_shim;
pub mod run;

use gangway::util::shell::{ColorChoice, Shell};

use crate::cli::GlobalFlags;

/// Build the shared shell from global CLI flags.
pub fn shell_from(globals: GlobalFlags) -> Shell {
    let color = if globals.no_color {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    };
    Shell::from_flags(globals.quiet, globals.verbose, color)
}
