//! Core data structures for Gangway.
//!
//! This module contains the foundational types used throughout Gangway:
//! - Build phase classification for streamed resolver output
//! - Build session state and terminal outcomes
//! - The permissive/strict parsing policy

pub mod phase;
pub mod session;

pub use phase::BuildPhase;
pub use session::{BuildSession, InstallOutcome};

/// Policy for handling malformed input on best-effort compatibility paths.
///
/// `Permissive` degrades gracefully: unresolved metadata variables stay as
/// literal text and unrecognized translator flags are dropped. `Strict`
/// turns the same conditions into structured errors so misconfiguration
/// cannot slip through silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strictness {
    /// Tolerate malformed input; the default on compatibility paths.
    #[default]
    Permissive,
    /// Escalate malformed input into errors.
    Strict,
}
