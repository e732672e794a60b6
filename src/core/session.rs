//! Build session state and terminal outcomes.

use std::path::{Path, PathBuf};

/// Number of trailing log lines surfaced when a session fails.
pub const FAILURE_LOG_TAIL: usize = 20;

/// One dependency-installation run.
///
/// A session owns the accumulated output log of the resolver child process
/// and is created at the start of an install operation and discarded when
/// the operation returns. Sessions are scoped one-per-working-directory;
/// callers serialize sessions targeting the same directory.
#[derive(Debug)]
pub struct BuildSession {
    /// Package the resolver was asked to install
    package: String,

    /// Explicit working directory for this session
    workdir: PathBuf,

    /// Ordered resolver output, every line retained whether or not it
    /// matched a phase rule
    log: Vec<String>,
}

impl BuildSession {
    /// Start a session for the given package and working directory.
    pub fn new(package: impl Into<String>, workdir: impl Into<PathBuf>) -> Self {
        BuildSession {
            package: package.into(),
            workdir: workdir.into(),
            log: Vec::new(),
        }
    }

    /// The package this session resolves.
    pub fn package(&self) -> &str {
        &self.package
    }

    /// The session's working directory.
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Append one line of resolver output.
    pub fn record(&mut self, line: &str) {
        self.log.push(line.to_string());
    }

    /// Number of recorded lines.
    pub fn log_len(&self) -> usize {
        self.log.len()
    }

    /// Consume the session into a terminal outcome.
    ///
    /// Success is exactly "exit code zero". On failure the last
    /// [`FAILURE_LOG_TAIL`] lines are carried for diagnosis; on success the
    /// log is dropped.
    pub fn finish(self, exit_code: Option<i32>) -> InstallOutcome {
        let success = exit_code == Some(0);
        let log_tail = if success {
            Vec::new()
        } else {
            let start = self.log.len().saturating_sub(FAILURE_LOG_TAIL);
            self.log[start..].to_vec()
        };

        InstallOutcome {
            package: self.package,
            success,
            exit_code,
            log_tail,
        }
    }
}

/// Terminal outcome of a dependency-installation session.
#[derive(Debug, Clone)]
pub struct InstallOutcome {
    /// Package the session resolved
    pub package: String,

    /// Whether the resolver exited with code zero
    pub success: bool,

    /// The resolver's exit code, if it exited normally
    pub exit_code: Option<i32>,

    /// Trailing log lines for diagnosis; empty on success
    pub log_tail: Vec<String>,
}
