//! Build phase classification for streamed resolver output.
//!
//! The package resolver's output is an unstructured line stream. Each line
//! is matched against an ordered rule table to decide which phase the
//! resolution is in; the first matching rule wins. Lines matching no rule
//! carry no phase information but are still logged by the session.

use std::fmt;

/// A phase of an in-flight dependency resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildPhase {
    /// The resolver is downloading prebuilt artifacts or sources.
    Download,
    /// The resolver is building a package from source.
    Build {
        /// Package being built, when it could be extracted from the line.
        package: Option<String>,
    },
    /// The resolver is deploying resolved artifacts.
    Install,
    /// The resolver reported an error.
    Error,
}

impl BuildPhase {
    /// Classify one output line against the ordered rule table.
    ///
    /// Returns `None` for lines that carry no phase information.
    pub fn classify(line: &str) -> Option<BuildPhase> {
        // Order matters: an error line mentioning "Building" must still be
        // classified by the earliest matching rule below.
        for (pattern, rule) in RULES {
            if line.contains(pattern) {
                return Some(rule(line));
            }
        }
        None
    }

    /// Human-readable spinner description for this phase.
    pub fn description(&self, package: &str) -> String {
        match self {
            BuildPhase::Download => "Downloading dependencies...".to_string(),
            BuildPhase::Build { package } => format!(
                "Building {} (this may take a while)...",
                package.as_deref().unwrap_or("package")
            ),
            BuildPhase::Install => "Installing files...".to_string(),
            BuildPhase::Error => format!("Error while resolving {}", package),
        }
    }
}

impl fmt::Display for BuildPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildPhase::Download => write!(f, "download"),
            BuildPhase::Build { .. } => write!(f, "build"),
            BuildPhase::Install => write!(f, "install"),
            BuildPhase::Error => write!(f, "error"),
        }
    }
}

type Rule = fn(&str) -> BuildPhase;

/// Ordered (pattern, phase constructor) rules, evaluated per line.
const RULES: &[(&str, Rule)] = &[
    ("Downloading", |_| BuildPhase::Download),
    ("Building", |line| BuildPhase::Build {
        package: extract_build_package(line),
    }),
    ("Installing", |_| BuildPhase::Install),
    ("ERROR", |_| BuildPhase::Error),
];

/// Best-effort extraction of the package name from a "Building" line.
///
/// Conan emits lines like `zlib/1.3.1: Building your package from source`
/// and `-------- Building package zlib/1.3.1 --------`; the first word
/// after the keyword is the most stable signal across formats.
fn extract_build_package(line: &str) -> Option<String> {
    let rest = line.split("Building").nth(1)?;
    let word = rest.split_whitespace().next()?;
    let trimmed = word.trim_matches(|c: char| !c.is_alphanumeric() && c != '/' && c != '.');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
