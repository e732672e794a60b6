//! The zig cross-compiling backend and its legacy-toolchain facade.
//!
//! Zig ships a clang-based driver (`zig cc` / `zig c++`), an archiver
//! (`zig ar` / `zig ranlib`), and a resource compiler (`zig rc`). This
//! module presents that single backend under the GNU tool names legacy
//! build scripts expect, via generated wrapper executables and a windres
//! argument translator.

pub mod shims;
pub mod windres;

pub use shims::{synthesize, ShimSet};

/// Target platform triple passed to the backend unless configuration
/// overrides it.
pub const DEFAULT_TARGET_TRIPLE: &str = "x86_64-windows-gnu";

/// Source language selecting the backend driver subcommand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    C,
    Cxx,
}

impl Language {
    /// Detect the language from a source file extension.
    ///
    /// `.cpp`, `.cc`, and `.cxx` select C++; everything else compiles as C.
    pub fn from_source(path: &std::path::Path) -> Language {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("cpp") | Some("cc") | Some("cxx") => Language::Cxx,
            _ => Language::C,
        }
    }

    /// The backend driver subcommand for this language.
    pub fn driver_subcommand(&self) -> &'static str {
        match self {
            Language::C => "cc",
            Language::Cxx => "c++",
        }
    }
}
