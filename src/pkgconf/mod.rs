//! pkg-config dependency metadata parsing.
//!
//! The package resolver's `PkgConfigDeps` generator emits one `.pc` file
//! per resolved library. This module recovers the compiler and linker
//! flags from those files: variable lines (`name=value`, values may
//! reference `${other}`) followed by `Cflags:` / `Libs:` flag lines.
//!
//! Parsing is deliberately forgiving. Real-world `.pc` files produced by
//! third-party recipes contain unresolved references, stray quoting, and
//! the occasional undecodable byte; on the default permissive path all of
//! these degrade to literal text instead of failing the scan.

pub mod parser;

pub use parser::{parse_dir, DependencyDescriptor, UnresolvedVariable};

/// Merged compiler and linker flags recovered from a metadata directory.
///
/// Both lists are ordered by first occurrence across all files processed
/// and contain no duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyFlags {
    /// Compiler flags (`Cflags:` lines)
    pub cflags: Vec<String>,

    /// Linker flags (`Libs:` lines)
    pub libs: Vec<String>,
}

impl DependencyFlags {
    /// Whether no flags were discovered at all.
    pub fn is_empty(&self) -> bool {
        self.cflags.is_empty() && self.libs.is_empty()
    }
}
