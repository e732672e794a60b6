//! Gangway - a universal C/C++ dependency bootstrapper
//!
//! This crate provides the core library functionality for Gangway:
//! pkg-config metadata parsing, toolchain shim synthesis, resource-compiler
//! argument translation, and orchestration of conan dependency installs
//! against a single zig cross-compiling backend.

pub mod core;
pub mod ops;
pub mod pkgconf;
pub mod toolchain;
pub mod util;

pub use crate::core::phase::BuildPhase;
pub use crate::core::session::{BuildSession, InstallOutcome};
pub use crate::core::Strictness;
pub use crate::pkgconf::DependencyFlags;
pub use crate::toolchain::shims::ShimSet;
pub use crate::util::context::GlobalContext;
