//! GNU windres to `zig rc` argument translation.
//!
//! Generated build files invoke the resource compiler with GNU-style
//! arguments (`-DNAME`, `-I dir`, `-o out.res`), but the backend's `rc`
//! speaks the native Microsoft grammar (`/DNAME`, `/Idir`, `/foout.res`)
//! and errors on flags it does not know. The translator rewrites the
//! argument vector token by token and enforces the positional contract the
//! native tool depends on: flags first, `/fo` second-to-last, the input
//! file last.
//!
//! Metadata coming out of resolver recipes double-escapes quotes in define
//! values (`-DVER=\"1.0\"`) in a form the native tool cannot parse; every
//! consumed token is unescaped before emission.

use anyhow::{Context, Result};
use thiserror::Error;

use crate::core::Strictness;
use crate::util::process::ProcessBuilder;

/// Strict-mode rejection of a flag with no native equivalent.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("resource compiler flag `{flag}` has no native equivalent")]
pub struct UnknownFlag {
    /// The offending token
    pub flag: String,
}

/// Translate a GNU windres argument vector into native `rc` tokens.
///
/// In permissive mode unrecognized flags are dropped so compiler-only
/// options leaking into the resource step cannot break the build; strict
/// mode surfaces them instead.
pub fn translate(args: &[String], strictness: Strictness) -> Result<Vec<String>, UnknownFlag> {
    let mut native = Vec::new();
    let mut infile: Option<String> = None;
    let mut outfile: Option<String> = None;

    let mut iter = args.iter();
    while let Some(raw) = iter.next() {
        let arg = unescape_quotes(raw);

        if arg == "-D" {
            if let Some(value) = iter.next() {
                native.push(format!("/D{}", unescape_quotes(value)));
            }
        } else if let Some(value) = arg.strip_prefix("-D") {
            native.push(format!("/D{}", value));
        } else if arg == "-I" {
            if let Some(value) = iter.next() {
                native.push(format!("/I{}", unescape_quotes(value)));
            }
        } else if let Some(value) = arg.strip_prefix("-I") {
            native.push(format!("/I{}", value));
        } else if arg == "-o" {
            outfile = iter.next().map(|v| unescape_quotes(v));
        } else if arg.starts_with("-O") {
            // Optimization levels have no native counterpart.
        } else if !arg.starts_with('-') {
            if infile.is_none() {
                infile = Some(arg);
            } else if outfile.is_none() {
                outfile = Some(arg);
            }
        } else if strictness == Strictness::Strict {
            return Err(UnknownFlag { flag: arg });
        }
        // Permissive: anything else is dropped.
    }

    if let Some(out) = outfile {
        native.push(format!("/fo{}", out));
    }
    if let Some(input) = infile {
        native.push(input);
    }

    Ok(native)
}

/// Translate and execute: run the backend's `rc` subcommand with the
/// rewritten arguments, returning the child's exit code.
pub fn run(backend: &str, args: &[String]) -> Result<i32> {
    let native = translate(args, Strictness::Permissive)
        .expect("permissive translation is infallible");

    tracing::debug!("rc translation: {:?} -> {:?}", args, native);

    let status = ProcessBuilder::new(backend)
        .arg("rc")
        .args(&native)
        .status()
        .context("failed to run the backend resource compiler")?;

    Ok(status.code().unwrap_or(1))
}

/// Collapse shell-escaped quotes (`\"`) into literal quote characters.
fn unescape_quotes(arg: &str) -> String {
    arg.replace("\\\"", "\"")
}
