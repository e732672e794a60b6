//! Two-pass `.pc` file parser with recursive variable substitution.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{Context, Result};
use miette::{Diagnostic, NamedSource, SourceSpan};
use regex::Regex;
use thiserror::Error;

use crate::core::Strictness;
use crate::pkgconf::DependencyFlags;
use crate::util::fs::{read_to_string_lossy, to_forward_slashes};

/// Metadata file extension the resolver's generator emits.
pub const METADATA_EXT: &str = "pc";

/// `name=value` variable-definition lines.
static VAR_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z0-9_]+)=(.*)$").unwrap());

/// `${name}` references inside values and flag lines.
static VAR_REF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([A-Za-z0-9_]+)\}").unwrap());

/// Upper bound on substitution rounds per string.
///
/// Indirect reference cycles (a -> b -> a) can keep growing the value
/// without ever reproducing it exactly, so the no-progress check alone is
/// not enough to guarantee termination.
const MAX_SUBST_ROUNDS: usize = 32;

/// Strict-mode diagnostic for a flag line referencing an unbound variable.
#[derive(Debug, Error, Diagnostic)]
#[error("unresolved variable `${{{name}}}`")]
#[diagnostic(
    code(gangway::pkgconf::unresolved_variable),
    help("define `{name}=...` earlier in the file, or parse permissively")
)]
pub struct UnresolvedVariable {
    /// The referenced name that was never bound
    pub name: String,

    #[source_code]
    src: NamedSource<String>,

    #[label("referenced here")]
    span: SourceSpan,
}

/// One parsed `.pc` file.
///
/// Constructed fresh per parse call and discarded once its flags are
/// merged; nothing is persisted.
#[derive(Debug)]
pub struct DependencyDescriptor {
    /// Source file path
    path: PathBuf,

    /// Resolved variable bindings
    variables: HashMap<String, String>,

    /// Ordered, de-duplicated compiler flags
    cflags: Vec<String>,

    /// Ordered, de-duplicated linker flags
    libs: Vec<String>,
}

impl DependencyDescriptor {
    /// Parse a `.pc` file from disk.
    ///
    /// Undecodable bytes are recovered lossily; an unreadable file is an
    /// error for the caller to handle.
    pub fn parse_file(path: &Path, strictness: Strictness) -> Result<Self> {
        let content = read_to_string_lossy(path)?;
        Self::parse_str(path, &content, strictness)
    }

    /// Parse `.pc` content that has already been read.
    pub fn parse_str(path: &Path, content: &str, strictness: Strictness) -> Result<Self> {
        let mut variables = HashMap::new();

        // The synthetic pcfiledir variable holds the file's own directory,
        // forward-slash normalized like every other stored value.
        let dir = path
            .parent()
            .map(|p| p.canonicalize().unwrap_or_else(|_| p.to_path_buf()))
            .unwrap_or_default();
        variables.insert("pcfiledir".to_string(), to_forward_slashes(&dir));

        // Variable pass: bind names in file order, substituting against
        // what is already bound. Forward references stay literal.
        for line in content.lines() {
            let line = line.trim();
            if let Some(caps) = VAR_LINE_RE.captures(line) {
                let name = caps.get(1).unwrap().as_str();
                let raw = strip_quotes(caps.get(2).unwrap().as_str().trim());
                let (value, _) = substitute(raw, &variables);
                variables.insert(name.to_string(), value.replace('\\', "/"));
            }
        }

        let mut cflags = Vec::new();
        let mut libs = Vec::new();

        // Flag pass: substitute against the complete table and tokenize.
        for line in content.lines() {
            let (line, unresolved) = substitute(line.trim(), &variables);

            let (marker, sink) = if line.starts_with("Cflags:") {
                ("Cflags:", &mut cflags)
            } else if line.starts_with("Libs:") {
                ("Libs:", &mut libs)
            } else {
                continue;
            };

            if strictness == Strictness::Strict {
                if let Some(name) = unresolved {
                    return Err(unresolved_error(path, content, &name).into());
                }
            }

            let rest = line[marker.len()..].trim();
            for token in tokenize(rest) {
                if !sink.contains(&token) {
                    sink.push(token);
                }
            }
        }

        Ok(DependencyDescriptor {
            path: path.to_path_buf(),
            variables,
            cflags,
            libs,
        })
    }

    /// Source file this descriptor was parsed from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Look up a resolved variable.
    pub fn variable(&self, name: &str) -> Option<&str> {
        self.variables.get(name).map(String::as_str)
    }

    /// The descriptor's compiler flags.
    pub fn cflags(&self) -> &[String] {
        &self.cflags
    }

    /// The descriptor's linker flags.
    pub fn libs(&self) -> &[String] {
        &self.libs
    }
}

/// Parse every `.pc` file in a directory into one merged flag pair.
///
/// Files are processed in alphabetical order; both output lists preserve
/// first-seen order with duplicates removed across file boundaries. A
/// directory containing no metadata files yields empty lists.
pub fn parse_dir(dir: &Path, strictness: Strictness) -> Result<DependencyFlags> {
    let mut flags = DependencyFlags::default();

    let pattern = dir.join(format!("*.{}", METADATA_EXT));
    let entries = glob::glob(&pattern.to_string_lossy())
        .with_context(|| format!("invalid metadata glob for {}", dir.display()))?;

    for entry in entries {
        let path = match entry {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!("skipping unreadable metadata entry: {}", e);
                continue;
            }
        };

        let descriptor = DependencyDescriptor::parse_file(&path, strictness)?;
        for flag in descriptor.cflags() {
            if !flags.cflags.contains(flag) {
                flags.cflags.push(flag.clone());
            }
        }
        for flag in descriptor.libs() {
            if !flags.libs.contains(flag) {
                flags.libs.push(flag.clone());
            }
        }
    }

    Ok(flags)
}

/// Strip a single layer of matching surrounding quotes.
fn strip_quotes(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'"' || first == b'\'') {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Repeatedly expand `${name}` references against the table.
///
/// Stops at the first unbound reference (returned for strict-mode
/// reporting), when a round makes no progress, or at the round cap; in all
/// three cases the remaining references stay literal.
fn substitute(input: &str, vars: &HashMap<String, String>) -> (String, Option<String>) {
    let mut out = input.to_string();

    for _ in 0..MAX_SUBST_ROUNDS {
        let Some(caps) = VAR_REF_RE.captures(&out) else {
            return (out, None);
        };
        let name = caps.get(1).unwrap().as_str().to_string();

        let Some(value) = vars.get(&name) else {
            return (out, Some(name));
        };

        let needle = format!("${{{}}}", name);
        if value.contains(&needle) {
            // Self-referential binding; expansion cannot make progress.
            return (out, None);
        }
        out = out.replace(&needle, value);
    }

    (out, None)
}

/// Shell-style tokenization preserving quoted segments.
///
/// Unbalanced quoting falls back to whitespace splitting rather than
/// discarding the line.
fn tokenize(content: &str) -> Vec<String> {
    shlex::split(content).unwrap_or_else(|| {
        tracing::debug!("unbalanced quoting in flag line: {:?}", content);
        content.split_whitespace().map(String::from).collect()
    })
}

fn unresolved_error(path: &Path, content: &str, name: &str) -> UnresolvedVariable {
    let needle = format!("${{{}}}", name);
    let offset = content.find(&needle).unwrap_or(0);

    UnresolvedVariable {
        name: name.to_string(),
        src: NamedSource::new(path.display().to_string(), content.to_string()),
        span: (offset, needle.len()).into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn parse(content: &str) -> DependencyDescriptor {
        DependencyDescriptor::parse_str(Path::new("/tmp/test.pc"), content, Strictness::default())
            .unwrap()
    }

    #[test]
    fn test_end_to_end_scenario() {
        let desc = parse(
            "prefix=/usr\n\
             includedir=${prefix}/include\n\
             Cflags: -I${includedir}\n\
             Libs: -L${prefix}/lib -lfoo\n",
        );

        assert_eq!(desc.cflags(), ["-I/usr/include"]);
        assert_eq!(desc.libs(), ["-L/usr/lib", "-lfoo"]);
    }

    #[test]
    fn test_quote_stripping_single_layer() {
        let desc = parse("prefix=\"/opt/my libs\"\nCflags: -I${prefix}/include\n");
        assert_eq!(desc.variable("prefix"), Some("/opt/my libs"));

        // Only one layer comes off
        let desc = parse("odd=\"\"double\"\"\n");
        assert_eq!(desc.variable("odd"), Some("\"double\""));
    }

    #[test]
    fn test_empty_value_is_kept() {
        let desc = parse("empty=\"\"\nCflags: -DX${empty}Y\n");
        assert_eq!(desc.variable("empty"), Some(""));
        assert_eq!(desc.cflags(), ["-DXY"]);
    }

    #[test]
    fn test_unresolved_reference_stays_literal() {
        let desc = parse("Cflags: -I${nowhere}/include\n");
        assert_eq!(desc.cflags(), ["-I${nowhere}/include"]);
    }

    #[test]
    fn test_forward_reference_stays_literal_in_value() {
        // `later` is not bound yet when `early` is scanned.
        let desc = parse("early=${later}/x\nlater=/usr\nCflags: -I${early}\n");
        // The flag pass substitutes early -> ${later}/x -> /usr/x.
        assert_eq!(desc.cflags(), ["-I/usr/x"]);
    }

    #[test]
    fn test_direct_self_reference_terminates() {
        let desc = parse("a=${a}/x\nCflags: -I${a}\n");
        // No progress is possible; the literal survives.
        assert_eq!(desc.cflags(), ["-I${a}"]);
    }

    #[test]
    fn test_indirect_cycle_terminates() {
        let desc = parse("a=x${b}\nb=y${a}\nCflags: -D${a}\n");
        // Bounded rounds: the parser must return, content irrelevant.
        assert_eq!(desc.cflags().len(), 1);
    }

    #[test]
    fn test_pcfiledir_is_bound() {
        let tmp = TempDir::new().unwrap();
        let pc = tmp.path().join("dep.pc");
        std::fs::write(&pc, "libdir=${pcfiledir}/lib\nLibs: -L${libdir}\n").unwrap();

        let desc =
            DependencyDescriptor::parse_file(&pc, Strictness::default()).unwrap();
        let libdir = desc.variable("libdir").unwrap();
        assert!(libdir.ends_with("/lib"));
        assert!(!libdir.contains('\\'));
        assert_eq!(desc.libs().len(), 1);
    }

    #[test]
    fn test_tokenization_preserves_quoted_segments() {
        let desc = parse("Cflags: -I\"/opt/my libs/include\" -DFOO\n");
        assert_eq!(desc.cflags(), ["-I/opt/my libs/include", "-DFOO"]);
    }

    #[test]
    fn test_flag_line_without_content() {
        let desc = parse("Cflags:\nLibs:   \n");
        assert!(desc.cflags().is_empty());
        assert!(desc.libs().is_empty());
    }

    #[test]
    fn test_libs_private_is_not_libs() {
        let desc = parse("Libs: -lfoo\nLibs.private: -lbar\n");
        assert_eq!(desc.libs(), ["-lfoo"]);
    }

    #[test]
    fn test_strict_mode_errors_on_unresolved_flag_reference() {
        let err = DependencyDescriptor::parse_str(
            Path::new("/tmp/bad.pc"),
            "Cflags: -I${nowhere}\n",
            Strictness::Strict,
        )
        .unwrap_err();
        let err = err.downcast::<UnresolvedVariable>().unwrap();
        assert_eq!(err.name, "nowhere");
    }

    #[test]
    fn test_parse_dir_merges_and_dedups_in_order() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join("a.pc"),
            "Cflags: -IA -IB\nLibs: -la\n",
        )
        .unwrap();
        std::fs::write(
            tmp.path().join("b.pc"),
            "Cflags: -IA -IC\nLibs: -lb -la\n",
        )
        .unwrap();

        let flags = parse_dir(tmp.path(), Strictness::default()).unwrap();
        assert_eq!(flags.cflags, ["-IA", "-IB", "-IC"]);
        assert_eq!(flags.libs, ["-la", "-lb"]);
    }

    #[test]
    fn test_parse_dir_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join("z.pc"),
            "prefix=/usr\nCflags: -I${prefix}/include\nLibs: -lz\n",
        )
        .unwrap();

        let first = parse_dir(tmp.path(), Strictness::default()).unwrap();
        let second = parse_dir(tmp.path(), Strictness::default()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_parse_dir_empty() {
        let tmp = TempDir::new().unwrap();
        let flags = parse_dir(tmp.path(), Strictness::default()).unwrap();
        assert!(flags.is_empty());
    }

    #[test]
    fn test_undecodable_bytes_are_recovered() {
        let tmp = TempDir::new().unwrap();
        let pc = tmp.path().join("latin.pc");
        // 0xE9 is latin-1 'é', invalid as a UTF-8 sequence.
        std::fs::write(&pc, b"Cflags: -DACCENT\xE9 -DOK\n").unwrap();

        let flags = parse_dir(tmp.path(), Strictness::default()).unwrap();
        assert!(flags.cflags.contains(&"-DOK".to_string()));
    }
}
