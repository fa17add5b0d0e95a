//! Shell-pattern matching over an emulated hierarchy.
//!
//! A pattern is matched one path segment at a time. The leading run of
//! literal segments selects the subtree to start from; below it, each
//! wildcard segment costs one directory listing and each literal segment one
//! stat. Nothing outside the pattern's subtree is ever listed.

use glob::{MatchOptions, Pattern};
use tracing::debug;

use crate::error::{VfsError, VfsResult};
use crate::path::{self, SEPARATOR};
use crate::traits::FileSystem;

const META_CHARS: &[char] = &['*', '?', '['];

const OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Returns `true` if the segment contains wildcard syntax.
pub fn has_meta(segment: &str) -> bool {
    segment.contains(META_CHARS)
}

enum Segment {
    Literal(String),
    Wildcard(Pattern),
}

impl Segment {
    fn parse(text: &str) -> VfsResult<Self> {
        if !has_meta(text) {
            return Ok(Self::Literal(text.to_string()));
        }
        Pattern::new(&collapse_stars(text))
            .map(Self::Wildcard)
            .map_err(|e| VfsError::InvalidPattern {
                pattern: text.to_string(),
                reason: e.msg.to_string(),
            })
    }
}

/// Squeeze runs of `*` into one. Within a segment `**` means the same as `*`,
/// while `glob::Pattern` would read it as a recursive wildcard.
fn collapse_stars(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_star = false;
    for ch in text.chars() {
        if ch == '*' && prev_star {
            continue;
        }
        prev_star = ch == '*';
        out.push(ch);
    }
    out
}

/// Returns `true` if `path` is `scope` or lies below it.
fn within(path: &str, scope: &str) -> bool {
    scope.is_empty()
        || path == scope
        || path
            .strip_prefix(scope)
            .is_some_and(|rest| rest.starts_with(SEPARATOR))
}

/// Find every path matching `pattern`.
///
/// `prefix` limits the search to one subtree: directories that neither lie
/// inside it nor lead to it are never listed, and matches outside it are
/// dropped. An empty prefix searches everything. Matches are spelled the way
/// the pattern is, joined with [`FileSystem::join`], and returned sorted.
///
/// A wildcard segment matches exactly one path segment.
pub fn glob<F: FileSystem + ?Sized>(fs: &F, prefix: &str, pattern: &str) -> VfsResult<Vec<String>> {
    let scope = path::to_key(prefix);
    let cleaned = path::clean(pattern);
    let segments: Vec<&str> = if cleaned == path::ROOT {
        Vec::new()
    } else {
        cleaned.split(SEPARATOR).collect()
    };

    let literal_len = segments
        .iter()
        .position(|segment| has_meta(segment))
        .unwrap_or(segments.len());

    let mut matches = Vec::new();
    if literal_len == segments.len() {
        if within(&cleaned, &scope) && fs.exists(&cleaned)? {
            matches.push(cleaned);
        }
        return Ok(matches);
    }

    let rest = segments[literal_len..]
        .iter()
        .map(|segment| Segment::parse(segment))
        .collect::<VfsResult<Vec<_>>>()?;
    let base = fs.join(&segments[..literal_len]);

    walk(fs, &base, &rest, &scope, &mut matches)?;
    matches.sort();
    Ok(matches)
}

fn walk<F: FileSystem + ?Sized>(
    fs: &F,
    dir: &str,
    segments: &[Segment],
    scope: &str,
    matches: &mut Vec<String>,
) -> VfsResult<()> {
    let Some((segment, rest)) = segments.split_first() else {
        return Ok(());
    };
    let dir_key = path::to_key(dir);
    if !within(&dir_key, scope) && !within(scope, &dir_key) {
        return Ok(());
    }

    // (path, is_dir) for every entry matching this segment.
    let candidates: Vec<(String, bool)> = match segment {
        Segment::Literal(name) => {
            let candidate = fs.join(&[dir, name.as_str()]);
            match fs.stat(&candidate) {
                Ok(info) => vec![(candidate, info.is_dir())],
                Err(e) if e.is_not_found() => Vec::new(),
                Err(e) => return Err(e),
            }
        }
        Segment::Wildcard(pattern) => {
            let entries = match fs.read_dir(dir) {
                Ok(entries) => entries,
                Err(e) if e.is_not_found() => return Ok(()),
                Err(VfsError::NotADirectory { .. }) => return Ok(()),
                Err(e) => return Err(e),
            };
            debug!(dir, entries = entries.len(), "glob listed level");
            entries
                .into_iter()
                .filter(|entry| pattern.matches_with(&entry.name, OPTIONS))
                .map(|entry| (fs.join(&[dir, entry.name.as_str()]), entry.is_dir()))
                .collect()
        }
    };

    for (candidate, is_dir) in candidates {
        if rest.is_empty() {
            if within(&candidate, scope) {
                matches.push(candidate);
            }
        } else if is_dir {
            walk(fs, &candidate, rest, scope, matches)?;
        }
    }
    Ok(())
}
