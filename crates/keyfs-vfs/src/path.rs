//! Mapping between filesystem paths and store keys.
//!
//! Paths are slash-separated and cleaned lexically before use:
//! - empty and `.` segments are dropped
//! - `..` removes the previous segment and never climbs above the root
//! - leading and trailing separators are stripped
//!
//! The root cleans to `"."` and maps to the empty key prefix. No escaping is
//! performed: keys and paths share the same character space.

/// The hierarchical separator, used both in paths and in keys.
pub const SEPARATOR: char = '/';

/// The cleaned form of the root path.
pub const ROOT: &str = ".";

/// Clean a path lexically.
///
/// # Examples
///
/// ```
/// use keyfs_vfs::path::clean;
///
/// assert_eq!(clean("/foo//bar/./baz/"), "foo/bar/baz");
/// assert_eq!(clean("a/../../b"), "b");
/// assert_eq!(clean("/"), ".");
/// ```
pub fn clean(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split(SEPARATOR) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    if segments.is_empty() {
        ROOT.to_string()
    } else {
        segments.join("/")
    }
}

/// Returns `true` if the path cleans to the root.
pub fn is_root(path: &str) -> bool {
    clean(path) == ROOT
}

/// The store key addressing the object at `path`. The root maps to `""`.
pub fn to_key(path: &str) -> String {
    let cleaned = clean(path);
    if cleaned == ROOT {
        String::new()
    } else {
        cleaned
    }
}

/// The listing prefix covering everything below `path`.
///
/// This is the key followed by a separator, or `""` for the root. The same
/// string is the key of the directory marker written by `mkdir`.
pub fn dir_prefix(path: &str) -> String {
    let mut key = to_key(path);
    if !key.is_empty() {
        key.push(SEPARATOR);
    }
    key
}

/// Join path elements with the separator and clean the result.
pub fn join<S: AsRef<str>>(elems: &[S]) -> String {
    let joined: Vec<&str> = elems
        .iter()
        .map(AsRef::as_ref)
        .filter(|elem| !elem.is_empty())
        .collect();
    clean(&joined.join("/"))
}

/// Split a cleaned path into its parent and final segment.
///
/// The root splits into `(".", "")`; a top-level name has parent `"."`.
pub fn split(path: &str) -> (String, String) {
    let cleaned = clean(path);
    if cleaned == ROOT {
        return (ROOT.to_string(), String::new());
    }
    match cleaned.rsplit_once(SEPARATOR) {
        Some((parent, name)) => (parent.to_string(), name.to_string()),
        None => (ROOT.to_string(), cleaned),
    }
}

/// The final segment of the path, or `"."` for the root.
pub fn base_name(path: &str) -> String {
    match split(path) {
        (_, name) if name.is_empty() => ROOT.to_string(),
        (_, name) => name,
    }
}

/// Every ancestor of `path` from the top down, ending with `path` itself.
///
/// The root has no ancestors and yields an empty list.
pub fn ancestors(path: &str) -> Vec<String> {
    let key = to_key(path);
    if key.is_empty() {
        return Vec::new();
    }
    let mut out = Vec::new();
    for (i, ch) in key.char_indices() {
        if ch == SEPARATOR {
            out.push(key[..i].to_string());
        }
    }
    out.push(key);
    out
}
