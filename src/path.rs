//! Workspace path predicates
//!
//! Paths are `/`-rooted strings. Folders are never stored; they exist only as
//! shared prefixes, so every folder-aware operation goes through
//! [`is_descendant_of`] and [`fold`] here.

use crate::error::ApiError;
use unicode_normalization::UnicodeNormalization;

pub const SEPARATOR: char = '/';

/// Check that `path` is a well-formed workspace path.
///
/// Accepted: `/name`, `/dir/name`. Rejected: relative paths, the bare root,
/// trailing separators, and empty, `.` or `..` segments.
pub fn validate(path: &str) -> Result<(), ApiError> {
    let invalid = |reason: &str| ApiError::InvalidPath {
        path: path.to_string(),
        reason: reason.to_string(),
    };

    if !path.starts_with(SEPARATOR) {
        return Err(invalid("must start with '/'"));
    }
    if path.len() == 1 {
        return Err(invalid("the workspace root cannot be used as an entry"));
    }
    if path.ends_with(SEPARATOR) {
        return Err(invalid("must not end with '/'"));
    }
    for segment in segments(path) {
        match segment {
            "" => return Err(invalid("contains an empty segment")),
            "." | ".." => return Err(invalid("contains a relative segment")),
            s if s.contains('\0') => return Err(invalid("contains a NUL byte")),
            _ => {}
        }
    }
    Ok(())
}

/// Case-folded comparison key: NFC-normalized, then lowercased.
pub fn fold(path: &str) -> String {
    path.nfc().collect::<String>().to_lowercase()
}

/// True when `path` lies strictly beneath `ancestor` (exact case).
///
/// The match requires a separator boundary: `/src/a.ts` is beneath `/src`,
/// `/srcOther.ts` is not.
pub fn is_descendant_of(path: &str, ancestor: &str) -> bool {
    path.len() > ancestor.len() + 1
        && path.starts_with(ancestor)
        && path.as_bytes()[ancestor.len()] == b'/'
}

/// `path == target` or `path` is a descendant of `target` (exact case).
pub fn is_same_or_descendant(path: &str, target: &str) -> bool {
    path == target || is_descendant_of(path, target)
}

/// Move `path` from beneath `old_root` to beneath `new_root`.
///
/// `path` must be `old_root` itself or one of its descendants.
pub fn rebase(path: &str, old_root: &str, new_root: &str) -> String {
    if path == old_root {
        new_root.to_string()
    } else {
        format!("{}{}", new_root, &path[old_root.len()..])
    }
}

/// Path segments after stripping a single leading `/`.
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.strip_prefix(SEPARATOR).unwrap_or(path).split(SEPARATOR)
}

/// Proper ancestors of `path`, shallowest first: `/a/b/c` yields `/a`, `/a/b`.
pub fn ancestors(path: &str) -> Vec<&str> {
    path.char_indices()
        .skip(1)
        .filter(|(_, c)| *c == SEPARATOR)
        .map(|(i, _)| &path[..i])
        .collect()
}

/// Last segment of `path`.
pub fn file_name(path: &str) -> &str {
    path.rsplit(SEPARATOR).next().unwrap_or(path)
}

/// Join a folder path and a child name.
pub fn join(parent: &str, name: &str) -> String {
    if parent.is_empty() || parent == "/" {
        format!("/{}", name)
    } else {
        format!("{}/{}", parent, name)
    }
}
