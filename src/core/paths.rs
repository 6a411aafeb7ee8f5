//! Path normalization and flat-name encoding
//!
//! Relative paths are always '/'-separated before encoding, so the same tree
//! produces the same flat names on every platform.

use std::path::{Path, PathBuf, MAIN_SEPARATOR};

use crate::core::error::FlattenError;

/// Default token substituted for path separators
pub const DEFAULT_JOIN_TOKEN: &str = "__";

/// Suffix appended to the source directory name for the default output root
pub const OUTPUT_SUFFIX: &str = "_flat";

/// Normalize a path to use '/' as separator. `\` is only a separator on
/// Windows; elsewhere it is an ordinary file name character.
pub fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace(MAIN_SEPARATOR, "/")
}

/// Make a path relative to the root directory
pub fn make_relative(path: &Path, root: &Path) -> Option<String> {
    path.strip_prefix(root).ok().map(normalize_path)
}

/// Replace every separator in a relative path with the join token
pub fn encode_path(relative: &str, token: &str) -> String {
    relative.replace(['/', MAIN_SEPARATOR], token)
}

/// Reverse of [`encode_path`]. Only exact when no path component itself
/// contained the token.
pub fn decode_name(name: &str, token: &str) -> String {
    name.replace(token, "/")
}

/// Whether `relative` survives an encode/decode round trip unchanged
pub fn decodes_unambiguously(relative: &str, token: &str) -> bool {
    decode_name(&encode_path(relative, token), token) == relative
}

/// Check that a join token can be used inside a single file name
pub fn validate_join_token(token: &str) -> Result<(), FlattenError> {
    if token.is_empty() || token.contains(['/', '\\', '\0']) {
        return Err(FlattenError::InvalidJoinToken(token.to_string()));
    }
    Ok(())
}

/// `<parent>/<name>_flat` for a canonical source directory
pub fn default_output_root(source: &Path) -> Result<PathBuf, FlattenError> {
    let name = source
        .file_name()
        .ok_or_else(|| FlattenError::SourceUnnamed(source.to_path_buf()))?;
    let mut flat_name = name.to_os_string();
    flat_name.push(OUTPUT_SUFFIX);
    Ok(source.with_file_name(flat_name))
}

/// Insert `~n` before the extension: `a__b.txt` -> `a__b~2.txt`. Only the
/// part after the last `token` is searched for the extension.
pub fn with_counter(name: &str, n: usize, token: &str) -> String {
    let base = name.rfind(token).map(|idx| idx + token.len()).unwrap_or(0);
    match name[base..].rfind('.') {
        Some(idx) if idx > 0 => {
            let split = base + idx;
            format!("{}~{}{}", &name[..split], n, &name[split..])
        }
        _ => format!("{}~{}", name, n),
    }
}

/// Resolve a possibly-relative path against `base` without touching the disk
pub fn absolutize(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Canonicalize when the path exists, otherwise canonicalize the nearest
/// existing ancestor and re-append the rest.
pub fn canonicalize_lenient(path: &Path) -> PathBuf {
    if let Ok(p) = path.canonicalize() {
        return p;
    }
    let mut tail = Vec::new();
    let mut current = path;
    while let Some(parent) = current.parent() {
        if let Some(name) = current.file_name() {
            tail.push(name.to_os_string());
        }
        if let Ok(base) = parent.canonicalize() {
            let mut out = base;
            for part in tail.iter().rev() {
                out.push(part);
            }
            return out;
        }
        current = parent;
    }
    path.to_path_buf()
}

/// True if `inner` is `outer` or lies beneath it
pub fn is_within(inner: &Path, outer: &Path) -> bool {
    inner.starts_with(outer)
}
