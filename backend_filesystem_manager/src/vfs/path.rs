// backend_filesystem_manager/src/vfs/path.rs
use crate::error::FsError;

/// Separator between a namespace and its path in a mount URI.
pub const MOUNT_SEPARATOR: &str = "://";

const DANGEROUS_CHARS: [char; 7] = ['<', '>', ':', '"', '|', '?', '*'];

/// Sanitize and normalize a path relative to a namespace root
/// ### Arguments:
/// - `raw` (required): the path as received from the client
/// ### Returns:
/// - `Result<String, FsError>`: `a/b/c` style path, empty for the root
pub fn normalize(raw: &str) -> Result<String, FsError> {
    if raw.contains('\0') {
        return Err(FsError::invalid(raw, "path contains null bytes"));
    }
    if raw.chars().any(|c| DANGEROUS_CHARS.contains(&c)) {
        return Err(FsError::invalid(raw, "path contains dangerous characters"));
    }

    let unified = raw.replace('\\', "/");
    let mut segments = Vec::new();
    for segment in unified.split('/') {
        match segment {
            "" | "." => continue,
            ".." => return Err(FsError::invalid(raw, "path escapes its namespace")),
            s => segments.push(s),
        }
    }
    Ok(segments.join("/"))
}

/// Join a parent folder and an entry name, then normalize.
/// Parents with and without a trailing slash give the same result.
pub fn join(parent: &str, name: &str) -> Result<String, FsError> {
    normalize(&format!("{parent}/{name}"))
}

/// Last segment of a normalized path.
pub fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Parent of a normalized path, empty for top-level entries.
pub fn parent(path: &str) -> &str {
    path.rfind('/').map(|i| &path[..i]).unwrap_or("")
}

/// Extension of a file name: the text after the last dot, unless the only
/// dot is the leading one of a dotfile.
pub fn extension(name: &str) -> Option<&str> {
    match name.rfind('.') {
        Some(0) | None => None,
        Some(i) => Some(&name[i + 1..]),
    }
}

/// A `namespace://path` reference into the mount manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountPath {
    pub namespace: String,
    pub path: String,
}

impl MountPath {
    pub fn parse(uri: &str) -> Result<Self, FsError> {
        let (namespace, rest) = uri
            .split_once(MOUNT_SEPARATOR)
            .ok_or_else(|| FsError::invalid(uri, "missing namespace prefix"))?;
        if namespace.is_empty() {
            return Err(FsError::invalid(uri, "empty namespace"));
        }
        Ok(MountPath {
            namespace: namespace.to_string(),
            path: normalize(rest)?,
        })
    }
}

impl std::fmt::Display for MountPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}{}", self.namespace, MOUNT_SEPARATOR, self.path)
    }
}
