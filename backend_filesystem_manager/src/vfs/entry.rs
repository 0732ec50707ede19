// backend_filesystem_manager/src/vfs/entry.rs
use rocket::serde::Serialize;
use std::fs::Metadata;
use std::time::UNIX_EPOCH;

use super::path;

const IMAGE_EXTENSIONS: [&str; 7] = ["gif", "jpg", "jpeg", "png", "svg", "webp", "bmp"];

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(crate = "rocket::serde")]
pub struct FileEntry {
    pub name: String,
    pub path: String,
    pub extension: Option<String>,
    pub size: u64,
    /// Seconds since the Unix epoch.
    pub modified: Option<u64>,
    pub is_image: bool,
    pub writable: bool,
}

impl FileEntry {
    pub fn new(rel_path: String, md: &Metadata) -> Self {
        let name = path::file_name(&rel_path).to_string();
        let extension = path::extension(&name).map(str::to_lowercase);
        let is_image = extension
            .as_deref()
            .map(|ext| IMAGE_EXTENSIONS.contains(&ext))
            .unwrap_or(false);
        FileEntry {
            name,
            path: rel_path,
            extension,
            size: md.len(),
            modified: md
                .modified()
                .ok()
                .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
                .map(|d| d.as_secs()),
            is_image,
            writable: !md.permissions().readonly(),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(crate = "rocket::serde")]
pub struct FolderEntry {
    pub name: String,
    pub path: String,
    pub writable: bool,
}

impl FolderEntry {
    pub fn new(rel_path: String, md: &Metadata) -> Self {
        FolderEntry {
            name: path::file_name(&rel_path).to_string(),
            path: rel_path,
            writable: !md.permissions().readonly(),
        }
    }
}

/// Either kind of directory entry, as returned by `list_contents`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    File(FileEntry),
    Folder(FolderEntry),
}

impl Entry {
    pub fn name(&self) -> &str {
        match self {
            Entry::File(f) => &f.name,
            Entry::Folder(f) => &f.name,
        }
    }
}

/// One step of the breadcrumb shown above a listing.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(crate = "rocket::serde")]
pub struct PathSegment {
    /// Cumulative path up to and including this segment, ending in `/`.
    pub path: String,
    pub name: String,
}

/// Split `a/b/c` into `a/`, `a/b/`, `a/b/c/` breadcrumbs.
pub fn path_segments(path: &str) -> Vec<PathSegment> {
    let mut cumulative = String::new();
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(|segment| {
            cumulative.push_str(segment);
            cumulative.push('/');
            PathSegment {
                path: cumulative.clone(),
                name: segment.to_string(),
            }
        })
        .collect()
}
