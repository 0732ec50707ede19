// backend_filesystem_manager/src/vfs/local.rs
use rocket::tokio::fs;
use rocket::tokio::io::AsyncWriteExt;
use std::path::{Path, PathBuf};

use super::entry::{Entry, FileEntry, FolderEntry};
use super::path;
use crate::error::FsError;

/// Files and folders of one directory, split the way the browser shows them.
#[derive(Debug, Default)]
pub struct Listing {
    pub files: Vec<FileEntry>,
    pub folders: Vec<FolderEntry>,
}

/// A namespace backed by a directory on the local disk.
///
/// Every path handed to it is relative to the root and already normalized
/// (see [`path::normalize`]). Symlinks are followed only as long as they
/// resolve inside the root.
#[derive(Debug)]
pub struct LocalFilesystem {
    root: PathBuf,
}

impl LocalFilesystem {
    /// Open `root`, creating it when missing.
    pub async fn open(root: impl AsRef<Path>) -> Result<Self, FsError> {
        let root = root.as_ref();
        let shown = root.to_string_lossy().into_owned();
        fs::create_dir_all(root)
            .await
            .map_err(|e| FsError::from_io(e, shown.clone()))?;
        let root = fs::canonicalize(root)
            .await
            .map_err(|e| FsError::from_io(e, shown))?;
        Ok(LocalFilesystem { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn full(&self, rel: &str) -> PathBuf {
        if rel.is_empty() {
            self.root.clone()
        } else {
            self.root.join(rel)
        }
    }

    /// For files/dirs that must already exist on disk.
    async fn resolve_existing(&self, rel: &str) -> Result<PathBuf, FsError> {
        let full = self.full(rel);
        let canon = fs::canonicalize(&full)
            .await
            .map_err(|e| FsError::from_io(e, rel))?;
        if !canon.starts_with(&self.root) {
            return Err(FsError::invalid(rel, "path escapes its namespace"));
        }
        Ok(full)
    }

    /// For a path about to be created: it must not exist yet and its closest
    /// existing ancestor must live inside the root.
    async fn resolve_new(&self, rel: &str) -> Result<PathBuf, FsError> {
        if rel.is_empty() {
            return Err(FsError::invalid(rel, "the namespace root cannot be a target"));
        }
        let full = self.full(rel);
        if fs::symlink_metadata(&full).await.is_ok() {
            return Err(FsError::AlreadyExists(rel.to_string()));
        }

        let mut ancestor = full.parent();
        while let Some(dir) = ancestor {
            if let Ok(canon) = fs::canonicalize(dir).await {
                if !canon.starts_with(&self.root) {
                    return Err(FsError::invalid(rel, "path escapes its namespace"));
                }
                break;
            }
            ancestor = dir.parent();
        }
        Ok(full)
    }

    async fn ensure_parent(&self, full: &Path, rel: &str) -> Result<(), FsError> {
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| FsError::from_io(e, path::parent(rel)))?;
        }
        Ok(())
    }

    pub async fn has(&self, rel: &str) -> bool {
        fs::symlink_metadata(self.full(rel)).await.is_ok()
    }

    /// Entries of the directory at `rel`, sorted by name.
    pub async fn list_contents(&self, rel: &str) -> Result<Vec<Entry>, FsError> {
        let dir = self.resolve_existing(rel).await?;
        let md = fs::metadata(&dir)
            .await
            .map_err(|e| FsError::from_io(e, rel))?;
        if !md.is_dir() {
            return Err(FsError::invalid(rel, "not a directory"));
        }

        let mut rd = fs::read_dir(&dir)
            .await
            .map_err(|e| FsError::from_io(e, rel))?;
        let mut entries = Vec::new();
        while let Some(entry) = rd.next_entry().await.map_err(|e| FsError::from_io(e, rel))? {
            let name = entry.file_name().to_string_lossy().into_owned();
            let md = match entry.metadata().await {
                Ok(md) => md,
                Err(e) => {
                    debug!("skipping unreadable entry {}: {}", name, e);
                    continue;
                }
            };
            let child = if rel.is_empty() { name } else { format!("{rel}/{name}") };
            entries.push(if md.is_dir() {
                Entry::Folder(FolderEntry::new(child, &md))
            } else {
                Entry::File(FileEntry::new(child, &md))
            });
        }
        entries.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(entries)
    }

    /// Visible files and folders of `rel`; dotfiles are hidden.
    pub async fn browse(&self, rel: &str) -> Result<Listing, FsError> {
        let mut listing = Listing::default();
        for entry in self.list_contents(rel).await? {
            if entry.name().starts_with('.') {
                continue;
            }
            match entry {
                Entry::File(f) => listing.files.push(f),
                Entry::Folder(f) => listing.folders.push(f),
            }
        }
        Ok(listing)
    }

    /// Create a new file holding `contents`. Missing parent folders are created.
    pub async fn create_file(&self, rel: &str, contents: &[u8]) -> Result<(), FsError> {
        let full = self.resolve_new(rel).await?;
        self.ensure_parent(&full, rel).await?;

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&full)
            .await
            .map_err(|e| FsError::from_io(e, rel))?;
        file.write_all(contents)
            .await
            .map_err(|e| FsError::from_io(e, rel))?;
        file.flush().await.map_err(|e| FsError::from_io(e, rel))?;
        Ok(())
    }

    /// Delete a single file.
    pub async fn delete(&self, rel: &str) -> Result<(), FsError> {
        let full = self.resolve_existing(rel).await?;
        let md = fs::symlink_metadata(&full)
            .await
            .map_err(|e| FsError::from_io(e, rel))?;
        if md.is_dir() {
            return Err(FsError::invalid(rel, "is a directory"));
        }
        fs::remove_file(&full)
            .await
            .map_err(|e| FsError::from_io(e, rel))
    }

    /// Delete a folder and everything below it.
    pub async fn delete_dir(&self, rel: &str) -> Result<(), FsError> {
        if rel.is_empty() {
            return Err(FsError::invalid(rel, "refusing to remove the namespace root"));
        }
        let full = self.resolve_existing(rel).await?;
        let md = fs::symlink_metadata(&full)
            .await
            .map_err(|e| FsError::from_io(e, rel))?;
        if !md.is_dir() {
            return Err(FsError::invalid(rel, "not a directory"));
        }
        fs::remove_dir_all(&full)
            .await
            .map_err(|e| FsError::from_io(e, rel))
    }

    /// Create a folder, including missing parents.
    pub async fn create_dir(&self, rel: &str) -> Result<(), FsError> {
        let full = self.resolve_new(rel).await?;
        fs::create_dir_all(&full)
            .await
            .map_err(|e| FsError::from_io(e, rel))
    }

    /// Copy a file to a path that must not exist yet.
    pub async fn copy(&self, from: &str, to: &str) -> Result<(), FsError> {
        let src = self.resolve_existing(from).await?;
        let md = fs::metadata(&src)
            .await
            .map_err(|e| FsError::from_io(e, from))?;
        if !md.is_file() {
            return Err(FsError::invalid(from, "not a file"));
        }

        let dst = self.resolve_new(to).await?;
        self.ensure_parent(&dst, to).await?;
        fs::copy(&src, &dst)
            .await
            .map(|_| ())
            .map_err(|e| FsError::from_io(e, to))
    }

    /// Move a file or folder to a path that must not exist yet.
    pub async fn rename(&self, from: &str, to: &str) -> Result<(), FsError> {
        if from.is_empty() {
            return Err(FsError::invalid(from, "the namespace root cannot be renamed"));
        }
        let src = self.resolve_existing(from).await?;
        let dst = self.resolve_new(to).await?;

        // A folder moved inside itself would never finish
        let is_dir = fs::symlink_metadata(&src)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false);
        if is_dir && to.starts_with(&format!("{from}/")) {
            return Err(FsError::invalid(to, "cannot move a folder inside itself"));
        }

        self.ensure_parent(&dst, to).await?;
        fs::rename(&src, &dst)
            .await
            .map_err(|e| FsError::from_io(e, from))
    }

    /// Files whose path contains `term` (case-insensitive), optionally
    /// restricted to `extensions`. Hidden files and folders are skipped.
    pub async fn search(&self, term: &str, extensions: &[String]) -> Result<Vec<String>, FsError> {
        let needle = term.to_lowercase();
        let mut found = Vec::new();
        let mut pending = vec![String::new()];

        while let Some(rel) = pending.pop() {
            let entries = match self.list_contents(&rel).await {
                Ok(entries) => entries,
                Err(e) if rel.is_empty() => return Err(e),
                Err(e) => {
                    debug!("search skipped {}: {}", rel, e);
                    continue;
                }
            };
            for entry in entries {
                if entry.name().starts_with('.') {
                    continue;
                }
                match entry {
                    Entry::Folder(folder) => pending.push(folder.path),
                    Entry::File(file) => {
                        let ext_ok = extensions.is_empty()
                            || file
                                .extension
                                .as_ref()
                                .map(|ext| extensions.iter().any(|e| e == ext))
                                .unwrap_or(false);
                        if ext_ok && file.path.to_lowercase().contains(&needle) {
                            found.push(file.path);
                        }
                    }
                }
            }
        }

        found.sort();
        Ok(found)
    }
}
