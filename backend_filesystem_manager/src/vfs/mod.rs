// backend_filesystem_manager/src/vfs/mod.rs

pub mod duplicate;
pub mod entry;
pub mod local;
pub mod path;

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::error::FsError;
pub use entry::{Entry, FileEntry, FolderEntry, PathSegment};
pub use local::{Listing, LocalFilesystem};
pub use path::MountPath;

/// Table of mounted namespaces. Operations addressed with a mount URI
/// (`files://images/logo.png`) are routed to the namespace's filesystem.
#[derive(Debug)]
pub struct MountManager {
    mounts: BTreeMap<String, LocalFilesystem>,
    default_namespace: String,
}

impl MountManager {
    pub fn new(default_namespace: impl Into<String>) -> Self {
        MountManager {
            mounts: BTreeMap::new(),
            default_namespace: default_namespace.into(),
        }
    }

    /// Open every configured root and mount it under its namespace.
    pub async fn mount_all(
        roots: &BTreeMap<String, PathBuf>,
        default_namespace: &str,
    ) -> Result<Self, FsError> {
        let mut manager = MountManager::new(default_namespace);
        for (namespace, root) in roots {
            let fs = LocalFilesystem::open(root).await?;
            info!("📂 mounted {}:// at {:?}", namespace, fs.root());
            manager.mount(namespace.clone(), fs);
        }
        if !manager.mounts.contains_key(default_namespace) {
            warn!("⚠️ default namespace '{}' is not mounted", default_namespace);
        }
        Ok(manager)
    }

    pub fn mount(&mut self, namespace: impl Into<String>, fs: LocalFilesystem) {
        self.mounts.insert(namespace.into(), fs);
    }

    pub fn default_namespace(&self) -> &str {
        &self.default_namespace
    }

    pub fn filesystem(&self, namespace: &str) -> Result<&LocalFilesystem, FsError> {
        self.mounts
            .get(namespace)
            .ok_or_else(|| FsError::UnknownNamespace(namespace.to_string()))
    }

    fn resolve(&self, uri: &str) -> Result<(&LocalFilesystem, MountPath), FsError> {
        let target = MountPath::parse(uri)?;
        let fs = self.filesystem(&target.namespace)?;
        Ok((fs, target))
    }

    pub async fn has(&self, uri: &str) -> Result<bool, FsError> {
        let (fs, target) = self.resolve(uri)?;
        Ok(fs.has(&target.path).await)
    }

    pub async fn create_file(&self, uri: &str, contents: &[u8]) -> Result<(), FsError> {
        let (fs, target) = self.resolve(uri)?;
        fs.create_file(&target.path, contents).await
    }

    pub async fn delete(&self, uri: &str) -> Result<(), FsError> {
        let (fs, target) = self.resolve(uri)?;
        fs.delete(&target.path).await
    }

    pub async fn delete_dir(&self, uri: &str) -> Result<(), FsError> {
        let (fs, target) = self.resolve(uri)?;
        fs.delete_dir(&target.path).await
    }

    pub async fn create_dir(&self, uri: &str) -> Result<(), FsError> {
        let (fs, target) = self.resolve(uri)?;
        fs.create_dir(&target.path).await
    }

    /// Rename inside one namespace: `to` is a plain path in the namespace
    /// of `from_uri`.
    pub async fn rename(&self, from_uri: &str, to: &str) -> Result<(), FsError> {
        let (fs, from) = self.resolve(from_uri)?;
        let to = path::normalize(to)?;
        fs.rename(&from.path, &to).await
    }

    /// Search the default namespace.
    pub async fn search(&self, term: &str, extensions: &[String]) -> Result<Vec<String>, FsError> {
        self.filesystem(&self.default_namespace)?
            .search(term, extensions)
            .await
    }
}
