// backend_filesystem_manager/src/content.rs
use rocket::serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read content file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid content file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unknown content type '{0}'")]
    UnknownContentType(String),
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(crate = "rocket::serde", rename_all = "lowercase")]
pub enum Status {
    Published,
    Held,
    Timed,
    #[default]
    Draft,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(crate = "rocket::serde")]
pub struct Record {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub status: Status,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(crate = "rocket::serde")]
pub struct ContentType {
    /// Plural slug, e.g. `pages`.
    pub slug: String,
    /// Slug used in record links, e.g. `page`.
    pub singular_slug: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub singular_name: String,
    #[serde(default)]
    pub records: Vec<Record>,
}

impl ContentType {
    /// Title shown for a record, falling back to `Page #3` for untitled ones.
    pub fn record_title(&self, record: &Record) -> String {
        let title = record.title.trim();
        if !title.is_empty() {
            return title.to_string();
        }
        let label = if self.singular_name.is_empty() {
            &self.singular_slug
        } else {
            &self.singular_name
        };
        format!("{} #{}", label, record.id)
    }

    /// Front-end link of a record, `/page/about` or `/page/3` without a slug.
    pub fn record_link(&self, record: &Record) -> String {
        if record.slug.is_empty() {
            format!("/{}/{}", self.singular_slug, record.id)
        } else {
            format!("/{}/{}", self.singular_slug, record.slug)
        }
    }
}

/// Source of the structured content records.
#[rocket::async_trait]
pub trait ContentStore: Send + Sync {
    /// Every registered content type, in configuration order.
    async fn content_types(&self) -> Vec<ContentType>;

    /// Published records of one content type.
    async fn published_records(&self, slug: &str) -> Result<Vec<Record>, ContentError>;
}

#[derive(Deserialize, Debug, Default)]
#[serde(crate = "rocket::serde")]
struct ContentFile {
    #[serde(default)]
    contenttypes: Vec<ContentType>,
}

/// Content loaded once from a JSON document:
/// ```json
/// {"contenttypes": [{"slug": "pages", "singular_slug": "page",
///   "records": [{"id": 1, "title": "About", "slug": "about", "status": "published"}]}]}
/// ```
#[derive(Debug, Default)]
pub struct JsonContentStore {
    contenttypes: Vec<ContentType>,
}

impl JsonContentStore {
    pub fn empty() -> Self {
        JsonContentStore::default()
    }

    pub fn from_json(path_label: &str, raw: &str) -> Result<Self, ContentError> {
        let file: ContentFile = serde_json::from_str(raw).map_err(|source| ContentError::Parse {
            path: path_label.to_string(),
            source,
        })?;
        Ok(JsonContentStore {
            contenttypes: file.contenttypes,
        })
    }

    pub async fn load(path: &Path) -> Result<Self, ContentError> {
        let label = path.to_string_lossy().into_owned();
        let raw = rocket::tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ContentError::Read {
                path: label.clone(),
                source,
            })?;
        let store = Self::from_json(&label, &raw)?;
        info!(
            "📚 loaded {} content types from {}",
            store.contenttypes.len(),
            label
        );
        Ok(store)
    }
}

#[rocket::async_trait]
impl ContentStore for JsonContentStore {
    async fn content_types(&self) -> Vec<ContentType> {
        self.contenttypes.clone()
    }

    async fn published_records(&self, slug: &str) -> Result<Vec<Record>, ContentError> {
        let ct = self
            .contenttypes
            .iter()
            .find(|ct| ct.slug == slug)
            .ok_or_else(|| ContentError::UnknownContentType(slug.to_string()))?;
        Ok(ct
            .records
            .iter()
            .filter(|r| r.status == Status::Published)
            .cloned()
            .collect())
    }
}
