// backend_filesystem_manager/src/api/browse.rs
use rocket::http::uri::fmt::Path as UriPath;
use rocket::http::uri::Segments;
use rocket::request::FlashMessage;
use rocket::response::Flash;
use rocket::serde::{json::Json, Serialize};
use rocket::{Either, State};

use crate::auth::Admin;
use crate::error::FsError;
use crate::vfs::entry::path_segments;
use crate::vfs::{path, FileEntry, FolderEntry, Listing, MountManager, PathSegment};

#[derive(Serialize, Debug)]
#[serde(crate = "rocket::serde")]
pub struct BrowseContext {
    pub namespace: String,
    pub title: String,
    pub files: Vec<FileEntry>,
    pub folders: Vec<FolderEntry>,
    pub pathsegments: Vec<PathSegment>,
    /// Name of the form field the picked file is written back to.
    pub key: Option<String>,
}

#[derive(Serialize, Debug)]
#[serde(crate = "rocket::serde")]
pub struct Notice {
    pub kind: String,
    pub message: String,
}

pub type BrowseResponse = Either<Json<BrowseContext>, Flash<Json<BrowseContext>>>;

/// Build the listing for `namespace://raw_path`. A folder that cannot be
/// listed is not an error: the listing is empty and a flash explains why.
async fn listing(
    mounts: &MountManager,
    namespace: &str,
    raw_path: &str,
    key: Option<String>,
) -> Result<BrowseResponse, FsError> {
    let fs = mounts.filesystem(namespace)?;
    let path = path::normalize(raw_path.trim_end_matches('/'))?;

    let (listing, failure) = match fs.browse(&path).await {
        Ok(listing) => (listing, None),
        Err(e) => {
            warn!("⚠️ cannot list {}://{}: {}", namespace, path, e);
            let msg = format!("Folder '{}' could not be found, or is not readable.", path);
            (Listing::default(), Some(msg))
        }
    };

    let context = BrowseContext {
        namespace: namespace.to_string(),
        title: format!("Files in {}", path),
        files: listing.files,
        folders: listing.folders,
        pathsegments: path_segments(&path),
        key,
    };
    Ok(match failure {
        None => Either::Left(Json(context)),
        Some(msg) => Either::Right(Flash::error(Json(context), msg)),
    })
}

// ------------- BROWSE -------------------------------------------------------
/// List a folder so a file can be picked for a form field
/// ### Arguments:
/// - `namespace`: mounted namespace, the default one for `/browse`
/// - `path` (optional): folder inside the namespace
/// - `key` (optional): form field the selection belongs to
/// ### Examples:
/// - GET /async/browse                          → default namespace root
/// - GET /async/browse/files/2024/holidays?key=image
#[get("/browse?<key>")]
pub async fn browse_default(
    key: Option<String>,
    mounts: &State<MountManager>,
    _admin: Admin,
) -> Result<BrowseResponse, FsError> {
    listing(mounts, mounts.default_namespace(), "", key).await
}

#[get("/browse/<namespace>/<path..>?<key>")]
pub async fn browse(
    namespace: &str,
    path: Segments<'_, UriPath>,
    key: Option<String>,
    mounts: &State<MountManager>,
    _admin: Admin,
) -> Result<BrowseResponse, FsError> {
    let raw = path.collect::<Vec<_>>().join("/");
    listing(mounts, namespace, &raw, key).await
}

/// Hand out (and consume) the pending flash message, if any
/// ### Examples:
/// - GET /async/flashes → `[{"kind":"error","message":"Folder 'x' could not be found, or is not readable."}]`
#[get("/flashes")]
pub fn flashes(flash: Option<FlashMessage<'_>>, _admin: Admin) -> Json<Vec<Notice>> {
    Json(
        flash
            .map(|f| Notice {
                kind: f.kind().to_string(),
                message: f.message().to_string(),
            })
            .into_iter()
            .collect(),
    )
}
