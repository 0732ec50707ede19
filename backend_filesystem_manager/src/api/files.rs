// backend_filesystem_manager/src/api/files.rs
use rocket::form::Form;
use rocket::serde::json::Json;
use rocket::State;

use super::{mount_uri, Done};
use crate::auth::Admin;
use crate::error::FsError;
use crate::vfs::{duplicate, path, MountManager};

/// Content of a freshly created file; some storage backends refuse empty writes.
const PLACEHOLDER: &[u8] = b" ";

#[derive(FromForm)]
pub struct NewFile<'r> {
    namespace: &'r str,
    #[field(name = "parentPath", default = "")]
    parent_path: &'r str,
    filename: &'r str,
}

#[derive(FromForm)]
pub struct FileRef<'r> {
    namespace: &'r str,
    filename: &'r str,
}

#[derive(FromForm)]
pub struct Rename<'r> {
    pub namespace: &'r str,
    #[field(default = "")]
    pub parent: &'r str,
    pub oldname: &'r str,
    pub newname: &'r str,
}

/// Comma separated extension filter, `"jpg, .PNG"` → `["jpg", "png"]`.
fn parse_extensions(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or_default()
        .split(',')
        .map(|ext| ext.trim().trim_start_matches('.').to_lowercase())
        .filter(|ext| !ext.is_empty())
        .collect()
}

// ------------- AUTOCOMPLETE -------------------------------------------------
/// Search files of the default namespace by name
/// ### Arguments:
/// - `term` (optional): part of the path to look for
/// - `ext` (optional): comma separated extensions to keep
/// ### Examples:
/// - GET /async/file/autocomplete?term=logo&ext=png,jpg → `["images/logo.png"]`
#[get("/file/autocomplete?<term>&<ext>")]
pub async fn autocomplete(
    term: Option<&str>,
    ext: Option<&str>,
    mounts: &State<MountManager>,
    _admin: Admin,
) -> Result<Json<Vec<String>>, FsError> {
    let extensions = parse_extensions(ext);
    let found = mounts.search(term.unwrap_or_default(), &extensions).await?;
    debug!("🔎 {} matches for {:?}", found.len(), term);
    Ok(Json(found))
}

// ------------- CREATE FILE --------------------------------------------------
/// Create an empty file
/// ### Examples:
/// - POST /async/file/create  FORM `namespace=files&parentPath=docs&filename=notes.txt`
#[post("/file/create", data = "<form>")]
pub async fn create_file(form: Form<NewFile<'_>>, mounts: &State<MountManager>, _admin: Admin) -> Done {
    let target = path::join(form.parent_path, form.filename)?;
    let uri = mount_uri(form.namespace, &target);
    mounts.create_file(&uri, PLACEHOLDER).await?;
    info!("📄 created {}", uri);
    Ok(Json(true))
}

// ------------- DELETE FILE --------------------------------------------------
/// Delete a file
/// ### Examples:
/// - POST /async/file/delete  FORM `namespace=files&filename=docs/notes.txt`
#[post("/file/delete", data = "<form>")]
pub async fn delete_file(form: Form<FileRef<'_>>, mounts: &State<MountManager>, _admin: Admin) -> Done {
    let uri = mount_uri(form.namespace, form.filename);
    mounts.delete(&uri).await?;
    info!("🗑️ deleted {}", uri);
    Ok(Json(true))
}

// ------------- DUPLICATE FILE -----------------------------------------------
/// Copy a file next to itself as `name_copy.ext` (or `name_copyN.ext`)
/// ### Examples:
/// - POST /async/file/duplicate  FORM `namespace=files&filename=report.pdf`
#[post("/file/duplicate", data = "<form>")]
pub async fn duplicate_file(form: Form<FileRef<'_>>, mounts: &State<MountManager>, _admin: Admin) -> Done {
    let fs = mounts.filesystem(form.namespace)?;
    let file = path::normalize(form.filename)?;
    let copy = duplicate::duplicate(fs, &file).await?;
    info!("📑 duplicated {}://{} as {}", form.namespace, file, copy);
    Ok(Json(true))
}

// ------------- RENAME FILE --------------------------------------------------
/// Rename a file inside its folder
/// ### Examples:
/// - POST /async/file/rename  FORM `namespace=files&parent=docs&oldname=a.txt&newname=b.txt`
#[post("/file/rename", data = "<form>")]
pub async fn rename_file(form: Form<Rename<'_>>, mounts: &State<MountManager>, _admin: Admin) -> Done {
    rename_entry(&form, mounts).await
}

/// Shared by file and folder renames: `parent/oldname` → `parent/newname`.
pub(super) async fn rename_entry(form: &Rename<'_>, mounts: &MountManager) -> Done {
    let from = path::join(form.parent, form.oldname)?;
    let to = path::join(form.parent, form.newname)?;
    mounts.rename(&mount_uri(form.namespace, &from), &to).await?;
    info!("✏️ renamed {}://{} to {}", form.namespace, from, to);
    Ok(Json(true))
}
