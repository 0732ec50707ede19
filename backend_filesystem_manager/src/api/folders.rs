// backend_filesystem_manager/src/api/folders.rs
use rocket::form::Form;
use rocket::serde::json::Json;
use rocket::State;

use super::files::{rename_entry, Rename};
use super::{mount_uri, Done};
use crate::auth::Admin;
use crate::vfs::{path, MountManager};

#[derive(FromForm)]
pub struct FolderRef<'r> {
    namespace: &'r str,
    #[field(default = "")]
    parent: &'r str,
    foldername: &'r str,
}

impl FolderRef<'_> {
    fn uri(&self) -> Result<String, crate::error::FsError> {
        let target = path::join(self.parent, self.foldername)?;
        Ok(mount_uri(self.namespace, &target))
    }
}

// ------------- CREATE FOLDER ------------------------------------------------
/// Create a folder
/// ### Examples:
/// - POST /async/folder/create  FORM `namespace=files&parent=2024/&foldername=holidays`
#[post("/folder/create", data = "<form>")]
pub async fn create_folder(form: Form<FolderRef<'_>>, mounts: &State<MountManager>, _admin: Admin) -> Done {
    let uri = form.uri()?;
    mounts.create_dir(&uri).await?;
    info!("📁 created {}", uri);
    Ok(Json(true))
}

// ------------- RENAME FOLDER ------------------------------------------------
/// Rename a folder
/// ### Examples:
/// - POST /async/folder/rename  FORM `namespace=files&parent=2024/&oldname=holidays&newname=trips`
#[post("/folder/rename", data = "<form>")]
pub async fn rename_folder(form: Form<Rename<'_>>, mounts: &State<MountManager>, _admin: Admin) -> Done {
    rename_entry(&form, mounts).await
}

// ------------- REMOVE FOLDER ------------------------------------------------
/// Delete a folder and everything in it
/// ### Examples:
/// - POST /async/folder/remove  FORM `namespace=files&parent=2024/&foldername=holidays`
#[post("/folder/remove", data = "<form>")]
pub async fn remove_folder(form: Form<FolderRef<'_>>, mounts: &State<MountManager>, _admin: Admin) -> Done {
    let uri = form.uri()?;
    mounts.delete_dir(&uri).await?;
    info!("🗑️ removed folder {}", uri);
    Ok(Json(true))
}
