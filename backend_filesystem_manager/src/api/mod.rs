// backend_filesystem_manager/src/api/mod.rs

pub mod browse;
pub mod files;
pub mod folders;
pub mod records;

use rocket::serde::json::Json;
use rocket::Route;

use crate::error::FsError;
use crate::vfs::path::MOUNT_SEPARATOR;

/// What every mutating endpoint answers: `true`, or a typed error.
pub type Done = Result<Json<bool>, FsError>;

/// Build a `namespace://path` URI for the mount manager.
pub fn mount_uri(namespace: &str, path: &str) -> String {
    format!("{namespace}{MOUNT_SEPARATOR}{path}")
}

/// Every route served under `/async`.
pub fn routes() -> Vec<Route> {
    routes![
        browse::browse_default,
        browse::browse,
        browse::flashes,
        files::autocomplete,
        files::create_file,
        files::delete_file,
        files::duplicate_file,
        files::rename_file,
        folders::create_folder,
        folders::rename_folder,
        folders::remove_folder,
        records::record_browser,
    ]
}
