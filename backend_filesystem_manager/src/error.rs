// backend_filesystem_manager/src/error.rs
use rocket::http::Status;
use rocket::request::Request;
use rocket::response::{self, Responder, Response};
use rocket::serde::{json::Json, Serialize};
use std::io;
use thiserror::Error;

/// Everything a filesystem operation can fail with.
#[derive(Debug, Error)]
pub enum FsError {
    #[error("namespace '{0}' is not mounted")]
    UnknownNamespace(String),

    #[error("'{0}' could not be found")]
    NotFound(String),

    #[error("permission denied for '{0}'")]
    PermissionDenied(String),

    #[error("'{0}' already exists")]
    AlreadyExists(String),

    #[error("invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: &'static str },

    #[error("no free name left for a copy of '{0}'")]
    NoFreeName(String),

    #[error("I/O failure on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

impl FsError {
    /// Classify an I/O error raised while working on `path`.
    pub fn from_io(source: io::Error, path: impl Into<String>) -> Self {
        let path = path.into();
        match source.kind() {
            io::ErrorKind::NotFound => FsError::NotFound(path),
            io::ErrorKind::PermissionDenied => FsError::PermissionDenied(path),
            io::ErrorKind::AlreadyExists => FsError::AlreadyExists(path),
            _ => FsError::Io { path, source },
        }
    }

    pub fn invalid(path: impl Into<String>, reason: &'static str) -> Self {
        FsError::InvalidPath { path: path.into(), reason }
    }

    /// Stable machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            FsError::UnknownNamespace(_) => "unknown_namespace",
            FsError::NotFound(_) => "not_found",
            FsError::PermissionDenied(_) => "permission_denied",
            FsError::AlreadyExists(_) => "already_exists",
            FsError::InvalidPath { .. } => "invalid_path",
            FsError::NoFreeName(_) => "no_free_name",
            FsError::Io { .. } => "io",
        }
    }

    pub fn status(&self) -> Status {
        match self {
            FsError::UnknownNamespace(_) | FsError::NotFound(_) => Status::NotFound,
            FsError::PermissionDenied(_) => Status::Forbidden,
            FsError::AlreadyExists(_) | FsError::NoFreeName(_) => Status::Conflict,
            FsError::InvalidPath { .. } => Status::BadRequest,
            FsError::Io { .. } => Status::InternalServerError,
        }
    }
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ErrorBody {
    pub success: bool,
    pub kind: &'static str,
    pub message: String,
}

impl<'r> Responder<'r, 'static> for FsError {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'static> {
        let status = self.status();
        if status == Status::InternalServerError {
            error!("❌ {}", self);
        } else {
            warn!("⚠️ {}", self);
        }

        let body = Json(ErrorBody {
            success: false,
            kind: self.kind(),
            message: self.to_string(),
        });
        Response::build_from(body.respond_to(req)?)
            .status(status)
            .ok()
    }
}
