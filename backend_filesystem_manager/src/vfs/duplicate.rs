// backend_filesystem_manager/src/vfs/duplicate.rs
use super::local::LocalFilesystem;
use super::path;
use crate::error::FsError;

/// How many counter values are tried after the plain `_copy` name.
pub const MAX_DUPLICATE_ATTEMPTS: u32 = 1000;

const COPY_SUFFIX: &str = "_copy";

/// Candidate name for a copy of `file`
/// ### Arguments:
/// - `file` (required): normalized path of the original
/// - `attempt` (required): 0 for `name_copy.ext`, n for `name_copy{n}.ext`
/// ### Examples:
/// - `duplicate_name("docs/report.pdf", 0)` → `docs/report_copy.pdf`
/// - `duplicate_name("docs/report.pdf", 3)` → `docs/report_copy3.pdf`
/// - `duplicate_name(".htaccess", 0)`       → `.htaccess_copy`
pub fn duplicate_name(file: &str, attempt: u32) -> String {
    let name_start = file.len() - path::file_name(file).len();
    let name = &file[name_start..];
    let (stem, ext) = match path::extension(name) {
        Some(ext) => (&file[..file.len() - ext.len() - 1], Some(ext)),
        None => (file, None),
    };

    let mut candidate = String::with_capacity(file.len() + COPY_SUFFIX.len() + 4);
    candidate.push_str(stem);
    candidate.push_str(COPY_SUFFIX);
    if attempt > 0 {
        candidate.push_str(&attempt.to_string());
    }
    if let Some(ext) = ext {
        candidate.push('.');
        candidate.push_str(ext);
    }
    candidate
}

/// Every candidate in the order they are tried, `_copy` first.
pub fn candidates(file: &str) -> impl Iterator<Item = String> + '_ {
    (0..=MAX_DUPLICATE_ATTEMPTS).map(move |attempt| duplicate_name(file, attempt))
}

/// Copy `file` next to itself under the first free candidate name.
/// ### Returns:
/// - `Result<String, FsError>`: path of the new copy
pub async fn duplicate(fs: &LocalFilesystem, file: &str) -> Result<String, FsError> {
    if !fs.has(file).await {
        return Err(FsError::NotFound(file.to_string()));
    }

    for candidate in candidates(file) {
        if fs.has(&candidate).await {
            continue;
        }
        match fs.copy(file, &candidate).await {
            Ok(()) => return Ok(candidate),
            // Someone else took the name between the check and the copy
            Err(FsError::AlreadyExists(_)) => continue,
            Err(e) => return Err(e),
        }
    }
    Err(FsError::NoFreeName(file.to_string()))
}
