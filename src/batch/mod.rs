//! Composed helpers built on the transfer client: upload every local file
//! matching a glob pattern, and download-then-persist with collision-safe
//! naming.
//!
//! Missing-path and nothing-pending outcomes are reported as explicit
//! variants AND logged, so callers can branch without scraping logs while
//! external tooling that watches the log stream keeps working.

use std::path::{Path, PathBuf};

use tracing::{error, info, warn};
use uuid::Uuid;

use crate::transfer::{TransferClient, TransferError};

/// Outcome of [`download_and_save`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Status 200: content written to this path.
    Saved(PathBuf),
    /// Status 204: nothing pending on the server, nothing written.
    NoContent,
    /// Any other status: nothing written, status surfaced as data.
    Failed {
        /// The HTTP status the server answered with.
        status: u16,
        /// Its canonical reason phrase.
        reason: String,
    },
    /// The target directory does not exist; no request was made.
    MissingPath(PathBuf),
}

/// Outcome of [`upload_from_path`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadBatchOutcome {
    /// Number of files uploaded (zero when nothing matched the pattern).
    Uploaded(usize),
    /// The source directory does not exist; no request was made.
    MissingPath(PathBuf),
}

/// Uploads every local file under `path` matching `glob_pattern` to the
/// remote `upload_folder`, one upload call per match.
///
/// A missing `path` is logged as an error and reported as
/// [`UploadBatchOutcome::MissingPath`] without any network I/O. Matches are
/// visited in whatever order the filesystem enumeration yields - order is
/// not guaranteed. Each match is read fully into memory and uploaded under
/// its path string as the remote name. Matched directories are not filtered
/// out: reading one fails with an IO error that propagates.
///
/// # Errors
///
/// [`TransferError::Pattern`] for an invalid glob pattern,
/// [`TransferError::Io`] when a matched entry cannot be read, plus any
/// transport error from the individual uploads.
pub async fn upload_from_path(
    client: &TransferClient,
    glob_pattern: &str,
    path: impl AsRef<Path>,
    upload_folder: &str,
) -> Result<UploadBatchOutcome, TransferError> {
    let path = path.as_ref();
    if !path.exists() {
        error!(path = %absolute(path).display(), "path does not exist");
        return Ok(UploadBatchOutcome::MissingPath(path.to_path_buf()));
    }

    // Only the caller's pattern is glob syntax; metacharacters in the base
    // directory itself (e.g. `data[1]`) must match literally.
    let base = glob::Pattern::escape(&path.display().to_string());
    let pattern = format!("{base}/{glob_pattern}");
    let matches = glob::glob(&pattern).map_err(|source| TransferError::Pattern {
        pattern: pattern.clone(),
        source,
    })?;

    let mut uploaded = 0usize;
    for entry in matches {
        let entry = match entry {
            Ok(entry) => entry,
            Err(error) => {
                let path = error.path().to_path_buf();
                return Err(TransferError::io(path, error.into()));
            }
        };
        info!(
            pattern = glob_pattern,
            file = %absolute(&entry).display(),
            folder = upload_folder,
            "uploading matched file"
        );
        let content = tokio::fs::read(&entry)
            .await
            .map_err(|source| TransferError::io(&entry, source))?;
        let file_name = entry.display().to_string();
        client.upload(content, &file_name, upload_folder).await?;
        uploaded += 1;
    }

    Ok(UploadBatchOutcome::Uploaded(uploaded))
}

/// Downloads the next pending file (or the bundled archive of all pending
/// files when `download_all_files` is set) and writes it under `path` with
/// a collision-safe name.
///
/// A missing `path` is logged as an error and reported as
/// [`SaveOutcome::MissingPath`] without any network I/O. Otherwise the
/// result status is branched on: 200 writes exactly one file named
/// `<uuid-v4>_<suggested name>` (uuid alone when the server suggested
/// nothing), 204 warns and writes nothing, anything else error-logs the
/// full result and writes nothing.
///
/// # Errors
///
/// Transport/handshake errors from the download, and
/// [`TransferError::Io`] when the file cannot be written.
pub async fn download_and_save(
    client: &TransferClient,
    path: impl AsRef<Path>,
    download_all_files: bool,
) -> Result<SaveOutcome, TransferError> {
    let path = path.as_ref();
    if !path.exists() {
        error!(path = %path.display(), "path does not exist");
        return Ok(SaveOutcome::MissingPath(path.to_path_buf()));
    }

    let result = if download_all_files {
        client.download_all().await?
    } else {
        client.download().await?
    };

    match result.status {
        200 => {
            let full_path = path.join(unique_file_name(result.file_name.as_deref()));
            tokio::fs::write(&full_path, &result.content)
                .await
                .map_err(|source| TransferError::io(&full_path, source))?;
            info!(path = %full_path.display(), "saved");
            Ok(SaveOutcome::Saved(full_path))
        }
        204 => {
            warn!(reason = %result.reason, "no files available");
            Ok(SaveOutcome::NoContent)
        }
        status => {
            error!(
                status,
                reason = %result.reason,
                file_name = ?result.file_name,
                content_len = result.content.len(),
                "could not download files"
            );
            Ok(SaveOutcome::Failed {
                status,
                reason: result.reason,
            })
        }
    }
}

/// Builds a locally-unique save name: a fresh uuid, then the sanitized
/// server-suggested name when one exists. Two calls never collide even for
/// identical suggestions.
fn unique_file_name(suggested: Option<&str>) -> String {
    let id = Uuid::new_v4();
    match suggested.map(sanitize_file_name).filter(|name| !name.is_empty()) {
        Some(name) => format!("{id}_{name}"),
        None => id.to_string(),
    }
}

/// Replaces path separators and other characters invalid on common
/// filesystems so a server-suggested name cannot escape the target
/// directory.
fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

fn absolute(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
