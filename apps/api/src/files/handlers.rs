use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use tracing::{info, warn};

use crate::errors::{is_unique_violation, AppError};
use crate::files::repository::{delete_file, filename_exists, get_file, insert_file, list_files};
use crate::models::files::{FileKind, FileRow};
use crate::state::AppState;
use crate::storage::StorageError;

#[derive(Debug, Serialize)]
pub struct RejectedFile {
    pub filename: String,
    pub reason: String,
}

/// Per-file outcome of a multipart upload. One bad file does not fail the others.
#[derive(Debug, Default, Serialize)]
pub struct UploadReport {
    pub uploaded: Vec<FileRow>,
    pub rejected: Vec<RejectedFile>,
}

/// GET /api/v1/files/:kind
pub async fn handle_list_files(
    State(state): State<AppState>,
    Path(kind): Path<FileKind>,
) -> Result<Json<Vec<FileRow>>, AppError> {
    Ok(Json(list_files(&state.db, kind).await?))
}

/// POST /api/v1/files/:kind
pub async fn handle_upload_files(
    State(state): State<AppState>,
    Path(kind): Path<FileKind>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadReport>), AppError> {
    let mut report = UploadReport::default();
    let mut seen_files = 0usize;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        // Non-file form fields are ignored.
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        seen_files += 1;
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Could not read \"{filename}\": {e}")))?;

        match upload_one(&state, kind, &filename, data).await {
            Ok(row) => report.uploaded.push(row),
            Err(err) => report.rejected.push(RejectedFile {
                reason: rejection_reason(&err),
                filename,
            }),
        }
    }

    if seen_files == 0 {
        return Err(AppError::Validation(format!(
            "Please select at least one PDF file to upload as {}.",
            kind.label()
        )));
    }

    info!(
        "{} upload: {} stored, {} rejected",
        kind.label(),
        report.uploaded.len(),
        report.rejected.len()
    );
    let status = if report.uploaded.is_empty() {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    Ok((status, Json(report)))
}

/// DELETE /api/v1/files/:kind/:id
pub async fn handle_delete_file(
    State(state): State<AppState>,
    Path((kind, id)): Path<(FileKind, i64)>,
) -> Result<StatusCode, AppError> {
    let file = get_file(&state.db, kind, id).await?.ok_or_else(|| {
        AppError::NotFound(format!("{} with id \"{id}\" not found.", kind.label()))
    })?;

    // The record is only removed once the blob is gone, so a failed delete can be retried.
    match state.storage.delete(&file.external_id).await {
        Ok(()) => {}
        Err(StorageError::NotFound(_)) => {
            warn!(
                "Blob {} for {} \"{}\" was already missing",
                file.external_id,
                kind.label(),
                file.original_filename
            );
        }
        Err(e) => return Err(e.into()),
    }

    let removed = delete_file(&state.db, kind, id).await?;
    record_removed(removed, kind, id)?;
    info!("Deleted {} \"{}\"", kind.label(), file.original_filename);
    Ok(StatusCode::NO_CONTENT)
}

/// A concurrent delete may have removed the record between lookup and delete.
fn record_removed(removed: bool, kind: FileKind, id: i64) -> Result<(), AppError> {
    if removed {
        Ok(())
    } else {
        Err(AppError::NotFound(format!(
            "{} with id \"{id}\" not found.",
            kind.label()
        )))
    }
}

async fn upload_one(
    state: &AppState,
    kind: FileKind,
    filename: &str,
    data: Bytes,
) -> Result<FileRow, AppError> {
    let filename = validate_pdf_name(filename)?;
    if data.is_empty() {
        return Err(AppError::Validation(format!("\"{filename}\" is empty.")));
    }
    if filename_exists(&state.db, kind, filename).await? {
        return Err(AppError::Conflict(format!(
            "{} \"{filename}\" already exists.",
            kind.label()
        )));
    }

    let folder = kind.folder(&state.config);
    let external_id = state.storage.upload(data, filename, folder).await?;

    match insert_file(&state.db, kind, filename, &external_id, folder).await {
        Ok(row) => Ok(row),
        Err(e) => {
            // Don't leave an orphaned blob behind.
            if let Err(cleanup) = state.storage.delete(&external_id).await {
                warn!("Failed to remove orphaned blob {external_id}: {cleanup}");
            }
            if is_unique_violation(&e) {
                Err(AppError::Conflict(format!(
                    "{} \"{filename}\" already exists.",
                    kind.label()
                )))
            } else {
                Err(e.into())
            }
        }
    }
}

/// Returns the bare file name if it names a PDF (extension checked case-insensitively).
pub fn validate_pdf_name(filename: &str) -> Result<&str, AppError> {
    let name = filename
        .rsplit(&['/', '\\'][..])
        .next()
        .unwrap_or_default()
        .trim();
    let is_pdf = name.len() > ".pdf".len() && name.to_ascii_lowercase().ends_with(".pdf");
    if is_pdf {
        Ok(name)
    } else {
        Err(AppError::Validation(format!(
            "Invalid file format for \"{filename}\". Please upload PDF files only."
        )))
    }
}

/// Client errors are reported verbatim; server-side failures get a generic reason.
fn rejection_reason(err: &AppError) -> String {
    match err {
        AppError::Validation(msg) | AppError::Conflict(msg) => msg.clone(),
        other => {
            warn!("Upload failed: {other}");
            "Upload failed due to a server error.".to_string()
        }
    }
}
