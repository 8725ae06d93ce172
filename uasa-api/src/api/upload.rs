//! Roster file upload
//!
//! `POST /api/kelas/upload` takes a multipart form with a `csvFile` file part
//! and a `namaKelas` text part. The file is spooled to a temporary file that
//! is deleted when its guard drops, on every exit path.

use axum::{
    extract::{
        multipart::{Field, MultipartError, MultipartRejection},
        Multipart, Path as UrlPath, State,
    },
    routing::post,
    Json, Router,
};
use std::path::Path;
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};
use uasa_common::roster::decode_roster;
use uasa_common::{Class, Error as StoreError};

use super::kelas::{delete_class, get_class, ClassDataResponse, MessageResponse};
use super::required_name;
use crate::{ApiError, ApiResult, AppState};

/// Multipart part carrying the roster file
pub const FILE_FIELD: &str = "csvFile";

/// Path segment of the upload route; also a valid class name
pub const UPLOAD_SEGMENT: &str = "upload";

/// Multipart part carrying the class name
pub const CLASS_NAME_FIELD: &str = "namaKelas";

const READ_FAILED: &str = "Ralat membaca fail CSV.";

/// POST /api/kelas/upload
///
/// Parses the roster and creates the class or replaces its roster.
///
/// **Errors:**
/// - 400: no file part, or no class name
/// - 409: a concurrent upload created the same new class first
/// - 500: file unreadable or store failure
pub async fn upload_roster(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<ClassDataResponse>> {
    let mut multipart =
        multipart.map_err(|_| ApiError::BadRequest("Tiada fail dimuat naik.".to_string()))?;

    let mut upload: Option<NamedTempFile> = None;
    let mut nama_kelas: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(rejected)? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some(FILE_FIELD) => upload = Some(spool_to_temp(field, &state.upload_dir).await?),
            Some(CLASS_NAME_FIELD) => nama_kelas = Some(field.text().await.map_err(rejected)?),
            other => debug!("Ignoring multipart field {:?}", other),
        }
    }

    let Some(upload) = upload else {
        return Err(ApiError::BadRequest("Tiada fail dimuat naik.".to_string()));
    };
    let Some(nama_kelas) = required_name(nama_kelas) else {
        return Err(ApiError::BadRequest(
            "Nama Kelas diperlukan untuk muat naik.".to_string(),
        ));
    };

    let raw = tokio::fs::read(upload.path()).await.map_err(|e| {
        warn!("Failed to read uploaded roster {}: {}", upload.path().display(), e);
        ApiError::Internal(READ_FAILED.to_string())
    })?;

    // Remove the temporary file before touching the store
    if let Err(e) = upload.close() {
        warn!("Failed to remove uploaded roster file: {}", e);
    }

    let students = decode_roster(&raw, &state.subjects[..]).map_err(|e| {
        warn!("Rejected roster upload for '{}': {}", nama_kelas, e);
        ApiError::Internal(READ_FAILED.to_string())
    })?;

    let outcome = state
        .store
        .import_roster(&nama_kelas, students)
        .await
        .map_err(|e| match e {
            StoreError::Conflict(_) => ApiError::Conflict(
                "Nama Kelas ini sudah wujud. Sila pilih dari dropdown atau guna nama lain."
                    .to_string(),
            ),
            other => ApiError::from_store(
                other,
                "Kelas tidak ditemui.",
                "Ralat menyimpan senarai pelajar ke DB: ",
            ),
        })?;

    info!(
        "Roster upload for '{}' {}",
        nama_kelas,
        if outcome.is_created() { "created class" } else { "replaced roster" }
    );

    Ok(Json(ClassDataResponse {
        message: "Senarai pelajar berjaya dimuat naik dan disimpan!".to_string(),
        kelas_data: outcome.into_class(),
    }))
}

/// Stream a file part into a new temporary file in `dir`
async fn spool_to_temp(mut field: Field<'_>, dir: &Path) -> ApiResult<NamedTempFile> {
    let temp = create_temp_file(dir).map_err(|e| {
        warn!("Failed to create upload file in {}: {}", dir.display(), e);
        ApiError::Internal(READ_FAILED.to_string())
    })?;

    let write_failed = |e: std::io::Error| {
        warn!("Failed to write upload file: {}", e);
        ApiError::Internal(READ_FAILED.to_string())
    };

    let mut file = tokio::fs::File::from_std(temp.reopen().map_err(write_failed)?);
    while let Some(chunk) = field.chunk().await.map_err(rejected)? {
        file.write_all(&chunk).await.map_err(write_failed)?;
    }
    file.flush().await.map_err(write_failed)?;

    Ok(temp)
}

fn create_temp_file(dir: &Path) -> std::io::Result<NamedTempFile> {
    std::fs::create_dir_all(dir)?;
    tempfile::Builder::new()
        .prefix("roster-")
        .suffix(".csv")
        .tempfile_in(dir)
}

/// Multipart stream errors keep the status axum assigns (400, 413, ...)
fn rejected(err: MultipartError) -> ApiError {
    ApiError::Rejected(err.status(), err.body_text())
}

async fn get_class_named_upload(state: State<AppState>) -> ApiResult<Json<Class>> {
    get_class(state, UrlPath(UPLOAD_SEGMENT.to_string())).await
}

async fn delete_class_named_upload(state: State<AppState>) -> ApiResult<Json<MessageResponse>> {
    delete_class(state, UrlPath(UPLOAD_SEGMENT.to_string())).await
}

/// Build upload routes
///
/// `GET` and `DELETE` here address a class literally named `upload`.
pub fn upload_routes() -> Router<AppState> {
    Router::new().route(
        "/api/kelas/upload",
        post(upload_roster)
            .get(get_class_named_upload)
            .delete(delete_class_named_upload),
    )
}
