//! Class roster endpoints
//!
//! - `GET /api/kelas` list class names
//! - `POST /api/kelas` create an empty or pre-filled class
//! - `GET /api/kelas/:nama_kelas` fetch one class
//! - `POST /api/kelas/simpan` replace a class roster (marks included)
//! - `DELETE /api/kelas/:nama_kelas` delete a class and its students
//!
//! `GET` and `DELETE` on `/api/kelas/simpan` and `/api/kelas/upload` act on
//! classes with those names, since the static routes shadow `:nama_kelas`.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uasa_common::{Class, ClassSummary, Student};

use super::required_name;
use crate::{ApiError, ApiResult, AppState};

const CLASS_NOT_FOUND: &str = "Kelas tidak ditemui.";

/// Path segment of the save route; also a valid class name
pub const SAVE_SEGMENT: &str = "simpan";

/// Body of `POST /api/kelas` and `POST /api/kelas/simpan`
#[derive(Debug, Deserialize)]
pub struct RosterRequest {
    #[serde(rename = "namaKelas", default)]
    pub nama_kelas: Option<String>,

    #[serde(default)]
    pub pelajar: Option<Vec<Student>>,
}

#[derive(Debug, Serialize)]
pub struct SaveRosterResponse {
    pub message: String,
    #[serde(rename = "savedData")]
    pub saved_data: Class,
}

/// Response carrying a stored class (create and upload)
#[derive(Debug, Serialize)]
pub struct ClassDataResponse {
    pub message: String,
    #[serde(rename = "kelasData")]
    pub kelas_data: Class,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// GET /api/kelas
///
/// Class names only, ascending.
pub async fn list_classes(State(state): State<AppState>) -> ApiResult<Json<Vec<ClassSummary>>> {
    let classes = state.store.list_class_names().await.map_err(|e| {
        ApiError::from_store(e, CLASS_NOT_FOUND, "Ralat mendapatkan senarai kelas: ")
    })?;

    Ok(Json(classes))
}

/// GET /api/kelas/:nama_kelas
pub async fn get_class(
    State(state): State<AppState>,
    Path(nama_kelas): Path<String>,
) -> ApiResult<Json<Class>> {
    let class = state
        .store
        .get_class(&nama_kelas)
        .await
        .map_err(|e| ApiError::from_store(e, CLASS_NOT_FOUND, "Ralat mendapatkan data kelas: "))?;

    Ok(Json(class))
}

/// POST /api/kelas/simpan
///
/// Replaces the class's whole roster. Never creates a class.
///
/// **Errors:**
/// - 400: `namaKelas` or `pelajar` missing, or body not valid JSON
/// - 404: class does not exist
/// - 500: store failure
pub async fn save_roster(
    State(state): State<AppState>,
    payload: Result<Json<RosterRequest>, JsonRejection>,
) -> ApiResult<Json<SaveRosterResponse>> {
    let Json(request) = payload.map_err(|rejection| {
        ApiError::BadRequest(format!("Data permintaan tidak sah: {}", rejection.body_text()))
    })?;

    let (Some(nama_kelas), Some(pelajar)) = (required_name(request.nama_kelas), request.pelajar)
    else {
        return Err(ApiError::BadRequest(
            "Nama kelas atau data pelajar diperlukan.".to_string(),
        ));
    };

    let saved = state
        .store
        .replace_roster(&nama_kelas, pelajar)
        .await
        .map_err(|e| {
            ApiError::from_store(
                e,
                "Kelas tidak ditemui untuk dikemas kini.",
                "Ralat menyimpan data: ",
            )
        })?;

    Ok(Json(SaveRosterResponse {
        message: "Data berjaya disimpan!".to_string(),
        saved_data: saved,
    }))
}

/// POST /api/kelas
///
/// **Errors:**
/// - 400: `namaKelas` missing, or body not valid JSON
/// - 409: a class with this name already exists
/// - 500: store failure
pub async fn create_class(
    State(state): State<AppState>,
    payload: Result<Json<RosterRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ClassDataResponse>)> {
    let Json(request) = payload.map_err(|rejection| {
        ApiError::BadRequest(format!("Data permintaan tidak sah: {}", rejection.body_text()))
    })?;

    let Some(nama_kelas) = required_name(request.nama_kelas) else {
        return Err(ApiError::BadRequest("Nama kelas diperlukan.".to_string()));
    };

    let created = state
        .store
        .create_class(&nama_kelas, request.pelajar.unwrap_or_default())
        .await
        .map_err(|e| match e {
            uasa_common::Error::Conflict(_) => {
                ApiError::Conflict("Nama Kelas ini sudah wujud. Sila guna nama lain.".to_string())
            }
            other => ApiError::from_store(other, CLASS_NOT_FOUND, "Ralat mencipta kelas: "),
        })?;

    Ok((
        StatusCode::CREATED,
        Json(ClassDataResponse {
            message: "Kelas berjaya dicipta!".to_string(),
            kelas_data: created,
        }),
    ))
}

/// DELETE /api/kelas/:nama_kelas
pub async fn delete_class(
    State(state): State<AppState>,
    Path(nama_kelas): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let Some(nama_kelas) = required_name(Some(nama_kelas)) else {
        return Err(ApiError::BadRequest("Nama kelas diperlukan.".to_string()));
    };

    state
        .store
        .delete_class(&nama_kelas)
        .await
        .map_err(|e| ApiError::from_store(e, CLASS_NOT_FOUND, "Ralat memadam kelas: "))?;

    info!("Class '{}' deleted via API", nama_kelas);
    Ok(Json(MessageResponse {
        message: "Kelas berjaya dipadam!".to_string(),
    }))
}

/// GET /api/kelas/simpan looks up a class named `simpan`
async fn get_class_named_simpan(state: State<AppState>) -> ApiResult<Json<Class>> {
    get_class(state, Path(SAVE_SEGMENT.to_string())).await
}

/// DELETE /api/kelas/simpan removes a class named `simpan`
async fn delete_class_named_simpan(state: State<AppState>) -> ApiResult<Json<MessageResponse>> {
    delete_class(state, Path(SAVE_SEGMENT.to_string())).await
}

/// DELETE /api/kelas/ with no name segment
pub async fn delete_class_without_name() -> ApiError {
    ApiError::BadRequest("Nama kelas diperlukan.".to_string())
}

/// Build class roster routes
pub fn kelas_routes() -> Router<AppState> {
    Router::new()
        .route("/api/kelas", get(list_classes).post(create_class))
        .route("/api/kelas/", delete(delete_class_without_name))
        .route(
            "/api/kelas/simpan",
            post(save_roster)
                .get(get_class_named_simpan)
                .delete(delete_class_named_simpan),
        )
        .route("/api/kelas/:nama_kelas", get(get_class).delete(delete_class))
}
