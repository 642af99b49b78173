use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{multipart::MultipartRejection, Extension, Multipart},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use motorshop_infra::tabular;

use crate::app::{dto, errors};
use crate::app::services::AppServices;

/// Multipart field carrying the spreadsheet.
pub const FILE_FIELD: &str = "file";

/// Bulk import from an uploaded spreadsheet. Nothing is stored unless every
/// row decodes and validates.
pub async fn import_products(
    Extension(services): Extension<Arc<AppServices>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> axum::response::Response {
    let bytes = match read_upload(multipart).await {
        Ok(Some(bytes)) => bytes,
        Ok(None) => return failed(StatusCode::BAD_REQUEST, "no file uploaded"),
        Err(message) => return failed(StatusCode::BAD_REQUEST, message),
    };

    let candidates = match tabular::decode(&bytes) {
        Ok(c) => c,
        Err(e) => {
            tracing::info!(error = %e, "import rejected");
            return failed(errors::status_for(&e), e.public_message());
        }
    };

    match services.store.bulk_create(candidates).await {
        Ok(outcome) => {
            tracing::info!(created = outcome.created, "import committed");
            (StatusCode::OK, Json(dto::ImportResponse::created(outcome.created))).into_response()
        }
        Err(e) => failed(errors::status_for(&e), e.public_message()),
    }
}

/// Pull the `file` field out of the request; `Ok(None)` when it is absent or empty.
async fn read_upload(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Option<Bytes>, String> {
    let mut multipart = multipart.map_err(|e| format!("expected a multipart upload: {e}"))?;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => return Ok(None),
            Err(e) => return Err(format!("malformed upload: {e}")),
        };
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let bytes = field
            .bytes()
            .await
            .map_err(|e| format!("failed to read upload: {e}"))?;
        return Ok(if bytes.is_empty() { None } else { Some(bytes) });
    }
}

fn failed(status: StatusCode, message: impl Into<String>) -> axum::response::Response {
    (status, Json(dto::ImportResponse::failed(message))).into_response()
}
