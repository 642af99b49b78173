use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use motorshop_core::{ErrorKind, InventoryError};

/// HTTP status for an inventory error. Storage failures are logged here, since
/// their detail never reaches the client.
pub fn status_for(err: &InventoryError) -> StatusCode {
    match err.kind() {
        ErrorKind::Validation | ErrorKind::Schema => StatusCode::BAD_REQUEST,
        ErrorKind::Storage => {
            tracing::error!(error = %err, "storage failure");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

pub fn inventory_error_to_response(err: InventoryError) -> axum::response::Response {
    let code = match err.kind() {
        ErrorKind::Validation => "validation_error",
        ErrorKind::Schema => "schema_error",
        ErrorKind::Storage => "storage_error",
    };
    json_error(status_for(&err), code, err.public_message())
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
