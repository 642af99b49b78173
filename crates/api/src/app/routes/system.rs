use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::app::errors;
use crate::app::services::AppServices;

/// Liveness plus a store round trip.
pub async fn health(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.store.count().await {
        Ok(products) => (
            StatusCode::OK,
            Json(json!({ "status": "ok", "products": products })),
        )
            .into_response(),
        Err(e) => errors::inventory_error_to_response(e),
    }
}
