use std::sync::Arc;

use axum::{
    extract::{Extension, Form, Query},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};

use motorshop_infra::tabular;
use motorshop_products::{FilterParams, ProductFilter, ProductReport};

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub const EXPORT_FILENAME: &str = "report.xlsx";

pub async fn report_query(
    Extension(services): Extension<Arc<AppServices>>,
    Query(params): Query<FilterParams>,
) -> axum::response::Response {
    report(&services, params.into_filter()).await
}

pub async fn report_form(
    Extension(services): Extension<Arc<AppServices>>,
    Form(params): Form<FilterParams>,
) -> axum::response::Response {
    report(&services, params.into_filter()).await
}

async fn report(services: &AppServices, filter: ProductFilter) -> axum::response::Response {
    match services.store.query(&filter).await {
        Ok(rows) => {
            let report = ProductReport::from_rows(rows);
            (StatusCode::OK, Json(dto::ReportResponse::new(report, filter))).into_response()
        }
        Err(e) => errors::inventory_error_to_response(e),
    }
}

/// Download the filtered rows as a spreadsheet.
pub async fn export(
    Extension(services): Extension<Arc<AppServices>>,
    Form(params): Form<FilterParams>,
) -> axum::response::Response {
    let filter = params.into_filter();
    let rows = match services.store.query(&filter).await {
        Ok(rows) => rows,
        Err(e) => return errors::inventory_error_to_response(e),
    };

    let bytes = match tabular::encode(&rows) {
        Ok(b) => b,
        Err(e) => return errors::inventory_error_to_response(e),
    };

    tracing::info!(rows = rows.len(), "report exported");
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, tabular::XLSX_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{EXPORT_FILENAME}\""),
            ),
        ],
        bytes,
    )
        .into_response()
}
