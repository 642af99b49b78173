use std::sync::Arc;

use axum::{
    extract::{rejection::FormRejection, Extension, Form, Query},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use motorshop_products::{FilterParams, ProductForm};

use crate::app::{dto, errors};
use crate::app::services::AppServices;

/// Product form submission.
pub async fn add_product(
    Extension(services): Extension<Arc<AppServices>>,
    form: Result<Form<ProductForm>, FormRejection>,
) -> axum::response::Response {
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            tracing::info!(error = %rejection, "unreadable product submission");
            return (
                rejection.status(),
                Json(dto::AddProductResponse {
                    ok: false,
                    flash: dto::Flash::danger(rejection.body_text()),
                    product: None,
                    form: None,
                }),
            )
                .into_response();
        }
    };

    let result = match form.parse() {
        Ok(candidate) => services.store.create(candidate).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(product) => {
            tracing::info!(product_id = %product.id, "product added");
            (
                StatusCode::CREATED,
                Json(dto::AddProductResponse {
                    ok: true,
                    flash: dto::Flash::success("product added"),
                    product: Some(product),
                    form: None,
                }),
            )
                .into_response()
        }
        Err(e) => (
            errors::status_for(&e),
            Json(dto::AddProductResponse {
                ok: false,
                flash: dto::Flash::danger(e.public_message()),
                product: None,
                form: Some(form),
            }),
        )
            .into_response(),
    }
}

/// JSON listing with the same filter parameters as the report view.
pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
    Query(params): Query<FilterParams>,
) -> axum::response::Response {
    let filter = params.into_filter();
    match services.store.query(&filter).await {
        Ok(rows) => (StatusCode::OK, Json(rows)).into_response(),
        Err(e) => errors::inventory_error_to_response(e),
    }
}
