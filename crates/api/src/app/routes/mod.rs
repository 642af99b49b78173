use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

pub mod imports;
pub mod products;
pub mod reports;
pub mod system;

/// Router for every product endpoint.
pub fn router(max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/add_product", post(products::add_product))
        .route("/api/products", get(products::list_products))
        .route("/reports", get(reports::report_query).post(reports::report_form))
        .route("/export", post(reports::export))
        .route(
            "/import",
            post(imports::import_products).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
}
