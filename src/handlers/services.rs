use axum::Json;

use crate::models::service::{ServiceItem, CATALOG};

// GET /services
pub async fn list_services() -> Json<Vec<ServiceItem>> {
    Json(CATALOG.to_vec())
}
