use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::errors::AppError;
use crate::services::availability;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SlotsQuery {
    pub day: Option<String>,
}

// GET /slots?day=YYYY-MM-DD
pub async fn get_slots(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SlotsQuery>,
) -> Result<Json<Vec<String>>, AppError> {
    let day = query
        .day
        .ok_or_else(|| AppError::Validation("day query parameter is required".to_string()))?;

    let slots = {
        let db = state.db.lock().unwrap();
        availability::available_slots(&db, state.clock.as_ref(), &day)?
    };

    tracing::debug!(day = %day, count = slots.len(), "resolved available slots");

    Ok(Json(slots))
}
