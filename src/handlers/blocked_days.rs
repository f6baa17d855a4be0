use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::BlockedDay;
use crate::services::blocking::{self, BlockOutcome};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct BlockDayRequest {
    pub day: Option<String>,
}

// POST /blocked-days
pub async fn block_day(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<BlockDayRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let day = payload
        .day
        .ok_or_else(|| AppError::Validation("day is required".to_string()))?;

    let outcome = {
        let db = state.db.lock().unwrap();
        blocking::block_day(&db, &day)?
    };

    let body = match outcome {
        BlockOutcome::Blocked(record) => {
            tracing::info!(day = %record.day, "day blocked");
            serde_json::json!({
                "message": "day blocked",
                "blocked": true,
                "id": record.id,
            })
        }
        BlockOutcome::AlreadyBlocked => {
            serde_json::json!({ "message": "day is already blocked" })
        }
        BlockOutcome::RejectedHasBookings => {
            serde_json::json!({ "message": "cannot block this day, bookings already exist" })
        }
    };

    Ok(Json(body))
}

// GET /blocked-days
pub async fn list_blocked_days(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<BlockedDay>>, AppError> {
    let blocked = {
        let db = state.db.lock().unwrap();
        blocking::list_blocked_days(&db)?
    };
    Ok(Json(blocked))
}

// DELETE /blocked-days/:id
// Lenient about absent ids, like booking deletion.
pub async fn unblock_day(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    {
        let db = state.db.lock().unwrap();
        blocking::unblock_day(&db, &id)?;
    }

    Ok(Json(serde_json::json!({ "message": "blocked day removed" })))
}
