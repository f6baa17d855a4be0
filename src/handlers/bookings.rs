use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::Booking;
use crate::services::booking::{self, NewBooking};
use crate::state::AppState;

// Missing fields become empty strings and fail validation in the service,
// so every shape problem surfaces as the same 400-class error.
#[derive(Deserialize, Default)]
#[serde(default)]
pub struct CreateBookingRequest {
    pub day: String,
    pub slot: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub service_label: String,
    pub external_ref: Option<String>,
}

// POST /bookings
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<Booking>), AppError> {
    let request = NewBooking {
        day: payload.day,
        slot: payload.slot,
        customer_name: payload.customer_name,
        customer_phone: payload.customer_phone,
        service_label: payload.service_label,
        external_ref: payload.external_ref,
    };

    let booking = {
        let db = state.db.lock().unwrap();
        booking::create_booking(&db, request)?
    };

    tracing::info!(id = %booking.id, day = %booking.day, slot = %booking.slot, "booking created");

    Ok((StatusCode::CREATED, Json(booking)))
}

// GET /bookings
pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Booking>>, AppError> {
    let bookings = {
        let db = state.db.lock().unwrap();
        crate::db::queries::get_all_bookings(&db)?
    };
    Ok(Json(bookings))
}

// PUT /bookings/:id/status
pub async fn complete_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    {
        let db = state.db.lock().unwrap();
        booking::complete_booking(&db, &id)?;
    }

    tracing::info!(id = %id, "booking marked completed");

    Ok(Json(
        serde_json::json!({ "message": "booking marked completed" }),
    ))
}

// DELETE /bookings/:id
// Reports success even when the id is absent.
pub async fn delete_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let existed = {
        let db = state.db.lock().unwrap();
        booking::delete_booking(&db, &id)?
    };

    if !existed {
        tracing::debug!(id = %id, "delete requested for unknown booking");
    }

    Ok(Json(serde_json::json!({ "message": "booking deleted" })))
}

// DELETE /bookings/completed
pub async fn delete_completed(
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, AppError> {
    let deleted = {
        let db = state.db.lock().unwrap();
        booking::delete_completed_bookings(&db)?
    };

    tracing::info!(deleted, "removed completed bookings");

    Ok(Json(
        serde_json::json!({ "message": "completed bookings deleted", "deleted": deleted }),
    ))
}
