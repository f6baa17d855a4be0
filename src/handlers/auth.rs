use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::errors::AppError;
use crate::services::auth;
use crate::state::AppState;

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

// POST /auth/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let user = {
        let db = state.db.lock().unwrap();
        auth::register(&db, &payload.email, &payload.password)?
    };

    tracing::info!(email = %user.email, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "message": "user registered" })),
    ))
}

// POST /auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let token = {
        let db = state.db.lock().unwrap();
        auth::login(&db, &state.config.secret_key, &payload.email, &payload.password)?
    };

    Ok(Json(serde_json::json!({ "token": token })))
}
