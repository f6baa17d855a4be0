use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::User;

const TOKEN_TTL_SECS: i64 = 3600;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub exp: usize,
}

pub fn register(conn: &Connection, email: &str, password: &str) -> Result<User, AppError> {
    let email = email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::Validation("a valid email is required".to_string()));
    }
    if password.is_empty() {
        return Err(AppError::Validation("password is required".to_string()));
    }

    let password_hash = bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| AppError::Internal(e.into()))?;

    let user = User {
        id: Uuid::new_v4().to_string(),
        email: email.to_string(),
        password_hash,
    };

    if !queries::insert_user(conn, &user)? {
        return Err(AppError::Validation("email already registered".to_string()));
    }

    Ok(user)
}

/// Wrong email and wrong password are indistinguishable to the caller.
pub fn login(
    conn: &Connection,
    secret: &str,
    email: &str,
    password: &str,
) -> Result<String, AppError> {
    let user =
        queries::get_user_by_email(conn, email.trim())?.ok_or(AppError::InvalidCredentials)?;

    let valid = bcrypt::verify(password, &user.password_hash)
        .map_err(|e| AppError::Internal(e.into()))?;
    if !valid {
        return Err(AppError::InvalidCredentials);
    }

    let claims = Claims {
        sub: user.id,
        email: user.email,
        exp: (Utc::now() + Duration::seconds(TOKEN_TTL_SECS)).timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(e.into()))?;

    Ok(token)
}
