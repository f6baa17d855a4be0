use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    // bcrypt hash, never exposed in JSON
    #[serde(skip_serializing)]
    pub password_hash: String,
}
