use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    /// Client-stable correlation token; generated when the client omits it.
    pub external_ref: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub day: String,
    pub slot: String,
    pub starts_at: NaiveDateTime,
    pub status: BookingStatus,
    pub service_label: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Scheduled,
    Completed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Scheduled => "scheduled",
            BookingStatus::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "completed" => BookingStatus::Completed,
            _ => BookingStatus::Scheduled,
        }
    }
}
