use serde::{Deserialize, Serialize};

/// A calendar day administratively closed to new bookings.
/// At most one record exists per day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockedDay {
    pub id: String,
    pub day: String,
    pub blocked: bool,
}
