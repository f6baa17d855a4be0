use rusqlite::Connection;
use uuid::Uuid;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::BlockedDay;
use crate::services::slots::parse_day;

/// Three-way outcome of a block request. `AlreadyBlocked` and
/// `RejectedHasBookings` are informational refusals, not errors.
#[derive(Debug)]
pub enum BlockOutcome {
    Blocked(BlockedDay),
    AlreadyBlocked,
    RejectedHasBookings,
}

/// Blocks a day unless it already carries bookings of any status. The
/// caller holds the shared connection lock, which serializes this
/// check-then-insert against concurrent admissions; the UNIQUE(day)
/// constraint backstops duplicate blocks.
pub fn block_day(conn: &Connection, day: &str) -> Result<BlockOutcome, AppError> {
    if parse_day(day).is_none() {
        return Err(AppError::Validation(
            "invalid day, expected YYYY-MM-DD".to_string(),
        ));
    }

    if queries::get_blocked_day(conn, day)?.is_some() {
        return Ok(BlockOutcome::AlreadyBlocked);
    }

    if queries::day_has_bookings(conn, day)? {
        return Ok(BlockOutcome::RejectedHasBookings);
    }

    let record = BlockedDay {
        id: Uuid::new_v4().to_string(),
        day: day.to_string(),
        blocked: true,
    };
    queries::insert_blocked_day(conn, &record)?;

    Ok(BlockOutcome::Blocked(record))
}

/// Lenient about absent ids, mirroring booking deletion.
pub fn unblock_day(conn: &Connection, id: &str) -> Result<bool, AppError> {
    Ok(queries::delete_blocked_day(conn, id)?)
}

pub fn list_blocked_days(conn: &Connection) -> Result<Vec<BlockedDay>, AppError> {
    Ok(queries::list_blocked_days(conn)?)
}
