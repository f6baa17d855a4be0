use chrono::{NaiveDateTime, Utc};
use rusqlite::{params, Connection, ErrorCode};

use crate::models::{BlockedDay, Booking, BookingStatus, User};

const BOOKING_COLUMNS: &str = "id, external_ref, customer_name, customer_phone, day, slot, starts_at, status, service_label, created_at, updated_at";

// ── Bookings ──

/// Outcome of an insert against the UNIQUE(day, slot) index. The index is
/// what actually arbitrates concurrent inserts for the same slot; callers
/// may pre-check for a friendlier message but must not rely on it.
#[derive(Debug, PartialEq, Eq)]
pub enum InsertOutcome {
    Created,
    Conflict,
}

pub fn insert_booking(conn: &Connection, booking: &Booking) -> anyhow::Result<InsertOutcome> {
    let starts_at = booking.starts_at.format("%Y-%m-%d %H:%M:%S").to_string();
    let created_at = booking.created_at.format("%Y-%m-%d %H:%M:%S").to_string();
    let updated_at = booking.updated_at.format("%Y-%m-%d %H:%M:%S").to_string();

    let result = conn.execute(
        "INSERT INTO bookings (id, external_ref, customer_name, customer_phone, day, slot, starts_at, status, service_label, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            booking.id,
            booking.external_ref,
            booking.customer_name,
            booking.customer_phone,
            booking.day,
            booking.slot,
            starts_at,
            booking.status.as_str(),
            booking.service_label,
            created_at,
            updated_at,
        ],
    );

    match result {
        Ok(_) => Ok(InsertOutcome::Created),
        Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
            Ok(InsertOutcome::Conflict)
        }
        Err(e) => Err(e.into()),
    }
}

pub fn get_booking_by_day_slot(
    conn: &Connection,
    day: &str,
    slot: &str,
) -> anyhow::Result<Option<Booking>> {
    let result = conn.query_row(
        &format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE day = ?1 AND slot = ?2"),
        params![day, slot],
        |row| Ok(parse_booking_row(row)),
    );

    match result {
        Ok(booking) => Ok(Some(booking?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn get_bookings_for_day(conn: &Connection, day: &str) -> anyhow::Result<Vec<Booking>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {BOOKING_COLUMNS} FROM bookings WHERE day = ?1 ORDER BY slot ASC"
    ))?;

    let rows = stmt.query_map(params![day], |row| Ok(parse_booking_row(row)))?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

pub fn get_all_bookings(conn: &Connection) -> anyhow::Result<Vec<Booking>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {BOOKING_COLUMNS} FROM bookings ORDER BY starts_at ASC"
    ))?;

    let rows = stmt.query_map([], |row| Ok(parse_booking_row(row)))?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

pub fn get_booking_by_id(conn: &Connection, id: &str) -> anyhow::Result<Option<Booking>> {
    let result = conn.query_row(
        &format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = ?1"),
        params![id],
        |row| Ok(parse_booking_row(row)),
    );

    match result {
        Ok(booking) => Ok(Some(booking?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Returns false when no booking with the given id exists. Re-marking an
/// already-completed booking matches a row and reports true.
pub fn set_booking_completed(conn: &Connection, id: &str) -> anyhow::Result<bool> {
    let now = Utc::now()
        .naive_utc()
        .format("%Y-%m-%d %H:%M:%S")
        .to_string();
    let count = conn.execute(
        "UPDATE bookings SET status = ?1, updated_at = ?2 WHERE id = ?3",
        params![BookingStatus::Completed.as_str(), now, id],
    )?;
    Ok(count > 0)
}

pub fn delete_booking(conn: &Connection, id: &str) -> anyhow::Result<bool> {
    let count = conn.execute("DELETE FROM bookings WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

pub fn delete_bookings_with_status(
    conn: &Connection,
    status: BookingStatus,
) -> anyhow::Result<usize> {
    let count = conn.execute(
        "DELETE FROM bookings WHERE status = ?1",
        params![status.as_str()],
    )?;
    Ok(count)
}

pub fn day_has_bookings(conn: &Connection, day: &str) -> anyhow::Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM bookings WHERE day = ?1",
        params![day],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

fn parse_booking_row(row: &rusqlite::Row) -> anyhow::Result<Booking> {
    let id: String = row.get(0)?;
    let external_ref: String = row.get(1)?;
    let customer_name: String = row.get(2)?;
    let customer_phone: String = row.get(3)?;
    let day: String = row.get(4)?;
    let slot: String = row.get(5)?;
    let starts_at_str: String = row.get(6)?;
    let status_str: String = row.get(7)?;
    let service_label: String = row.get(8)?;
    let created_at_str: String = row.get(9)?;
    let updated_at_str: String = row.get(10)?;

    let starts_at = NaiveDateTime::parse_from_str(&starts_at_str, "%Y-%m-%d %H:%M:%S")
        .unwrap_or_else(|_| Utc::now().naive_utc());
    let created_at = NaiveDateTime::parse_from_str(&created_at_str, "%Y-%m-%d %H:%M:%S")
        .unwrap_or_else(|_| Utc::now().naive_utc());
    let updated_at = NaiveDateTime::parse_from_str(&updated_at_str, "%Y-%m-%d %H:%M:%S")
        .unwrap_or_else(|_| Utc::now().naive_utc());

    Ok(Booking {
        id,
        external_ref,
        customer_name,
        customer_phone,
        day,
        slot,
        starts_at,
        status: BookingStatus::parse(&status_str),
        service_label,
        created_at,
        updated_at,
    })
}

// ── Blocked Days ──

pub fn get_blocked_day(conn: &Connection, day: &str) -> anyhow::Result<Option<BlockedDay>> {
    let result = conn.query_row(
        "SELECT id, day, blocked FROM blocked_days WHERE day = ?1",
        params![day],
        |row| {
            Ok(BlockedDay {
                id: row.get(0)?,
                day: row.get(1)?,
                blocked: row.get::<_, i32>(2)? != 0,
            })
        },
    );

    match result {
        Ok(blocked_day) => Ok(Some(blocked_day)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn is_day_blocked(conn: &Connection, day: &str) -> anyhow::Result<bool> {
    Ok(get_blocked_day(conn, day)?.map(|b| b.blocked).unwrap_or(false))
}

pub fn insert_blocked_day(conn: &Connection, blocked_day: &BlockedDay) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO blocked_days (id, day, blocked) VALUES (?1, ?2, ?3)",
        params![blocked_day.id, blocked_day.day, blocked_day.blocked as i32],
    )?;
    Ok(())
}

pub fn list_blocked_days(conn: &Connection) -> anyhow::Result<Vec<BlockedDay>> {
    let mut stmt = conn.prepare("SELECT id, day, blocked FROM blocked_days ORDER BY day ASC")?;
    let rows = stmt.query_map([], |row| {
        Ok(BlockedDay {
            id: row.get(0)?,
            day: row.get(1)?,
            blocked: row.get::<_, i32>(2)? != 0,
        })
    })?;

    let mut blocked = vec![];
    for row in rows {
        blocked.push(row?);
    }
    Ok(blocked)
}

pub fn delete_blocked_day(conn: &Connection, id: &str) -> anyhow::Result<bool> {
    let count = conn.execute("DELETE FROM blocked_days WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

// ── Users ──

pub fn get_user_by_email(conn: &Connection, email: &str) -> anyhow::Result<Option<User>> {
    let result = conn.query_row(
        "SELECT id, email, password_hash FROM users WHERE email = ?1",
        params![email],
        |row| {
            Ok(User {
                id: row.get(0)?,
                email: row.get(1)?,
                password_hash: row.get(2)?,
            })
        },
    );

    match result {
        Ok(user) => Ok(Some(user)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Returns false when the email is already registered.
pub fn insert_user(conn: &Connection, user: &User) -> anyhow::Result<bool> {
    let result = conn.execute(
        "INSERT INTO users (id, email, password_hash) VALUES (?1, ?2, ?3)",
        params![user.id, user.email, user.password_hash],
    );

    match result {
        Ok(_) => Ok(true),
        Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}
