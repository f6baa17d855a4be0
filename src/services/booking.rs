use chrono::Utc;
use rusqlite::Connection;
use uuid::Uuid;

use crate::db::queries::{self, InsertOutcome};
use crate::errors::AppError;
use crate::models::{Booking, BookingStatus};
use crate::services::slots::{parse_day, parse_slot_label};

pub struct NewBooking {
    pub day: String,
    pub slot: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub service_label: String,
    pub external_ref: Option<String>,
}

/// Validates and admits a booking request. The pre-check gives a clean
/// `SlotTaken` early; the UNIQUE(day, slot) index on the insert is what
/// actually guarantees exclusivity when two requests race.
pub fn create_booking(conn: &Connection, request: NewBooking) -> Result<Booking, AppError> {
    let date = parse_day(&request.day)
        .ok_or_else(|| AppError::Validation("invalid day, expected YYYY-MM-DD".to_string()))?;
    let (hour, minute) = parse_slot_label(&request.slot)
        .ok_or_else(|| AppError::Validation("invalid slot, expected HH:MM".to_string()))?;

    for (field, value) in [
        ("customer_name", &request.customer_name),
        ("customer_phone", &request.customer_phone),
        ("service_label", &request.service_label),
    ] {
        if value.trim().is_empty() {
            return Err(AppError::Validation(format!("{field} is required")));
        }
    }

    if queries::get_booking_by_day_slot(conn, &request.day, &request.slot)?.is_some() {
        return Err(AppError::SlotTaken);
    }

    let starts_at = date
        .and_hms_opt(hour, minute, 0)
        .ok_or_else(|| AppError::Validation("invalid slot time".to_string()))?;

    let external_ref = request
        .external_ref
        .filter(|r| !r.trim().is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let now = Utc::now().naive_utc();
    let booking = Booking {
        id: Uuid::new_v4().to_string(),
        external_ref,
        customer_name: request.customer_name,
        customer_phone: request.customer_phone,
        day: request.day,
        slot: request.slot,
        starts_at,
        status: BookingStatus::Scheduled,
        service_label: request.service_label,
        created_at: now,
        updated_at: now,
    };

    match queries::insert_booking(conn, &booking)? {
        InsertOutcome::Created => Ok(booking),
        // Lost the race to a concurrent admission; same outcome as the
        // pre-check from the caller's point of view.
        InsertOutcome::Conflict => Err(AppError::SlotTaken),
    }
}

pub fn complete_booking(conn: &Connection, id: &str) -> Result<(), AppError> {
    if queries::set_booking_completed(conn, id)? {
        Ok(())
    } else {
        Err(AppError::NotFound(format!("booking {id}")))
    }
}

/// Returns whether a booking was actually removed; the HTTP layer chooses
/// to report success either way.
pub fn delete_booking(conn: &Connection, id: &str) -> Result<bool, AppError> {
    Ok(queries::delete_booking(conn, id)?)
}

pub fn delete_completed_bookings(conn: &Connection) -> Result<usize, AppError> {
    Ok(queries::delete_bookings_with_status(
        conn,
        BookingStatus::Completed,
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    fn setup_db() -> Connection {
        db::init_db(":memory:").unwrap()
    }

    fn request(day: &str, slot: &str) -> NewBooking {
        NewBooking {
            day: day.to_string(),
            slot: slot.to_string(),
            customer_name: "Alice".to_string(),
            customer_phone: "+5511999990000".to_string(),
            service_label: "Haircut".to_string(),
            external_ref: None,
        }
    }

    #[test]
    fn test_create_booking_sets_fields() {
        let conn = setup_db();

        let booking = create_booking(&conn, request("2030-01-02", "08:00")).unwrap();
        assert_eq!(booking.status, BookingStatus::Scheduled);
        assert_eq!(booking.day, "2030-01-02");
        assert_eq!(booking.slot, "08:00");
        assert_eq!(
            booking.starts_at.format("%Y-%m-%dT%H:%M:%S").to_string(),
            "2030-01-02T08:00:00"
        );
        assert!(!booking.id.is_empty());
        assert!(!booking.external_ref.is_empty());
    }

    #[test]
    fn test_supplied_external_ref_preserved() {
        let conn = setup_db();

        let mut req = request("2030-01-02", "08:00");
        req.external_ref = Some("client-ref-42".to_string());
        let booking = create_booking(&conn, req).unwrap();
        assert_eq!(booking.external_ref, "client-ref-42");
    }

    #[test]
    fn test_blank_external_ref_replaced() {
        let conn = setup_db();

        let mut req = request("2030-01-02", "08:00");
        req.external_ref = Some("   ".to_string());
        let booking = create_booking(&conn, req).unwrap();
        assert_ne!(booking.external_ref.trim(), "");
        assert_ne!(booking.external_ref, "   ");
    }

    #[test]
    fn test_duplicate_slot_rejected() {
        let conn = setup_db();

        create_booking(&conn, request("2030-01-02", "08:00")).unwrap();
        let err = create_booking(&conn, request("2030-01-02", "08:00")).unwrap_err();
        assert!(matches!(err, AppError::SlotTaken));
    }

    #[test]
    fn test_same_slot_other_day_allowed() {
        let conn = setup_db();

        create_booking(&conn, request("2030-01-02", "08:00")).unwrap();
        assert!(create_booking(&conn, request("2030-01-03", "08:00")).is_ok());
    }

    #[test]
    fn test_insert_conflict_surfaces_as_slot_taken() {
        let conn = setup_db();
        create_booking(&conn, request("2030-01-02", "08:00")).unwrap();

        // Bypass the pre-check and hit the index directly, as a losing
        // racer would.
        let now = Utc::now().naive_utc();
        let candidate = Booking {
            id: Uuid::new_v4().to_string(),
            external_ref: Uuid::new_v4().to_string(),
            customer_name: "Bob".to_string(),
            customer_phone: "+5511999991111".to_string(),
            day: "2030-01-02".to_string(),
            slot: "08:00".to_string(),
            starts_at: now,
            status: BookingStatus::Scheduled,
            service_label: "Haircut".to_string(),
            created_at: now,
            updated_at: now,
        };
        let outcome = queries::insert_booking(&conn, &candidate).unwrap();
        assert_eq!(outcome, InsertOutcome::Conflict);
    }

    #[test]
    fn test_missing_fields_rejected() {
        let conn = setup_db();

        let mut req = request("2030-01-02", "08:00");
        req.customer_name = "  ".to_string();
        assert!(matches!(
            create_booking(&conn, req).unwrap_err(),
            AppError::Validation(_)
        ));

        let mut req = request("2030-01-02", "08:00");
        req.customer_phone = String::new();
        assert!(matches!(
            create_booking(&conn, req).unwrap_err(),
            AppError::Validation(_)
        ));
    }

    #[test]
    fn test_malformed_day_and_slot_rejected() {
        let conn = setup_db();

        assert!(matches!(
            create_booking(&conn, request("2030-1-2", "08:00")).unwrap_err(),
            AppError::Validation(_)
        ));
        assert!(matches!(
            create_booking(&conn, request("2030-01-02", "8am")).unwrap_err(),
            AppError::Validation(_)
        ));
    }

    #[test]
    fn test_complete_booking() {
        let conn = setup_db();
        let booking = create_booking(&conn, request("2030-01-02", "08:00")).unwrap();

        complete_booking(&conn, &booking.id).unwrap();
        let stored = queries::get_booking_by_id(&conn, &booking.id).unwrap().unwrap();
        assert_eq!(stored.status, BookingStatus::Completed);

        // Second completion reports the same outcome.
        complete_booking(&conn, &booking.id).unwrap();

        let err = complete_booking(&conn, "no-such-id").unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_delete_booking_reports_existence() {
        let conn = setup_db();
        let booking = create_booking(&conn, request("2030-01-02", "08:00")).unwrap();

        assert!(delete_booking(&conn, &booking.id).unwrap());
        assert!(!delete_booking(&conn, &booking.id).unwrap());
    }

    #[test]
    fn test_delete_completed_bookings_only() {
        let conn = setup_db();
        let done = create_booking(&conn, request("2030-01-02", "08:00")).unwrap();
        create_booking(&conn, request("2030-01-02", "09:00")).unwrap();
        complete_booking(&conn, &done.id).unwrap();

        let deleted = delete_completed_bookings(&conn).unwrap();
        assert_eq!(deleted, 1);

        let remaining = queries::get_all_bookings(&conn).unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].slot, "09:00");
    }
}
