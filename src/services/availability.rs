use std::collections::HashSet;

use chrono::Timelike;
use rusqlite::Connection;

use crate::db::queries;
use crate::errors::AppError;
use crate::services::clock::Clock;
use crate::services::slots::{parse_day, parse_slot_label, slot_template};

/// Derives the bookable slots for a day by filtering the fixed template
/// against current time, blocked-day state and existing bookings.
/// Read-only; tolerates a slightly stale snapshot.
pub fn available_slots(
    conn: &Connection,
    clock: &dyn Clock,
    day: &str,
) -> Result<Vec<String>, AppError> {
    if parse_day(day).is_none() {
        return Err(AppError::InvalidDay);
    }

    // One clock read per invocation; everything below compares against it.
    let now = clock.now();
    let today = now.date().format("%Y-%m-%d").to_string();

    if day < today.as_str() {
        return Err(AppError::DayInPast);
    }

    if queries::is_day_blocked(conn, day)? {
        return Err(AppError::DayBlocked);
    }

    let bookings = queries::get_bookings_for_day(conn, day)?;
    // A completed booking still occupies its slot; nothing is rebookable.
    let occupied: HashSet<&str> = bookings.iter().map(|b| b.slot.as_str()).collect();

    let is_today = day == today;
    let (current_hour, current_minute) = (now.hour(), now.minute());

    let available = slot_template()
        .iter()
        .copied()
        .filter(|label| {
            if is_today && slot_has_started(label, current_hour, current_minute) {
                return false;
            }
            !occupied.contains(label)
        })
        .map(|label| label.to_string())
        .collect();

    Ok(available)
}

/// A slot counts as started the moment its start minute is reached.
fn slot_has_started(label: &str, current_hour: u32, current_minute: u32) -> bool {
    match parse_slot_label(label) {
        Some((hour, minute)) => {
            hour < current_hour || (hour == current_hour && minute <= current_minute)
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    use crate::db;
    use crate::models::{Booking, BookingStatus};
    use crate::services::blocking;
    use crate::services::booking::{create_booking, NewBooking};

    struct FixedClock(NaiveDateTime);

    impl Clock for FixedClock {
        fn now(&self) -> NaiveDateTime {
            self.0
        }
    }

    fn setup_db() -> Connection {
        db::init_db(":memory:").unwrap()
    }

    fn clock_at(s: &str) -> FixedClock {
        FixedClock(NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap())
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
    fn test_future_day_returns_full_template() {
        let conn = setup_db();
        let clock = clock_at("2025-06-16 10:30");

        let slots = available_slots(&conn, &clock, "2030-01-02").unwrap();
        let expected: Vec<String> = slot_template().iter().map(|s| s.to_string()).collect();
        assert_eq!(slots, expected);
    }

    #[test]
    fn test_invalid_day_format() {
        let conn = setup_db();
        let clock = clock_at("2025-06-16 10:30");

        for bad in ["2030-1-2", "not-a-day", "2030-02-30", ""] {
            let err = available_slots(&conn, &clock, bad).unwrap_err();
            assert!(matches!(err, AppError::InvalidDay), "accepted {bad:?}");
        }
    }

    #[test]
    fn test_past_day_rejected() {
        let conn = setup_db();
        let clock = clock_at("2025-06-16 10:30");

        let err = available_slots(&conn, &clock, "2025-06-15").unwrap_err();
        assert!(matches!(err, AppError::DayInPast));
    }

    #[test]
    fn test_blocked_day_rejected() {
        let conn = setup_db();
        let clock = clock_at("2025-06-16 10:30");
        blocking::block_day(&conn, "2030-01-02").unwrap();

        let err = available_slots(&conn, &clock, "2030-01-02").unwrap_err();
        assert!(matches!(err, AppError::DayBlocked));
    }

    #[test]
    fn test_booked_slot_excluded_others_unchanged() {
        let conn = setup_db();
        let clock = clock_at("2025-06-16 10:30");
        create_booking(&conn, request("2030-01-02", "10:00")).unwrap();

        let slots = available_slots(&conn, &clock, "2030-01-02").unwrap();
        assert!(!slots.contains(&"10:00".to_string()));
        assert_eq!(slots.len(), slot_template().len() - 1);
        // Order preserved around the gap.
        assert_eq!(slots[0], "08:00");
        assert_eq!(slots[2], "11:00");
    }

    #[test]
    fn test_completed_booking_still_occupies_slot() {
        let conn = setup_db();
        let clock = clock_at("2025-06-16 10:30");
        let booking = create_booking(&conn, request("2030-01-02", "10:00")).unwrap();
        queries::set_booking_completed(&conn, &booking.id).unwrap();

        let slots = available_slots(&conn, &clock, "2030-01-02").unwrap();
        assert!(!slots.contains(&"10:00".to_string()));
    }

    #[test]
    fn test_elapsed_slots_excluded_today() {
        let conn = setup_db();
        // 14:05: everything up to and including 14:00 has started.
        let clock = clock_at("2025-06-16 14:05");

        let slots = available_slots(&conn, &clock, "2025-06-16").unwrap();
        assert_eq!(slots, vec!["15:00", "16:00", "17:00", "18:00", "19:00"]);
    }

    #[test]
    fn test_slot_at_exact_start_minute_excluded() {
        let conn = setup_db();
        let clock = clock_at("2025-06-16 14:00");

        let slots = available_slots(&conn, &clock, "2025-06-16").unwrap();
        assert!(!slots.contains(&"14:00".to_string()));
        assert!(slots.contains(&"15:00".to_string()));
    }

    #[test]
    fn test_elapsed_rule_ignored_for_future_days() {
        let conn = setup_db();
        let clock = clock_at("2025-06-16 23:59");

        let slots = available_slots(&conn, &clock, "2025-06-17").unwrap();
        assert_eq!(slots.len(), slot_template().len());
    }

    #[test]
    fn test_today_combines_elapsed_and_occupied() {
        let conn = setup_db();
        let clock = clock_at("2025-06-16 09:10");
        create_booking(&conn, request("2025-06-16", "11:00")).unwrap();

        let slots = available_slots(&conn, &clock, "2025-06-16").unwrap();
        assert_eq!(
            slots,
            vec!["10:00", "12:00", "13:00", "14:00", "15:00", "16:00", "17:00", "18:00", "19:00"]
        );
    }

    #[test]
    fn test_off_template_booking_does_not_disturb_template() {
        let conn = setup_db();
        let clock = clock_at("2025-06-16 10:30");
        let now = chrono::Utc::now().naive_utc();
        let booking = Booking {
            id: "manual-1".to_string(),
            external_ref: "ref-1".to_string(),
            customer_name: "Bob".to_string(),
            customer_phone: "+5511999991111".to_string(),
            day: "2030-01-02".to_string(),
            slot: "07:30".to_string(),
            starts_at: NaiveDateTime::parse_from_str("2030-01-02 07:30", "%Y-%m-%d %H:%M").unwrap(),
            status: BookingStatus::Scheduled,
            service_label: "Haircut".to_string(),
            created_at: now,
            updated_at: now,
        };
        queries::insert_booking(&conn, &booking).unwrap();

        let slots = available_slots(&conn, &clock, "2030-01-02").unwrap();
        assert_eq!(slots.len(), slot_template().len());
    }
}
