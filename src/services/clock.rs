use chrono::{Duration, NaiveDateTime, Utc};

/// Source of venue-local time. Resolvers read it exactly once per request
/// so a single invocation never straddles a minute boundary.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Wall clock shifted by the venue's fixed UTC offset. The host timezone
/// never participates.
pub struct VenueClock {
    offset: Duration,
}

impl VenueClock {
    pub fn new(utc_offset_hours: i32) -> Self {
        Self {
            offset: Duration::hours(utc_offset_hours as i64),
        }
    }
}

impl Clock for VenueClock {
    fn now(&self) -> NaiveDateTime {
        Utc::now().naive_utc() + self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_applied() {
        let utc = VenueClock::new(0).now();
        let shifted = VenueClock::new(-3).now();
        let diff = utc - shifted;
        // Both reads happen within the same second in practice; allow slack.
        assert!(diff >= Duration::hours(3) - Duration::seconds(5));
        assert!(diff <= Duration::hours(3) + Duration::seconds(5));
    }
}
