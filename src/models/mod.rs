pub mod blocked_day;
pub mod booking;
pub mod service;
pub mod user;

pub use blocked_day::BlockedDay;
pub use booking::{Booking, BookingStatus};
pub use service::ServiceItem;
pub use user::User;
