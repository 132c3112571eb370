pub mod class;
pub mod booking;

pub use class::{ClassRecord, NewClass};
pub use booking::{BookingRecord, NewBooking};
