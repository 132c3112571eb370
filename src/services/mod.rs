pub mod presenter;
pub mod reservation;
pub mod schedule;
pub mod seed;

pub use presenter::StudioClock;
pub use reservation::{reserve_slot, ReservationRequest};
