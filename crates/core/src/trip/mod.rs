//! Trip bookkeeping.
//!
//! A trip is a fuel collection/sale run of one vehicle. Each purchase line
//! records what was bought and what part of it was sold on; the trip stores
//! the totals of its lines and of the expenses booked against it.

pub mod error;
pub mod totals;

pub use error::TripError;
pub use totals::{
    PurchaseLine, TripStatus, TripTotals, ensure_open, validate_trip, validate_trip_dates,
};
