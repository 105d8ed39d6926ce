// casi-api: Async Rust client for the CASIREST car-sharing booking API.

pub mod auth;
pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use auth::Credentials;
pub use client::BookingClient;
pub use error::Error;
pub use models::{Booking, BookingTimeRange, SessionToken, TimeRange};
