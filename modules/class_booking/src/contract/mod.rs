pub mod client;
pub mod error;
pub mod model;

pub use client::ClassBookingApi;
pub use error::ClassBookingError;
pub use model::*;
