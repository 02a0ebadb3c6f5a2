pub mod local;

pub use local::ClassBookingLocalClient;
