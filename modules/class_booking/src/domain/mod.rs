pub mod error;
pub mod events;
pub mod occurrence;
pub mod ports;
pub mod repo;
pub mod service;
pub mod slot;
