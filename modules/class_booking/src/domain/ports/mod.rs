pub mod directory;
pub mod notify;

pub use directory::{ProfessorDirectory, ProfessorProfile};
pub use notify::Notifier;

/// Output port: publish domain events (no knowledge of transport).
pub trait EventPublisher<E>: Send + Sync + 'static {
    fn publish(&self, event: &E);
}
