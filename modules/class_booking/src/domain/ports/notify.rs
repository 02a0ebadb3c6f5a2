use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::error::DomainError;

/// Fire-and-forget notification dispatch. Failures are logged by the
/// service and never roll back a committed mutation.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Bump the student's usage counter after a successful booking.
    async fn increment_usage(&self, student: Uuid) -> Result<(), DomainError>;
    /// Tell the outside world a booking changed shape.
    async fn booking_changed(&self, student: Uuid) -> Result<(), DomainError>;
}
