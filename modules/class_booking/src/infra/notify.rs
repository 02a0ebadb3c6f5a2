use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::ports::Notifier;

/// Notifier that records dispatches in the log stream. Stands in for the
/// external notification service; the service layer already treats every
/// notifier as best-effort.
#[derive(Default, Clone)]
pub struct TracingNotifier;

#[async_trait]
impl Notifier for TracingNotifier {
    async fn increment_usage(&self, student: Uuid) -> Result<(), DomainError> {
        debug!(%student, "usage counter increment dispatched");
        Ok(())
    }

    async fn booking_changed(&self, student: Uuid) -> Result<(), DomainError> {
        debug!(%student, "booking change notification dispatched");
        Ok(())
    }
}
