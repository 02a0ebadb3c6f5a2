use tracing::debug;

use crate::domain::events::BookingEvent;
use crate::domain::ports::EventPublisher;

/// Event publisher that emits domain events to the log stream.
#[derive(Default, Clone)]
pub struct TracingPublisher;

impl EventPublisher<BookingEvent> for TracingPublisher {
    fn publish(&self, event: &BookingEvent) {
        debug!(?event, "domain event");
    }
}
