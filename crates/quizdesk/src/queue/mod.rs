//! Session event publishing.
//!
//! Mutations are announced on a message queue. The queue is reached through
//! an HTTP gateway; without one configured, events are only logged.

mod error;
mod http;

use async_trait::async_trait;
use log::info;

use quizdesk_protocol::SessionEvent;

pub use error::{PublishError, PublishResult};
pub use http::{HttpQueuePublisher, QueueConfig};

/// Event publisher abstraction for testability.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: &SessionEvent) -> PublishResult<()>;
}

/// Publisher that only logs events. Used when no queue gateway is configured.
#[derive(Debug, Clone, Default)]
pub struct LogPublisher;

#[async_trait]
impl EventPublisher for LogPublisher {
    async fn publish(&self, event: &SessionEvent) -> PublishResult<()> {
        info!(
            "queue disabled, dropping {} event for session {}",
            event.action(),
            event.session_id()
        );
        Ok(())
    }
}
