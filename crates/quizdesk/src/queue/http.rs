//! Queue gateway publisher.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;

use quizdesk_protocol::SessionEvent;

use super::EventPublisher;
use super::error::{PublishError, PublishResult};

/// Queue gateway settings.
#[derive(Debug, Clone)]
pub struct QueueConfig {
    /// URL the JSON event is POSTed to.
    pub endpoint: String,
    /// Bearer token for the gateway.
    pub token: Option<String>,
    /// Request timeout.
    pub timeout: Duration,
}

/// Publishes events by POSTing them to a queue gateway.
#[derive(Debug, Clone)]
pub struct HttpQueuePublisher {
    client: Client,
    endpoint: String,
    token: Option<String>,
}

impl HttpQueuePublisher {
    pub fn new(config: QueueConfig) -> PublishResult<Self> {
        if !(config.endpoint.starts_with("http://") || config.endpoint.starts_with("https://")) {
            return Err(PublishError::InvalidConfig(format!(
                "endpoint must start with http:// or https://, got '{}'",
                config.endpoint
            )));
        }

        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint,
            token: config.token.filter(|t| !t.is_empty()),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl EventPublisher for HttpQueuePublisher {
    async fn publish(&self, event: &SessionEvent) -> PublishResult<()> {
        debug!("publishing {} event to {}", event.action(), self.endpoint);
        let mut request = self.client.post(&self.endpoint).json(event);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let message = response.text().await.unwrap_or_default();
        Err(PublishError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}
