//! Session API HTTP client.

use std::time::Duration;

use log::debug;
use reqwest::{Client, StatusCode};

use quizdesk_protocol::Session;

use super::ListQuery;
use super::error::{SessionApiError, SessionApiResult};

/// Longest error body echoed into an error message.
const MAX_ERROR_BODY: usize = 512;

/// Connection settings for the session API.
#[derive(Debug, Clone)]
pub struct SessionApiConfig {
    /// Base URL, e.g. "https://api.example.org/api".
    pub base_url: String,
    /// Bearer token sent with every request.
    pub token: Option<String>,
    /// Request timeout.
    pub timeout: Duration,
}

impl Default for SessionApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:4000/api".to_string(),
            token: None,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Client for the upstream session API.
#[derive(Debug, Clone)]
pub struct SessionApiClient {
    client: Client,
    /// Base URL without a trailing slash.
    base_url: String,
    token: Option<String>,
}

impl SessionApiClient {
    /// Create a new session API client.
    pub fn new(config: SessionApiConfig) -> SessionApiResult<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(SessionApiError::InvalidConfig(format!(
                "base URL must start with http:// or https://, got '{}'",
                config.base_url
            )));
        }

        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            base_url,
            token: config.token.filter(|t| !t.is_empty()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch one page of sessions.
    pub async fn list_sessions(&self, query: &ListQuery) -> SessionApiResult<Vec<Session>> {
        let url = format!("{}/session", self.base_url);
        debug!("GET {} {:?}", url, query);
        let response = self
            .authorize(self.client.get(&url))
            .query(query)
            .send()
            .await?;

        self.handle_response(response, "session list").await
    }

    /// Fetch a single session.
    pub async fn get_session(&self, id: i64) -> SessionApiResult<Session> {
        let url = format!("{}/session/{}", self.base_url, id);
        debug!("GET {}", url);
        let response = self.authorize(self.client.get(&url)).send().await?;

        self.handle_response(response, &format!("session {id}")).await
    }

    /// Store a new session and return the stored record.
    pub async fn create_session(&self, session: &Session) -> SessionApiResult<Session> {
        let url = format!("{}/session", self.base_url);
        debug!("POST {}", url);
        let response = self
            .authorize(self.client.post(&url))
            .json(session)
            .send()
            .await?;

        self.handle_response(response, "new session").await
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Handle response and parse JSON or error.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
        subject: &str,
    ) -> SessionApiResult<T> {
        let status = response.status();

        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| SessionApiError::ParseError(format!("{subject}: {e}")));
        }

        match status {
            StatusCode::NOT_FOUND => Err(SessionApiError::NotFound(subject.to_string())),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(SessionApiError::Unauthorized),
            _ => {
                let mut message = response.text().await.unwrap_or_default();
                if message.len() > MAX_ERROR_BODY {
                    let mut cut = MAX_ERROR_BODY;
                    while !message.is_char_boundary(cut) {
                        cut -= 1;
                    }
                    message.truncate(cut);
                }
                Err(SessionApiError::ApiError {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }
}
