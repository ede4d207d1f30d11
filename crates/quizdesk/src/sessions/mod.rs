//! Session API client module.
//!
//! Async client for the upstream REST API that owns quiz session records.

mod client;
mod error;

use async_trait::async_trait;
use serde::Serialize;

use quizdesk_protocol::Session;

pub use client::{SessionApiClient, SessionApiConfig};
pub use error::{SessionApiError, SessionApiResult};

/// Sort direction for listings. Tables always show newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Query parameters for `GET /session`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListQuery {
    pub offset: u64,
    pub limit: u64,
    pub sort_order: SortOrder,
    pub platform: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Session API abstraction, so services can be tested without a network.
#[async_trait]
pub trait SessionApi: Send + Sync {
    async fn list(&self, query: &ListQuery) -> SessionApiResult<Vec<Session>>;
    async fn get(&self, id: i64) -> SessionApiResult<Session>;
    async fn create(&self, session: &Session) -> SessionApiResult<Session>;
}

#[async_trait]
impl SessionApi for SessionApiClient {
    async fn list(&self, query: &ListQuery) -> SessionApiResult<Vec<Session>> {
        self.list_sessions(query).await
    }

    async fn get(&self, id: i64) -> SessionApiResult<Session> {
        self.get_session(id).await
    }

    async fn create(&self, session: &Session) -> SessionApiResult<Session> {
        self.create_session(session).await
    }
}
