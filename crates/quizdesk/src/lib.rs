//! Quizdesk: create, edit, duplicate and browse quiz sessions stored in an
//! external session API.

pub mod api;
pub mod queue;
pub mod session;
pub mod sessions;
pub mod settings;
pub mod views;

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::api::{AppState, TableState};
use crate::session::{DraftStore, SessionService, SessionServiceConfig};
use crate::sessions::SessionApiClient;
use crate::settings::AppConfig;

/// Session service wired to the configured session API and queue.
pub fn build_session_service(config: &AppConfig) -> Result<SessionService> {
    let client = SessionApiClient::new(config.session_api.client_config())
        .context("configuring session API client")?;
    let publisher = config.queue.publisher()?;
    Ok(SessionService::new(
        Arc::new(client),
        publisher,
        SessionServiceConfig {
            platform: config.session_api.platform.clone(),
        },
    ))
}

/// Full application state for the HTTP server.
pub fn build_state(config: &AppConfig) -> Result<AppState> {
    let sessions = build_session_service(config)?;
    AppState::new(
        sessions,
        DraftStore::new(config.table.draft_ttl()),
        TableState {
            default_per_page: config.table.default_per_page,
        },
    )
    .context("compiling templates")
}
