//! Application state shared across handlers.

use std::sync::Arc;

use crate::session::pagination::DEFAULT_PAGE_SIZE;
use crate::session::{DraftStore, SessionService};
use crate::views::Views;

/// Table settings for the API layer.
#[derive(Clone, Copy, Debug)]
pub struct TableState {
    /// Page size used when a request does not pick one.
    pub default_per_page: u32,
}

impl Default for TableState {
    fn default() -> Self {
        Self {
            default_per_page: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Session service.
    pub sessions: SessionService,
    /// In-progress wizard drafts.
    pub drafts: Arc<DraftStore>,
    /// Compiled HTML templates.
    pub views: Arc<Views>,
    /// Table settings.
    pub table: TableState,
}

impl AppState {
    /// Create new application state.
    pub fn new(
        sessions: SessionService,
        drafts: DraftStore,
        table: TableState,
    ) -> Result<Self, minijinja::Error> {
        Ok(Self {
            sessions,
            drafts: Arc::new(drafts),
            views: Arc::new(Views::new()?),
            table,
        })
    }
}
