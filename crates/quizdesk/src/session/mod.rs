//! Quiz session management: table paging, the create/edit/duplicate wizard,
//! and the service that talks to the session API and the queue.

pub mod display;
pub mod form;
pub mod options;
pub mod pagination;
mod service;
pub mod steps;
pub mod wizard;

use serde::Deserialize;

pub use pagination::{PageRequest, TablePage, TableParams};
pub use service::{MutationOutcome, SessionService, SessionServiceConfig};
pub use wizard::{Draft, DraftStore, Step, WizardKind};

/// Which sessions a table shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListScope {
    #[default]
    All,
    /// Only sessions flagged active.
    Live,
}

impl ListScope {
    /// Value of the upstream `is_active` filter.
    pub fn active_filter(&self) -> Option<bool> {
        match self {
            ListScope::All => None,
            ListScope::Live => Some(true),
        }
    }

    /// Table page path.
    pub fn path(&self) -> &'static str {
        match self {
            ListScope::All => "/",
            ListScope::Live => "/live",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ListScope::All => "All Sessions",
            ListScope::Live => "Live Sessions",
        }
    }
}
