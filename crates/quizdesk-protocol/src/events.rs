//! Events published on the session queue.

use serde::{Deserialize, Serialize};

use crate::session::Session;

/// A mutation announcement. The `action` tag selects the consumer's handler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SessionEvent {
    /// A session was stored; consumers fetch it by id and finish setup
    /// (links, sign-up forms).
    DbId { id: i64 },
    /// Apply `patch_session` to the stored session `id`.
    Patch { id: i64, patch_session: Session },
}

impl SessionEvent {
    pub fn session_id(&self) -> i64 {
        match self {
            Self::DbId { id } | Self::Patch { id, .. } => *id,
        }
    }

    pub fn action(&self) -> &'static str {
        match self {
            Self::DbId { .. } => "db_id",
            Self::Patch { .. } => "patch",
        }
    }
}
