//! Session service: data shaping between the web layer, the session API and
//! the event queue.
//!
//! Upstream failures never reach callers as errors. They are logged and
//! turned into an empty page, a missing record, or an unsuccessful outcome.

use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use tracing::{error, info, instrument, warn};

use quizdesk_protocol::{
    DUPLICATE_STRIPPED_FIELDS, Purpose, Session, SessionEvent, UPDATE_STRIPPED_FIELDS,
};

use super::ListScope;
use super::pagination::{PageRequest, TablePage};
use super::wizard::{Draft, WizardKind};
use crate::queue::EventPublisher;
use crate::sessions::{ListQuery, SessionApi, SortOrder};

/// Settings for the session service.
#[derive(Debug, Clone)]
pub struct SessionServiceConfig {
    /// Platform filter applied to every listing.
    pub platform: String,
}

impl Default for SessionServiceConfig {
    fn default() -> Self {
        Self {
            platform: "quiz".to_string(),
        }
    }
}

/// Result of a create or patch, as returned to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MutationOutcome {
    #[serde(rename = "isSuccess")]
    pub is_success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
}

impl MutationOutcome {
    pub fn success(id: Option<i64>) -> Self {
        Self {
            is_success: true,
            id,
        }
    }

    pub fn failure() -> Self {
        Self {
            is_success: false,
            id: None,
        }
    }
}

#[derive(Clone)]
pub struct SessionService {
    api: Arc<dyn SessionApi>,
    publisher: Arc<dyn EventPublisher>,
    config: SessionServiceConfig,
}

impl SessionService {
    pub fn new(
        api: Arc<dyn SessionApi>,
        publisher: Arc<dyn EventPublisher>,
        config: SessionServiceConfig,
    ) -> Self {
        Self {
            api,
            publisher,
            config,
        }
    }

    /// One table page, newest first.
    #[instrument(skip(self), fields(page = request.page, per_page = request.per_page))]
    pub async fn list_page(&self, scope: ListScope, request: PageRequest) -> TablePage {
        let query = ListQuery {
            offset: request.offset(),
            limit: request.limit(),
            sort_order: SortOrder::Desc,
            platform: self.config.platform.clone(),
            is_active: scope.active_filter(),
        };
        match self.api.list(&query).await {
            Ok(rows) => TablePage::from_fetched(rows, request),
            Err(e) => {
                error!(error = %e, "Failed to list sessions");
                TablePage::empty(request)
            }
        }
    }

    /// A stored session, or `None` when the id is not a real one or the
    /// fetch fails.
    #[instrument(skip(self))]
    pub async fn get_session(&self, id: i64) -> Option<Session> {
        if id <= 0 {
            return None;
        }
        match self.api.get(id).await {
            Ok(session) => Some(session),
            Err(e) => {
                warn!(error = %e, "Failed to fetch session");
                None
            }
        }
    }

    /// The session a duplicate wizard starts from: the stored record without
    /// its identity, schedule and server-assigned fields.
    #[instrument(skip(self))]
    pub async fn duplicate_template(&self, id: i64) -> Option<Session> {
        let session = self.get_session(id).await?;
        match session.without_fields(DUPLICATE_STRIPPED_FIELDS) {
            Ok(template) => Some(template),
            Err(e) => {
                error!(error = %e, "Failed to strip session for duplication");
                None
            }
        }
    }

    /// Body POSTed for a new session.
    pub fn creation_payload(mut session: Session, now: DateTime<Utc>) -> Session {
        session.session_id = Some(String::new());
        session.purpose = Some(Purpose::attendance_quiz());
        let meta = session.meta_mut();
        meta.report_link = Some(String::new());
        meta.shortened_link = Some(String::new());
        meta.has_synced_to_bq = Some(false);
        meta.infinite_session = Some(false);
        meta.date_created = Some(now.to_rfc3339_opts(SecondsFormat::Millis, true));
        session
    }

    /// Store a new session and announce its id on the queue. The announcement
    /// does not hold up the response.
    #[instrument(skip(self, session))]
    pub async fn create_session(&self, session: Session) -> MutationOutcome {
        let payload = Self::creation_payload(session, Utc::now());
        let stored = match self.api.create(&payload).await {
            Ok(stored) => stored,
            Err(e) => {
                error!(error = %e, "Failed to create session");
                return MutationOutcome::failure();
            }
        };

        let Some(id) = stored.id else {
            warn!("Session API stored a session without returning its id");
            return MutationOutcome::success(None);
        };
        info!(session_id = id, "Created session");

        let publisher = Arc::clone(&self.publisher);
        tokio::spawn(async move {
            if let Err(e) = publisher.publish(&SessionEvent::DbId { id }).await {
                error!(session_id = id, error = %e, "Failed to publish db_id event");
            }
        });

        MutationOutcome::success(Some(id))
    }

    /// Body published for an update: the session without fields the queue
    /// consumer must not overwrite.
    pub fn update_payload(session: &Session) -> Result<Session, serde_json::Error> {
        session.without_fields(UPDATE_STRIPPED_FIELDS)
    }

    /// Publish a patch for session `id`. Updates travel only through the
    /// queue.
    #[instrument(skip(self, session))]
    pub async fn patch_session(&self, id: i64, session: &Session) -> MutationOutcome {
        let patch_session = match Self::update_payload(session) {
            Ok(payload) => payload,
            Err(e) => {
                error!(error = %e, "Failed to build patch payload");
                return MutationOutcome::failure();
            }
        };

        let event = SessionEvent::Patch { id, patch_session };
        match self.publisher.publish(&event).await {
            Ok(()) => {
                info!(session_id = id, "Published session patch");
                MutationOutcome::success(Some(id))
            }
            Err(e) => {
                error!(session_id = id, error = %e, "Failed to publish patch event");
                MutationOutcome::failure()
            }
        }
    }

    /// A fresh draft for a wizard run. Edit and duplicate need a source id
    /// that resolves to a stored session.
    #[instrument(skip(self))]
    pub async fn start_draft(&self, kind: WizardKind, source_id: Option<i64>) -> Option<Draft> {
        match kind {
            WizardKind::Create => Some(Draft::new(kind, None, Session::default())),
            WizardKind::Edit => {
                let id = source_id?;
                let session = self.get_session(id).await?;
                Some(Draft::new(kind, Some(id), session))
            }
            WizardKind::Duplicate => {
                let id = source_id?;
                let template = self.duplicate_template(id).await?;
                Some(Draft::new(kind, Some(id), template))
            }
        }
    }

    /// Submit a finished draft: edits become a patch, everything else a new
    /// session.
    pub async fn submit_draft(&self, draft: &Draft) -> MutationOutcome {
        match (draft.kind, draft.source_id) {
            (WizardKind::Edit, Some(id)) => self.patch_session(id, &draft.session).await,
            (WizardKind::Edit, None) => {
                warn!("Edit draft has no source session");
                MutationOutcome::failure()
            }
            (WizardKind::Create | WizardKind::Duplicate, _) => {
                self.create_session(draft.session.clone()).await
            }
        }
    }
}
