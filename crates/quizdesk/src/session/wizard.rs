//! Multi-step form wizard state.
//!
//! A wizard run is a [`Draft`] kept in memory between requests. Each step
//! merges its output into the draft session; the last step submits it.

use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use log::debug;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use quizdesk_protocol::Session;

/// How long an untouched draft is kept.
pub const DEFAULT_DRAFT_TTL: Duration = Duration::from_secs(6 * 60 * 60);

/// What the wizard does with the draft when it is finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WizardKind {
    Create,
    Edit,
    Duplicate,
}

impl WizardKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WizardKind::Create => "create",
            WizardKind::Edit => "edit",
            WizardKind::Duplicate => "duplicate",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            WizardKind::Create => "Create Session",
            WizardKind::Edit => "Edit Session",
            WizardKind::Duplicate => "Duplicate Session",
        }
    }

    /// Edit and duplicate start from an existing record.
    pub fn needs_source(&self) -> bool {
        !matches!(self, WizardKind::Create)
    }
}

impl fmt::Display for WizardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WizardKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(WizardKind::Create),
            "edit" => Ok(WizardKind::Edit),
            "duplicate" => Ok(WizardKind::Duplicate),
            other => Err(format!("unknown wizard kind: {other}")),
        }
    }
}

/// Wizard steps, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    Basic,
    Platform,
    Timeline,
}

impl Step {
    pub const ALL: [Step; 3] = [Step::Basic, Step::Platform, Step::Timeline];

    pub fn as_str(&self) -> &'static str {
        match self {
            Step::Basic => "basic",
            Step::Platform => "platform",
            Step::Timeline => "timeline",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Step::Basic => "Basic Details",
            Step::Platform => "Platform Details",
            Step::Timeline => "Timeline",
        }
    }

    pub fn next(&self) -> Option<Step> {
        match self {
            Step::Basic => Some(Step::Platform),
            Step::Platform => Some(Step::Timeline),
            Step::Timeline => None,
        }
    }

    pub fn previous(&self) -> Option<Step> {
        match self {
            Step::Basic => None,
            Step::Platform => Some(Step::Basic),
            Step::Timeline => Some(Step::Platform),
        }
    }

    pub fn is_last(&self) -> bool {
        self.next().is_none()
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Step {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "basic" => Ok(Step::Basic),
            "platform" => Ok(Step::Platform),
            "timeline" => Ok(Step::Timeline),
            other => Err(format!("unknown step: {other}")),
        }
    }
}

/// An in-progress wizard run.
#[derive(Debug, Clone)]
pub struct Draft {
    pub kind: WizardKind,
    /// Record being edited or duplicated.
    pub source_id: Option<i64>,
    pub session: Session,
    /// Steps whose submission has been merged.
    pub completed: Vec<Step>,
    touched_at: Instant,
}

impl Draft {
    pub fn new(kind: WizardKind, source_id: Option<i64>, session: Session) -> Self {
        Self {
            kind,
            source_id,
            session,
            completed: Vec::new(),
            touched_at: Instant::now(),
        }
    }

    /// A step can be opened once every step before it is done.
    pub fn can_open(&self, step: Step) -> bool {
        step.previous()
            .is_none_or(|previous| self.completed.contains(&previous) && self.can_open(previous))
    }

    /// First step that still needs a submission.
    pub fn resume_step(&self) -> Step {
        Step::ALL
            .into_iter()
            .find(|step| !self.completed.contains(step))
            .unwrap_or(Step::Timeline)
    }

    fn is_expired(&self, ttl: Duration) -> bool {
        self.touched_at.elapsed() > ttl
    }
}

/// In-memory drafts, keyed by an opaque id carried in the wizard URL.
pub struct DraftStore {
    drafts: DashMap<Uuid, Draft>,
    ttl: Duration,
}

impl DraftStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            drafts: DashMap::new(),
            ttl,
        }
    }

    /// Store a new draft and return its id. Expired drafts are dropped first.
    pub fn start(&self, draft: Draft) -> Uuid {
        self.prune_expired();
        let id = Uuid::new_v4();
        debug!(
            "Started {} draft {} (source {:?})",
            draft.kind, id, draft.source_id
        );
        self.drafts.insert(id, draft);
        id
    }

    /// Snapshot of a live draft.
    pub fn get(&self, id: &Uuid) -> Option<Draft> {
        let draft = self.drafts.get(id)?;
        if draft.is_expired(self.ttl) {
            drop(draft);
            self.drafts.remove(id);
            return None;
        }
        Some(draft.clone())
    }

    /// Replace the draft session with the output of `step` and mark the step
    /// done. Later steps were validated against the old draft, so they must
    /// be submitted again. Returns false when the draft no longer exists.
    pub fn complete_step(&self, id: &Uuid, step: Step, session: Session) -> bool {
        let Some(mut draft) = self.drafts.get_mut(id) else {
            return false;
        };
        draft.session = session;
        draft.completed.retain(|done| *done < step);
        draft.completed.push(step);
        draft.touched_at = Instant::now();
        true
    }

    /// Discard a draft, returning it.
    pub fn finish(&self, id: &Uuid) -> Option<Draft> {
        self.drafts.remove(id).map(|(_, draft)| draft)
    }

    pub fn len(&self) -> usize {
        self.drafts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drafts.is_empty()
    }

    /// Drop every draft untouched for longer than the TTL.
    pub fn prune_expired(&self) {
        let ttl = self.ttl;
        let before = self.drafts.len();
        self.drafts.retain(|_, draft| !draft.is_expired(ttl));
        let pruned = before.saturating_sub(self.drafts.len());
        if pruned > 0 {
            debug!("Pruned {} expired drafts", pruned);
        }
    }
}

impl Default for DraftStore {
    fn default() -> Self {
        Self::new(DEFAULT_DRAFT_TTL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> Session {
        Session {
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_step_order() {
        assert_eq!(Step::Basic.next(), Some(Step::Platform));
        assert_eq!(Step::Platform.next(), Some(Step::Timeline));
        assert_eq!(Step::Timeline.next(), None);
        assert_eq!(Step::Timeline.previous(), Some(Step::Platform));
        assert_eq!(Step::Basic.previous(), None);
        assert!(Step::Timeline.is_last());
    }

    #[test]
    fn test_parse_path_segments() {
        assert_eq!("duplicate".parse::<WizardKind>(), Ok(WizardKind::Duplicate));
        assert!("delete".parse::<WizardKind>().is_err());
        assert_eq!("platform".parse::<Step>(), Ok(Step::Platform));
        assert!("summary".parse::<Step>().is_err());
    }

    #[test]
    fn test_steps_open_in_order() {
        let mut draft = Draft::new(WizardKind::Create, None, Session::default());
        assert!(draft.can_open(Step::Basic));
        assert!(!draft.can_open(Step::Platform));
        assert!(!draft.can_open(Step::Timeline));
        assert_eq!(draft.resume_step(), Step::Basic);

        draft.completed.push(Step::Basic);
        assert!(draft.can_open(Step::Platform));
        assert!(!draft.can_open(Step::Timeline));
        assert_eq!(draft.resume_step(), Step::Platform);
    }

    #[test]
    fn test_store_lifecycle() {
        let store = DraftStore::default();
        let id = store.start(Draft::new(WizardKind::Edit, Some(3), named("before")));
        assert_eq!(store.len(), 1);

        assert!(store.complete_step(&id, Step::Basic, named("after")));
        let draft = store.get(&id).unwrap();
        assert_eq!(draft.session.name.as_deref(), Some("after"));
        assert_eq!(draft.completed, vec![Step::Basic]);
        assert_eq!(draft.source_id, Some(3));

        assert!(store.complete_step(&id, Step::Basic, named("again")));
        assert_eq!(store.get(&id).unwrap().completed, vec![Step::Basic]);

        let finished = store.finish(&id).unwrap();
        assert_eq!(finished.kind, WizardKind::Edit);
        assert!(store.get(&id).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_resubmitting_a_step_reopens_later_steps() {
        let store = DraftStore::default();
        let id = store.start(Draft::new(WizardKind::Create, None, Session::default()));
        for step in Step::ALL {
            assert!(store.complete_step(&id, step, named("done")));
        }
        assert!(store.get(&id).unwrap().can_open(Step::Timeline));

        assert!(store.complete_step(&id, Step::Basic, named("changed")));
        let draft = store.get(&id).unwrap();
        assert_eq!(draft.completed, vec![Step::Basic]);
        assert!(draft.can_open(Step::Platform));
        assert!(!draft.can_open(Step::Timeline));
        assert_eq!(draft.resume_step(), Step::Platform);
    }

    #[test]
    fn test_unknown_draft() {
        let store = DraftStore::default();
        let id = Uuid::new_v4();
        assert!(store.get(&id).is_none());
        assert!(!store.complete_step(&id, Step::Basic, Session::default()));
        assert!(store.finish(&id).is_none());
    }

    #[test]
    fn test_expired_drafts_are_dropped() {
        let store = DraftStore::new(Duration::ZERO);
        let id = store.start(Draft::new(WizardKind::Create, None, Session::default()));
        std::thread::sleep(Duration::from_millis(5));
        assert!(store.get(&id).is_none());
        assert!(store.is_empty());
    }
}
