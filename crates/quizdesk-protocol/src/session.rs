//! The quiz session record as exchanged with the session API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::fields::strip_fields;
use crate::lenient;

/// A quiz session record.
///
/// Every field is optional: drafts start empty, and the upstream API omits
/// fields freely. Fields this type does not know about are kept in `extra`
/// so that a fetch, edit and patch cycle never drops upstream data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Display name of the session (the test name in tables).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Delivery platform (e.g. "quiz", "meet").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform_link: Option<String>,

    /// Student-facing portal link, assigned by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portal_link: Option<String>,

    /// ISO-8601 local date-time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,

    /// ISO-8601 local date-time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat_schedule: Option<RepeatSchedule>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_data: Option<MetaData>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by_id: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<Purpose>,

    /// Server-generated public session identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signup_form: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signup_form_id: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub popup_form: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub popup_form_id: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_generation: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirection: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_type: Option<String>,

    /// Session type (e.g. "quiz", "sign-in").
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub session_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inserted_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Free-form metadata nested under `meta_data`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetaData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch: Option<String>,

    #[serde(
        default,
        deserialize_with = "lenient::opt_i64",
        skip_serializing_if = "Option::is_none"
    )]
    pub grade: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_format: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_purpose: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gurukul_format_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marking_scheme: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optional_limits: Option<String>,

    /// Link to the test in the CMS.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cms_test_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_answers: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_scores: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shortened_link: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_testing_link: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_link: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_created: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_synced_to_bq: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub infinite_session: Option<bool>,

    /// Number of sign-up fields shown in the popup. Upstream stores either a
    /// number, a numeric string, or an empty string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_fields_in_popup_form: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signup_form_name: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MetaData {
    /// Popup field count as a number, `None` when absent, empty or zero.
    pub fn popup_field_count(&self) -> Option<u32> {
        self.number_of_fields_in_popup_form
            .as_ref()
            .and_then(lenient::value_as_i64)
            .filter(|n| *n > 0)
            .and_then(|n| u32::try_from(n).ok())
    }
}

/// Why a session exists. Attached once, at creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Purpose {
    #[serde(rename = "type")]
    pub purpose_type: String,
    pub params: Value,
}

impl Purpose {
    /// The purpose stamped on every session created from this application.
    pub fn attendance_quiz() -> Self {
        Self {
            purpose_type: "attendance".to_string(),
            params: Value::String("quiz".to_string()),
        }
    }
}

/// Recurrence of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepeatSchedule {
    /// Only "weekly" is produced by this application.
    #[serde(rename = "type")]
    pub schedule_type: String,
    /// ISO weekday numbers, Monday = 1 through Sunday = 7.
    #[serde(default)]
    pub params: Vec<u8>,
}

impl RepeatSchedule {
    pub fn weekly(days: Vec<u8>) -> Self {
        Self {
            schedule_type: "weekly".to_string(),
            params: days,
        }
    }
}

impl Session {
    /// Metadata, created empty on first access.
    pub fn meta_mut(&mut self) -> &mut MetaData {
        self.meta_data.get_or_insert_with(MetaData::default)
    }

    /// Copy of this session with the given dotted field paths removed.
    pub fn without_fields(&self, paths: &[&str]) -> Result<Session, serde_json::Error> {
        let mut value = serde_json::to_value(self)?;
        strip_fields(&mut value, paths);
        serde_json::from_value(value)
    }
}
