//! Typed fields of the three wizard steps.
//!
//! Each step reads its defaults from the draft session, parses a submitted
//! form, validates it, and merges the result back into the draft. Raw text
//! is kept for numeric and date inputs so an invalid submission re-renders
//! exactly what was typed.

use chrono::{DateTime, NaiveDateTime};
use serde_json::Value;

use quizdesk_protocol::{RepeatSchedule, Session};

use super::form::{FieldErrors, FieldView, FormValues, attach_errors};
use super::options::{
    AUTH_OPTIONS, COURSE_OPTIONS, GRADE_OPTIONS, GROUP_OPTIONS, GURUKUL_FORMAT_OPTIONS,
    OPTIONAL_LIMIT_OPTIONS, SESSION_TYPE_OPTIONS, STREAM_OPTIONS, SelectOption,
    TEST_FORMAT_OPTIONS, TEST_PLATFORM_OPTIONS, TEST_PURPOSE_OPTIONS, TEST_TYPE_OPTIONS,
    WEEKDAY_OPTIONS, batch_in_group, batches_for, contains, group_defaults,
};
use super::wizard::{Step, WizardKind};

/// Platform value that switches the Platform step to quiz metadata.
pub const QUIZ_PLATFORM: &str = "quiz";

/// Format written back to the session for start and end times.
pub const STORED_DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Format of an HTML `datetime-local` input.
pub const INPUT_DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// What a step needs to know about the wizard it runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepContext {
    pub kind: WizardKind,
}

impl StepContext {
    pub fn new(kind: WizardKind) -> Self {
        Self { kind }
    }

    /// Group, batch and platform cannot change once a session exists.
    pub fn locks_identity(&self) -> bool {
        self.kind == WizardKind::Edit
    }
}

/// One wizard step's typed form.
pub trait StepForm: Sized {
    /// Defaults derived from the draft.
    fn from_session(session: &Session) -> Self;

    /// Read a submission. Locked fields come from the draft, since disabled
    /// inputs are not submitted.
    fn parse(values: &FormValues, draft: &Session, ctx: &StepContext) -> Self;

    /// Errors keyed by field name; empty when the step is valid.
    fn validate(&self) -> FieldErrors;

    /// Merge into the draft. Only called on a valid form.
    fn apply(self, session: &mut Session);

    /// Field descriptions for rendering.
    fn fields(&self, ctx: &StepContext) -> Vec<FieldView>;
}

/// Fields to render for `step`, with defaults from the draft.
pub fn render_step(step: Step, draft: &Session, ctx: &StepContext) -> Vec<FieldView> {
    match step {
        Step::Basic => BasicFields::from_session(draft).fields(ctx),
        Step::Platform => PlatformFields::from_session(draft).fields(ctx),
        Step::Timeline => TimelineFields::from_session(draft).fields(ctx),
    }
}

/// Validate a submission for `step` and merge it into the draft. On failure
/// the draft is untouched and the fields come back annotated with errors.
pub fn submit_step(
    step: Step,
    values: &FormValues,
    draft: &mut Session,
    ctx: &StepContext,
) -> Result<(), Vec<FieldView>> {
    match step {
        Step::Basic => submit::<BasicFields>(values, draft, ctx),
        Step::Platform => submit::<PlatformFields>(values, draft, ctx),
        Step::Timeline => submit::<TimelineFields>(values, draft, ctx),
    }
}

fn submit<F: StepForm>(
    values: &FormValues,
    draft: &mut Session,
    ctx: &StepContext,
) -> Result<(), Vec<FieldView>> {
    let form = F::parse(values, draft, ctx);
    let errors = form.validate();
    if errors.is_empty() {
        form.apply(draft);
        return Ok(());
    }
    let mut fields = form.fields(ctx);
    attach_errors(&mut fields, &errors);
    Err(fields)
}

/// Re-render the Basic step with the chosen group's presets applied. Nothing
/// is validated or stored.
pub fn basic_with_group_defaults(
    values: &FormValues,
    draft: &Session,
    ctx: &StepContext,
) -> Vec<FieldView> {
    let mut form = BasicFields::parse(values, draft, ctx);
    if !ctx.locks_identity() {
        form.apply_group_defaults();
    }
    form.fields(ctx)
}

/// Parse a date-time as entered in a form or stored upstream.
pub fn parse_date_time(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, INPUT_DATE_TIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(raw, STORED_DATE_TIME_FORMAT))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f"))
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.naive_local())
        })
}

fn is_http_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

fn check_option(
    errors: &mut FieldErrors,
    name: &'static str,
    label: &str,
    options: &[SelectOption],
    value: Option<&str>,
    required: bool,
) {
    match value {
        None if required => {
            errors.insert(name, format!("{label} is required"));
        }
        Some(v) if !contains(options, v) => {
            errors.insert(name, format!("Unknown {}: {v}", label.to_lowercase()));
        }
        _ => {}
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BasicFields {
    pub group: Option<String>,
    pub batch: Option<String>,
    pub grade: Option<String>,
    pub session_type: Option<String>,
    pub auth_type: Option<String>,
    pub activate_sign_up: bool,
    pub is_popup_form: bool,
    pub no_of_fields_in_popup: Option<String>,
    pub is_redirection: bool,
    pub is_id_generation: bool,
    pub signup_form_name: Option<String>,
    pub platform: Option<String>,
    /// Group, batch and platform were taken from the stored record. They are
    /// whatever upstream holds and are not checked against the option lists.
    pub identity_locked: bool,
}

impl BasicFields {
    /// Overwrite auth type and switches with the selected group's presets.
    /// A batch from another group is cleared.
    pub fn apply_group_defaults(&mut self) {
        let Some(group) = self.group.as_deref() else {
            return;
        };
        if let Some(defaults) = group_defaults(group) {
            self.auth_type = Some(defaults.auth_type.to_string());
            self.activate_sign_up = defaults.signup_form;
            self.is_popup_form = defaults.popup_form;
            self.is_redirection = defaults.redirection;
            self.is_id_generation = defaults.id_generation;
        }
        if self
            .batch
            .as_deref()
            .is_some_and(|batch| !batch_in_group(batch, group))
        {
            self.batch = None;
        }
    }

    fn popup_count(&self) -> Option<Result<u32, ()>> {
        self.no_of_fields_in_popup
            .as_deref()
            .map(|raw| raw.parse::<u32>().map_err(|_| ()))
    }
}

impl StepForm for BasicFields {
    fn from_session(session: &Session) -> Self {
        let meta = session.meta_data.as_ref();
        Self {
            group: meta.and_then(|m| m.group.clone()),
            batch: meta.and_then(|m| m.batch.clone()),
            grade: meta.and_then(|m| m.grade).map(|g| g.to_string()),
            session_type: session.session_type.clone(),
            auth_type: session.auth_type.clone(),
            activate_sign_up: session.signup_form.unwrap_or(false),
            is_popup_form: session.popup_form.unwrap_or(false),
            no_of_fields_in_popup: meta
                .and_then(|m| m.popup_field_count())
                .map(|n| n.to_string()),
            is_redirection: session.redirection.unwrap_or(false),
            is_id_generation: session.id_generation.unwrap_or(false),
            signup_form_name: meta
                .and_then(|m| m.signup_form_name.clone())
                .filter(|n| !n.is_empty()),
            platform: session.platform.clone(),
            identity_locked: false,
        }
    }

    fn parse(values: &FormValues, draft: &Session, ctx: &StepContext) -> Self {
        let mut form = Self {
            group: values.text("group"),
            batch: values.text("batch"),
            grade: values.text("grade"),
            session_type: values.text("session_type"),
            auth_type: values.text("auth_type"),
            activate_sign_up: values.checked("activate_sign_up"),
            is_popup_form: values.checked("is_popup_form"),
            no_of_fields_in_popup: values.text("no_of_fields_in_popup"),
            is_redirection: values.checked("is_redirection"),
            is_id_generation: values.checked("is_id_generation"),
            signup_form_name: values.text("signup_form_name"),
            platform: values.text("platform"),
            identity_locked: false,
        };
        if ctx.locks_identity() {
            let stored = Self::from_session(draft);
            form.group = stored.group;
            form.batch = stored.batch;
            form.platform = stored.platform;
            form.identity_locked = true;
        }
        form
    }

    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if !self.identity_locked {
            check_option(&mut errors, "group", "Group", GROUP_OPTIONS, self.group.as_deref(), true);
            match (self.batch.as_deref(), self.group.as_deref()) {
                (None, _) => {
                    errors.insert("batch", "Batch is required".to_string());
                }
                (Some(batch), Some(group)) if !batch_in_group(batch, group) => {
                    errors.insert("batch", format!("Batch {batch} does not belong to {group}"));
                }
                _ => {}
            }
            check_option(
                &mut errors,
                "platform",
                "Platform",
                TEST_PLATFORM_OPTIONS,
                self.platform.as_deref(),
                true,
            );
        }
        check_option(&mut errors, "grade", "Grade", GRADE_OPTIONS, self.grade.as_deref(), true);
        check_option(
            &mut errors,
            "session_type",
            "Session type",
            SESSION_TYPE_OPTIONS,
            self.session_type.as_deref(),
            true,
        );
        check_option(
            &mut errors,
            "auth_type",
            "Auth type",
            AUTH_OPTIONS,
            self.auth_type.as_deref(),
            true,
        );
        match self.popup_count() {
            Some(Err(())) => {
                errors.insert(
                    "no_of_fields_in_popup",
                    "Must be a whole number, 0 or more".to_string(),
                );
            }
            Some(Ok(0)) | None if self.is_popup_form => {
                errors.insert(
                    "no_of_fields_in_popup",
                    "Popup form needs at least one field".to_string(),
                );
            }
            _ => {}
        }
        errors
    }

    fn apply(self, session: &mut Session) {
        let popup_count = match self.popup_count() {
            Some(Ok(n)) if n > 0 => Value::from(n),
            _ => Value::String(String::new()),
        };
        let meta = session.meta_mut();
        meta.group = self.group;
        meta.batch = self.batch;
        meta.grade = self.grade.and_then(|g| g.parse().ok());
        meta.number_of_fields_in_popup_form = Some(popup_count);
        meta.signup_form_name = Some(self.signup_form_name.unwrap_or_default());

        session.auth_type = self.auth_type;
        session.signup_form = Some(self.activate_sign_up);
        session.popup_form = Some(self.is_popup_form);
        session.redirection = Some(self.is_redirection);
        session.id_generation = Some(self.is_id_generation);
        session.platform = self.platform;
        session.session_type = self.session_type;
    }

    fn fields(&self, ctx: &StepContext) -> Vec<FieldView> {
        let locked = ctx.locks_identity();
        let group = self.group.as_deref().unwrap_or_default();
        vec![
            FieldView::select("group", "Group", GROUP_OPTIONS, self.group.as_deref())
                .placeholder("Select a group")
                .helper("Changing the group applies its default settings")
                .disabled(locked)
                .required(),
            FieldView::batch_select("batch", "Batch", batches_for(group), self.batch.as_deref())
                .placeholder("Select a batch")
                .disabled(locked)
                .required(),
            FieldView::select("grade", "Grade", GRADE_OPTIONS, self.grade.as_deref())
                .placeholder("Select a grade")
                .required(),
            FieldView::select(
                "session_type",
                "Session Type",
                SESSION_TYPE_OPTIONS,
                self.session_type.as_deref(),
            )
            .placeholder("Select a session type")
            .required(),
            FieldView::select("auth_type", "Auth Type", AUTH_OPTIONS, self.auth_type.as_deref())
                .placeholder("Select an auth type")
                .required(),
            FieldView::switch("activate_sign_up", "Activate Sign Up", self.activate_sign_up)
                .helper("Do you want to display sign up form?"),
            FieldView::switch("is_popup_form", "Is Popup Form Allowed", self.is_popup_form)
                .helper("Do you want to display popup form?"),
            FieldView::number(
                "no_of_fields_in_popup",
                "No Of Fields In Popup",
                self.no_of_fields_in_popup.clone(),
            )
            .placeholder("Enter no of fields in popup")
            .min(0)
            .step(1),
            FieldView::switch("is_redirection", "Is Redirection allowed?", self.is_redirection)
                .helper("Do you want to allow redirection?"),
            FieldView::switch(
                "is_id_generation",
                "Is ID Generation allowed?",
                self.is_id_generation,
            )
            .helper("Do you want to generate IDs?"),
            FieldView::text(
                "signup_form_name",
                "Signup Form Name",
                self.signup_form_name.as_deref(),
            )
            .placeholder("Enter form name"),
            FieldView::select(
                "platform",
                "Platform",
                TEST_PLATFORM_OPTIONS,
                self.platform.as_deref(),
            )
            .placeholder("Select a platform")
            .disabled(locked)
            .required(),
        ]
    }
}

/// Delivery details. Quiz sessions carry test metadata; other platforms only
/// need a link.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlatformFields {
    /// Chosen on the Basic step; decides which inputs apply.
    pub platform: Option<String>,
    pub platform_link: Option<String>,
    pub cms_test_id: Option<String>,
    pub course: Option<String>,
    pub stream: Option<String>,
    pub test_format: Option<String>,
    pub test_purpose: Option<String>,
    pub test_type: Option<String>,
    pub gurukul_format_type: Option<String>,
    pub optional_limits: Option<String>,
    pub show_answers: bool,
    pub show_scores: bool,
}

impl PlatformFields {
    pub fn is_quiz(&self) -> bool {
        self.platform.as_deref() == Some(QUIZ_PLATFORM)
    }
}

impl StepForm for PlatformFields {
    fn from_session(session: &Session) -> Self {
        let meta = session.meta_data.clone().unwrap_or_default();
        Self {
            platform: session.platform.clone(),
            platform_link: session.platform_link.clone(),
            cms_test_id: meta.cms_test_id,
            course: meta.course,
            stream: meta.stream,
            test_format: meta.test_format,
            test_purpose: meta.test_purpose,
            test_type: meta.test_type,
            gurukul_format_type: meta.gurukul_format_type,
            optional_limits: meta.optional_limits,
            show_answers: meta.show_answers.unwrap_or(false),
            show_scores: meta.show_scores.unwrap_or(false),
        }
    }

    fn parse(values: &FormValues, draft: &Session, _ctx: &StepContext) -> Self {
        Self {
            platform: draft.platform.clone(),
            platform_link: values.text("platform_link"),
            cms_test_id: values.text("cms_test_id"),
            course: values.text("course"),
            stream: values.text("stream"),
            test_format: values.text("test_format"),
            test_purpose: values.text("test_purpose"),
            test_type: values.text("test_type"),
            gurukul_format_type: values.text("gurukul_format_type"),
            optional_limits: values.text("optional_limits"),
            show_answers: values.checked("show_answers"),
            show_scores: values.checked("show_scores"),
        }
    }

    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        check_option(&mut errors, "course", "Course", COURSE_OPTIONS, self.course.as_deref(), false);
        check_option(&mut errors, "stream", "Stream", STREAM_OPTIONS, self.stream.as_deref(), false);
        check_option(
            &mut errors,
            "test_format",
            "Test format",
            TEST_FORMAT_OPTIONS,
            self.test_format.as_deref(),
            false,
        );
        check_option(
            &mut errors,
            "test_purpose",
            "Test purpose",
            TEST_PURPOSE_OPTIONS,
            self.test_purpose.as_deref(),
            false,
        );

        if self.is_quiz() {
            match self.cms_test_id.as_deref() {
                None => {
                    errors.insert("cms_test_id", "CMS test link is required".to_string());
                }
                Some(link) if !is_http_url(link) => {
                    errors.insert("cms_test_id", "CMS test link must be a URL".to_string());
                }
                _ => {}
            }
            check_option(
                &mut errors,
                "test_type",
                "Test type",
                TEST_TYPE_OPTIONS,
                self.test_type.as_deref(),
                true,
            );
            check_option(
                &mut errors,
                "gurukul_format_type",
                "Gurukul format",
                GURUKUL_FORMAT_OPTIONS,
                self.gurukul_format_type.as_deref(),
                false,
            );
            check_option(
                &mut errors,
                "optional_limits",
                "Optional limits",
                OPTIONAL_LIMIT_OPTIONS,
                self.optional_limits.as_deref(),
                false,
            );
        } else {
            match self.platform_link.as_deref() {
                None => {
                    errors.insert("platform_link", "Platform link is required".to_string());
                }
                Some(link) if !is_http_url(link) => {
                    errors.insert("platform_link", "Platform link must be a URL".to_string());
                }
                _ => {}
            }
        }
        errors
    }

    fn apply(self, session: &mut Session) {
        let quiz = self.is_quiz();
        let meta = session.meta_mut();
        meta.course = self.course;
        meta.stream = self.stream;
        meta.test_format = self.test_format;
        meta.test_purpose = self.test_purpose;
        if quiz {
            meta.cms_test_id = self.cms_test_id;
            meta.test_type = self.test_type;
            meta.gurukul_format_type = self.gurukul_format_type;
            meta.optional_limits = self.optional_limits;
            meta.show_answers = Some(self.show_answers);
            meta.show_scores = Some(self.show_scores);
        } else {
            meta.cms_test_id = None;
            meta.test_type = None;
            meta.gurukul_format_type = None;
            meta.optional_limits = None;
            meta.show_answers = None;
            meta.show_scores = None;
            session.platform_link = self.platform_link;
        }
    }

    fn fields(&self, _ctx: &StepContext) -> Vec<FieldView> {
        let mut fields = Vec::new();
        if self.is_quiz() {
            fields.push(
                FieldView::url("cms_test_id", "CMS Test Link", self.cms_test_id.as_deref())
                    .placeholder("https://")
                    .required(),
            );
        } else {
            fields.push(
                FieldView::url("platform_link", "Platform Link", self.platform_link.as_deref())
                    .placeholder("https://")
                    .helper("Meeting or video link students will open")
                    .required(),
            );
        }
        fields.push(
            FieldView::select("course", "Course", COURSE_OPTIONS, self.course.as_deref())
                .placeholder("Select a course"),
        );
        fields.push(
            FieldView::select("stream", "Stream", STREAM_OPTIONS, self.stream.as_deref())
                .placeholder("Select a stream"),
        );
        fields.push(
            FieldView::select(
                "test_format",
                "Test Format",
                TEST_FORMAT_OPTIONS,
                self.test_format.as_deref(),
            )
            .placeholder("Select a test format"),
        );
        fields.push(
            FieldView::select(
                "test_purpose",
                "Test Purpose",
                TEST_PURPOSE_OPTIONS,
                self.test_purpose.as_deref(),
            )
            .placeholder("Select a test purpose"),
        );
        if self.is_quiz() {
            fields.push(
                FieldView::select(
                    "test_type",
                    "Test Type",
                    TEST_TYPE_OPTIONS,
                    self.test_type.as_deref(),
                )
                .placeholder("Select a test type")
                .required(),
            );
            fields.push(
                FieldView::select(
                    "gurukul_format_type",
                    "Gurukul Format Type",
                    GURUKUL_FORMAT_OPTIONS,
                    self.gurukul_format_type.as_deref(),
                )
                .placeholder("Select a format"),
            );
            fields.push(
                FieldView::select(
                    "optional_limits",
                    "Optional Limits",
                    OPTIONAL_LIMIT_OPTIONS,
                    self.optional_limits.as_deref(),
                )
                .placeholder("Select optional limits"),
            );
            fields.push(FieldView::switch("show_answers", "Show Answers", self.show_answers));
            fields.push(FieldView::switch("show_scores", "Show Scores", self.show_scores));
        }
        fields
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineFields {
    pub name: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub is_active: bool,
    /// ISO weekday numbers as submitted.
    pub repeat_days: Vec<String>,
}

impl TimelineFields {
    fn days(&self) -> Vec<u8> {
        let mut days: Vec<u8> = self
            .repeat_days
            .iter()
            .filter_map(|d| d.parse().ok())
            .filter(|d| (1..=7).contains(d))
            .collect();
        days.sort_unstable();
        days.dedup();
        days
    }
}

fn input_value(stored: Option<&str>) -> Option<String> {
    let stored = stored?;
    Some(
        parse_date_time(stored)
            .map(|dt| dt.format(INPUT_DATE_TIME_FORMAT).to_string())
            .unwrap_or_else(|| stored.to_string()),
    )
}

impl StepForm for TimelineFields {
    fn from_session(session: &Session) -> Self {
        let repeat_days = match &session.repeat_schedule {
            Some(schedule) if !schedule.params.is_empty() => {
                schedule.params.iter().map(u8::to_string).collect()
            }
            _ => WEEKDAY_OPTIONS.iter().map(|d| d.value.to_string()).collect(),
        };
        Self {
            name: session.name.clone().filter(|n| !n.is_empty()),
            start_time: input_value(session.start_time.as_deref()),
            end_time: input_value(session.end_time.as_deref()),
            is_active: session.is_active.unwrap_or(true),
            repeat_days,
        }
    }

    fn parse(values: &FormValues, _draft: &Session, _ctx: &StepContext) -> Self {
        Self {
            name: values.text("name"),
            start_time: values.text("start_time"),
            end_time: values.text("end_time"),
            is_active: values.checked("is_active"),
            repeat_days: values
                .all("repeat_days")
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }

    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if self.name.is_none() {
            errors.insert("name", "Name is required".to_string());
        }

        let start = self.start_time.as_deref().map(parse_date_time);
        let end = self.end_time.as_deref().map(parse_date_time);
        match start {
            None => {
                errors.insert("start_time", "Start time is required".to_string());
            }
            Some(None) => {
                errors.insert("start_time", "Start time is not a valid date".to_string());
            }
            Some(Some(_)) => {}
        }
        match end {
            None => {
                errors.insert("end_time", "End time is required".to_string());
            }
            Some(None) => {
                errors.insert("end_time", "End time is not a valid date".to_string());
            }
            Some(Some(end)) => {
                if let Some(Some(start)) = start
                    && end <= start
                {
                    errors.insert("end_time", "End time must be after start time".to_string());
                }
            }
        }

        if self.days().is_empty() {
            errors.insert("repeat_days", "Pick at least one day".to_string());
        }
        errors
    }

    fn apply(self, session: &mut Session) {
        let stored = |raw: Option<&str>| {
            raw.and_then(parse_date_time)
                .map(|dt| dt.format(STORED_DATE_TIME_FORMAT).to_string())
        };
        session.start_time = stored(self.start_time.as_deref());
        session.end_time = stored(self.end_time.as_deref());
        session.repeat_schedule = Some(RepeatSchedule::weekly(self.days()));
        session.is_active = Some(self.is_active);
        session.name = self.name;
    }

    fn fields(&self, _ctx: &StepContext) -> Vec<FieldView> {
        vec![
            FieldView::text("name", "Name", self.name.as_deref())
                .placeholder("Enter session name")
                .required(),
            FieldView::date_time("start_time", "Start Time", self.start_time.clone()).required(),
            FieldView::date_time("end_time", "End Time", self.end_time.clone()).required(),
            FieldView::switch("is_active", "Is Active", self.is_active)
                .helper("Inactive sessions are hidden from students"),
            FieldView::multi_select(
                "repeat_days",
                "Repeat On",
                WEEKDAY_OPTIONS,
                &self.repeat_days,
            )
            .helper("Days of the week the session repeats")
            .required(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizdesk_protocol::MetaData;
    use serde_json::json;

    fn create() -> StepContext {
        StepContext::new(WizardKind::Create)
    }

    fn edit() -> StepContext {
        StepContext::new(WizardKind::Edit)
    }

    fn stored_session() -> Session {
        Session {
            id: Some(9),
            name: Some("Weekly Physics".to_string()),
            platform: Some("quiz".to_string()),
            session_type: Some("quiz".to_string()),
            auth_type: Some("ID".to_string()),
            signup_form: Some(true),
            popup_form: Some(false),
            start_time: Some("2024-05-01T10:00:00".to_string()),
            end_time: Some("2024-05-01T12:30:00".to_string()),
            repeat_schedule: Some(RepeatSchedule::weekly(vec![1, 3])),
            meta_data: Some(MetaData {
                group: Some("EnableStudents".to_string()),
                batch: Some("EN-11-Photon-Eng-24".to_string()),
                grade: Some(11),
                number_of_fields_in_popup_form: Some(json!("")),
                test_type: Some("assessment".to_string()),
                cms_test_id: Some("https://cms.example/t/1".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn basic_values() -> FormValues {
        FormValues::from([
            ("group", "HaryanaStudents"),
            ("batch", "HR-11-Eng-24"),
            ("grade", "11"),
            ("session_type", "quiz"),
            ("auth_type", "DOB"),
            ("activate_sign_up", "on"),
            ("is_popup_form", "on"),
            ("no_of_fields_in_popup", "3"),
            ("platform", "quiz"),
        ])
    }

    #[test]
    fn test_basic_defaults_from_session() {
        let form = BasicFields::from_session(&stored_session());
        assert_eq!(form.group.as_deref(), Some("EnableStudents"));
        assert_eq!(form.grade.as_deref(), Some("11"));
        assert_eq!(form.session_type.as_deref(), Some("quiz"));
        assert!(form.activate_sign_up);
        assert_eq!(form.no_of_fields_in_popup, None);
    }

    #[test]
    fn test_basic_submit_merges_into_draft() {
        let mut draft = Session::default();
        submit_step(Step::Basic, &basic_values(), &mut draft, &create()).unwrap();

        let meta = draft.meta_data.as_ref().unwrap();
        assert_eq!(meta.group.as_deref(), Some("HaryanaStudents"));
        assert_eq!(meta.grade, Some(11));
        assert_eq!(meta.number_of_fields_in_popup_form, Some(json!(3)));
        assert_eq!(meta.signup_form_name.as_deref(), Some(""));
        assert_eq!(draft.popup_form, Some(true));
        assert_eq!(draft.redirection, Some(false));
        assert_eq!(draft.session_type.as_deref(), Some("quiz"));
    }

    #[test]
    fn test_basic_requires_fields() {
        let mut draft = Session::default();
        let fields = submit_step(Step::Basic, &FormValues::default(), &mut draft, &create())
            .unwrap_err();
        let errored: Vec<_> = fields
            .iter()
            .filter(|f| f.error.is_some())
            .map(|f| f.name)
            .collect();
        assert_eq!(
            errored,
            vec!["group", "batch", "grade", "session_type", "auth_type", "platform"]
        );
        assert_eq!(draft, Session::default());
    }

    #[test]
    fn test_basic_rejects_batch_from_other_group() {
        let values = FormValues::from([("group", "DelhiStudents"), ("batch", "HR-11-Eng-24")]);
        let form = BasicFields::parse(&values, &Session::default(), &create());
        assert!(form.validate().contains_key("batch"));
    }

    #[test]
    fn test_popup_needs_field_count() {
        let values = FormValues::from([("is_popup_form", "on"), ("no_of_fields_in_popup", "0")]);
        let form = BasicFields::parse(&values, &Session::default(), &create());
        assert!(form.validate().contains_key("no_of_fields_in_popup"));

        let values = FormValues::from([("no_of_fields_in_popup", "two")]);
        let form = BasicFields::parse(&values, &Session::default(), &create());
        assert!(form.validate().contains_key("no_of_fields_in_popup"));
    }

    #[test]
    fn test_edit_keeps_locked_fields_from_draft() {
        let draft = stored_session();
        let form = BasicFields::parse(&basic_values(), &draft, &edit());
        assert_eq!(form.group.as_deref(), Some("EnableStudents"));
        assert_eq!(form.batch.as_deref(), Some("EN-11-Photon-Eng-24"));
        assert_eq!(form.auth_type.as_deref(), Some("DOB"));

        let fields = form.fields(&edit());
        let disabled: Vec<_> = fields.iter().filter(|f| f.disabled).map(|f| f.name).collect();
        assert_eq!(disabled, vec!["group", "batch", "platform"]);
    }

    #[test]
    fn test_edit_accepts_unlisted_stored_identity() {
        let mut draft = stored_session();
        draft.platform = Some("zoom".to_string());
        let meta = draft.meta_mut();
        meta.group = Some("KarnatakaStudents".to_string());
        meta.batch = Some("EN-11-Photon-Eng-25".to_string());

        submit_step(Step::Basic, &basic_values(), &mut draft, &edit()).unwrap();
        let meta = draft.meta_data.as_ref().unwrap();
        assert_eq!(meta.group.as_deref(), Some("KarnatakaStudents"));
        assert_eq!(meta.batch.as_deref(), Some("EN-11-Photon-Eng-25"));
        assert_eq!(draft.platform.as_deref(), Some("zoom"));
        assert_eq!(meta.grade, Some(11));

        let fields = render_step(Step::Basic, &draft, &edit());
        let batch = fields.iter().find(|f| f.name == "batch").unwrap();
        assert_eq!(batch.value, "EN-11-Photon-Eng-25");
        assert!(batch.options.iter().any(|o| o.value == "EN-11-Photon-Eng-25" && o.selected));
    }

    #[test]
    fn test_create_still_checks_batch_catalog() {
        let values = FormValues::from([
            ("group", "EnableStudents"),
            ("batch", "EN-11-Photon-Eng-25"),
            ("grade", "11"),
            ("session_type", "quiz"),
            ("auth_type", "ID"),
            ("platform", "quiz"),
        ]);
        let mut draft = Session::default();
        let fields = submit_step(Step::Basic, &values, &mut draft, &create()).unwrap_err();
        let batch = fields.iter().find(|f| f.name == "batch").unwrap();
        assert!(batch.error.is_some());
    }

    #[test]
    fn test_group_defaults_applied() {
        let values = FormValues::from([("group", "HaryanaStudents"), ("batch", "DL-11-Eng-24")]);
        let fields = basic_with_group_defaults(&values, &Session::default(), &create());
        let field = |name: &str| fields.iter().find(|f| f.name == name).unwrap();
        assert_eq!(field("auth_type").value, "DOB");
        assert!(field("is_popup_form").checked);
        assert!(field("is_id_generation").checked);
        assert_eq!(field("batch").value, "");
        assert!(field("batch").options.iter().all(|o| o.value.starts_with("HR-")));
    }

    #[test]
    fn test_platform_fields_depend_on_platform() {
        let quiz = PlatformFields::from_session(&stored_session());
        let names: Vec<_> = quiz.fields(&create()).iter().map(|f| f.name).collect();
        assert!(names.contains(&"cms_test_id"));
        assert!(!names.contains(&"platform_link"));

        let mut meet = stored_session();
        meet.platform = Some("meet".to_string());
        let names: Vec<_> = PlatformFields::from_session(&meet)
            .fields(&create())
            .iter()
            .map(|f| f.name)
            .collect();
        assert!(names.contains(&"platform_link"));
        assert!(!names.contains(&"test_type"));
    }

    #[test]
    fn test_platform_validation() {
        let draft = stored_session();
        let values = FormValues::from([("cms_test_id", "not a link")]);
        let errors = PlatformFields::parse(&values, &draft, &create()).validate();
        assert!(errors.contains_key("cms_test_id"));
        assert!(errors.contains_key("test_type"));

        let mut meet = stored_session();
        meet.platform = Some("meet".to_string());
        let values = FormValues::from([("platform_link", "https://meet.example/abc")]);
        let errors = PlatformFields::parse(&values, &meet, &create()).validate();
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn test_platform_apply_keeps_marking_scheme() {
        let mut draft = stored_session();
        draft.meta_mut().marking_scheme = Some(json!({"correct": 4, "wrong": -1}));
        let values = FormValues::from([
            ("cms_test_id", "https://cms.example/t/2"),
            ("test_type", "homework"),
            ("show_scores", "on"),
        ]);
        submit_step(Step::Platform, &values, &mut draft, &create()).unwrap();
        let meta = draft.meta_data.unwrap();
        assert_eq!(meta.cms_test_id.as_deref(), Some("https://cms.example/t/2"));
        assert_eq!(meta.show_scores, Some(true));
        assert_eq!(meta.show_answers, Some(false));
        assert_eq!(meta.marking_scheme, Some(json!({"correct": 4, "wrong": -1})));
    }

    #[test]
    fn test_non_quiz_platform_drops_quiz_metadata() {
        let mut draft = stored_session();
        draft.platform = Some("meet".to_string());
        {
            let meta = draft.meta_mut();
            meta.show_answers = Some(true);
            meta.show_scores = Some(true);
        }
        let values = FormValues::from([("platform_link", "https://meet.example/abc")]);
        submit_step(Step::Platform, &values, &mut draft, &create()).unwrap();

        assert_eq!(draft.platform_link.as_deref(), Some("https://meet.example/abc"));
        let meta = draft.meta_data.unwrap();
        assert_eq!(meta.cms_test_id, None);
        assert_eq!(meta.test_type, None);
        assert_eq!(meta.show_answers, None);
        assert_eq!(meta.show_scores, None);
    }

    #[test]
    fn test_timeline_defaults() {
        let form = TimelineFields::from_session(&stored_session());
        assert_eq!(form.start_time.as_deref(), Some("2024-05-01T10:00"));
        assert_eq!(form.repeat_days, vec!["1", "3"]);
        assert!(form.is_active);

        let empty = TimelineFields::from_session(&Session::default());
        assert_eq!(empty.repeat_days.len(), 7);
    }

    #[test]
    fn test_timeline_submit() {
        let mut draft = Session::default();
        let values = FormValues::from([
            ("name", "Mock Test"),
            ("start_time", "2024-06-01T09:00"),
            ("end_time", "2024-06-01T11:00"),
            ("is_active", "on"),
            ("repeat_days", "5"),
            ("repeat_days", "2"),
            ("repeat_days", "5"),
        ]);
        submit_step(Step::Timeline, &values, &mut draft, &create()).unwrap();
        assert_eq!(draft.start_time.as_deref(), Some("2024-06-01T09:00:00"));
        assert_eq!(draft.end_time.as_deref(), Some("2024-06-01T11:00:00"));
        assert_eq!(draft.repeat_schedule, Some(RepeatSchedule::weekly(vec![2, 5])));
        assert_eq!(draft.is_active, Some(true));
    }

    #[test]
    fn test_timeline_end_must_follow_start() {
        let values = FormValues::from([
            ("name", "Mock Test"),
            ("start_time", "2024-06-01T09:00"),
            ("end_time", "2024-06-01T09:00"),
        ]);
        let errors = TimelineFields::parse(&values, &Session::default(), &create()).validate();
        assert!(errors.contains_key("end_time"));
        assert!(errors.contains_key("repeat_days"));
        assert!(!errors.contains_key("start_time"));
    }

    #[test]
    fn test_parse_date_time_formats() {
        assert!(parse_date_time("2024-06-01T09:00").is_some());
        assert!(parse_date_time("2024-06-01T09:00:30").is_some());
        assert!(parse_date_time("2024-06-01T09:00:30.250").is_some());
        assert!(parse_date_time("2024-06-01T09:00:00+05:30").is_some());
        assert!(parse_date_time("yesterday").is_none());
    }
}
