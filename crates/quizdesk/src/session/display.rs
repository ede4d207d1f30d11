//! Read-only projections of a session for the table and the detail view.

use serde::Serialize;

use quizdesk_protocol::{MetaData, Session};

use super::options::{
    AUTH_OPTIONS, COURSE_OPTIONS, GROUP_OPTIONS, GURUKUL_FORMAT_OPTIONS, OPTIONAL_LIMIT_OPTIONS,
    SESSION_TYPE_OPTIONS, STREAM_OPTIONS, SelectOption, TEST_FORMAT_OPTIONS,
    TEST_PLATFORM_OPTIONS, TEST_PURPOSE_OPTIONS, TEST_TYPE_OPTIONS, WEEKDAY_OPTIONS,
    batch_label, label_for,
};
use super::pagination::TablePage;
use super::steps::parse_date_time;

/// Placeholder for missing values.
pub const NOT_AVAILABLE: &str = "N/A";

const DISPLAY_DATE_TIME_FORMAT: &str = "%d %b %Y, %I:%M %p";

/// One table row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub serial_no: u64,
    pub id: Option<i64>,
    pub name: String,
    pub batch: String,
    pub group: String,
    pub platform: String,
    pub start_time: String,
    pub end_time: String,
    pub session_type: String,
    pub report_link: Option<String>,
    pub portal_link: Option<String>,
    pub admin_testing_link: Option<String>,
}

/// Rows for every session on `page`, numbered across pages.
pub fn table_rows(page: &TablePage) -> Vec<TableRow> {
    page.items
        .iter()
        .enumerate()
        .map(|(index, session)| table_row(session, page.request.serial_number(index)))
        .collect()
}

pub fn table_row(session: &Session, serial_no: u64) -> TableRow {
    let meta = session.meta_data.as_ref();
    TableRow {
        serial_no,
        id: session.id,
        name: text(session.name.as_deref()),
        batch: text(meta.and_then(|m| m.batch.as_deref()).map(batch_label)),
        group: labelled(GROUP_OPTIONS, meta.and_then(|m| m.group.as_deref())),
        platform: labelled(TEST_PLATFORM_OPTIONS, session.platform.as_deref()),
        start_time: date_time(session.start_time.as_deref()),
        end_time: date_time(session.end_time.as_deref()),
        session_type: labelled(SESSION_TYPE_OPTIONS, session.session_type.as_deref()),
        report_link: link(meta.and_then(|m| m.report_link.as_deref())),
        portal_link: link(session.portal_link.as_deref()),
        admin_testing_link: link(meta.and_then(|m| m.admin_testing_link.as_deref())),
    }
}

/// A label/value pair in the detail view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailItem {
    pub label: &'static str,
    pub value: String,
    pub is_link: bool,
}

impl DetailItem {
    fn text(label: &'static str, value: String) -> Self {
        Self {
            label,
            value,
            is_link: false,
        }
    }

    fn link(label: &'static str, value: Option<&str>) -> Self {
        match link(value) {
            Some(url) => Self {
                label,
                value: url,
                is_link: true,
            },
            None => Self::text(label, NOT_AVAILABLE.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailSection {
    pub title: &'static str,
    pub items: Vec<DetailItem>,
}

/// Grouped details of a session: Basic, Platform, Timeline and Links.
pub fn detail_sections(session: &Session) -> Vec<DetailSection> {
    let empty = MetaData::default();
    let meta = session.meta_data.as_ref().unwrap_or(&empty);

    let basic = vec![
        DetailItem::text("Group", labelled(GROUP_OPTIONS, meta.group.as_deref())),
        DetailItem::text("Batch", text(meta.batch.as_deref().map(batch_label))),
        DetailItem::text("Grade", text(meta.grade.map(|g| g.to_string()).as_deref())),
        DetailItem::text(
            "Session Type",
            labelled(SESSION_TYPE_OPTIONS, session.session_type.as_deref()),
        ),
        DetailItem::text("Auth Type", labelled(AUTH_OPTIONS, session.auth_type.as_deref())),
        DetailItem::text(
            "Platform",
            labelled(TEST_PLATFORM_OPTIONS, session.platform.as_deref()),
        ),
        DetailItem::text("Sign Up Form", flag(session.signup_form)),
        DetailItem::text("Popup Form", flag(session.popup_form)),
        DetailItem::text(
            "No Of Fields In Popup",
            text(meta.popup_field_count().map(|n| n.to_string()).as_deref()),
        ),
        DetailItem::text("Redirection", flag(session.redirection)),
        DetailItem::text("ID Generation", flag(session.id_generation)),
        DetailItem::text("Signup Form Name", text(meta.signup_form_name.as_deref())),
    ];

    let platform = vec![
        DetailItem::link("Platform Link", session.platform_link.as_deref()),
        DetailItem::text("Platform ID", text(session.platform_id.as_deref())),
        DetailItem::link("CMS Test Link", meta.cms_test_id.as_deref()),
        DetailItem::text("Course", labelled(COURSE_OPTIONS, meta.course.as_deref())),
        DetailItem::text("Stream", labelled(STREAM_OPTIONS, meta.stream.as_deref())),
        DetailItem::text(
            "Test Format",
            labelled(TEST_FORMAT_OPTIONS, meta.test_format.as_deref()),
        ),
        DetailItem::text(
            "Test Purpose",
            labelled(TEST_PURPOSE_OPTIONS, meta.test_purpose.as_deref()),
        ),
        DetailItem::text("Test Type", labelled(TEST_TYPE_OPTIONS, meta.test_type.as_deref())),
        DetailItem::text(
            "Gurukul Format Type",
            labelled(GURUKUL_FORMAT_OPTIONS, meta.gurukul_format_type.as_deref()),
        ),
        DetailItem::text(
            "Optional Limits",
            labelled(OPTIONAL_LIMIT_OPTIONS, meta.optional_limits.as_deref()),
        ),
        DetailItem::text("Show Answers", flag(meta.show_answers)),
        DetailItem::text("Show Scores", flag(meta.show_scores)),
    ];

    let timeline = vec![
        DetailItem::text("Name", text(session.name.as_deref())),
        DetailItem::text("Start Time", date_time(session.start_time.as_deref())),
        DetailItem::text("End Time", date_time(session.end_time.as_deref())),
        DetailItem::text("Repeats On", repeat_days(session)),
        DetailItem::text("Active", flag(session.is_active)),
    ];

    let links = vec![
        DetailItem::link("Portal Link", session.portal_link.as_deref()),
        DetailItem::link("Report Link", meta.report_link.as_deref()),
        DetailItem::link("Shortened Link", meta.shortened_link.as_deref()),
        DetailItem::link("Admin Testing Link", meta.admin_testing_link.as_deref()),
    ];

    vec![
        DetailSection {
            title: "Basic",
            items: basic,
        },
        DetailSection {
            title: "Platform",
            items: platform,
        },
        DetailSection {
            title: "Timeline",
            items: timeline,
        },
        DetailSection {
            title: "Links",
            items: links,
        },
    ]
}

/// Human-readable date-time, or the raw value when it does not parse.
pub fn date_time(raw: Option<&str>) -> String {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => parse_date_time(raw)
            .map(|dt| dt.format(DISPLAY_DATE_TIME_FORMAT).to_string())
            .unwrap_or_else(|| raw.to_string()),
        None => NOT_AVAILABLE.to_string(),
    }
}

fn text(value: Option<&str>) -> String {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(NOT_AVAILABLE)
        .to_string()
}

fn labelled(options: &[SelectOption], value: Option<&str>) -> String {
    text(value.map(|v| label_for(options, v)))
}

fn link(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn flag(value: Option<bool>) -> String {
    match value {
        Some(true) => "Yes".to_string(),
        Some(false) => "No".to_string(),
        None => NOT_AVAILABLE.to_string(),
    }
}

fn repeat_days(session: &Session) -> String {
    let days: Vec<&str> = session
        .repeat_schedule
        .iter()
        .flat_map(|s| s.params.iter())
        .filter_map(|day| {
            let day = day.to_string();
            WEEKDAY_OPTIONS
                .iter()
                .find(|o| o.value == day)
                .map(|o| o.label)
        })
        .collect();
    if days.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        days.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::pagination::PageRequest;
    use quizdesk_protocol::RepeatSchedule;

    fn session() -> Session {
        Session {
            id: Some(5),
            name: Some("Unit Test 3".to_string()),
            platform: Some("meet".to_string()),
            platform_link: Some("https://meet.example/xyz".to_string()),
            session_type: Some("sign-in".to_string()),
            start_time: Some("2024-05-01T14:05:00".to_string()),
            end_time: Some(String::new()),
            signup_form: Some(true),
            repeat_schedule: Some(RepeatSchedule::weekly(vec![1, 7])),
            meta_data: Some(MetaData {
                group: Some("DelhiStudents".to_string()),
                batch: Some("DL-12-Eng-24".to_string()),
                report_link: Some("  ".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn item<'a>(sections: &'a [DetailSection], title: &str, label: &str) -> &'a DetailItem {
        sections
            .iter()
            .find(|s| s.title == title)
            .and_then(|s| s.items.iter().find(|i| i.label == label))
            .unwrap()
    }

    #[test]
    fn test_table_row_projection() {
        let row = table_row(&session(), 26);
        assert_eq!(row.serial_no, 26);
        assert_eq!(row.batch, "Delhi 12 Engineering 24");
        assert_eq!(row.group, "Delhi Students");
        assert_eq!(row.platform, "Google Meet");
        assert_eq!(row.session_type, "Sign In");
        assert_eq!(row.start_time, "01 May 2024, 02:05 PM");
        assert_eq!(row.end_time, NOT_AVAILABLE);
        assert_eq!(row.report_link, None);
    }

    #[test]
    fn test_table_rows_number_across_pages() {
        let page = TablePage::from_fetched(vec![session(), session()], PageRequest::new(1, 10));
        let serials: Vec<_> = table_rows(&page).iter().map(|r| r.serial_no).collect();
        assert_eq!(serials, vec![11, 12]);
    }

    #[test]
    fn test_detail_sections() {
        let sections = detail_sections(&session());
        let titles: Vec<_> = sections.iter().map(|s| s.title).collect();
        assert_eq!(titles, vec!["Basic", "Platform", "Timeline", "Links"]);

        assert_eq!(item(&sections, "Basic", "Sign Up Form").value, "Yes");
        assert_eq!(item(&sections, "Basic", "Grade").value, NOT_AVAILABLE);
        assert_eq!(item(&sections, "Timeline", "Repeats On").value, "Monday, Sunday");

        let platform_link = item(&sections, "Platform", "Platform Link");
        assert!(platform_link.is_link);
        assert_eq!(platform_link.value, "https://meet.example/xyz");

        let report = item(&sections, "Links", "Report Link");
        assert!(!report.is_link);
        assert_eq!(report.value, NOT_AVAILABLE);
    }

    #[test]
    fn test_unparsable_date_is_shown_raw() {
        assert_eq!(date_time(Some("next week")), "next week");
        assert_eq!(date_time(None), NOT_AVAILABLE);
    }
}
