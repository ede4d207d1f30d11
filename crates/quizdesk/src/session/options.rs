//! Drop-down option lists and per-group defaults.

use serde::Serialize;

/// A selectable value and its display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
}

const fn opt(value: &'static str, label: &'static str) -> SelectOption {
    SelectOption { value, label }
}

/// A batch, scoped to the group that runs it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BatchOption {
    pub value: &'static str,
    pub label: &'static str,
    pub group: &'static str,
}

const fn batch(value: &'static str, label: &'static str, group: &'static str) -> BatchOption {
    BatchOption {
        value,
        label,
        group,
    }
}

pub const GROUP_OPTIONS: &[SelectOption] = &[
    opt("EnableStudents", "Enable Students"),
    opt("HaryanaStudents", "Haryana Students"),
    opt("DelhiStudents", "Delhi Students"),
    opt("PunjabStudents", "Punjab Students"),
    opt("UttarakhandStudents", "Uttarakhand Students"),
];

pub const BATCH_OPTIONS: &[BatchOption] = &[
    batch("EN-11-Photon-Eng-24", "EN 11 Photon Engineering 24", "EnableStudents"),
    batch("EN-12-Photon-Eng-24", "EN 12 Photon Engineering 24", "EnableStudents"),
    batch("EN-11-Photon-Med-24", "EN 11 Photon Medical 24", "EnableStudents"),
    batch("EN-12-Photon-Med-24", "EN 12 Photon Medical 24", "EnableStudents"),
    batch("HR-11-Eng-24", "Haryana 11 Engineering 24", "HaryanaStudents"),
    batch("HR-12-Eng-24", "Haryana 12 Engineering 24", "HaryanaStudents"),
    batch("HR-11-Med-24", "Haryana 11 Medical 24", "HaryanaStudents"),
    batch("DL-11-Eng-24", "Delhi 11 Engineering 24", "DelhiStudents"),
    batch("DL-12-Eng-24", "Delhi 12 Engineering 24", "DelhiStudents"),
    batch("PB-11-Med-24", "Punjab 11 Medical 24", "PunjabStudents"),
    batch("PB-12-Med-24", "Punjab 12 Medical 24", "PunjabStudents"),
    batch("UK-11-Eng-24", "Uttarakhand 11 Engineering 24", "UttarakhandStudents"),
];

pub const GRADE_OPTIONS: &[SelectOption] = &[
    opt("9", "9"),
    opt("10", "10"),
    opt("11", "11"),
    opt("12", "12"),
];

pub const SESSION_TYPE_OPTIONS: &[SelectOption] = &[
    opt("quiz", "Quiz"),
    opt("sign-in", "Sign In"),
    opt("live-class", "Live Class"),
];

pub const AUTH_OPTIONS: &[SelectOption] = &[
    opt("ID", "Student ID"),
    opt("DOB", "Student ID + Date of Birth"),
    opt("PH", "Phone Number"),
    opt("NA", "No Authentication"),
];

pub const TEST_PLATFORM_OPTIONS: &[SelectOption] = &[
    opt("quiz", "AF Quiz"),
    opt("meet", "Google Meet"),
    opt("youtube", "YouTube"),
    opt("plio", "Plio"),
    opt("others", "Others"),
];

pub const COURSE_OPTIONS: &[SelectOption] = &[
    opt("JEE", "JEE"),
    opt("NEET", "NEET"),
    opt("CUET", "CUET"),
    opt("Foundation", "Foundation"),
    opt("Catalyst", "Catalyst"),
];

pub const STREAM_OPTIONS: &[SelectOption] = &[
    opt("engineering", "Engineering"),
    opt("medical", "Medical"),
    opt("pcmb", "PCMB"),
    opt("foundation", "Foundation"),
    opt("maths", "Maths"),
    opt("science", "Science"),
];

pub const TEST_FORMAT_OPTIONS: &[SelectOption] = &[
    opt("part_test", "Part Test"),
    opt("major_test", "Major Test"),
    opt("chapter_test", "Chapter Test"),
    opt("full_syllabus_test", "Full Syllabus Test"),
    opt("mock_test", "Mock Test"),
    opt("hiring_test", "Hiring Test"),
    opt("evaluation_test", "Evaluation Test"),
    opt("homework", "Homework"),
];

pub const TEST_PURPOSE_OPTIONS: &[SelectOption] = &[
    opt("baseline", "Baseline"),
    opt("endline", "Endline"),
    opt("weekly_test", "Weekly Test"),
    opt("monthly_test", "Monthly Test"),
    opt("reshuffle_test", "Reshuffle Test"),
    opt("selection_test", "Selection Test"),
    opt("one_time", "One Time"),
];

pub const TEST_TYPE_OPTIONS: &[SelectOption] = &[
    opt("assessment", "Assessment"),
    opt("homework", "Homework"),
    opt("form", "Form"),
    opt("omr-assessment", "OMR Assessment"),
];

pub const GURUKUL_FORMAT_OPTIONS: &[SelectOption] = &[
    opt("qa", "Question & Answers"),
    opt("omr", "OMR"),
    opt("both", "Both"),
];

pub const OPTIONAL_LIMIT_OPTIONS: &[SelectOption] = &[
    opt("N/A", "N/A"),
    opt("JEE", "JEE"),
    opt("NEET", "NEET"),
    opt("CUET", "CUET"),
];

/// ISO weekday numbers.
pub const WEEKDAY_OPTIONS: &[SelectOption] = &[
    opt("1", "Monday"),
    opt("2", "Tuesday"),
    opt("3", "Wednesday"),
    opt("4", "Thursday"),
    opt("5", "Friday"),
    opt("6", "Saturday"),
    opt("7", "Sunday"),
];

/// Switch and auth presets applied when a group is chosen for a new session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GroupDefaults {
    pub group: &'static str,
    pub auth_type: &'static str,
    pub signup_form: bool,
    pub popup_form: bool,
    pub redirection: bool,
    pub id_generation: bool,
}

pub const GROUP_DEFAULTS: &[GroupDefaults] = &[
    GroupDefaults {
        group: "EnableStudents",
        auth_type: "ID",
        signup_form: true,
        popup_form: false,
        redirection: true,
        id_generation: false,
    },
    GroupDefaults {
        group: "HaryanaStudents",
        auth_type: "DOB",
        signup_form: true,
        popup_form: true,
        redirection: true,
        id_generation: true,
    },
    GroupDefaults {
        group: "DelhiStudents",
        auth_type: "ID",
        signup_form: false,
        popup_form: false,
        redirection: true,
        id_generation: false,
    },
    GroupDefaults {
        group: "PunjabStudents",
        auth_type: "DOB",
        signup_form: true,
        popup_form: true,
        redirection: true,
        id_generation: true,
    },
    GroupDefaults {
        group: "UttarakhandStudents",
        auth_type: "ID",
        signup_form: false,
        popup_form: false,
        redirection: false,
        id_generation: false,
    },
];

pub fn group_defaults(group: &str) -> Option<&'static GroupDefaults> {
    GROUP_DEFAULTS.iter().find(|d| d.group == group)
}

pub fn contains(options: &[SelectOption], value: &str) -> bool {
    options.iter().any(|o| o.value == value)
}

/// Display label for `value`, or the value itself when it is not listed.
pub fn label_for<'a>(options: &[SelectOption], value: &'a str) -> &'a str {
    options
        .iter()
        .find(|o| o.value == value)
        .map_or(value, |o| o.label)
}

pub fn batches_for(group: &str) -> impl Iterator<Item = &'static BatchOption> + '_ {
    BATCH_OPTIONS.iter().filter(move |b| b.group == group)
}

pub fn batch_in_group(batch: &str, group: &str) -> bool {
    batches_for(group).any(|b| b.value == batch)
}

pub fn batch_label(value: &str) -> &str {
    BATCH_OPTIONS
        .iter()
        .find(|b| b.value == value)
        .map_or(value, |b| b.label)
}

/// Every option list, keyed by name. Served to clients that render their own
/// forms.
#[derive(Debug, Clone, Serialize)]
pub struct OptionCatalog {
    pub groups: &'static [SelectOption],
    pub batches: &'static [BatchOption],
    pub grades: &'static [SelectOption],
    pub session_types: &'static [SelectOption],
    pub auth_types: &'static [SelectOption],
    pub platforms: &'static [SelectOption],
    pub courses: &'static [SelectOption],
    pub streams: &'static [SelectOption],
    pub test_formats: &'static [SelectOption],
    pub test_purposes: &'static [SelectOption],
    pub test_types: &'static [SelectOption],
    pub gurukul_formats: &'static [SelectOption],
    pub optional_limits: &'static [SelectOption],
    pub weekdays: &'static [SelectOption],
    pub group_defaults: &'static [GroupDefaults],
    pub page_sizes: &'static [u32],
}

pub fn catalog() -> OptionCatalog {
    OptionCatalog {
        groups: GROUP_OPTIONS,
        batches: BATCH_OPTIONS,
        grades: GRADE_OPTIONS,
        session_types: SESSION_TYPE_OPTIONS,
        auth_types: AUTH_OPTIONS,
        platforms: TEST_PLATFORM_OPTIONS,
        courses: COURSE_OPTIONS,
        streams: STREAM_OPTIONS,
        test_formats: TEST_FORMAT_OPTIONS,
        test_purposes: TEST_PURPOSE_OPTIONS,
        test_types: TEST_TYPE_OPTIONS,
        gurukul_formats: GURUKUL_FORMAT_OPTIONS,
        optional_limits: OPTIONAL_LIMIT_OPTIONS,
        weekdays: WEEKDAY_OPTIONS,
        group_defaults: GROUP_DEFAULTS,
        page_sizes: &super::pagination::PAGE_SIZE_OPTIONS,
    }
}
