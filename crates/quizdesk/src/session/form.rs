//! Generic form plumbing for the wizard steps: submitted values in, field
//! descriptions out.

use std::collections::BTreeMap;

use serde::Serialize;

use super::options::{BatchOption, SelectOption};

/// Validation errors keyed by field name.
pub type FieldErrors = BTreeMap<&'static str, String>;

/// Submitted `application/x-www-form-urlencoded` pairs, in order. Repeated
/// keys (multi-selects) are kept.
#[derive(Debug, Clone, Default)]
pub struct FormValues {
    pairs: Vec<(String, String)>,
}

impl FormValues {
    pub fn new(pairs: Vec<(String, String)>) -> Self {
        Self { pairs }
    }

    /// First value for `name`, trimmed; `None` when absent or blank.
    pub fn text(&self, name: &str) -> Option<String> {
        self.pairs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    /// Checkbox state: present with any value other than "false"/"off".
    pub fn checked(&self, name: &str) -> bool {
        self.pairs
            .iter()
            .any(|(k, v)| k == name && !matches!(v.as_str(), "false" | "off" | ""))
    }

    /// Every non-blank value for `name`.
    pub fn all(&self, name: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == name)
            .map(|(_, v)| v.trim())
            .filter(|v| !v.is_empty())
            .collect()
    }
}

impl<const N: usize> From<[(&str, &str); N]> for FormValues {
    fn from(pairs: [(&str, &str); N]) -> Self {
        Self::new(
            pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}

/// Input widget kinds understood by the step template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldKind {
    Select,
    MultiSelect,
    Switch,
    Number,
    Text,
    Url,
    DateTime,
}

/// One option as rendered, with its selection state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionView {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// A field as the template renders it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldView {
    pub name: &'static str,
    pub kind: FieldKind,
    pub label: &'static str,
    pub placeholder: Option<&'static str>,
    pub helper_text: Option<&'static str>,
    pub value: String,
    pub checked: bool,
    pub options: Vec<OptionView>,
    pub disabled: bool,
    pub required: bool,
    pub min: Option<i64>,
    pub step: Option<i64>,
    pub error: Option<String>,
}

impl FieldView {
    fn base(name: &'static str, kind: FieldKind, label: &'static str) -> Self {
        Self {
            name,
            kind,
            label,
            placeholder: None,
            helper_text: None,
            value: String::new(),
            checked: false,
            options: Vec::new(),
            disabled: false,
            required: false,
            min: None,
            step: None,
            error: None,
        }
    }

    pub fn select(
        name: &'static str,
        label: &'static str,
        options: &[SelectOption],
        value: Option<&str>,
    ) -> Self {
        let value = value.unwrap_or_default();
        let mut field = Self::base(name, FieldKind::Select, label);
        field.options = options
            .iter()
            .map(|o| OptionView {
                value: o.value.to_string(),
                label: o.label.to_string(),
                selected: o.value == value,
            })
            .collect();
        keep_unlisted(&mut field.options, value);
        field.value = value.to_string();
        field
    }

    pub fn batch_select(
        name: &'static str,
        label: &'static str,
        options: impl Iterator<Item = &'static BatchOption>,
        value: Option<&str>,
    ) -> Self {
        let value = value.unwrap_or_default();
        let mut field = Self::base(name, FieldKind::Select, label);
        field.options = options
            .map(|b| OptionView {
                value: b.value.to_string(),
                label: b.label.to_string(),
                selected: b.value == value,
            })
            .collect();
        keep_unlisted(&mut field.options, value);
        field.value = value.to_string();
        field
    }

    pub fn multi_select(
        name: &'static str,
        label: &'static str,
        options: &[SelectOption],
        selected: &[String],
    ) -> Self {
        let mut field = Self::base(name, FieldKind::MultiSelect, label);
        field.options = options
            .iter()
            .map(|o| OptionView {
                value: o.value.to_string(),
                label: o.label.to_string(),
                selected: selected.iter().any(|s| s == o.value),
            })
            .collect();
        field
    }

    pub fn switch(name: &'static str, label: &'static str, checked: bool) -> Self {
        let mut field = Self::base(name, FieldKind::Switch, label);
        field.checked = checked;
        field
    }

    pub fn number(name: &'static str, label: &'static str, value: Option<String>) -> Self {
        let mut field = Self::base(name, FieldKind::Number, label);
        field.value = value.unwrap_or_default();
        field
    }

    pub fn text(name: &'static str, label: &'static str, value: Option<&str>) -> Self {
        let mut field = Self::base(name, FieldKind::Text, label);
        field.value = value.unwrap_or_default().to_string();
        field
    }

    pub fn url(name: &'static str, label: &'static str, value: Option<&str>) -> Self {
        let mut field = Self::base(name, FieldKind::Url, label);
        field.value = value.unwrap_or_default().to_string();
        field
    }

    pub fn date_time(name: &'static str, label: &'static str, value: Option<String>) -> Self {
        let mut field = Self::base(name, FieldKind::DateTime, label);
        field.value = value.unwrap_or_default();
        field
    }

    pub fn placeholder(mut self, text: &'static str) -> Self {
        self.placeholder = Some(text);
        self
    }

    pub fn helper(mut self, text: &'static str) -> Self {
        self.helper_text = Some(text);
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn min(mut self, min: i64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn step(mut self, step: i64) -> Self {
        self.step = Some(step);
        self
    }
}

/// A current value missing from the list (e.g. a batch created upstream after
/// this build) stays selectable instead of rendering as blank.
fn keep_unlisted(options: &mut Vec<OptionView>, value: &str) {
    if !value.is_empty() && !options.iter().any(|o| o.value == value) {
        options.push(OptionView {
            value: value.to_string(),
            label: value.to_string(),
            selected: true,
        });
    }
}

/// Attach errors to the fields they belong to.
pub fn attach_errors(fields: &mut [FieldView], errors: &FieldErrors) {
    for field in fields {
        field.error = errors.get(field.name).cloned();
    }
}
