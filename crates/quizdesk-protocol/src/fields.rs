//! Field lists applied before a session is resubmitted.
//!
//! Paths are dotted: `meta_data.report_link` addresses `report_link` inside
//! the `meta_data` object.

use serde_json::Value;

/// Removed before a session is duplicated, so the copy gets fresh identity,
/// schedule and generated links.
pub const DUPLICATE_STRIPPED_FIELDS: &[&str] = &[
    "end_time",
    "start_time",
    "name",
    "id",
    "portal_link",
    "signup_form_id",
    "owner_id",
    "session_id",
    "platform_link",
    "platform_id",
    "created_by_id",
    "inserted_at",
    "updated_at",
    "popup_form_id",
    "meta_data.date_created",
    "meta_data.admin_testing_link",
    "meta_data.cms_test_id",
    "meta_data.test_type",
    "meta_data.report_link",
    "meta_data.shortened_link",
    "meta_data.has_synced_to_bq",
];

/// Removed before a patch is published; the API does not accept updates to
/// these.
pub const UPDATE_STRIPPED_FIELDS: &[&str] = &[
    "created_by_id",
    "inserted_at",
    "updated_at",
    "id",
    "owner_id",
    "portal_link",
    "purpose",
    "platform",
    "platform_link",
    "platform_id",
];

/// Remove each dotted path from `value`. Paths that do not resolve to an
/// object member are ignored.
pub fn strip_fields(value: &mut Value, paths: &[&str]) {
    for path in paths {
        remove_path(value, path);
    }
}

fn remove_path(value: &mut Value, path: &str) {
    match path.split_once('.') {
        Some((head, rest)) => {
            if let Some(child) = value.get_mut(head) {
                remove_path(child, rest);
            }
        }
        None => {
            if let Value::Object(map) = value {
                map.remove(path);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strip_top_level_and_nested() {
        let mut value = json!({
            "id": 1,
            "name": "x",
            "meta_data": {"report_link": "r", "batch": "b"}
        });
        strip_fields(&mut value, &["id", "meta_data.report_link"]);
        assert_eq!(value, json!({"name": "x", "meta_data": {"batch": "b"}}));
    }

    #[test]
    fn test_strip_ignores_missing_and_non_object_paths() {
        let mut value = json!({"meta_data": null, "name": "x"});
        strip_fields(&mut value, &["meta_data.report_link", "absent", "name.inner"]);
        assert_eq!(value, json!({"meta_data": null, "name": "x"}));
    }

    #[test]
    fn test_duplicate_list_keeps_configuration() {
        let mut value = json!({
            "id": 9,
            "name": "Mock Test",
            "start_time": "2024-01-01T09:00:00",
            "end_time": "2024-01-01T11:00:00",
            "session_id": "abc",
            "portal_link": "p",
            "platform": "quiz",
            "auth_type": "ID",
            "type": "quiz",
            "meta_data": {
                "batch": "EN-11",
                "group": "EnableStudents",
                "cms_test_id": "https://cms/test/1",
                "test_type": "assessment",
                "report_link": "r",
                "shortened_link": "s",
                "admin_testing_link": "a",
                "date_created": "2024-01-01",
                "has_synced_to_bq": true
            }
        });
        strip_fields(&mut value, DUPLICATE_STRIPPED_FIELDS);
        assert_eq!(
            value,
            json!({
                "platform": "quiz",
                "auth_type": "ID",
                "type": "quiz",
                "meta_data": {"batch": "EN-11", "group": "EnableStudents"}
            })
        );
    }

    #[test]
    fn test_update_list_keeps_schedule_and_metadata() {
        let mut value = json!({
            "id": 9,
            "owner_id": 3,
            "created_by_id": 3,
            "inserted_at": "t",
            "updated_at": "t",
            "portal_link": "p",
            "purpose": {"type": "attendance", "params": "quiz"},
            "platform": "quiz",
            "platform_link": "l",
            "platform_id": "pid",
            "name": "Mock Test",
            "end_time": "2024-01-01T11:00:00",
            "meta_data": {"report_link": "r"}
        });
        strip_fields(&mut value, UPDATE_STRIPPED_FIELDS);
        assert_eq!(
            value,
            json!({
                "name": "Mock Test",
                "end_time": "2024-01-01T11:00:00",
                "meta_data": {"report_link": "r"}
            })
        );
    }
}
