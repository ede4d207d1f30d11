//! Server-rendered HTML.
//!
//! Templates are compiled into the binary and rendered with minijinja. The
//! view models here are plain serializable structs built by the page
//! handlers.

use minijinja::Environment;
use serde::Serialize;

use crate::session::display::{DetailSection, TableRow};
use crate::session::form::FieldView;

const TEMPLATES: &[(&str, &str)] = &[
    ("layout.html", include_str!("../templates/layout.html")),
    ("table.html", include_str!("../templates/table.html")),
    ("detail.html", include_str!("../templates/detail.html")),
    ("wizard.html", include_str!("../templates/wizard.html")),
    ("error.html", include_str!("../templates/error.html")),
];

#[derive(Debug, Serialize)]
pub struct TableView {
    pub title: &'static str,
    pub path: &'static str,
    pub rows: Vec<TableRow>,
    /// One-based, for display.
    pub page_number: u32,
    pub page_count: u32,
    pub per_page: u32,
    pub page_sizes: &'static [u32],
    pub previous_href: Option<String>,
    pub next_href: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DetailView {
    pub id: i64,
    pub title: String,
    pub sections: Vec<DetailSection>,
}

#[derive(Debug, Serialize)]
pub struct StepLink {
    pub title: &'static str,
    pub href: String,
    pub current: bool,
    pub reachable: bool,
}

#[derive(Debug, Serialize)]
pub struct WizardView {
    pub title: &'static str,
    pub steps: Vec<StepLink>,
    pub fields: Vec<FieldView>,
    pub action: String,
    pub back_href: Option<String>,
    pub is_last: bool,
    /// Offer the group-defaults button (Basic step, identity unlocked).
    pub group_defaults: bool,
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorView {
    pub status: u16,
    pub title: String,
    pub message: String,
}

/// Compiled template set.
pub struct Views {
    env: Environment<'static>,
}

impl Views {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        for (name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }
        Ok(Self { env })
    }

    fn render<S: Serialize>(&self, name: &str, ctx: S) -> Result<String, minijinja::Error> {
        self.env.get_template(name)?.render(ctx)
    }

    pub fn table(&self, view: &TableView) -> Result<String, minijinja::Error> {
        self.render("table.html", view)
    }

    pub fn detail(&self, view: &DetailView) -> Result<String, minijinja::Error> {
        self.render("detail.html", view)
    }

    pub fn wizard(&self, view: &WizardView) -> Result<String, minijinja::Error> {
        self.render("wizard.html", view)
    }

    pub fn error(&self, view: &ErrorView) -> Result<String, minijinja::Error> {
        self.render("error.html", view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::display::DetailItem;

    #[test]
    fn test_all_templates_compile() {
        let views = Views::new().unwrap();
        for (name, _) in TEMPLATES {
            assert!(views.env.get_template(name).is_ok(), "{name}");
        }
    }

    #[test]
    fn test_detail_escapes_values() {
        let views = Views::new().unwrap();
        let html = views
            .detail(&DetailView {
                id: 1,
                title: "<script>".to_string(),
                sections: vec![DetailSection {
                    title: "Links",
                    items: vec![DetailItem {
                        label: "Portal Link",
                        value: "https://portal.example/1".to_string(),
                        is_link: true,
                    }],
                }],
            })
            .unwrap();
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("<a href="));
        assert!(html.contains("portal.example"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_error_page() {
        let views = Views::new().unwrap();
        let html = views
            .error(&ErrorView {
                status: 404,
                title: "Not Found".to_string(),
                message: "Session 9 was not found".to_string(),
            })
            .unwrap();
        assert!(html.contains("404 · Not Found"));
        assert!(html.contains("Session 9 was not found"));
    }
}
