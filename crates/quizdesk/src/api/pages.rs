//! Server-rendered page handlers: session tables, the detail view and the
//! create/edit/duplicate wizard.

use axum::{
    Form,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::session::display::{detail_sections, table_rows};
use crate::session::form::{FieldView, FormValues};
use crate::session::pagination::PAGE_SIZE_OPTIONS;
use crate::session::steps::{StepContext, basic_with_group_defaults, render_step, submit_step};
use crate::session::{Draft, ListScope, PageRequest, Step, TableParams, WizardKind};
use crate::views::{DetailView, ErrorView, StepLink, TableView, WizardView};

use super::state::AppState;

/// Submit intent that re-renders the Basic step with group presets.
const APPLY_GROUP_INTENT: &str = "apply_group";

fn html(state: &AppState, status: StatusCode, rendered: Result<String, minijinja::Error>) -> Response {
    match rendered {
        Ok(body) => (status, Html(body)).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to render page");
            internal_error(state)
        }
    }
}

fn error_page(state: &AppState, status: StatusCode, message: impl Into<String>) -> Response {
    let view = ErrorView {
        status: status.as_u16(),
        title: status.canonical_reason().unwrap_or("Error").to_string(),
        message: message.into(),
    };
    match state.views.error(&view) {
        Ok(body) => (status, Html(body)).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to render error page");
            (status, view.message).into_response()
        }
    }
}

fn internal_error(state: &AppState) -> Response {
    let status = StatusCode::INTERNAL_SERVER_ERROR;
    match state.views.error(&ErrorView {
        status: status.as_u16(),
        title: "Internal Server Error".to_string(),
        message: "Something went wrong while rendering this page.".to_string(),
    }) {
        Ok(body) => (status, Html(body)).into_response(),
        Err(_) => (status, "Internal Server Error").into_response(),
    }
}

/// `GET /`
pub async fn all_sessions(state: State<AppState>, params: Query<TableParams>) -> Response {
    session_table(state, params, ListScope::All).await
}

/// `GET /live`
pub async fn live_sessions(state: State<AppState>, params: Query<TableParams>) -> Response {
    session_table(state, params, ListScope::Live).await
}

#[instrument(skip(state, params))]
async fn session_table(
    State(state): State<AppState>,
    Query(params): Query<TableParams>,
    scope: ListScope,
) -> Response {
    let request = PageRequest::from_params(&params, state.table.default_per_page);
    let page = state.sessions.list_page(scope, request).await;
    let link = |page: u32| format!("{}{}", scope.path(), request.query_for(page));

    let view = TableView {
        title: scope.title(),
        path: scope.path(),
        rows: table_rows(&page),
        page_number: request.page + 1,
        page_count: page.page_count(),
        per_page: request.per_page,
        page_sizes: &PAGE_SIZE_OPTIONS,
        previous_href: page.previous_page().map(link),
        next_href: page.next_page().map(link),
    };
    html(&state, StatusCode::OK, state.views.table(&view))
}

/// `GET /sessions/{id}`
#[instrument(skip(state))]
pub async fn session_detail(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let Ok(id) = id.parse::<i64>() else {
        return error_page(&state, StatusCode::NOT_FOUND, format!("No session with id {id}"));
    };
    let Some(session) = state.sessions.get_session(id).await else {
        return error_page(&state, StatusCode::NOT_FOUND, format!("Session {id} was not found"));
    };

    let view = DetailView {
        id,
        title: session
            .name
            .clone()
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| format!("Session {id}")),
        sections: detail_sections(&session),
    };
    html(&state, StatusCode::OK, state.views.detail(&view))
}

#[derive(Debug, Default, Deserialize)]
pub struct StartParams {
    #[serde(default)]
    pub id: Option<String>,
}

fn step_href(kind: WizardKind, draft_id: &Uuid, step: Step) -> String {
    format!("/session/{}/{}/{}", kind, draft_id, step)
}

/// `GET /session/{kind}?id=`: open a wizard run and go to its first step.
#[instrument(skip(state))]
pub async fn start_wizard(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Query(params): Query<StartParams>,
) -> Response {
    let Ok(kind) = kind.parse::<WizardKind>() else {
        return error_page(&state, StatusCode::NOT_FOUND, format!("Unknown form '{kind}'"));
    };
    let source_id = params.id.as_deref().and_then(|id| id.trim().parse().ok());
    if kind.needs_source() && source_id.is_none() {
        return error_page(
            &state,
            StatusCode::BAD_REQUEST,
            format!("To {kind} a session, pick one from the table first"),
        );
    }

    let Some(draft) = state.sessions.start_draft(kind, source_id).await else {
        return error_page(&state, StatusCode::NOT_FOUND, "That session was not found");
    };
    let draft_id = state.drafts.start(draft);
    Redirect::to(&step_href(kind, &draft_id, Step::Basic)).into_response()
}

/// Resolved `/session/{kind}/{draft}/{step}` path.
struct WizardPath {
    kind: WizardKind,
    draft_id: Uuid,
    step: Step,
    draft: Draft,
}

fn resolve(state: &AppState, (kind, draft, step): (String, String, String)) -> Result<WizardPath, Response> {
    let not_found = |message: &str| error_page(state, StatusCode::NOT_FOUND, message);
    let kind = kind
        .parse::<WizardKind>()
        .map_err(|_| not_found("Unknown form"))?;
    let step = step.parse::<Step>().map_err(|_| not_found("Unknown step"))?;
    let draft_id = Uuid::parse_str(&draft).map_err(|_| not_found("Unknown form"))?;
    let draft = state
        .drafts
        .get(&draft_id)
        .filter(|d| d.kind == kind)
        .ok_or_else(|| not_found("This form has expired. Start again from the session table."))?;
    Ok(WizardPath {
        kind,
        draft_id,
        step,
        draft,
    })
}

fn wizard_page(
    state: &AppState,
    path: &WizardPath,
    status: StatusCode,
    fields: Vec<FieldView>,
    message: Option<String>,
) -> Response {
    let ctx = StepContext::new(path.kind);
    let steps = Step::ALL
        .into_iter()
        .map(|step| StepLink {
            title: step.title(),
            href: step_href(path.kind, &path.draft_id, step),
            current: step == path.step,
            reachable: path.draft.can_open(step),
        })
        .collect();
    let view = WizardView {
        title: path.kind.title(),
        steps,
        fields,
        action: step_href(path.kind, &path.draft_id, path.step),
        back_href: path
            .step
            .previous()
            .map(|previous| step_href(path.kind, &path.draft_id, previous)),
        is_last: path.step.is_last(),
        group_defaults: path.step == Step::Basic && !ctx.locks_identity(),
        message,
    };
    html(state, status, state.views.wizard(&view))
}

/// `GET /session/{kind}/{draft}/{step}`
#[instrument(skip(state))]
pub async fn show_step(
    State(state): State<AppState>,
    Path(segments): Path<(String, String, String)>,
) -> Response {
    let path = match resolve(&state, segments) {
        Ok(path) => path,
        Err(response) => return response,
    };
    if !path.draft.can_open(path.step) {
        let resume = path.draft.resume_step();
        return Redirect::to(&step_href(path.kind, &path.draft_id, resume)).into_response();
    }

    let fields = render_step(path.step, &path.draft.session, &StepContext::new(path.kind));
    wizard_page(&state, &path, StatusCode::OK, fields, None)
}

/// `POST /session/{kind}/{draft}/{step}`
#[instrument(skip(state, form))]
pub async fn submit_wizard_step(
    State(state): State<AppState>,
    Path(segments): Path<(String, String, String)>,
    Form(form): Form<Vec<(String, String)>>,
) -> Response {
    let path = match resolve(&state, segments) {
        Ok(path) => path,
        Err(response) => return response,
    };
    if !path.draft.can_open(path.step) {
        let resume = path.draft.resume_step();
        return Redirect::to(&step_href(path.kind, &path.draft_id, resume)).into_response();
    }

    let ctx = StepContext::new(path.kind);
    let values = FormValues::new(form);

    if path.step == Step::Basic && values.text("intent").as_deref() == Some(APPLY_GROUP_INTENT) {
        let fields = basic_with_group_defaults(&values, &path.draft.session, &ctx);
        return wizard_page(&state, &path, StatusCode::OK, fields, None);
    }

    let mut session = path.draft.session.clone();
    if let Err(fields) = submit_step(path.step, &values, &mut session, &ctx) {
        return wizard_page(
            &state,
            &path,
            StatusCode::UNPROCESSABLE_ENTITY,
            fields,
            Some("Please fix the highlighted fields.".to_string()),
        );
    }

    if !state
        .drafts
        .complete_step(&path.draft_id, path.step, session.clone())
    {
        return error_page(&state, StatusCode::NOT_FOUND, "This form has expired.");
    }

    if let Some(next) = path.step.next() {
        return Redirect::to(&step_href(path.kind, &path.draft_id, next)).into_response();
    }

    let mut finished = path.draft.clone();
    finished.session = session;
    let outcome = state.sessions.submit_draft(&finished).await;
    if outcome.is_success {
        state.drafts.finish(&path.draft_id);
        info!(kind = %path.kind, id = ?outcome.id, "Wizard submitted");
        return Redirect::to("/").into_response();
    }

    warn!(kind = %path.kind, "Wizard submission failed");
    let fields = render_step(path.step, &finished.session, &ctx);
    wizard_page(
        &state,
        &path,
        StatusCode::BAD_GATEWAY,
        fields,
        Some("The session could not be saved. Please try again.".to_string()),
    )
}

/// Fallback for unknown paths.
pub async fn not_found(State(state): State<AppState>) -> Response {
    error_page(&state, StatusCode::NOT_FOUND, "There is nothing at this address.")
}
