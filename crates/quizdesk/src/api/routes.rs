//! Route definitions.

use axum::{Router, routing::get};
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use super::handlers;
use super::pages;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    let pages = Router::new()
        .route("/", get(pages::all_sessions))
        .route("/live", get(pages::live_sessions))
        .route("/sessions/{id}", get(pages::session_detail))
        .route("/session/{kind}", get(pages::start_wizard))
        .route(
            "/session/{kind}/{draft}/{step}",
            get(pages::show_step).post(pages::submit_wizard_step),
        );

    let api = Router::new()
        .route(
            "/sessions",
            get(handlers::list_sessions).post(handlers::create_session),
        )
        .route(
            "/sessions/{id}",
            get(handlers::get_session).patch(handlers::patch_session),
        )
        .route("/sessions/{id}/duplicate", get(handlers::duplicate_session))
        .route("/options", get(handlers::options));

    Router::new()
        .route("/health", get(handlers::health))
        .merge(pages)
        .nest("/api", api)
        .fallback(pages::not_found)
        .with_state(state)
        .layer(trace_layer)
}
