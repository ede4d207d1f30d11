//! HTTP surface: server-rendered pages and a small JSON API.

mod error;
mod handlers;
mod pages;
mod routes;
mod state;

pub use error::{ApiError, ApiResult, ErrorResponse};
pub use routes::create_router;
pub use state::{AppState, TableState};
