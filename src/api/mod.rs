//! HTTP handlers.
//!
//! The page routes drive a per-browser session and always redirect back to
//! `/`; the JSON routes read straight from the remote service.

mod listings;
mod pages;

pub use listings::*;
pub use pages::*;

use axum::{
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::session::{session_id_from_cookies, SessionHandle};
use crate::AppState;

/// Largest request body accepted by the page routes (photo uploads).
pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Success response envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Response type that can be either success or error.
pub type ApiResult<T> = Result<ApiResponse<T>, crate::errors::AppError>;

/// Look up the session named by the request's cookie, if it is still live.
async fn current_session(state: &AppState, headers: &HeaderMap) -> Option<SessionHandle> {
    let id = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(session_id_from_cookies)?;
    state.sessions.get(id).await
}
