//! Storefront page and its form actions.
//!
//! Every action answers `303 See Other` back to `/`. Requests without a live
//! session are sent to `/`, which mounts a fresh one.

use axum::{
    extract::{Multipart, Path, State},
    http::{header, HeaderMap},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;

use super::current_session;
use crate::editor::{ListingForm, PhotoUpload};
use crate::errors::AppError;
use crate::models::Condition;
use crate::session::{session_cookie, Notice, SessionHandle};
use crate::view;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub code: String,
}

#[derive(Debug, Deserialize)]
pub struct ConfirmForm {
    #[serde(default)]
    pub answer: String,
}

fn back() -> Redirect {
    Redirect::to("/")
}

async fn render(state: &AppState, session: &SessionHandle) -> Html<String> {
    let mut session_state = session.lock().await;
    let notice = session_state.take_notice();
    Html(view::render_page(
        &session_state,
        notice.as_ref(),
        &state.storefront,
    ))
}

/// GET / - Render the storefront, mounting a new session when needed.
pub async fn index(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(session) = current_session(&state, &headers).await {
        return render(&state, &session).await.into_response();
    }

    let (id, session) = state.sessions.create().await;
    tracing::debug!(session = %id, "Session mounted");
    // A failed first load shows up as the retry banner.
    let _ = state.storefront.load(&session).await;

    let page = render(&state, &session).await;
    ([(header::SET_COOKIE, session_cookie(id))], page).into_response()
}

/// POST /search - Set the search string.
pub async fn search(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<SearchForm>,
) -> Redirect {
    if let Some(session) = current_session(&state, &headers).await {
        state.storefront.set_search(&session, &form.q).await;
    }
    back()
}

/// POST /theme
pub async fn toggle_theme(State(state): State<AppState>, headers: HeaderMap) -> Redirect {
    if let Some(session) = current_session(&state, &headers).await {
        state.storefront.toggle_theme(&session).await;
    }
    back()
}

/// POST /menu
pub async fn toggle_menu(State(state): State<AppState>, headers: HeaderMap) -> Redirect {
    if let Some(session) = current_session(&state, &headers).await {
        state.storefront.toggle_menu(&session).await;
    }
    back()
}

/// POST /refresh - Retry loading the inventory.
pub async fn refresh(State(state): State<AppState>, headers: HeaderMap) -> Redirect {
    if let Some(session) = current_session(&state, &headers).await {
        let _ = state.storefront.load(&session).await;
    }
    back()
}

/// POST /modal/close
pub async fn close_modal(State(state): State<AppState>, headers: HeaderMap) -> Redirect {
    if let Some(session) = current_session(&state, &headers).await {
        state.storefront.close_modal(&session).await;
    }
    back()
}

/// POST /admin - Open the passcode prompt.
pub async fn open_login(State(state): State<AppState>, headers: HeaderMap) -> Redirect {
    if let Some(session) = current_session(&state, &headers).await {
        state.storefront.open_login(&session).await;
    }
    back()
}

/// POST /admin/login
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<LoginForm>,
) -> Redirect {
    if let Some(session) = current_session(&state, &headers).await {
        state.storefront.attempt_login(&session, &form.code).await;
    }
    back()
}

/// POST /admin/logout
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Redirect {
    if let Some(session) = current_session(&state, &headers).await {
        state.storefront.logout(&session).await;
    }
    back()
}

/// POST /listings/new - Open the editor.
pub async fn open_editor(State(state): State<AppState>, headers: HeaderMap) -> Redirect {
    if let Some(session) = current_session(&state, &headers).await {
        let _ = state.storefront.open_editor(&session).await;
    }
    back()
}

/// POST /listings/photo - Pick the photo for the editor.
pub async fn select_photo(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Redirect {
    let Some(session) = current_session(&state, &headers).await else {
        return back();
    };

    match read_listing_upload(multipart).await {
        Ok(ListingUpload { photo: Some(photo), .. }) => {
            let _ = state.storefront.select_photo(&session, photo).await;
        }
        Ok(_) => {}
        Err(err) => report_unreadable_upload(&session, &err).await,
    }
    back()
}

/// POST /listings - Publish a new listing.
pub async fn create_listing(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Redirect {
    let Some(session) = current_session(&state, &headers).await else {
        return back();
    };

    match read_listing_upload(multipart).await {
        Ok(upload) => {
            // Failures are reported to the page as notices.
            let _ = state
                .storefront
                .submit(&session, upload.form, upload.photo)
                .await;
        }
        Err(err) => report_unreadable_upload(&session, &err).await,
    }
    back()
}

/// A body that could not be read (too large, truncated) leaves the editor as it was.
async fn report_unreadable_upload(session: &SessionHandle, err: &AppError) {
    tracing::warn!(error = %err, "Rejected listing upload");
    session
        .lock()
        .await
        .notify(Notice::error(format!("Upload Error: {}", err.message())));
}

/// POST /listings/{id}/view - Open the photo viewer.
pub async fn view_listing(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Redirect {
    if let Some(session) = current_session(&state, &headers).await {
        if let Err(e) = state.storefront.open_viewer(&session, id).await {
            tracing::debug!(id, error = %e, "Viewer not opened");
        }
    }
    back()
}

/// POST /listings/{id}/delete - Ask for confirmation.
pub async fn request_delete(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Redirect {
    if let Some(session) = current_session(&state, &headers).await {
        let _ = state.storefront.request_delete(&session, id).await;
    }
    back()
}

/// POST /listings/{id}/delete/confirm - `answer=yes` removes the listing.
pub async fn confirm_delete(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Form(form): Form<ConfirmForm>,
) -> Redirect {
    if let Some(session) = current_session(&state, &headers).await {
        let confirmed = form.answer.eq_ignore_ascii_case("yes");
        let _ = state.storefront.confirm_delete(&session, id, confirmed).await;
    }
    back()
}

/// Fields of the editor's multipart forms.
#[derive(Debug, Default)]
struct ListingUpload {
    form: ListingForm,
    photo: Option<PhotoUpload>,
}

async fn read_listing_upload(mut multipart: Multipart) -> Result<ListingUpload, AppError> {
    let mut upload = ListingUpload::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Malformed form data: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == "photo" {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let content_type = field
                .content_type()
                .filter(|ct| !ct.is_empty())
                .unwrap_or("application/octet-stream")
                .to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(format!("Failed to read photo: {}", e)))?;

            // An empty file input still sends a part.
            if !bytes.is_empty() {
                upload.photo = Some(PhotoUpload {
                    file_name,
                    content_type,
                    bytes,
                });
            }
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read {}: {}", name, e)))?;

        match name.as_str() {
            "name" => upload.form.name = value,
            "year" => upload.form.year = value,
            "price" => upload.form.price = value,
            "condition" => upload.form.condition = Condition::parse(&value),
            other => tracing::debug!(field = other, "Ignoring unknown form field"),
        }
    }

    Ok(upload)
}
