//! Storefront operations applied to one session.
//!
//! Session locks are only held for state transitions. Remote calls happen
//! with the lock released, so a slow delete never stalls a search.

use std::time::Duration;

use chrono::Utc;

use crate::auth::{AdminGate, INVALID_PASSCODE};
use crate::contact::ContactDispatcher;
use crate::editor::{ListingEditor, ListingForm, PhotoUpload};
use crate::errors::AppError;
use crate::models::Listing;
use crate::remote::RemoteDataService;
use crate::session::{Modal, Notice, SessionHandle, SessionState};

/// Notice shown when a visitor session tries a dealer action.
pub const DEALER_ACCESS_REQUIRED: &str = "Dealer access required";

/// What became of a delete confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The dealer answered "no".
    Cancelled,
    /// A delete for the same id is still outstanding; nothing was sent.
    AlreadyInFlight,
    Deleted,
    /// The service refused; the listing stays visible.
    Failed,
}

pub struct Storefront {
    remote: RemoteDataService,
    gate: AdminGate,
    contact: ContactDispatcher,
    verify_delay: Duration,
}

impl Storefront {
    pub fn new(remote: RemoteDataService, gate: AdminGate, contact: ContactDispatcher) -> Self {
        Self {
            remote,
            gate,
            contact,
            verify_delay: Duration::ZERO,
        }
    }

    /// Hold login attempts in the "verifying" state for `delay`.
    pub fn with_verify_delay(mut self, delay: Duration) -> Self {
        self.verify_delay = delay;
        self
    }

    pub fn remote(&self) -> &RemoteDataService {
        &self.remote
    }

    // ==================== INVENTORY ====================

    /// Fetch all listings, newest first, and replace the session's collection.
    ///
    /// On failure the previous collection stays and the error is kept for a
    /// retry banner.
    pub async fn load(&self, session: &SessionHandle) -> Result<usize, AppError> {
        let ticket = session.lock().await.inventory.issue_ticket();
        let result = self.remote.table.list_newest_first().await;

        let mut state = session.lock().await;
        match result {
            Ok(listings) => {
                let count = listings.len();
                if state.inventory.apply(ticket, listings) {
                    tracing::debug!(count, "Inventory loaded");
                }
                Ok(count)
            }
            Err(err) => {
                tracing::warn!(error = %err, "Failed to load inventory; keeping previous listings");
                state.inventory.apply_failure(ticket, err.message());
                Err(err)
            }
        }
    }

    pub async fn set_search(&self, session: &SessionHandle, query: &str) {
        session.lock().await.search = query.to_string();
    }

    // ==================== ADMIN GATE ====================

    pub async fn open_login(&self, session: &SessionHandle) {
        let mut state = session.lock().await;
        state.modal = Modal::AdminLogin;
        state.mobile_menu = false;
    }

    /// Check a passcode and grant dealer access for this session on a match.
    pub async fn attempt_login(&self, session: &SessionHandle, code: &str) -> bool {
        {
            let mut state = session.lock().await;
            if state.in_flight.verifying {
                return false;
            }
            state.in_flight.verifying = true;
        }

        if !self.verify_delay.is_zero() {
            tokio::time::sleep(self.verify_delay).await;
        }
        let granted = self.gate.verify(code);

        let mut state = session.lock().await;
        state.in_flight.verifying = false;
        if granted {
            tracing::info!("Dealer access granted");
            state.admin = true;
            if state.modal == Modal::AdminLogin {
                state.modal = Modal::None;
            }
            state.mobile_menu = false;
        } else {
            tracing::warn!("Rejected dealer passcode");
            state.notify(Notice::error(INVALID_PASSCODE));
        }
        granted
    }

    pub async fn logout(&self, session: &SessionHandle) {
        let mut state = session.lock().await;
        state.admin = false;
        state.mobile_menu = false;
        if matches!(state.modal, Modal::ListingEditor | Modal::ConfirmDelete(_)) {
            state.close_modal();
        }
    }

    // ==================== LISTING EDITOR ====================

    pub async fn open_editor(&self, session: &SessionHandle) -> Result<(), AppError> {
        let mut state = session.lock().await;
        require_admin(&mut state)?;
        state.editor = Some(ListingEditor::new());
        state.modal = Modal::ListingEditor;
        Ok(())
    }

    /// Take a picked photo; the editor moves on to the form.
    pub async fn select_photo(
        &self,
        session: &SessionHandle,
        photo: PhotoUpload,
    ) -> Result<(), AppError> {
        let mut state = session.lock().await;
        require_admin(&mut state)?;
        state
            .editor
            .get_or_insert_with(ListingEditor::new)
            .select_photo(photo);
        state.modal = Modal::ListingEditor;
        Ok(())
    }

    /// Upload the photo (if any), insert the row, then reload and close the editor.
    ///
    /// `photo` replaces the one already picked in the editor. On failure the
    /// editor stays open with `form` kept.
    pub async fn submit(
        &self,
        session: &SessionHandle,
        form: ListingForm,
        photo: Option<PhotoUpload>,
    ) -> Result<(), AppError> {
        let photo = {
            let mut state = session.lock().await;
            require_admin(&mut state)?;
            if state.in_flight.uploading {
                state.notify(Notice::info("Upload already in progress"));
                return Err(AppError::Busy("Upload already in progress".to_string()));
            }
            state.in_flight.uploading = true;
            state.modal = Modal::ListingEditor;

            let editor = state.editor.get_or_insert_with(ListingEditor::new);
            editor.form = form.clone();
            if let Some(photo) = photo {
                editor.select_photo(photo);
            }
            let picked = editor.photo().cloned();
            picked
        };

        let result = self.publish(&form, photo).await;

        {
            let mut state = session.lock().await;
            state.in_flight.uploading = false;
            if let Err(err) = &result {
                let message = match err {
                    AppError::Upload(msg) => format!("Upload Error: {}", msg),
                    other => format!("Database Error: {}", other.message()),
                };
                state.notify(Notice::error(message));
                return result;
            }
        }

        // A failed reload leaves the banner; the listing itself was saved.
        let _ = self.load(session).await;

        let mut state = session.lock().await;
        state.editor = None;
        if state.modal == Modal::ListingEditor {
            state.modal = Modal::None;
        }
        Ok(())
    }

    async fn publish(&self, form: &ListingForm, photo: Option<PhotoUpload>) -> Result<(), AppError> {
        let image_url = match photo {
            Some(photo) => {
                let key = photo.storage_key(Utc::now());
                self.remote
                    .bucket
                    .upload(&key, photo.bytes.clone(), &photo.content_type)
                    .await
                    .map_err(|e| {
                        tracing::warn!(key = %key, error = %e, "Photo upload failed");
                        AppError::Upload(e.message())
                    })?;
                tracing::info!(key = %key, "Photo uploaded");
                self.remote.bucket.public_url(&key)
            }
            None => String::new(),
        };

        self.remote
            .table
            .insert(&form.to_new_listing(image_url))
            .await
            .map_err(|e| {
                tracing::warn!(name = %form.name, error = %e, "Listing insert failed");
                AppError::Database(e.message())
            })?;

        tracing::info!(name = %form.name, "Listing posted");
        Ok(())
    }

    // ==================== DELETION ====================

    /// Ask the dealer to confirm removing `id`.
    pub async fn request_delete(&self, session: &SessionHandle, id: i64) -> Result<(), AppError> {
        let mut state = session.lock().await;
        require_admin(&mut state)?;
        state.modal = Modal::ConfirmDelete(id);
        Ok(())
    }

    /// Act on the dealer's answer to the delete prompt.
    pub async fn confirm_delete(
        &self,
        session: &SessionHandle,
        id: i64,
        confirmed: bool,
    ) -> Result<DeleteOutcome, AppError> {
        {
            let mut state = session.lock().await;
            require_admin(&mut state)?;
            if state.modal == Modal::ConfirmDelete(id) {
                state.modal = Modal::None;
            }
            if !confirmed {
                return Ok(DeleteOutcome::Cancelled);
            }
            if !state.in_flight.begin_delete(id) {
                tracing::debug!(id, "Delete already in flight");
                return Ok(DeleteOutcome::AlreadyInFlight);
            }
        }

        let result = self.remote.table.delete(id).await;
        session.lock().await.in_flight.end_delete(id);

        match result {
            Ok(()) => {
                tracing::info!(id, "Listing deleted");
                let _ = self.load(session).await;
                Ok(DeleteOutcome::Deleted)
            }
            Err(err) => {
                tracing::warn!(id, error = %err, "Listing delete failed");
                Ok(DeleteOutcome::Failed)
            }
        }
    }

    // ==================== PRESENTATION ====================

    pub fn contact_link(&self, listing: &Listing) -> String {
        self.contact.deep_link(listing)
    }

    pub async fn toggle_theme(&self, session: &SessionHandle) {
        let mut state = session.lock().await;
        state.theme = state.theme.toggled();
    }

    pub async fn toggle_menu(&self, session: &SessionHandle) {
        let mut state = session.lock().await;
        state.mobile_menu = !state.mobile_menu;
    }

    /// Open the full-screen viewer on a listing's photo.
    pub async fn open_viewer(&self, session: &SessionHandle, id: i64) -> Result<(), AppError> {
        let mut state = session.lock().await;
        let url = state
            .inventory
            .get(id)
            .map(|l| l.display_image().to_string())
            .ok_or_else(|| AppError::NotFound(format!("Listing {} not found", id)))?;
        state.modal = Modal::ImageViewer(url);
        Ok(())
    }

    pub async fn close_modal(&self, session: &SessionHandle) {
        session.lock().await.close_modal();
    }
}

/// Refuse dealer actions from visitor sessions and tell them why.
fn require_admin(state: &mut SessionState) -> Result<(), AppError> {
    if state.admin {
        return Ok(());
    }
    state.notify(Notice::error(DEALER_ACCESS_REQUIRED));
    Err(AppError::Unauthorized(DEALER_ACCESS_REQUIRED.to_string()))
}

#[cfg(test)]
mod tests;
