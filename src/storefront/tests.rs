//! Storefront behaviour against an in-memory remote service.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Bytes;
use tokio::sync::Notify;

use super::*;
use crate::models::{Condition, NewListing, FALLBACK_IMAGE_URL};
use crate::remote::{ListingTable, ObjectBucket};
use crate::session::{NoticeKind, SessionState};

/// Remote stand-in with failure switches and a call log.
#[derive(Default)]
struct FakeRemote {
    rows: Mutex<Vec<Listing>>,
    calls: Mutex<Vec<String>>,
    fail_list: AtomicBool,
    fail_insert: AtomicBool,
    fail_upload: AtomicBool,
    fail_delete: AtomicBool,
    hold_deletes: Mutex<Option<Arc<Notify>>>,
}

impl FakeRemote {
    fn with_rows(names: &[&str]) -> Arc<Self> {
        let fake = Arc::new(Self::default());
        for name in names {
            fake.push_row(name, "");
        }
        fake
    }

    fn push_row(&self, name: &str, image_url: &str) {
        let mut rows = self.rows.lock().unwrap();
        let id = rows.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        rows.push(Listing {
            id,
            name: name.to_string(),
            price: "1,000,000".to_string(),
            year: Some(2020),
            condition: Condition::Tokunbo,
            image_url: image_url.to_string(),
        });
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn count(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }

    fn log(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ListingTable for FakeRemote {
    async fn list_newest_first(&self) -> Result<Vec<Listing>, AppError> {
        self.log("list".to_string());
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(AppError::Service("connection refused".to_string()));
        }
        let mut rows = self.rows.lock().unwrap().clone();
        rows.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(rows)
    }

    async fn insert(&self, listing: &NewListing) -> Result<(), AppError> {
        self.log(format!("insert {} image={}", listing.name, listing.image_url));
        if self.fail_insert.load(Ordering::SeqCst) {
            return Err(AppError::Database("permission denied for table cars".to_string()));
        }
        self.push_row(&listing.name, &listing.image_url);
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        self.log(format!("delete {}", id));
        let hold = self.hold_deletes.lock().unwrap().clone();
        if let Some(gate) = hold {
            gate.notified().await;
        }
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(AppError::Database("row-level security".to_string()));
        }
        self.rows.lock().unwrap().retain(|r| r.id != id);
        Ok(())
    }
}

#[async_trait]
impl ObjectBucket for FakeRemote {
    async fn upload(&self, key: &str, bytes: Bytes, content_type: &str) -> Result<(), AppError> {
        self.log(format!("upload {} {} {}", key, content_type, bytes.len()));
        if self.fail_upload.load(Ordering::SeqCst) {
            return Err(AppError::Upload("Bucket not found".to_string()));
        }
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("https://cdn.test/car-images/{}", key)
    }
}

fn storefront(fake: &Arc<FakeRemote>) -> Storefront {
    Storefront::new(
        RemoteDataService::new(fake.clone(), fake.clone()),
        AdminGate::new("2026"),
        ContactDispatcher::new("2348079387611"),
    )
}

fn session() -> SessionHandle {
    Arc::new(tokio::sync::Mutex::new(SessionState::default()))
}

async fn admin_session() -> SessionHandle {
    let session = session();
    session.lock().await.admin = true;
    session
}

fn form(name: &str) -> ListingForm {
    ListingForm {
        name: name.to_string(),
        year: "2019".to_string(),
        price: "9,500,000".to_string(),
        condition: Condition::NigerianUsed,
    }
}

fn photo() -> PhotoUpload {
    PhotoUpload {
        file_name: "front view.jpg".to_string(),
        content_type: "image/jpeg".to_string(),
        bytes: Bytes::from_static(b"jpeg"),
    }
}

async fn names(session: &SessionHandle) -> Vec<String> {
    session
        .lock()
        .await
        .inventory
        .listings()
        .iter()
        .map(|l| l.name.clone())
        .collect()
}

// ==================== INVENTORY ====================

#[tokio::test]
async fn test_load_empty_store() {
    let fake = FakeRemote::with_rows(&[]);
    let sf = storefront(&fake);
    let session = session();

    assert_eq!(sf.load(&session).await.unwrap(), 0);

    let mut state = session.lock().await;
    assert!(state.inventory.listings().is_empty());
    assert!(state.inventory.load_error().is_none());
    assert!(state.take_notice().is_none());
}

#[tokio::test]
async fn test_load_newest_first() {
    let fake = FakeRemote::with_rows(&["Camry", "Corolla", "Venza"]);
    let sf = storefront(&fake);
    let session = session();

    sf.load(&session).await.unwrap();

    assert_eq!(names(&session).await, vec!["Venza", "Corolla", "Camry"]);
}

#[tokio::test]
async fn test_load_failure_keeps_previous_listings() {
    let fake = FakeRemote::with_rows(&["Camry"]);
    let sf = storefront(&fake);
    let session = session();
    sf.load(&session).await.unwrap();

    fake.fail_list.store(true, Ordering::SeqCst);
    assert!(sf.load(&session).await.is_err());

    assert_eq!(names(&session).await, vec!["Camry"]);
    let mut state = session.lock().await;
    assert_eq!(state.inventory.load_error(), Some("connection refused"));
    assert!(state.take_notice().is_none());
    drop(state);

    fake.fail_list.store(false, Ordering::SeqCst);
    sf.load(&session).await.unwrap();
    assert!(session.lock().await.inventory.load_error().is_none());
}

// ==================== ADMIN GATE ====================

#[tokio::test]
async fn test_login_with_secret() {
    let fake = FakeRemote::with_rows(&[]);
    let sf = storefront(&fake);
    let session = session();
    sf.open_login(&session).await;

    assert!(sf.attempt_login(&session, "2026").await);

    let mut state = session.lock().await;
    assert!(state.admin);
    assert_eq!(state.modal, Modal::None);
    assert!(!state.in_flight.verifying);
    assert!(state.take_notice().is_none());
}

#[tokio::test]
async fn test_login_with_wrong_code() {
    let fake = FakeRemote::with_rows(&[]);
    let sf = storefront(&fake);
    let session = session();
    sf.open_login(&session).await;

    assert!(!sf.attempt_login(&session, "0000").await);

    let mut state = session.lock().await;
    assert!(!state.admin);
    assert_eq!(state.modal, Modal::AdminLogin);
    let notice = state.take_notice().unwrap();
    assert_eq!(notice.kind, NoticeKind::Error);
    assert_eq!(notice.message, "Invalid Dealer Passcode");
}

#[tokio::test]
async fn test_repeated_wrong_codes_never_lock_out() {
    let fake = FakeRemote::with_rows(&[]);
    let sf = storefront(&fake);
    let session = session();

    for _ in 0..10 {
        assert!(!sf.attempt_login(&session, "1234").await);
    }
    assert!(sf.attempt_login(&session, "2026").await);
}

#[tokio::test]
async fn test_login_ignored_while_verifying() {
    let fake = FakeRemote::with_rows(&[]);
    let sf = Arc::new(storefront(&fake).with_verify_delay(std::time::Duration::from_millis(50)));
    let session = session();

    let first = {
        let sf = sf.clone();
        let session = session.clone();
        tokio::spawn(async move { sf.attempt_login(&session, "2026").await })
    };
    while !session.lock().await.in_flight.verifying {
        tokio::task::yield_now().await;
    }

    assert!(!sf.attempt_login(&session, "2026").await);
    assert!(first.await.unwrap());
    assert!(session.lock().await.admin);
}

#[tokio::test]
async fn test_logout() {
    let fake = FakeRemote::with_rows(&[]);
    let sf = storefront(&fake);
    let session = admin_session().await;
    sf.open_editor(&session).await.unwrap();

    sf.logout(&session).await;

    let state = session.lock().await;
    assert!(!state.admin);
    assert_eq!(state.modal, Modal::None);
    assert!(state.editor.is_none());
}

// ==================== LISTING EDITOR ====================

#[tokio::test]
async fn test_visitor_cannot_post() {
    let fake = FakeRemote::with_rows(&[]);
    let sf = storefront(&fake);
    let session = session();

    let err = sf.submit(&session, form("Camry"), None).await.unwrap_err();

    assert!(matches!(err, AppError::Unauthorized(_)));
    assert!(fake.calls().is_empty());
    assert_eq!(
        session.lock().await.take_notice().map(|n| n.message),
        Some(DEALER_ACCESS_REQUIRED.to_string())
    );
}

#[tokio::test]
async fn test_editor_moves_to_form_after_photo() {
    let fake = FakeRemote::with_rows(&[]);
    let sf = storefront(&fake);
    let session = admin_session().await;

    sf.open_editor(&session).await.unwrap();
    assert_eq!(
        session.lock().await.editor.as_ref().map(|e| e.stage()),
        Some(crate::editor::EditorStage::PhotoPending)
    );

    sf.select_photo(&session, photo()).await.unwrap();
    assert_eq!(
        session.lock().await.editor.as_ref().map(|e| e.stage()),
        Some(crate::editor::EditorStage::FormActive)
    );
}

#[tokio::test]
async fn test_submit_with_photo_uploads_before_insert() {
    let fake = FakeRemote::with_rows(&["Corolla"]);
    let sf = storefront(&fake);
    let session = admin_session().await;
    sf.load(&session).await.unwrap();
    sf.open_editor(&session).await.unwrap();
    sf.select_photo(&session, photo()).await.unwrap();

    sf.submit(&session, form("Camry"), None).await.unwrap();

    let calls = fake.calls();
    let upload = calls.iter().position(|c| c.starts_with("upload")).unwrap();
    let insert = calls.iter().position(|c| c.starts_with("insert")).unwrap();
    assert!(upload < insert);
    assert!(calls[upload].contains("-front_view.jpg image/jpeg 4"));
    assert!(calls[insert].contains("image=https://cdn.test/car-images/"));
    assert!(calls[insert].ends_with("-front_view.jpg"));

    // re-fetched, newest first
    assert_eq!(names(&session).await, vec!["Camry", "Corolla"]);
    let state = session.lock().await;
    assert!(state.editor.is_none());
    assert_eq!(state.modal, Modal::None);
    assert!(!state.in_flight.uploading);
}

#[tokio::test]
async fn test_failed_upload_skips_insert_and_keeps_form() {
    let fake = FakeRemote::with_rows(&[]);
    fake.fail_upload.store(true, Ordering::SeqCst);
    let sf = storefront(&fake);
    let session = admin_session().await;
    sf.open_editor(&session).await.unwrap();
    sf.select_photo(&session, photo()).await.unwrap();

    let err = sf.submit(&session, form("Camry"), None).await.unwrap_err();

    assert_eq!(err, AppError::Upload("Bucket not found".to_string()));
    assert_eq!(fake.count("insert"), 0);
    assert_eq!(fake.count("list"), 0);

    let mut state = session.lock().await;
    assert_eq!(state.modal, Modal::ListingEditor);
    let editor = state.editor.as_ref().unwrap();
    assert_eq!(editor.form, form("Camry"));
    assert!(editor.photo().is_some());
    assert!(!state.in_flight.uploading);
    assert_eq!(
        state.take_notice().map(|n| n.message),
        Some("Upload Error: Bucket not found".to_string())
    );
}

#[tokio::test]
async fn test_failed_insert_keeps_editor_open() {
    let fake = FakeRemote::with_rows(&[]);
    fake.fail_insert.store(true, Ordering::SeqCst);
    let sf = storefront(&fake);
    let session = admin_session().await;
    sf.open_editor(&session).await.unwrap();

    let err = sf.submit(&session, form("Camry"), None).await.unwrap_err();

    assert!(matches!(err, AppError::Database(_)));
    let mut state = session.lock().await;
    assert_eq!(state.modal, Modal::ListingEditor);
    assert_eq!(state.editor.as_ref().unwrap().form.name, "Camry");
    assert_eq!(
        state.take_notice().map(|n| n.message),
        Some("Database Error: permission denied for table cars".to_string())
    );
}

#[tokio::test]
async fn test_submit_without_photo_uses_empty_url() {
    let fake = FakeRemote::with_rows(&[]);
    let sf = storefront(&fake);
    let session = admin_session().await;
    sf.open_editor(&session).await.unwrap();

    sf.submit(&session, form("Camry"), None).await.unwrap();

    assert_eq!(fake.count("upload"), 0);
    assert_eq!(fake.calls()[0], "insert Camry image=");
    let state = session.lock().await;
    let listings = state.inventory.listings();
    assert_eq!(listings[0].image_url, "");
    assert_eq!(listings[0].display_image(), FALLBACK_IMAGE_URL);
}

#[tokio::test]
async fn test_submit_passes_empty_fields_through() {
    let fake = FakeRemote::with_rows(&[]);
    let sf = storefront(&fake);
    let session = admin_session().await;

    sf.submit(&session, ListingForm::default(), None).await.unwrap();

    assert_eq!(fake.calls()[0], "insert  image=");
}

#[tokio::test]
async fn test_second_submit_while_uploading_is_not_dispatched() {
    let fake = FakeRemote::with_rows(&[]);
    let sf = storefront(&fake);
    let session = admin_session().await;
    session.lock().await.in_flight.uploading = true;

    let err = sf.submit(&session, form("Camry"), None).await.unwrap_err();

    assert!(matches!(err, AppError::Busy(_)));
    assert!(fake.calls().is_empty());
}

// ==================== DELETION ====================

#[tokio::test]
async fn test_delete_refetches() {
    let fake = FakeRemote::with_rows(&["A", "B"]);
    let sf = storefront(&fake);
    let session = admin_session().await;
    sf.load(&session).await.unwrap();

    sf.request_delete(&session, 1).await.unwrap();
    assert_eq!(session.lock().await.modal, Modal::ConfirmDelete(1));

    assert_eq!(
        sf.confirm_delete(&session, 1, true).await.unwrap(),
        DeleteOutcome::Deleted
    );

    assert_eq!(names(&session).await, vec!["B"]);
    assert_eq!(session.lock().await.modal, Modal::None);
}

#[tokio::test]
async fn test_declined_delete_sends_nothing() {
    let fake = FakeRemote::with_rows(&["A"]);
    let sf = storefront(&fake);
    let session = admin_session().await;
    sf.request_delete(&session, 1).await.unwrap();

    assert_eq!(
        sf.confirm_delete(&session, 1, false).await.unwrap(),
        DeleteOutcome::Cancelled
    );
    assert_eq!(fake.count("delete"), 0);
    assert_eq!(session.lock().await.modal, Modal::None);
}

#[tokio::test]
async fn test_failed_delete_keeps_listing_silently() {
    let fake = FakeRemote::with_rows(&["A"]);
    fake.fail_delete.store(true, Ordering::SeqCst);
    let sf = storefront(&fake);
    let session = admin_session().await;
    sf.load(&session).await.unwrap();

    assert_eq!(
        sf.confirm_delete(&session, 1, true).await.unwrap(),
        DeleteOutcome::Failed
    );

    assert_eq!(names(&session).await, vec!["A"]);
    let mut state = session.lock().await;
    assert!(state.take_notice().is_none());
    assert!(!state.in_flight.is_deleting(1));
}

#[tokio::test]
async fn test_concurrent_delete_of_same_id_dispatches_once() {
    let fake = FakeRemote::with_rows(&["A", "B", "C", "D", "E"]);
    let gate = Arc::new(Notify::new());
    *fake.hold_deletes.lock().unwrap() = Some(gate.clone());
    let sf = Arc::new(storefront(&fake));
    let session = admin_session().await;
    sf.load(&session).await.unwrap();

    let first = {
        let sf = sf.clone();
        let session = session.clone();
        tokio::spawn(async move { sf.confirm_delete(&session, 5, true).await })
    };
    while fake.count("delete") == 0 {
        tokio::task::yield_now().await;
    }

    // other interactions still go through while the delete is outstanding
    sf.set_search(&session, "a").await;
    assert!(session.lock().await.in_flight.is_deleting(5));

    assert_eq!(
        sf.confirm_delete(&session, 5, true).await.unwrap(),
        DeleteOutcome::AlreadyInFlight
    );

    gate.notify_one();
    assert_eq!(first.await.unwrap().unwrap(), DeleteOutcome::Deleted);
    assert_eq!(fake.count("delete 5"), 1);
    assert_eq!(names(&session).await, vec!["D", "C", "B", "A"]);
    assert!(!session.lock().await.in_flight.is_deleting(5));
}

#[tokio::test]
async fn test_visitor_cannot_delete() {
    let fake = FakeRemote::with_rows(&["A"]);
    let sf = storefront(&fake);
    let session = session();

    assert!(sf.request_delete(&session, 1).await.is_err());
    assert!(sf.confirm_delete(&session, 1, true).await.is_err());
    assert_eq!(fake.count("delete"), 0);
}

// ==================== PRESENTATION ====================

#[tokio::test]
async fn test_viewer_uses_fallback_for_missing_photo() {
    let fake = FakeRemote::with_rows(&["A"]);
    let sf = storefront(&fake);
    let session = session();
    sf.load(&session).await.unwrap();

    sf.open_viewer(&session, 1).await.unwrap();
    assert_eq!(
        session.lock().await.modal,
        Modal::ImageViewer(FALLBACK_IMAGE_URL.to_string())
    );

    assert!(matches!(
        sf.open_viewer(&session, 99).await,
        Err(AppError::NotFound(_))
    ));

    sf.close_modal(&session).await;
    assert_eq!(session.lock().await.modal, Modal::None);
}

#[tokio::test]
async fn test_theme_and_menu_toggles() {
    let fake = FakeRemote::with_rows(&[]);
    let sf = storefront(&fake);
    let session = session();

    sf.toggle_theme(&session).await;
    sf.toggle_menu(&session).await;
    {
        let state = session.lock().await;
        assert!(state.theme.is_dark());
        assert!(state.mobile_menu);
    }

    sf.open_login(&session).await;
    assert!(!session.lock().await.mobile_menu);
}

#[test]
fn test_contact_link_for_listing() {
    let fake = FakeRemote::with_rows(&[]);
    let sf = storefront(&fake);
    let listing = Listing {
        id: 1,
        name: "Camry".to_string(),
        price: "9,500,000".to_string(),
        year: Some(2019),
        condition: Condition::Tokunbo,
        image_url: String::new(),
    };

    let link = sf.contact_link(&listing);
    assert!(link.starts_with("https://wa.me/2348079387611?text="));
    let text = urlencoding::decode(link.split_once("?text=").unwrap().1).unwrap();
    assert!(text.contains("2019 Camry"));
    assert!(text.contains("₦9,500,000"));
}
