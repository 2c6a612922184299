//! Per-browser view state.
//!
//! Everything here is ephemeral. A browser without a known session cookie
//! starts over with a fresh `SessionState`.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::editor::ListingEditor;
use crate::inventory::Inventory;

/// Cookie carrying the session id.
pub const SESSION_COOKIE_NAME: &str = "kbj_session";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }
}

/// The overlay currently on screen, if any.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Modal {
    #[default]
    None,
    AdminLogin,
    ListingEditor,
    ImageViewer(String),
    ConfirmDelete(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Error,
    Info,
}

/// An alert shown once on the next render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            message: message.into(),
        }
    }
}

/// Requests this session has dispatched and not yet seen settle.
#[derive(Debug, Clone, Default)]
pub struct InFlight {
    pub verifying: bool,
    pub uploading: bool,
    deleting: HashSet<i64>,
}

impl InFlight {
    /// Claim the delete slot for `id`; false if a delete for it is outstanding.
    pub fn begin_delete(&mut self, id: i64) -> bool {
        self.deleting.insert(id)
    }

    pub fn end_delete(&mut self, id: i64) {
        self.deleting.remove(&id);
    }

    pub fn is_deleting(&self, id: i64) -> bool {
        self.deleting.contains(&id)
    }
}

/// Top-level view state for one browser.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub admin: bool,
    pub theme: Theme,
    pub search: String,
    pub modal: Modal,
    pub mobile_menu: bool,
    pub notice: Option<Notice>,
    pub in_flight: InFlight,
    pub inventory: Inventory,
    pub editor: Option<ListingEditor>,
}

impl SessionState {
    /// Close whatever overlay is open. Closing the editor discards its data.
    pub fn close_modal(&mut self) {
        if self.modal == Modal::ListingEditor {
            self.editor = None;
        }
        self.modal = Modal::None;
    }

    pub fn notify(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    /// Hand out the pending notice and clear it.
    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }
}

pub type SessionHandle = Arc<Mutex<SessionState>>;

struct Entry {
    state: SessionHandle,
    last_seen: Instant,
}

/// In-memory session table keyed by cookie id.
///
/// At most `max_live` sessions are kept; past that the least recently seen
/// one is evicted to make room.
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, Entry>>,
    idle: Duration,
    max_live: usize,
}

impl SessionStore {
    pub fn new(idle: Duration, max_live: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            idle,
            max_live: max_live.max(1),
        }
    }

    /// Look up a live session and mark it as seen.
    pub async fn get(&self, id: Uuid) -> Option<SessionHandle> {
        let mut sessions = self.sessions.write().await;
        let expired = sessions.get(&id)?.last_seen.elapsed() > self.idle;
        if expired {
            sessions.remove(&id);
            return None;
        }
        let entry = sessions.get_mut(&id)?;
        entry.last_seen = Instant::now();
        Some(Arc::clone(&entry.state))
    }

    /// Start a fresh session, dropping idle ones.
    pub async fn create(&self) -> (Uuid, SessionHandle) {
        let id = Uuid::new_v4();
        let state: SessionHandle = Arc::new(Mutex::new(SessionState::default()));

        let mut sessions = self.sessions.write().await;
        let idle = self.idle;
        let before = sessions.len();
        sessions.retain(|_, entry| entry.last_seen.elapsed() <= idle);
        let pruned = before - sessions.len();
        if pruned > 0 {
            tracing::debug!(pruned, "Dropped idle sessions");
        }

        while sessions.len() >= self.max_live {
            let oldest = sessions
                .iter()
                .min_by_key(|(_, entry)| entry.last_seen)
                .map(|(id, _)| *id);
            match oldest {
                Some(oldest) => {
                    sessions.remove(&oldest);
                    tracing::debug!(session = %oldest, "Evicted least recent session");
                }
                None => break,
            }
        }

        sessions.insert(
            id,
            Entry {
                state: Arc::clone(&state),
                last_seen: Instant::now(),
            },
        );
        (id, state)
    }

    #[cfg(test)]
    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

/// Pull the session id out of a `Cookie` header.
pub fn session_id_from_cookies(cookies: &str) -> Option<Uuid> {
    cookies.split(';').find_map(|cookie| {
        cookie
            .trim()
            .strip_prefix(SESSION_COOKIE_NAME)
            .and_then(|rest| rest.strip_prefix('='))
            .and_then(|value| Uuid::parse_str(value.trim()).ok())
    })
}

/// `Set-Cookie` value for a session id. No expiry: the browser drops it on close.
pub fn session_cookie(id: Uuid) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax",
        SESSION_COOKIE_NAME, id
    )
}
