use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

use crate::core::AppConfig;
use crate::gemini::ModelClient;
use crate::support::SupportSession;

/// Sessions untouched for this long are dropped.
pub const SESSION_IDLE_TIMEOUT: Duration = Duration::from_secs(60 * 60);
pub const MAX_SESSIONS: usize = 10_000;

/// A single UI session. The async mutex serializes actions within one
/// session, including the model call, while other sessions proceed.
pub type SessionHandle = Arc<Mutex<SupportSession>>;

struct SessionEntry {
    handle: SessionHandle,
    last_seen: Instant,
}

pub struct AppState {
    pub config: AppConfig,
    pub model: Arc<dyn ModelClient>,
    // Keyed by the value of the session cookie. Only started sessions
    // are stored, an unknown id is a welcome screen.
    sessions: HashMap<String, SessionEntry>,
    idle_timeout: Duration,
    max_sessions: usize,
}

impl AppState {
    pub fn new(config: AppConfig, model: Arc<dyn ModelClient>) -> Self {
        Self {
            config,
            model,
            sessions: HashMap::new(),
            idle_timeout: SESSION_IDLE_TIMEOUT,
            max_sessions: MAX_SESSIONS,
        }
    }

    pub fn with_session_limits(mut self, idle_timeout: Duration, max_sessions: usize) -> Self {
        self.idle_timeout = idle_timeout;
        self.max_sessions = max_sessions.max(1);
        self
    }

    /// Get the started session for `id`. Returns `None` when the id is
    /// unknown or the session has gone idle.
    pub fn find_session(&mut self, id: &str) -> Option<SessionHandle> {
        let now = Instant::now();
        let entry = self.sessions.get_mut(id)?;
        if now.duration_since(entry.last_seen) >= self.idle_timeout {
            tracing::debug!("Support session {} expired", id);
            self.sessions.remove(id);
            return None;
        }
        entry.last_seen = now;
        Some(Arc::clone(&entry.handle))
    }

    /// Get or create the session for `id`. Idle sessions are pruned
    /// first and the least recently used one is evicted when full.
    pub fn start_session(&mut self, id: &str) -> SessionHandle {
        let now = Instant::now();
        let idle_timeout = self.idle_timeout;
        self.sessions
            .retain(|_, entry| now.duration_since(entry.last_seen) < idle_timeout);

        if let Some(entry) = self.sessions.get_mut(id) {
            entry.last_seen = now;
            return Arc::clone(&entry.handle);
        }

        if self.sessions.len() >= self.max_sessions {
            let oldest = self
                .sessions
                .iter()
                .min_by_key(|(_, entry)| entry.last_seen)
                .map(|(key, _)| key.clone());
            if let Some(oldest) = oldest {
                tracing::warn!("Session limit reached, evicting {}", oldest);
                self.sessions.remove(&oldest);
            }
        }

        tracing::debug!("New support session {}", id);
        let handle = Arc::new(Mutex::new(SupportSession::new()));
        self.sessions.insert(
            id.to_string(),
            SessionEntry {
                handle: Arc::clone(&handle),
                last_seen: now,
            },
        );
        handle
    }

    /// Forget the session for `id`, returning it if it existed.
    pub fn end_session(&mut self, id: &str) -> Option<SessionHandle> {
        self.sessions.remove(id).map(|entry| entry.handle)
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}
