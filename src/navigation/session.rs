//! Per-user navigation sessions.
//!
//! Every user gets one `Session` behind its own async mutex. Whoever holds
//! the guard owns that user's stack and rendered block for the whole
//! read-modify-render cycle, so two updates from one user never interleave.

use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tokio::time::Instant;

use super::message::{MessageId, UserId};
use super::stack::NavigationStack;

/// In-memory navigation state of one user.
#[derive(Debug)]
pub struct Session {
    pub stack: NavigationStack,
    /// Ids of the messages that make up the screen currently shown
    pub rendered: Vec<MessageId>,
    pub last_seen: Instant,
}

impl Session {
    fn new() -> Self {
        Self {
            stack: NavigationStack::new(),
            rendered: Vec::new(),
            last_seen: Instant::now(),
        }
    }
}

/// Process-wide map of sessions, cheap to clone.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<DashMap<UserId, Arc<Mutex<Session>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Locks the user's session, creating it on first use.
    ///
    /// # Arguments
    ///
    /// * `user` - Telegram user id
    ///
    /// # Returns
    ///
    /// A guard that keeps every other update of this user waiting until it
    /// is dropped. `last_seen` is refreshed on acquisition.
    pub async fn lock(&self, user: UserId) -> OwnedMutexGuard<Session> {
        let slot = Arc::clone(
            &*self
                .sessions
                .entry(user)
                .or_insert_with(|| Arc::new(Mutex::new(Session::new()))),
        );

        let mut guard = slot.lock_owned().await;
        guard.last_seen = Instant::now();
        guard
    }

    /// Number of sessions currently held.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Drops sessions idle for at least `max_idle`. Returns how many went.
    ///
    /// A session somebody holds or waits for is never dropped: those hold a
    /// clone of the slot, which the shard lock keeps stable during `retain`.
    pub fn evict_idle(&self, max_idle: Duration) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, slot| {
            if Arc::strong_count(slot) > 1 {
                return true;
            }
            match slot.try_lock() {
                Ok(session) => session.last_seen.elapsed() < max_idle,
                Err(_) => true,
            }
        });
        before.saturating_sub(self.sessions.len())
    }

    /// Runs `evict_idle` every `interval` for the lifetime of the process.
    pub fn spawn_eviction_task(&self, interval: Duration, max_idle: Duration) -> tokio::task::JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // the first tick fires immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let evicted = store.evict_idle(max_idle);
                if evicted > 0 {
                    log::info!("Evicted {} idle navigation sessions, {} left", evicted, store.len());
                }
            }
        })
    }
}
