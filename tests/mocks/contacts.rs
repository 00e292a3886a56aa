//! In-memory contact store

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use tubecomy::core::error::{AppError, AppResult};
use tubecomy::navigation::UserId;
use tubecomy::storage::ContactStore;

#[derive(Default)]
pub struct MemoryContactStore {
    emails: Mutex<HashMap<UserId, String>>,
    saves: AtomicUsize,
    fail_saves: AtomicBool,
}

impl MemoryContactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-stores an e-mail as if the user left it in an earlier session.
    pub fn with_email(self, user: UserId, email: &str) -> Self {
        self.emails.lock().unwrap().insert(user, email.to_string());
        self
    }

    pub fn email(&self, user: UserId) -> Option<String> {
        self.emails.lock().unwrap().get(&user).cloned()
    }

    /// How many times `save_email` succeeded.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl ContactStore for MemoryContactStore {
    async fn get_email(&self, user: UserId) -> AppResult<Option<String>> {
        Ok(self.email(user))
    }

    async fn save_email(&self, user: UserId, email: &str) -> AppResult<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(AppError::Anyhow(anyhow::anyhow!("database is locked")));
        }
        self.emails.lock().unwrap().insert(user, email.to_string());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
