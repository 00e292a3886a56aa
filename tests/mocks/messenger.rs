//! Recording messenger with failure injection

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI32, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use tubecomy::navigation::{ExternalPost, MessageId, Messenger, MessengerError, OutboundMessage, UserId};

/// One call the navigation layer made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Send {
        user: UserId,
        id: MessageId,
        text: String,
        callbacks: Vec<String>,
        photo: bool,
    },
    Delete {
        user: UserId,
        id: MessageId,
    },
    Copy {
        user: UserId,
        id: MessageId,
        channel: String,
        message_id: MessageId,
    },
}

#[derive(Debug)]
struct Refused(&'static str);

impl std::fmt::Display for Refused {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

impl std::error::Error for Refused {}

fn refused(reason: &'static str) -> MessengerError {
    MessengerError::Transport(Box::new(Refused(reason)))
}

pub struct RecordingMessenger {
    next_id: AtomicI32,
    calls: Mutex<Vec<Call>>,
    /// Messages currently visible, per chat, in send order
    visible: Mutex<HashMap<UserId, Vec<MessageId>>>,
    /// Sends left before every send fails; `usize::MAX` means unlimited
    send_budget: AtomicUsize,
    fail_copies: AtomicBool,
    fail_deletes: AtomicBool,
    send_delay: Mutex<Option<Duration>>,
}

impl Default for RecordingMessenger {
    fn default() -> Self {
        Self {
            next_id: AtomicI32::new(1),
            calls: Mutex::new(Vec::new()),
            visible: Mutex::new(HashMap::new()),
            send_budget: AtomicUsize::new(usize::MAX),
            fail_copies: AtomicBool::new(false),
            fail_deletes: AtomicBool::new(false),
            send_delay: Mutex::new(None),
        }
    }
}

impl RecordingMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allows `n` more sends, then fails every send.
    pub fn fail_sends_after(&self, n: usize) {
        self.send_budget.store(n, Ordering::SeqCst);
    }

    pub fn restore_sends(&self) {
        self.send_budget.store(usize::MAX, Ordering::SeqCst);
    }

    pub fn fail_copies(&self, fail: bool) {
        self.fail_copies.store(fail, Ordering::SeqCst);
    }

    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    /// Every send sleeps this long first, to let concurrent updates overlap.
    pub fn delay_sends(&self, delay: Duration) {
        *self.send_delay.lock().unwrap() = Some(delay);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// Ids still visible in the user's chat, oldest first.
    pub fn visible(&self, user: UserId) -> Vec<MessageId> {
        self.visible.lock().unwrap().get(&user).cloned().unwrap_or_default()
    }

    /// Texts of the sends to `user`, in order.
    pub fn sent_texts(&self, user: UserId) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Send { user: u, text, .. } if u == user => Some(text),
                _ => None,
            })
            .collect()
    }

    /// The most recent send to `user`.
    pub fn last_send(&self, user: UserId) -> Option<Call> {
        self.calls()
            .into_iter()
            .rev()
            .find(|call| matches!(call, Call::Send { user: u, .. } if *u == user))
    }

    pub fn deletes(&self, user: UserId) -> Vec<MessageId> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Delete { user: u, id } if u == user => Some(id),
                _ => None,
            })
            .collect()
    }

    fn take_send_budget(&self) -> bool {
        self.send_budget
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| match left {
                usize::MAX => Some(usize::MAX),
                0 => None,
                n => Some(n - 1),
            })
            .is_ok()
    }

    fn show(&self, user: UserId) -> MessageId {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.visible.lock().unwrap().entry(user).or_default().push(id);
        id
    }
}

#[async_trait]
impl Messenger for RecordingMessenger {
    async fn send(&self, user: UserId, message: &OutboundMessage) -> Result<MessageId, MessengerError> {
        let delay = *self.send_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if !self.take_send_budget() {
            return Err(refused("network is down"));
        }

        let id = self.show(user);
        let callbacks = message
            .keyboard
            .as_ref()
            .map(|k| k.callbacks().into_iter().map(str::to_string).collect())
            .unwrap_or_default();

        self.calls.lock().unwrap().push(Call::Send {
            user,
            id,
            text: message.text.clone(),
            callbacks,
            photo: message.media.is_some(),
        });
        Ok(id)
    }

    async fn delete(&self, user: UserId, message_id: MessageId) -> Result<(), MessengerError> {
        self.calls.lock().unwrap().push(Call::Delete { user, id: message_id });

        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(refused("not enough rights to delete"));
        }

        let mut visible = self.visible.lock().unwrap();
        let chat = visible.entry(user).or_default();
        match chat.iter().position(|id| *id == message_id) {
            Some(pos) => {
                chat.remove(pos);
                Ok(())
            }
            None => Err(refused("message to delete not found")),
        }
    }

    async fn copy_external_post(&self, user: UserId, post: &ExternalPost) -> Result<MessageId, MessengerError> {
        if self.fail_copies.load(Ordering::SeqCst) {
            return Err(refused("message to copy not found"));
        }

        let id = self.show(user);
        self.calls.lock().unwrap().push(Call::Copy {
            user,
            id,
            channel: post.channel.clone(),
            message_id: post.message_id,
        });
        Ok(id)
    }
}
