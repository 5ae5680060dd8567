//! The single user-visible error channel.
//!
//! Holds the current title, message and open flag. Presentation is up to the
//! subscriber; this type only records what should be shown.

use std::sync::Arc;

use log::debug;
use tokio::sync::watch;

pub const DEFAULT_ERROR_TITLE: &str = "Error";

/// Snapshot of the error channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorNotice {
    pub is_open: bool,
    pub title: String,
    pub message: String,
}

impl Default for ErrorNotice {
    fn default() -> Self {
        Self {
            is_open: false,
            title: DEFAULT_ERROR_TITLE.to_string(),
            message: String::new(),
        }
    }
}

/// Shared error channel. Clones observe and update the same state.
#[derive(Debug, Clone)]
pub struct ErrorSignal {
    state: Arc<watch::Sender<ErrorNotice>>,
}

impl ErrorSignal {
    pub fn new() -> Self {
        Self {
            state: Arc::new(watch::Sender::new(ErrorNotice::default())),
        }
    }

    /// Open the channel with `message` under the default title.
    pub fn show(&self, message: impl Into<String>) {
        self.show_titled(message, DEFAULT_ERROR_TITLE);
    }

    pub fn show_titled(&self, message: impl Into<String>, title: impl Into<String>) {
        let notice = ErrorNotice {
            is_open: true,
            title: title.into(),
            message: message.into(),
        };
        debug!("Error signal raised: {} - {}", notice.title, notice.message);
        self.state.send_replace(notice);
    }

    /// Close the channel. Title and message are left as they were.
    pub fn close(&self) {
        self.state.send_if_modified(|notice| {
            let was_open = notice.is_open;
            notice.is_open = false;
            was_open
        });
    }

    pub fn is_open(&self) -> bool {
        self.state.borrow().is_open
    }

    pub fn current(&self) -> ErrorNotice {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ErrorNotice> {
        self.state.subscribe()
    }
}

impl Default for ErrorSignal {
    fn default() -> Self {
        Self::new()
    }
}
