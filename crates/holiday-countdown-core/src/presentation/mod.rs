//! Presentation boundary.
//!
//! The core never draws anything. It hands each refresh outcome to a
//! `Reporter` supplied by the host; `WidgetPresenter` turns those outcomes
//! into calls on the host's `WidgetDisplay`.

pub mod widget;

use tokio::sync::mpsc;
use tracing::error;

use crate::refresh::RefreshEvent;

pub use widget::{
    IconKind, WidgetDisplay, WidgetPresenter, LOADING_CONTENT, LOADING_TITLE,
    URGENT_THRESHOLD_DAYS,
};

/// Receives the outcome of every refresh. Called from the refresh worker.
pub trait Reporter: Send + Sync {
    fn report(&self, event: RefreshEvent);
}

/// Forwards events over a channel so the host can apply them on its own task.
pub struct ChannelReporter {
    tx: mpsc::Sender<RefreshEvent>,
}

impl ChannelReporter {
    pub fn new(tx: mpsc::Sender<RefreshEvent>) -> Self {
        Self { tx }
    }
}

impl Reporter for ChannelReporter {
    fn report(&self, event: RefreshEvent) {
        if let Err(e) = self.tx.try_send(event) {
            error!(error = %e, "Failed to deliver refresh event");
        }
    }
}
