//! Background comment loading on the tokio runtime.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use tokio::runtime::Handle;
use tokio::sync::oneshot::{self, error::TryRecvError};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::services::CommentSource;
use crate::types::Comment;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded(Vec<Comment>),
    Failed(String),
}

/// A single in-flight comment load.
///
/// The result is picked up with [`CommentLoad::poll`] from the UI thread.
/// Cancelling (explicitly or by dropping) aborts the task and discards any
/// late result.
pub struct CommentLoad {
    receiver: oneshot::Receiver<LoadOutcome>,
    cancelled: Arc<AtomicBool>,
    handle: JoinHandle<()>,
    finished: bool,
}

impl CommentLoad {
    pub fn spawn(source: Arc<dyn CommentSource>) -> Result<Self> {
        let runtime = Handle::try_current().context("comment loading requires a tokio runtime")?;
        let (sender, receiver) = oneshot::channel();
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);

        let handle = runtime.spawn(async move {
            let outcome = match source.load().await {
                Ok(comments) => LoadOutcome::Loaded(comments),
                Err(error) => LoadOutcome::Failed(error.to_string()),
            };
            if flag.load(Ordering::SeqCst) {
                debug!("dropping comment load result after cancellation");
                return;
            }
            let _ = sender.send(outcome);
        });

        Ok(Self {
            receiver,
            cancelled,
            handle,
            finished: false,
        })
    }

    /// Returns the outcome once, when it becomes available.
    pub fn poll(&mut self) -> Option<LoadOutcome> {
        if self.finished || self.is_cancelled() {
            return None;
        }

        match self.receiver.try_recv() {
            Ok(outcome) => {
                self.finished = true;
                Some(outcome)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Closed) => {
                self.finished = true;
                Some(LoadOutcome::Failed(
                    "comment loader stopped before producing a result".to_string(),
                ))
            }
        }
    }

    pub fn cancel(&mut self) {
        if self.cancelled.swap(true, Ordering::SeqCst) {
            return;
        }
        if !self.finished {
            debug!("cancelling in-flight comment load");
        }
        self.handle.abort();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl Drop for CommentLoad {
    fn drop(&mut self) {
        self.cancel();
    }
}
