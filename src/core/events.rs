use std::path::PathBuf;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::models::result::Mode;

#[derive(Debug, Clone)]
pub enum Event {
    ScanStarted { path: PathBuf, mode: Mode },
    // A file or directory dropped from the totals because it could not be read
    EntrySkipped { path: PathBuf, error: String },
    ScanCompleted { mode: Mode, total_files: u64, total_size: u64, duration_ms: u64 },
}

pub type EventSender = mpsc::UnboundedSender<Event>;
pub type EventReceiver = mpsc::UnboundedReceiver<Event>;

pub fn create_event_channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}

/// Drains `event_rx` into debug logs until every sender is gone.
/// The task yields the number of events it logged.
pub fn spawn_event_logger(mut event_rx: EventReceiver) -> JoinHandle<usize> {
    tokio::spawn(async move {
        let mut logged = 0;
        while let Some(event) = event_rx.recv().await {
            match event {
                Event::ScanStarted { path, mode } => {
                    debug!(path = %path.display(), %mode, "event: scan started")
                }
                Event::EntrySkipped { path, error } => {
                    debug!(path = %path.display(), %error, "event: entry skipped")
                }
                Event::ScanCompleted { mode, total_files, total_size, duration_ms } => {
                    debug!(%mode, total_files, total_size, duration_ms, "event: scan completed")
                }
            }
            logged += 1;
        }
        logged
    })
}

/// Waits for a logger from [`spawn_event_logger`]. A failed logger task is
/// reported with `warn!` and yields `None`.
pub async fn finish_event_logger(handle: JoinHandle<usize>) -> Option<usize> {
    match handle.await {
        Ok(logged) => Some(logged),
        Err(e) => {
            warn!(error = %e, "event logger task failed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn logger_counts_events_until_senders_drop() {
        let (tx, rx) = create_event_channel();
        let handle = spawn_event_logger(rx);
        tx.send(Event::ScanStarted { path: PathBuf::from("/a"), mode: Mode::SingleThreaded })
            .unwrap();
        tx.send(Event::EntrySkipped { path: PathBuf::from("/a/b"), error: "denied".into() })
            .unwrap();
        drop(tx);

        assert_eq!(finish_event_logger(handle).await, Some(2));
    }

    #[tokio::test]
    async fn failed_logger_task_is_reported() {
        let handle: JoinHandle<usize> = tokio::spawn(async { panic!("logger blew up") });
        assert_eq!(finish_event_logger(handle).await, None);
    }

    #[tokio::test]
    async fn aborted_logger_task_is_reported() {
        let (_tx, rx) = create_event_channel();
        let handle = spawn_event_logger(rx);
        handle.abort();
        assert_eq!(finish_event_logger(handle).await, None);
    }
}
