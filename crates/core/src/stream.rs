//! Handle to a running stream reader.

use tokio::task::JoinHandle;

/// Controls the background task that forwards stream chunks to a channel.
///
/// Returned once a streaming connection is confirmed open. The reader owns the
/// only sender of the output channel; when the reader stops for any reason
/// (end of body, read error, cancellation, receiver dropped) the sender is
/// dropped and the receiver observes the channel as closed.
///
/// Dropping the handle does not stop the reader.
#[derive(Debug)]
pub struct StreamHandle {
    task: JoinHandle<()>,
}

impl StreamHandle {
    /// Wraps the reader task.
    pub fn new(task: JoinHandle<()>) -> Self {
        Self { task }
    }

    /// Aborts the reader at its next suspension point.
    ///
    /// Idempotent. The output channel is closed once the task is torn down.
    pub fn cancel(&self) {
        self.task.abort();
    }

    /// Returns `true` once the reader has stopped.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Waits for the reader to stop.
    ///
    /// Returns normally for both natural termination and cancellation. A panic
    /// inside the reader is propagated to the caller.
    pub async fn join(self) {
        match self.task.await {
            Ok(()) => {}
            Err(e) if e.is_cancelled() => {}
            Err(e) => std::panic::resume_unwind(e.into_panic()),
        }
    }
}
