use tokio::sync::mpsc;
use tracing::debug;

use crate::stats::StatsSnapshot;

/// Default number of buffered console events.
pub const OUTPUT_CHANNEL_CAPACITY: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputEvent {
    Info(String),
    UnexpectedStatus { status: u16, url: String },
    TransportFailure { message: String },
    Progress(StatsSnapshot),
    Stopped { message: String },
}

impl OutputEvent {
    /// The line as shown on the console, without trailing newline.
    #[must_use]
    pub fn line(&self) -> String {
        match self {
            OutputEvent::Info(message)
            | OutputEvent::TransportFailure { message }
            | OutputEvent::Stopped { message } => message.clone(),
            OutputEvent::UnexpectedStatus { status, url } => {
                format!("Received non-200 response: {} {}", status, url)
            }
            OutputEvent::Progress(snapshot) => snapshot.to_string(),
        }
    }
}

/// Cloneable handle feeding the console writer.
#[derive(Debug, Clone)]
pub struct OutputSink {
    tx: mpsc::Sender<OutputEvent>,
}

impl OutputSink {
    #[must_use]
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<OutputEvent>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx }, rx)
    }

    /// Queues a line, waiting for room. Warnings and errors are never dropped
    /// while the writer is alive.
    pub async fn emit(&self, event: OutputEvent) {
        if self.tx.send(event).await.is_err() {
            debug!("Console writer is gone; dropping output event.");
        }
    }

    /// Queues a progress update unless the channel is full.
    pub fn try_progress(&self, snapshot: StatsSnapshot) {
        if self.tx.try_send(OutputEvent::Progress(snapshot)).is_err() {
            // Progress is overwritten by the next report anyway.
        }
    }
}
