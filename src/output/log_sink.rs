//! Serialized crawl log
//!
//! Workers never touch the log file. They push [`LogMessage`]s into an
//! unbounded channel and a single drain task appends them, one timestamped
//! line each, so lines never interleave. Closing the sink is an explicit
//! signal sent after every worker has stopped; messages already queued at
//! that point are still written.

use chrono::{DateTime, Local};
use std::io;
use std::path::Path;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

/// A single log line with the logical sender that emitted it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogMessage {
    pub sender: String,
    pub text: String,
}

impl LogMessage {
    pub fn new(sender: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            text: text.into(),
        }
    }
}

/// Formats a message as `{YYYY-MM-DD HH:MM:SS} | [{sender}] {text}\n`
pub fn format_line(timestamp: &DateTime<Local>, message: &LogMessage) -> String {
    format!(
        "{} | [{}] {}\n",
        timestamp.format("%Y-%m-%d %H:%M:%S"),
        message.sender,
        message.text
    )
}

/// Cloneable handle used by workers to emit log lines
///
/// Every line is mirrored to `tracing` at the matching level.
#[derive(Debug, Clone)]
pub struct LogSender {
    sender: String,
    tx: mpsc::UnboundedSender<LogMessage>,
}

impl LogSender {
    pub fn info(&self, text: impl Into<String>) {
        let text = text.into();
        tracing::info!("[{}] {}", self.sender, text);
        self.send(text);
    }

    pub fn warn(&self, text: impl Into<String>) {
        let text = text.into();
        tracing::warn!("[{}] {}", self.sender, text);
        self.send(text);
    }

    pub fn debug(&self, text: impl Into<String>) {
        let text = text.into();
        tracing::debug!("[{}] {}", self.sender, text);
        self.send(text);
    }

    fn send(&self, text: String) {
        // A closed sink only happens after shutdown; late lines are dropped
        let _ = self.tx.send(LogMessage::new(self.sender.clone(), text));
    }
}

/// The single consumer appending log lines to the crawl log file
pub struct LogSink {
    tx: mpsc::UnboundedSender<LogMessage>,
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<io::Result<u64>>,
}

impl LogSink {
    /// Opens (or creates) the log file in append mode and starts the drain task
    pub async fn open(path: &Path) -> io::Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await?;

        let (tx, rx) = mpsc::unbounded_channel();
        let (shutdown, shutdown_rx) = oneshot::channel();
        let handle = tokio::spawn(drain(file, rx, shutdown_rx));

        Ok(Self {
            tx,
            shutdown,
            handle,
        })
    }

    /// Creates a sender emitting under the given tag
    pub fn sender(&self, tag: impl Into<String>) -> LogSender {
        LogSender {
            sender: tag.into(),
            tx: self.tx.clone(),
        }
    }

    /// Flushes every queued line and closes the file
    ///
    /// # Returns
    ///
    /// The number of lines written during the sink's lifetime
    pub async fn close(self) -> io::Result<u64> {
        let _ = self.shutdown.send(());
        drop(self.tx);
        self.handle
            .await
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?
    }
}

async fn drain(
    mut file: File,
    mut rx: mpsc::UnboundedReceiver<LogMessage>,
    mut shutdown: oneshot::Receiver<()>,
) -> io::Result<u64> {
    let mut written = 0;

    loop {
        tokio::select! {
            biased;
            message = rx.recv() => match message {
                Some(message) => written += write_line(&mut file, &message).await,
                None => break,
            },
            _ = &mut shutdown => {
                rx.close();
                while let Some(message) = rx.recv().await {
                    written += write_line(&mut file, &message).await;
                }
                break;
            }
        }
    }

    file.flush().await?;
    Ok(written)
}

/// Appends one line; a failed write is reported and skipped
async fn write_line(file: &mut File, message: &LogMessage) -> u64 {
    let line = format_line(&Local::now(), message);

    let result: io::Result<()> = async {
        file.write_all(line.as_bytes()).await?;
        file.flush().await
    }
    .await;

    match result {
        Ok(()) => 1,
        Err(e) => {
            tracing::warn!("Failed to append to crawl log: {}", e);
            0
        }
    }
}
