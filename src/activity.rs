//! # Activity Log Module
//!
//! Records what users send to the bot and how long each reply took. This is
//! a business log, separate from the `tracing` diagnostics. Recording never
//! blocks and never fails from the caller's point of view.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::warn;

/// One handled event
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityRecord {
    pub timestamp: DateTime<Utc>,
    pub chat_id: i64,
    pub text: String,
    pub latency: Duration,
}

impl ActivityRecord {
    pub fn new(chat_id: i64, text: impl Into<String>, latency: Duration) -> Self {
        Self {
            timestamp: Utc::now(),
            chat_id,
            text: text.into(),
            latency,
        }
    }

    /// Format as a single log line: `[ts] [chat] [Nms] text`
    pub fn to_line(&self) -> String {
        // Keep one record per line even for multi-line messages
        let text = self.text.replace('\n', "\\n");
        format!(
            "[{}] [{}] [{}ms] {}\n",
            self.timestamp.to_rfc3339(),
            self.chat_id,
            self.latency.as_millis(),
            text
        )
    }
}

/// Fire-and-forget sink for activity records
pub trait ActivityLogger: Send + Sync {
    fn log_activity(&self, record: ActivityRecord);
}

/// Appends activity records to a file from a background task
#[derive(Debug, Clone)]
pub struct FileActivityLogger {
    sender: mpsc::UnboundedSender<ActivityRecord>,
}

impl FileActivityLogger {
    /// Open `path` for appending (creating parent directories) and start the writer task.
    ///
    /// The task ends once every logger clone has been dropped and the queue is drained.
    pub async fn spawn(path: impl AsRef<Path>) -> Result<(Self, JoinHandle<()>)> {
        let path: PathBuf = path.as_ref().to_path_buf();

        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir).await.with_context(|| {
                format!("Failed to create activity log directory {}", dir.display())
            })?;
        }

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .with_context(|| format!("Failed to open activity log {}", path.display()))?;

        let (sender, mut receiver) = mpsc::unbounded_channel::<ActivityRecord>();

        let handle = tokio::spawn(async move {
            while let Some(record) = receiver.recv().await {
                if let Err(e) = file.write_all(record.to_line().as_bytes()).await {
                    warn!(path = %path.display(), error = %e, "Failed to write activity record");
                }
            }
            if let Err(e) = file.flush().await {
                warn!(path = %path.display(), error = %e, "Failed to flush activity log");
            }
        });

        Ok((Self { sender }, handle))
    }
}

impl ActivityLogger for FileActivityLogger {
    fn log_activity(&self, record: ActivityRecord) {
        if self.sender.send(record).is_err() {
            warn!("Activity log writer has stopped, record dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_line_format() {
        let record = ActivityRecord::new(12345, "hello\nworld", Duration::from_millis(42));
        let line = record.to_line();

        assert!(line.contains("[12345] [42ms] hello\\nworld"));
        assert!(line.ends_with('\n'));
        assert_eq!(line.matches('\n').count(), 1);
    }

    #[tokio::test]
    async fn test_file_logger_appends_lines() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("telegram").join("usage.txt");

        let (logger, handle) = FileActivityLogger::spawn(&path).await?;
        logger.log_activity(ActivityRecord::new(1, "/start", Duration::from_millis(3)));
        logger.log_activity(ActivityRecord::new(2, "catalog", Duration::from_millis(8)));
        drop(logger);
        handle.await?;

        let content = std::fs::read_to_string(&path)?;
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("[1] [3ms] /start"));
        assert!(lines[1].ends_with("[2] [8ms] catalog"));
        Ok(())
    }

    #[tokio::test]
    async fn test_logging_after_writer_stopped_is_swallowed() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let (logger, handle) = FileActivityLogger::spawn(dir.path().join("usage.txt")).await?;
        handle.abort();
        let _ = handle.await;

        // Must not panic
        logger.log_activity(ActivityRecord::new(1, "late", Duration::ZERO));
        Ok(())
    }
}
