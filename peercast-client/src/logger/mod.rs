use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::Notify;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        };
        f.write_str(tag)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub seq: usize,
    pub level: LogLevel,
    pub text: String,
}

struct LogInner {
    session: Uuid,
    entries: Mutex<Vec<LogEntry>>,
    notify: Notify,
}

/// Append-only, human-readable session log.
///
/// Every line is also forwarded to `tracing`. Presenters can replay the log
/// from any sequence number and then wait for new lines with a [`LogCursor`].
#[derive(Clone)]
pub struct SessionLog {
    inner: Arc<LogInner>,
}

impl SessionLog {
    pub fn new(session: Uuid) -> Self {
        Self {
            inner: Arc::new(LogInner {
                session,
                entries: Mutex::new(Vec::new()),
                notify: Notify::new(),
            }),
        }
    }

    pub fn session(&self) -> Uuid {
        self.inner.session
    }

    pub fn debug(&self, text: impl Into<String>) {
        self.push(LogLevel::Debug, text.into());
    }

    pub fn info(&self, text: impl Into<String>) {
        self.push(LogLevel::Info, text.into());
    }

    pub fn warn(&self, text: impl Into<String>) {
        self.push(LogLevel::Warn, text.into());
    }

    pub fn error(&self, text: impl Into<String>) {
        self.push(LogLevel::Error, text.into());
    }

    fn push(&self, level: LogLevel, text: String) {
        let session = self.inner.session;
        match level {
            LogLevel::Debug => tracing::debug!(%session, "{}", text),
            LogLevel::Info => tracing::info!(%session, "{}", text),
            LogLevel::Warn => tracing::warn!(%session, "{}", text),
            LogLevel::Error => tracing::error!(%session, "{}", text),
        }

        {
            let mut entries = self.entries();
            let seq = entries.len();
            entries.push(LogEntry { seq, level, text });
        }
        self.inner.notify.notify_waiters();
    }

    fn entries(&self) -> MutexGuard<'_, Vec<LogEntry>> {
        self.inner
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, seq: usize) -> Option<LogEntry> {
        self.entries().get(seq).cloned()
    }

    /// All entries with `seq >= from`.
    pub fn replay(&self, from: usize) -> Vec<LogEntry> {
        self.entries().iter().skip(from).cloned().collect()
    }

    pub fn snapshot(&self) -> Vec<LogEntry> {
        self.replay(0)
    }

    /// Cursor starting at `from`; earlier entries are skipped.
    pub fn cursor(&self, from: usize) -> LogCursor {
        LogCursor {
            log: self.clone(),
            next: from,
        }
    }
}

pub struct LogCursor {
    log: SessionLog,
    next: usize,
}

impl LogCursor {
    /// Next entry, waiting until one is appended.
    pub async fn next(&mut self) -> LogEntry {
        loop {
            let notified = self.log.inner.notify.notified();
            if let Some(entry) = self.log.get(self.next) {
                self.next += 1;
                return entry;
            }
            notified.await;
        }
    }

    pub fn position(&self) -> usize {
        self.next
    }
}
