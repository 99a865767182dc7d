use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use tracing::error;
use uuid::Uuid;

/// Write-only audit record for a failed operation.
#[derive(Debug, Clone)]
pub struct ErrorLogEntry {
    pub id: Uuid,
    /// Name of the operation that hit the failure, e.g. "ISO Search"
    pub action: String,
    /// Raw failure detail; this text never reaches the end user
    pub message: String,
    pub logged_at: DateTime<Utc>,
}

/// Sink for error audit entries.
///
/// Entries are emitted to the log output and retained in memory for the
/// lifetime of the process. Nothing in the application reads them back;
/// tests may inspect them.
#[derive(Clone, Default)]
pub struct ErrorLog {
    entries: Arc<Mutex<Vec<ErrorLogEntry>>>,
}

impl ErrorLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a failure under the name of the operation that hit it.
    pub fn record(&self, action: &str, message: &str) {
        error!(action, "{}", message);

        let entry = ErrorLogEntry {
            id: Uuid::new_v4(),
            action: action.to_string(),
            message: message.to_string(),
            logged_at: Utc::now(),
        };

        if let Ok(mut entries) = self.entries.lock() {
            entries.push(entry);
        }
    }

    #[cfg(test)]
    pub fn entries(&self) -> Vec<ErrorLogEntry> {
        self.entries.lock().expect("audit log lock poisoned").clone()
    }
}
