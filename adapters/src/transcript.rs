//! Request/response transcript capture
//!
//! Entries are appended verbatim, so a recorded transcript contains card
//! data and credentials. Pass it through [`crate::scrub`] before persisting
//! or displaying it.

use parking_lot::Mutex;
use std::sync::Arc;

/// Shared transcript buffer; clones append to the same storage
#[derive(Debug, Clone, Default)]
pub struct TranscriptRecorder {
    lines: Arc<Mutex<Vec<String>>>,
}

impl TranscriptRecorder {
    /// Create empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Outgoing line
    pub fn outgoing(&self, line: impl AsRef<str>) {
        self.push(format!("<- {:?}", line.as_ref()));
    }

    /// Incoming line
    pub fn incoming(&self, line: impl AsRef<str>) {
        self.push(format!("-> {:?}", line.as_ref()));
    }

    /// Free-form note (connection events)
    pub fn note(&self, line: impl Into<String>) {
        self.push(line.into());
    }

    fn push(&self, line: String) {
        self.lines.lock().push(line);
    }

    /// Snapshot without draining
    pub fn contents(&self) -> String {
        self.lines.lock().join("\n")
    }

    /// Drain the transcript
    pub fn take(&self) -> String {
        let lines = std::mem::take(&mut *self.lines.lock());
        lines.join("\n")
    }

    /// Number of recorded lines
    pub fn len(&self) -> usize {
        self.lines.lock().len()
    }

    /// No lines recorded
    pub fn is_empty(&self) -> bool {
        self.lines.lock().is_empty()
    }
}
