// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Rendering of image build progress.
//!
//! The runtime streams events keyed by layer id. On a terminal each id owns
//! one screen line that is rewritten in place; the reporter remembers which
//! line each id owns and moves the cursor up to it and back down after.

use std::collections::HashMap;
use std::io::{IsTerminal, Write};
use thiserror::Error;

const ESC: &str = "\u{1b}";

/// One decoded progress event from the build stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressEvent {
    pub id: Option<String>,
    pub status: Option<String>,
    pub progress: Option<String>,
    pub stream: Option<String>,
    pub error: Option<String>,
}

impl ProgressEvent {
    pub fn stream(text: impl Into<String>) -> Self {
        Self { stream: Some(text.into()), ..Default::default() }
    }

    pub fn status(id: impl Into<String>, status: impl Into<String>) -> Self {
        Self { id: Some(id.into()), status: Some(status.into()), ..Default::default() }
    }

    pub fn with_progress(mut self, progress: impl Into<String>) -> Self {
        self.progress = Some(progress.into());
        self
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { error: Some(message.into()), ..Default::default() }
    }
}

#[derive(Debug, Error)]
pub enum ProgressError {
    /// The build stream reported an error event.
    #[error("{0}")]
    Build(String),
    #[error("failed to write progress: {0}")]
    Io(#[from] std::io::Error),
}

/// Sink for build progress events.
pub trait BuildProgress: Send {
    /// Render one event. Error events are returned as [`ProgressError::Build`].
    fn report(&mut self, event: &ProgressEvent) -> Result<(), ProgressError>;
}

/// Line-oriented reporter for a terminal or plain stream.
pub struct TerminalProgress<W: Write + Send> {
    out: W,
    tty: bool,
    /// Screen line owned by each progress id, counted from the first id since the last reset.
    ids: HashMap<String, usize>,
}

impl TerminalProgress<std::io::Stdout> {
    pub fn stdout() -> Self {
        let out = std::io::stdout();
        let tty = out.is_terminal();
        Self::new(out, tty)
    }
}

impl<W: Write + Send> TerminalProgress<W> {
    pub fn new(out: W, tty: bool) -> Self {
        Self { out, tty, ids: HashMap::new() }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn display(&mut self, event: &ProgressEvent) -> std::io::Result<()> {
        write!(self.out, "{ESC}[2K\r")?;
        if let Some(id) = non_empty(&event.id) {
            write!(self.out, "{id}: ")?;
        }
        let status = event.status.as_deref().unwrap_or_default();
        if let Some(progress) = non_empty(&event.progress) {
            write!(self.out, "{status} {progress}\r")
        } else if let Some(stream) = non_empty(&event.stream) {
            write!(self.out, "{stream}\r")
        } else {
            write!(self.out, "{status}\r")
        }
    }

    fn report_tty(&mut self, event: &ProgressEvent) -> std::io::Result<()> {
        let Some(id) = non_empty(&event.id) else {
            // Output not tied to an id invalidates the line bookkeeping.
            self.ids.clear();
            return self.display(event);
        };
        let line = match self.ids.get(id) {
            Some(line) => *line,
            None => {
                let line = self.ids.len();
                self.ids.insert(id.to_string(), line);
                writeln!(self.out)?;
                line
            }
        };
        let diff = self.ids.len() - line;
        write!(self.out, "{ESC}[{diff}A")?;
        self.display(event)?;
        write!(self.out, "{ESC}[{diff}B")
    }

    fn report_plain(&mut self, event: &ProgressEvent) -> std::io::Result<()> {
        if let Some(stream) = non_empty(&event.stream) {
            return write!(self.out, "{stream}");
        }
        // Percentage updates are only useful on a terminal.
        if non_empty(&event.progress).is_some() {
            return Ok(());
        }
        if let Some(status) = non_empty(&event.status) {
            match non_empty(&event.id) {
                Some(id) => writeln!(self.out, "{id}: {status}")?,
                None => writeln!(self.out, "{status}")?,
            }
        }
        Ok(())
    }
}

impl<W: Write + Send> BuildProgress for TerminalProgress<W> {
    fn report(&mut self, event: &ProgressEvent) -> Result<(), ProgressError> {
        if let Some(error) = &event.error {
            return Err(ProgressError::Build(error.clone()));
        }
        if self.tty {
            self.report_tty(event)?;
        } else {
            self.report_plain(event)?;
        }
        self.out.flush()?;
        Ok(())
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::RecordingProgress;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{BuildProgress, ProgressError, ProgressEvent};
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// Progress sink that records every event
    #[derive(Clone, Default)]
    pub struct RecordingProgress {
        events: Arc<Mutex<Vec<ProgressEvent>>>,
    }

    impl RecordingProgress {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn events(&self) -> Vec<ProgressEvent> {
            self.events.lock().clone()
        }
    }

    impl BuildProgress for RecordingProgress {
        fn report(&mut self, event: &ProgressEvent) -> Result<(), ProgressError> {
            self.events.lock().push(event.clone());
            match &event.error {
                Some(error) => Err(ProgressError::Build(error.clone())),
                None => Ok(()),
            }
        }
    }
}

#[cfg(test)]
#[path = "progress_tests.rs"]
mod tests;
