//! Event channel between the processing worker and the front-end.
//!
//! The worker never calls back into presentation code. Everything it has to
//! say (progress, anomalies, completion) is a [`ProcessEvent`] pushed through
//! an [`EventSink`], which wraps an unbounded `std::sync::mpsc` channel:
//!
//! ```text
//! worker thread ──ProcessEvent──▶ mpsc ──▶ front-end poll loop
//! ```
//!
//! Sending never blocks and never fails from the worker's point of view. A
//! front-end that stops draining (or drops the receiver) does not stall the
//! batch.

use serde::Serialize;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};

/// Non-fatal anomaly categories reported while processing a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InfoKind {
    /// Entry is a directory; nothing was done.
    SkippedDirectory,
    /// Image has no capture timestamp; original name kept.
    MissingCreationDate,
    /// Decode, metadata or encode failure; plain transfer attempted instead.
    ImageProcessingError,
    /// Target of a move or copy already exists; both files left in place.
    DestinationAlreadyExists,
    /// Move (or source removal after a move-like write) failed.
    MoveFailed,
    /// Copy failed for a reason other than an existing destination.
    CopyFailed,
    /// Image aspect ratio is panoramic; written at full size.
    PanoramicImageNotResized,
}

/// A reported anomaly for one directory entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InfoEvent {
    pub kind: InfoKind,
    pub file_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl InfoEvent {
    pub fn new(kind: InfoKind, file_name: impl Into<String>) -> Self {
        Self {
            kind,
            file_name: file_name.into(),
            detail: None,
        }
    }

    pub fn with_detail(kind: InfoKind, file_name: impl Into<String>, detail: String) -> Self {
        Self {
            kind,
            file_name: file_name.into(),
            detail: Some(detail),
        }
    }
}

/// Progress through the batch. `total` is fixed for the whole batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProgressTick {
    pub processed: usize,
    pub total: usize,
}

/// Everything the worker reports, in emission order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ProcessEvent {
    /// A source directory is about to be processed.
    DirectoryStarted { path: PathBuf },
    /// Emitted before each entry is routed.
    Progress(ProgressTick),
    Info(InfoEvent),
    /// Terminal event; nothing follows it.
    Done { processed: usize },
}

/// Write side of the event channel.
#[derive(Debug, Clone, Default)]
pub struct EventSink {
    tx: Option<Sender<ProcessEvent>>,
}

impl EventSink {
    /// Create a connected sink/receiver pair.
    pub fn channel() -> (Self, Receiver<ProcessEvent>) {
        let (tx, rx) = mpsc::channel();
        (Self { tx: Some(tx) }, rx)
    }

    /// A sink that drops every event (still mirrored to the log).
    pub fn disabled() -> Self {
        Self { tx: None }
    }

    pub fn emit(&self, event: ProcessEvent) {
        match &event {
            ProcessEvent::Info(info) => log::warn!(
                "{:?}: {}{}",
                info.kind,
                info.file_name,
                info.detail
                    .as_deref()
                    .map(|d| format!(" ({d})"))
                    .unwrap_or_default()
            ),
            ProcessEvent::Progress(tick) => {
                log::trace!("progress {}/{}", tick.processed, tick.total)
            }
            ProcessEvent::DirectoryStarted { path } => {
                log::info!("processing directory {}", path.display())
            }
            ProcessEvent::Done { processed } => log::info!("done, {processed} entries"),
        }
        if let Some(tx) = &self.tx {
            // Receiver gone means nobody is listening any more; keep working.
            let _ = tx.send(event);
        }
    }

    pub fn info(&self, event: InfoEvent) {
        self.emit(ProcessEvent::Info(event));
    }

    pub fn progress(&self, processed: usize, total: usize) {
        self.emit(ProcessEvent::Progress(ProgressTick { processed, total }));
    }
}
