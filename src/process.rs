//! Batch orchestration.
//!
//! Lists a source directory once, then hands every entry to the
//! [`EntryRouter`] in name order, one at a time, emitting a progress tick
//! before each entry and a single [`ProcessEvent::Done`] at the end.
//!
//! ## Snapshot semantics
//!
//! The listing is taken up front and never refreshed. Files that appear in
//! the source directory while the batch runs (including files the batch
//! itself writes, when source and destination are the same directory) are
//! not visited.
//!
//! ## Failure model
//!
//! Only failing to list a source directory is fatal and is returned as
//! [`ProcessError`]. Everything that goes wrong with an individual entry is
//! reported as an event and the batch continues.
//!
//! ## Multiple roots
//!
//! [`process_dirs`] lists every source directory before touching anything,
//! so an unreadable root aborts the run before the first file is moved.
//! Progress is numbered across the whole run against one fixed total.

use crate::config::ProcessingConfig;
use crate::events::{EventSink, ProcessEvent};
use crate::imaging::{ImageBackend, RustBackend};
use crate::router::{Disposition, EntryRouter};
use serde::Serialize;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Cannot list {}: {source}", .path.display())]
    List {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Tally of entry dispositions for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub processed: usize,
    pub copied: usize,
    pub moved: usize,
    pub written: usize,
    pub unchanged: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl BatchSummary {
    fn record(&mut self, disposition: &Disposition) {
        self.processed += 1;
        match disposition {
            Disposition::Copied(_) => self.copied += 1,
            Disposition::Moved(_) => self.moved += 1,
            Disposition::Written(_) => self.written += 1,
            Disposition::Unchanged => self.unchanged += 1,
            Disposition::SkippedDirectory => self.skipped += 1,
            Disposition::Failed => self.failed += 1,
        }
    }
}

/// Entry names of `dir`, sorted so runs are reproducible.
fn list_entries(dir: &Path) -> Result<Vec<OsString>, ProcessError> {
    let list_err = |source| ProcessError::List {
        path: dir.to_path_buf(),
        source,
    };
    let mut names = fs::read_dir(dir)
        .map_err(list_err)?
        .map(|entry| entry.map(|e| e.file_name()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(list_err)?;
    names.sort();
    Ok(names)
}

/// Process every entry of `source_dir` into `dest_dir`.
pub fn iterate_dir(
    source_dir: &Path,
    dest_dir: &Path,
    config: &ProcessingConfig,
    events: &EventSink,
) -> Result<BatchSummary, ProcessError> {
    iterate_dir_with_backend(&RustBackend::new(), source_dir, dest_dir, config, events)
}

/// [`iterate_dir`] with a specific backend (allows testing with mock).
pub fn iterate_dir_with_backend(
    backend: &impl ImageBackend,
    source_dir: &Path,
    dest_dir: &Path,
    config: &ProcessingConfig,
    events: &EventSink,
) -> Result<BatchSummary, ProcessError> {
    let entries = list_entries(source_dir)?;
    let total = entries.len();
    let router = EntryRouter::new(config, backend, events);

    let mut summary = BatchSummary::default();
    for (index, name) in entries.iter().enumerate() {
        events.progress(index + 1, total);
        summary.record(&router.process(source_dir, dest_dir, name));
    }

    events.emit(ProcessEvent::Done {
        processed: summary.processed,
    });
    Ok(summary)
}

/// Process several source directories into one destination as one run.
pub fn process_dirs(
    sources: &[PathBuf],
    dest_dir: &Path,
    config: &ProcessingConfig,
    events: &EventSink,
) -> Result<BatchSummary, ProcessError> {
    process_dirs_with_backend(&RustBackend::new(), sources, dest_dir, config, events)
}

/// [`process_dirs`] with a specific backend (allows testing with mock).
pub fn process_dirs_with_backend(
    backend: &impl ImageBackend,
    sources: &[PathBuf],
    dest_dir: &Path,
    config: &ProcessingConfig,
    events: &EventSink,
) -> Result<BatchSummary, ProcessError> {
    let listings = sources
        .iter()
        .map(|dir| list_entries(dir).map(|names| (dir, names)))
        .collect::<Result<Vec<_>, _>>()?;
    let total: usize = listings.iter().map(|(_, names)| names.len()).sum();
    let router = EntryRouter::new(config, backend, events);

    let mut summary = BatchSummary::default();
    for (dir, names) in &listings {
        events.emit(ProcessEvent::DirectoryStarted {
            path: dir.to_path_buf(),
        });
        for name in names {
            events.progress(summary.processed + 1, total);
            summary.record(&router.process(dir, dest_dir, name));
        }
    }

    events.emit(ProcessEvent::Done {
        processed: summary.processed,
    });
    log::debug!("{summary:?}");
    Ok(summary)
}
