//! CLI output formatting for batch events.
//!
//! # Output Format
//!
//! ```text
//! Directory: /photos/card-1
//!    "IMG_0001.JPG" kept its name - does not contain creation date
//!    "Raw" skipped - is a directory
//!    "pano.jpg" not resized - panoramic image
//! Done, 42 entries processed
//! 40 copied, 0 moved, 0 written, 0 unchanged, 1 skipped, 1 failed
//! ```
//!
//! Progress ticks are only shown on request (`File 3/42`). With `--json`
//! every event is one JSON object per line instead.
//!
//! # Architecture
//!
//! Each output has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::events::{InfoEvent, InfoKind, ProcessEvent};
use crate::process::BatchSummary;

/// Indentation for per-file lines under a `Directory:` header.
const ENTRY_INDENT: &str = "   ";

fn info_message(kind: InfoKind) -> &'static str {
    match kind {
        InfoKind::SkippedDirectory => "skipped - is a directory",
        InfoKind::MissingCreationDate => "kept its name - does not contain creation date",
        InfoKind::ImageProcessingError => "transferred as is - could not be processed as an image",
        InfoKind::DestinationAlreadyExists => "skipped - destination already exists",
        InfoKind::MoveFailed => "could not be moved",
        InfoKind::CopyFailed => "could not be copied",
        InfoKind::PanoramicImageNotResized => "not resized - panoramic image",
    }
}

fn info_line(info: &InfoEvent) -> String {
    let base = format!(
        "{ENTRY_INDENT}\"{}\" {}",
        info.file_name,
        info_message(info.kind)
    );
    match &info.detail {
        Some(detail) => format!("{base} ({detail})"),
        None => base,
    }
}

/// Format one event as text lines. Progress ticks are dropped unless
/// `show_progress` is set.
pub fn format_event(event: &ProcessEvent, show_progress: bool) -> Vec<String> {
    match event {
        ProcessEvent::DirectoryStarted { path } => {
            vec![format!("Directory: {}", path.display())]
        }
        ProcessEvent::Progress(tick) if show_progress => {
            vec![format!("File {}/{}", tick.processed, tick.total)]
        }
        ProcessEvent::Progress(_) => Vec::new(),
        ProcessEvent::Info(info) => vec![info_line(info)],
        ProcessEvent::Done { processed } => {
            vec![format!("Done, {processed} entries processed")]
        }
    }
}

/// Format one event as a single JSON line.
pub fn format_event_json(event: &ProcessEvent) -> serde_json::Result<String> {
    serde_json::to_string(event)
}

/// Format the per-disposition tally printed after a text run.
pub fn format_summary(summary: &BatchSummary) -> Vec<String> {
    vec![format!(
        "{} copied, {} moved, {} written, {} unchanged, {} skipped, {} failed",
        summary.copied,
        summary.moved,
        summary.written,
        summary.unchanged,
        summary.skipped,
        summary.failed
    )]
}

/// Print one event to stdout, as text or as a JSON line.
pub fn print_event(event: &ProcessEvent, json: bool, show_progress: bool) {
    if json {
        match format_event_json(event) {
            Ok(line) => println!("{line}"),
            Err(e) => log::error!("cannot serialize event: {e}"),
        }
    } else {
        for line in format_event(event, show_progress) {
            println!("{line}");
        }
    }
}

pub fn print_summary(summary: &BatchSummary) {
    for line in format_summary(summary) {
        println!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::ProgressTick;
    use std::path::PathBuf;

    #[test]
    fn directory_header() {
        let event = ProcessEvent::DirectoryStarted {
            path: PathBuf::from("/photos/card-1"),
        };
        assert_eq!(format_event(&event, false), vec!["Directory: /photos/card-1"]);
    }

    #[test]
    fn info_line_without_detail() {
        let event = ProcessEvent::Info(InfoEvent::new(InfoKind::SkippedDirectory, "Raw"));
        assert_eq!(
            format_event(&event, false),
            vec!["   \"Raw\" skipped - is a directory"]
        );
    }

    #[test]
    fn info_line_with_detail() {
        let event = ProcessEvent::Info(InfoEvent::with_detail(
            InfoKind::MoveFailed,
            "a.jpg",
            "permission denied".into(),
        ));
        assert_eq!(
            format_event(&event, false),
            vec!["   \"a.jpg\" could not be moved (permission denied)"]
        );
    }

    #[test]
    fn every_kind_has_a_message() {
        let kinds = [
            InfoKind::SkippedDirectory,
            InfoKind::MissingCreationDate,
            InfoKind::ImageProcessingError,
            InfoKind::DestinationAlreadyExists,
            InfoKind::MoveFailed,
            InfoKind::CopyFailed,
            InfoKind::PanoramicImageNotResized,
        ];
        for kind in kinds {
            assert!(!info_message(kind).is_empty(), "{kind:?}");
        }
    }

    #[test]
    fn progress_hidden_by_default() {
        let event = ProcessEvent::Progress(ProgressTick {
            processed: 3,
            total: 42,
        });
        assert!(format_event(&event, false).is_empty());
        assert_eq!(format_event(&event, true), vec!["File 3/42"]);
    }

    #[test]
    fn done_line() {
        let event = ProcessEvent::Done { processed: 42 };
        assert_eq!(format_event(&event, false), vec!["Done, 42 entries processed"]);
    }

    #[test]
    fn json_line_is_tagged() {
        let event = ProcessEvent::Progress(ProgressTick {
            processed: 1,
            total: 2,
        });
        let line = format_event_json(&event).unwrap();
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["event"], "progress");
        assert_eq!(value["processed"], 1);
        assert_eq!(value["total"], 2);
    }

    #[test]
    fn summary_line() {
        let summary = BatchSummary {
            processed: 5,
            copied: 2,
            written: 1,
            skipped: 1,
            failed: 1,
            ..Default::default()
        };
        assert_eq!(
            format_summary(&summary),
            vec!["2 copied, 0 moved, 1 written, 0 unchanged, 1 skipped, 1 failed"]
        );
    }
}
