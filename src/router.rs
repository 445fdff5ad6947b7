//! Per-entry decision procedure.
//!
//! Given one directory entry, the router decides what happens to it based on
//! the [`ProcessingConfig`] flags and what the image backend says about the
//! file. Every regular file ends in exactly one [`Disposition`], and nothing
//! that goes wrong with a single file escapes as an error: anomalies are
//! reported through the [`EventSink`] and the batch moves on.
//!
//! ## Decision order
//!
//! ```text
//! directory?                         → SkippedDirectory event, untouched
//! neither rename nor resize?         → plain transfer
//! decode
//!   ├─ unrecognized format           → plain transfer (silent)
//!   └─ decode failure                → ImageProcessingError, plain transfer
//! rename?   timestamp → free name    (MissingCreationDate keeps the name)
//! resize?   fit + write, maybe remove source
//! else      same dir: rename in place or leave; other dir: move or copy
//! ```
//!
//! A metadata or encode failure after a successful decode is reported as
//! `ImageProcessingError` and also falls back to the plain transfer. The
//! encoder writes nothing on failure, so the fallback is still the only
//! write for that entry.
//!
//! ## Plain transfer
//!
//! Same source and destination directory: nothing to do. Otherwise move or
//! copy under the original name. Neither overwrites: an existing target is
//! reported as `DestinationAlreadyExists`.

use crate::config::ProcessingConfig;
use crate::events::{EventSink, InfoEvent, InfoKind};
use crate::imaging::{
    BackendError, DecodeOutcome, DecodedImage, ImageBackend, Quality, capture_timestamp,
    resize_image,
};
use crate::naming::{free_name, is_timestamp_name, timestamp_file_name};
use crate::transfer::{TransferError, copy_into, move_into, same_directory};
use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};

/// Terminal outcome for one directory entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    /// Entry is a directory.
    SkippedDirectory,
    /// File already sits at its destination under its final name.
    Unchanged,
    Copied(PathBuf),
    Moved(PathBuf),
    /// Re-encoded image written here.
    Written(PathBuf),
    /// Left in place; the reason was reported as an event.
    Failed,
}

/// Routes entries of one source directory into one destination directory.
pub struct EntryRouter<'a, B: ImageBackend> {
    config: &'a ProcessingConfig,
    backend: &'a B,
    events: &'a EventSink,
}

/// Source entry being routed, with its display name for events.
struct Entry<'p> {
    path: PathBuf,
    file_name: &'p OsStr,
    display: String,
}

impl Entry<'_> {
    fn report(&self, events: &EventSink, kind: InfoKind) {
        events.info(InfoEvent::new(kind, self.display.clone()));
    }

    fn report_detail(&self, events: &EventSink, kind: InfoKind, detail: impl ToString) {
        events.info(InfoEvent::with_detail(
            kind,
            self.display.clone(),
            detail.to_string(),
        ));
    }
}

impl<'a, B: ImageBackend> EntryRouter<'a, B> {
    pub fn new(config: &'a ProcessingConfig, backend: &'a B, events: &'a EventSink) -> Self {
        Self {
            config,
            backend,
            events,
        }
    }

    /// Route `source_dir/file_name` into `dest_dir`.
    pub fn process(&self, source_dir: &Path, dest_dir: &Path, file_name: &OsStr) -> Disposition {
        let entry = Entry {
            path: source_dir.join(file_name),
            file_name,
            display: file_name.to_string_lossy().into_owned(),
        };

        if entry.path.is_dir() {
            entry.report(self.events, InfoKind::SkippedDirectory);
            return Disposition::SkippedDirectory;
        }

        let same_dirs = same_directory(source_dir, dest_dir);
        if !self.config.inspects_images() {
            return self.plain_transfer(&entry, dest_dir, same_dirs);
        }

        let decoded = match self.backend.decode(&entry.path) {
            DecodeOutcome::Decoded(decoded) => decoded,
            DecodeOutcome::UnrecognizedFormat => {
                log::debug!("{}: not an image, transferring as is", entry.display);
                return self.plain_transfer(&entry, dest_dir, same_dirs);
            }
            DecodeOutcome::Failed(detail) => {
                entry.report_detail(self.events, InfoKind::ImageProcessingError, detail);
                return self.plain_transfer(&entry, dest_dir, same_dirs);
            }
        };

        match self.route_image(&entry, dest_dir, same_dirs, &decoded) {
            Ok(disposition) => disposition,
            Err(e) => {
                entry.report_detail(self.events, InfoKind::ImageProcessingError, e);
                self.plain_transfer(&entry, dest_dir, same_dirs)
            }
        }
    }

    fn route_image(
        &self,
        entry: &Entry<'_>,
        dest_dir: &Path,
        same_dirs: bool,
        decoded: &DecodedImage,
    ) -> Result<Disposition, BackendError> {
        let dest_name = if self.config.rename_to_creation_date {
            self.destination_name(entry, dest_dir, same_dirs, decoded)?
        } else {
            entry.file_name.to_os_string()
        };
        let renamed = dest_name.as_os_str() != entry.file_name;

        if self.config.resize_images {
            let target = dest_dir.join(&dest_name);
            if !same_dirs && target.symlink_metadata().is_ok() {
                entry.report_detail(
                    self.events,
                    InfoKind::DestinationAlreadyExists,
                    target.display(),
                );
                return Ok(Disposition::Failed);
            }

            let resized = resize_image(&decoded.image, self.config.resize_bigger_length);
            if resized.is_panoramic() {
                entry.report(self.events, InfoKind::PanoramicImageNotResized);
            }
            self.backend.save(
                &resized.image,
                decoded.exif.as_deref(),
                &target,
                Quality::new(self.config.resize_jpeg_quality),
            )?;

            let remove_source = if same_dirs {
                renamed
            } else {
                self.config.move_files
            };
            if remove_source {
                if let Err(e) = fs::remove_file(&entry.path) {
                    entry.report_detail(self.events, InfoKind::MoveFailed, e);
                }
            }
            return Ok(Disposition::Written(target));
        }

        let disposition = match (same_dirs, renamed) {
            (true, false) => Disposition::Unchanged,
            (true, true) => self.move_entry(entry, dest_dir, Some(dest_name.as_os_str())),
            (false, _) if self.config.move_files => {
                self.move_entry(entry, dest_dir, Some(dest_name.as_os_str()))
            }
            (false, _) => self.copy_entry(entry, dest_dir, Some(dest_name.as_os_str())),
        };
        Ok(disposition)
    }

    /// Collision-free timestamp name, or the original name when the image
    /// carries no capture timestamp.
    fn destination_name(
        &self,
        entry: &Entry<'_>,
        dest_dir: &Path,
        same_dirs: bool,
        decoded: &DecodedImage,
    ) -> Result<OsString, BackendError> {
        let Some(timestamp) = capture_timestamp(decoded)? else {
            entry.report(self.events, InfoKind::MissingCreationDate);
            return Ok(entry.file_name.to_os_string());
        };

        // Already named after its own timestamp, suffix included: keep it.
        if same_dirs && is_timestamp_name(&timestamp, entry.file_name) {
            return Ok(entry.file_name.to_os_string());
        }
        let candidate = timestamp_file_name(&timestamp, entry.file_name);
        Ok(free_name(&dest_dir.join(candidate)))
    }

    fn plain_transfer(&self, entry: &Entry<'_>, dest_dir: &Path, same_dirs: bool) -> Disposition {
        if same_dirs {
            Disposition::Unchanged
        } else if self.config.move_files {
            self.move_entry(entry, dest_dir, None)
        } else {
            self.copy_entry(entry, dest_dir, None)
        }
    }

    fn move_entry(&self, entry: &Entry<'_>, dest_dir: &Path, name: Option<&OsStr>) -> Disposition {
        match move_into(&entry.path, dest_dir, name) {
            Ok(dest) => Disposition::Moved(dest),
            Err(TransferError::AlreadyExists(dest)) => {
                entry.report_detail(
                    self.events,
                    InfoKind::DestinationAlreadyExists,
                    dest.display(),
                );
                Disposition::Failed
            }
            Err(e) => {
                entry.report_detail(self.events, InfoKind::MoveFailed, e);
                Disposition::Failed
            }
        }
    }

    fn copy_entry(&self, entry: &Entry<'_>, dest_dir: &Path, name: Option<&OsStr>) -> Disposition {
        match copy_into(&entry.path, dest_dir, name) {
            Ok(dest) => Disposition::Copied(dest),
            Err(TransferError::AlreadyExists(dest)) => {
                entry.report_detail(
                    self.events,
                    InfoKind::DestinationAlreadyExists,
                    dest.display(),
                );
                Disposition::Failed
            }
            Err(e) => {
                entry.report_detail(self.events, InfoKind::CopyFailed, e);
                Disposition::Failed
            }
        }
    }
}
