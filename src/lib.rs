//! # Photos Sorter
//!
//! A batch engine for getting photos off a memory card and into an archive.
//! Every entry of a source directory is copied or moved into a destination
//! directory, optionally renamed to the moment the photo was taken and
//! optionally shrunk to a maximum size.
//!
//! # Architecture: One Worker, One Channel
//!
//! ```text
//! front-end thread                worker thread
//! ────────────────                ─────────────
//! validate config + dirs
//! spawn ───────────────────────▶  process::process_dirs
//!                                   list every source (snapshot)
//!                                   for each entry:
//!                                     Progress tick
//!                                     router::EntryRouter::process
//! print events ◀──── mpsc ──────     Info events
//!                                   Done
//! ```
//!
//! The worker is strictly sequential and never calls back into the front
//! end. Everything it has to say travels as a [`events::ProcessEvent`].
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `ProcessingConfig` TOML loading, validation, directory checks |
//! | [`events`] | Event types and the non-blocking [`events::EventSink`] |
//! | [`naming`] | Timestamp file names and `_2`, `_3` collision avoidance |
//! | [`imaging`] | Decode, EXIF capture time, resize planning, encode |
//! | [`transfer`] | Copy with metadata, move, same-directory check |
//! | [`router`] | Per-entry decision procedure |
//! | [`process`] | Batch orchestration over one or several directories |
//! | [`output`] | CLI formatting of events (text and JSON lines) |
//!
//! # Design Decisions
//!
//! ## Forward Progress Over Strictness
//!
//! A corrupt JPEG, a name clash or a permission problem on one file is
//! reported and skipped. Only an unreadable source directory stops a run.
//!
//! ## Nothing Is Overwritten
//!
//! Copies open their target with `create_new`, moves check first, renamed
//! files probe for a free `_N` suffix. The single exception is resizing an
//! image in place under its own name, which replaces the file atomically.
//!
//! ## Non-Images Pass Through
//!
//! The decoder answers "not an image" as a value, not an error. Text files,
//! videos and sidecars mixed into a card dump are transferred unchanged
//! without any noise.

pub mod config;
pub mod events;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod process;
pub mod router;
pub mod transfer;

#[cfg(test)]
pub(crate) mod test_helpers;
