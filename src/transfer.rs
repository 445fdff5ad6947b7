//! Filesystem primitives: copy with metadata, move, directory identity.
//!
//! Neither operation overwrites. An existing destination is reported as
//! [`TransferError::AlreadyExists`] and leaves both files untouched.

use filetime::FileTime;
use std::ffi::OsStr;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransferError {
    #[error("Destination already exists: {0}")]
    AlreadyExists(PathBuf),
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl TransferError {
    fn io(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::AlreadyExists {
            Self::AlreadyExists(path.to_path_buf())
        } else {
            Self::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

/// Whether two paths name the same directory.
///
/// Compares canonical paths so `./in` and `/abs/in` match; falls back to a
/// literal comparison when either side cannot be resolved.
pub fn same_directory(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

fn destination(src: &Path, dest_dir: &Path, dest_name: Option<&OsStr>) -> PathBuf {
    let name = dest_name
        .or_else(|| src.file_name())
        .unwrap_or_default();
    dest_dir.join(name)
}

/// Copy `src` into `dest_dir` (as `dest_name`, default the source's name),
/// preserving permissions and access/modification times.
pub fn copy_into(
    src: &Path,
    dest_dir: &Path,
    dest_name: Option<&OsStr>,
) -> Result<PathBuf, TransferError> {
    let dest = destination(src, dest_dir, dest_name);
    copy_file(src, &dest)?;
    Ok(dest)
}

fn copy_file(src: &Path, dest: &Path) -> Result<(), TransferError> {
    let metadata = fs::metadata(src).map_err(|e| TransferError::io(src, e))?;
    let mut reader = fs::File::open(src).map_err(|e| TransferError::io(src, e))?;
    let mut writer = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(dest)
        .map_err(|e| TransferError::io(dest, e))?;

    let atime = FileTime::from_last_access_time(&metadata);
    let mtime = FileTime::from_last_modification_time(&metadata);
    let copied = io::copy(&mut reader, &mut writer)
        .and_then(|_| writer.sync_all())
        .and_then(|_| filetime::set_file_handle_times(&writer, Some(atime), Some(mtime)))
        .and_then(|_| fs::set_permissions(dest, metadata.permissions()));
    drop(writer);
    // A failed copy leaves no destination behind.
    if let Err(e) = copied {
        let _ = fs::remove_file(dest);
        return Err(TransferError::io(dest, e));
    }
    Ok(())
}

/// Move `src` into `dest_dir` (as `dest_name`, default the source's name).
///
/// Uses a rename when possible and falls back to copy + delete across
/// filesystems. On any failure the source stays where it was.
pub fn move_into(
    src: &Path,
    dest_dir: &Path,
    dest_name: Option<&OsStr>,
) -> Result<PathBuf, TransferError> {
    let dest = destination(src, dest_dir, dest_name);
    if dest.symlink_metadata().is_ok() {
        return Err(TransferError::AlreadyExists(dest));
    }

    match fs::rename(src, &dest) {
        Ok(()) => Ok(dest),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            log::debug!("{} crosses devices, copying instead", src.display());
            copy_file(src, &dest)?;
            if let Err(e) = fs::remove_file(src) {
                let _ = fs::remove_file(&dest);
                return Err(TransferError::io(src, e));
            }
            Ok(dest)
        }
        Err(e) => Err(TransferError::io(src, e)),
    }
}
