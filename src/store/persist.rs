//! Loading and atomically saving authorized keys files

use crate::error::{Error, Result};
use crate::keys::KeyTypeSet;
use crate::store::KeyFile;
use nix::unistd::{Gid, Uid, chown};
use std::fs::{self, Metadata};
use std::io::{self, Write};
use std::os::unix::fs::MetadataExt;
use std::path::Path;
use tempfile::NamedTempFile;

/// Load a key file from disk
///
/// A missing file yields an empty [`KeyFile`].
pub fn load(path: &Path, types: &KeyTypeSet) -> Result<KeyFile> {
    match fs::read(path) {
        Ok(content) => {
            let file = KeyFile::parse(content, types);
            tracing::debug!(
                path = %path.display(),
                lines = file.len(),
                keys = file.keys().count(),
                "Loaded key file"
            );
            Ok(file)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "Key file does not exist, starting empty");
            Ok(KeyFile::new())
        }
        Err(e) => Err(Error::file_io(
            format!("Failed to read key file '{}'", path.display()),
            e,
        )),
    }
}

/// Write a key file by replacing the target atomically
///
/// The content goes to a temporary file in the target's directory, which is
/// then renamed over the target. If the target exists its permissions and
/// ownership are carried over first. On any failure the temporary file is
/// removed and the target is left untouched.
pub fn save(path: &Path, file: &KeyFile) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| {
        Error::file_io(
            format!("Failed to create temporary file in '{}'", dir.display()),
            e,
        )
    })?;

    tmp.write_all(&file.render())
        .and_then(|()| tmp.as_file().sync_all())
        .map_err(|e| {
            Error::file_io(
                format!("Failed to write temporary file '{}'", tmp.path().display()),
                e,
            )
        })?;

    match fs::metadata(path) {
        Ok(meta) => copy_attributes(tmp.path(), &meta)?,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => {
            return Err(Error::file_io(
                format!("Failed to read metadata of '{}'", path.display()),
                e,
            ));
        }
    }

    tmp.persist(path).map_err(|e| Error::AtomicRename {
        path: path.display().to_string(),
        source: e.error,
    })?;

    tracing::info!(path = %path.display(), "Wrote key file");
    Ok(())
}

/// Give the temporary file the mode and owner of the file it replaces
fn copy_attributes(tmp: &Path, target: &Metadata) -> Result<()> {
    fs::set_permissions(tmp, target.permissions()).map_err(|e| {
        Error::file_io(
            format!("Failed to set permissions on '{}'", tmp.display()),
            e,
        )
    })?;

    let current = fs::metadata(tmp).map_err(|e| {
        Error::file_io(format!("Failed to read metadata of '{}'", tmp.display()), e)
    })?;
    if current.uid() != target.uid() || current.gid() != target.gid() {
        chown(
            tmp,
            Some(Uid::from_raw(target.uid())),
            Some(Gid::from_raw(target.gid())),
        )
        .map_err(|e| {
            Error::file_io(format!("Failed to change owner of '{}'", tmp.display()), e.into())
        })?;
    }

    Ok(())
}
