//! Output sink for text payloads
//!
//! File writes go to a uniquely named hidden temp file beside the
//! destination, which is persisted over it once fully written. A failed
//! write never leaves a partial destination behind and never touches
//! other files in the directory.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::Builder;
use thiserror::Error;

use super::Destination;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Failed to write {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write to standard output")]
    Stdout(#[source] io::Error),
}

/// Writes a payload to its destination
///
/// An empty payload writes nothing and creates no file.
pub fn emit(payload: &str, destination: &Destination) -> Result<(), SinkError> {
    if payload.is_empty() {
        return Ok(());
    }

    match destination {
        Destination::Stdout => write_stdout(payload).map_err(SinkError::Stdout),
        Destination::File(path) => write_file(path, payload),
    }
}

fn write_stdout(payload: &str) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    out.write_all(payload.as_bytes())?;
    if !payload.ends_with('\n') {
        out.write_all(b"\n")?;
    }
    out.flush()
}

fn write_file(path: &Path, payload: &str) -> Result<(), SinkError> {
    let io_err = |source: io::Error| SinkError::Io {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    let prefix = format!(".{name}.");

    // Dropping the temp file on any error path removes it
    let mut temp = Builder::new()
        .prefix(&prefix)
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(io_err)?;
    temp.write_all(payload.as_bytes()).map_err(io_err)?;
    temp.as_file().sync_all().map_err(io_err)?;
    temp.persist(path).map_err(|e| io_err(e.error))?;

    Ok(())
}
