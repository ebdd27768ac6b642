// LogQuery - app/export.rs
//
// Saving a downloaded CSV payload to the destination the user chose.

use crate::core::export::count_csv_rows;
use crate::platform::fs::write_atomic;
use crate::util::error::ExportError;
use std::path::{Path, PathBuf};

/// Result of a saved export, kept for the status bar and "Show in folder".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOutcome {
    pub path: PathBuf,
    pub bytes: usize,
    /// Data rows in the payload; None when it could not be read as CSV.
    pub rows: Option<usize>,
}

impl ExportOutcome {
    pub fn summary(&self) -> String {
        match self.rows {
            Some(rows) => format!("Saved {rows} rows to {}", self.path.display()),
            None => format!("Saved {} bytes to {}", self.bytes, self.path.display()),
        }
    }
}

/// Write `payload` to `destination` atomically and count its rows.
///
/// A payload that is not well-formed CSV is still saved; the backend owns
/// the format and the user gets the file either way.
pub fn save_export(destination: &Path, payload: &[u8]) -> Result<ExportOutcome, ExportError> {
    write_atomic(destination, payload).map_err(|e| ExportError::Io {
        path: destination.to_path_buf(),
        source: e,
    })?;

    let rows = match count_csv_rows(payload) {
        Ok(n) => Some(n),
        Err(e) => {
            tracing::warn!(error = %e, path = %destination.display(), "Saved export is not valid CSV");
            None
        }
    };

    tracing::info!(
        path = %destination.display(),
        bytes = payload.len(),
        rows = ?rows,
        "Export saved"
    );

    Ok(ExportOutcome {
        path: destination.to_path_buf(),
        bytes: payload.len(),
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_counts_rows() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("logs.csv");
        let outcome = save_export(&dest, b"_id,info\na,x\nb,y\n").unwrap();
        assert_eq!(outcome.rows, Some(2));
        assert_eq!(outcome.bytes, 17);
        assert!(outcome.summary().starts_with("Saved 2 rows"));
        assert_eq!(std::fs::read(&dest).unwrap(), b"_id,info\na,x\nb,y\n");
    }

    #[test]
    fn test_non_csv_payload_still_saved() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("logs.csv");
        let outcome = save_export(&dest, b"_id\n\xff\n").unwrap();
        assert_eq!(outcome.rows, None);
        assert!(dest.exists());
        assert!(outcome.summary().contains("bytes"));
    }

    #[test]
    fn test_unwritable_destination_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be replaced by a file.
        let dest = dir.path().join("taken");
        std::fs::create_dir(&dest).unwrap();
        std::fs::write(dest.join("inner"), "x").unwrap();
        let result = save_export(&dest, b"_id\n");
        assert!(matches!(result, Err(ExportError::Io { .. })));
    }
}
