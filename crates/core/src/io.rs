//! Thin load/save wrapper.
//!
//! The parser and formatter only ever see string buffers; file reading,
//! writing and extension validation live here so callers that own their
//! I/O can bypass this module entirely.

use crate::document::Document;
use crate::error::IoError;
use crate::formatter::format_document;
use std::path::Path;
use tracing::debug;

pub const BOARD_EXTENSION: &str = "kicad_pcb";

fn check_extension(path: &Path) -> Result<(), IoError> {
    if path.extension().and_then(|e| e.to_str()) != Some(BOARD_EXTENSION) {
        return Err(IoError::Extension {
            path: path.to_owned(),
        });
    }
    Ok(())
}

/// Read and parse a board file.
pub fn load_board(path: impl AsRef<Path>) -> Result<Document, IoError> {
    let path = path.as_ref();
    check_extension(path)?;
    let text = std::fs::read_to_string(path).map_err(|source| IoError::Read {
        path: path.to_owned(),
        source,
    })?;
    let doc = Document::parse(&text)?;
    debug!(path = %path.display(), bytes = text.len(), "loaded board");
    Ok(doc)
}

/// Serialize and write a board file.
pub fn save_board(doc: &Document, path: impl AsRef<Path>) -> Result<(), IoError> {
    let path = path.as_ref();
    check_extension(path)?;
    let text = format_document(doc);
    std::fs::write(path, &text).map_err(|source| IoError::Write {
        path: path.to_owned(),
        source,
    })?;
    debug!(path = %path.display(), bytes = text.len(), "saved board");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IoError;

    #[test]
    fn wrong_extension_is_rejected() {
        let err = load_board("/tmp/board.kicad_sch").unwrap_err();
        assert!(matches!(err, IoError::Extension { .. }));
    }

    #[test]
    fn round_trips_through_the_filesystem() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("board.kicad_pcb");
        let text = "(kicad_pcb (version 20241229) (generator \"pcbnew\")\n  (net 0 \"\")\n)\n";
        std::fs::write(&path, text).unwrap();

        let doc = load_board(&path).unwrap();
        let out = dir.path().join("out.kicad_pcb");
        save_board(&doc, &out).unwrap();
        assert_eq!(std::fs::read_to_string(&out).unwrap(), text);
    }

    #[test]
    fn missing_file_reports_read_error() {
        let err = load_board("/nonexistent/board.kicad_pcb").unwrap_err();
        assert!(matches!(err, IoError::Read { .. }));
    }
}
