//! One-shot blob saves and content reads.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::TransferError;
use crate::naming::resolve_unique_name;

/// Save a complete blob into `dir` under a collision-free name.
///
/// Same disambiguation rule as the chunked path. Returns the resolved
/// filename.
pub fn save_blob(dir: &Path, filename: &str, bytes: &[u8]) -> Result<String, TransferError> {
    let resolved_name = resolve_unique_name(dir, filename);
    let mut file = File::create_new(dir.join(&resolved_name))?;
    file.write_all(bytes)?;
    file.sync_all()?;
    debug!(file = %resolved_name, bytes = bytes.len(), "blob saved");
    Ok(resolved_name)
}

/// Read an externally-provided file reference fully into memory.
///
/// Any I/O error maps to `None`; the caller surfaces that as a null bridge
/// reply rather than an exception in the hosted content.
pub fn read_content(path: &Path) -> Option<Vec<u8>> {
    match std::fs::read(path) {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "content read failed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_save_blob_avoids_existing_names() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("drawing.png"), b"old").unwrap();

        let name = save_blob(dir.path(), "drawing.png", b"new").unwrap();
        assert_eq!(name, "drawing(1).png");
        assert_eq!(fs::read(dir.path().join("drawing.png")).unwrap(), b"old");
        assert_eq!(fs::read(dir.path().join("drawing(1).png")).unwrap(), b"new");
    }

    #[test]
    fn test_read_content_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shared.bin");
        fs::write(&path, b"\x00\xffpayload").unwrap();
        assert_eq!(read_content(&path).unwrap(), b"\x00\xffpayload");
    }

    #[test]
    fn test_read_content_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(read_content(&dir.path().join("absent.bin")), None);
    }
}
