//! Input resolution: load a user-supplied path into memory.
//!
//! The whole document is read up front; the decoder works from the byte
//! buffer and never touches the file again. We check the PDF magic bytes
//! (`%PDF`) before returning so callers get a meaningful error rather than
//! a pdfium parse failure.

use crate::error::Pdf2HtmlError;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Read a local PDF file into memory.
pub async fn read_input(path: impl AsRef<Path>) -> Result<Vec<u8>, Pdf2HtmlError> {
    let path = path.as_ref().to_path_buf();

    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::PermissionDenied => {
            return Err(Pdf2HtmlError::PermissionDenied { path });
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(Pdf2HtmlError::FileNotFound { path });
        }
        Err(e) => {
            return Err(Pdf2HtmlError::Internal(format!(
                "Failed to read '{}': {}",
                path.display(),
                e
            )));
        }
    };

    check_magic(&path, &bytes)?;
    debug!("Read local PDF: {} ({} bytes)", path.display(), bytes.len());
    Ok(bytes)
}

/// Reject buffers that do not start with `%PDF`.
///
/// Buffers shorter than four bytes are left for the decoder to reject.
pub fn check_magic(path: &Path, bytes: &[u8]) -> Result<(), Pdf2HtmlError> {
    if bytes.len() >= 4 && &bytes[..4] != b"%PDF" {
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&bytes[..4]);
        return Err(Pdf2HtmlError::NotAPdf {
            path: PathBuf::from(path),
            magic,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn magic_accepts_pdf_header() {
        assert!(check_magic(Path::new("a.pdf"), b"%PDF-1.7\n...").is_ok());
    }

    #[test]
    fn magic_rejects_other_formats() {
        let err = check_magic(Path::new("a.png"), b"\x89PNG\r\n").unwrap_err();
        assert!(matches!(err, Pdf2HtmlError::NotAPdf { magic, .. } if &magic == b"\x89PNG"));
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let err = read_input("/definitely/not/here.pdf").await.unwrap_err();
        assert!(matches!(err, Pdf2HtmlError::FileNotFound { .. }), "got {err:?}");
    }

    #[tokio::test]
    async fn reads_pdf_bytes() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"%PDF-1.4\n%%EOF\n").unwrap();
        let bytes = read_input(tmp.path()).await.unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn rejects_text_file() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"hello world").unwrap();
        let err = read_input(tmp.path()).await.unwrap_err();
        assert!(matches!(err, Pdf2HtmlError::NotAPdf { .. }));
    }
}
