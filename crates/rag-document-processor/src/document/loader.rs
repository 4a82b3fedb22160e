use std::fs;
use std::path::Path;

use mime_guess::mime;
use tracing::debug;

use crate::utils::error::IngestError;

pub struct DocumentLoader;

impl DocumentLoader {
    /// Check that the path points at an ingestible file.
    pub fn validate_file(path: &Path, max_size_mb: u64) -> Result<(), IngestError> {
        if !path.exists() {
            return Err(IngestError::FileNotFound(path.display().to_string()));
        }

        if !path.is_file() {
            return Err(IngestError::FileNotFound(path.display().to_string()));
        }

        let metadata = fs::metadata(path)?;
        let size_mb = metadata.len() / 1024 / 1024;

        if size_mb > max_size_mb {
            return Err(IngestError::FileTooLarge(size_mb, max_size_mb));
        }

        Ok(())
    }

    /// Detect MIME type from path
    pub fn detect_file_type(path: &Path) -> String {
        let mime = mime_guess::from_path(path).first_or_octet_stream();
        let file_type = mime.essence_str().to_string();

        debug!("Detected file type: {} for {:?}", file_type, path);

        file_type
    }

    /// Check if file is supported for text extraction
    pub fn is_supported(path: &Path) -> bool {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match extension.as_deref() {
            Some("pdf") | Some("txt") => true,

            // Other text-based formats ingest through the plain text path
            Some("md") | Some("log") | Some("csv") => true,

            _ => {
                // Check MIME type as fallback
                let mime = mime_guess::from_path(path).first();
                matches!(mime, Some(m) if m.type_() == mime::TEXT)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_missing_file() {
        let err = DocumentLoader::validate_file(Path::new("/no/such/file.txt"), 100).unwrap_err();
        assert!(matches!(err, IngestError::FileNotFound(_)));
    }

    #[test]
    fn test_validate_rejects_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = DocumentLoader::validate_file(dir.path(), 100).unwrap_err();
        assert!(matches!(err, IngestError::FileNotFound(_)));
    }

    #[test]
    fn test_validate_rejects_oversized_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.txt");
        fs::write(&path, vec![b'x'; 2 * 1024 * 1024]).unwrap();

        let err = DocumentLoader::validate_file(&path, 1).unwrap_err();
        assert!(matches!(err, IngestError::FileTooLarge(2, 1)));
    }

    #[test]
    fn test_supported_extensions() {
        assert!(DocumentLoader::is_supported(Path::new("report.pdf")));
        assert!(DocumentLoader::is_supported(Path::new("notes.txt")));
        assert!(DocumentLoader::is_supported(Path::new("README.md")));
        assert!(!DocumentLoader::is_supported(Path::new("image.png")));
        assert!(!DocumentLoader::is_supported(Path::new("data.bin")));
    }

    #[test]
    fn test_detect_file_type() {
        assert_eq!(
            DocumentLoader::detect_file_type(Path::new("report.pdf")),
            "application/pdf"
        );
        assert_eq!(
            DocumentLoader::detect_file_type(Path::new("notes.txt")),
            "text/plain"
        );
    }
}
