use std::path::Path;

use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::document::chunker::{
    Chunk, ChunkMetadata, SourceType, TextChunker, PDF_SEPARATORS, TEXT_SEPARATORS,
};
use crate::document::loader::DocumentLoader;
use crate::document::parser::{DocumentParser, ParsedDocument};
use crate::utils::error::IngestError;
use crate::utils::metrics::{Metrics, Timer};

/// Turns one input file into an ordered sequence of metadata-tagged chunks.
pub struct DocumentProcessor {
    settings: Settings,
    metrics: Metrics,
}

impl DocumentProcessor {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            metrics: Metrics::new(),
        }
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Extract, chunk and tag a PDF file.
    pub fn parse_pdf(&self, path: &Path) -> Result<Vec<Chunk>, IngestError> {
        let timer = Timer::new();
        let result = self.parse_pdf_inner(path);
        self.record(timer, result)
    }

    /// Read, chunk and tag a UTF-8 text file.
    pub fn parse_text(&self, path: &Path) -> Result<Vec<Chunk>, IngestError> {
        let timer = Timer::new();
        let result = self.parse_text_inner(path);
        self.record(timer, result)
    }

    /// Dispatch on file extension.
    pub fn process_file(&self, path: &Path) -> Result<Vec<Chunk>, IngestError> {
        debug!(
            "Dispatching {:?} ({})",
            path,
            DocumentLoader::detect_file_type(path)
        );

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match extension.as_deref() {
            Some("pdf") => self.parse_pdf(path),
            Some("txt") => self.parse_text(path),
            // Other text-based files go through the plain text path
            _ if DocumentLoader::is_supported(path) => self.parse_text(path),
            _ => Err(IngestError::UnsupportedFileType(path.display().to_string())),
        }
    }

    fn parse_pdf_inner(&self, path: &Path) -> Result<Vec<Chunk>, IngestError> {
        DocumentLoader::validate_file(path, self.settings.ingest.max_file_size_mb)?;

        info!("Parsing PDF: {:?}", path);

        let document = DocumentParser::parse_pdf(path)?;
        let chunker = TextChunker::new(
            self.settings.chunking.pdf_chunk_size,
            self.settings.chunking.overlap,
            &PDF_SEPARATORS,
        )?;

        let chunks = Self::tag_chunks(&chunker, document, display_name(path), SourceType::Pdf);

        if chunks.is_empty() {
            warn!("No extractable text in {:?}", path);
        } else {
            info!("Created {} chunks from {:?}", chunks.len(), path);
        }

        Ok(chunks)
    }

    fn parse_text_inner(&self, path: &Path) -> Result<Vec<Chunk>, IngestError> {
        DocumentLoader::validate_file(path, self.settings.ingest.max_file_size_mb)?;

        info!("Parsing text file: {:?}", path);

        let document = DocumentParser::parse_text(path)?;
        let chunker = TextChunker::new(
            self.settings.chunking.text_chunk_size,
            self.settings.chunking.overlap,
            &TEXT_SEPARATORS,
        )?;

        let chunks = Self::tag_chunks(&chunker, document, display_name(path), SourceType::Txt);

        if chunks.is_empty() {
            warn!("Text file {:?} is empty", path);
        } else {
            info!("Created {} chunks from {:?}", chunks.len(), path);
        }

        Ok(chunks)
    }

    /// Split the document and stamp every chunk with its source metadata.
    fn tag_chunks(
        chunker: &TextChunker,
        document: ParsedDocument,
        name: String,
        source_type: SourceType,
    ) -> Vec<Chunk> {
        chunker
            .split(&document.content)
            .into_iter()
            .enumerate()
            .map(|(index, content)| {
                let char_count = content.chars().count();
                Chunk {
                    index,
                    content,
                    char_count,
                    metadata: ChunkMetadata {
                        name: name.clone(),
                        source_type,
                        extra: document.metadata.clone(),
                    },
                }
            })
            .collect()
    }

    fn record(
        &self,
        timer: Timer,
        result: Result<Vec<Chunk>, IngestError>,
    ) -> Result<Vec<Chunk>, IngestError> {
        match &result {
            Ok(chunks) => {
                self.metrics.increment_documents_processed();
                self.metrics.add_chunks_created(chunks.len() as u64);
                self.metrics.add_processing_time(timer.elapsed());
            }
            Err(_) => {
                self.metrics.increment_documents_failed();
            }
        }
        result
    }
}

/// Base name of the source file, independent of the platform separator.
fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::parser::write_pdf;
    use std::fs;

    fn processor() -> DocumentProcessor {
        DocumentProcessor::new(Settings::default())
    }

    #[test]
    fn test_parse_text_tags_every_chunk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.txt");
        let text = (0..300)
            .map(|i| format!("word{}", i))
            .collect::<Vec<_>>()
            .join(" ");
        fs::write(&path, &text).unwrap();

        let chunks = processor().parse_text(&path).unwrap();

        assert!(chunks.len() >= 3);
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.index, i);
            assert!(chunk.char_count <= 700);
            assert_eq!(chunk.metadata.name, "sample.txt");
            assert_eq!(chunk.metadata.source_type, SourceType::Txt);
        }
    }

    #[test]
    fn test_small_two_page_pdf_yields_single_chunk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.pdf");
        write_pdf(&path, &["First page text", "Second page text"]);

        let chunks = processor().parse_pdf(&path).unwrap();

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].metadata.name, "report.pdf");
        assert_eq!(chunks[0].metadata.source_type, SourceType::Pdf);
        assert_eq!(
            chunks[0].metadata.extra.get("pages"),
            Some(&serde_json::Value::from(2u64))
        );
        assert!(chunks[0].content.contains("First page text"));
        assert!(chunks[0].content.contains("Second page text"));
    }

    #[test]
    fn test_empty_text_file_yields_no_chunks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.txt");
        fs::write(&path, "").unwrap();

        let chunks = processor().parse_text(&path).unwrap();
        assert!(chunks.is_empty());
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let err = processor()
            .parse_text(Path::new("/no/such/file.txt"))
            .unwrap_err();
        assert!(matches!(err, IngestError::FileNotFound(_)));
    }

    #[test]
    fn test_process_file_rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blob.bin");
        fs::write(&path, [0u8, 1, 2, 3]).unwrap();

        let err = processor().process_file(&path).unwrap_err();
        assert!(matches!(err, IngestError::UnsupportedFileType(_)));
    }

    #[test]
    fn test_chunk_serialization_shape() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("note.txt");
        fs::write(&path, "a short note").unwrap();

        let chunks = processor().parse_text(&path).unwrap();
        let json = serde_json::to_value(&chunks[0]).unwrap();

        assert_eq!(json["metadata"]["name"], "note.txt");
        assert_eq!(json["metadata"]["type"], "txt");
        assert_eq!(json["content"], "a short note");
    }

    #[test]
    fn test_metrics_track_outcomes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.txt");
        fs::write(&path, "some text to ingest").unwrap();

        let processor = processor();
        processor.parse_text(&path).unwrap();
        let _ = processor.parse_text(Path::new("/no/such/file.txt"));

        assert_eq!(processor.metrics().get_documents_processed(), 1);
        assert_eq!(processor.metrics().get_documents_failed(), 1);
        assert_eq!(processor.metrics().get_chunks_created(), 1);
    }
}
