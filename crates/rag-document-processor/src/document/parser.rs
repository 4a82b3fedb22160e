use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use lopdf::Document as PdfDocument;
use serde_json::Value;
use tracing::{debug, warn};

use crate::utils::error::IngestError;

/// Raw text pulled out of one source file, before chunking.
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    pub content: String,
    /// Metadata keys set by the parser (e.g. page count). Starts empty for
    /// plain text.
    pub metadata: BTreeMap<String, Value>,
}

pub struct DocumentParser;

impl DocumentParser {
    /// Extract text from a PDF, page by page in document order.
    pub fn parse_pdf(path: &Path) -> Result<ParsedDocument, IngestError> {
        let doc = PdfDocument::load(path)?;
        let pages = doc.get_pages();
        let page_count = pages.len();

        let mut content = String::new();

        for (page_num, _) in pages.iter() {
            match doc.extract_text(&[*page_num]) {
                Ok(text) => {
                    if !text.is_empty() {
                        content.push_str(&text);
                        content.push('\n');
                    }
                }
                Err(e) => {
                    warn!("Failed to extract text from page {}: {}", page_num, e);
                }
            }
        }

        debug!(
            "Extracted {} characters from {} pages of {:?}",
            content.len(),
            page_count,
            path
        );

        let mut metadata = BTreeMap::new();
        metadata.insert("pages".to_string(), Value::from(page_count as u64));

        Ok(ParsedDocument { content, metadata })
    }

    /// Read a plain text file. The content must be valid UTF-8.
    pub fn parse_text(path: &Path) -> Result<ParsedDocument, IngestError> {
        let raw = fs::read(path)?;

        let content = String::from_utf8(raw)
            .map_err(|_| IngestError::InvalidEncoding(path.display().to_string()))?;

        debug!("Read {} characters from {:?}", content.len(), path);

        Ok(ParsedDocument {
            content,
            metadata: BTreeMap::new(),
        })
    }
}

/// Build a minimal PDF with one page per text string. Test fixture shared
/// with the pipeline tests.
#[cfg(test)]
pub(crate) fn write_pdf(path: &Path, page_texts: &[&str]) {
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in page_texts {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_text_reads_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "hello\nworld\n").unwrap();

        let doc = DocumentParser::parse_text(&path).unwrap();
        assert_eq!(doc.content, "hello\nworld\n");
        assert!(doc.metadata.is_empty());
    }

    #[test]
    fn test_parse_text_rejects_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.txt");
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(&[0xff, 0xfe, 0x00, 0x41]).unwrap();
        drop(file);

        let err = DocumentParser::parse_text(&path).unwrap_err();
        assert!(matches!(err, IngestError::InvalidEncoding(_)));
    }

    #[test]
    fn test_parse_pdf_two_pages_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.pdf");
        write_pdf(&path, &["First page text", "Second page text"]);

        let doc = DocumentParser::parse_pdf(&path).unwrap();
        assert_eq!(doc.metadata.get("pages"), Some(&Value::from(2u64)));

        let first = doc.content.find("First page text").unwrap();
        let second = doc.content.find("Second page text").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_parse_pdf_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.pdf");
        fs::write(&path, "this is not a pdf").unwrap();

        let err = DocumentParser::parse_pdf(&path).unwrap_err();
        assert!(matches!(err, IngestError::PdfParse(_)));
    }
}
