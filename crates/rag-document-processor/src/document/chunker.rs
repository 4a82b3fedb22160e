use std::collections::{BTreeMap, VecDeque};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::utils::error::IngestError;

/// Separator priority for PDF page text (coarsest first).
pub const PDF_SEPARATORS: [&str; 3] = ["\n", " ", ""];

/// Separator priority for plain text files.
pub const TEXT_SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Pdf,
    Txt,
}

impl SourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Pdf => "pdf",
            SourceType::Txt => "txt",
        }
    }
}

impl std::fmt::Display for SourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkMetadata {
    pub name: String,
    #[serde(rename = "type")]
    pub source_type: SourceType,
    /// Keys set by the upstream parser (e.g. page count), carried through.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    pub index: usize,
    pub content: String,
    pub char_count: usize,
    pub metadata: ChunkMetadata,
}

pub struct TextChunker {
    chunk_size: usize,
    chunk_overlap: usize,
    separators: Vec<String>,
}

impl TextChunker {
    pub fn new(
        chunk_size: usize,
        chunk_overlap: usize,
        separators: &[&str],
    ) -> Result<Self, IngestError> {
        if chunk_size == 0 {
            return Err(IngestError::InvalidConfig(
                "chunk_size must be greater than zero".to_string(),
            ));
        }
        if chunk_overlap >= chunk_size {
            return Err(IngestError::InvalidConfig(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                chunk_overlap, chunk_size
            )));
        }

        Ok(Self {
            chunk_size,
            chunk_overlap,
            separators: separators.iter().map(|s| s.to_string()).collect(),
        })
    }

    /// Split text into chunks of at most `chunk_size` characters.
    ///
    /// Separators stay attached to the piece they terminate and chunks are
    /// never trimmed, so concatenating chunks with overlaps removed yields
    /// the input unchanged.
    pub fn split(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }

        debug!("Chunking text: {} chars", char_len(text));

        let chunks = self.split_with(text, &self.separators);

        debug!("Created {} chunks", chunks.len());

        chunks
    }

    fn split_with(&self, text: &str, separators: &[String]) -> Vec<String> {
        // First separator that is empty or actually occurs in the text;
        // the ones after it are the fallbacks for oversized pieces.
        let mut separator = "";
        let mut fallbacks: &[String] = &[];
        for (i, sep) in separators.iter().enumerate() {
            if sep.is_empty() || text.contains(sep.as_str()) {
                separator = sep;
                fallbacks = &separators[i + 1..];
                break;
            }
        }

        let mut chunks = Vec::new();
        let mut pending: Vec<&str> = Vec::new();

        for piece in split_keeping_separator(text, separator) {
            if char_len(piece) < self.chunk_size {
                pending.push(piece);
                continue;
            }

            if !pending.is_empty() {
                chunks.extend(self.merge(&pending));
                pending.clear();
            }

            if fallbacks.is_empty() {
                // No finer split point permitted: emit the unit unchanged.
                warn!(
                    "Indivisible piece of {} chars exceeds chunk_size {}",
                    char_len(piece),
                    self.chunk_size
                );
                chunks.push(piece.to_string());
            } else {
                chunks.extend(self.split_with(piece, fallbacks));
            }
        }

        if !pending.is_empty() {
            chunks.extend(self.merge(&pending));
        }

        chunks
    }

    /// Greedily merge pieces up to `chunk_size`. After a chunk is emitted,
    /// trailing whole pieces totalling at most `chunk_overlap` characters
    /// are retained as the start of the next chunk.
    fn merge(&self, pieces: &[&str]) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut window: VecDeque<&str> = VecDeque::new();
        let mut total = 0usize;

        for &piece in pieces {
            let len = char_len(piece);

            if total + len > self.chunk_size && !window.is_empty() {
                chunks.push(window.iter().copied().collect::<String>());

                while total > self.chunk_overlap
                    || (total + len > self.chunk_size && total > 0)
                {
                    match window.pop_front() {
                        Some(front) => total -= char_len(front),
                        None => break,
                    }
                }
            }

            window.push_back(piece);
            total += len;
        }

        if !window.is_empty() {
            chunks.push(window.iter().copied().collect::<String>());
        }

        chunks
    }
}

/// Split on `separator`, keeping it at the end of each piece. The empty
/// separator splits at every character boundary.
fn split_keeping_separator<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    if separator.is_empty() {
        text.char_indices()
            .map(|(i, c)| &text[i..i + c.len_utf8()])
            .collect()
    } else {
        text.split_inclusive(separator).collect()
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}
