pub mod config;
pub mod document;
pub mod ingest;
pub mod utils;

pub use config::Settings;
pub use document::{Chunk, ChunkMetadata, SourceType, TextChunker};
pub use ingest::DocumentProcessor;
pub use utils::error::IngestError;
