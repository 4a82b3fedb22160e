pub mod settings;

pub use settings::{ChunkingConfig, IngestConfig, Settings};
