use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Settings {
    #[serde(default)]
    pub chunking: ChunkingConfig,
    #[serde(default)]
    pub ingest: IngestConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ChunkingConfig {
    /// Chunk size for PDF content, in characters
    #[serde(default = "default_pdf_chunk_size")]
    pub pdf_chunk_size: usize,
    /// Chunk size for plain text content, in characters
    #[serde(default = "default_text_chunk_size")]
    pub text_chunk_size: usize,
    #[serde(default = "default_chunk_overlap")]
    pub overlap: usize,
}

fn default_pdf_chunk_size() -> usize {
    500
}

fn default_text_chunk_size() -> usize {
    700
}

fn default_chunk_overlap() -> usize {
    100
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            pdf_chunk_size: default_pdf_chunk_size(),
            text_chunk_size: default_text_chunk_size(),
            overlap: default_chunk_overlap(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct IngestConfig {
    #[serde(default = "default_max_file_size_mb")]
    pub max_file_size_mb: u64,
}

fn default_max_file_size_mb() -> u64 {
    100
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: default_max_file_size_mb(),
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self> {
        // Load from environment first
        dotenvy::dotenv().ok();

        let config = Config::builder()
            // Load from config file
            .add_source(File::with_name("config/settings").required(false))
            // Override with environment variables (prefix: APP)
            // Example: APP_CHUNKING__OVERLAP=50
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings: Settings = config.try_deserialize()?;

        settings.validate()?;

        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.chunking.pdf_chunk_size == 0 || self.chunking.text_chunk_size == 0 {
            anyhow::bail!("chunk sizes must be greater than zero");
        }

        if self.chunking.overlap >= self.chunking.pdf_chunk_size
            || self.chunking.overlap >= self.chunking.text_chunk_size
        {
            anyhow::bail!(
                "chunk overlap ({}) must be smaller than the chunk sizes ({}/{})",
                self.chunking.overlap,
                self.chunking.pdf_chunk_size,
                self.chunking.text_chunk_size
            );
        }

        Ok(())
    }
}
