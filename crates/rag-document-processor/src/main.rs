use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::{error, info, warn};
use walkdir::WalkDir;

use rag_document_processor::config::Settings;
use rag_document_processor::document::DocumentLoader;
use rag_document_processor::ingest::DocumentProcessor;
use rag_document_processor::utils::logger;

fn main() -> Result<()> {
    logger::init_logger()?;

    let paths: Vec<PathBuf> = std::env::args_os().skip(1).map(PathBuf::from).collect();
    if paths.is_empty() {
        eprintln!("Usage: rag-document-processor <file-or-directory>...");
        std::process::exit(2);
    }

    let settings = Settings::load()?;
    let processor = DocumentProcessor::new(settings);

    info!("Starting document ingestion...");

    for path in &paths {
        if path.is_dir() {
            ingest_directory(&processor, path);
        } else {
            ingest_file(&processor, path);
        }
    }

    processor.metrics().print_summary();

    Ok(())
}

/// Ingest every supported file under the directory.
fn ingest_directory(processor: &DocumentProcessor, dir: &Path) {
    info!("Scanning directory: {:?}", dir);

    for entry in WalkDir::new(dir).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if !DocumentLoader::is_supported(path) {
            warn!("Skipping unsupported file: {:?}", path);
            continue;
        }

        ingest_file(processor, path);
    }
}

/// Process one file and emit its chunks as JSON lines on stdout.
fn ingest_file(processor: &DocumentProcessor, path: &Path) {
    match processor.process_file(path) {
        Ok(chunks) => {
            for chunk in &chunks {
                match serde_json::to_string(chunk) {
                    Ok(line) => println!("{}", line),
                    Err(e) => error!("Failed to serialize chunk: {}", e),
                }
            }
            info!("Processed {:?}: {} chunks", path, chunks.len());
        }
        Err(e) => {
            error!("Failed to process {:?}: {}", path, e);
        }
    }
}
