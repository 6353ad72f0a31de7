//! Reads a folder of documents into memory and splits them into chunks.
//!
//! Paragraphs (blank-line separated) become chunks directly; oversized
//! paragraphs are re-split into overlapping word windows so no chunk blows
//! past the embedder's context.

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};

use crate::types::{Document, DocumentChunk};

const SUPPORTED_EXTENSIONS: &[&str] = &["txt", "md"];

#[derive(Debug, Clone)]
pub struct ChunkingConfig {
    pub max_tokens: usize,
    pub overlap_percent: f32,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self { max_tokens: 500, overlap_percent: 0.2 }
    }
}

#[derive(Default)]
pub struct DocumentLoader {
    chunking_config: ChunkingConfig,
}

impl DocumentLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chunking(chunking_config: ChunkingConfig) -> Self {
        Self { chunking_config }
    }

    /// Read every supported file under `docs_dir` (recursively, sorted).
    /// An empty or missing set of files is not an error.
    pub fn load_directory(&self, docs_dir: &Path) -> Result<Vec<Document>> {
        let files = self.list_supported_files(docs_dir);
        if files.is_empty() {
            tracing::warn!("No supported files found under {}", docs_dir.display());
            return Ok(vec![]);
        }
        let mut documents = Vec::with_capacity(files.len());
        for (file_index, file_path) in files.iter().enumerate() {
            tracing::debug!(
                "Reading file {}/{}: {}",
                file_index + 1,
                files.len(),
                file_path.display()
            );
            let text = self.read_file_content(file_path)?;
            documents.push(Document {
                doc_id: extract_doc_id(file_path, docs_dir),
                path: file_path.to_string_lossy().to_string(),
                text,
            });
        }
        Ok(documents)
    }

    /// Split loaded documents into embeddable chunks.
    pub fn chunk_documents(&self, documents: &[Document]) -> Vec<DocumentChunk> {
        let mut all_chunks = Vec::new();
        for document in documents {
            all_chunks.extend(self.chunk_document(document));
        }
        all_chunks
    }

    /// Convenience: load + chunk in one pass.
    pub fn process_directory(&self, docs_dir: &Path) -> Result<Vec<DocumentChunk>> {
        let documents = self.load_directory(docs_dir)?;
        let chunks = self.chunk_documents(&documents);
        tracing::info!(
            "Processed {} files into {} chunks",
            documents.len(),
            chunks.len()
        );
        Ok(chunks)
    }

    fn chunk_document(&self, document: &Document) -> Vec<DocumentChunk> {
        let paragraphs: Vec<&str> = document.text.split("\n\n").collect();
        let mut document_chunks = Vec::new();
        let mut chunk_index = 0;
        for paragraph in paragraphs {
            let paragraph = paragraph.trim();
            if paragraph.is_empty() {
                continue;
            }
            let tokens = count_tokens(paragraph);
            if tokens <= self.chunking_config.max_tokens {
                document_chunks.push(self.make_chunk(document, paragraph.to_string(), chunk_index));
                chunk_index += 1;
            } else {
                for sub_chunk in self.split_paragraph_with_overlap(paragraph) {
                    document_chunks.push(self.make_chunk(document, sub_chunk, chunk_index));
                    chunk_index += 1;
                }
            }
        }
        let total_chunks = document_chunks.len();
        for chunk in &mut document_chunks {
            chunk.total_chunks = total_chunks;
        }
        document_chunks
    }

    fn make_chunk(&self, document: &Document, content: String, chunk_index: usize) -> DocumentChunk {
        DocumentChunk {
            id: format!("{}:{}", document.doc_id, chunk_index),
            doc_id: document.doc_id.clone(),
            doc_path: document.path.clone(),
            content,
            chunk_index,
            total_chunks: 0,
        }
    }

    fn read_file_content(&self, file_path: &Path) -> Result<String> {
        match fs::read_to_string(file_path) {
            Ok(content) => Ok(content),
            Err(_) => Ok(String::from_utf8_lossy(&fs::read(file_path)?).to_string()),
        }
    }

    fn split_paragraph_with_overlap(&self, paragraph: &str) -> Vec<String> {
        let words: Vec<&str> = paragraph.split_whitespace().collect();
        let words_per_chunk = 300;
        let overlap_words = (words_per_chunk as f32 * self.chunking_config.overlap_percent) as usize;
        let mut chunks = Vec::new();
        let mut start = 0;
        while start < words.len() {
            let end = (start + words_per_chunk).min(words.len());
            chunks.push(words[start..end].join(" "));
            if end >= words.len() {
                break;
            }
            start = end - overlap_words;
        }
        chunks
    }

    fn list_supported_files(&self, root: &Path) -> Vec<PathBuf> {
        let mut files = Vec::new();
        for entry in walkdir::WalkDir::new(root)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let path = entry.path();
            if let Some(ext) = path.extension().and_then(|s| s.to_str()) {
                if SUPPORTED_EXTENSIONS.contains(&ext) {
                    files.push(path.to_path_buf());
                }
            }
        }
        files.sort();
        files
    }
}

// Doc ids come from the path relative to the docs dir, extension stripped,
// so same-named files in different subdirectories stay distinct
// ("x/notes.txt" -> "x/notes", "y/notes.txt" -> "y/notes").
fn extract_doc_id(file_path: &Path, root: &Path) -> String {
    let relative = file_path.strip_prefix(root).unwrap_or(file_path);
    let id = relative
        .with_extension("")
        .components()
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect::<Vec<_>>()
        .join("/");
    if id.is_empty() {
        file_path.to_string_lossy().to_string()
    } else {
        id
    }
}

// Rough words-to-tokens heuristic; good enough for chunk sizing.
fn count_tokens(text: &str) -> usize {
    let word_count = text.split_whitespace().count();
    (word_count as f32 / 0.75) as usize
}
