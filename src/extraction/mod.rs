//! Content Extraction
//!
//! Normalizes uploaded files into ordered text segments and flattens them into the
//! single text blob handed to the model.
//!
//! ```text
//! [UploadedFile] ──extract_all──▶ [ExtractedDocument] ──aggregate──▶ String
//!                 (spawn_blocking,    (one per input,
//!                  order kept)         never empty)
//! ```
//!
//! Per-file failures never escape this module: a file that cannot be parsed becomes
//! a single segment describing the error.

pub mod docx;
pub mod pdf;

use bytes::Bytes;
use futures::future::join_all;
use tracing::{info, warn};

pub const SEGMENT_SEPARATOR: &str = "\n\n";

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub bytes: Bytes,
}

impl UploadedFile {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedDocument {
    pub filename: String,
    pub segments: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Pdf,
    Docx,
    Unsupported,
}

impl FileKind {
    /// Dispatch is by extension only, case-insensitive.
    pub fn from_filename(filename: &str) -> Self {
        let lower = filename.to_ascii_lowercase();
        if lower.ends_with(".pdf") {
            FileKind::Pdf
        } else if lower.ends_with(".docx") {
            FileKind::Docx
        } else {
            FileKind::Unsupported
        }
    }
}

pub fn error_segment(filename: &str, error: impl std::fmt::Display) -> String {
    format!("Error processing file {}: {}", filename, error)
}

pub fn unsupported_segment(filename: &str) -> String {
    format!("{}\n------------\n\nUnsupported file type.", filename)
}

/// Synchronous, CPU-bound extraction of one file. Always yields at least one segment.
pub fn extract(file: &UploadedFile) -> ExtractedDocument {
    let filename = file.filename.as_str();

    let outcome = match FileKind::from_filename(filename) {
        FileKind::Pdf => pdf::extract_pdf(&file.bytes, filename).map_err(|e| e.to_string()),
        FileKind::Docx => docx::extract_docx(&file.bytes),
        FileKind::Unsupported => Ok(vec![unsupported_segment(filename)]),
    };

    let segments = match outcome {
        Ok(segments) if !segments.is_empty() => segments,
        Ok(_) => vec![error_segment(filename, "no content could be extracted")],
        Err(e) => {
            warn!(filename = %filename, error = %e, "Extraction failed");
            vec![error_segment(filename, e)]
        }
    };

    ExtractedDocument {
        filename: file.filename.clone(),
        segments,
    }
}

/// Extracts every file on the blocking pool. Files run concurrently; the output order
/// matches the input order. A panicking parser is contained to its own file.
pub async fn extract_all(files: Vec<UploadedFile>) -> Vec<ExtractedDocument> {
    let handles: Vec<_> = files
        .into_iter()
        .map(|file| {
            let filename = file.filename.clone();
            let handle = tokio::task::spawn_blocking(move || extract(&file));
            (filename, handle)
        })
        .collect();

    let (filenames, handles): (Vec<String>, Vec<_>) = handles.into_iter().unzip();
    let results = join_all(handles).await;

    let documents: Vec<ExtractedDocument> = filenames
        .into_iter()
        .zip(results)
        .map(|(filename, result)| match result {
            Ok(document) => document,
            Err(join_error) => {
                warn!(filename = %filename, error = %join_error, "Extraction task aborted");
                ExtractedDocument {
                    segments: vec![error_segment(&filename, join_error)],
                    filename,
                }
            }
        })
        .collect();

    info!(
        file_count = documents.len(),
        segment_count = documents.iter().map(|d| d.segments.len()).sum::<usize>(),
        "Extraction complete"
    );

    documents
}

/// Joins every segment of every document with a blank line, in order, untouched.
pub fn aggregate(documents: &[ExtractedDocument]) -> String {
    documents
        .iter()
        .map(|doc| doc.segments.join(SEGMENT_SEPARATOR))
        .collect::<Vec<_>>()
        .join(SEGMENT_SEPARATOR)
}
