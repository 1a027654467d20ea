// src/service/collab.rs
//! Boundaries to the outside world: the report generator, text extraction,
//! the knowledge base and record persistence.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::analysis::{AnalysisResult, ResultId, SecondCallAnalysis};
use crate::config::AnalysisModel;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Pdf,
    Text,
}

impl MediaType {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("pdf") => MediaType::Pdf,
            _ => MediaType::Text,
        }
    }
}

/// An uploaded transcript.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceDocument {
    pub name: String,
    pub media_type: MediaType,
    pub bytes: Vec<u8>,
}

impl SourceDocument {
    pub fn text(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            media_type: MediaType::Text,
            bytes: content.into().into_bytes(),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)
            .with_context(|| format!("Failed to read transcript {}", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self {
            name,
            media_type: MediaType::from_path(path),
            bytes,
        })
    }
}

/// One transcript, or a call split over two files.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    Single(SourceDocument),
    TwoPart(SourceDocument, SourceDocument),
}

#[async_trait]
pub trait ReportGenerator: Send + Sync {
    /// Returns the raw report payload for `model`. `knowledge` may be empty.
    async fn generate(
        &self,
        transcript: &str,
        model: &AnalysisModel,
        knowledge: &str,
    ) -> Result<Value>;

    /// Compares an executed second call against a surgical report.
    async fn compare_second_call(
        &self,
        original: &AnalysisResult,
        transcript: &str,
    ) -> Result<Value>;
}

#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract(&self, document: &SourceDocument) -> Result<String>;
}

#[async_trait]
pub trait KnowledgeSource: Send + Sync {
    async fn fetch(&self) -> Result<String>;
}

/// Best-effort record storage. Callers never wait on it for state changes.
#[async_trait]
pub trait AnalysisRepository: Send + Sync {
    async fn save(&self, record: &AnalysisResult) -> Result<()>;

    async fn update_second_call(
        &self,
        id: ResultId,
        analysis: Option<&SecondCallAnalysis>,
    ) -> Result<()>;

    /// Newest first.
    async fn load_all(&self) -> Result<Vec<AnalysisResult>>;
}

/// Decodes text documents. PDFs need a dedicated extractor.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextExtractor;

#[async_trait]
impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, document: &SourceDocument) -> Result<String> {
        match document.media_type {
            MediaType::Text => Ok(String::from_utf8_lossy(&document.bytes).into_owned()),
            MediaType::Pdf => Err(anyhow!(
                "no PDF extractor configured for '{}'",
                document.name
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn plain_text_extractor() {
        let doc = SourceDocument::text("call.txt", "Olá, tudo bem?");
        assert_eq!(PlainTextExtractor.extract(&doc).await.unwrap(), "Olá, tudo bem?");

        let pdf = SourceDocument {
            name: "call.pdf".into(),
            media_type: MediaType::Pdf,
            bytes: vec![0x25, 0x50, 0x44, 0x46],
        };
        assert!(PlainTextExtractor.extract(&pdf).await.is_err());
    }

    #[test]
    fn media_type_from_extension() {
        assert_eq!(MediaType::from_path(Path::new("a/b/CALL.PDF")), MediaType::Pdf);
        assert_eq!(MediaType::from_path(Path::new("call.txt")), MediaType::Text);
        assert_eq!(MediaType::from_path(Path::new("call")), MediaType::Text);
    }

    #[test]
    fn document_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transcricao.txt");
        fs::write(&path, "linha 1").unwrap();
        let doc = SourceDocument::from_path(&path).unwrap();
        assert_eq!(doc.name, "transcricao.txt");
        assert_eq!(doc.media_type, MediaType::Text);
        assert!(SourceDocument::from_path(&dir.path().join("missing.txt")).is_err());
    }
}
