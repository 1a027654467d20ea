// src/service/replay.rs
//! File-backed collaborators for offline use: generator responses captured
//! ahead of time and a knowledge base kept on disk.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::analysis::{parse_response, AnalysisResult};
use crate::config::AnalysisModel;
use crate::service::collab::{KnowledgeSource, ReportGenerator};

/// Answers with previously captured generator output instead of calling a
/// model. The transcript is only logged.
#[derive(Debug, Clone, Default)]
pub struct ReplayGenerator {
    response: Option<PathBuf>,
}

impl ReplayGenerator {
    pub fn new(response: impl Into<PathBuf>) -> Self {
        Self { response: Some(response.into()) }
    }

    /// For sessions that only read history; every request fails.
    pub fn none() -> Self {
        Self::default()
    }

    async fn read(&self) -> Result<Value> {
        let path = self
            .response
            .as_ref()
            .ok_or_else(|| anyhow!("No captured response was provided"))?;
        let text = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read response file: {}", path.display()))?;
        Ok(parse_response(&text)?)
    }
}

#[async_trait]
impl ReportGenerator for ReplayGenerator {
    async fn generate(
        &self,
        transcript: &str,
        model: &AnalysisModel,
        knowledge: &str,
    ) -> Result<Value> {
        debug!(
            model = %model.id.as_str(),
            transcript_chars = transcript.chars().count(),
            knowledge_chars = knowledge.chars().count(),
            response = ?self.response,
            "replaying captured report"
        );
        self.read().await
    }

    async fn compare_second_call(
        &self,
        original: &AnalysisResult,
        transcript: &str,
    ) -> Result<Value> {
        debug!(
            original = %original.id,
            transcript_chars = transcript.chars().count(),
            "replaying captured second-call comparison"
        );
        self.read().await
    }
}

/// Knowledge base read from a file, or from every `.md`/`.txt` file in a
/// directory joined in name order.
#[derive(Debug, Clone)]
pub struct FileKnowledge {
    path: PathBuf,
}

impl FileKnowledge {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

fn is_knowledge_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("md") | Some("txt")
    )
}

#[async_trait]
impl KnowledgeSource for FileKnowledge {
    async fn fetch(&self) -> Result<String> {
        let meta = tokio::fs::metadata(&self.path)
            .await
            .with_context(|| format!("Knowledge base not found: {}", self.path.display()))?;
        if !meta.is_dir() {
            return tokio::fs::read_to_string(&self.path)
                .await
                .with_context(|| format!("Failed to read knowledge file: {}", self.path.display()));
        }

        let mut files = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.path).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if is_knowledge_file(&path) {
                files.push(path);
            }
        }
        files.sort();

        let mut sections = Vec::with_capacity(files.len());
        for path in files {
            let content = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("Failed to read knowledge file: {}", path.display()))?;
            sections.push(content);
        }
        Ok(sections.join("\n\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelId;
    use std::fs;

    #[tokio::test]
    async fn replays_fenced_responses() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resposta.json");
        fs::write(&path, "```json\n{\"totalScore\": 90}\n```").unwrap();

        let generator = ReplayGenerator::new(&path);
        let value = generator
            .generate("transcrição", &AnalysisModel::get(ModelId::NextLevel), "")
            .await
            .unwrap();
        assert_eq!(value["totalScore"], 90);
    }

    #[tokio::test]
    async fn missing_response_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let generator = ReplayGenerator::new(dir.path().join("nada.json"));
        assert!(generator
            .generate("x", &AnalysisModel::get(ModelId::Universal), "")
            .await
            .is_err());
    }

    #[tokio::test]
    async fn read_only_generator_refuses() {
        let plan = crate::analysis::normalize(
            serde_json::json!({}),
            &AnalysisModel::get(ModelId::RelatorioCirurgico),
            "c1.txt",
        )
        .unwrap();
        assert!(ReplayGenerator::none().compare_second_call(&plan, "x").await.is_err());
    }

    #[tokio::test]
    async fn directory_knowledge_joins_text_files_in_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.md"), "segundo").unwrap();
        fs::write(dir.path().join("a.txt"), "primeiro").unwrap();
        fs::write(dir.path().join("c.pdf"), "ignorado").unwrap();

        let text = FileKnowledge::new(dir.path()).fetch().await.unwrap();
        assert_eq!(text, "primeiro\n\nsegundo");
    }
}
