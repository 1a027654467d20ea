// src/file/records.rs
use super::FileHandler;
use crate::analysis::AnalysisResult;
use std::path::Path;
use std::fs;
use anyhow::{Result, Context};

/// Stored results are JSON: report bodies carry free-form generator content.
#[derive(Debug, Default, Clone, Copy)]
pub struct RecordFileHandler;

impl RecordFileHandler {
    pub fn new() -> Self {
        Self
    }
}

impl FileHandler<AnalysisResult> for RecordFileHandler {
    fn load(&self, path: &Path) -> Result<AnalysisResult> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read record: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse record: {}", path.display()))
    }

    fn save(&self, data: &AnalysisResult, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(data)?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write record: {}", path.display()))?;
        Ok(())
    }
}
