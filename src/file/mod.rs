// src/file/mod.rs
use anyhow::{Result, Context, anyhow};
use async_trait::async_trait;
use std::cmp::Reverse;
use std::path::{Path, PathBuf};
use std::fs;
use tracing::{debug, warn};

use crate::analysis::{AnalysisResult, ResultId, SecondCallAnalysis};
use crate::service::collab::AnalysisRepository;

pub mod records;
pub mod profile;
pub mod export;

pub use profile::Profile;

// Core trait for file operations
pub trait FileHandler<T> {
    fn load(&self, path: &Path) -> Result<T>;
    fn save(&self, data: &T, path: &Path) -> Result<()>;
}

const RECORDS_DIR: &str = "analyses";
const PROFILE_FILE: &str = "profile.ron";

/// Local store: one JSON file per result under `analyses/`, plus `profile.ron`.
#[derive(Debug, Clone)]
pub struct FileManager {
    data_dir: PathBuf,
    record_handler: records::RecordFileHandler,
}

impl FileManager {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            record_handler: records::RecordFileHandler::new(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn create_data_structure(&self) -> Result<()> {
        fs::create_dir_all(self.records_dir())
            .with_context(|| format!("Failed to create data directory: {}", self.data_dir.display()))?;
        Ok(())
    }

    fn records_dir(&self) -> PathBuf {
        self.data_dir.join(RECORDS_DIR)
    }

    fn record_path(&self, id: ResultId) -> PathBuf {
        self.records_dir().join(format!("{}.json", id))
    }

    pub fn save_record(&self, record: &AnalysisResult) -> Result<()> {
        self.create_data_structure()?;
        let path = self.record_path(record.id);
        self.record_handler.save(record, &path)?;
        debug!(id = %record.id, path = %path.display(), "saved analysis record");
        Ok(())
    }

    pub fn load_record(&self, id: ResultId) -> Result<AnalysisResult> {
        let path = self.record_path(id);
        if !path.exists() {
            return Err(anyhow!("Record not found: {}", id));
        }
        self.record_handler.load(&path)
    }

    /// Newest first. Unreadable files are skipped so one bad record does not
    /// hide the rest of the history.
    pub fn load_records(&self) -> Result<Vec<AnalysisResult>> {
        let dir = self.records_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut records = Vec::new();
        for entry in fs::read_dir(&dir)
            .with_context(|| format!("Failed to read directory: {}", dir.display()))?
        {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match self.record_handler.load(&path) {
                Ok(record) => records.push(record),
                Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable record"),
            }
        }

        records.sort_by_key(|r| Reverse(r.created_at));
        Ok(records)
    }

    /// Sets or clears the second-call comparison on a stored surgical report.
    pub fn update_second_call_record(
        &self,
        id: ResultId,
        analysis: Option<&SecondCallAnalysis>,
    ) -> Result<()> {
        let mut record = self.load_record(id)?;
        if !record.set_second_call(analysis.cloned()) {
            return Err(anyhow!(
                "Record {} is a {} report and has no second call",
                id,
                record.result_type()
            ));
        }
        self.record_handler.save(&record, &self.record_path(id))
    }

    /// A missing profile yields the default local identity.
    pub fn load_profile(&self) -> Result<Profile> {
        let path = self.data_dir.join(PROFILE_FILE);
        if !path.exists() {
            return Ok(Profile::default());
        }
        profile::ProfileFileHandler::new().load(&path)
    }

    pub fn save_profile(&self, profile: &Profile) -> Result<()> {
        fs::create_dir_all(&self.data_dir)?;
        profile::ProfileFileHandler::new().save(profile, &self.data_dir.join(PROFILE_FILE))
    }

    pub fn export_csv(&self, results: &[&AnalysisResult], path: &Path) -> Result<()> {
        let file = fs::File::create(path)
            .with_context(|| format!("Failed to create export file: {}", path.display()))?;
        export::write_history_csv(file, results)
    }
}

async fn blocking<T, F>(manager: &FileManager, f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce(FileManager) -> Result<T> + Send + 'static,
{
    let manager = manager.clone();
    tokio::task::spawn_blocking(move || f(manager))
        .await
        .context("File task panicked")?
}

#[async_trait]
impl AnalysisRepository for FileManager {
    async fn save(&self, record: &AnalysisResult) -> Result<()> {
        let record = record.clone();
        blocking(self, move |fm| fm.save_record(&record)).await
    }

    async fn update_second_call(
        &self,
        id: ResultId,
        analysis: Option<&SecondCallAnalysis>,
    ) -> Result<()> {
        let analysis = analysis.cloned();
        blocking(self, move |fm| fm.update_second_call_record(id, analysis.as_ref())).await
    }

    async fn load_all(&self) -> Result<Vec<AnalysisResult>> {
        blocking(self, |fm| fm.load_records()).await
    }
}
