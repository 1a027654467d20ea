// src/config/mod.rs
pub mod app;
pub mod models;
pub mod profile;

// Re-export commonly used types
pub use app::AppConfig;
pub use models::{AnalysisModel, ModelId, analysis_models};
pub use profile::{Settings, SettingsPatch, Theme, User, UserPatch};
