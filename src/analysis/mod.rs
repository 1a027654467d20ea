// src/analysis/mod.rs
pub mod filter;
pub mod lenient;
pub mod metrics;
pub mod normalize;
pub mod reports;
pub mod result;
pub mod strategy;

// Re-export commonly used types
pub use filter::{DateRange, HistoryFilter, TypeFilter};
pub use metrics::{compute, CloserTier, Metrics};
pub use normalize::{normalize, normalize_at, normalize_second_call, normalize_text, parse_response};
pub use result::{
    AnalysisResult,
    Outcome,
    Report,
    ResultId,
    ResultType,
    ScorePair,
    SCORE_CAP,
};
pub use strategy::SecondCallAnalysis;
