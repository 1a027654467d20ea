// src/analysis/metrics.rs
//! Aggregates over a (filtered) history. Everything here is a pure function
//! of the slice it is given; callers filter first.

use serde::Serialize;
use statrs::statistics::Statistics;
use std::fmt;

use crate::analysis::result::{AnalysisResult, Outcome, Report};

pub const NO_OBJECTION: &str = "Nenhuma";
pub const RECENT_SCORES_WINDOW: usize = 6;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum CloserTier {
    Junior,
    Pleno,
    Senior,
    NotAvailable,
}

impl CloserTier {
    pub fn from_hit_rate(hit_rate: f64) -> Self {
        if hit_rate <= 50.0 {
            CloserTier::Junior
        } else if hit_rate <= 75.0 {
            CloserTier::Pleno
        } else {
            CloserTier::Senior
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CloserTier::Junior => "Junior",
            CloserTier::Pleno => "Pleno",
            CloserTier::Senior => "Sênior",
            CloserTier::NotAvailable => "N/A",
        }
    }
}

impl fmt::Display for CloserTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SeriesPoint {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ComparisonPoint {
    pub label: String,
    pub closed: usize,
    pub lost: usize,
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct ResultsDistribution {
    pub closed: usize,
    pub lost: usize,
}

/// Score-percentage bands: excellent >= 85, good >= 70, fair >= 55.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct ScoreBands {
    pub excellent: usize,
    pub good: usize,
    pub fair: usize,
    pub poor: usize,
}

impl ScoreBands {
    fn add(&mut self, percentage: f64) {
        if percentage >= 85.0 {
            self.excellent += 1;
        } else if percentage >= 70.0 {
            self.good += 1;
        } else if percentage >= 55.0 {
            self.fair += 1;
        } else {
            self.poor += 1;
        }
    }
}

/// Aggregates backing both the dashboard and the performance view.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Metrics {
    pub total_calls: usize,
    /// closed / (closed + lost) * 100; other types are not counted.
    pub conversion_rate: f64,
    pub results_distribution: ResultsDistribution,
    pub score_bands: ScoreBands,
    /// Running conversion rate, one point per closed or lost call.
    pub conversion_series: Vec<SeriesPoint>,
    pub calls_comparison: Vec<ComparisonPoint>,
    /// Last entries on a 0-10 scale.
    pub recent_scores: Vec<SeriesPoint>,
    pub top_objection: String,
    /// Mean second-call adherence; `None` when no surgical report has one.
    pub strategic_execution_rate: Option<f64>,
    pub hit_rate: f64,
    pub tier: CloserTier,
}

pub fn compute(history: &[&AnalysisResult]) -> Metrics {
    let mut chronological = history.to_vec();
    chronological.sort_by_key(|r| r.created_at);

    let relevant: Vec<(Outcome, f64)> = chronological
        .iter()
        .filter_map(|r| Some((r.outcome()?, r.score().map_or(0.0, |s| s.percentage()))))
        .collect();

    let closed_pcts: Vec<f64> = relevant
        .iter()
        .filter(|(o, _)| *o == Outcome::Closed)
        .map(|(_, p)| *p)
        .collect();
    let lost_pcts: Vec<f64> = relevant
        .iter()
        .filter(|(o, _)| *o == Outcome::Lost)
        .map(|(_, p)| *p)
        .collect();

    let distribution = ResultsDistribution {
        closed: closed_pcts.len(),
        lost: lost_pcts.len(),
    };

    let mut score_bands = ScoreBands::default();
    for (_, pct) in &relevant {
        score_bands.add(*pct);
    }

    let hit_rate = hit_rate(&closed_pcts, &lost_pcts);
    let tier = if relevant.is_empty() {
        CloserTier::NotAvailable
    } else {
        CloserTier::from_hit_rate(hit_rate)
    };

    let (conversion_series, calls_comparison) = running_series(&relevant);

    Metrics {
        total_calls: history.len(),
        conversion_rate: rate(distribution.closed, distribution.closed + distribution.lost),
        results_distribution: distribution,
        score_bands,
        conversion_series,
        calls_comparison,
        recent_scores: recent_scores(&chronological),
        top_objection: top_objection(history),
        strategic_execution_rate: strategic_execution_rate(history),
        hit_rate,
        tier,
    }
}

fn rate(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn call_label(position: usize) -> String {
    format!("Call {position}")
}

fn mean(values: &[f64]) -> Option<f64> {
    // Statistics::mean is NaN on empty input.
    if values.is_empty() {
        None
    } else {
        Some(values.iter().mean())
    }
}

/// Mean of the closed and lost averages, using whichever exist.
fn hit_rate(closed_pcts: &[f64], lost_pcts: &[f64]) -> f64 {
    match (mean(closed_pcts), mean(lost_pcts)) {
        (Some(closed), Some(lost)) => (closed + lost) / 2.0,
        (Some(only), None) | (None, Some(only)) => only,
        (None, None) => 0.0,
    }
}

fn running_series(relevant: &[(Outcome, f64)]) -> (Vec<SeriesPoint>, Vec<ComparisonPoint>) {
    let mut closed = 0;
    let mut conversion = Vec::with_capacity(relevant.len());
    let mut comparison = Vec::with_capacity(relevant.len());
    for (i, (outcome, _)) in relevant.iter().enumerate() {
        if *outcome == Outcome::Closed {
            closed += 1;
        }
        let seen = i + 1;
        conversion.push(SeriesPoint {
            label: call_label(seen),
            value: round1(rate(closed, seen)),
        });
        comparison.push(ComparisonPoint {
            label: call_label(seen),
            closed,
            lost: seen - closed,
        });
    }
    (conversion, comparison)
}

fn recent_scores(chronological: &[&AnalysisResult]) -> Vec<SeriesPoint> {
    let skip = chronological.len().saturating_sub(RECENT_SCORES_WINDOW);
    chronological
        .iter()
        .enumerate()
        .skip(skip)
        .map(|(i, r)| SeriesPoint {
            label: call_label(i + 1),
            value: round1(r.score().map_or(0.0, |s| s.out_of_ten())),
        })
        .collect()
}

/// Most frequent trimmed objection; ties go to the one seen first.
fn top_objection(history: &[&AnalysisResult]) -> String {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for objection in history
        .iter()
        .flat_map(|r| r.anticipated_objections())
        .map(str::trim)
        .filter(|o| !o.is_empty())
    {
        match counts.iter_mut().find(|(seen, _)| *seen == objection) {
            Some((_, count)) => *count += 1,
            None => counts.push((objection, 1)),
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (objection, count) in counts {
        if best.map_or(true, |(_, top)| count > top) {
            best = Some((objection, count));
        }
    }
    best.map_or_else(|| NO_OBJECTION.to_string(), |(o, _)| o.to_string())
}

fn strategic_execution_rate(history: &[&AnalysisResult]) -> Option<f64> {
    let adherence: Vec<f64> = history
        .iter()
        .filter_map(|r| match &r.report {
            Report::RelatorioCirurgico(report) => report.second_call.as_ref(),
            _ => None,
        })
        .map(|analysis| analysis.adherence_score)
        .collect();
    mean(&adherence)
}
