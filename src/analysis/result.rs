// src/analysis/result.rs
use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::analysis::reports::{LostCallReport, SuccessfulCallReport, VendaRealizadaReport};
use crate::analysis::strategy::{
    BaselineIndicacaoReport, RelatorioCirurgicoReport, SecondCallAnalysis, SegundaCallDossier,
};
use crate::config::AnalysisModel;

/// Max score every score-bearing report is normalized to.
pub const SCORE_CAP: f64 = 250.0;

/// Opaque identity of a result. Creation time is tracked separately.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct ResultId(Uuid);

impl ResultId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ResultId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ResultId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for ResultId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum ResultType {
    Successful,
    Lost,
    VendaRealizada,
    RelatorioCirurgico,
    RelatorioSegundaCall,
    BaselineIndicacao,
}

/// Business outcome of a call, for the types that count towards conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Closed,
    Lost,
}

impl ResultType {
    pub const ALL: [ResultType; 6] = [
        ResultType::Successful,
        ResultType::Lost,
        ResultType::VendaRealizada,
        ResultType::RelatorioCirurgico,
        ResultType::RelatorioSegundaCall,
        ResultType::BaselineIndicacao,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ResultType::Successful => "successful",
            ResultType::Lost => "lost",
            ResultType::VendaRealizada => "venda-realizada",
            ResultType::RelatorioCirurgico => "relatorio-cirurgico",
            ResultType::RelatorioSegundaCall => "relatorio-segunda-call",
            ResultType::BaselineIndicacao => "baseline-indicacao",
        }
    }

    /// `successful` and `venda-realizada` are two pipelines for the same
    /// closed sale; this is the only place the two tags are unioned.
    pub fn outcome(self) -> Option<Outcome> {
        match self {
            ResultType::Successful | ResultType::VendaRealizada => Some(Outcome::Closed),
            ResultType::Lost => Some(Outcome::Lost),
            ResultType::RelatorioCirurgico
            | ResultType::RelatorioSegundaCall
            | ResultType::BaselineIndicacao => None,
        }
    }
}

impl fmt::Display for ResultType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResultType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ResultType::ALL
            .into_iter()
            .find(|t| t.as_str() == value.trim())
            .ok_or_else(|| format!("unknown result type '{value}'"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScorePair {
    pub total: f64,
    pub max: f64,
}

impl ScorePair {
    pub fn percentage(&self) -> f64 {
        if self.max > 0.0 {
            self.total / self.max * 100.0
        } else {
            0.0
        }
    }

    pub fn out_of_ten(&self) -> f64 {
        self.percentage() / 10.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Report {
    #[serde(rename = "successful")]
    Successful(SuccessfulCallReport),
    #[serde(rename = "lost")]
    Lost(LostCallReport),
    #[serde(rename = "venda-realizada")]
    VendaRealizada(VendaRealizadaReport),
    #[serde(rename = "relatorio-cirurgico")]
    RelatorioCirurgico(RelatorioCirurgicoReport),
    #[serde(rename = "relatorio-segunda-call")]
    RelatorioSegundaCall(SegundaCallDossier),
    #[serde(rename = "baseline-indicacao")]
    BaselineIndicacao(BaselineIndicacaoReport),
}

impl Report {
    pub fn result_type(&self) -> ResultType {
        match self {
            Report::Successful(_) => ResultType::Successful,
            Report::Lost(_) => ResultType::Lost,
            Report::VendaRealizada(_) => ResultType::VendaRealizada,
            Report::RelatorioCirurgico(_) => ResultType::RelatorioCirurgico,
            Report::RelatorioSegundaCall(_) => ResultType::RelatorioSegundaCall,
            Report::BaselineIndicacao(_) => ResultType::BaselineIndicacao,
        }
    }

    pub fn score(&self) -> Option<ScorePair> {
        let (total, max) = match self {
            Report::Successful(r) => (r.total_score, r.total_max_score),
            Report::Lost(r) => (r.total_score, r.total_max_score),
            Report::VendaRealizada(r) => (r.total_score, r.total_max_score),
            Report::RelatorioCirurgico(_)
            | Report::RelatorioSegundaCall(_)
            | Report::BaselineIndicacao(_) => return None,
        };
        Some(ScorePair { total, max })
    }

    pub(crate) fn total_max_score_mut(&mut self) -> Option<&mut f64> {
        match self {
            Report::Successful(r) => Some(&mut r.total_max_score),
            Report::Lost(r) => Some(&mut r.total_max_score),
            Report::VendaRealizada(r) => Some(&mut r.total_max_score),
            Report::RelatorioCirurgico(_)
            | Report::RelatorioSegundaCall(_)
            | Report::BaselineIndicacao(_) => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub id: ResultId,
    pub created_at: DateTime<Utc>,
    pub file_name: String,
    pub closer_name: String,
    pub model: AnalysisModel,
    pub report: Report,
}

impl AnalysisResult {
    pub fn result_type(&self) -> ResultType {
        self.report.result_type()
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.result_type().outcome()
    }

    pub fn score(&self) -> Option<ScorePair> {
        self.report.score()
    }

    pub fn second_call(&self) -> Option<&SecondCallAnalysis> {
        match &self.report {
            Report::RelatorioCirurgico(r) => r.second_call.as_ref(),
            _ => None,
        }
    }

    /// Free-text objections the report expects the lead to raise, untrimmed.
    pub fn anticipated_objections(&self) -> Vec<&str> {
        match &self.report {
            Report::RelatorioCirurgico(r) => r
                .anticipated_objections
                .financial
                .objections
                .iter()
                .chain(r.anticipated_objections.credibility.objections.iter())
                .map(String::as_str)
                .collect(),
            Report::RelatorioSegundaCall(r) => {
                let objection = r.protocols.objection_containment.anticipated_objection.as_str();
                if objection.is_empty() { Vec::new() } else { vec![objection] }
            }
            _ => Vec::new(),
        }
    }

    /// Sets or clears the second-call analysis. Only surgical reports accept one.
    pub fn set_second_call(&mut self, analysis: Option<SecondCallAnalysis>) -> bool {
        match &mut self.report {
            Report::RelatorioCirurgico(r) => {
                r.second_call = analysis;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_unions_both_sale_tags() {
        assert_eq!(ResultType::Successful.outcome(), Some(Outcome::Closed));
        assert_eq!(ResultType::VendaRealizada.outcome(), Some(Outcome::Closed));
        assert_eq!(ResultType::Lost.outcome(), Some(Outcome::Lost));
        assert_eq!(ResultType::BaselineIndicacao.outcome(), None);
    }

    #[test]
    fn score_pair_guards_zero_max() {
        let pair = ScorePair { total: 10.0, max: 0.0 };
        assert_eq!(pair.percentage(), 0.0);
        let pair = ScorePair { total: 125.0, max: 250.0 };
        assert_eq!(pair.percentage(), 50.0);
        assert_eq!(pair.out_of_ten(), 5.0);
    }

    #[test]
    fn result_type_parses_wire_tags() {
        for t in ResultType::ALL {
            assert_eq!(t.as_str().parse::<ResultType>(), Ok(t));
        }
        assert!("preparacao-fechamento".parse::<ResultType>().is_err());
    }
}
