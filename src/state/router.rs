// src/state/router.rs
use serde::{Serialize, Deserialize};
use std::fmt;
use std::str::FromStr;

use crate::analysis::ResultType;

// Screen tracking
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum View {
    #[default]
    Dashboard,
    SuccessfulCallReport,
    LostCallReport,
    VendaRealizadaReport,
    RelatorioCirurgicoReport,
    RelatorioSegundaCallReport,
    BaselineIndicacaoReport,
    Settings,
    Performance,
}

impl View {
    pub const ALL: [View; 9] = [
        View::Dashboard,
        View::SuccessfulCallReport,
        View::LostCallReport,
        View::VendaRealizadaReport,
        View::RelatorioCirurgicoReport,
        View::RelatorioSegundaCallReport,
        View::BaselineIndicacaoReport,
        View::Settings,
        View::Performance,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            View::Dashboard => "dashboard",
            View::SuccessfulCallReport => "successful-call-report",
            View::LostCallReport => "lost-call-report",
            View::VendaRealizadaReport => "venda-realizada-report",
            View::RelatorioCirurgicoReport => "relatorio-cirurgico-report",
            View::RelatorioSegundaCallReport => "relatorio-segunda-call-report",
            View::BaselineIndicacaoReport => "baseline-indicacao-report",
            View::Settings => "settings",
            View::Performance => "performance",
        }
    }

    pub fn is_report(self) -> bool {
        !matches!(self, View::Dashboard | View::Settings | View::Performance)
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for View {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        View::ALL
            .into_iter()
            .find(|v| v.as_str() == value.trim())
            .ok_or_else(|| format!("unknown view '{value}'"))
    }
}

/// Report view that displays a result of the given type.
pub fn view_for(result_type: ResultType) -> View {
    match result_type {
        ResultType::Successful => View::SuccessfulCallReport,
        ResultType::Lost => View::LostCallReport,
        ResultType::VendaRealizada => View::VendaRealizadaReport,
        ResultType::RelatorioCirurgico => View::RelatorioCirurgicoReport,
        ResultType::RelatorioSegundaCall => View::RelatorioSegundaCallReport,
        ResultType::BaselineIndicacao => View::BaselineIndicacaoReport,
    }
}

/// Routing by raw type tag, as read from stored or external records.
pub fn view_for_tag(tag: &str) -> View {
    match tag.parse::<ResultType>() {
        Ok(result_type) => view_for(result_type),
        Err(_) => {
            tracing::debug!(tag, "unrecognized result type, routing to dashboard");
            View::Dashboard
        }
    }
}
