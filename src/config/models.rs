// src/config/models.rs
use serde::{Serialize, Deserialize};
use std::fmt;
use std::str::FromStr;

use crate::analysis::ResultType;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum ModelId {
    NextLevel,
    CallPerdida,
    VendaRealizada,
    RelatorioCirurgico,
    RelatorioSegundaCall,
    BaselineIndicacao,
    Universal,
}

impl ModelId {
    pub fn as_str(self) -> &'static str {
        match self {
            ModelId::NextLevel => "next-level",
            ModelId::CallPerdida => "call-perdida",
            ModelId::VendaRealizada => "venda-realizada",
            ModelId::RelatorioCirurgico => "relatorio-cirurgico",
            ModelId::RelatorioSegundaCall => "relatorio-segunda-call",
            ModelId::BaselineIndicacao => "baseline-indicacao",
            ModelId::Universal => "universal",
        }
    }

    /// Which report shape a model produces. `universal` reuses the lost-call schema.
    pub fn result_type(self) -> ResultType {
        match self {
            ModelId::CallPerdida | ModelId::Universal => ResultType::Lost,
            ModelId::VendaRealizada => ResultType::VendaRealizada,
            ModelId::NextLevel => ResultType::Successful,
            ModelId::RelatorioSegundaCall => ResultType::RelatorioSegundaCall,
            ModelId::RelatorioCirurgico => ResultType::RelatorioCirurgico,
            ModelId::BaselineIndicacao => ResultType::BaselineIndicacao,
        }
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelId {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "next-level" => Ok(ModelId::NextLevel),
            "call-perdida" => Ok(ModelId::CallPerdida),
            "venda-realizada" => Ok(ModelId::VendaRealizada),
            "relatorio-cirurgico" => Ok(ModelId::RelatorioCirurgico),
            "relatorio-segunda-call" => Ok(ModelId::RelatorioSegundaCall),
            "baseline-indicacao" => Ok(ModelId::BaselineIndicacao),
            "universal" => Ok(ModelId::Universal),
            other => Err(format!("unknown analysis model '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisModel {
    pub id: ModelId,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
}

struct CatalogEntry {
    id: ModelId,
    title: &'static str,
    description: &'static str,
    tags: &'static [&'static str],
}

const CATALOG: [CatalogEntry; 7] = [
    CatalogEntry {
        id: ModelId::NextLevel,
        title: "Next Level - 25 Etapas",
        description: "Análise completa de 25 etapas para vendas de alto valor, baseada no guia Next Level.",
        tags: &["Venda Realizada", "25 Etapas", "Next Level"],
    },
    CatalogEntry {
        id: ModelId::CallPerdida,
        title: "Call Perdida - 25 Etapas",
        description: "Framework completo de 25 etapas para diagnóstico profundo e plano de ação.",
        tags: &["Venda Perdida", "Diagnóstico", "25 Etapas"],
    },
    CatalogEntry {
        id: ModelId::VendaRealizada,
        title: "Venda Realizada",
        description: "Relatório estruturado em 3 blocos de performance.",
        tags: &["Venda Realizada", "Relatório"],
    },
    CatalogEntry {
        id: ModelId::RelatorioCirurgico,
        title: "Relatório Cirúrgico - 1ª Call",
        description: "Preparação estratégica para fechamento na segunda call.",
        tags: &["Estratégia", "Pré-Call", "Cirúrgico"],
    },
    CatalogEntry {
        id: ModelId::RelatorioSegundaCall,
        title: "GPS Segunda Call",
        description: "Dossiê Estratégico de Fechamento: O Guia da Venda Inevitável.",
        tags: &["Dossiê", "Estratégia", "Fechamento"],
    },
    CatalogEntry {
        id: ModelId::BaselineIndicacao,
        title: "Baseline para Indicação",
        description: "Ficha para mapear o estado do cliente e preparar para indicações futuras.",
        tags: &["Indicação", "Baseline", "CS"],
    },
    CatalogEntry {
        id: ModelId::Universal,
        title: "Universal",
        description: "Modelo adaptável para qualquer tipo de call.",
        tags: &["Universal"],
    },
];

impl AnalysisModel {
    pub fn get(id: ModelId) -> Self {
        // The catalog is exhaustive over ModelId.
        let entry = CATALOG
            .iter()
            .find(|e| e.id == id)
            .unwrap_or(&CATALOG[0]);
        Self {
            id: entry.id,
            title: entry.title.to_string(),
            description: entry.description.to_string(),
            tags: entry.tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    /// Resolves a free-form identifier. Unknown identifiers fall back to the
    /// model that yields a `successful` report.
    pub fn lookup(id: &str) -> Self {
        match id.parse::<ModelId>() {
            Ok(model_id) => Self::get(model_id),
            Err(_) => {
                tracing::debug!(model = id, "unknown analysis model, using next-level");
                Self::get(ModelId::NextLevel)
            }
        }
    }

    pub fn result_type(&self) -> ResultType {
        self.id.result_type()
    }
}

pub fn analysis_models() -> Vec<AnalysisModel> {
    CATALOG.iter().map(|e| AnalysisModel::get(e.id)).collect()
}
