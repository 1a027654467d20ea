// src/analysis/strategy.rs
// Strategy reports: first-call surgical report, second-call dossier and the
// referral baseline. None of these carry a score.
use serde::{Serialize, Deserialize};
use serde_json::{Map, Value};

use super::lenient;

/// Comparison of an executed second call against the surgical plan.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SecondCallAnalysis {
    /// 0-100.
    #[serde(rename = "pontuacaoAderencia", deserialize_with = "lenient::number")]
    pub adherence_score: f64,
    #[serde(rename = "acertos", deserialize_with = "lenient::list")]
    pub hits: Vec<String>,
    #[serde(rename = "melhorias", deserialize_with = "lenient::list")]
    pub improvements: Vec<String>,
    #[serde(rename = "feedbackGeral", deserialize_with = "lenient::text")]
    pub overall_feedback: String,
}

// --- Surgical report (first call) ---

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BasicCallData {
    #[serde(rename = "dataDaCall", deserialize_with = "lenient::text")]
    pub call_date: String,
    #[serde(rename = "nomeDoCloser", deserialize_with = "lenient::text")]
    pub closer_name: String,
    #[serde(deserialize_with = "lenient::text")]
    pub lead: String,
    #[serde(rename = "duracao", deserialize_with = "lenient::text")]
    pub duration: String,
    #[serde(deserialize_with = "lenient::text")]
    pub status: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ObjectionGroup {
    #[serde(rename = "objecoes", deserialize_with = "lenient::list")]
    pub objections: Vec<String>,
    #[serde(rename = "estrategiaContorno", deserialize_with = "lenient::text")]
    pub handling_strategy: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnticipatedObjections {
    #[serde(rename = "financeirasProvaveis", deserialize_with = "lenient::object")]
    pub financial: ObjectionGroup,
    #[serde(rename = "credibilidadeProvaveis", deserialize_with = "lenient::object")]
    pub credibility: ObjectionGroup,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SecondCallPlan {
    #[serde(rename = "conexao", deserialize_with = "lenient::list")]
    pub connection: Vec<String>,
    #[serde(rename = "apresentacaoDirecionada", deserialize_with = "lenient::list")]
    pub targeted_presentation: Vec<String>,
    #[serde(rename = "ancoragemPersonalizada", deserialize_with = "lenient::list")]
    pub personalized_anchoring: Vec<String>,
    #[serde(rename = "fechamento", deserialize_with = "lenient::list")]
    pub closing: Vec<String>,
}

/// Narrative sections (SPIN diagnosis, personal narratives, emotional
/// triggers, financial mapping, closing strategy, profile strategies) are
/// display-only and kept verbatim in `extra`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RelatorioCirurgicoReport {
    #[serde(rename = "dadosBasicos", deserialize_with = "lenient::object")]
    pub basic_data: BasicCallData,
    #[serde(rename = "focoEntregaveis", deserialize_with = "lenient::list")]
    pub deliverable_focus: Vec<String>,
    #[serde(rename = "objecoesAntecipadas", deserialize_with = "lenient::object")]
    pub anticipated_objections: AnticipatedObjections,
    #[serde(rename = "planoSegundaCall", deserialize_with = "lenient::object")]
    pub second_call_plan: SecondCallPlan,
    #[serde(rename = "checklistPreCall", deserialize_with = "lenient::list")]
    pub pre_call_checklist: Vec<String>,
    #[serde(rename = "lembreteFinal", deserialize_with = "lenient::text")]
    pub final_reminder: String,
    #[serde(
        rename = "analiseSegundaCall",
        deserialize_with = "lenient::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub second_call: Option<SecondCallAnalysis>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// --- Second-call dossier ---

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExecutiveSummary {
    #[serde(rename = "contexto", deserialize_with = "lenient::text")]
    pub context: String,
    #[serde(rename = "doresDeclaradas", deserialize_with = "lenient::text")]
    pub stated_pains: String,
    #[serde(rename = "impactoReal", deserialize_with = "lenient::text")]
    pub real_impact: String,
    #[serde(rename = "desejoCentral", deserialize_with = "lenient::text")]
    pub core_desire: String,
    #[serde(rename = "pontoDeMaiorInteresse", deserialize_with = "lenient::text")]
    pub main_interest: String,
    #[serde(rename = "realMotivoDaCompra", deserialize_with = "lenient::text")]
    pub real_buying_reason: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PsychologicalAnalysis {
    #[serde(rename = "perfilComportamental", deserialize_with = "lenient::text")]
    pub behavioral_profile: String,
    #[serde(rename = "comoSeComunicar", deserialize_with = "lenient::text")]
    pub how_to_communicate: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Briefing {
    #[serde(rename = "resumoExecutivo", deserialize_with = "lenient::object")]
    pub executive_summary: ExecutiveSummary,
    #[serde(rename = "analisePsicologica", deserialize_with = "lenient::object")]
    pub psychological_analysis: PsychologicalAnalysis,
    #[serde(rename = "palavrasEFrasesDeConexao", deserialize_with = "lenient::list")]
    pub connection_phrases: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ActionStep {
    #[serde(rename = "titulo", deserialize_with = "lenient::text")]
    pub title: String,
    #[serde(rename = "objetivo", deserialize_with = "lenient::text")]
    pub goal: String,
    #[serde(rename = "referenciaParaEstudo", deserialize_with = "lenient::text")]
    pub study_reference: String,
    #[serde(deserialize_with = "lenient::text")]
    pub script: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ActionPlan {
    #[serde(rename = "etapas", deserialize_with = "lenient::list")]
    pub steps: Vec<ActionStep>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ObjectionContainment {
    #[serde(rename = "objecaoAntecipada", deserialize_with = "lenient::text")]
    pub anticipated_objection: String,
    #[serde(rename = "protocoloDeResposta", deserialize_with = "lenient::text")]
    pub response_protocol: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AdvancedProtocols {
    #[serde(rename = "planoDeContencaoDeObjecoes", deserialize_with = "lenient::object")]
    pub objection_containment: ObjectionContainment,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SegundaCallDossier {
    #[serde(rename = "cliente", deserialize_with = "lenient::text")]
    pub client: String,
    #[serde(rename = "dataDaAnalise", deserialize_with = "lenient::text")]
    pub analysis_date: String,
    #[serde(rename = "ato1_briefing", deserialize_with = "lenient::object")]
    pub briefing: Briefing,
    #[serde(rename = "ato2_planoDeAcao", deserialize_with = "lenient::object")]
    pub action_plan: ActionPlan,
    #[serde(rename = "ato3_protocolosAvancados", deserialize_with = "lenient::object")]
    pub protocols: AdvancedProtocols,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// --- Referral baseline ---

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClientInfo {
    #[serde(rename = "nomeCompleto", deserialize_with = "lenient::text")]
    pub full_name: String,
    #[serde(rename = "dataVenda", deserialize_with = "lenient::text")]
    pub sale_date: String,
    #[serde(rename = "produtoServico", deserialize_with = "lenient::text")]
    pub product: String,
    #[serde(rename = "valorInvestimento", deserialize_with = "lenient::number")]
    pub investment: f64,
    #[serde(rename = "closerResponsavel", deserialize_with = "lenient::text")]
    pub responsible_closer: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct QuantifiedPain {
    #[serde(rename = "descricao", deserialize_with = "lenient::text")]
    pub description: String,
    #[serde(rename = "nota", deserialize_with = "lenient::number")]
    pub score: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LifeImpacts {
    #[serde(rename = "trabalhoProdutividade", deserialize_with = "lenient::number")]
    pub work: f64,
    #[serde(rename = "relacionamentos", deserialize_with = "lenient::number")]
    pub relationships: f64,
    #[serde(rename = "saudeEnergia", deserialize_with = "lenient::number")]
    pub health: f64,
    #[serde(rename = "financeiro", deserialize_with = "lenient::number")]
    pub financial: f64,
    #[serde(rename = "qualidadeDeVidaGeral", deserialize_with = "lenient::number")]
    pub overall: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Pains {
    #[serde(rename = "principal", deserialize_with = "lenient::object")]
    pub primary: QuantifiedPain,
    #[serde(rename = "secundario", deserialize_with = "lenient::object")]
    pub secondary: QuantifiedPain,
    #[serde(rename = "terciario", deserialize_with = "lenient::object")]
    pub tertiary: QuantifiedPain,
    #[serde(rename = "impactos", deserialize_with = "lenient::object")]
    pub impacts: LifeImpacts,
    #[serde(rename = "frequencia", deserialize_with = "lenient::text")]
    pub frequency: String,
    #[serde(rename = "tempoEnfrentando", deserialize_with = "lenient::text")]
    pub duration: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CurrentSituation {
    #[serde(rename = "faturamento", deserialize_with = "lenient::number")]
    pub revenue: f64,
    #[serde(rename = "resultado", deserialize_with = "lenient::text")]
    pub result: String,
    #[serde(rename = "metricaPrincipal", deserialize_with = "lenient::text")]
    pub main_metric: String,
    #[serde(rename = "outrasMetricas", deserialize_with = "lenient::list")]
    pub other_metrics: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NumericGoal {
    #[serde(rename = "ondeQuerChegar", deserialize_with = "lenient::number")]
    pub target: f64,
    #[serde(rename = "emQuantoTempo", deserialize_with = "lenient::text")]
    pub timeframe: String,
    #[serde(rename = "resultadoEsperado", deserialize_with = "lenient::text")]
    pub expected_result: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Expectations {
    #[serde(rename = "principal", deserialize_with = "lenient::text")]
    pub primary: String,
    #[serde(rename = "listaDesejos", deserialize_with = "lenient::list")]
    pub wishes: Vec<String>,
    #[serde(rename = "metaNumericaDeclarada", deserialize_with = "lenient::object")]
    pub numeric_goal: NumericGoal,
    #[serde(rename = "transformacaoEsperada", deserialize_with = "lenient::text")]
    pub expected_transformation: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EmotionalContext {
    #[serde(rename = "sentimentoDominante", deserialize_with = "lenient::text")]
    pub dominant_feeling: String,
    #[serde(rename = "palavrasChave", deserialize_with = "lenient::list")]
    pub keywords: Vec<String>,
    #[serde(rename = "consequenciaSeNaoResolver", deserialize_with = "lenient::text")]
    pub consequence_if_unsolved: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PreviousAttempt {
    #[serde(rename = "solucaoMetodo", deserialize_with = "lenient::text")]
    pub method: String,
    #[serde(rename = "investimento", deserialize_with = "lenient::number")]
    pub investment: f64,
    #[serde(rename = "tempo", deserialize_with = "lenient::text")]
    pub duration: String,
    #[serde(rename = "resultado", deserialize_with = "lenient::text")]
    pub result: String,
    #[serde(rename = "porQueNaoFuncionou", deserialize_with = "lenient::text")]
    pub why_it_failed: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PreviousAttempts {
    #[serde(rename = "jaTentou", deserialize_with = "lenient::flag")]
    pub tried_before: bool,
    #[serde(
        rename = "detalhes",
        deserialize_with = "lenient::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub details: Option<PreviousAttempt>,
    #[serde(rename = "principalObjecaoAtual", deserialize_with = "lenient::text")]
    pub main_current_objection: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StrategicNotes {
    #[serde(rename = "insightsCloser", deserialize_with = "lenient::text")]
    pub closer_insights: String,
    #[serde(rename = "frasesMarcantes", deserialize_with = "lenient::list")]
    pub memorable_phrases: Vec<String>,
    #[serde(rename = "gatilhosEmocionais", deserialize_with = "lenient::list")]
    pub emotional_triggers: Vec<String>,
    #[serde(rename = "objecoesVencidas", deserialize_with = "lenient::list")]
    pub overcome_objections: Vec<String>,
}

/// Commitment and referral-profile sections stay in `extra`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BaselineIndicacaoReport {
    #[serde(rename = "informacoesCliente", deserialize_with = "lenient::object")]
    pub client: ClientInfo,
    #[serde(rename = "doresQuantificadas", deserialize_with = "lenient::object")]
    pub pains: Pains,
    #[serde(rename = "situacaoAtual", deserialize_with = "lenient::object")]
    pub current_situation: CurrentSituation,
    #[serde(rename = "expectativasDesejos", deserialize_with = "lenient::object")]
    pub expectations: Expectations,
    #[serde(rename = "contextoEmocional", deserialize_with = "lenient::object")]
    pub emotional_context: EmotionalContext,
    #[serde(rename = "tentativasAnteriores", deserialize_with = "lenient::object")]
    pub previous_attempts: PreviousAttempts,
    #[serde(rename = "observacoesEstrategicas", deserialize_with = "lenient::object")]
    pub notes: StrategicNotes,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn surgical_report_keeps_narrative_sections() {
        let report: RelatorioCirurgicoReport = serde_json::from_value(json!({
            "dadosBasicos": {"nomeDoCloser": "Marina"},
            "diagnosticoSpin": {"situacaoAtual": {"faturamentoAtual": "R$ 40k"}},
            "objecoesAntecipadas": {"financeirasProvaveis": {"objecoes": ["Preço alto"]}}
        }))
        .unwrap();
        assert_eq!(report.basic_data.closer_name, "Marina");
        assert_eq!(report.anticipated_objections.financial.objections, vec!["Preço alto"]);
        assert!(report.anticipated_objections.credibility.objections.is_empty());
        assert!(report.extra.contains_key("diagnosticoSpin"));
        assert!(report.second_call.is_none());
    }

    #[test]
    fn second_call_analysis_is_lenient() {
        let analysis: SecondCallAnalysis = serde_json::from_value(json!({
            "pontuacaoAderencia": "82",
            "acertos": "não é lista"
        }))
        .unwrap();
        assert_eq!(analysis.adherence_score, 82.0);
        assert!(analysis.hits.is_empty());
        assert!(analysis.improvements.is_empty());
    }

    #[test]
    fn baseline_missing_attempt_details_is_none() {
        let report: BaselineIndicacaoReport = serde_json::from_value(json!({
            "informacoesCliente": {"valorInvestimento": 12000, "closerResponsavel": "Rafa"},
            "tentativasAnteriores": {"jaTentou": false}
        }))
        .unwrap();
        assert_eq!(report.client.investment, 12000.0);
        assert!(report.previous_attempts.details.is_none());
        assert!(!report.previous_attempts.tried_before);
    }

    #[test]
    fn null_fields_do_not_drop_action_steps() {
        let dossier: SegundaCallDossier = serde_json::from_value(json!({
            "cliente": null,
            "ato2_planoDeAcao": {"etapas": [
                {"titulo": "Reabrir", "objetivo": null, "script": 3},
                {"titulo": "Fechar"}
            ]}
        }))
        .unwrap();
        assert_eq!(dossier.client, "");
        assert_eq!(dossier.action_plan.steps.len(), 2);
        assert_eq!(dossier.action_plan.steps[0].goal, "");
        assert_eq!(dossier.action_plan.steps[0].script, "3");
    }
}
