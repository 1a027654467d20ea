// src/analysis/reports.rs
// Score-bearing report bodies: successful call, lost call and completed sale.
use serde::{Serialize, Deserialize};
use serde_json::{Map, Value};

use super::lenient;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Benchmark {
    #[serde(deserialize_with = "lenient::number")]
    pub average: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub top: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalysisStep {
    #[serde(deserialize_with = "lenient::number")]
    pub id: f64,
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(deserialize_with = "lenient::number")]
    pub score: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub max_score: f64,
    #[serde(deserialize_with = "lenient::text")]
    pub status: String,
    #[serde(deserialize_with = "lenient::text")]
    pub description: String,
    #[serde(deserialize_with = "lenient::text")]
    pub specific_analysis: String,
    #[serde(deserialize_with = "lenient::text")]
    pub justification: String,
    #[serde(deserialize_with = "lenient::list")]
    pub strengths: Vec<String>,
    #[serde(deserialize_with = "lenient::list")]
    pub opportunities: Vec<String>,
    #[serde(deserialize_with = "lenient::object")]
    pub benchmark: Benchmark,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct BehavioralIndicator {
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(deserialize_with = "lenient::text")]
    pub description: String,
    #[serde(deserialize_with = "lenient::number")]
    pub score: f64,
    #[serde(deserialize_with = "lenient::text")]
    pub status: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct BehavioralProfile {
    #[serde(deserialize_with = "lenient::text")]
    pub identified_profile: String,
    #[serde(deserialize_with = "lenient::text")]
    pub adaptation_analysis: String,
    #[serde(deserialize_with = "lenient::text")]
    pub personalized_recommendations: String,
    #[serde(deserialize_with = "lenient::list")]
    pub recommended_phrases: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CsFeedback {
    #[serde(deserialize_with = "lenient::text")]
    pub summary: String,
    #[serde(deserialize_with = "lenient::text")]
    pub referral_opportunities: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Referral {
    #[serde(alias = "nome", deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(
        alias = "contato",
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::optional_text"
    )]
    pub contact: Option<String>,
    #[serde(alias = "contexto", deserialize_with = "lenient::text")]
    pub context: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct SuccessfulCallReport {
    #[serde(deserialize_with = "lenient::number")]
    pub total_score: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub total_max_score: f64,
    #[serde(deserialize_with = "lenient::text")]
    pub performance_summary: String,
    #[serde(deserialize_with = "lenient::text")]
    pub critical_moment: String,
    #[serde(deserialize_with = "lenient::text")]
    pub final_result: String,
    #[serde(deserialize_with = "lenient::list")]
    pub steps: Vec<AnalysisStep>,
    #[serde(deserialize_with = "lenient::list")]
    pub behavioral_indicators: Vec<BehavioralIndicator>,
    #[serde(deserialize_with = "lenient::optional", skip_serializing_if = "Option::is_none")]
    pub behavioral_profile: Option<BehavioralProfile>,
    #[serde(deserialize_with = "lenient::optional", skip_serializing_if = "Option::is_none")]
    pub cs_feedback: Option<CsFeedback>,
    #[serde(deserialize_with = "lenient::list")]
    pub referrals: Vec<Referral>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// --- Lost call ---

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StageScore {
    #[serde(rename = "etapa", deserialize_with = "lenient::number")]
    pub stage: f64,
    #[serde(rename = "nome", deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(rename = "nota", deserialize_with = "lenient::number")]
    pub score: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StageJustification {
    #[serde(rename = "nomeEtapa", deserialize_with = "lenient::text")]
    pub stage_name: String,
    /// Rendered as "X/10" by the generator.
    #[serde(rename = "nota", deserialize_with = "lenient::text")]
    pub grade: String,
    #[serde(rename = "porqueDaTecnica", deserialize_with = "lenient::text")]
    pub technique_rationale: String,
    #[serde(rename = "explicacaoEtapa", deserialize_with = "lenient::text")]
    pub stage_explanation: String,
    #[serde(rename = "oQueFezBem", deserialize_with = "lenient::text")]
    pub done_well: String,
    #[serde(rename = "pontosDeMelhoria", deserialize_with = "lenient::text")]
    pub improvements: String,
    #[serde(rename = "comoEstevaoFaria", deserialize_with = "lenient::text")]
    pub reference_approach: String,
    #[serde(rename = "cenarioSugerido", deserialize_with = "lenient::text")]
    pub suggested_scenario: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProfileStyles {
    #[serde(deserialize_with = "lenient::text")]
    pub dominante: String,
    #[serde(deserialize_with = "lenient::text")]
    pub influente: String,
    #[serde(deserialize_with = "lenient::text")]
    pub estavel: String,
    #[serde(deserialize_with = "lenient::text")]
    pub analitico: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LeadProfile {
    #[serde(rename = "perfilDoCliente", deserialize_with = "lenient::list")]
    pub client_profile: Vec<String>,
    #[serde(rename = "medosIdentificados", deserialize_with = "lenient::list")]
    pub fears: Vec<String>,
    #[serde(rename = "frasesQueFuncionam", deserialize_with = "lenient::object")]
    pub working_phrases: ProfileStyles,
    #[serde(rename = "estrategiaDeAbordagem", deserialize_with = "lenient::object")]
    pub approach: ProfileStyles,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StageHit {
    #[serde(rename = "nomeEtapa", deserialize_with = "lenient::text")]
    pub stage_name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ErrorCorrection {
    #[serde(rename = "nomeEtapa", deserialize_with = "lenient::text")]
    pub stage_name: String,
    #[serde(rename = "porqueFoiErro", deserialize_with = "lenient::text")]
    pub why_wrong: String,
    #[serde(rename = "oQueEleFalou", deserialize_with = "lenient::text")]
    pub what_was_said: String,
    #[serde(rename = "buscarNaBase", deserialize_with = "lenient::text")]
    pub knowledge_reference: String,
    #[serde(rename = "comoEstevaoFaria", deserialize_with = "lenient::text")]
    pub reference_approach: String,
    #[serde(rename = "porqueEhImportante", deserialize_with = "lenient::text")]
    pub why_it_matters: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BehavioralReadout {
    #[serde(rename = "perguntasEmocionaisRacionais", deserialize_with = "lenient::text")]
    pub question_balance: String,
    #[serde(rename = "usoFrasesSuporte", deserialize_with = "lenient::text")]
    pub support_phrases: String,
    #[serde(rename = "controleCall", deserialize_with = "lenient::text")]
    pub call_control: String,
    #[serde(rename = "postura", deserialize_with = "lenient::text")]
    pub posture: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ErrorPattern {
    #[serde(deserialize_with = "lenient::text")]
    pub excelente: String,
    #[serde(deserialize_with = "lenient::text")]
    pub bom: String,
    #[serde(deserialize_with = "lenient::text")]
    pub deficiente: String,
    #[serde(deserialize_with = "lenient::text")]
    pub critico: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CriticalError {
    #[serde(rename = "etapa", deserialize_with = "lenient::text")]
    pub stage: String,
    #[serde(rename = "nota", deserialize_with = "lenient::text")]
    pub grade: String,
    #[serde(rename = "oQueAconteceu", deserialize_with = "lenient::text")]
    pub what_happened: String,
    #[serde(rename = "porqueFoiFatal", deserialize_with = "lenient::text")]
    pub why_fatal: String,
    #[serde(deserialize_with = "lenient::text")]
    pub timestamp: String,
    #[serde(rename = "comoEstevaoFaria", deserialize_with = "lenient::text")]
    pub reference_approach: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Diagnosis8020 {
    #[serde(rename = "padraoDosErros", deserialize_with = "lenient::object")]
    pub error_pattern: ErrorPattern,
    #[serde(rename = "errosCriticos", deserialize_with = "lenient::list")]
    pub critical_errors: Vec<CriticalError>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LossMoment {
    #[serde(deserialize_with = "lenient::text")]
    pub timestamp: String,
    #[serde(rename = "oQueAconteceu", deserialize_with = "lenient::text")]
    pub what_happened: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CorrectionStrategy {
    #[serde(rename = "focoImediato", deserialize_with = "lenient::text")]
    pub immediate_focus: String,
    #[serde(rename = "proximaCall", deserialize_with = "lenient::text")]
    pub next_call: String,
    #[serde(rename = "scriptSalvaVidas", deserialize_with = "lenient::text")]
    pub rescue_script: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FinalDiagnosis {
    #[serde(rename = "diagnostico8020", deserialize_with = "lenient::object")]
    pub diagnosis_80_20: Diagnosis8020,
    #[serde(rename = "efeitoDomino", deserialize_with = "lenient::text")]
    pub domino_effect: String,
    #[serde(rename = "momentoExatoDaPerda", deserialize_with = "lenient::object")]
    pub loss_moment: LossMoment,
    #[serde(rename = "causaRaizDoErro", deserialize_with = "lenient::list")]
    pub root_causes: Vec<String>,
    #[serde(rename = "estrategiaDeCorrecao", deserialize_with = "lenient::object")]
    pub correction_strategy: CorrectionStrategy,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct LostCallReport {
    #[serde(deserialize_with = "lenient::number")]
    pub total_score: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub total_max_score: f64,
    /// Closer name as written in the transcript header.
    #[serde(rename = "nomeCloser", deserialize_with = "lenient::text")]
    pub header_closer_name: String,
    #[serde(rename = "pontuacaoPorEtapa", deserialize_with = "lenient::list")]
    pub stage_scores: Vec<StageScore>,
    #[serde(rename = "justificativaDetalhada", deserialize_with = "lenient::list")]
    pub justifications: Vec<StageJustification>,
    #[serde(rename = "perfilComportamental", deserialize_with = "lenient::object")]
    pub lead_profile: LeadProfile,
    #[serde(rename = "acertosIdentificados", deserialize_with = "lenient::list")]
    pub hits: Vec<StageHit>,
    #[serde(rename = "errosParaCorrecao", deserialize_with = "lenient::list")]
    pub corrections: Vec<ErrorCorrection>,
    #[serde(rename = "indicadoresComportamentais", deserialize_with = "lenient::object")]
    pub behavior: BehavioralReadout,
    #[serde(rename = "analiseFinal", deserialize_with = "lenient::object")]
    pub final_analysis: FinalDiagnosis,
    #[serde(deserialize_with = "lenient::optional", skip_serializing_if = "Option::is_none")]
    pub behavioral_profile: Option<BehavioralProfile>,
    #[serde(deserialize_with = "lenient::optional", skip_serializing_if = "Option::is_none")]
    pub cs_feedback: Option<CsFeedback>,
    #[serde(deserialize_with = "lenient::list")]
    pub referrals: Vec<Referral>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// --- Completed sale (three blocks) ---

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PositivePointDetail {
    #[serde(rename = "etapa", deserialize_with = "lenient::text")]
    pub stage: String,
    #[serde(rename = "oQueEleFalou", deserialize_with = "lenient::text")]
    pub what_was_said: String,
    #[serde(rename = "comoLeadReagiu", deserialize_with = "lenient::text")]
    pub lead_reaction: String,
    #[serde(rename = "porqueFuncionou", deserialize_with = "lenient::text")]
    pub why_it_worked: String,
    #[serde(rename = "referenciaEstevao", deserialize_with = "lenient::text")]
    pub reference: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PositivePoints {
    #[serde(rename = "descricao", deserialize_with = "lenient::text")]
    pub description: String,
    #[serde(rename = "detalhes", deserialize_with = "lenient::list")]
    pub details: Vec<PositivePointDetail>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CriticismDetail {
    #[serde(rename = "trechoCloser", deserialize_with = "lenient::text")]
    pub closer_excerpt: String,
    #[serde(rename = "respostaLead", deserialize_with = "lenient::text")]
    pub lead_response: String,
    #[serde(rename = "erro", deserialize_with = "lenient::text")]
    pub mistake: String,
    #[serde(rename = "comoEstevaoFaria", deserialize_with = "lenient::text")]
    pub reference_approach: String,
    #[serde(rename = "impacto", deserialize_with = "lenient::text")]
    pub impact: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConstructiveCriticism {
    #[serde(rename = "descricao", deserialize_with = "lenient::text")]
    pub description: String,
    #[serde(rename = "detalhes", deserialize_with = "lenient::list")]
    pub details: Vec<CriticismDetail>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FinalPraiseDetail {
    #[serde(rename = "reforcarPontos", deserialize_with = "lenient::text")]
    pub reinforce: String,
    #[serde(rename = "mostrar8020", deserialize_with = "lenient::text")]
    pub show_80_20: String,
    #[serde(rename = "focosDeTreino", deserialize_with = "lenient::text")]
    pub training_focus: String,
    #[serde(rename = "elogioPesado", deserialize_with = "lenient::text")]
    pub strong_praise: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FinalPraise {
    #[serde(rename = "descricao", deserialize_with = "lenient::text")]
    pub description: String,
    #[serde(rename = "detalhes", deserialize_with = "lenient::object")]
    pub details: FinalPraiseDetail,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct VendaRealizadaReport {
    #[serde(deserialize_with = "lenient::number")]
    pub total_score: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub total_max_score: f64,
    #[serde(rename = "pontosPositivos", deserialize_with = "lenient::object")]
    pub positive_points: PositivePoints,
    #[serde(rename = "criticaConstrutiva", deserialize_with = "lenient::object")]
    pub constructive_criticism: ConstructiveCriticism,
    #[serde(rename = "elogioFinal", deserialize_with = "lenient::object")]
    pub final_praise: FinalPraise,
    #[serde(deserialize_with = "lenient::list")]
    pub steps: Vec<AnalysisStep>,
    #[serde(deserialize_with = "lenient::optional", skip_serializing_if = "Option::is_none")]
    pub behavioral_profile: Option<BehavioralProfile>,
    #[serde(deserialize_with = "lenient::list")]
    pub referrals: Vec<Referral>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn lost_report_defaults_nested_lists() {
        let report: LostCallReport = serde_json::from_value(json!({
            "totalScore": 135,
            "analiseFinal": {"efeitoDomino": "pacto fraco"}
        }))
        .unwrap();
        assert_eq!(report.total_score, 135.0);
        assert!(report.stage_scores.is_empty());
        assert!(report.final_analysis.diagnosis_80_20.critical_errors.is_empty());
        assert_eq!(report.final_analysis.domino_effect, "pacto fraco");
    }

    #[test]
    fn unknown_keys_are_kept() {
        let report: SuccessfulCallReport = serde_json::from_value(json!({
            "totalScore": 200,
            "feedbackCS": "ótimo"
        }))
        .unwrap();
        assert_eq!(report.extra.get("feedbackCS"), Some(&json!("ótimo")));
    }

    #[test]
    fn referral_accepts_portuguese_keys() {
        let referral: Referral = serde_json::from_value(json!({
            "nome": "Ana", "contato": "ana@x.com", "contexto": "sócia"
        }))
        .unwrap();
        assert_eq!(referral.name, "Ana");
        assert_eq!(referral.contact.as_deref(), Some("ana@x.com"));
        assert_eq!(referral.context, "sócia");
    }
}
