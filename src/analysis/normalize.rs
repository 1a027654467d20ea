// src/analysis/normalize.rs
//! Turns generator payloads into typed `AnalysisResult`s.
//!
//! Payloads are untrusted: missing or wrong-typed fields are defaulted by the
//! lenient decoders on the report structs. Only a payload that is not a JSON
//! object at all is rejected.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::analysis::result::{AnalysisResult, Report, ResultId, SCORE_CAP};
use crate::analysis::strategy::SecondCallAnalysis;
use crate::config::AnalysisModel;
use crate::error::AnalysisError;

pub const UNKNOWN_CLOSER: &str = "N/A";

/// Envelope keys owned by `AnalysisResult`, never copied into report bodies.
const RESERVED_KEYS: [&str; 5] = ["id", "type", "fileName", "model", "closerName"];

pub fn normalize(
    raw: Value,
    model: &AnalysisModel,
    file_name: &str,
) -> Result<AnalysisResult, AnalysisError> {
    normalize_at(raw, model, file_name, Utc::now())
}

pub fn normalize_at(
    raw: Value,
    model: &AnalysisModel,
    file_name: &str,
    created_at: DateTime<Utc>,
) -> Result<AnalysisResult, AnalysisError> {
    let Value::Object(mut body) = raw else {
        return Err(AnalysisError::MalformedResponse(format!(
            "expected a JSON object, got {}",
            describe(&raw)
        )));
    };

    let closer_name = closer_name(&body);
    for key in RESERVED_KEYS {
        body.remove(key);
    }

    let result_type = model.result_type();
    body.insert("type".to_string(), Value::String(result_type.as_str().to_string()));
    let mut report: Report = serde_json::from_value(Value::Object(body))
        .map_err(|e| AnalysisError::MalformedResponse(e.to_string()))?;

    if let Some(max) = report.total_max_score_mut() {
        if *max != SCORE_CAP {
            warn!(
                found = *max,
                corrected = SCORE_CAP,
                report_type = %result_type,
                "correcting totalMaxScore"
            );
            *max = SCORE_CAP;
        }
    }

    Ok(AnalysisResult {
        id: ResultId::new(),
        created_at,
        file_name: file_name.to_string(),
        closer_name,
        model: model.clone(),
        report,
    })
}

/// Parses raw generator text, tolerating a surrounding markdown code fence.
pub fn normalize_text(
    text: &str,
    model: &AnalysisModel,
    file_name: &str,
) -> Result<AnalysisResult, AnalysisError> {
    normalize(parse_response(text)?, model, file_name)
}

/// Decodes raw generator text into JSON, tolerating a markdown code fence.
pub fn parse_response(text: &str) -> Result<Value, AnalysisError> {
    serde_json::from_str(strip_code_fence(text))
        .map_err(|e| AnalysisError::MalformedResponse(e.to_string()))
}

pub fn normalize_second_call(raw: Value) -> Result<SecondCallAnalysis, AnalysisError> {
    if !raw.is_object() {
        return Err(AnalysisError::MalformedResponse(format!(
            "expected a second-call object, got {}",
            describe(&raw)
        )));
    }
    let mut analysis: SecondCallAnalysis = serde_json::from_value(raw)
        .map_err(|e| AnalysisError::MalformedResponse(e.to_string()))?;
    analysis.adherence_score = analysis.adherence_score.clamp(0.0, 100.0);
    Ok(analysis)
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

fn closer_name(body: &Map<String, Value>) -> String {
    let candidates = [
        body.get("closerName"),
        body.get("nomeCloser"),
        body.get("dadosBasicos").and_then(|v| v.get("nomeDoCloser")),
        body.get("informacoesCliente").and_then(|v| v.get("closerResponsavel")),
    ];
    candidates
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|name| !name.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| {
            debug!("no closer name in payload");
            UNKNOWN_CLOSER.to_string()
        })
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::ResultType;
    use crate::config::ModelId;
    use serde_json::json;

    fn model(id: ModelId) -> AnalysisModel {
        AnalysisModel::get(id)
    }

    #[test]
    fn empty_payload_defaults_every_variant() {
        for id in [
            ModelId::NextLevel,
            ModelId::CallPerdida,
            ModelId::VendaRealizada,
            ModelId::RelatorioCirurgico,
            ModelId::RelatorioSegundaCall,
            ModelId::BaselineIndicacao,
            ModelId::Universal,
        ] {
            let result = normalize(json!({}), &model(id), "call.txt").unwrap();
            assert_eq!(result.result_type(), id.result_type());
            assert_eq!(result.closer_name, UNKNOWN_CLOSER);
        }
    }

    #[test]
    fn lost_lists_default_to_empty() {
        let result = normalize(
            json!({
                "pontuacaoPorEtapa": null,
                "justificativaDetalhada": "oops",
                "analiseFinal": {"diagnostico8020": {"errosCriticos": 3}}
            }),
            &model(ModelId::CallPerdida),
            "perdida.txt",
        )
        .unwrap();
        let Report::Lost(report) = result.report else {
            panic!("expected a lost report");
        };
        assert!(report.stage_scores.is_empty());
        assert!(report.justifications.is_empty());
        assert!(report.hits.is_empty());
        assert!(report.corrections.is_empty());
        assert!(report.final_analysis.diagnosis_80_20.critical_errors.is_empty());
        assert!(report.referrals.is_empty());
    }

    #[test]
    fn max_score_is_forced_to_cap() {
        for supplied in [json!(0), json!(-40), json!(1000), json!("abc")] {
            for id in [ModelId::NextLevel, ModelId::CallPerdida, ModelId::VendaRealizada] {
                let result = normalize(
                    json!({"totalScore": 120, "totalMaxScore": supplied}),
                    &model(id),
                    "x.txt",
                )
                .unwrap();
                let score = result.score().unwrap();
                assert_eq!(score.max, SCORE_CAP);
                assert_eq!(score.total, 120.0);
            }
        }
    }

    #[test]
    fn non_object_payload_is_malformed() {
        let err = normalize(json!(["a"]), &model(ModelId::NextLevel), "x.txt").unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedResponse(_)));
        let err = normalize_text("not json", &model(ModelId::NextLevel), "x.txt").unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedResponse(_)));
    }

    #[test]
    fn closer_name_lookup_order() {
        let lost = normalize(
            json!({"nomeCloser": "  Bruno ", "dadosBasicos": {"nomeDoCloser": "Outro"}}),
            &model(ModelId::CallPerdida),
            "x.txt",
        )
        .unwrap();
        assert_eq!(lost.closer_name, "Bruno");

        let explicit = normalize(
            json!({"closerName": "Ana", "nomeCloser": "Bruno"}),
            &model(ModelId::CallPerdida),
            "x.txt",
        )
        .unwrap();
        assert_eq!(explicit.closer_name, "Ana");

        let surgical = normalize(
            json!({"dadosBasicos": {"nomeDoCloser": "Carla"}}),
            &model(ModelId::RelatorioCirurgico),
            "x.txt",
        )
        .unwrap();
        assert_eq!(surgical.closer_name, "Carla");

        let baseline = normalize(
            json!({"informacoesCliente": {"closerResponsavel": "Davi"}}),
            &model(ModelId::BaselineIndicacao),
            "x.txt",
        )
        .unwrap();
        assert_eq!(baseline.closer_name, "Davi");
    }

    #[test]
    fn reserved_keys_do_not_leak_into_extra() {
        let result = normalize(
            json!({"id": 1, "type": "lost", "model": "x", "fileName": "y", "resumo": "ok"}),
            &model(ModelId::NextLevel),
            "real.txt",
        )
        .unwrap();
        assert_eq!(result.result_type(), ResultType::Successful);
        assert_eq!(result.file_name, "real.txt");
        let Report::Successful(report) = result.report else {
            panic!("expected a successful report");
        };
        assert_eq!(report.extra.len(), 1);
        assert!(report.extra.contains_key("resumo"));
    }

    #[test]
    fn fenced_text_is_accepted() {
        let text = "```json\n{\"totalScore\": 200}\n```";
        let result = normalize_text(text, &model(ModelId::VendaRealizada), "v.txt").unwrap();
        assert_eq!(result.score().unwrap().total, 200.0);
    }

    #[test]
    fn ids_are_unique() {
        let m = model(ModelId::NextLevel);
        let a = normalize(json!({}), &m, "a").unwrap();
        let b = normalize(json!({}), &m, "b").unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn second_call_adherence_is_clamped() {
        let analysis = normalize_second_call(json!({"pontuacaoAderencia": 140})).unwrap();
        assert_eq!(analysis.adherence_score, 100.0);
        assert!(normalize_second_call(json!("texto")).is_err());
    }

    #[test]
    fn null_strings_keep_their_list_element() {
        let result = normalize(
            json!({"steps": [{"name": "Abertura", "score": 8, "status": null}]}),
            &model(ModelId::NextLevel),
            "a.txt",
        )
        .unwrap();
        let Report::Successful(report) = result.report else {
            panic!("expected a successful report");
        };
        assert_eq!(report.steps.len(), 1);
        assert_eq!(report.steps[0].name, "Abertura");
        assert_eq!(report.steps[0].score, 8.0);
        assert_eq!(report.steps[0].status, "");
    }

    #[test]
    fn stored_record_round_trips() {
        let result = normalize(
            json!({"totalScore": 180, "feedbackCS": "ok", "steps": [{"name": "Abertura", "score": 8}]}),
            &model(ModelId::NextLevel),
            "a.txt",
        )
        .unwrap();
        let text = serde_json::to_string(&result).unwrap();
        let back: AnalysisResult = serde_json::from_str(&text).unwrap();
        assert_eq!(back, result);
    }
}
