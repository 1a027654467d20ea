// src/ui/mod.rs
//! Plain-text views over the state: history table, metric panels, report
//! summaries and the profile.

use std::fmt::Write;

use crate::analysis::{AnalysisResult, Metrics, Report};
use crate::config::{AnalysisModel, Settings, User};
use crate::state::{Notification, NotificationKind};

const DATE_FORMAT: &str = "%d/%m/%Y %H:%M";

pub fn model_list(models: &[AnalysisModel]) -> String {
    let mut out = String::new();
    for model in models {
        let _ = writeln!(out, "{:<24} {}", model.id.as_str(), model.title);
        let _ = writeln!(out, "{:<24} {}", "", model.description);
        let _ = writeln!(out, "{:<24} [{}]", "", model.tags.join(", "));
    }
    out
}

fn score_cell(result: &AnalysisResult) -> String {
    result
        .score()
        .map(|s| format!("{:.0}/{:.0}", s.total, s.max))
        .unwrap_or_else(|| "-".to_string())
}

pub fn history_table(results: &[&AnalysisResult]) -> String {
    if results.is_empty() {
        return "Nenhuma análise encontrada.\n".to_string();
    }
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<36}  {:<16}  {:<22}  {:<18}  {:>7}  {}",
        "id", "data", "resultado", "closer", "nota", "arquivo"
    );
    for result in results {
        let _ = writeln!(
            out,
            "{:<36}  {:<16}  {:<22}  {:<18}  {:>7}  {}",
            result.id,
            result.created_at.format(DATE_FORMAT),
            result.result_type(),
            result.closer_name,
            score_cell(result),
            result.file_name,
        );
    }
    out
}

pub fn metrics_panel(metrics: &Metrics) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Total de calls:        {}", metrics.total_calls);
    let _ = writeln!(out, "Taxa de conversão:     {:.1}%", metrics.conversion_rate);
    let _ = writeln!(
        out,
        "Fechadas / perdidas:   {} / {}",
        metrics.results_distribution.closed, metrics.results_distribution.lost
    );
    let bands = metrics.score_bands;
    let _ = writeln!(
        out,
        "Notas:                 excelente {} | bom {} | regular {} | ruim {}",
        bands.excellent, bands.good, bands.fair, bands.poor
    );
    let _ = writeln!(out, "Objeção principal:     {}", metrics.top_objection);
    match metrics.strategic_execution_rate {
        Some(rate) => {
            let _ = writeln!(out, "Execução estratégica:  {:.1}%", rate);
        }
        None => {
            let _ = writeln!(out, "Execução estratégica:  -");
        }
    }
    let _ = writeln!(
        out,
        "Taxa de acerto:        {:.1}% ({})",
        metrics.hit_rate, metrics.tier
    );

    if !metrics.recent_scores.is_empty() {
        let recent: Vec<String> = metrics
            .recent_scores
            .iter()
            .map(|p| format!("{} {:.1}", p.label, p.value))
            .collect();
        let _ = writeln!(out, "Notas recentes:        {}", recent.join(" | "));
    }
    out
}

pub fn report_summary(result: &AnalysisResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", result.model.title, result.result_type());
    let _ = writeln!(out, "Arquivo: {}", result.file_name);
    let _ = writeln!(out, "Closer:  {}", result.closer_name);
    let _ = writeln!(out, "Data:    {}", result.created_at.format(DATE_FORMAT));
    if let Some(score) = result.score() {
        let _ = writeln!(
            out,
            "Nota:    {:.0}/{:.0} ({:.1}/10)",
            score.total,
            score.max,
            score.out_of_ten()
        );
    }

    match &result.report {
        Report::Successful(r) => {
            section(&mut out, "Resumo", &r.performance_summary);
            section(&mut out, "Momento crítico", &r.critical_moment);
            for step in &r.steps {
                let _ = writeln!(out, "  - {} {:.0}/{:.0}", step.name, step.score, step.max_score);
            }
        }
        Report::Lost(r) => {
            for stage in &r.stage_scores {
                let _ = writeln!(out, "  - {} {:.0}", stage.name, stage.score);
            }
            section(&mut out, "Efeito dominó", &r.final_analysis.domino_effect);
            list(&mut out, "Causas raiz", &r.final_analysis.root_causes);
        }
        Report::VendaRealizada(r) => {
            section(&mut out, "Pontos positivos", &r.positive_points.description);
            section(&mut out, "Críticas construtivas", &r.constructive_criticism.description);
            section(&mut out, "Elogio final", &r.final_praise.description);
        }
        Report::RelatorioCirurgico(r) => {
            list(&mut out, "Foco do entregável", &r.deliverable_focus);
            list(&mut out, "Objeções financeiras", &r.anticipated_objections.financial.objections);
            list(&mut out, "Objeções de credibilidade", &r.anticipated_objections.credibility.objections);
            list(&mut out, "Checklist pré-call", &r.pre_call_checklist);
            section(&mut out, "Lembrete final", &r.final_reminder);
            if let Some(second) = &r.second_call {
                let _ = writeln!(out, "\nAnálise da 2ª call: aderência {:.0}%", second.adherence_score);
                list(&mut out, "Acertos", &second.hits);
                list(&mut out, "Melhorias", &second.improvements);
                section(&mut out, "Feedback", &second.overall_feedback);
            }
        }
        Report::RelatorioSegundaCall(r) => {
            section(&mut out, "Cliente", &r.client);
            section(&mut out, "Contexto", &r.briefing.executive_summary.context);
            for step in &r.action_plan.steps {
                let _ = writeln!(out, "  - {}: {}", step.title, step.goal);
            }
            section(
                &mut out,
                "Objeção antecipada",
                &r.protocols.objection_containment.anticipated_objection,
            );
        }
        Report::BaselineIndicacao(r) => {
            section(&mut out, "Cliente", &r.client.full_name);
            section(&mut out, "Produto", &r.client.product);
            section(&mut out, "Dor principal", &r.pains.primary.description);
            section(&mut out, "Expectativa", &r.expectations.primary);
            let tried = if r.previous_attempts.tried_before { "sim" } else { "não" };
            let _ = writeln!(out, "Tentou antes: {}", tried);
        }
    }
    out
}

fn section(out: &mut String, title: &str, body: &str) {
    if !body.trim().is_empty() {
        let _ = writeln!(out, "\n{}:\n  {}", title, body.trim());
    }
}

fn list(out: &mut String, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    let _ = writeln!(out, "\n{}:", title);
    for item in items {
        let _ = writeln!(out, "  - {}", item);
    }
}

pub fn profile_summary(user: &User, settings: &Settings) -> String {
    let mut out = String::new();
    let field = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());
    let _ = writeln!(out, "Nome:     {}", field(&user.name));
    let _ = writeln!(out, "E-mail:   {}", field(&user.email));
    let _ = writeln!(out, "Telefone: {}", if user.phone.is_empty() { "-" } else { user.phone.as_str() });
    let _ = writeln!(out, "Empresa:  {}", field(&user.company));
    let _ = writeln!(out, "CNPJ:     {}", field(&user.cnpj));
    let _ = writeln!(out, "Segmento: {}", field(&user.segment));
    let _ = writeln!(out, "Equipe:   {}", field(&user.team_size));
    let _ = writeln!(out, "Site:     {}", field(&user.website));
    let _ = writeln!(out, "Tema:     {:?}", settings.theme);
    out
}

pub fn notification_line(notification: &Notification) -> String {
    let marker = match notification.kind {
        NotificationKind::Success => "✓",
        NotificationKind::Error => "✗",
        NotificationKind::Info => "i",
    };
    format!("{} {}", marker, notification.message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{compute, normalize_at, SecondCallAnalysis};
    use crate::config::ModelId;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn result(model: ModelId, raw: serde_json::Value) -> AnalysisResult {
        let at = Utc.with_ymd_and_hms(2024, 6, 3, 10, 15, 0).unwrap();
        normalize_at(raw, &AnalysisModel::get(model), "call.txt", at).unwrap()
    }

    #[test]
    fn empty_history_has_a_message() {
        assert_eq!(history_table(&[]), "Nenhuma análise encontrada.\n");
    }

    #[test]
    fn history_rows_show_score_or_dash() {
        let sale = result(ModelId::NextLevel, json!({"totalScore": 200, "closerName": "Ana"}));
        let plan = result(ModelId::RelatorioCirurgico, json!({}));
        let table = history_table(&[&sale, &plan]);
        let rows: Vec<&str> = table.lines().collect();
        assert_eq!(rows.len(), 3);
        assert!(rows[1].contains("200/250"));
        assert!(rows[1].contains("03/06/2024 10:15"));
        assert!(rows[2].contains("relatorio-cirurgico"));
        assert!(rows[2].contains(" - "));
    }

    #[test]
    fn surgical_summary_includes_second_call() {
        let mut plan = result(
            ModelId::RelatorioCirurgico,
            json!({"lembreteFinal": "Confirme a agenda"}),
        );
        plan.set_second_call(Some(SecondCallAnalysis {
            adherence_score: 81.0,
            hits: vec!["Ancoragem".into()],
            improvements: vec![],
            overall_feedback: String::new(),
        }));
        let text = report_summary(&plan);
        assert!(text.contains("Confirme a agenda"));
        assert!(text.contains("aderência 81%"));
        assert!(text.contains("  - Ancoragem"));
        assert!(!text.contains("Melhorias"));
    }

    #[test]
    fn metrics_panel_handles_missing_execution_rate() {
        let sale = result(ModelId::NextLevel, json!({"totalScore": 125}));
        let metrics = compute(&[&sale]);
        let text = metrics_panel(&metrics);
        assert!(text.contains("Total de calls:        1"));
        assert!(text.contains("Execução estratégica:  -"));
    }
}
