// src/file/export.rs
use std::io::Write;
use anyhow::Result;
use csv::Writer;

use crate::analysis::AnalysisResult;

pub const HEADERS: [&str; 5] = ["file", "model", "result", "score", "date"];

/// Writes one row per result, mirroring the history table. Results without a
/// score get an empty score cell.
pub fn write_history_csv<W: Write>(out: W, results: &[&AnalysisResult]) -> Result<()> {
    let mut writer = Writer::from_writer(out);
    writer.write_record(HEADERS)?;

    for result in results {
        let score = result
            .score()
            .map(|s| format!("{:.0}/{:.0}", s.total, s.max))
            .unwrap_or_default();
        writer.write_record([
            result.file_name.as_str(),
            result.model.title.as_str(),
            result.result_type().as_str(),
            score.as_str(),
            &result.created_at.format("%Y-%m-%d %H:%M").to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::normalize_at;
    use crate::config::{AnalysisModel, ModelId};
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    #[test]
    fn rows_follow_history_columns() {
        let at = Utc.with_ymd_and_hms(2024, 4, 2, 14, 30, 0).unwrap();
        let scored = normalize_at(
            json!({"totalScore": 190}),
            &AnalysisModel::get(ModelId::VendaRealizada),
            "venda, parte 1.txt",
            at,
        )
        .unwrap();
        let plan = normalize_at(json!({}), &AnalysisModel::get(ModelId::RelatorioCirurgico), "plano.txt", at)
            .unwrap();

        let mut buffer = Vec::new();
        write_history_csv(&mut buffer, &[&scored, &plan]).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "file,model,result,score,date");
        assert_eq!(
            lines[1],
            "\"venda, parte 1.txt\",Venda Realizada,venda-realizada,190/250,2024-04-02 14:30"
        );
        assert_eq!(
            lines[2],
            "plano.txt,Relatório Cirúrgico - 1ª Call,relatorio-cirurgico,,2024-04-02 14:30"
        );
    }
}
