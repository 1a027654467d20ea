// src/analysis/filter.rs
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, Offset, TimeZone, Utc};
use serde::{Serialize, Deserialize};
use std::fmt;
use std::str::FromStr;

use crate::analysis::result::{AnalysisResult, ResultType};

/// History type filter as offered to users. `SaleCompleted` covers both sale tags.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum TypeFilter {
    #[default]
    All,
    SaleCompleted,
    Lost,
    Surgical,
    SecondCall,
    Baseline,
}

impl TypeFilter {
    pub fn matches(self, result_type: ResultType) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::SaleCompleted => matches!(
                result_type,
                ResultType::Successful | ResultType::VendaRealizada
            ),
            TypeFilter::Lost => result_type == ResultType::Lost,
            TypeFilter::Surgical => result_type == ResultType::RelatorioCirurgico,
            TypeFilter::SecondCall => result_type == ResultType::RelatorioSegundaCall,
            TypeFilter::Baseline => result_type == ResultType::BaselineIndicacao,
        }
    }
}

impl fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TypeFilter::All => "all",
            TypeFilter::SaleCompleted => "venda-realizada",
            TypeFilter::Lost => "call-perdida",
            TypeFilter::Surgical => "relatorio-cirurgico",
            TypeFilter::SecondCall => "relatorio-segunda-call",
            TypeFilter::Baseline => "baseline-indicacao",
        })
    }
}

impl FromStr for TypeFilter {
    type Err = String;

    /// Accepts the filter option values; an empty string means no filter.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "" | "all" => Ok(TypeFilter::All),
            "venda-realizada" | "successful" => Ok(TypeFilter::SaleCompleted),
            "call-perdida" | "lost" => Ok(TypeFilter::Lost),
            "relatorio-cirurgico" => Ok(TypeFilter::Surgical),
            "relatorio-segunda-call" => Ok(TypeFilter::SecondCall),
            "baseline-indicacao" => Ok(TypeFilter::Baseline),
            other => Err(format!("unknown type filter '{other}'")),
        }
    }
}

/// Inclusive calendar-day range; either side may be open.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    /// Day bounds are taken in `offset`: start at 00:00:00.000, end at 23:59:59.999.
    pub fn contains(&self, instant: DateTime<Utc>, offset: FixedOffset) -> bool {
        if let Some(start) = self.start.and_then(|d| day_start(d, offset)) {
            if instant < start {
                return false;
            }
        }
        if let Some(end) = self.end.and_then(|d| day_start(d, offset)) {
            let end = end + Duration::days(1) - Duration::milliseconds(1);
            if instant > end {
                return false;
            }
        }
        true
    }
}

fn day_start(date: NaiveDate, offset: FixedOffset) -> Option<DateTime<Utc>> {
    offset
        .from_local_datetime(&date.and_time(NaiveTime::MIN))
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryFilter {
    pub dates: DateRange,
    pub closer_name: Option<String>,
    pub result_type: TypeFilter,
    pub offset: FixedOffset,
}

impl Default for HistoryFilter {
    fn default() -> Self {
        Self {
            dates: DateRange::default(),
            closer_name: None,
            result_type: TypeFilter::All,
            offset: utc_offset(),
        }
    }
}

pub fn utc_offset() -> FixedOffset {
    Utc.fix()
}

impl HistoryFilter {
    pub fn with_dates(dates: DateRange) -> Self {
        Self { dates, ..Self::default() }
    }

    pub fn matches(&self, result: &AnalysisResult) -> bool {
        if !self.dates.contains(result.created_at, self.offset) {
            return false;
        }
        if let Some(needle) = self.name_needle() {
            if !result.closer_name.to_lowercase().contains(&needle) {
                return false;
            }
        }
        self.result_type.matches(result.result_type())
    }

    /// Keeps the input order.
    pub fn apply<'a>(&self, history: &'a [AnalysisResult]) -> Vec<&'a AnalysisResult> {
        history.iter().filter(|r| self.matches(r)).collect()
    }

    fn name_needle(&self) -> Option<String> {
        self.closer_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_lowercase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::normalize::normalize_at;
    use crate::config::{AnalysisModel, ModelId};
    use serde_json::json;

    fn at(id: ModelId, closer: &str, created_at: DateTime<Utc>) -> AnalysisResult {
        normalize_at(
            json!({"closerName": closer}),
            &AnalysisModel::get(id),
            "call.txt",
            created_at,
        )
        .unwrap()
    }

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32, ms: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap() + Duration::milliseconds(ms)
    }

    #[test]
    fn date_bounds_are_inclusive_to_the_millisecond() {
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2024, 3, 10),
            NaiveDate::from_ymd_opt(2024, 3, 12),
        );
        let filter = HistoryFilter::with_dates(range);

        let first = at(ModelId::NextLevel, "a", utc(2024, 3, 10, 0, 0, 0, 0));
        let last = at(ModelId::NextLevel, "a", utc(2024, 3, 12, 23, 59, 59, 999));
        let before = at(ModelId::NextLevel, "a", utc(2024, 3, 9, 23, 59, 59, 999));
        let after = at(ModelId::NextLevel, "a", utc(2024, 3, 13, 0, 0, 0, 0));

        assert!(filter.matches(&first));
        assert!(filter.matches(&last));
        assert!(!filter.matches(&before));
        assert!(!filter.matches(&after));
    }

    #[test]
    fn offset_shifts_day_bounds() {
        let range = DateRange::new(NaiveDate::from_ymd_opt(2024, 3, 10), None);
        let filter = HistoryFilter {
            dates: range,
            offset: FixedOffset::west_opt(3 * 3600).unwrap(),
            ..HistoryFilter::default()
        };
        // 02:00 UTC on the 10th is still the 9th in UTC-3.
        let early = at(ModelId::NextLevel, "a", utc(2024, 3, 10, 2, 0, 0, 0));
        assert!(!filter.matches(&early));
    }

    #[test]
    fn name_filter_is_case_insensitive_and_blank_is_noop() {
        let now = utc(2024, 1, 1, 12, 0, 0, 0);
        let history = vec![
            at(ModelId::NextLevel, "Mariana Lopes", now),
            at(ModelId::CallPerdida, "João", now),
        ];
        let filter = HistoryFilter {
            closer_name: Some("  MARI ".into()),
            ..HistoryFilter::default()
        };
        assert_eq!(filter.apply(&history).len(), 1);

        let blank = HistoryFilter {
            closer_name: Some("   ".into()),
            ..HistoryFilter::default()
        };
        assert_eq!(blank.apply(&history).len(), 2);
    }

    #[test]
    fn sale_completed_matches_both_tags() {
        let now = utc(2024, 1, 1, 12, 0, 0, 0);
        let history = vec![
            at(ModelId::NextLevel, "a", now),
            at(ModelId::VendaRealizada, "a", now),
            at(ModelId::CallPerdida, "a", now),
            at(ModelId::RelatorioCirurgico, "a", now),
        ];
        let filter = HistoryFilter {
            result_type: TypeFilter::SaleCompleted,
            ..HistoryFilter::default()
        };
        assert_eq!(filter.apply(&history).len(), 2);
        assert_eq!("".parse::<TypeFilter>(), Ok(TypeFilter::All));
        assert_eq!("call-perdida".parse::<TypeFilter>(), Ok(TypeFilter::Lost));
    }

    #[test]
    fn criteria_compose_with_and() {
        let history = vec![
            at(ModelId::CallPerdida, "Ana", utc(2024, 5, 1, 9, 0, 0, 0)),
            at(ModelId::CallPerdida, "Ana", utc(2024, 6, 1, 9, 0, 0, 0)),
            at(ModelId::NextLevel, "Ana", utc(2024, 5, 1, 9, 0, 0, 0)),
        ];
        let filter = HistoryFilter {
            dates: DateRange::new(NaiveDate::from_ymd_opt(2024, 5, 1), NaiveDate::from_ymd_opt(2024, 5, 31)),
            closer_name: Some("ana".into()),
            result_type: TypeFilter::Lost,
            ..HistoryFilter::default()
        };
        let matched = filter.apply(&history);
        assert_eq!(matched.len(), 1);
        assert!(std::ptr::eq(matched[0], &history[0]));
    }
}
