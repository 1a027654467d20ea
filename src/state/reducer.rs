// src/state/reducer.rs
use std::cmp::Reverse;
use std::collections::HashSet;
use tracing::debug;

use crate::analysis::{AnalysisResult, ResultId, SecondCallAnalysis};
use crate::state::action::{Action, PendingAction};
use crate::state::router::{view_for, View};
use crate::state::AnalysisState;

/// Applies one action. Never fails: lookups that miss leave the state as is.
pub fn reduce(mut state: AnalysisState, action: Action) -> AnalysisState {
    match action {
        Action::StartLoading => {
            state.loading = true;
            state.error = None;
        }
        Action::ResultReady(result) => {
            state.loading = false;
            state.modal_open = false;
            state.current_view = view_for(result.result_type());
            state.history.insert(0, (*result).clone());
            state.active = Some(*result);
        }
        Action::ActionFailed(message) => {
            state.loading = false;
            state.error = Some(message);
        }
        Action::Navigate(view) => {
            if view == View::Dashboard {
                state.active = None;
            }
            state.current_view = view;
        }
        Action::Review(id) => match state.find(id).cloned() {
            Some(result) => {
                state.current_view = view_for(result.result_type());
                state.active = Some(result);
            }
            None => debug!(%id, "review of unknown result ignored"),
        },
        Action::SecondCallResult { report_id, analysis } => {
            set_second_call(&mut state, report_id, analysis);
            state.loading = false;
        }
        Action::UpdateUser(patch) => state.user.apply(patch),
        Action::UpdateSettings(patch) => state.settings.apply(patch),
        Action::SetDateFilter(range) => state.date_filter = range,
        Action::ShowConfirmation(request) => state.confirmation = Some(request),
        Action::HideConfirmation => state.confirmation = None,
        Action::Confirm => match state.confirmation.take() {
            Some(request) => match request.on_confirm {
                PendingAction::ClearSecondCall { report_id } => {
                    set_second_call(&mut state, report_id, None);
                }
            },
            None => debug!("confirm without an open confirmation"),
        },
        Action::SetNotification(notification) => state.notification = notification,
        Action::ExpireNotification { seq } => {
            if state.notification.as_ref().is_some_and(|n| n.seq == seq) {
                state.notification = None;
            }
        }
        Action::SetModalOpen(open) => state.modal_open = open,
        Action::HistoryLoaded(results) => merge_history(&mut state.history, results),
    }
    state
}

/// Only surgical reports with a matching id are touched, in history and in
/// the active slot alike.
fn set_second_call(
    state: &mut AnalysisState,
    report_id: ResultId,
    analysis: Option<SecondCallAnalysis>,
) {
    let mut updated = false;
    for result in state.history.iter_mut().filter(|r| r.id == report_id) {
        updated |= result.set_second_call(analysis.clone());
    }
    if let Some(active) = state.active.as_mut().filter(|r| r.id == report_id) {
        active.set_second_call(analysis);
    }
    if !updated {
        debug!(%report_id, "second-call update matched no surgical report");
    }
}

fn merge_history(history: &mut Vec<AnalysisResult>, loaded: Vec<AnalysisResult>) {
    let mut known: HashSet<ResultId> = history.iter().map(|r| r.id).collect();
    let before = history.len();
    for result in loaded {
        if known.insert(result.id) {
            history.push(result);
        }
    }
    history.sort_by_key(|r| Reverse(r.created_at));
    debug!(added = history.len() - before, "history merged");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{normalize_at, Report};
    use crate::config::{AnalysisModel, ModelId, SettingsPatch, Theme, UserPatch};
    use crate::state::action::{ConfirmationRequest, Notification, NotificationKind};
    use chrono::{Duration, TimeZone, Utc};
    use serde_json::json;

    fn result(id: ModelId, minute: i64) -> AnalysisResult {
        let at = Utc.with_ymd_and_hms(2024, 2, 1, 10, 0, 0).unwrap() + Duration::minutes(minute);
        normalize_at(json!({}), &AnalysisModel::get(id), "call.txt", at).unwrap()
    }

    fn ready(state: AnalysisState, result: &AnalysisResult) -> AnalysisState {
        reduce(state, Action::ResultReady(Box::new(result.clone())))
    }

    fn analysis(score: f64) -> SecondCallAnalysis {
        SecondCallAnalysis {
            adherence_score: score,
            ..SecondCallAnalysis::default()
        }
    }

    #[test]
    fn results_are_prepended() {
        let (a, b, c) = (
            result(ModelId::NextLevel, 1),
            result(ModelId::CallPerdida, 2),
            result(ModelId::BaselineIndicacao, 3),
        );
        let mut state = AnalysisState::default();
        for r in [&a, &b, &c] {
            state = ready(state, r);
        }
        assert_eq!(state.history[0].id, c.id);
        assert_eq!(state.history[2].id, a.id);
        assert_eq!(state.current_view, View::BaselineIndicacaoReport);
        assert_eq!(state.active.as_ref().map(|r| r.id), Some(c.id));
    }

    #[test]
    fn loading_cycle() {
        let mut state = reduce(AnalysisState::default(), Action::SetModalOpen(true));
        state = reduce(state, Action::StartLoading);
        assert!(state.loading);
        state = reduce(state, Action::ActionFailed("falhou".into()));
        assert!(!state.loading);
        assert_eq!(state.error.as_deref(), Some("falhou"));
        assert!(state.history.is_empty());

        state = reduce(state, Action::StartLoading);
        assert!(state.error.is_none());
        state = ready(state, &result(ModelId::NextLevel, 0));
        assert!(!state.loading);
        assert!(!state.modal_open);
    }

    #[test]
    fn dashboard_navigation_clears_active_result() {
        let r = result(ModelId::CallPerdida, 0);
        let state = ready(AnalysisState::default(), &r);
        let state = reduce(state, Action::Navigate(View::Performance));
        assert!(state.active.is_some());
        let state = reduce(state, Action::Navigate(View::Dashboard));
        assert!(state.active.is_none());
        assert_eq!(state.history.len(), 1);
    }

    #[test]
    fn review_routes_and_unknown_id_is_a_noop() {
        let lost = result(ModelId::CallPerdida, 0);
        let sale = result(ModelId::VendaRealizada, 1);
        let mut state = ready(AnalysisState::default(), &lost);
        state = ready(state, &sale);
        state = reduce(state, Action::Navigate(View::Dashboard));

        state = reduce(state, Action::Review(lost.id));
        assert_eq!(state.current_view, View::LostCallReport);
        assert_eq!(state.active.as_ref().map(|r| r.id), Some(lost.id));

        let before = state.clone();
        let after = reduce(state, Action::Review(ResultId::new()));
        assert_eq!(after, before);
    }

    #[test]
    fn second_call_targets_one_report() {
        let a = result(ModelId::RelatorioCirurgico, 0);
        let b = result(ModelId::RelatorioCirurgico, 1);
        let mut state = ready(AnalysisState::default(), &a);
        state = ready(state, &b);
        state = reduce(state, Action::Review(a.id));
        state = reduce(state, Action::StartLoading);

        state = reduce(
            state,
            Action::SecondCallResult { report_id: a.id, analysis: Some(analysis(77.0)) },
        );
        assert!(!state.loading);
        let stored_a = state.find(a.id).unwrap();
        assert_eq!(stored_a.second_call().map(|s| s.adherence_score), Some(77.0));
        assert!(state.find(b.id).unwrap().second_call().is_none());
        assert_eq!(state.active.as_ref().unwrap().second_call(), stored_a.second_call());

        state = reduce(state, Action::SecondCallResult { report_id: a.id, analysis: None });
        assert!(state.find(a.id).unwrap().second_call().is_none());
        assert!(state.active.as_ref().unwrap().second_call().is_none());
    }

    #[test]
    fn second_call_ignores_other_variants() {
        let lost = result(ModelId::CallPerdida, 0);
        let state = ready(AnalysisState::default(), &lost);
        let state = reduce(
            state,
            Action::SecondCallResult { report_id: lost.id, analysis: Some(analysis(50.0)) },
        );
        assert!(matches!(state.history[0].report, Report::Lost(_)));
        assert_eq!(state.history[0], lost);
    }

    #[test]
    fn confirm_applies_pending_clear() {
        let a = result(ModelId::RelatorioCirurgico, 0);
        let mut state = ready(AnalysisState::default(), &a);
        state = reduce(
            state,
            Action::SecondCallResult { report_id: a.id, analysis: Some(analysis(90.0)) },
        );
        state = reduce(
            state,
            Action::ShowConfirmation(ConfirmationRequest {
                title: "Excluir".into(),
                message: "Tem certeza?".into(),
                on_confirm: PendingAction::ClearSecondCall { report_id: a.id },
            }),
        );
        state = reduce(state, Action::Confirm);
        assert!(state.confirmation.is_none());
        assert!(state.find(a.id).unwrap().second_call().is_none());

        // A second confirm has nothing to apply.
        let again = reduce(state.clone(), Action::Confirm);
        assert_eq!(again, state);
    }

    #[test]
    fn stale_expiry_keeps_newer_notification() {
        let note = |seq| Notification {
            seq,
            message: format!("n{seq}"),
            kind: NotificationKind::Info,
        };
        let mut state = reduce(AnalysisState::default(), Action::SetNotification(Some(note(1))));
        state = reduce(state, Action::SetNotification(Some(note(2))));
        state = reduce(state, Action::ExpireNotification { seq: 1 });
        assert_eq!(state.notification.as_ref().map(|n| n.seq), Some(2));
        state = reduce(state, Action::ExpireNotification { seq: 2 });
        assert!(state.notification.is_none());
    }

    #[test]
    fn patches_and_filters() {
        let mut state = reduce(
            AnalysisState::default(),
            Action::UpdateUser(UserPatch { company: Some("Acme".into()), ..UserPatch::default() }),
        );
        state = reduce(
            state,
            Action::UpdateSettings(SettingsPatch { theme: Some(Theme::System), ..SettingsPatch::default() }),
        );
        assert_eq!(state.user.company.as_deref(), Some("Acme"));
        assert_eq!(state.user.uid, "local-user");
        assert_eq!(state.settings.theme, Theme::System);
        assert!(state.settings.auto_gain_control);

        let range = crate::analysis::DateRange::new(chrono::NaiveDate::from_ymd_opt(2024, 1, 1), None);
        state = reduce(state, Action::SetDateFilter(range));
        assert_eq!(state.date_filter, range);
    }

    #[test]
    fn history_load_merges_without_duplicates() {
        let old = result(ModelId::CallPerdida, 0);
        let newer = result(ModelId::NextLevel, 5);
        let newest = result(ModelId::VendaRealizada, 10);
        let state = ready(AnalysisState::default(), &newest);
        let state = reduce(
            state,
            Action::HistoryLoaded(vec![newest.clone(), old.clone(), newer.clone()]),
        );
        let ids: Vec<ResultId> = state.history.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![newest.id, newer.id, old.id]);
    }
}
