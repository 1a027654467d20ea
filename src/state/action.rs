// src/state/action.rs
use serde::{Serialize, Deserialize};

use crate::analysis::{AnalysisResult, DateRange, ResultId, SecondCallAnalysis};
use crate::config::{SettingsPatch, UserPatch};
use crate::state::router::View;

/// Deferred effect of a confirmation dialog, applied on `Action::Confirm`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum PendingAction {
    ClearSecondCall { report_id: ResultId },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConfirmationRequest {
    pub title: String,
    pub message: String,
    pub on_confirm: PendingAction,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    /// Set by the issuer; expiry only clears the notification with the same seq.
    pub seq: u64,
    pub message: String,
    pub kind: NotificationKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    StartLoading,
    ResultReady(Box<AnalysisResult>),
    ActionFailed(String),
    Navigate(View),
    Review(ResultId),
    SecondCallResult {
        report_id: ResultId,
        analysis: Option<SecondCallAnalysis>,
    },
    UpdateUser(UserPatch),
    UpdateSettings(SettingsPatch),
    SetDateFilter(DateRange),
    ShowConfirmation(ConfirmationRequest),
    HideConfirmation,
    Confirm,
    SetNotification(Option<Notification>),
    ExpireNotification { seq: u64 },
    SetModalOpen(bool),
    HistoryLoaded(Vec<AnalysisResult>),
}
