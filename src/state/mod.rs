// src/state/mod.rs
use chrono::FixedOffset;

use crate::analysis::{AnalysisResult, DateRange, HistoryFilter, ResultId};
use crate::config::{Settings, User};

pub mod action;
pub mod reducer;
pub mod router;
pub mod store;

pub use action::{Action, ConfirmationRequest, Notification, NotificationKind, PendingAction};
pub use reducer::reduce;
pub use router::{view_for, view_for_tag, View};
pub use store::Store;

// Core application state
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisState {
    pub user: User,
    pub settings: Settings,
    pub current_view: View,

    /// Result shown by the current report view.
    pub active: Option<AnalysisResult>,
    /// Newest first.
    pub history: Vec<AnalysisResult>,

    pub loading: bool,
    pub error: Option<String>,
    pub modal_open: bool,
    pub notification: Option<Notification>,
    pub confirmation: Option<ConfirmationRequest>,
    pub date_filter: DateRange,
}

impl Default for AnalysisState {
    fn default() -> Self {
        Self::new(User::local(), Settings::default())
    }
}

impl AnalysisState {
    pub fn new(user: User, settings: Settings) -> Self {
        Self {
            user,
            settings,
            current_view: View::Dashboard,
            active: None,
            history: Vec::new(),
            loading: false,
            error: None,
            modal_open: false,
            notification: None,
            confirmation: None,
            date_filter: DateRange::default(),
        }
    }

    pub fn find(&self, id: ResultId) -> Option<&AnalysisResult> {
        self.history.iter().find(|r| r.id == id)
    }

    /// History restricted to the dashboard's date range, newest first.
    pub fn dashboard_history(&self, offset: FixedOffset) -> Vec<&AnalysisResult> {
        HistoryFilter {
            dates: self.date_filter,
            offset,
            ..HistoryFilter::default()
        }
        .apply(&self.history)
    }
}
