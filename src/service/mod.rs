// src/service/mod.rs
use chrono::{FixedOffset, NaiveDate};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::analysis::{
    metrics, normalize, normalize_second_call, AnalysisResult, DateRange, HistoryFilter,
    Metrics, ResultId, ResultType, SecondCallAnalysis,
};
use crate::config::{AnalysisModel, AppConfig, SettingsPatch, UserPatch};
use crate::error::AnalysisError;
use crate::state::{
    Action, AnalysisState, ConfirmationRequest, Notification, NotificationKind, PendingAction,
    Store, View,
};

pub mod collab;
pub mod knowledge;
pub mod replay;

pub use collab::{
    AnalysisRepository, KnowledgeSource, MediaType, PlainTextExtractor, ReportGenerator,
    SourceDocument, Submission, TextExtractor,
};
pub use knowledge::KnowledgeCache;
pub use replay::{FileKnowledge, ReplayGenerator};

pub const MSG_ANALYSIS_DONE: &str = "Análise concluída com sucesso!";
pub const MSG_SECOND_CALL_DONE: &str = "Análise comparativa da 2ª call concluída!";
pub const MSG_SECOND_CALL_DELETED: &str = "Análise da segunda call excluída.";
pub const MSG_PROFILE_UPDATED: &str = "Perfil atualizado com sucesso!";

const CLEAR_SECOND_CALL_TITLE: &str = "Excluir Análise da 2ª Call";
const CLEAR_SECOND_CALL_MESSAGE: &str = "Tem certeza de que deseja excluir esta análise comparativa? Você poderá gerar uma nova análise depois.";

pub struct Collaborators {
    pub generator: Arc<dyn ReportGenerator>,
    pub extractor: Arc<dyn TextExtractor>,
    pub repository: Arc<dyn AnalysisRepository>,
    pub knowledge: Option<Arc<dyn KnowledgeSource>>,
}

/// Runs the submission flows against the store and exposes the named
/// operations the presentation layer calls.
pub struct AnalysisManager {
    store: Store,
    generator: Arc<dyn ReportGenerator>,
    extractor: Arc<dyn TextExtractor>,
    repository: Arc<dyn AnalysisRepository>,
    knowledge: Option<KnowledgeCache>,
    notification_lifetime: Duration,
    notification_seq: AtomicU64,
    offset: FixedOffset,
    persistence: Mutex<Vec<JoinHandle<()>>>,
}

impl AnalysisManager {
    pub fn new(initial: AnalysisState, collaborators: Collaborators, config: &AppConfig) -> Self {
        let ttl = config.knowledge_cache_ttl();
        Self {
            store: Store::new(initial),
            generator: collaborators.generator,
            extractor: collaborators.extractor,
            repository: collaborators.repository,
            knowledge: collaborators
                .knowledge
                .map(|source| KnowledgeCache::new(source, ttl)),
            notification_lifetime: config.notification_lifetime(),
            notification_seq: AtomicU64::new(0),
            offset: crate::analysis::filter::utc_offset(),
            persistence: Mutex::new(Vec::new()),
        }
    }

    /// Offset used for calendar-day bounds in date filters.
    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn snapshot(&self) -> AnalysisState {
        self.store.snapshot()
    }

    /// Merges persisted records into the history. Failures are logged only.
    pub async fn load_history(&self) {
        match self.repository.load_all().await {
            Ok(records) => {
                info!(count = records.len(), "loaded stored analyses");
                self.store.dispatch(Action::HistoryLoaded(records));
            }
            Err(e) => warn!(error = %e, "failed to load stored analyses"),
        }
    }

    pub async fn submit(
        &self,
        submission: Submission,
        model: &AnalysisModel,
        enrich: bool,
    ) -> Result<ResultId, AnalysisError> {
        self.store.dispatch(Action::StartLoading);
        match self.run_analysis(submission, model, enrich).await {
            Ok(result) => {
                let id = result.id;
                info!(%id, report_type = %result.result_type(), closer = %result.closer_name, "analysis ready");
                let record = result.clone();
                self.store.dispatch(Action::ResultReady(Box::new(result)));
                self.notify(MSG_ANALYSIS_DONE, NotificationKind::Success);

                let repository = Arc::clone(&self.repository);
                self.track(spawn_detached(async move {
                    match repository.save(&record).await {
                        Ok(()) => debug!(id = %record.id, "analysis stored"),
                        Err(e) => warn!(id = %record.id, error = %e, "failed to store analysis"),
                    }
                }));
                Ok(id)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    async fn run_analysis(
        &self,
        submission: Submission,
        model: &AnalysisModel,
        enrich: bool,
    ) -> Result<AnalysisResult, AnalysisError> {
        let (transcript, file_name) = match submission {
            Submission::Single(doc) => (self.extract(&doc).await?, doc.name),
            Submission::TwoPart(first, second) => {
                let a = self.extract(&first).await?;
                let b = self.extract(&second).await?;
                (
                    format!("--- PARTE 1 ---\n\n{a}\n\n--- PARTE 2 ---\n\n{b}"),
                    format!("{} + {}", first.name, second.name),
                )
            }
        };

        let knowledge = match (&self.knowledge, enrich) {
            (Some(cache), true) => cache.get().await,
            (None, true) => {
                debug!("enrichment requested without a knowledge source");
                String::new()
            }
            (_, false) => String::new(),
        };

        let raw = self
            .generator
            .generate(&transcript, model, &knowledge)
            .await
            .map_err(AnalysisError::from_generator)?;
        normalize(raw, model, &file_name)
    }

    pub async fn submit_second_call(
        &self,
        report_id: ResultId,
        document: SourceDocument,
    ) -> Result<(), AnalysisError> {
        self.store.dispatch(Action::StartLoading);
        match self.run_second_call(report_id, &document).await {
            Ok(analysis) => {
                info!(%report_id, adherence = analysis.adherence_score, "second-call analysis ready");
                let stored = analysis.clone();
                self.store.dispatch(Action::SecondCallResult {
                    report_id,
                    analysis: Some(analysis),
                });
                self.notify(MSG_SECOND_CALL_DONE, NotificationKind::Success);
                self.persist_second_call(report_id, Some(stored));
                Ok(())
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    async fn run_second_call(
        &self,
        report_id: ResultId,
        document: &SourceDocument,
    ) -> Result<SecondCallAnalysis, AnalysisError> {
        let original = self
            .store
            .read(|s| s.find(report_id).cloned())
            .filter(|r| r.result_type() == ResultType::RelatorioCirurgico)
            .ok_or(AnalysisError::ReportNotFound(report_id))?;

        let transcript = self.extract(document).await?;
        let raw = self
            .generator
            .compare_second_call(&original, &transcript)
            .await
            .map_err(AnalysisError::from_generator)?;
        normalize_second_call(raw)
    }

    /// Asks for confirmation; nothing changes until `confirm`.
    pub fn request_second_call_deletion(&self, report_id: ResultId) {
        self.store.dispatch(Action::ShowConfirmation(ConfirmationRequest {
            title: CLEAR_SECOND_CALL_TITLE.to_string(),
            message: CLEAR_SECOND_CALL_MESSAGE.to_string(),
            on_confirm: PendingAction::ClearSecondCall { report_id },
        }));
    }

    pub fn confirm(&self) {
        let pending = self
            .store
            .read(|s| s.confirmation.as_ref().map(|c| c.on_confirm.clone()));
        let clears = match &pending {
            Some(PendingAction::ClearSecondCall { report_id }) => self.store.read(|s| {
                s.find(*report_id)
                    .is_some_and(|r| r.result_type() == ResultType::RelatorioCirurgico)
            }),
            None => false,
        };
        self.store.dispatch(Action::Confirm);
        match pending {
            Some(PendingAction::ClearSecondCall { report_id }) if clears => {
                self.notify(MSG_SECOND_CALL_DELETED, NotificationKind::Success);
                self.persist_second_call(report_id, None);
            }
            Some(PendingAction::ClearSecondCall { report_id }) => {
                debug!(%report_id, "no surgical report to clear");
            }
            None => debug!("nothing to confirm"),
        }
    }

    pub fn cancel_confirmation(&self) {
        self.store.dispatch(Action::HideConfirmation);
    }

    pub fn navigate(&self, view: View) {
        self.store.dispatch(Action::Navigate(view));
    }

    pub fn review(&self, id: ResultId) {
        self.store.dispatch(Action::Review(id));
    }

    pub fn new_analysis_request(&self) {
        self.store.dispatch(Action::Navigate(View::Dashboard));
        self.store.dispatch(Action::SetModalOpen(true));
    }

    pub fn set_modal_open(&self, open: bool) {
        self.store.dispatch(Action::SetModalOpen(open));
    }

    pub fn update_user(&self, patch: UserPatch) {
        self.store.dispatch(Action::UpdateUser(patch));
        self.notify(MSG_PROFILE_UPDATED, NotificationKind::Success);
    }

    pub fn update_settings(&self, patch: SettingsPatch) {
        self.store.dispatch(Action::UpdateSettings(patch));
    }

    pub fn set_date_filter(&self, start: Option<NaiveDate>, end: Option<NaiveDate>) {
        self.store
            .dispatch(Action::SetDateFilter(DateRange::new(start, end)));
    }

    /// Dashboard aggregates over the history within the stored date range.
    pub fn dashboard_metrics(&self) -> Metrics {
        self.store
            .read(|s| metrics::compute(&s.dashboard_history(self.offset)))
    }

    pub fn performance_metrics(&self, filter: &HistoryFilter) -> Metrics {
        self.store
            .read(|s| metrics::compute(&filter.apply(&s.history)))
    }

    async fn extract(&self, document: &SourceDocument) -> Result<String, AnalysisError> {
        self.extractor
            .extract(document)
            .await
            .map_err(|source| AnalysisError::Extraction {
                name: document.name.clone(),
                source,
            })
    }

    fn fail(&self, err: AnalysisError) -> AnalysisError {
        warn!(error = %err, "analysis failed");
        let message = err.user_message();
        self.store.dispatch(Action::ActionFailed(message.to_string()));
        self.notify(message, NotificationKind::Error);
        err
    }

    fn notify(&self, message: &str, kind: NotificationKind) {
        let seq = self.notification_seq.fetch_add(1, Ordering::Relaxed) + 1;
        self.store.dispatch(Action::SetNotification(Some(Notification {
            seq,
            message: message.to_string(),
            kind,
        })));

        let store = self.store.clone();
        let lifetime = self.notification_lifetime;
        let _ = spawn_detached(async move {
            tokio::time::sleep(lifetime).await;
            store.dispatch(Action::ExpireNotification { seq });
        });
    }

    fn persist_second_call(
        &self,
        report_id: ResultId,
        analysis: Option<SecondCallAnalysis>,
    ) {
        let repository = Arc::clone(&self.repository);
        self.track(spawn_detached(async move {
            if let Err(e) = repository
                .update_second_call(report_id, analysis.as_ref())
                .await
            {
                warn!(%report_id, error = %e, "failed to store second-call analysis");
            }
        }));
    }

    fn track(&self, handle: Option<JoinHandle<()>>) {
        if let Some(handle) = handle {
            let mut pending = self.persistence.lock().unwrap_or_else(PoisonError::into_inner);
            pending.retain(|h| !h.is_finished());
            pending.push(handle);
        }
    }

    /// Waits for outstanding writes to the repository. State never depends on
    /// them; short-lived processes call this before exiting.
    pub async fn flush(&self) {
        let pending = std::mem::take(
            &mut *self.persistence.lock().unwrap_or_else(PoisonError::into_inner),
        );
        for handle in pending {
            if let Err(e) = handle.await {
                warn!(error = %e, "persistence task aborted");
            }
        }
    }
}

/// Detached background work. Outside a runtime there is nothing to run it on,
/// so it is dropped with a debug log.
fn spawn_detached<F>(task: F) -> Option<JoinHandle<()>>
where
    F: Future<Output = ()> + Send + 'static,
{
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => Some(handle.spawn(task)),
        Err(_) => {
            debug!("no async runtime, background task skipped");
            None
        }
    }
}
