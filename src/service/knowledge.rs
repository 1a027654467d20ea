// src/service/knowledge.rs
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::service::collab::KnowledgeSource;

pub const DEFAULT_TTL: Duration = Duration::from_secs(10 * 60);

#[derive(Debug, Clone)]
struct CachedKnowledge {
    value: String,
    fetched_at: Instant,
}

/// Knowledge-base context for enrichment, refetched once `ttl` has elapsed.
pub struct KnowledgeCache {
    source: Arc<dyn KnowledgeSource>,
    ttl: Duration,
    entry: Mutex<Option<CachedKnowledge>>,
}

impl KnowledgeCache {
    pub fn new(source: Arc<dyn KnowledgeSource>, ttl: Duration) -> Self {
        Self {
            source,
            ttl,
            entry: Mutex::new(None),
        }
    }

    /// Never fails: a fetch error yields an empty context and is not cached.
    pub async fn get(&self) -> String {
        let mut entry = self.entry.lock().await;
        if let Some(cached) = entry.as_ref() {
            let age = cached.fetched_at.elapsed();
            if age < self.ttl {
                debug!(age_secs = age.as_secs(), "knowledge cache hit");
                return cached.value.clone();
            }
            debug!("knowledge cache expired");
        }

        match self.source.fetch().await {
            Ok(value) => {
                debug!(size_kb = value.len() / 1024, "knowledge context loaded");
                *entry = Some(CachedKnowledge {
                    value: value.clone(),
                    fetched_at: Instant::now(),
                });
                value
            }
            Err(e) => {
                warn!(error = %e, "failed to load knowledge context");
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingSource {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl KnowledgeSource for CountingSource {
        async fn fetch(&self) -> anyhow::Result<String> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if self.fail {
                anyhow::bail!("offline");
            }
            Ok(format!("contexto {n}"))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn value_is_reused_until_ttl() {
        let source = Arc::new(CountingSource::default());
        let cache = KnowledgeCache::new(source.clone(), DEFAULT_TTL);

        assert_eq!(cache.get().await, "contexto 1");
        tokio::time::advance(Duration::from_secs(9 * 60)).await;
        assert_eq!(cache.get().await, "contexto 1");
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);

        tokio::time::advance(Duration::from_secs(61)).await;
        assert_eq!(cache.get().await, "contexto 2");
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failures_degrade_to_empty_and_retry() {
        let source = Arc::new(CountingSource { fail: true, ..CountingSource::default() });
        let cache = KnowledgeCache::new(source.clone(), DEFAULT_TTL);
        assert_eq!(cache.get().await, "");
        assert_eq!(cache.get().await, "");
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }
}
