//! Cross-provider portal search. Each provider owns one index (orders,
//! customers, catalog, ...); a query fans out to all of them concurrently
//! and joins every result before returning. One provider failing must
//! never cancel its siblings: the failure is logged and that provider is
//! simply excluded from the aggregate.

use async_trait::async_trait;
use futures::future::join_all;
use serde::Deserialize;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;
use tracing::warn;

#[derive(Debug, Error)]
pub enum SearchError {
    /// A single provider failed; isolated per provider, excluded from
    /// aggregate results.
    #[error("search provider {provider} failed: {message}")]
    Provider { provider: String, message: String },
}

impl SearchError {
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub provider: String,
    pub title: String,
    /// Navigation target for the hit, path+query encoded.
    pub url: String,
    pub score: f32,
}

/// One read-only search index. Implementations must be safe to query
/// concurrently with their siblings.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, SearchError>;
}

/// Fans independent queries out to every provider concurrently and joins
/// all results. Providers report in declaration order; hits keep each
/// provider's own ordering.
pub async fn fan_out(providers: &[Arc<dyn SearchProvider>], query: &str) -> Vec<SearchHit> {
    let searches = providers.iter().map(|provider| provider.search(query));
    let mut hits = Vec::new();
    for (provider, outcome) in providers.iter().zip(join_all(searches).await) {
        match outcome {
            Ok(found) => {
                debug!(provider = provider.name(), hits = found.len(), "provider answered");
                hits.extend(found);
            }
            Err(err) => warn!("excluding provider from results: {err}"),
        }
    }
    hits
}
