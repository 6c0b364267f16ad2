//! Remote collection fetching with observable loading/error/success state.

use crate::auth::AuthContext;
use crate::services::metrics;
use async_trait::async_trait;
use console_core::AppError;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

#[derive(Debug, Clone, PartialEq)]
pub enum QueryState<T> {
    Loading,
    Error(String),
    Success(T),
}

impl<T> QueryState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, QueryState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            QueryState::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            QueryState::Error(message) => Some(message),
            _ => None,
        }
    }
}

/// Something a [`RemoteQuery`] can load with a bearer token.
#[async_trait]
pub trait QuerySource: Send + Sync {
    type Output: Clone + Send + Sync;

    /// Label used in logs and metrics.
    fn name(&self) -> &'static str;

    async fn load(&self, access_token: &str) -> Result<Self::Output, AppError>;
}

/// A collaborator whose data can be re-issued after a write.
#[async_trait]
pub trait Refetch: Send + Sync {
    async fn refetch(&self) -> Result<(), AppError>;
}

/// Fetches a remote resource for one session and keeps the latest result.
///
/// The most recently issued fetch wins: a response that completes after a newer
/// fetch was started is returned to its caller but not stored. Once data is
/// available it stays visible while a refetch is in flight.
pub struct RemoteQuery<S: QuerySource> {
    source: S,
    auth: AuthContext,
    state: RwLock<QueryState<S::Output>>,
    issued: AtomicU64,
}

impl<S: QuerySource> RemoteQuery<S> {
    pub fn new(source: S, auth: AuthContext) -> Self {
        Self {
            source,
            auth,
            state: RwLock::new(QueryState::Loading),
            issued: AtomicU64::new(0),
        }
    }

    pub fn state(&self) -> QueryState<S::Output> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub async fn fetch(&self) -> Result<S::Output, AppError> {
        let generation = self.issued.fetch_add(1, Ordering::SeqCst) + 1;

        let result = match self.auth.require_token() {
            Ok(token) => self.source.load(token).await,
            Err(err) => Err(err),
        };

        metrics::record_query(
            self.source.name(),
            if result.is_ok() { "success" } else { "error" },
        );
        if let Err(err) = &result {
            tracing::warn!(query = self.source.name(), error = %err, "Query failed");
        }

        self.settle(generation, &result);
        result
    }

    fn settle(&self, generation: u64, result: &Result<S::Output, AppError>) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);

        if generation != self.issued.load(Ordering::SeqCst) {
            tracing::debug!(
                query = self.source.name(),
                generation,
                "Discarding result superseded by a newer fetch"
            );
            return;
        }

        *state = match result {
            Ok(data) => QueryState::Success(data.clone()),
            Err(err) => QueryState::Error(err.user_message()),
        };
    }
}

#[async_trait]
impl<S: QuerySource> Refetch for RemoteQuery<S> {
    async fn refetch(&self) -> Result<(), AppError> {
        self.fetch().await.map(|_| ())
    }
}
