//! Recommendation service abstraction
//!
//! Every strategy answers the same question, "which items for this user",
//! behind [`RecommendationService`]. The controller swaps implementations at
//! runtime, and all of them share one [`SharedCache`].

use std::{fmt::Display, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::{
    db::Cache,
    error::{AppError, AppResult},
    models::{Item, User},
};

pub mod hybrid;
pub mod mock;

pub use hybrid::HybridService;
pub use mock::MockService;

/// Recommendation lists shared across every service instance
pub type SharedCache = Arc<Cache<Vec<Item>>>;

/// Which service variant is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceKind {
    /// In-process fixed catalog, no I/O
    #[default]
    Mock,
    /// File exchange with the external engine process
    Hybrid,
}

impl Display for ServiceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceKind::Mock => write!(f, "Mock"),
            ServiceKind::Hybrid => write!(f, "Hybrid"),
        }
    }
}

/// Stage of the engine exchange at which a request failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExchangeStep {
    WriteRequest,
    InvokeEngine,
    ReadResponse,
    CacheResult,
}

impl Display for ExchangeStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExchangeStep::WriteRequest => write!(f, "write request"),
            ExchangeStep::InvokeEngine => write!(f, "invoke engine"),
            ExchangeStep::ReadResponse => write!(f, "read response"),
            ExchangeStep::CacheResult => write!(f, "cache result"),
        }
    }
}

/// Where a list of recommendations came from
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecommendationSource {
    Cache,
    Catalog,
    Engine,
    /// The engine produced no output file; placeholder items were served
    Fallback,
    /// The exchange failed; the list is empty
    Degraded { step: ExchangeStep, reason: String },
}

/// Recommendations together with their provenance
///
/// An empty list from [`RecommendationSource::Degraded`] means the engine
/// failed, while an empty list from any other source means no matches.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub items: Vec<Item>,
    pub source: RecommendationSource,
}

impl Recommendation {
    pub fn new(items: Vec<Item>, source: RecommendationSource) -> Self {
        Self { items, source }
    }

    pub fn degraded(step: ExchangeStep, reason: impl Into<String>) -> Self {
        Self {
            items: Vec::new(),
            source: RecommendationSource::Degraded {
                step,
                reason: reason.into(),
            },
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self.source, RecommendationSource::Degraded { .. })
    }

    /// Short status line for display next to the results
    pub fn message(&self) -> String {
        match &self.source {
            RecommendationSource::Degraded { step, reason } => {
                format!("No recommendations: failed to {} ({})", step, reason)
            }
            RecommendationSource::Fallback => format!(
                "{} placeholder recommendations (engine produced no output)",
                self.items.len()
            ),
            RecommendationSource::Cache => {
                format!("{} recommendations (cached)", self.items.len())
            }
            RecommendationSource::Catalog | RecommendationSource::Engine => {
                format!("{} recommendations", self.items.len())
            }
        }
    }
}

/// Contract shared by all recommendation strategies
///
/// Calls are synchronous and may block for as long as the strategy needs;
/// callers wanting responsiveness run them on a worker thread.
#[cfg_attr(test, mockall::automock)]
pub trait RecommendationService: Send + Sync {
    /// Recommendations for `user`, with their provenance
    ///
    /// Fails only with [`AppError::InvalidArgument`], before any I/O, when the
    /// user has no usable name. Repeated calls for an unchanged user are
    /// answered from the cache.
    fn recommend(&self, user: &User) -> AppResult<Recommendation>;

    /// Ordered recommendations for `user`; empty means "none, see log"
    fn get_recommendations(&self, user: &User) -> AppResult<Vec<Item>> {
        self.recommend(user).map(|r| r.items)
    }

    fn kind(&self) -> ServiceKind;

    fn clear_cache(&self);

    /// Releases anything the service holds. Called before it is replaced.
    fn close(&mut self) -> AppResult<()> {
        Ok(())
    }
}

/// Rejects users that cannot be served
pub fn validate_user(user: &User) -> AppResult<()> {
    if user.name().trim().is_empty() {
        return Err(AppError::InvalidArgument(
            "User must have a valid name".to_string(),
        ));
    }
    Ok(())
}

/// Rejects an unusable data directory
pub(crate) fn validate_data_directory(data_directory: &std::path::Path) -> AppResult<()> {
    if data_directory.as_os_str().is_empty() {
        return Err(AppError::InvalidArgument(
            "Data directory cannot be empty".to_string(),
        ));
    }
    Ok(())
}
