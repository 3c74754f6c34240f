//! Service-level error types.

use crate::errors::UnavailableError;
use std::error::Error as StdError;
use std::fmt::{self, Display, Formatter};
use thiserror::Error;

/// The logical step of the acquisition that raised an error.
///
/// Recorded on every propagated provider error so callers can tell a failed
/// search apart from a failed purchase without inspecting the source chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquireStage {
    /// Listing available candidates.
    Search,
    /// Purchasing a candidate.
    Purchase,
}

impl Display for AcquireStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Search => write!(f, "search"),
            Self::Purchase => write!(f, "purchase"),
        }
    }
}

/// Service-level errors that wrap provider errors.
///
/// The acquisition loop never surfaces the provider's "number no longer
/// available" condition: that is an expected race and is handled by skipping
/// the candidate. Every error that does propagate is unexpected and carries
/// the stage that raised it.
#[derive(Debug, Error)]
pub enum AcquireServiceError {
    /// Error from the underlying provider.
    #[error("Number provider error during {stage}: {source}")]
    Provider {
        /// The step that raised the error.
        stage: AcquireStage,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
        /// Whether the same call could be retried at the transport level.
        is_retryable: bool,
    },
}

impl AcquireServiceError {
    pub(crate) fn provider<E>(stage: AcquireStage, source: E) -> Self
    where
        E: StdError + UnavailableError + Send + Sync + 'static,
    {
        let is_retryable = source.is_retryable();
        Self::Provider {
            stage,
            source: Box::new(source) as Box<dyn StdError + Send + Sync>,
            is_retryable,
        }
    }

    /// The stage that raised the error.
    pub fn stage(&self) -> AcquireStage {
        match self {
            Self::Provider { stage, .. } => *stage,
        }
    }
}

impl UnavailableError for AcquireServiceError {
    fn is_unavailable(&self) -> bool {
        // The unavailable condition is consumed inside the loop and never
        // reaches the caller.
        false
    }

    fn is_retryable(&self) -> bool {
        match self {
            Self::Provider { is_retryable, .. } => *is_retryable,
        }
    }
}
