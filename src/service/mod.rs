//! Service Boundary
//!
//! Request/response contracts at the edge of the core. Validation and
//! rate limiting are handled here and never reach the scoring, streak, or
//! leaderboard internals; ledger I/O errors propagate up as typed
//! failures.
//!
//! - `hint`: rate-limited hint disclosure
//! - `standings`: leaderboard aggregation over a ledger block range
//! - `notify`: fire-and-forget notification dispatch

pub mod hint;
pub mod notify;
pub mod standings;

use thiserror::Error;

use crate::game::puzzle::StoreError;
use crate::ledger::reader::LedgerError;

// Re-export key types
pub use hint::{serve_hint, HintRequest, HintResponse};
pub use notify::{dispatch_daily, DispatchStats, NotificationSink};
pub use standings::fetch_standings;

/// Boundary error taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// Malformed request; rejected immediately, no retry.
    #[error("validation failed: {0}")]
    Validation(String),
    /// Limiter denied the request. Distinct from validation failure and
    /// from not-found; carries the suggested retry horizon.
    #[error("rate limited; retry after {retry_at_ms}")]
    RateLimited {
        /// Unix-epoch ms at which the limiter window resets.
        retry_at_ms: u64,
    },
    /// No puzzle seeded for the requested day.
    #[error("no puzzle for day {day}")]
    PuzzleNotFound {
        /// The requested day.
        day: u64,
    },
    /// Ledger failure, retryable or not per [`LedgerError`].
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    /// Metadata store failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Runtime configuration, read from the environment the way the ledger
/// contract address already is in deployment.
#[derive(Clone, Debug)]
pub struct ServiceConfig {
    /// Ledger contract address (hex).
    pub contract_address: String,
    /// Standings cap.
    pub leaderboard_top_n: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            contract_address: "0x0000000000000000000000000000000000000000".to_string(),
            leaderboard_top_n: crate::game::leaderboard::DEFAULT_TOP_N,
        }
    }
}

impl ServiceConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            contract_address: std::env::var("CONTRACT_ADDRESS")
                .unwrap_or(default.contract_address),
            leaderboard_top_n: std::env::var("LEADERBOARD_TOP_N")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.leaderboard_top_n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServiceConfig::default();
        assert_eq!(config.leaderboard_top_n, 100);
        assert!(config.contract_address.starts_with("0x"));
    }

    #[test]
    fn test_rate_limited_is_distinct_from_not_found() {
        let limited = ServiceError::RateLimited { retry_at_ms: 5 };
        let missing = ServiceError::PuzzleNotFound { day: 1 };
        assert_ne!(limited, missing);
    }
}
