//! Notification Dispatch
//!
//! Outbound daily-puzzle notifications. Fire-and-forget from this core's
//! perspective: failures are counted and logged, never retried here.

use async_trait::async_trait;
use tracing::{info, warn};

use crate::protocol::commitment::PlayerAddress;

/// Outbound notification channel (social platform, push service, ...).
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Deliver one message. Returns whether delivery succeeded.
    async fn send(&self, recipient: &PlayerAddress, message: &str) -> bool;
}

/// Dispatch counters for one run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DispatchStats {
    /// Messages delivered.
    pub notified: u64,
    /// Messages that failed; not retried.
    pub failed: u64,
}

/// Notify every subscribed player that a new puzzle is available.
pub async fn dispatch_daily<S: NotificationSink>(
    sink: &S,
    subscribers: &[PlayerAddress],
    puzzle_title: &str,
) -> DispatchStats {
    let message = format!("New CipherTrail puzzle available: \"{puzzle_title}\"");
    let mut stats = DispatchStats::default();
    for recipient in subscribers {
        if sink.send(recipient, &message).await {
            stats.notified += 1;
        } else {
            warn!(recipient = %recipient, "notification delivery failed");
            stats.failed += 1;
        }
    }
    info!(
        notified = stats.notified,
        failed = stats.failed,
        "daily notifications dispatched"
    );
    stats
}
