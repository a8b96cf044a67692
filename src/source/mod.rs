pub mod fanout;
pub mod play_log;

use std::collections::BTreeMap;

use async_trait::async_trait;
use thiserror::Error;

use crate::comparison::window::TimeWindow;
use crate::types::identifiers::{ChannelId, ItemKey};

pub use fanout::FanOut;
pub use play_log::{Play, PlayLog, PlayLogError};

/// Raw play counts for one channel. Values are unchecked until they pass
/// through the sorted-list builder.
pub type ChannelCounts = BTreeMap<ItemKey, i64>;

/// Raw play counts keyed by channel; one entry per requested channel.
pub type CountsByChannel = BTreeMap<ChannelId, ChannelCounts>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    #[error("Score source failed for channel {channel}: {reason}")]
    Failed { channel: ChannelId, reason: String },

    #[error("Score source timed out for channel {channel} after {timeout_ms}ms")]
    Timeout { channel: ChannelId, timeout_ms: u64 },

    #[error("Score source task aborted: {0}")]
    TaskAborted(String),
}

/// Supplier of per-channel play counts for a time window.
///
/// A channel with no plays must yield an empty mapping; a channel that could
/// not be read must yield an error, never an empty mapping.
#[async_trait]
pub trait ScoreSource: Send + Sync {
    async fn channel_counts(
        &self,
        channel: &ChannelId,
        window: &TimeWindow,
    ) -> Result<ChannelCounts, SourceError>;
}
