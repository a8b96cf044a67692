use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::comparison::window::TimeWindow;
use crate::config::EngineConfig;
use crate::source::{ChannelCounts, CountsByChannel, ScoreSource, SourceError};
use crate::types::identifiers::ChannelId;

/// Parallel per-channel dispatch against a [`ScoreSource`].
///
/// Clones share one limiter, so concurrent windows draw from the same pool
/// of permits.
#[derive(Debug, Clone)]
pub struct FanOut {
    limiter: Arc<Semaphore>,
    timeout: Duration,
}

impl FanOut {
    pub fn new(max_concurrent: usize, timeout: Duration) -> Self {
        Self {
            limiter: Arc::new(Semaphore::new(max_concurrent.max(1))),
            timeout,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.max_concurrent_requests, config.source_timeout())
    }

    /// Permits not currently held by an in-flight channel call.
    pub fn available_permits(&self) -> usize {
        self.limiter.available_permits()
    }

    /// One call per channel, joined before returning.
    ///
    /// The first failure or timeout aborts the remaining calls and is
    /// returned; no partial mapping is ever produced.
    pub async fn provide_counts(
        &self,
        source: Arc<dyn ScoreSource>,
        channels: &BTreeSet<ChannelId>,
        window: TimeWindow,
    ) -> Result<CountsByChannel, SourceError> {
        let mut tasks = JoinSet::new();

        for channel in channels {
            tasks.spawn(fetch_channel(
                Arc::clone(&source),
                Arc::clone(&self.limiter),
                channel.clone(),
                window,
                self.timeout,
            ));
        }

        let mut counts = BTreeMap::new();
        while let Some(joined) = tasks.join_next().await {
            let outcome = joined.map_err(|e| SourceError::TaskAborted(e.to_string()))?;
            match outcome {
                Ok((channel, channel_counts)) => {
                    counts.insert(channel, channel_counts);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "channel fetch failed, abandoning window");
                    // Dropping the set aborts the calls still in flight.
                    return Err(e);
                }
            }
        }

        Ok(counts)
    }
}

async fn fetch_channel(
    source: Arc<dyn ScoreSource>,
    limiter: Arc<Semaphore>,
    channel: ChannelId,
    window: TimeWindow,
    timeout: Duration,
) -> Result<(ChannelId, ChannelCounts), SourceError> {
    let _permit = limiter
        .acquire_owned()
        .await
        .map_err(|e| SourceError::TaskAborted(e.to_string()))?;

    match tokio::time::timeout(timeout, source.channel_counts(&channel, &window)).await {
        Ok(Ok(counts)) => Ok((channel, counts)),
        Ok(Err(e)) => Err(e),
        Err(_) => Err(SourceError::Timeout {
            channel,
            timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        }),
    }
}
