use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone};

use crate::comparison::{PeriodComparator, TimeWindow};
use crate::config::EngineConfig;
use crate::request::{RequestError, TopPlayedRequest};
use crate::source::{FanOut, ScoreSource};
use crate::types::error::TopPlayedError;
use crate::types::identifiers::ChannelId;
use crate::types::ranking::ComparisonResult;

/// Entry point for the query layer.
///
/// Holds the score source explicitly; nothing here reaches for global state.
pub struct TopPlayedService {
    comparator: PeriodComparator,
    config: EngineConfig,
}

impl TopPlayedService {
    pub fn new(source: Arc<dyn ScoreSource>, config: EngineConfig) -> Self {
        let fan_out = FanOut::from_config(&config);
        Self {
            comparator: PeriodComparator::new(source, fan_out),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Top `limit` items over `[start, end]`, compared against the window
    /// `reference_offset` earlier.
    pub async fn get_top_played<Tz: TimeZone>(
        &self,
        channels: &BTreeSet<ChannelId>,
        start: DateTime<Tz>,
        end: DateTime<Tz>,
        limit: usize,
        reference_offset: Duration,
    ) -> Result<ComparisonResult, TopPlayedError> {
        if limit == 0 {
            return Err(RequestError::InvalidLimit(0).into());
        }
        let window = TimeWindow::new(start, end)?;

        self.comparator
            .compare_with_reference(channels, window, reference_offset, limit)
            .await
    }

    /// Resolve a raw request against the configured defaults and run it.
    pub async fn handle(
        &self,
        request: &TopPlayedRequest,
    ) -> Result<ComparisonResult, TopPlayedError> {
        let query = request.resolve(&self.config)?;

        tracing::debug!(
            channels = query.channels.len(),
            start = %query.window.start(),
            end = %query.window.end(),
            limit = query.limit,
            "handling top played request"
        );

        self.comparator
            .compare_with_reference(
                &query.channels,
                query.window,
                self.config.reference_offset(),
                query.limit,
            )
            .await
    }
}
