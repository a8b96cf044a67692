pub mod window;

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use chrono::Duration;

use crate::source::{FanOut, ScoreSource};
use crate::topk::{FaginAggregator, SortedListBuilder};
use crate::types::error::TopPlayedError;
use crate::types::identifiers::{ChannelId, ItemKey};
use crate::types::ranking::{ComparisonEntry, ComparisonResult, RankedResult};
pub use window::{TimeWindow, WindowError};

/// Ranks a window and annotates it with an earlier reference window.
pub struct PeriodComparator {
	source: Arc<dyn ScoreSource>,
	fan_out: FanOut,
	builder: SortedListBuilder,
	aggregator: FaginAggregator,
}

impl PeriodComparator {
	pub fn new(source: Arc<dyn ScoreSource>, fan_out: FanOut) -> Self {
		Self {
			source,
			fan_out,
			builder: SortedListBuilder,
			aggregator: FaginAggregator,
		}
	}

	/// Global top-`k` over `channels` for one window.
	pub async fn top_k(
		&self,
		channels: &BTreeSet<ChannelId>,
		window: TimeWindow,
		k: usize,
	) -> Result<RankedResult, TopPlayedError> {
		// No channel, no plays; nothing to ask the source for.
		if channels.is_empty() || k == 0 {
			return Ok(RankedResult::default());
		}

		let counts = self
			.fan_out
			.provide_counts(Arc::clone(&self.source), channels, window)
			.await?;
		let lists = self.builder.build_all(counts)?;
		let ranking = self.aggregator.aggregate(&lists, k)?;

		Ok(ranking)
	}

	pub async fn compare_with_reference(
		&self,
		channels: &BTreeSet<ChannelId>,
		current_window: TimeWindow,
		reference_offset: Duration,
		k: usize,
	) -> Result<ComparisonResult, TopPlayedError> {
		let reference_window = current_window.shifted_back(reference_offset)?;

		// Both windows run at once; the first failure cancels the other.
		let (current, reference) = tokio::try_join!(
			self.top_k(channels, current_window, k),
			self.top_k(channels, reference_window, k),
		)?;

		tracing::info!(
			channels = channels.len(),
			k,
			current = current.len(),
			reference = reference.len(),
			"period comparison finished"
		);

		Ok(merge_rankings(&current, &reference))
	}
}

/// Fold the reference ranking into the current one, in current rank order.
pub fn merge_rankings(current: &RankedResult, reference: &RankedResult) -> ComparisonResult {
	let reference_index: HashMap<&ItemKey, (usize, u64)> = reference
		.items()
		.iter()
		.enumerate()
		.map(|(rank, item)| (&item.key, (rank, item.score)))
		.collect();

	let entries = current
		.items()
		.iter()
		.enumerate()
		.map(|(rank, item)| {
			let previous = reference_index.get(&item.key).copied();
			ComparisonEntry {
				rank,
				title: item.key.title().to_string(),
				performer: item.key.performer().to_string(),
				plays: item.score,
				previous_plays: previous.map(|(_, score)| score).unwrap_or(0),
				previous_rank: previous.map(|(rank, _)| rank),
			}
		})
		.collect();

	ComparisonResult { entries }
}
