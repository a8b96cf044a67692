use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;

use crate::topk::sorted_list::SortedList;
use crate::topk::{MalformedReason, TopKError};
use crate::types::identifiers::{ChannelId, ItemKey};
use crate::types::ranking::{RankedItem, RankedResult, Score};

/// Work done by one aggregation call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AggregationStats {
    /// Non-empty lists that took part.
    pub lists: usize,
    pub rounds: usize,
    pub sorted_accesses: usize,
    pub random_accesses: usize,
    pub items_seen: usize,
    pub fully_seen: usize,
}

#[derive(Debug, Clone)]
pub struct Aggregation {
    pub result: RankedResult,
    pub stats: AggregationStats,
}

/// Working state for one item, private to a single call.
#[derive(Default)]
struct AggregateRecord<'a> {
    score: Score,
    seen_in: BTreeSet<&'a ChannelId>,
}

/// Fagin's Algorithm over per-channel sorted lists, aggregating by sum.
///
/// Sorted access proceeds round-robin, one position per list per round, until
/// `k` items have been seen in every list or every list is exhausted. Items
/// seen in only some lists are then completed by random access. Any item
/// never reached by a cursor cannot outrank the `k` fully seen ones, because
/// every list is read in non-increasing score order.
///
/// Empty lists are left out of the "every list" count: they contribute no
/// score, and keeping them would stop any item from ever being fully seen.
#[derive(Debug, Default, Clone, Copy)]
pub struct FaginAggregator;

impl FaginAggregator {
    pub fn aggregate(
        &self,
        lists: &BTreeMap<ChannelId, SortedList>,
        k: usize,
    ) -> Result<RankedResult, TopKError> {
        self.run(lists, k).map(|aggregation| aggregation.result)
    }

    pub fn run(
        &self,
        lists: &BTreeMap<ChannelId, SortedList>,
        k: usize,
    ) -> Result<Aggregation, TopKError> {
        for (registered, list) in lists {
            if registered != list.list_id() {
                return Err(TopKError::MalformedList {
                    list: registered.as_str().to_string(),
                    reason: MalformedReason::IdMismatch {
                        registered: registered.as_str().to_string(),
                        labelled: list.list_id().as_str().to_string(),
                    },
                });
            }
        }

        let active: Vec<(&ChannelId, &SortedList)> =
            lists.iter().filter(|(_, list)| !list.is_empty()).collect();

        let mut stats = AggregationStats {
            lists: active.len(),
            ..AggregationStats::default()
        };

        if k == 0 || active.is_empty() {
            return Ok(Aggregation {
                result: RankedResult::default(),
                stats,
            });
        }

        let list_count = active.len();
        let max_len = active.iter().map(|(_, list)| list.len()).max().unwrap_or(0);
        let mut records: HashMap<&ItemKey, AggregateRecord> = HashMap::new();

        // 1. Sorted access
        let mut depth = 0;
        loop {
            for &(id, list) in &active {
                if let Some((key, score)) = list.get(depth) {
                    stats.sorted_accesses += 1;
                    let record = records.entry(key).or_default();
                    record.score = record.score.saturating_add(score);
                    record.seen_in.insert(id);
                    if record.seen_in.len() == list_count {
                        stats.fully_seen += 1;
                    }
                }
            }
            depth += 1;

            if stats.fully_seen >= k || depth >= max_len {
                break;
            }
        }
        stats.rounds = depth;
        stats.items_seen = records.len();

        // 2. Random access
        for (key, record) in records.iter_mut() {
            if record.seen_in.len() == list_count {
                continue;
            }
            for &(id, list) in &active {
                if record.seen_in.contains(id) {
                    continue;
                }
                stats.random_accesses += 1;
                if let Some(score) = list.score_of(key) {
                    record.score = record.score.saturating_add(score);
                }
            }
        }

        // 3. Finalize
        let mut totals: Vec<(&ItemKey, Score)> = records
            .into_iter()
            .map(|(key, record)| (key, record.score))
            .collect();
        totals.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        totals.truncate(k);

        let items = totals
            .into_iter()
            .map(|(key, score)| RankedItem {
                key: key.clone(),
                score,
            })
            .collect();

        tracing::debug!(
            k,
            lists = stats.lists,
            rounds = stats.rounds,
            sorted_accesses = stats.sorted_accesses,
            random_accesses = stats.random_accesses,
            items_seen = stats.items_seen,
            fully_seen = stats.fully_seen,
            "fagin aggregation finished"
        );

        Ok(Aggregation {
            result: RankedResult::from_ordered(items),
            stats,
        })
    }
}
