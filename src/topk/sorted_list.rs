use std::collections::{BTreeMap, HashMap};

use crate::topk::{MalformedReason, TopKError};
use crate::types::identifiers::{ChannelId, ItemKey};
use crate::types::ranking::Score;

/// A channel's entries in descending score order, with a by-key index for
/// random access.
///
/// Only constructed through [`SortedListBuilder`] or
/// [`SortedList::from_entries`], both of which enforce that scores never
/// increase along the sequence and that every item appears once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortedList {
    list: ChannelId,
    entries: Vec<(ItemKey, Score)>,
    positions: HashMap<ItemKey, usize>,
}

impl SortedList {
    /// Adopt a sequence that is already sorted by the caller.
    pub fn from_entries(
        list: impl Into<String>,
        entries: Vec<(ItemKey, Score)>,
    ) -> Result<Self, TopKError> {
        let raw = list.into();
        let list = ChannelId::new(raw.clone()).map_err(|_| TopKError::MalformedList {
            list: raw,
            reason: MalformedReason::EmptyListId,
        })?;

        if let Some(position) = entries
            .windows(2)
            .position(|pair| pair[0].1 < pair[1].1)
        {
            return Err(TopKError::MalformedList {
                list: list.as_str().to_string(),
                reason: MalformedReason::NotDescending {
                    position: position + 1,
                },
            });
        }

        let positions = index_positions(&list, &entries)?;

        Ok(SortedList {
            list,
            entries,
            positions,
        })
    }

    pub fn list_id(&self) -> &ChannelId {
        &self.list
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sorted access: the entry at `position`, if the list is that long.
    pub fn get(&self, position: usize) -> Option<(&ItemKey, Score)> {
        self.entries.get(position).map(|(key, score)| (key, *score))
    }

    /// Random access: the item's score in this list, `None` when absent.
    pub fn score_of(&self, key: &ItemKey) -> Option<Score> {
        self.positions.get(key).map(|&position| self.entries[position].1)
    }

    pub fn entries(&self) -> &[(ItemKey, Score)] {
        &self.entries
    }
}

fn index_positions(
    list: &ChannelId,
    entries: &[(ItemKey, Score)],
) -> Result<HashMap<ItemKey, usize>, TopKError> {
    let mut positions = HashMap::with_capacity(entries.len());
    for (position, (key, _)) in entries.iter().enumerate() {
        if positions.insert(key.clone(), position).is_some() {
            return Err(TopKError::MalformedList {
                list: list.as_str().to_string(),
                reason: MalformedReason::DuplicateItem(key.clone()),
            });
        }
    }
    Ok(positions)
}

/// Turns raw per-channel counts into [`SortedList`]s.
///
/// Order is score descending; equal scores fall back to item key ascending,
/// so the output never depends on the iteration order of the input.
#[derive(Debug, Default, Clone, Copy)]
pub struct SortedListBuilder;

impl SortedListBuilder {
    pub fn build<I>(&self, list: ChannelId, counts: I) -> Result<SortedList, TopKError>
    where
        I: IntoIterator<Item = (ItemKey, i64)>,
    {
        let mut entries = Vec::new();
        for (item, raw) in counts {
            let score = Score::try_from(raw).map_err(|_| TopKError::InvalidScore {
                list: list.clone(),
                item: item.clone(),
                score: raw,
            })?;
            entries.push((item, score));
        }

        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        let positions = index_positions(&list, &entries)?;

        Ok(SortedList {
            list,
            entries,
            positions,
        })
    }

    /// Build one list per channel. The first invalid list aborts the batch.
    pub fn build_all(
        &self,
        counts: BTreeMap<ChannelId, BTreeMap<ItemKey, i64>>,
    ) -> Result<BTreeMap<ChannelId, SortedList>, TopKError> {
        counts
            .into_iter()
            .map(|(channel, channel_counts)| {
                let list = self.build(channel.clone(), channel_counts)?;
                Ok((channel, list))
            })
            .collect()
    }
}
