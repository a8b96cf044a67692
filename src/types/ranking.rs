use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::types::identifiers::ItemKey;

/// Play count. Always non-negative once it has passed list construction.
pub type Score = u64;

/// One entry of a ranking: an item and its total score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedItem {
    pub key: ItemKey,
    pub score: Score,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RankingOrderError {
    #[error("Ranking out of order at position {position}")]
    OutOfOrder { position: usize },
}

/// Global top-K ranking, ordered by (score desc, item key asc).
///
/// Serialized as a plain list; deserializing checks the order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<RankedItem>", into = "Vec<RankedItem>")]
pub struct RankedResult {
    items: Vec<RankedItem>,
}

fn first_out_of_order(items: &[RankedItem]) -> Option<usize> {
    items
        .windows(2)
        .position(|w| !(w[0].score > w[1].score || (w[0].score == w[1].score && w[0].key < w[1].key)))
        .map(|i| i + 1)
}

impl TryFrom<Vec<RankedItem>> for RankedResult {
    type Error = RankingOrderError;

    fn try_from(items: Vec<RankedItem>) -> Result<Self, Self::Error> {
        match first_out_of_order(&items) {
            Some(position) => Err(RankingOrderError::OutOfOrder { position }),
            None => Ok(Self { items }),
        }
    }
}

impl From<RankedResult> for Vec<RankedItem> {
    fn from(result: RankedResult) -> Self {
        result.items
    }
}

impl RankedResult {
    /// Callers must hand over items already in ranking order.
    pub(crate) fn from_ordered(items: Vec<RankedItem>) -> Self {
        debug_assert!(first_out_of_order(&items).is_none());
        Self { items }
    }

    pub fn items(&self) -> &[RankedItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// 0-based position of an item, if it made the ranking.
    pub fn rank_of(&self, key: &ItemKey) -> Option<usize> {
        self.items.iter().position(|item| &item.key == key)
    }

    pub fn scores(&self) -> Vec<Score> {
        self.items.iter().map(|item| item.score).collect()
    }

    /// Content hash of the canonical JSON encoding.
    ///
    /// Two rankings with the same fingerprint are byte-identical.
    pub fn fingerprint(&self) -> String {
        // Serializing plain strings and integers cannot fail.
        let canonical = serde_json::to_vec(&self.items).unwrap_or_default();

        let mut hasher = Sha256::new();
        hasher.update(&canonical);
        format!("sha256:{}", hex::encode(hasher.finalize()))
    }
}

/// One row of a period comparison.
///
/// `previous_rank` is `None` (serialized as `null`) and `previous_plays` is
/// zero when the item did not make the reference ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonEntry {
    pub rank: usize,
    pub title: String,
    pub performer: String,
    pub plays: Score,
    pub previous_plays: Score,
    pub previous_rank: Option<usize>,
}

impl ComparisonEntry {
    /// Positive when the item climbed, negative when it dropped.
    pub fn rank_change(&self) -> Option<i128> {
        self.previous_rank
            .map(|previous| previous as i128 - self.rank as i128)
    }

    /// Exact for any pair of `u64` play counts.
    pub fn plays_change(&self) -> i128 {
        i128::from(self.plays) - i128::from(self.previous_plays)
    }
}

/// Current ranking annotated with the reference period, ordered by current rank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComparisonResult {
    pub entries: Vec<ComparisonEntry>,
}

impl ComparisonResult {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(rank: usize, previous_rank: Option<usize>, plays: Score, previous_plays: Score) -> ComparisonEntry {
        ComparisonEntry {
            rank,
            title: "t".into(),
            performer: "p".into(),
            plays,
            previous_plays,
            previous_rank,
        }
    }

    #[test]
    fn rank_change_is_signed_climb() {
        assert_eq!(entry(0, Some(3), 10, 4).rank_change(), Some(3));
        assert_eq!(entry(5, Some(1), 10, 4).rank_change(), Some(-4));
        assert_eq!(entry(2, None, 10, 0).rank_change(), None);
    }

    #[test]
    fn plays_change_handles_drop() {
        assert_eq!(entry(0, Some(0), 3, 9).plays_change(), -6);
    }

    #[test]
    fn changes_do_not_wrap_at_extreme_counts() {
        assert_eq!(entry(0, Some(0), u64::MAX, 0).plays_change(), i128::from(u64::MAX));
        assert_eq!(entry(0, Some(0), 0, u64::MAX).plays_change(), -i128::from(u64::MAX));
        assert_eq!(
            entry(0, Some(usize::MAX), 1, 1).rank_change(),
            Some(usize::MAX as i128)
        );
    }

    fn ranked(key: &str, score: Score) -> RankedItem {
        RankedItem {
            key: ItemKey::new(key, "p").unwrap(),
            score,
        }
    }

    #[test]
    fn deserializing_checks_ranking_order() {
        let ordered = vec![ranked("b", 5), ranked("a", 3), ranked("c", 3)];
        let json = serde_json::to_string(&ordered).unwrap();
        let result: RankedResult = serde_json::from_str(&json).unwrap();
        assert_eq!(result.scores(), vec![5, 3, 3]);

        let ascending = serde_json::to_string(&vec![ranked("a", 3), ranked("b", 5)]).unwrap();
        assert!(serde_json::from_str::<RankedResult>(&ascending).is_err());

        let tie_out_of_key_order = vec![ranked("c", 3), ranked("a", 3)];
        assert_eq!(
            RankedResult::try_from(tie_out_of_key_order),
            Err(RankingOrderError::OutOfOrder { position: 1 })
        );

        let duplicate = vec![ranked("a", 3), ranked("a", 3)];
        assert!(RankedResult::try_from(duplicate).is_err());
    }

    #[test]
    fn fingerprint_of_empty_ranking_is_stable() {
        let a = RankedResult::default();
        let b = RankedResult::from_ordered(Vec::new());
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert!(a.fingerprint().starts_with("sha256:"));
    }
}
