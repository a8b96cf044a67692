pub mod fagin;
pub mod sorted_list;

use thiserror::Error;

use crate::types::identifiers::{ChannelId, ItemKey};

pub use fagin::{Aggregation, AggregationStats, FaginAggregator};
pub use sorted_list::{SortedList, SortedListBuilder};

/// Why a list was rejected as structurally invalid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedReason {
    #[error("list identifier is empty")]
    EmptyListId,
    #[error("list is registered under `{registered}` but labelled `{labelled}`")]
    IdMismatch { registered: String, labelled: String },
    #[error("item {0} appears more than once")]
    DuplicateItem(ItemKey),
    #[error("score increases at position {position}")]
    NotDescending { position: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TopKError {
    #[error("Invalid score {score} for {item} in list {list}")]
    InvalidScore {
        list: ChannelId,
        item: ItemKey,
        score: i64,
    },

    #[error("Malformed list `{list}`: {reason}")]
    MalformedList {
        list: String,
        reason: MalformedReason,
    },
}
