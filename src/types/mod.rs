pub mod error;
pub mod identifiers;
pub mod ranking;

pub use error::{ErrorKind, TopPlayedError};
pub use identifiers::{ChannelId, ChannelIdError, ItemKey, ItemKeyError};
pub use ranking::{ComparisonEntry, ComparisonResult, RankedItem, RankedResult, RankingOrderError, Score};
