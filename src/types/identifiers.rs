use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Identifier of a channel, i.e. of one input list.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct ChannelId(String);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChannelIdError {
    #[error("Channel identifier must not be empty")]
    Empty,
}

impl ChannelId {
    pub fn new(raw: impl Into<String>) -> Result<Self, ChannelIdError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(ChannelIdError::Empty);
        }
        Ok(ChannelId(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ChannelId {
    type Error = ChannelIdError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        ChannelId::new(raw)
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ItemKeyError {
    #[error("Item title must not be empty")]
    EmptyTitle,
    #[error("Item performer must not be empty")]
    EmptyPerformer,
}

/// A playable item, identified by title and performer together.
///
/// The same title recorded by two performers is two distinct items. The
/// derived ordering (title, then performer) is the tie-break order used by
/// every ranking in this crate.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "ItemKeyParts")]
pub struct ItemKey {
    title: String,
    performer: String,
}

#[derive(Deserialize)]
struct ItemKeyParts {
    title: String,
    performer: String,
}

impl TryFrom<ItemKeyParts> for ItemKey {
    type Error = ItemKeyError;

    fn try_from(parts: ItemKeyParts) -> Result<Self, Self::Error> {
        ItemKey::new(parts.title, parts.performer)
    }
}

impl ItemKey {
    pub fn new(
        title: impl Into<String>,
        performer: impl Into<String>,
    ) -> Result<Self, ItemKeyError> {
        let title = title.into();
        let performer = performer.into();

        if title.is_empty() {
            return Err(ItemKeyError::EmptyTitle);
        }
        if performer.is_empty() {
            return Err(ItemKeyError::EmptyPerformer);
        }

        Ok(ItemKey { title, performer })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn performer(&self) -> &str {
        &self.performer
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.title, self.performer)
    }
}
