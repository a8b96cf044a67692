use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::comparison::window::TimeWindow;
use crate::source::{ChannelCounts, ScoreSource, SourceError};
use crate::types::identifiers::{ChannelId, ItemKey};

#[derive(Debug, Error)]
pub enum PlayLogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Play of {item} on {channel} ends before it starts")]
    EndBeforeStart { channel: ChannelId, item: ItemKey },
}

/// One broadcast of an item on a channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Play {
    pub channel: ChannelId,
    #[serde(flatten)]
    pub item: ItemKey,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// In-memory play history, indexed by channel and by item.
///
/// A play belongs to a window when its start instant lies inside it.
#[derive(Debug, Default, Clone)]
pub struct PlayLog {
    by_channel: BTreeMap<ChannelId, Vec<Play>>,
    by_item: BTreeMap<ItemKey, Vec<Play>>,
}

impl PlayLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, play: Play) -> Result<(), PlayLogError> {
        if play.end < play.start {
            return Err(PlayLogError::EndBeforeStart {
                channel: play.channel,
                item: play.item,
            });
        }

        insert_by_start(self.by_item.entry(play.item.clone()).or_default(), play.clone());
        insert_by_start(self.by_channel.entry(play.channel.clone()).or_default(), play);
        Ok(())
    }

    /// Load a JSON array of plays.
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, PlayLogError> {
        let plays: Vec<Play> = serde_json::from_reader(reader)?;
        let mut log = PlayLog::new();
        for play in plays {
            log.record(play)?;
        }
        Ok(log)
    }

    pub fn from_path(path: &Path) -> Result<Self, PlayLogError> {
        let f = std::fs::File::open(path)?;
        Self::from_json_reader(std::io::BufReader::new(f))
    }

    pub fn len(&self) -> usize {
        self.by_channel.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_channel.is_empty()
    }

    /// Plays on one channel that started inside the window, oldest first.
    pub fn channel_plays(&self, channel: &ChannelId, window: &TimeWindow) -> Vec<&Play> {
        self.by_channel
            .get(channel)
            .map(|plays| in_window(plays, window))
            .unwrap_or_default()
    }

    /// Plays of one item across all channels that started inside the window,
    /// oldest first.
    pub fn song_plays(&self, item: &ItemKey, window: &TimeWindow) -> Vec<&Play> {
        self.by_item
            .get(item)
            .map(|plays| in_window(plays, window))
            .unwrap_or_default()
    }

    /// Group-and-count of a channel's plays in the window.
    pub fn counts(&self, channel: &ChannelId, window: &TimeWindow) -> ChannelCounts {
        let mut counts = ChannelCounts::new();
        for play in self.channel_plays(channel, window) {
            *counts.entry(play.item.clone()).or_insert(0) += 1;
        }
        counts
    }
}

#[async_trait]
impl ScoreSource for PlayLog {
    async fn channel_counts(
        &self,
        channel: &ChannelId,
        window: &TimeWindow,
    ) -> Result<ChannelCounts, SourceError> {
        Ok(self.counts(channel, window))
    }
}

// Keeps each index sorted by start; equal starts keep insertion order.
fn insert_by_start(plays: &mut Vec<Play>, play: Play) {
    let at = plays.partition_point(|existing| existing.start <= play.start);
    plays.insert(at, play);
}

fn in_window<'a>(plays: &'a [Play], window: &TimeWindow) -> Vec<&'a Play> {
    let from = plays.partition_point(|play| play.start < window.start());
    plays[from..]
        .iter()
        .take_while(|play| play.start <= window.end())
        .collect()
}
