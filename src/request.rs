//! Typed request boundary for the top-played query.
//!
//! Everything a request may omit is filled in here, from [`EngineConfig`];
//! the engine below this point only ever sees explicit windows and limits.

use std::collections::BTreeSet;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::comparison::window::{TimeWindow, WindowError};
use crate::config::EngineConfig;
use crate::types::error::TopPlayedError;
use crate::types::identifiers::ChannelId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    #[error("Channels must be a JSON list of strings: {0}")]
    InvalidChannels(String),
    #[error("Channel names must not be empty")]
    EmptyChannel,
    #[error("Limit must be a positive integer, got {0}")]
    InvalidLimit(i64),
}

/// A top-played request as received, before defaults are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopPlayedRequest {
    #[serde(default)]
    pub channels: Vec<String>,
    pub start: Option<DateTime<FixedOffset>>,
    pub end: Option<DateTime<FixedOffset>>,
    pub limit: Option<i64>,
}

/// A fully resolved query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopPlayedQuery {
    pub channels: BTreeSet<ChannelId>,
    pub window: TimeWindow,
    pub limit: usize,
}

impl TopPlayedRequest {
    /// Validate and fill defaults: `end = start + default window`,
    /// `limit = default limit`.
    pub fn resolve(&self, config: &EngineConfig) -> Result<TopPlayedQuery, TopPlayedError> {
        let start = required("start", self.start)?;

        let channels = self
            .channels
            .iter()
            .map(|raw| ChannelId::new(raw.as_str()).map_err(|_| RequestError::EmptyChannel))
            .collect::<Result<BTreeSet<_>, _>>()?;

        let limit = match self.limit {
            None => config.default_limit,
            Some(raw) if raw > 0 => usize::try_from(raw).map_err(|_| RequestError::InvalidLimit(raw))?,
            Some(raw) => return Err(RequestError::InvalidLimit(raw).into()),
        };

        let end = match self.end {
            Some(end) => end,
            None => start
                .checked_add_signed(config.default_window())
                .ok_or(WindowError::OutOfRange)?,
        };
        let window = TimeWindow::new(start, end)?;

        Ok(TopPlayedQuery {
            channels,
            window,
            limit,
        })
    }
}

/// The one check every required field goes through.
fn required<T>(field: &'static str, value: Option<T>) -> Result<T, RequestError> {
    value.ok_or(RequestError::MissingField(field))
}

/// Parse the `channels` parameter, which arrives as a JSON list of strings.
///
/// An absent parameter means no channels.
pub fn parse_channels(raw: Option<&str>) -> Result<Vec<String>, RequestError> {
    match raw {
        None => Ok(Vec::new()),
        Some(raw) => serde_json::from_str(raw).map_err(|e| RequestError::InvalidChannels(e.to_string())),
    }
}
