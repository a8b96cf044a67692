use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WindowError {
    #[error("Window end {end} precedes start {start}")]
    EndBeforeStart {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    #[error("Reference offset must not be negative")]
    NegativeOffset,
    #[error("Shifting the window overflows the supported time range")]
    OutOfRange,
}

/// A closed time range `[start, end]` in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeWindow {
    /// Accepts instants in any timezone; they are normalized to UTC.
    pub fn new<Tz: TimeZone>(start: DateTime<Tz>, end: DateTime<Tz>) -> Result<Self, WindowError> {
        let start = start.with_timezone(&Utc);
        let end = end.with_timezone(&Utc);
        if end < start {
            return Err(WindowError::EndBeforeStart { start, end });
        }
        Ok(TimeWindow { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }

    /// The same window moved `offset` into the past. Both ends move.
    pub fn shifted_back(&self, offset: Duration) -> Result<Self, WindowError> {
        if offset < Duration::zero() {
            return Err(WindowError::NegativeOffset);
        }
        let start = self
            .start
            .checked_sub_signed(offset)
            .ok_or(WindowError::OutOfRange)?;
        let end = self
            .end
            .checked_sub_signed(offset)
            .ok_or(WindowError::OutOfRange)?;
        Ok(TimeWindow { start, end })
    }
}
