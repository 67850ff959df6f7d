//! Transaction deadlines.
//!
//! A deadline is the number of milliseconds since the network epoch
//! (see [`NETWORK_EPOCH_MILLIS`]) after which nodes reject the
//! transaction.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::uint64::UInt64;
use crate::config::NETWORK_EPOCH_MILLIS;
use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Deadline(UInt64);

impl Deadline {
    /// `now + horizon`, read from the wall clock.
    pub fn after(horizon: Duration) -> Result<Self, ValidationError> {
        Self::after_from(Utc::now(), horizon)
    }

    /// `from + horizon`. Deterministic counterpart of [`Deadline::after`].
    pub fn after_from(from: DateTime<Utc>, horizon: Duration) -> Result<Self, ValidationError> {
        let horizon_ms = i64::try_from(horizon.as_millis())
            .map_err(|_| ValidationError::invalid("deadline", "horizon too large"))?;
        let at = from
            .timestamp_millis()
            .checked_add(horizon_ms)
            .ok_or_else(|| ValidationError::invalid("deadline", "horizon too large"))?;
        Self::from_unix_millis(at)
    }

    /// Converts a Unix timestamp in milliseconds.
    pub fn from_unix_millis(unix_ms: i64) -> Result<Self, ValidationError> {
        let since_epoch = unix_ms
            .checked_sub(NETWORK_EPOCH_MILLIS)
            .filter(|ms| *ms >= 0)
            .ok_or_else(|| ValidationError::invalid("deadline", "before the network epoch"))?;
        Ok(Self(UInt64::new(since_epoch as u64)))
    }

    /// Wraps a raw wire value (milliseconds since the network epoch).
    pub const fn from_network_millis(ms: u64) -> Self {
        Self(UInt64::new(ms))
    }

    pub fn network_millis(self) -> UInt64 {
        self.0
    }

    /// The deadline as a UTC instant, if it is representable.
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        let since_epoch = i64::try_from(self.0.value()).ok()?;
        let unix_ms = NETWORK_EPOCH_MILLIS.checked_add(since_epoch)?;
        Utc.timestamp_millis_opt(unix_ms).single()
    }
}
