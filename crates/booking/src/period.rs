use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use kitloan_core::{DomainError, DomainResult, ValueObject};

/// Longest allowed loan window, in hours.
pub const MAX_PERIOD_HOURS: i64 = 48;

/// A validated loan window `[withdrawal_at, return_at)`.
///
/// Instants are half-open: the unit is out from `withdrawal_at` inclusive
/// until `return_at` exclusive, so a window may start exactly when another
/// ends. Invariants are enforced once, at construction:
///
/// - `withdrawal_at` is not before the construction instant,
/// - `return_at` is not before `withdrawal_at`,
/// - the window is at most [`MAX_PERIOD_HOURS`] long.
///
/// There is no partially-valid `Period`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    withdrawal_at: DateTime<Utc>,
    return_at: DateTime<Utc>,
}

impl Period {
    pub fn new(
        withdrawal_at: DateTime<Utc>,
        return_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if withdrawal_at < now {
            return Err(DomainError::invalid_period(
                "withdrawal must not be in the past",
            ));
        }
        if return_at < withdrawal_at {
            return Err(DomainError::invalid_period(
                "return must not precede withdrawal",
            ));
        }
        if return_at - withdrawal_at > Duration::hours(MAX_PERIOD_HOURS) {
            return Err(DomainError::invalid_period(format!(
                "window must not exceed {MAX_PERIOD_HOURS} hours"
            )));
        }
        Ok(Self {
            withdrawal_at,
            return_at,
        })
    }

    pub fn withdrawal_at(&self) -> DateTime<Utc> {
        self.withdrawal_at
    }

    pub fn return_at(&self) -> DateTime<Utc> {
        self.return_at
    }

    pub fn duration(&self) -> Duration {
        self.return_at - self.withdrawal_at
    }

    /// Half-open overlap: `[s1,e1)` and `[s2,e2)` overlap iff
    /// `s1 < e2 && s2 < e1`. Back-to-back windows do not overlap.
    pub fn overlaps(&self, other: &Period) -> bool {
        self.withdrawal_at < other.return_at && other.withdrawal_at < self.return_at
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.withdrawal_at <= instant && instant < self.return_at
    }
}

impl ValueObject for Period {}
