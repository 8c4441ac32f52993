//! Local date and time handling shared by every planner component.
//!
//! Timestamps are persisted in UTC. Everything the planner shows or accepts is
//! in the process-wide configured timezone, and all conversions go through
//! [`Clock`] so the calendar, the day view and the form processor agree on
//! where a local day starts and ends.

use crate::errors::{Error, Result};
use chrono::{
    DateTime, Datelike, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset,
    TimeDelta, TimeZone, Utc,
};
use chrono_tz::Tz;

/// A timestamp already converted to the configured local timezone.
pub type LocalDateTime = DateTime<FixedOffset>;

/// Fallback start time for a schedule entry without a start time
pub const SCHEDULE_START_FALLBACK: NaiveTime = hm(9, 0);
/// Fallback end time for a schedule entry whose end time is blank
pub const SCHEDULE_END_FALLBACK: NaiveTime = hm(10, 0);
/// Fallback time for a loose transaction without a time
pub const LOOSE_TRANSACTION_FALLBACK: NaiveTime = hm(12, 0);

/// Last representable microsecond of a local day
pub const END_OF_DAY: NaiveTime = match NaiveTime::from_hms_micro_opt(23, 59, 59, 999_999) {
    Some(time) => time,
    None => panic!("23:59:59.999999 is a valid time"),
};

/// Years accepted in a `date=` query value
const SELECTABLE_YEARS: std::ops::RangeInclusive<i32> = 1..=9999;

const fn hm(hour: u32, minute: u32) -> NaiveTime {
    match NaiveTime::from_hms_opt(hour, minute, 0) {
        Some(time) => time,
        None => NaiveTime::MIN,
    }
}

/// Source of "now" and of the configured timezone.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    tz: Tz,
    frozen_at: Option<DateTime<Utc>>,
}

impl Clock {
    /// A clock that reads the system time.
    #[must_use]
    pub const fn system(tz: Tz) -> Self {
        Self {
            tz,
            frozen_at: None,
        }
    }

    /// A clock that always reports `at` as the current instant.
    #[must_use]
    pub const fn frozen(tz: Tz, at: DateTime<Utc>) -> Self {
        Self {
            tz,
            frozen_at: Some(at),
        }
    }

    /// The configured timezone.
    #[must_use]
    pub const fn timezone(&self) -> Tz {
        self.tz
    }

    /// Current instant in local time.
    #[must_use]
    pub fn now(&self) -> LocalDateTime {
        self.localize(self.frozen_at.unwrap_or_else(Utc::now))
    }

    /// Current local calendar date.
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }

    /// Converts a stored UTC timestamp to local time.
    #[must_use]
    pub fn localize(&self, at: DateTime<Utc>) -> LocalDateTime {
        at.with_timezone(&self.tz).fixed_offset()
    }

    /// Same as [`Clock::localize`] for optional timestamps.
    #[must_use]
    pub fn localize_opt(&self, at: Option<DateTime<Utc>>) -> Option<LocalDateTime> {
        at.map(|t| self.localize(t))
    }

    /// Attaches the configured timezone to a naive local timestamp.
    ///
    /// Ambiguous local times (clocks turned back) resolve to the earlier
    /// instant. Local times skipped by a DST gap are read with the offset in
    /// force just before the gap.
    #[must_use]
    pub fn make_aware(&self, naive: NaiveDateTime) -> LocalDateTime {
        match self.tz.from_local_datetime(&naive) {
            LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.fixed_offset(),
            LocalResult::None => {
                let before_gap = naive - TimeDelta::days(1);
                let offset = self.tz.offset_from_local_datetime(&before_gap).earliest().map_or_else(
                    || self.tz.offset_from_utc_datetime(&naive).fix(),
                    |o| o.fix(),
                );
                let utc = naive - TimeDelta::seconds(i64::from(offset.local_minus_utc()));
                self.localize(Utc.from_utc_datetime(&utc))
            }
        }
    }

    /// Merges a local date with an optional `HH:MM` string into a local timestamp.
    ///
    /// A blank or absent string uses `fallback`. A malformed string is an
    /// [`Error::InvalidTime`], which callers report as a validation failure.
    pub fn combine_with_date(
        &self,
        date: NaiveDate,
        time: Option<&str>,
        fallback: NaiveTime,
    ) -> Result<LocalDateTime> {
        let time = match time.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => parse_hhmm(raw)?,
            None => fallback,
        };
        Ok(self.make_aware(date.and_time(time)))
    }

    /// UTC instants of local `00:00:00` and `23:59:59.999999` on `date`.
    #[must_use]
    pub fn day_bounds(&self, date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
        (
            self.make_aware(date.and_time(NaiveTime::MIN)).to_utc(),
            self.make_aware(date.and_time(END_OF_DAY)).to_utc(),
        )
    }

    /// UTC bounds covering every local day from `first` through `last`.
    #[must_use]
    pub fn range_bounds(&self, first: NaiveDate, last: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
        (self.day_bounds(first).0, self.day_bounds(last).1)
    }

    /// Reads the `date=YYYY-MM-DD` query value; anything else means today.
    ///
    /// Only years 1 through 9999 are accepted, so signed or extended years
    /// that chrono would parse also fall back to today.
    #[must_use]
    pub fn parse_selected_date(&self, raw: Option<&str>) -> NaiveDate {
        raw.and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok())
            .filter(|date| SELECTABLE_YEARS.contains(&date.year()))
            .unwrap_or_else(|| self.today())
    }
}

/// Parses a strict 24-hour `HH:MM` time of day.
pub fn parse_hhmm(raw: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(raw, "%H:%M").map_err(|_| Error::InvalidTime {
        value: raw.to_string(),
    })
}
