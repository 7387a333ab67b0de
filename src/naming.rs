use crate::error::NamingError;
use chrono::{DateTime, LocalResult, NaiveDate, NaiveTime, TimeZone};
use std::fmt;
use std::str::FromStr;

/// Sortable pattern for the boundary instant: date, `T`, then HHMM.
const BOUNDARY_FORMAT: &str = "%Y-%m-%dT%H%M";

/// Daily time-of-day at which the output file rotates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitAt {
    time: NaiveTime,
}

impl SplitAt {
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(|time| Self { time })
    }

    pub fn time(&self) -> NaiveTime {
        self.time
    }

    /// The instant this time-of-day falls on `date` in `tz`.
    ///
    /// A time skipped by a DST gap maps to one hour later; a repeated one
    /// maps to its first occurrence.
    pub fn on<Tz: TimeZone>(&self, date: NaiveDate, tz: &Tz) -> DateTime<Tz> {
        let naive = date.and_time(self.time);
        match tz.from_local_datetime(&naive) {
            LocalResult::Single(at) => at,
            LocalResult::Ambiguous(earliest, _) => earliest,
            LocalResult::None => tz
                .from_local_datetime(&(naive + chrono::Duration::hours(1)))
                .earliest()
                .unwrap_or_else(|| tz.from_utc_datetime(&naive)),
        }
    }

    /// The boundary that is active at `now`: today's occurrence if that
    /// instant has been reached, otherwise yesterday's.
    pub fn active_boundary<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> (NaiveDate, NaiveTime) {
        let today = now.naive_local().date();

        let date = if *now < self.on(today, &now.timezone()) {
            today.pred_opt().unwrap_or(today)
        } else {
            today
        };

        (date, self.time)
    }
}

impl FromStr for SplitAt {
    type Err = NamingError;

    /// Accepts `H:MM` or `HH:MM`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (hh, mm) = value
            .split_once(':')
            .ok_or_else(|| NamingError::MissingSeparator {
                value: value.to_string(),
            })?;

        let hour: u32 = hh.parse().map_err(|_| NamingError::InvalidHour {
            value: value.to_string(),
        })?;
        let minute: u32 = mm.parse().map_err(|_| NamingError::InvalidMinute {
            value: value.to_string(),
        })?;

        Self::new(hour, minute).ok_or_else(|| NamingError::OutOfRange {
            value: value.to_string(),
        })
    }
}

impl fmt::Display for SplitAt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.time.format("%H:%M"))
    }
}

/// Name of the file that should receive data at `now`.
///
/// Files cover `[boundary, next boundary)`, so a `now` before today's
/// split time still belongs to the file opened at yesterday's boundary.
pub fn file_name<Tz: TimeZone>(prefix: &str, split_at: SplitAt, now: &DateTime<Tz>) -> String {
    let (date, time) = split_at.active_boundary(now);
    let boundary = date.and_time(time);
    format!("{}-{}.csv", prefix, boundary.format(BOUNDARY_FORMAT))
}

/// Same as [`file_name`], parsing the split time from its `HH:MM` form.
pub fn csv_file_name<Tz: TimeZone>(
    prefix: &str,
    split_at: &str,
    now: &DateTime<Tz>,
) -> Result<String, NamingError> {
    let split_at: SplitAt = split_at.parse()?;
    Ok(file_name(prefix, split_at, now))
}
