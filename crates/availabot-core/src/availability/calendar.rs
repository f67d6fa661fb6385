//! Busy data supplied by the calendar provider.

use chrono::{DateTime, Duration, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A busy period as reported by the provider, timestamps in RFC 3339.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusyInterval {
    /// Start of the busy period.
    pub start: String,
    /// End of the busy period (exclusive).
    pub end: String,
}

impl BusyInterval {
    /// Creates a busy interval from raw timestamps.
    #[must_use]
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// Parses both timestamps.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TimestampParse`] if either value is not RFC 3339.
    pub fn parse(&self) -> Result<(DateTime<FixedOffset>, DateTime<FixedOffset>)> {
        Ok((parse_timestamp(&self.start)?, parse_timestamp(&self.end)?))
    }
}

fn parse_timestamp(value: &str) -> Result<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(value).map_err(|source| Error::TimestampParse {
        value: value.to_string(),
        source,
    })
}

/// The period a busy query must cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryWindow {
    /// Inclusive lower bound.
    pub time_min: DateTime<FixedOffset>,
    /// Upper bound.
    pub time_max: DateTime<FixedOffset>,
}

impl QueryWindow {
    /// The seven days (168 hours) following `start`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DateOutOfRange`] if the window would end past the
    /// last representable date.
    pub fn seven_days_from(start: DateTime<FixedOffset>) -> Result<Self> {
        let time_max = start
            .checked_add_signed(Duration::hours(168))
            .ok_or(Error::DateOutOfRange(start))?;
        Ok(Self {
            time_min: start,
            time_max,
        })
    }
}

/// Source of a user's busy periods.
pub trait BusyCalendar<C>: Send + Sync {
    /// Returns the busy periods within `window`, in no particular order.
    fn busy_intervals(
        &self,
        credential: &C,
        window: QueryWindow,
    ) -> impl Future<Output = Result<Vec<BusyInterval>>> + Send;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keeps_offset() {
        let interval = BusyInterval::new("2018-02-15T16:04:05+01:00", "2018-02-15T17:04:05Z");
        let (start, end) = interval.parse().unwrap();
        assert_eq!(start.offset().local_minus_utc(), 3600);
        assert_eq!(end.offset().local_minus_utc(), 0);
    }

    #[test]
    fn test_parse_error_names_value() {
        let interval = BusyInterval::new("2018-02-15T16:04:05+01:00", "tomorrow");
        let err = interval.parse().unwrap_err();
        assert!(matches!(&err, Error::TimestampParse { value, .. } if value == "tomorrow"));
    }

    #[test]
    fn test_seven_day_window() {
        let t0 = DateTime::parse_from_rfc3339("2018-02-15T15:04:05+01:00").unwrap();
        let window = QueryWindow::seven_days_from(t0).unwrap();
        assert_eq!(window.time_min, t0);
        assert_eq!(
            window.time_max,
            DateTime::parse_from_rfc3339("2018-02-22T15:04:05+01:00").unwrap()
        );
    }

    #[test]
    fn test_window_past_last_date_is_out_of_range() {
        let t0 = chrono::NaiveDate::MAX
            .and_hms_opt(0, 0, 0)
            .unwrap()
            .and_utc()
            .fixed_offset();
        assert!(matches!(
            QueryWindow::seven_days_from(t0),
            Err(Error::DateOutOfRange(start)) if start == t0
        ));
    }

    #[test]
    fn test_deserialize_provider_period() {
        let interval: BusyInterval = serde_json::from_str(
            r#"{"start":"2018-02-16T18:04:05+01:00","end":"2018-02-16T21:04:05+01:00"}"#,
        )
        .unwrap();
        assert!(interval.parse().is_ok());
    }
}
