//! The evening availability calculation.
//!
//! An evening is the civil-time window `[19:00, 24:00)` in the reference
//! time's offset. Seven consecutive evenings are considered, starting today
//! if the reference is before 19:00 and tomorrow otherwise.

use chrono::{DateTime, Duration, FixedOffset, Timelike};
use tracing::warn;

use super::BusyInterval;
use crate::{Error, Result};

/// Local hour at which an evening starts.
pub const EVENING_START_HOUR: u32 = 19;

/// Number of consecutive evenings considered.
pub const CANDIDATE_DAYS: i64 = 7;

/// Maximum number of free evenings returned.
pub const MAX_FREE_EVENINGS: usize = 3;

/// Returns the start of up to three free evenings, in chronological order.
///
/// An evening is busy if some interval ends after the evening starts and
/// starts no later than its midnight end. An interval ending exactly at 19:00
/// leaves the evening free.
///
/// # Errors
///
/// Returns [`Error::TimestampParse`] if any interval holds a malformed
/// timestamp; no partial result is produced. Returns
/// [`Error::DateOutOfRange`] if a candidate evening falls past the last
/// representable date.
pub fn compute_free_evenings(
    reference: DateTime<FixedOffset>,
    busy: &[BusyInterval],
) -> Result<Vec<DateTime<FixedOffset>>> {
    let busy = busy
        .iter()
        .map(BusyInterval::parse)
        .collect::<Result<Vec<_>>>()
        .inspect_err(|e| warn!("Unable to compute availability: {e}"))?;

    let first = first_evening(reference)?;
    let evening_len = Duration::hours(24 - i64::from(EVENING_START_HOUR));

    let mut free = Vec::with_capacity(MAX_FREE_EVENINGS);
    for day in 0..CANDIDATE_DAYS {
        if free.len() == MAX_FREE_EVENINGS {
            break;
        }

        let evening_start = first
            .checked_add_signed(Duration::days(day))
            .ok_or(Error::DateOutOfRange(reference))?;
        let evening_end = evening_start
            .checked_add_signed(evening_len)
            .ok_or(Error::DateOutOfRange(reference))?;

        let is_busy = busy
            .iter()
            .any(|&(start, end)| end > evening_start && start <= evening_end);
        if !is_busy {
            free.push(evening_start);
        }
    }

    Ok(free)
}

/// Start of the first candidate evening for `reference`.
fn first_evening(reference: DateTime<FixedOffset>) -> Result<DateTime<FixedOffset>> {
    let offset = *reference.offset();
    let date = if reference.hour() >= EVENING_START_HOUR {
        reference.date_naive().succ_opt()
    } else {
        Some(reference.date_naive())
    };

    date.and_then(|d| d.and_hms_opt(EVENING_START_HOUR, 0, 0))
        .and_then(|local| {
            local.checked_sub_signed(Duration::seconds(i64::from(offset.local_minus_utc())))
        })
        .map(|utc| DateTime::from_naive_utc_and_offset(utc, offset))
        .ok_or(Error::DateOutOfRange(reference))
}
