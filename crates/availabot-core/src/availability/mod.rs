//! Free evening availability from calendar busy data.

mod calendar;
mod evening;

pub use calendar::{BusyCalendar, BusyInterval, QueryWindow};
pub use evening::{
    CANDIDATE_DAYS, EVENING_START_HOUR, MAX_FREE_EVENINGS, compute_free_evenings,
};
