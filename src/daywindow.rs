use chrono::{Days, NaiveDate};

use crate::error::ExtractError;

/// How far back a day-windowed provider is probed before giving up. The
/// content source may simply have no entry for a given day, which is not
/// the same thing as being unreachable.
pub const WINDOW_DAYS: u32 = 30;

/// Outcome of probing a single calendar date.
pub enum DayProbe<T> {
    /// Usable result; the walk stops here.
    Found(T),
    /// No usable entry for this date; step one day earlier.
    Skip,
}

/// Walk backward from `start`, one day at a time, at most `window` days.
/// Terminates on the first `Found` or reports `WindowExhausted` once the
/// budget is spent.
pub fn walk_days<T, F>(start: NaiveDate, window: u32, mut probe: F) -> Result<T, ExtractError>
where
    F: FnMut(NaiveDate) -> DayProbe<T>,
{
    let mut date = start;
    for _ in 0..window {
        if let DayProbe::Found(found) = probe(date) {
            return Ok(found);
        }
        date = match date.checked_sub_days(Days::new(1)) {
            Some(prev) => prev,
            None => break,
        };
    }
    Err(ExtractError::WindowExhausted { window })
}
