//! tenure.rs
//!
//! How long an account has existed, as "X years, Y months, Z days".
//!
//! Chrono has no calendar-aware year/month/day difference, so the borrowing
//! is done by hand: a negative day count borrows the length of the month
//! before `today`, a negative month count borrows a year.

use chrono::{Datelike, NaiveDate};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tenure {
    pub years: u32,
    pub months: u32,
    pub days: u32,
}

impl fmt::Display for Tenure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} year{}, {} month{}, {} day{}",
            self.years,
            plural(self.years),
            self.months,
            plural(self.months),
            self.days,
            plural(self.days)
        )
    }
}

fn plural(n: u32) -> &'static str {
    if n == 1 { "" } else { "s" }
}

/// Calendar difference between `since` and `today`. Zero if `since` is in
/// the future.
pub fn tenure(since: NaiveDate, today: NaiveDate) -> Tenure {
    if since >= today {
        return Tenure::default();
    }

    let mut years = today.year() - since.year();
    let mut months = today.month() as i32 - since.month() as i32;
    let mut days = today.day() as i32 - since.day() as i32;

    if days < 0 {
        months -= 1;
        days += days_in_previous_month(today) as i32;
    }

    if months < 0 {
        years -= 1;
        months += 12;
    }

    Tenure {
        years: years.max(0) as u32,
        months: months.max(0) as u32,
        days: days.max(0) as u32,
    }
}

/// Length of the month before the one `date` falls in (leap years included).
fn days_in_previous_month(date: NaiveDate) -> u32 {
    date.with_day(1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(30)
}
