//! summary.rs
//!
//! Data model for the activity summary and the pure aggregation rules that
//! build it: star/fork sums, yearly contribution totals and the current
//! streak. Nothing in here touches the network.

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// How far back the streak walk looks, in days (offsets `0..STREAK_WINDOW_DAYS`).
pub const STREAK_WINDOW_DAYS: u64 = 365;

/// Public profile of a GitHub account (`GET /users/{user}`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default, deserialize_with = "null_as_default")]
    pub login: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub public_repos: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub followers: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub following: u32,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Profile {
    pub fn created_on(&self) -> Option<NaiveDate> {
        self.created_at.map(|ts| ts.date_naive())
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// An unparseable timestamp is treated like a missing one.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| {
        DateTime::parse_from_rfc3339(&s)
            .ok()
            .map(|ts| ts.with_timezone(&Utc))
    }))
}

/// Star and fork counts of one repository listing entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepoCounts {
    pub stars: Option<u64>,
    pub forks: Option<u64>,
}

impl RepoCounts {
    /// Reads the counts out of one entry of the repository listing.
    /// Anything that is not a non-negative integer counts as missing.
    pub fn from_value(entry: &Value) -> Self {
        Self {
            stars: entry.get("stargazers_count").and_then(Value::as_u64),
            forks: entry.get("forks_count").and_then(Value::as_u64),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepoTotals {
    pub stars: u64,
    pub forks: u64,
}

/// Sums stars and forks, missing counts as zero.
pub fn sum_repo_counts(repos: &[RepoCounts]) -> RepoTotals {
    repos.iter().fold(RepoTotals::default(), |acc, repo| RepoTotals {
        stars: acc.stars.saturating_add(repo.stars.unwrap_or(0)),
        forks: acc.forks.saturating_add(repo.forks.unwrap_or(0)),
    })
}

/// One day of the contribution calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ContributionDay {
    pub date: NaiveDate,
    pub count: u64,
}

impl ContributionDay {
    /// Parses `{"date": "YYYY-MM-DD", "count": N}`. Returns `None` for
    /// entries without a valid date; a missing count is zero.
    pub fn from_value(entry: &Value) -> Option<Self> {
        let date = entry
            .get("date")
            .and_then(Value::as_str)
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())?;
        // A fractional count rounds up so that any activity stays nonzero.
        let count = entry.get("count").map(numeric).unwrap_or(0.0).ceil() as u64;
        Some(Self { date, count })
    }
}

/// Sums every value of the per-year `total` object. Fractions are summed
/// before the result is truncated.
pub fn sum_yearly_totals(totals: &Value) -> u64 {
    match totals.as_object() {
        Some(map) => map.values().map(numeric).sum::<f64>() as u64,
        None => 0,
    }
}

// Positive finite numbers, given as JSON numbers or numeric strings
// ("12", "1.5", "1e3"), count; anything else is zero.
fn numeric(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|f| f.is_finite() && *f > 0.0).unwrap_or(0.0)
}

/// Counts consecutive days with contributions, walking back from `today`.
///
/// A zero count at offset 0 does not end the walk, since today's activity
/// may not be recorded yet. A zero count on any earlier day does. Dates
/// absent from the calendar count as zero. When a date appears twice the
/// first entry wins.
pub fn current_streak(calendar: &[ContributionDay], today: NaiveDate) -> u32 {
    if calendar.is_empty() {
        return 0;
    }

    let mut by_date: HashMap<NaiveDate, u64> = HashMap::with_capacity(calendar.len());
    for day in calendar {
        by_date.entry(day.date).or_insert(day.count);
    }

    let mut streak = 0u32;
    for offset in 0..STREAK_WINDOW_DAYS {
        let Some(date) = today.checked_sub_days(Days::new(offset)) else {
            break;
        };
        let count = by_date.get(&date).copied().unwrap_or(0);
        if count > 0 {
            streak += 1;
        } else if offset > 0 {
            break;
        }
    }
    streak
}

/// Everything the stats card displays. Each numeric field is either fully
/// computed from its source or left at zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ActivitySummary {
    pub profile: Option<Profile>,
    pub total_contributions: u64,
    pub current_streak: u32,
    pub total_stars: u64,
    pub total_forks: u64,
}

impl ActivitySummary {
    pub fn is_available(&self) -> bool {
        self.profile.is_some()
    }
}
