use chrono::{Datelike, NaiveDate};

use crate::summary::ActivitySummary;
use crate::tenure::tenure;

/// Shown wherever a value could not be fetched.
pub const PLACEHOLDER: &str = "—";
pub const UNAVAILABLE: &str = "Unable to load GitHub stats";

/// The stats in display order. Profile-derived values and a zero streak
/// fall back to [`PLACEHOLDER`].
pub fn stat_rows(summary: &ActivitySummary, today: NaiveDate) -> Vec<(&'static str, String)> {
    let profile = summary.profile.as_ref();
    let created = profile.and_then(|p| p.created_on());

    let streak = if summary.current_streak > 0 {
        format!("{} days", summary.current_streak)
    } else {
        PLACEHOLDER.to_string()
    };

    vec![
        ("Total Contributions", summary.total_contributions.to_string()),
        ("Current Streak", streak),
        ("Public Repos", or_placeholder(profile.map(|p| p.public_repos.to_string()))),
        ("Stars", summary.total_stars.to_string()),
        ("Forks", summary.total_forks.to_string()),
        ("Followers", or_placeholder(profile.map(|p| p.followers.to_string()))),
        ("Following", or_placeholder(profile.map(|p| p.following.to_string()))),
        ("Member Since", or_placeholder(created.map(|d| d.year().to_string()))),
        ("Tenure", or_placeholder(created.map(|d| tenure(d, today).to_string()))),
    ]
}

fn or_placeholder(value: Option<String>) -> String {
    value.unwrap_or_else(|| PLACEHOLDER.to_string())
}

/// Plain-text report: a header line, then one aligned line per stat.
pub fn render_text(summary: &ActivitySummary, today: NaiveDate) -> String {
    let mut out = String::new();

    match &summary.profile {
        None => {
            out.push_str(UNAVAILABLE);
            out.push('\n');
        }
        Some(p) => {
            out.push_str(&p.login);
            if let Some(name) = p.name.as_deref().filter(|n| !n.is_empty()) {
                out.push_str(&format!(" ({name})"));
            }
            out.push('\n');
            if let Some(bio) = p.bio.as_deref().filter(|b| !b.is_empty()) {
                out.push_str(bio);
                out.push('\n');
            }
        }
    }

    let rows = stat_rows(summary, today);
    let width = rows.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    for (key, value) in rows {
        out.push_str(&format!("{key:<width$}  {value}\n"));
    }

    out
}
