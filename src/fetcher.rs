//! fetcher.rs
//!
//! Sequences the remote reads behind an [`ActivitySource`] and folds them
//! into one [`ActivitySummary`]. Every read is isolated: a failure is logged
//! and replaced by the default for that metric only, so `fetch` itself
//! cannot fail.

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::source::{ActivitySource, REPOS_PER_PAGE};
use crate::summary::{
    ActivitySummary, Profile, RepoCounts, RepoTotals, current_streak, sum_repo_counts,
};

/// Upper bound on listing pages requested (1,000 repositories).
pub const MAX_REPO_PAGES: u32 = 10;

pub struct ActivitySummaryFetcher<S> {
    source: S,
}

impl<S: ActivitySource + Sync> ActivitySummaryFetcher<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    #[cfg(test)]
    fn source(&self) -> &S {
        &self.source
    }

    /// Builds the summary for `user`, walking the streak back from `today`.
    pub async fn fetch(&self, user: &str, today: NaiveDate) -> ActivitySummary {
        let profile = self.fetch_profile(user).await;
        let repos = self.fetch_repos(user).await;
        let RepoTotals { stars, forks } = sum_repo_counts(&repos);
        let total_contributions = self.fetch_total_contributions(user).await;
        let current_streak = self.fetch_streak(user, today).await;

        let summary = ActivitySummary {
            profile,
            total_contributions,
            current_streak,
            total_stars: stars,
            total_forks: forks,
        };

        info!(
            user,
            available = summary.is_available(),
            repos = repos.len(),
            stars = summary.total_stars,
            forks = summary.total_forks,
            contributions = summary.total_contributions,
            streak = summary.current_streak,
            "activity summary ready"
        );
        summary
    }

    async fn fetch_profile(&self, user: &str) -> Option<Profile> {
        match self.source.profile(user).await {
            Ok(profile) => Some(profile),
            Err(e) => {
                warn!(user, "profile unavailable: {e}");
                None
            }
        }
    }

    /// Collects listing pages in order until a short, empty or failed page,
    /// or until [`MAX_REPO_PAGES`] pages have been read.
    async fn fetch_repos(&self, user: &str) -> Vec<RepoCounts> {
        let mut repos = Vec::new();

        for page in 1..=MAX_REPO_PAGES {
            let entries = match self.source.repo_page(user, page).await {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(user, page, "stopping repository listing: {e}");
                    break;
                }
            };

            let len = entries.len();
            repos.extend(entries);

            if len < REPOS_PER_PAGE {
                break;
            }
        }

        repos
    }

    async fn fetch_total_contributions(&self, user: &str) -> u64 {
        self.source.yearly_totals(user).await.unwrap_or_else(|e| {
            warn!(user, "contribution totals unavailable: {e}");
            0
        })
    }

    async fn fetch_streak(&self, user: &str, today: NaiveDate) -> u32 {
        match self.source.recent_calendar(user).await {
            Ok(calendar) => current_streak(&calendar, today),
            Err(e) => {
                warn!(user, "contribution calendar unavailable: {e}");
                0
            }
        }
    }
}
