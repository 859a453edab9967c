use async_trait::async_trait;

use crate::error::Result;
use crate::summary::{ContributionDay, Profile, RepoCounts};

/// Number of repositories requested per listing page.
pub const REPOS_PER_PAGE: usize = 100;

/// The remote reads the summary is assembled from. Each call is independent;
/// a failure in one says nothing about the others.
#[async_trait]
pub trait ActivitySource {
    /// Profile metadata for `user`.
    async fn profile(&self, user: &str) -> Result<Profile>;

    /// One page (1-based) of the user's repository listing, at most
    /// [`REPOS_PER_PAGE`] entries. A payload that is not a list is an error.
    async fn repo_page(&self, user: &str, page: u32) -> Result<Vec<RepoCounts>>;

    /// Sum of the per-year contribution totals.
    async fn yearly_totals(&self, user: &str) -> Result<u64>;

    /// Contribution calendar covering at least the trailing year.
    async fn recent_calendar(&self, user: &str) -> Result<Vec<ContributionDay>>;
}
