//! Public GitHub activity summary: profile, star/fork totals, lifetime
//! contributions and the current contribution streak.

pub mod config;
pub mod error;
pub mod fetcher;
pub mod github;
pub mod report;
pub mod source;
pub mod summary;
pub mod svg;
pub mod tenure;

pub use fetcher::ActivitySummaryFetcher;
pub use github::HttpSource;
pub use source::ActivitySource;
pub use summary::ActivitySummary;
