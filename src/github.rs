use anyhow::{Context, bail};
use async_trait::async_trait;
use reqwest::{Client, Url};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use crate::error::{FetchError, Result};
use crate::source::{ActivitySource, REPOS_PER_PAGE};
use crate::summary::{ContributionDay, Profile, RepoCounts, sum_yearly_totals};

pub const DEFAULT_GITHUB_API: &str = "https://api.github.com";
pub const DEFAULT_CONTRIBUTIONS_API: &str = "https://github-contributions-api.jogruber.de";

const USER_AGENT: &str = concat!("ghsummary/", env!("CARGO_PKG_VERSION"));
const GITHUB_ACCEPT: &str = "application/vnd.github+json";

/// [`ActivitySource`] backed by the public GitHub REST API and the
/// contributions calendar API. No authentication.
#[derive(Clone)]
pub struct HttpSource {
    http: Arc<Client>,
    github_api: Arc<Url>,
    contributions_api: Arc<Url>,
}

impl HttpSource {
    pub fn new(github_api: &str, contributions_api: &str) -> anyhow::Result<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build HTTP client")?;

        Self::with_client(http, github_api, contributions_api)
    }

    /// Uses a preconfigured client. GitHub rejects requests without a
    /// `User-Agent`, so the client should set one.
    pub fn with_client(
        http: Client,
        github_api: &str,
        contributions_api: &str,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            http: Arc::new(http),
            github_api: Arc::new(parse_base(github_api)?),
            contributions_api: Arc::new(parse_base(contributions_api)?),
        })
    }

    fn profile_url(&self, user: &str) -> Url {
        endpoint(&self.github_api, &["users", user], &[])
    }

    fn repos_url(&self, user: &str, page: u32) -> Url {
        let per_page = REPOS_PER_PAGE.to_string();
        let page = page.to_string();
        endpoint(
            &self.github_api,
            &["users", user, "repos"],
            &[("per_page", &per_page), ("page", &page), ("sort", "updated")],
        )
    }

    fn totals_url(&self, user: &str) -> Url {
        endpoint(&self.contributions_api, &["v4", user], &[])
    }

    fn calendar_url(&self, user: &str) -> Url {
        endpoint(&self.contributions_api, &["v4", user], &[("y", "last")])
    }

    /// GET `url` and decode the body as JSON. Non-2xx statuses are errors
    /// regardless of the body.
    async fn get_json(&self, url: Url, headers: HeaderMap) -> Result<Value> {
        debug!(%url, "GET");

        let resp = self.http.get(url.clone()).headers(headers).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        resp.json::<Value>().await.map_err(|e| {
            if e.is_decode() {
                FetchError::malformed(url.as_str(), format!("invalid JSON: {e}"))
            } else {
                FetchError::Transport(e)
            }
        })
    }

    async fn get_github(&self, url: Url) -> Result<Value> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_ACCEPT));
        self.get_json(url, headers).await
    }
}

fn parse_base(raw: &str) -> anyhow::Result<Url> {
    let url = Url::parse(raw).with_context(|| format!("Invalid base URL {raw:?}"))?;
    if url.cannot_be_a_base() {
        bail!("Base URL {raw:?} cannot carry a path");
    }
    Ok(url)
}

/// Appends `segments` to the base path, percent-encoding each one, so a
/// login can never add path components, a query or a fragment.
fn endpoint(base: &Url, segments: &[&str], query: &[(&str, &str)]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query);
    }
    url
}

#[async_trait]
impl ActivitySource for HttpSource {
    async fn profile(&self, user: &str) -> Result<Profile> {
        let url = self.profile_url(user);
        let json = self.get_github(url.clone()).await?;
        if !json.is_object() {
            return Err(FetchError::malformed(url.as_str(), "expected a JSON object"));
        }
        serde_json::from_value(json)
            .map_err(|e| FetchError::malformed(url.as_str(), e.to_string()))
    }

    async fn repo_page(&self, user: &str, page: u32) -> Result<Vec<RepoCounts>> {
        let url = self.repos_url(user, page);
        let json = self.get_github(url.clone()).await?;

        match json {
            Value::Array(entries) => Ok(entries.iter().map(RepoCounts::from_value).collect()),
            other => {
                let reason = other
                    .get("message")
                    .and_then(Value::as_str)
                    .map(|m| format!("error payload: {m}"))
                    .unwrap_or_else(|| "expected a JSON array".to_string());
                Err(FetchError::malformed(url.as_str(), reason))
            }
        }
    }

    async fn yearly_totals(&self, user: &str) -> Result<u64> {
        let url = self.totals_url(user);
        let json = self.get_json(url.clone(), HeaderMap::new()).await?;

        let totals = json
            .get("total")
            .ok_or_else(|| FetchError::malformed(url.as_str(), "missing `total`"))?;
        Ok(sum_yearly_totals(totals))
    }

    async fn recent_calendar(&self, user: &str) -> Result<Vec<ContributionDay>> {
        let url = self.calendar_url(user);
        let json = self.get_json(url.clone(), HeaderMap::new()).await?;

        let days = json
            .get("contributions")
            .and_then(Value::as_array)
            .ok_or_else(|| FetchError::malformed(url.as_str(), "missing `contributions` array"))?;
        Ok(days.iter().filter_map(ContributionDay::from_value).collect())
    }
}
