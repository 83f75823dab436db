use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::blocking::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::CommitHost;
use crate::error::{OrgPulseError, Result};
use crate::model::CommitRef;

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Fixed page size for collection endpoints, matching the API maximum.
const PAGE_SIZE: u32 = 100;

/// Blocking GitHub REST client. One instance per run; every call is a
/// single round trip with no retries.
pub struct GithubClient {
    http: Client,
    base_url: String,
    token: String,
}

impl GithubClient {
    pub fn new(token: String, api_url: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: api_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Response> {
        let endpoint = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .get(&endpoint)
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
            .query(query)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    OrgPulseError::Timeout {
                        endpoint: endpoint.clone(),
                    }
                } else {
                    OrgPulseError::Http(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(OrgPulseError::Fetch {
                endpoint,
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Walk numbered pages of a collection endpoint, starting at 1, until
    /// a page decodes to an empty list.
    fn get_paged<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<Vec<T>> {
        let mut items = Vec::new();
        let mut page = 1u32;
        loop {
            let mut params = query.to_vec();
            params.push(("page", page.to_string()));
            params.push(("per_page", PAGE_SIZE.to_string()));

            let batch: Vec<T> = self.get(path, &params)?.json()?;
            if batch.is_empty() {
                break;
            }
            debug!(path, page, count = batch.len(), "fetched page");
            items.extend(batch);
            page += 1;
        }
        Ok(items)
    }
}

impl CommitHost for GithubClient {
    fn list_repos(&self, org: &str) -> Result<Vec<String>> {
        let repos: Vec<RepoItem> = self.get_paged(&format!("/orgs/{org}/repos"), &[])?;
        Ok(repos.into_iter().map(|r| r.name).collect())
    }

    fn list_commits(
        &self,
        org: &str,
        repo: &str,
        author: &str,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<CommitRef>> {
        let query = [
            ("author", author.to_string()),
            ("since", since.to_rfc3339_opts(SecondsFormat::Secs, true)),
            ("until", until.to_rfc3339_opts(SecondsFormat::Secs, true)),
        ];
        let items: Vec<CommitItem> =
            self.get_paged(&format!("/repos/{org}/{repo}/commits"), &query)?;

        Ok(items
            .into_iter()
            .map(|item| CommitRef {
                repo: repo.to_string(),
                id: item.sha,
                timestamp: item.commit.author.date,
            })
            .collect())
    }

    fn commit_detail(&self, org: &str, repo: &str, id: &str) -> Result<(u64, u64)> {
        let detail: CommitDetailItem = self
            .get(&format!("/repos/{org}/{repo}/commits/{id}"), &[])?
            .json()?;
        Ok((detail.stats.additions, detail.stats.deletions))
    }
}

// Wire format of the three endpoints, reduced to the fields we read.

#[derive(Debug, Deserialize)]
struct RepoItem {
    name: String,
}

#[derive(Debug, Deserialize)]
struct CommitItem {
    sha: String,
    commit: CommitMeta,
}

#[derive(Debug, Deserialize)]
struct CommitMeta {
    author: CommitAuthor,
}

#[derive(Debug, Deserialize)]
struct CommitAuthor {
    date: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct CommitDetailItem {
    stats: CommitDetailStats,
}

#[derive(Debug, Deserialize)]
struct CommitDetailStats {
    additions: u64,
    deletions: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn commit_item_parses_listing_payload() {
        let item: CommitItem = serde_json::from_value(json!({
            "sha": "abc123",
            "url": "https://api.github.com/repos/acme/widgets/commits/abc123",
            "commit": {
                "author": {
                    "name": "Dev",
                    "date": "2024-03-05T12:30:00Z"
                },
                "message": "fix widget"
            }
        }))
        .unwrap();

        assert_eq!(item.sha, "abc123");
        assert_eq!(
            item.commit.author.date,
            Utc.with_ymd_and_hms(2024, 3, 5, 12, 30, 0).unwrap()
        );
    }

    #[test]
    fn commit_detail_parses_stats_payload() {
        let detail: CommitDetailItem = serde_json::from_value(json!({
            "sha": "abc123",
            "stats": { "total": 12, "additions": 10, "deletions": 2 }
        }))
        .unwrap();

        assert_eq!(detail.stats.additions, 10);
        assert_eq!(detail.stats.deletions, 2);
    }

    #[test]
    fn repo_item_parses_listing_payload() {
        let repo: RepoItem = serde_json::from_value(json!({
            "name": "widgets",
            "full_name": "acme/widgets",
            "private": false
        }))
        .unwrap();
        assert_eq!(repo.name, "widgets");
    }
}
