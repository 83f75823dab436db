pub mod client;

pub use client::{GithubClient, DEFAULT_API_URL};

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::model::CommitRef;

/// The interface the stats pipeline consumes from the commit hosting
/// service. Production code talks to GitHub through [`GithubClient`];
/// tests substitute an in-memory implementation.
pub trait CommitHost {
    /// All repository names of `org`, in API page order. Failure here is
    /// fatal for the run.
    fn list_repos(&self, org: &str) -> Result<Vec<String>>;

    /// Commits authored by `author` in one repository within
    /// `[since, until)`.
    fn list_commits(
        &self,
        org: &str,
        repo: &str,
        author: &str,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<CommitRef>>;

    /// Addition and deletion counts for a single commit.
    fn commit_detail(&self, org: &str, repo: &str, id: &str) -> Result<(u64, u64)>;
}
