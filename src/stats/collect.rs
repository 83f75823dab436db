use tracing::{info, warn};

use crate::error::Result;
use crate::github::CommitHost;
use crate::model::{CommitRef, MonthRange};
use crate::util::Deadline;

/// Gather every commit authored by `author` across the organization
/// within `range`, in repository enumeration order, then page order.
///
/// Repository enumeration failures abort the run; a failure listing one
/// repository's commits skips that repository and keeps going.
pub fn collect_commits<H: CommitHost>(
    host: &H,
    org: &str,
    author: &str,
    range: &MonthRange,
    deadline: Option<&Deadline>,
) -> Result<Vec<CommitRef>> {
    let repos = host.list_repos(org)?;
    info!(org, repos = repos.len(), "enumerated repositories");

    let mut commits = Vec::new();
    for repo in &repos {
        if let Some(d) = deadline {
            d.check()?;
        }
        match host.list_commits(org, repo, author, range.since, range.until) {
            Ok(mut batch) => {
                // The hosting API treats `until` as inclusive; enforce the
                // half-open interval here so boundary commits never land
                // in two adjacent months.
                batch.retain(|c| range.contains(&c.timestamp));
                if !batch.is_empty() {
                    info!(repo = %repo, count = batch.len(), "collected commits");
                }
                commits.extend(batch);
            }
            Err(e) => warn!(repo = %repo, error = %e, "skipping repository"),
        }
    }
    Ok(commits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OrgPulseError;
    use chrono::{DateTime, TimeZone, Utc};
    use pretty_assertions::assert_eq;

    struct FakeHost {
        repos: Vec<String>,
        // (repo, timestamp) pairs; `broken` repos fail their listing call.
        commits: Vec<(String, DateTime<Utc>)>,
        broken: Vec<String>,
    }

    impl CommitHost for FakeHost {
        fn list_repos(&self, _org: &str) -> Result<Vec<String>> {
            Ok(self.repos.clone())
        }

        fn list_commits(
            &self,
            _org: &str,
            repo: &str,
            _author: &str,
            since: DateTime<Utc>,
            until: DateTime<Utc>,
        ) -> Result<Vec<CommitRef>> {
            if self.broken.iter().any(|r| r == repo) {
                return Err(OrgPulseError::Fetch {
                    endpoint: format!("/repos/acme/{repo}/commits"),
                    status: 404,
                    body: "Not Found".to_string(),
                });
            }
            // Inclusive `until`, like the upstream API.
            Ok(self
                .commits
                .iter()
                .filter(|(r, ts)| r == repo && *ts >= since && *ts <= until)
                .map(|(r, ts)| CommitRef {
                    repo: r.clone(),
                    id: format!("{r}-{}", ts.timestamp()),
                    timestamp: *ts,
                })
                .collect())
        }

        fn commit_detail(&self, _org: &str, _repo: &str, _id: &str) -> Result<(u64, u64)> {
            Ok((0, 0))
        }
    }

    fn ts(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn keeps_repository_enumeration_order() {
        let host = FakeHost {
            repos: vec!["zeta".into(), "alpha".into()],
            commits: vec![
                ("zeta".into(), ts(2024, 3, 10, 9)),
                ("alpha".into(), ts(2024, 3, 2, 9)),
            ],
            broken: vec![],
        };
        let range = MonthRange::new(2024, 3).unwrap();
        let commits = collect_commits(&host, "acme", "dev", &range, None).unwrap();
        let repos: Vec<&str> = commits.iter().map(|c| c.repo.as_str()).collect();
        assert_eq!(repos, vec!["zeta", "alpha"]);
    }

    #[test]
    fn skips_repositories_that_fail_to_list() {
        let host = FakeHost {
            repos: vec!["good".into(), "gone".into(), "also-good".into()],
            commits: vec![
                ("good".into(), ts(2024, 3, 10, 9)),
                ("also-good".into(), ts(2024, 3, 11, 9)),
            ],
            broken: vec!["gone".into()],
        };
        let range = MonthRange::new(2024, 3).unwrap();
        let commits = collect_commits(&host, "acme", "dev", &range, None).unwrap();
        assert_eq!(commits.len(), 2);
    }

    #[test]
    fn enumeration_failure_is_fatal() {
        struct DeadHost;
        impl CommitHost for DeadHost {
            fn list_repos(&self, _org: &str) -> Result<Vec<String>> {
                Err(OrgPulseError::Fetch {
                    endpoint: "/orgs/acme/repos".to_string(),
                    status: 401,
                    body: "Bad credentials".to_string(),
                })
            }
            fn list_commits(
                &self,
                _org: &str,
                _repo: &str,
                _author: &str,
                _since: DateTime<Utc>,
                _until: DateTime<Utc>,
            ) -> Result<Vec<CommitRef>> {
                unreachable!()
            }
            fn commit_detail(&self, _org: &str, _repo: &str, _id: &str) -> Result<(u64, u64)> {
                unreachable!()
            }
        }

        let range = MonthRange::new(2024, 3).unwrap();
        assert!(collect_commits(&DeadHost, "acme", "dev", &range, None).is_err());
    }

    #[test]
    fn boundary_commit_belongs_to_exactly_one_month() {
        // Authored at exactly 2024-03-01T00:00:00Z: excluded from February,
        // included in March.
        let boundary = ts(2024, 3, 1, 0);
        let host = FakeHost {
            repos: vec!["widgets".into()],
            commits: vec![("widgets".into(), boundary)],
            broken: vec![],
        };

        let february = MonthRange::new(2024, 2).unwrap();
        let march = MonthRange::new(2024, 3).unwrap();
        assert_eq!(february.until, boundary);

        let feb_commits = collect_commits(&host, "acme", "dev", &february, None).unwrap();
        let mar_commits = collect_commits(&host, "acme", "dev", &march, None).unwrap();
        assert!(feb_commits.is_empty());
        assert_eq!(mar_commits.len(), 1);
    }

    #[test]
    fn deadline_aborts_collection() {
        let host = FakeHost {
            repos: vec!["widgets".into()],
            commits: vec![],
            broken: vec![],
        };
        let range = MonthRange::new(2024, 3).unwrap();
        let deadline = Deadline::new(0);
        let result = collect_commits(&host, "acme", "dev", &range, Some(&deadline));
        assert!(matches!(
            result,
            Err(OrgPulseError::DeadlineExceeded { .. })
        ));
    }
}
