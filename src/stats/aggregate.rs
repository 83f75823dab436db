use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

use crate::error::Result;
use crate::github::CommitHost;
use crate::model::{CommitRef, PeriodSnapshot, PeriodTotals};
use crate::util::{day_key, Deadline};

/// Fetch per-commit addition/deletion counts and fold them into grand
/// totals, per-repository buckets, and per-day buckets.
///
/// A failed detail lookup skips that commit's contribution entirely;
/// totals reflect only successfully detailed commits.
pub fn aggregate_commit_stats<H: CommitHost>(
    host: &H,
    org: &str,
    commits: &[CommitRef],
    deadline: Option<&Deadline>,
    progress: bool,
) -> Result<(PeriodTotals, PeriodSnapshot)> {
    let bar = if progress && !commits.is_empty() {
        let pb = ProgressBar::new(commits.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{bar:30.green} {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        pb.set_message("Fetching commit stats...");
        Some(pb)
    } else {
        None
    };

    let mut totals = PeriodTotals::default();
    let mut snapshot = PeriodSnapshot::default();
    let mut skipped = 0usize;

    for commit in commits {
        if let Some(d) = deadline {
            d.check()?;
        }

        let (additions, deletions) = match host.commit_detail(org, &commit.repo, &commit.id) {
            Ok(counts) => counts,
            Err(e) => {
                warn!(repo = %commit.repo, commit = %commit.id, error = %e, "skipping commit");
                skipped += 1;
                if let Some(pb) = &bar {
                    pb.inc(1);
                }
                continue;
            }
        };

        totals.additions += additions;
        totals.deletions += deletions;

        snapshot
            .repo_stats
            .entry(commit.repo.clone())
            .or_default()
            .record(additions, deletions);
        snapshot
            .daily_stats
            .entry(day_key(&commit.timestamp))
            .or_default()
            .record(additions, deletions);
        snapshot.commit_times.push(commit.timestamp);

        debug!(commit = %commit.id, additions, deletions, "recorded commit");
        if let Some(pb) = &bar {
            pb.inc(1);
        }
    }

    if let Some(pb) = bar {
        pb.finish_and_clear();
    }
    if skipped > 0 {
        warn!(skipped, total = commits.len(), "commits omitted from totals");
    }

    Ok((totals, snapshot))
}
