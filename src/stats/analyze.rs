use chrono::{Datelike, NaiveDate};

use crate::model::{PeriodSnapshot, PeriodTotals, ProductivityReport, RepoActivity};

const TOP_REPOS: usize = 5;

/// Derive comparative productivity metrics from two aggregated months.
/// Pure and deterministic; no I/O.
pub fn analyze(
    current: &PeriodTotals,
    current_snap: &PeriodSnapshot,
    previous: &PeriodTotals,
    previous_snap: &PeriodSnapshot,
) -> ProductivityReport {
    let current_total = current.total_changes();
    let previous_total = previous.total_changes();

    let daily_average_changes = daily_average(current_total, current_snap);
    let previous_daily_average = daily_average(previous_total, previous_snap);

    let (weekend_activity, weekday_activity) = weekend_split(current_snap);
    let split_total = weekend_activity + weekday_activity;
    let weekend_pct = if split_total > 0 {
        weekend_activity as f64 / split_total as f64 * 100.0
    } else {
        0.0
    };

    let (avg_commit_interval_minutes, commits_per_day) = cadence(current_snap);

    ProductivityReport {
        total_change_pct: pct_change(current_total as f64, previous_total as f64),
        additions_change_pct: pct_change(current.additions as f64, previous.additions as f64),
        deletions_change_pct: pct_change(current.deletions as f64, previous.deletions as f64),
        daily_average_changes,
        daily_average_change_pct: pct_change(daily_average_changes, previous_daily_average),
        weekend_activity,
        weekday_activity,
        weekend_pct,
        avg_commit_interval_minutes,
        commits_per_day,
        most_active_repos: rank_repos(current_snap),
    }
}

/// Percentage change against the previous period. A zero baseline yields
/// `f64::INFINITY` rather than being clamped or omitted.
pub fn pct_change(curr: f64, prev: f64) -> f64 {
    if prev > 0.0 {
        (curr - prev) / prev * 100.0
    } else {
        f64::INFINITY
    }
}

fn daily_average(total: u64, snapshot: &PeriodSnapshot) -> f64 {
    if snapshot.daily_stats.is_empty() {
        0.0
    } else {
        total as f64 / snapshot.daily_stats.len() as f64
    }
}

fn weekend_split(snapshot: &PeriodSnapshot) -> (u64, u64) {
    let mut weekend = 0u64;
    let mut weekday = 0u64;
    for (day, bucket) in &snapshot.daily_stats {
        let is_weekend = NaiveDate::parse_from_str(day, "%Y-%m-%d")
            .map(|d| d.weekday().number_from_monday() >= 6)
            .unwrap_or(false);
        if is_weekend {
            weekend += bucket.total_changes();
        } else {
            weekday += bucket.total_changes();
        }
    }
    (weekend, weekday)
}

/// Average interval between consecutive timestamps in collection order
/// (repository, then page — not wall-clock order), plus commits per
/// active day. Both 0 with fewer than two timestamps.
fn cadence(snapshot: &PeriodSnapshot) -> (f64, f64) {
    let times = &snapshot.commit_times;
    if times.len() < 2 {
        return (0.0, 0.0);
    }

    let total_secs: f64 = times
        .windows(2)
        .map(|pair| (pair[1] - pair[0]).num_seconds() as f64)
        .sum();
    let avg_secs = total_secs / (times.len() - 1) as f64;

    let commits_per_day = if snapshot.daily_stats.is_empty() {
        0.0
    } else {
        times.len() as f64 / snapshot.daily_stats.len() as f64
    };

    (avg_secs / 60.0, commits_per_day)
}

fn rank_repos(snapshot: &PeriodSnapshot) -> Vec<RepoActivity> {
    let mut ranked: Vec<RepoActivity> = snapshot
        .repo_stats
        .iter()
        .map(|(repo, bucket)| RepoActivity {
            repo: repo.clone(),
            changes: bucket.total_changes(),
        })
        .collect();
    // Stable sort: equal totals keep first-contribution order.
    ranked.sort_by(|a, b| b.changes.cmp(&a.changes));
    ranked.truncate(TOP_REPOS);
    ranked
}
