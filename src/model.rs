use chrono::{DateTime, TimeZone, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{OrgPulseError, Result};
use crate::util::month_name;

pub const SCHEMA_VERSION: u32 = 1;

/// A commit as returned by the listing endpoint, before detail lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitRef {
    pub repo: String,
    pub id: String,
    pub timestamp: DateTime<Utc>,
}

/// Running totals keyed by repository or by calendar day.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Bucket {
    pub additions: u64,
    pub deletions: u64,
    pub commits: u32,
}

impl Bucket {
    pub fn record(&mut self, additions: u64, deletions: u64) {
        self.additions += additions;
        self.deletions += deletions;
        self.commits += 1;
    }

    pub fn total_changes(&self) -> u64 {
        self.additions + self.deletions
    }
}

/// Aggregated state for one analyzed month. Maps keep insertion order,
/// which is first-contribution order in processing sequence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PeriodSnapshot {
    pub repo_stats: IndexMap<String, Bucket>,
    pub daily_stats: IndexMap<String, Bucket>,
    /// Authored timestamps in processing order (repository, then page),
    /// not guaranteed chronological.
    pub commit_times: Vec<DateTime<Utc>>,
}

impl PeriodSnapshot {
    pub fn active_days(&self) -> usize {
        self.daily_stats.len()
    }
}

/// Grand totals for one analyzed month, kept separate from the snapshot
/// so report printing can use them directly.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PeriodTotals {
    pub additions: u64,
    pub deletions: u64,
}

impl PeriodTotals {
    pub fn total_changes(&self) -> u64 {
        self.additions + self.deletions
    }

    pub fn net_change(&self) -> i64 {
        self.additions as i64 - self.deletions as i64
    }
}

/// Half-open UTC calendar-month interval `[since, until)`.
#[derive(Debug, Clone, Copy)]
pub struct MonthRange {
    pub year: i32,
    pub month: u32,
    pub since: DateTime<Utc>,
    pub until: DateTime<Utc>,
}

impl MonthRange {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        let since = month_start(year, month)?;
        let (next_year, next_month) = if month == 12 {
            (year + 1, 1)
        } else {
            (year, month + 1)
        };
        let until = month_start(next_year, next_month)?;
        Ok(Self {
            year,
            month,
            since,
            until,
        })
    }

    /// The preceding calendar month.
    pub fn prev(&self) -> Result<Self> {
        if self.month == 1 {
            Self::new(self.year - 1, 12)
        } else {
            Self::new(self.year, self.month - 1)
        }
    }

    /// A commit at exactly `until` belongs to the next month, not this one.
    pub fn contains(&self, timestamp: &DateTime<Utc>) -> bool {
        *timestamp >= self.since && *timestamp < self.until
    }

    pub fn label(&self) -> String {
        format!("{} {}", month_name(self.month), self.year)
    }
}

fn month_start(year: i32, month: u32) -> Result<DateTime<Utc>> {
    Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0)
        .single()
        .ok_or_else(|| OrgPulseError::Config(format!("invalid month: {year}-{month:02}")))
}

/// One entry of the most-active-repositories ranking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoActivity {
    pub repo: String,
    pub changes: u64,
}

/// Comparative metrics between the current and previous month.
///
/// Percentages against a zero previous-period baseline are
/// `f64::INFINITY`; JSON output serializes those as `null`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductivityReport {
    pub total_change_pct: f64,
    pub additions_change_pct: f64,
    pub deletions_change_pct: f64,
    pub daily_average_changes: f64,
    pub daily_average_change_pct: f64,
    pub weekend_activity: u64,
    pub weekday_activity: u64,
    pub weekend_pct: f64,
    pub avg_commit_interval_minutes: f64,
    pub commits_per_day: f64,
    pub most_active_repos: Vec<RepoActivity>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodSummary {
    pub label: String,
    pub additions: u64,
    pub deletions: u64,
    pub net_change: i64,
    pub active_days: usize,
    pub commit_count: usize,
}

impl PeriodSummary {
    pub fn new(range: &MonthRange, totals: &PeriodTotals, snapshot: &PeriodSnapshot) -> Self {
        Self {
            label: range.label(),
            additions: totals.additions,
            deletions: totals.deletions,
            net_change: totals.net_change(),
            active_days: snapshot.active_days(),
            commit_count: snapshot.commit_times.len(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub organization: String,
    pub author: String,
    pub current: PeriodSummary,
    pub previous: PeriodSummary,
    pub productivity: ProductivityReport,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn bucket_accumulates() {
        let mut bucket = Bucket::default();
        bucket.record(10, 2);
        bucket.record(5, 5);
        assert_eq!(bucket.additions, 15);
        assert_eq!(bucket.deletions, 7);
        assert_eq!(bucket.commits, 2);
        assert_eq!(bucket.total_changes(), 22);
    }

    #[test]
    fn month_range_is_half_open() {
        let range = MonthRange::new(2024, 2).unwrap();
        let boundary = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let inside = Utc.with_ymd_and_hms(2024, 2, 29, 23, 59, 59).unwrap();
        assert!(range.contains(&range.since));
        assert!(range.contains(&inside));
        assert!(!range.contains(&boundary));
    }

    #[test]
    fn month_range_rolls_over_december() {
        let range = MonthRange::new(2023, 12).unwrap();
        assert_eq!(
            range.until,
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn prev_crosses_year_boundary() {
        let range = MonthRange::new(2024, 1).unwrap();
        let prev = range.prev().unwrap();
        assert_eq!(prev.year, 2023);
        assert_eq!(prev.month, 12);
        assert_eq!(prev.until, range.since);
    }

    #[test]
    fn invalid_month_is_rejected() {
        assert!(MonthRange::new(2024, 13).is_err());
        assert!(MonthRange::new(2024, 0).is_err());
    }

    #[test]
    fn month_label_is_human_readable() {
        let range = MonthRange::new(2024, 3).unwrap();
        assert_eq!(range.label(), "March 2024");
    }

    #[test]
    fn net_change_can_be_negative() {
        let totals = PeriodTotals {
            additions: 3,
            deletions: 10,
        };
        assert_eq!(totals.net_change(), -7);
    }
}
