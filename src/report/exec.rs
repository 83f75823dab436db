use anyhow::Context;
use chrono::Utc;
use tracing::info;

use super::output::{output_json, output_table};
use crate::cli::CommonArgs;
use crate::error::OrgPulseError;
use crate::github::{CommitHost, GithubClient};
use crate::model::{MonthRange, PeriodSnapshot, PeriodSummary, PeriodTotals, ReportOutput, SCHEMA_VERSION};
use crate::stats::{aggregate_commit_stats, analyze, collect_commits};
use crate::util::{parse_month, Deadline};

pub fn exec(common: CommonArgs, author: String, month: String, json: bool) -> anyhow::Result<()> {
    let org = common.require_org()?;
    if author.trim().is_empty() {
        return Err(OrgPulseError::Config("author must not be empty".to_string()).into());
    }
    let token = common.resolve_token()?;

    let (year, month_number) = parse_month(&month).context("Failed to parse --month")?;
    let current_range = MonthRange::new(year, month_number)?;
    let previous_range = current_range.prev()?;

    let client = GithubClient::new(token, &common.api_url, common.request_timeout())
        .context("Failed to build API client")?;
    let deadline = common.deadline.map(Deadline::new);

    // Progress bars would interleave with machine-readable output.
    let progress = !json;

    let (current_totals, current_snap) = run_period(
        &client,
        org,
        &author,
        &current_range,
        deadline.as_ref(),
        progress,
    )?;
    let (previous_totals, previous_snap) = run_period(
        &client,
        org,
        &author,
        &previous_range,
        deadline.as_ref(),
        progress,
    )?;

    let productivity = analyze(&current_totals, &current_snap, &previous_totals, &previous_snap);

    let report = ReportOutput {
        version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        organization: org.to_string(),
        author,
        current: PeriodSummary::new(&current_range, &current_totals, &current_snap),
        previous: PeriodSummary::new(&previous_range, &previous_totals, &previous_snap),
        productivity,
    };

    if json {
        output_json(&report)?;
    } else {
        output_table(&report)?;
    }

    Ok(())
}

fn run_period<H: CommitHost>(
    host: &H,
    org: &str,
    author: &str,
    range: &MonthRange,
    deadline: Option<&Deadline>,
    progress: bool,
) -> anyhow::Result<(PeriodTotals, PeriodSnapshot)> {
    info!(org, author, period = %range.label(), "collecting commits");
    let commits = collect_commits(host, org, author, range, deadline)
        .with_context(|| format!("Failed to collect commits for {}", range.label()))?;

    aggregate_commit_stats(host, org, &commits, deadline, progress)
        .with_context(|| format!("Failed to aggregate commit stats for {}", range.label()))
}
