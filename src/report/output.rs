use anyhow::Result;
use console::style;

use crate::model::{PeriodSummary, ReportOutput};

pub fn output_json(report: &ReportOutput) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

pub fn output_table(report: &ReportOutput) -> Result<()> {
    println!(
        "{}",
        style(format!(
            "Stats for {} in {}",
            report.author, report.organization
        ))
        .bold()
    );
    println!("{}", "─".repeat(50));

    print_period("Current month", &report.current);
    print_period("Previous month", &report.previous);

    let p = &report.productivity;

    println!("\n{}", style("Productivity Analysis").bold());
    println!(
        "  Total changes: {} {}",
        fmt_pct(p.total_change_pct),
        trend(p.total_change_pct)
    );
    println!(
        "  Additions:     {} {}",
        fmt_pct(p.additions_change_pct),
        trend(p.additions_change_pct)
    );
    println!(
        "  Deletions:     {} {}",
        fmt_pct(p.deletions_change_pct),
        trend(p.deletions_change_pct)
    );

    println!("\n{}", style("Daily Metrics").bold());
    println!("  Average changes per day:       {:.1}", p.daily_average_changes);
    println!(
        "  Daily average change:          {}",
        fmt_pct(p.daily_average_change_pct)
    );
    println!("  Commits per day:               {:.1}", p.commits_per_day);
    println!(
        "  Average time between commits:  {:.1} minutes",
        p.avg_commit_interval_minutes
    );

    println!("\n{}", style("Work Pattern").bold());
    println!(
        "  Weekend activity: {} changes ({})",
        p.weekend_activity,
        fmt_pct(p.weekend_pct)
    );
    println!(
        "  Weekday activity: {} changes ({})",
        p.weekday_activity,
        fmt_pct(100.0 - p.weekend_pct)
    );

    println!("\n{}", style("Most Active Repositories").bold());
    if p.most_active_repos.is_empty() {
        println!("  (no activity)");
    }
    for entry in &p.most_active_repos {
        println!("  {:<40} {:>8} changes", entry.repo, entry.changes);
    }

    Ok(())
}

fn print_period(title: &str, period: &PeriodSummary) {
    println!("\n{} ({})", style(title).bold(), period.label);
    println!("  Additions:   {:>8}", period.additions);
    println!("  Deletions:   {:>8}", period.deletions);
    println!("  Net change:  {:>8}", format!("{:+}", period.net_change));
    println!("  Commits:     {:>8}", period.commit_count);
    println!("  Active days: {:>8}", period.active_days);
}

fn fmt_pct(value: f64) -> String {
    if value.is_infinite() {
        "∞".to_string()
    } else {
        format!("{value:.1}%")
    }
}

fn trend(pct: f64) -> &'static str {
    if pct > 0.0 {
        "increase"
    } else {
        "decrease"
    }
}
