use chrono::{DateTime, Utc};
use std::time::{Duration, Instant};

use crate::error::{OrgPulseError, Result};

/// Calendar-day key for a commit timestamp: the UTC date portion.
pub fn day_key(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d").to_string()
}

/// Parse a `YYYY-MM` month argument.
pub fn parse_month(value: &str) -> Result<(i32, u32)> {
    let (year, month) = value
        .split_once('-')
        .ok_or_else(|| OrgPulseError::Parse(format!("invalid month '{value}', expected YYYY-MM")))?;
    let year: i32 = year
        .parse()
        .map_err(|_| OrgPulseError::Parse(format!("invalid year in '{value}'")))?;
    let month: u32 = month
        .parse()
        .map_err(|_| OrgPulseError::Parse(format!("invalid month in '{value}'")))?;
    if !(1..=12).contains(&month) {
        return Err(OrgPulseError::Parse(format!(
            "month out of range in '{value}'"
        )));
    }
    Ok((year, month))
}

pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "",
    }
}

/// Wall-clock budget for a whole run, checked between network calls.
pub struct Deadline {
    started: Instant,
    limit: Duration,
}

impl Deadline {
    pub fn new(limit_secs: u64) -> Self {
        Self {
            started: Instant::now(),
            limit: Duration::from_secs(limit_secs),
        }
    }

    pub fn check(&self) -> Result<()> {
        if self.started.elapsed() >= self.limit {
            Err(OrgPulseError::DeadlineExceeded {
                limit_secs: self.limit.as_secs(),
            })
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[test]
    fn day_key_uses_utc_date_portion() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 5, 23, 59, 59).unwrap();
        assert_eq!(day_key(&ts), "2024-03-05");
    }

    #[test]
    fn parse_month_accepts_valid_input() {
        assert_eq!(parse_month("2024-03").unwrap(), (2024, 3));
        assert_eq!(parse_month("1999-12").unwrap(), (1999, 12));
    }

    #[test]
    fn parse_month_rejects_malformed_input() {
        assert!(parse_month("2024").is_err());
        assert!(parse_month("2024-00").is_err());
        assert!(parse_month("2024-13").is_err());
        assert!(parse_month("march").is_err());
    }

    #[test]
    fn deadline_trips_after_limit() {
        let deadline = Deadline::new(0);
        assert!(deadline.check().is_err());

        let generous = Deadline::new(3600);
        assert!(generous.check().is_ok());
    }
}
