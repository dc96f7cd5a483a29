//! Field-level parsers shared by the provider transforms.
//!
//! All parsers are lossy but safe: unparsable input becomes `None` plus a
//! warning, never an error.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Deserializer};
use tracing::warn;

pub const DEFAULT_CURRENCY: &str = "USD";

const REMOTE_KEYWORDS: [&str; 4] = ["remote", "anywhere", "work from home", "wfh"];

lazy_static! {
    // "$89k - $147k", "$89,000 - $147,000", "89.50K-120K"
    static ref SALARY_RANGE_REGEX: Regex = Regex::new(
        r"\$?(\d+(?:,\d{3})*(?:\.\d{2})?)[kK]?\s*-\s*\$?(\d+(?:,\d{3})*(?:\.\d{2})?)[kK]?"
    ).unwrap();
}

/// Salary bounds extracted from a free-text range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalaryRange {
    pub min: Option<i32>,
    pub max: Option<i32>,
    pub currency: String,
}

impl SalaryRange {
    pub fn unknown() -> Self {
        Self {
            min: None,
            max: None,
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}

/// Parse a salary range string such as `"$89k - $147k"`.
///
/// A `k`/`K` anywhere in the string scales both bounds by 1000.
pub fn parse_salary_range(salary_range: &str) -> SalaryRange {
    let Some(captures) = SALARY_RANGE_REGEX.captures(salary_range) else {
        warn!(salary_range = %salary_range, "Could not parse salary range");
        return SalaryRange::unknown();
    };

    let multiplier = if salary_range.to_lowercase().contains('k') {
        1000.0
    } else {
        1.0
    };

    let min = parse_amount(&captures[1], multiplier);
    let max = parse_amount(&captures[2], multiplier);

    if min.is_none() || max.is_none() {
        warn!(salary_range = %salary_range, "Salary range out of bounds");
        return SalaryRange::unknown();
    }

    SalaryRange {
        min,
        max,
        currency: DEFAULT_CURRENCY.to_string(),
    }
}

fn parse_amount(raw: &str, multiplier: f64) -> Option<i32> {
    let value: f64 = raw.replace(',', "").parse().ok()?;
    round_to_i32(value * multiplier)
}

/// Round a numeric amount to the nearest integer, rejecting values that do
/// not fit the column type.
pub fn round_to_i32(value: f64) -> Option<i32> {
    let rounded = value.round();
    if rounded.is_finite() && rounded >= i32::MIN as f64 && rounded <= i32::MAX as f64 {
        Some(rounded as i32)
    } else {
        None
    }
}

/// Whether free-text location describes remote work.
pub fn is_remote_location(location: &str) -> bool {
    let location = location.to_lowercase();
    REMOTE_KEYWORDS
        .iter()
        .any(|keyword| location.contains(keyword))
}

/// Serde helper: an explicit `null` gets the field's default, the same as a
/// missing key.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Parse a posting date.
///
/// Accepts RFC 3339, a naive ISO datetime (read as UTC) or a bare
/// `YYYY-MM-DD` date (midnight UTC).
pub fn parse_posted_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_salary_range_with_k_suffix() {
        let range = parse_salary_range("$89k - $147k");
        assert_eq!(range.min, Some(89_000));
        assert_eq!(range.max, Some(147_000));
        assert_eq!(range.currency, "USD");
    }

    #[test]
    fn test_parse_salary_range_with_thousands_separators() {
        let range = parse_salary_range("$89,000 - $147,000");
        assert_eq!(range.min, Some(89_000));
        assert_eq!(range.max, Some(147_000));
        assert_eq!(range.currency, "USD");
    }

    #[test]
    fn test_parse_salary_range_suffix_on_one_side() {
        let range = parse_salary_range("$100 - $150K");
        assert_eq!(range.min, Some(100_000));
        assert_eq!(range.max, Some(150_000));
    }

    #[test]
    fn test_parse_salary_range_rounds_decimals() {
        let range = parse_salary_range("$89.50 - $90.25");
        assert_eq!(range.min, Some(90));
        assert_eq!(range.max, Some(90));
    }

    #[test]
    fn test_parse_salary_range_unparsable() {
        for input in ["Competitive", "", "$100k", "DOE - negotiable"] {
            let range = parse_salary_range(input);
            assert_eq!(range, SalaryRange::unknown(), "input: {:?}", input);
            assert_eq!(range.currency, "USD");
        }
    }

    #[test]
    fn test_parse_salary_range_does_not_clamp_inverted_bounds() {
        let range = parse_salary_range("$150k - $90k");
        assert_eq!(range.min, Some(150_000));
        assert_eq!(range.max, Some(90_000));
    }

    #[test]
    fn test_round_to_i32_rejects_overflow() {
        assert_eq!(round_to_i32(1e12), None);
        assert_eq!(round_to_i32(f64::NAN), None);
        assert_eq!(round_to_i32(2.5), Some(3));
    }

    #[test]
    fn test_is_remote_location() {
        assert!(is_remote_location("Remote, Anywhere"));
        assert!(is_remote_location("New York (WFH available)"));
        assert!(is_remote_location("Work From Home"));
        assert!(!is_remote_location("Austin, TX"));
        assert!(!is_remote_location(""));
    }

    #[test]
    fn test_parse_posted_date_formats() {
        assert_eq!(
            parse_posted_date("2025-08-01T10:00:00.000Z"),
            Some(Utc.with_ymd_and_hms(2025, 8, 1, 10, 0, 0).unwrap())
        );
        assert_eq!(
            parse_posted_date("2025-08-01T10:00:00"),
            Some(Utc.with_ymd_and_hms(2025, 8, 1, 10, 0, 0).unwrap())
        );
        assert_eq!(
            parse_posted_date("2025-08-02"),
            Some(Utc.with_ymd_and_hms(2025, 8, 2, 0, 0, 0).unwrap())
        );
        assert_eq!(parse_posted_date("last tuesday"), None);
        assert_eq!(parse_posted_date("2025-13-45"), None);
    }
}
