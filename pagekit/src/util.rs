//! Formatting and URL helpers

use chrono::{DateTime, Datelike, NaiveDate};
use url::Url;

use crate::error::KitError;

/// Parse a date given as `YYYY-MM-DD` or an RFC 3339 timestamp.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(input).ok().map(|dt| dt.date_naive()))
}

/// Fill `pattern`'s `YYYY`, `MM` and `DD` placeholders from `date`.
///
/// ```
/// use chrono::NaiveDate;
/// use pagekit::util::format_date;
///
/// let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
/// assert_eq!(format_date(&date, "DD/MM/YYYY"), "07/03/2024");
/// ```
pub fn format_date(date: &impl Datelike, pattern: &str) -> String {
    pattern
        .replacen("YYYY", &format!("{:04}", date.year()), 1)
        .replacen("MM", &format!("{:02}", date.month()), 1)
        .replacen("DD", &format!("{:02}", date.day()), 1)
}

/// `symbol` followed by `amount` with two decimals. Missing, zero and
/// non-finite amounts format as zero.
pub fn format_currency(amount: Option<f64>, symbol: &str) -> String {
    match amount {
        Some(value) if value != 0.0 && value.is_finite() => format!("{}{:.2}", symbol, value),
        _ => format!("{}0.00", symbol),
    }
}

/// First value of query parameter `name` in an absolute `url`.
pub fn query_param(url: &str, name: &str) -> Option<String> {
    Url::parse(url)
        .ok()?
        .query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

/// Set query parameter `name` to `value`.
///
/// The first existing occurrence is replaced in place and later duplicates
/// dropped; a new parameter is appended.
pub fn with_query_param(url: &str, name: &str, value: &str) -> Result<String, KitError> {
    let mut url = Url::parse(url)?;
    let mut pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let mut replaced = false;
    pairs.retain_mut(|(key, current)| {
        if key != name {
            return true;
        }
        if replaced {
            return false;
        }
        *current = value.to_string();
        replaced = true;
        true
    });
    if !replaced {
        pairs.push((name.to_string(), value.to_string()));
    }

    url.query_pairs_mut().clear().extend_pairs(pairs);
    Ok(url.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date_patterns() {
        let date = NaiveDate::from_ymd_opt(2023, 11, 5).unwrap();
        assert_eq!(format_date(&date, "YYYY-MM-DD"), "2023-11-05");
        assert_eq!(format_date(&date, "MM.DD"), "11.05");
    }

    #[test]
    fn test_parse_date_forms() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 31);
        assert_eq!(parse_date("2024-01-31"), expected);
        assert_eq!(parse_date("2024-01-31T22:10:00Z"), expected);
        assert_eq!(parse_date("yesterday"), None);
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(Some(1200.5), "¥"), "¥1200.50");
        assert_eq!(format_currency(Some(0.0), "$"), "$0.00");
        assert_eq!(format_currency(None, "$"), "$0.00");
        assert_eq!(format_currency(Some(f64::NAN), "$"), "$0.00");
        assert_eq!(format_currency(Some(-3.456), "€"), "€-3.46");
    }

    #[test]
    fn test_query_param() {
        let url = "https://dorm.example/students?page=3&q=li%20wei";
        assert_eq!(query_param(url, "page").as_deref(), Some("3"));
        assert_eq!(query_param(url, "q").as_deref(), Some("li wei"));
        assert_eq!(query_param(url, "sort"), None);
        assert_eq!(query_param("/relative?page=1", "page"), None);
    }

    #[test]
    fn test_with_query_param_replaces_in_place() {
        let url = "https://dorm.example/rooms?page=1&building=A&page=9";
        assert_eq!(
            with_query_param(url, "page", "2").unwrap(),
            "https://dorm.example/rooms?page=2&building=A"
        );
        assert_eq!(
            with_query_param("https://dorm.example/rooms", "building", "B").unwrap(),
            "https://dorm.example/rooms?building=B"
        );
    }

    #[test]
    fn test_with_query_param_rejects_relative() {
        assert!(matches!(
            with_query_param("rooms?page=1", "page", "2"),
            Err(KitError::Url(_))
        ));
    }
}
