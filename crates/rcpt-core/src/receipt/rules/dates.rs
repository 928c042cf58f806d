//! Date matching for receipts.

use chrono::NaiveDate;

use super::patterns::DATE_DMY;
use super::{ExtractionMatch, FieldExtractor};

/// Day-month-year date matcher.
pub struct DateMatcher;

impl DateMatcher {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DateMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateMatcher {
    type Output = ExtractionMatch<NaiveDate>;

    /// First date token in the text. A first token that is not a real
    /// calendar date yields `None`; later tokens are not consulted.
    fn extract(&self, text: &str) -> Option<Self::Output> {
        let caps = DATE_DMY.captures(text)?;
        let date = to_date(&caps[1], &caps[2], &caps[3])?;
        let full = caps.get(0)?;
        Some(ExtractionMatch::new(date, full.as_str()).with_position(full.start(), full.end()))
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        DATE_DMY
            .captures_iter(text)
            .filter_map(|caps| {
                let date = to_date(&caps[1], &caps[2], &caps[3])?;
                let full = caps.get(0)?;
                Some(
                    ExtractionMatch::new(date, full.as_str())
                        .with_position(full.start(), full.end()),
                )
            })
            .collect()
    }
}

/// Convenience wrapper around [`DateMatcher::extract`].
pub fn match_date(text: &str) -> Option<NaiveDate> {
    DateMatcher::new().extract(text).map(|m| m.value)
}

fn to_date(day: &str, month: &str, year: &str) -> Option<NaiveDate> {
    let day: u32 = day.parse().ok()?;
    let month: u32 = month.parse().ok()?;
    let year = parse_year(year)?;
    NaiveDate::from_ymd_opt(year, month, day)
}

fn parse_year(s: &str) -> Option<i32> {
    let year: i32 = s.parse().ok()?;
    if s.len() > 2 {
        return Some(year);
    }
    // Two-digit year: 2000s for 00-50, 1900s for 51-99
    if year <= 50 {
        Some(2000 + year)
    } else {
        Some(1900 + year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_day_month_year_order() {
        assert_eq!(match_date("Date: 15/08/2024"), Some(ymd(2024, 8, 15)));
        assert_eq!(match_date("12/09/2023"), Some(ymd(2023, 9, 12)));
    }

    #[test]
    fn test_separators() {
        assert_eq!(match_date("01-02-2024"), Some(ymd(2024, 2, 1)));
        assert_eq!(match_date("01.02.2024"), Some(ymd(2024, 2, 1)));
    }

    #[test]
    fn test_two_digit_year() {
        assert_eq!(match_date("15.01.24"), Some(ymd(2024, 1, 15)));
        assert_eq!(match_date("15.01.99"), Some(ymd(1999, 1, 15)));
    }

    #[test]
    fn test_first_token_wins() {
        assert_eq!(match_date("05/06/2024 printed 07/06/2024"), Some(ymd(2024, 6, 5)));
    }

    #[test]
    fn test_invalid_first_token_is_absent() {
        assert_eq!(match_date("31/02/2024 then 01/03/2024"), None);
        assert_eq!(match_date("13/13/2024"), None);
    }

    #[test]
    fn test_extract_all_skips_invalid() {
        let dates = DateMatcher::new().extract_all("31/02/2024 then 01/03/2024");
        assert_eq!(dates.len(), 1);
        assert_eq!(dates[0].value, ymd(2024, 3, 1));
    }

    #[test]
    fn test_no_date() {
        assert_eq!(match_date("Total Rs 100"), None);
    }
}
