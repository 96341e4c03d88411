//! Tolerant date and amount parsing. Callers keep unparseable values
//! with `valid = false` instead of dropping them, so these helpers
//! return `Result` and never panic.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use shared_types::ParseError;

lazy_static! {
    static ref DAY_OF_MONTH: Regex =
        Regex::new(r"(?i)\b(\d{1,2})(?:st|nd|rd|th)?\s+day of\s+([A-Za-z]+),?\s+(\d{4})\b")
            .unwrap();
    static ref ORDINAL_SUFFIX: Regex = Regex::new(r"(?i)(\d{1,2})(?:st|nd|rd|th)\b").unwrap();
}

const MONTH_FORMATS: &[&str] = &["%B %d, %Y", "%B %d %Y", "%b %d, %Y", "%b %d %Y"];
const NUMERIC_FORMATS: &[&str] = &["%m/%d/%Y", "%m/%d/%y", "%Y-%m-%d", "%m-%d-%Y"];

/// Parse any of the date shapes that appear in tenancy paperwork:
/// "January 5, 2024", "1/5/2024", "2024-01-05", "5th day of January, 2024".
pub fn parse_date(raw: &str) -> Result<NaiveDate, ParseError> {
    let cleaned = normalize_date_text(raw);

    for fmt in NUMERIC_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(&cleaned, fmt) {
            return Ok(date);
        }
    }
    for fmt in MONTH_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(&cleaned, fmt) {
            return Ok(date);
        }
    }
    if let Some(caps) = DAY_OF_MONTH.captures(&cleaned) {
        let rebuilt = format!("{} {}, {}", &caps[2], &caps[1], &caps[3]);
        let rebuilt = title_case_month(&rebuilt);
        for fmt in MONTH_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(&rebuilt, fmt) {
                return Ok(date);
            }
        }
    }
    Err(ParseError::UnrecognizedDate(raw.to_string()))
}

fn normalize_date_text(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches(['.', ',', ';']);
    let without_ordinals = ORDINAL_SUFFIX.replace_all(trimmed, "$1");
    title_case_month(&without_ordinals)
}

/// chrono's %B is case-sensitive; OCR'd captions are often all caps.
fn title_case_month(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            if word.chars().all(|c| c.is_alphabetic()) && word.len() > 2 {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => {
                        first.to_uppercase().collect::<String>()
                            + &chars.as_str().to_lowercase()
                    }
                    None => String::new(),
                }
            } else {
                word.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse "$1,234.56" (or the same without the sign) into a float amount.
pub fn parse_amount(raw: &str) -> Result<f64, ParseError> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if cleaned.is_empty() {
        return Err(ParseError::UnparseableAmount(raw.to_string()));
    }
    cleaned
        .parse::<f64>()
        .map_err(|_| ParseError::UnparseableAmount(raw.to_string()))
        .and_then(|v| {
            if v.is_finite() && v >= 0.0 {
                Ok(v)
            } else {
                Err(ParseError::OutOfRange(raw.to_string()))
            }
        })
}
