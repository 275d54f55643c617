//! CashApp timestamps (`2025-10-09 16:29:46 EDT`) to TokenTax dates
//! (`10/9/25 16:29`).
//!
//! The trailing zone abbreviation is ignored: the wall-clock time is
//! written as-is, no conversion is done.

use chrono::{Datelike, NaiveDate, NaiveTime};

const DATE_FMT: &str = "%Y-%m-%d";
const TIME_FMT: &str = "%H:%M:%S";

/// Normalize a CashApp timestamp. Never fails: falls back to the bare date
/// at midnight, then to the input unchanged.
pub fn normalize_date(raw: &str) -> String {
    parse_full(raw)
        .or_else(|| parse_leading_date(raw))
        .unwrap_or_else(|| {
            log::debug!("unparseable date '{raw}', passing through");
            raw.to_string()
        })
}

fn parse_full(raw: &str) -> Option<String> {
    let tokens: Vec<&str> = raw.split_whitespace().collect();
    match tokens.as_slice() {
        [date, time, ..] => {
            let date = NaiveDate::parse_from_str(date, DATE_FMT).ok()?;
            let time = NaiveTime::parse_from_str(time, TIME_FMT).ok()?;
            Some(render(date, time))
        }
        [date] => {
            let date = NaiveDate::parse_from_str(date, DATE_FMT).ok()?;
            Some(render(date, NaiveTime::MIN))
        }
        [] => None,
    }
}

fn parse_leading_date(raw: &str) -> Option<String> {
    let head = raw.split(' ').next().unwrap_or(raw);
    let date = NaiveDate::parse_from_str(head, DATE_FMT).ok()?;
    Some(render(date, NaiveTime::MIN))
}

/// `M/D/YY HH:MM`: month and day unpadded, hour and minute padded.
fn render(date: NaiveDate, time: NaiveTime) -> String {
    format!(
        "{}/{}/{} {}",
        date.month(),
        date.day(),
        date.format("%y"),
        time.format("%H:%M")
    )
}
