use chrono::{Duration, NaiveDate, NaiveDateTime};
use lazy_static::lazy_static;
use regex::Regex;

use super::RawValue;

/// Epoch used by spreadsheet numeric date serials (the 1900 date system with
/// its historical leap-year bug already accounted for).
pub const SPREADSHEET_EPOCH: (i32, u32, u32) = (1899, 12, 30);

lazy_static! {
    static ref DAY_FIRST: Regex =
        Regex::new(r"^(\d{1,2})[/\-](\d{1,2})[/\-](\d{2,4})$").expect("static regex");
}

/// Parses a calendar date out of a loosely-formatted value.
///
/// Native dates pass through. Numeric spreadsheet serials convert against the
/// 1899-12-30 epoch at day granularity. Strings try ISO first, then `D/M/Y`
/// and `D-M-Y` with 2- or 4-digit years (2-digit years are assumed 2000s).
///
/// Returns `None` when nothing resolves.
pub fn parse_date(value: &RawValue) -> Option<NaiveDate> {
    match value {
        RawValue::Date(d) => Some(*d),
        RawValue::Number(serial) => from_serial(*serial),
        RawValue::Text(s) => parse_date_str(s),
        RawValue::Empty => None,
    }
}

fn from_serial(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() {
        return None;
    }
    let (y, m, d) = SPREADSHEET_EPOCH;
    let epoch = NaiveDate::from_ymd_opt(y, m, d)?;
    epoch.checked_add_signed(Duration::days(serial.trunc() as i64))
}

fn parse_date_str(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }
    // ISO date-times, with either the `T` or a space separator.
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }

    let caps = DAY_FIRST.captures(s)?;
    let day: u32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let year_raw = &caps[3];
    let year: i32 = match year_raw.len() {
        2 => 2000 + year_raw.parse::<i32>().ok()?,
        _ => year_raw.parse().ok()?,
    };
    NaiveDate::from_ymd_opt(year, month, day)
}
