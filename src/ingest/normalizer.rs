//! 셀 값 정규화
//!
//! 숫자 셀(천 단위 구분자, 통화 기호, 공백, `--` 자리표시자)과 날짜 셀
//! (epoch 초/밀리초, ISO-8601, 로케일별 D/M/Y · Y/M/D 표기)을 해석합니다.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

use crate::models::CellValue;

/// Placeholder some exporters write for "no value".
const NO_VALUE: &str = "--";

const CURRENCY_GLYPHS: [char; 5] = ['₹', '$', '€', '£', '¥'];

/// Epoch strings longer than this are milliseconds.
const MAX_SECONDS_DIGITS: usize = 10;

const NAIVE_DATETIME_FORMATS: [&str; 4] = [
  "%Y-%m-%dT%H:%M:%S%.f",
  "%Y-%m-%dT%H:%M",
  "%Y-%m-%d %H:%M:%S%.f",
  "%Y-%m-%d %H:%M",
];

const NAMED_MONTH_FORMATS: [&str; 6] = [
  "%d %b %Y",
  "%d-%b-%Y",
  "%b %d %Y",
  "%b %d, %Y",
  "%d %B %Y",
  "%B %d, %Y",
];

/// Parses a raw cell into a number. Returns NaN for missing, blank or
/// unparseable cells, and for non-finite results.
pub fn normalize_number(raw: Option<&CellValue>) -> f64 {
  match raw {
    Some(CellValue::Number(n)) if n.is_finite() => *n,
    Some(CellValue::Text(s)) => normalize_number_str(s),
    _ => f64::NAN,
  }
}

pub fn normalize_number_str(raw: &str) -> f64 {
  let stripped: String = raw
    .chars()
    .filter(|c| *c != ',' && !c.is_whitespace() && !CURRENCY_GLYPHS.contains(c))
    .collect();
  let cleaned = stripped.replace(NO_VALUE, "");

  match cleaned.parse::<f64>() {
    Ok(value) if value.is_finite() => value,
    _ => f64::NAN,
  }
}

/// Parses a raw date cell into UNIX seconds.
///
/// Strategies, in order:
/// 1. digits only: epoch seconds, or milliseconds when `assume_milliseconds`
///    is set or there are more than 10 digits
/// 2. ISO-8601 / RFC 3339 / RFC 2822 and a few named-month forms
/// 3. three `/`, `.` or `-` separated parts: `D/M/YYYY`, `YYYY/M/D`, else
///    `D/M/YY`; an optional `HH:MM[:SS[.fff]]` may follow after whitespace
///
/// Timezone-less values are read as UTC. Pre-epoch results are rejected.
pub fn parse_date_to_seconds(raw: Option<&CellValue>, assume_milliseconds: bool) -> Option<i64> {
  match raw {
    Some(CellValue::Text(s)) => parse_date_str(s, assume_milliseconds),
    Some(CellValue::Number(n)) => {
      if n.is_finite() && *n >= 0.0 && n.fract() == 0.0 {
        parse_date_str(&format!("{}", *n as u64), assume_milliseconds)
      } else {
        None
      }
    }
    Some(CellValue::Null) | None => None,
  }
}

pub fn parse_date_str(raw: &str, assume_milliseconds: bool) -> Option<i64> {
  let s = raw.trim();
  if s.is_empty() {
    return None;
  }

  let seconds = if s.bytes().all(|b| b.is_ascii_digit()) {
    parse_epoch(s, assume_milliseconds)
  } else {
    parse_iso(s).or_else(|| parse_separated(s))
  }?;

  if seconds < 0 {
    return None;
  }
  Some(seconds)
}

fn parse_epoch(digits: &str, assume_milliseconds: bool) -> Option<i64> {
  let n: i64 = digits.parse().ok()?;
  if assume_milliseconds || digits.len() > MAX_SECONDS_DIGITS {
    Some(n / 1000)
  } else {
    Some(n)
  }
}

fn parse_iso(s: &str) -> Option<i64> {
  if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
    return Some(dt.timestamp());
  }
  if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
    return Some(dt.timestamp());
  }

  // chrono 의 %Y 는 자릿수 제한이 없어 "24-01-31" 을 서기 24년으로 읽으므로 4자리 연도만 허용
  if starts_with_year(s) {
    for fmt in NAIVE_DATETIME_FORMATS {
      if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
        return Some(dt.and_utc().timestamp());
      }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
      return Some(midnight_utc(date));
    }
  }

  for fmt in NAMED_MONTH_FORMATS {
    if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
      return Some(midnight_utc(date));
    }
  }

  None
}

fn parse_separated(s: &str) -> Option<i64> {
  let (date_part, time_part) = match s.split_once(char::is_whitespace) {
    Some((date, time)) => (date, Some(time.trim())),
    None => (s, None),
  };

  let normalized = date_part.replace(&['.', '-'][..], "/");
  let parts: Vec<&str> = normalized.split('/').collect();
  if parts.len() != 3 {
    return None;
  }

  let (day, month, year) = if parts[2].len() == 4 {
    (parts[0], parts[1], parts[2])
  } else if parts[0].len() == 4 {
    (parts[2], parts[1], parts[0])
  } else {
    (parts[0], parts[1], parts[2])
  };

  let year: i32 = match year.len() {
    4 => year.parse().ok()?,
    2 => 2000 + year.parse::<i32>().ok()?,
    _ => return None,
  };
  let month: u32 = month.parse().ok()?;
  let day: u32 = day.parse().ok()?;
  let date = NaiveDate::from_ymd_opt(year, month, day)?;

  let time = match time_part {
    Some(t) => NaiveTime::parse_from_str(t, "%H:%M:%S%.f")
      .or_else(|_| NaiveTime::parse_from_str(t, "%H:%M"))
      .ok()?,
    None => NaiveTime::MIN,
  };

  Some(date.and_time(time).and_utc().timestamp())
}

fn starts_with_year(s: &str) -> bool {
  let bytes = s.as_bytes();
  bytes.len() >= 5 && bytes[..4].iter().all(u8::is_ascii_digit) && bytes[4] == b'-'
}

fn midnight_utc(date: NaiveDate) -> i64 {
  date.and_time(NaiveTime::MIN).and_utc().timestamp()
}
