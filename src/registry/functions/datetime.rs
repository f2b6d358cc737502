//! Date functions
//!
//! Dates travel between functions as ISO-8601 strings without offset
//! (`2020-01-05T00:00:00`), interpreted as UTC. Inputs may also be plain
//! dates (`2020-01-05`, `2020/01/05`), RFC 3339 timestamps (converted to
//! UTC) or numbers of milliseconds since the Unix epoch.

use super::{arg, number_arg, string_arg};
use crate::error::{ExpressionError, Result};
use crate::model::Value;
use crate::parser::ParserState;
use crate::registry::{Registry, check_arity};
use chrono::{DateTime, Datelike, Months, NaiveDate, NaiveDateTime, TimeDelta, Timelike, Utc};

const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const DATE_TIME_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S%.f",
];
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

/// Register `date`, `date_day`, `date_month`, `date_year`, `date_format`, `date_plus` and `date_minus`
pub fn register_datetime_functions(registry: &mut Registry) {
    registry.register_function("date", date);
    registry.register_function("date_day", date_day);
    registry.register_function("date_month", date_month);
    registry.register_function("date_year", date_year);
    registry.register_function("date_format", date_format);
    registry.register_function("date_plus", date_plus);
    registry.register_function("date_minus", date_minus);
}

/// `date([value])`: normalized ISO string; the current UTC time without an argument
pub fn date(_: &ParserState<'_>, args: &[Value]) -> Result<Value> {
    check_arity("date", args, 0, Some(1))?;
    let moment = if args.is_empty() {
        Utc::now().naive_utc()
    } else {
        parse_date("date", &arg(args, 0))?
    };
    Ok(to_value(moment))
}

pub fn date_day(_: &ParserState<'_>, args: &[Value]) -> Result<Value> {
    check_arity("date_day", args, 1, Some(1))?;
    Ok(Value::from(parse_date("date_day", &arg(args, 0))?.day()))
}

pub fn date_month(_: &ParserState<'_>, args: &[Value]) -> Result<Value> {
    check_arity("date_month", args, 1, Some(1))?;
    Ok(Value::from(parse_date("date_month", &arg(args, 0))?.month()))
}

pub fn date_year(_: &ParserState<'_>, args: &[Value]) -> Result<Value> {
    check_arity("date_year", args, 1, Some(1))?;
    Ok(Value::from(parse_date("date_year", &arg(args, 0))?.year()))
}

/// `date_format(format, date)` with moment-style tokens
///
/// Supported tokens: `YYYY YY MM M DD D HH H mm m ss s`. Text inside
/// square brackets is copied verbatim; any other character is kept as is.
pub fn date_format(_: &ParserState<'_>, args: &[Value]) -> Result<Value> {
    check_arity("date_format", args, 2, Some(2))?;
    let format = string_arg("date_format", args, 0)?;
    let moment = parse_date("date_format", &arg(args, 1))?;
    Ok(Value::String(format_moment(&format, &moment)))
}

/// `date_plus(amount, unit, date)`
pub fn date_plus(_: &ParserState<'_>, args: &[Value]) -> Result<Value> {
    shift("date_plus", args, 1.0)
}

/// `date_minus(amount, unit, date)`
pub fn date_minus(_: &ParserState<'_>, args: &[Value]) -> Result<Value> {
    shift("date_minus", args, -1.0)
}

fn shift(name: &str, args: &[Value], direction: f64) -> Result<Value> {
    check_arity(name, args, 3, Some(3))?;
    let amount = number_arg(name, args, 0)? * direction;
    let unit = string_arg(name, args, 1)?;
    let moment = parse_date(name, &arg(args, 2))?;

    let shifted = match unit.as_str() {
        "month" | "months" | "M" => add_months(moment, amount.trunc() as i64),
        "year" | "years" | "y" => add_months(moment, (amount.trunc() as i64).saturating_mul(12)),
        _ => {
            let millis = unit_millis(&unit).ok_or_else(|| {
                ExpressionError::function(name, format!("unknown unit '{unit}'"))
            })?;
            TimeDelta::try_milliseconds((amount * millis) as i64)
                .and_then(|delta| moment.checked_add_signed(delta))
        }
    };
    shifted
        .map(to_value)
        .ok_or_else(|| ExpressionError::function(name, "date out of range"))
}

fn unit_millis(unit: &str) -> Option<f64> {
    let millis = match unit {
        "millisecond" | "milliseconds" | "ms" => 1.0,
        "second" | "seconds" | "s" => 1_000.0,
        "minute" | "minutes" | "m" => 60_000.0,
        "hour" | "hours" | "h" => 3_600_000.0,
        "day" | "days" | "d" => 86_400_000.0,
        "week" | "weeks" | "w" => 604_800_000.0,
        _ => return None,
    };
    Some(millis)
}

fn add_months(moment: NaiveDateTime, months: i64) -> Option<NaiveDateTime> {
    let magnitude = Months::new(u32::try_from(months.unsigned_abs()).ok()?);
    if months >= 0 {
        moment.checked_add_months(magnitude)
    } else {
        moment.checked_sub_months(magnitude)
    }
}

fn parse_date(name: &str, value: &Value) -> Result<NaiveDateTime> {
    let parsed = match value {
        Value::String(text) => parse_text(text.trim()),
        Value::Number(millis) => {
            DateTime::from_timestamp_millis(*millis as i64).map(|moment| moment.naive_utc())
        }
        _ => None,
    };
    parsed.ok_or_else(|| ExpressionError::function(name, format!("invalid date: {value}")))
}

fn parse_text(text: &str) -> Option<NaiveDateTime> {
    if let Ok(moment) = DateTime::parse_from_rfc3339(text) {
        return Some(moment.naive_utc());
    }
    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
                .and_then(|day| day.and_hms_opt(0, 0, 0))
        })
}

fn to_value(moment: NaiveDateTime) -> Value {
    Value::String(moment.format(ISO_FORMAT).to_string())
}

// longest tokens first so `YYYY` is not read as two `YY`
const FORMAT_TOKENS: [&str; 12] = [
    "YYYY", "YY", "MM", "M", "DD", "D", "HH", "H", "mm", "m", "ss", "s",
];

fn format_moment(format: &str, moment: &NaiveDateTime) -> String {
    let mut out = String::with_capacity(format.len());
    let mut rest = format;
    while let Some(c) = rest.chars().next() {
        if c == '[' {
            if let Some(close) = rest.find(']') {
                out.push_str(&rest[1..close]);
                rest = &rest[close + 1..];
                continue;
            }
        }
        match FORMAT_TOKENS.iter().find(|token| rest.starts_with(**token)) {
            Some(token) => {
                out.push_str(&render(token, moment));
                rest = &rest[token.len()..];
            }
            None => {
                out.push(c);
                rest = &rest[c.len_utf8()..];
            }
        }
    }
    out
}

fn render(token: &str, moment: &NaiveDateTime) -> String {
    match token {
        "YYYY" => format!("{:04}", moment.year()),
        "YY" => format!("{:02}", moment.year().rem_euclid(100)),
        "MM" => format!("{:02}", moment.month()),
        "M" => moment.month().to_string(),
        "DD" => format!("{:02}", moment.day()),
        "D" => moment.day().to_string(),
        "HH" => format!("{:02}", moment.hour()),
        "H" => moment.hour().to_string(),
        "mm" => format!("{:02}", moment.minute()),
        "m" => moment.minute().to_string(),
        "ss" => format!("{:02}", moment.second()),
        "s" => moment.second().to_string(),
        _ => token.to_string(),
    }
}
