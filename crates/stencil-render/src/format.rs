//! The `format` modifier: named styles and printf-style format strings.
//!
//! The argument selects the behavior. `currency` and `percent` apply the
//! locale's numeric symbols; `time` yields epoch milliseconds; the
//! `{full,long,medium,short}{Date,Time,DateTime}` and `isoLocal*` names
//! format temporal values; any other argument is treated as a printf-style
//! format string applied to the value. A mismatched value (a date style on a
//! string, `%d` on a mapping) leaves the value unchanged — modifier failures
//! are silent by contract.

use crate::locale::{Locale, NumberSymbols};
use crate::value::Value;

pub(crate) fn format_modifier(value: &Value, argument: Option<&str>, locale: &Locale) -> Value {
    let Some(argument) = argument else {
        return value.clone();
    };
    match argument {
        "currency" => format_currency(value, locale),
        "percent" => format_percent(value, locale),
        "time" => epoch_millis(value),
        "isoLocalDate" => format_temporal(value, Part::Date, "%Y-%m-%d"),
        "isoLocalTime" => format_temporal(value, Part::Time, "%H:%M:%S"),
        "isoLocalDateTime" => format_temporal(value, Part::DateTime, "%Y-%m-%dT%H:%M:%S"),
        "fullDate" => format_temporal(value, Part::Date, "%A, %B %-d, %Y"),
        "longDate" => format_temporal(value, Part::Date, "%B %-d, %Y"),
        "mediumDate" => format_temporal(value, Part::Date, "%b %-d, %Y"),
        "shortDate" => format_temporal(value, Part::Date, "%-m/%-d/%y"),
        "fullTime" | "longTime" | "mediumTime" => format_temporal(value, Part::Time, "%-I:%M:%S %p"),
        "shortTime" => format_temporal(value, Part::Time, "%-I:%M %p"),
        "fullDateTime" => format_temporal(value, Part::DateTime, "%A, %B %-d, %Y, %-I:%M:%S %p"),
        "longDateTime" => format_temporal(value, Part::DateTime, "%B %-d, %Y, %-I:%M:%S %p"),
        "mediumDateTime" => format_temporal(value, Part::DateTime, "%b %-d, %Y, %-I:%M:%S %p"),
        "shortDateTime" => format_temporal(value, Part::DateTime, "%-m/%-d/%y, %-I:%M %p"),
        pattern => printf(value, pattern, locale),
    }
}

/// Which fields a strftime pattern needs; gating prevents chrono from being
/// asked for a date field on a time-only value.
enum Part {
    Date,
    Time,
    DateTime,
}

fn format_temporal(value: &Value, part: Part, pattern: &str) -> Value {
    let formatted = match (&part, value) {
        (Part::Date, Value::Date(d)) => Some(d.format(pattern).to_string()),
        (Part::Time, Value::Time(t)) => Some(t.format(pattern).to_string()),
        (_, Value::DateTime(dt)) => Some(dt.format(pattern).to_string()),
        (_, Value::Timestamp(ts)) => Some(ts.format(pattern).to_string()),
        _ => None,
    };
    match formatted {
        Some(s) => Value::String(s),
        None => value.clone(),
    }
}

fn epoch_millis(value: &Value) -> Value {
    match value {
        Value::Timestamp(ts) => Value::Integer(ts.timestamp_millis()),
        Value::DateTime(dt) => Value::Integer(dt.and_utc().timestamp_millis()),
        _ => value.clone(),
    }
}

fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Integer(i) => Some(*i as f64),
        Value::Float(x) => Some(*x),
        _ => None,
    }
}

fn integer(value: &Value) -> Option<i64> {
    match value {
        Value::Integer(i) => Some(*i),
        Value::Float(x) => Some(*x as i64),
        _ => None,
    }
}

fn format_currency(value: &Value, locale: &Locale) -> Value {
    let Some(x) = numeric(value) else {
        return value.clone();
    };
    let symbols = locale.number_symbols();
    let magnitude = format_grouped(x.abs(), 2, &symbols);
    let sign = if x < 0.0 { "-" } else { "" };
    Value::String(if symbols.currency_prefix {
        format!("{sign}{}{magnitude}", symbols.currency)
    } else {
        format!("{sign}{magnitude} {}", symbols.currency)
    })
}

fn format_percent(value: &Value, locale: &Locale) -> Value {
    let Some(x) = numeric(value) else {
        return value.clone();
    };
    let symbols = locale.number_symbols();
    let scaled = x * 100.0;
    let magnitude = format_grouped(scaled.abs(), 0, &symbols);
    let sign = if scaled < 0.0 { "-" } else { "" };
    let space = if symbols.percent_space { " " } else { "" };
    Value::String(format!("{sign}{magnitude}{space}%"))
}

/// Formats a non-negative magnitude with grouping and the locale's decimal
/// separator.
fn format_grouped(magnitude: f64, fraction_digits: usize, symbols: &NumberSymbols) -> String {
    let raw = format!("{:.*}", fraction_digits, magnitude);
    let (int_part, frac_part) = match raw.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (raw.as_str(), None),
    };
    let mut out = group_integer(int_part, symbols.group);
    if let Some(frac) = frac_part {
        out.push(symbols.decimal);
        out.push_str(frac);
    }
    out
}

fn group_integer(digits: &str, group: char) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(group);
        }
        out.push(c);
    }
    out
}

/// A printf subset: `%s %d %x %X %o %f %e %%` with `-`/`0` flags, width, and
/// precision. An unknown conversion, or one the value cannot satisfy, leaves
/// the value unchanged.
fn printf(value: &Value, pattern: &str, locale: &Locale) -> Value {
    let mut out = String::new();
    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        if chars.peek() == Some(&'%') {
            chars.next();
            out.push('%');
            continue;
        }

        let mut left = false;
        let mut zero = false;
        loop {
            match chars.peek() {
                Some('-') => {
                    left = true;
                    chars.next();
                }
                Some('0') => {
                    zero = true;
                    chars.next();
                }
                _ => break,
            }
        }

        let mut width: Option<usize> = None;
        while let Some(d) = chars.peek().and_then(|c| c.to_digit(10)) {
            width = Some(width.unwrap_or(0) * 10 + d as usize);
            chars.next();
        }

        let mut precision: Option<usize> = None;
        if chars.peek() == Some(&'.') {
            chars.next();
            let mut p = 0;
            while let Some(d) = chars.peek().and_then(|c| c.to_digit(10)) {
                p = p * 10 + d as usize;
                chars.next();
            }
            precision = Some(p);
        }

        let Some(conversion) = chars.next() else {
            return value.clone();
        };
        let Some(field) = convert(value, conversion, precision, locale) else {
            return value.clone();
        };
        out.push_str(&pad(field, width, left, zero));
    }
    Value::String(out)
}

fn convert(
    value: &Value,
    conversion: char,
    precision: Option<usize>,
    locale: &Locale,
) -> Option<String> {
    match conversion {
        's' => {
            let s = value.to_string();
            Some(match precision {
                Some(p) => s.chars().take(p).collect(),
                None => s,
            })
        }
        'd' => integer(value).map(|i| i.to_string()),
        'x' => integer(value).map(|i| format!("{i:x}")),
        'X' => integer(value).map(|i| format!("{i:X}")),
        'o' => integer(value).map(|i| format!("{i:o}")),
        'f' => numeric(value).map(|x| {
            let digits = precision.unwrap_or(6);
            localize_decimal(format!("{:.*}", digits, x), locale)
        }),
        'e' => numeric(value).map(|x| scientific(x, precision.unwrap_or(6), locale)),
        _ => None,
    }
}

fn localize_decimal(s: String, locale: &Locale) -> String {
    let decimal = locale.number_symbols().decimal;
    if decimal == '.' {
        s
    } else {
        s.replace('.', &decimal.to_string())
    }
}

fn scientific(x: f64, precision: usize, locale: &Locale) -> String {
    if !x.is_finite() {
        return x.to_string();
    }
    let mut exp = if x == 0.0 {
        0
    } else {
        x.abs().log10().floor() as i32
    };
    let mantissa = if x == 0.0 { 0.0 } else { x / 10f64.powi(exp) };
    let mut body = format!("{:.*}", precision, mantissa);
    // rounding can push the mantissa to 10.0; renormalize once
    if body.trim_start_matches('-').starts_with("10") {
        exp += 1;
        body = format!("{:.*}", precision, mantissa / 10.0);
    }
    let sign = if exp < 0 { '-' } else { '+' };
    format!("{}e{sign}{:02}", localize_decimal(body, locale), exp.abs())
}

fn pad(field: String, width: Option<usize>, left: bool, zero: bool) -> String {
    let Some(width) = width else {
        return field;
    };
    let len = field.chars().count();
    if len >= width {
        return field;
    }
    let padding = width - len;
    if left {
        field + &" ".repeat(padding)
    } else if zero {
        match field.strip_prefix('-') {
            Some(rest) => format!("-{}{rest}", "0".repeat(padding)),
            None => format!("{}{field}", "0".repeat(padding)),
        }
    } else {
        " ".repeat(padding) + &field
    }
}
