//! Numeric comparisons: `#(length > 3:00)`, `#(added < 2 weeks)`, `#(playcount > skipcount)`.

use std::{fmt, ops::RangeInclusive};

use crate::record::RecordAccessor;

/// Fields holding Unix timestamps. Relative ages are accepted for these.
const TIME_FIELDS: &[&str] = &["added", "mtime", "lastplayed", "laststarted"];

/// Fields holding byte counts. Size units are accepted for these.
const SIZE_FIELDS: &[&str] = &["filesize"];

/// Seconds in a day, used by `today`.
const DAY: f64 = 24.0 * 60.0 * 60.0;

/// A relational operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelOp {
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `=`
    Eq,
    /// `!=`
    Ne,
}

impl RelOp {
    /// Parses an operator lexeme.
    pub fn parse(text: &str) -> Option<Self> {
        Some(match text {
            "<" => Self::Lt,
            "<=" => Self::Le,
            ">" => Self::Gt,
            ">=" => Self::Ge,
            "=" => Self::Eq,
            "!=" => Self::Ne,
            _ => return None,
        })
    }

    /// The operator with its operands swapped: `a < b` is `b > a`.
    ///
    /// `<` and `>` swap, `<=` and `>=` swap, `=` and `!=` are unchanged.
    pub fn mirrored(self) -> Self {
        match self {
            Self::Lt => Self::Gt,
            Self::Le => Self::Ge,
            Self::Gt => Self::Lt,
            Self::Ge => Self::Le,
            Self::Eq | Self::Ne => self,
        }
    }

    /// Applies the operator.
    pub fn apply(self, lhs: f64, rhs: f64) -> bool {
        match self {
            Self::Lt => lhs < rhs,
            Self::Le => lhs <= rhs,
            Self::Gt => lhs > rhs,
            Self::Ge => lhs >= rhs,
            Self::Eq => lhs == rhs,
            Self::Ne => lhs != rhs,
        }
    }

    /// The operator as written in a query.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Eq => "=",
            Self::Ne => "!=",
        }
    }
}

impl fmt::Display for RelOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Right-hand side of a comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// A constant, already converted to the field's unit.
    Number(f64),
    /// Another numeric field, read from the same record.
    Field(String),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Field(name) => write!(f, "{name}"),
        }
    }
}

/// `field op operand`, evaluated against a record's numeric values.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericCompare {
    /// The numeric field on the left-hand side.
    pub field: String,
    /// The comparison operator.
    pub op: RelOp,
    /// The value compared against.
    pub operand: Operand,
}

impl NumericCompare {
    /// Builds a comparison from the two operand lexemes of `left op right`.
    ///
    /// At least one side must be a field name. A constant on the left is moved to the
    /// right with the operator mirrored. `now` is the current Unix time, used for
    /// relative ages on time fields.
    pub fn from_operands(
        left: &str,
        op: RelOp,
        right: &str,
        now: f64,
    ) -> Result<Self, String> {
        let (field, op, constant) = match (is_field_name(left), is_field_name(right)) {
            (true, true) => {
                return Ok(Self {
                    field: left.to_lowercase(),
                    op,
                    operand: Operand::Field(right.to_lowercase()),
                });
            }
            (true, false) => (left.to_lowercase(), op, right),
            (false, true) => (right.to_lowercase(), op.mirrored(), left),
            (false, false) => {
                return Err(format!(
                    "comparison '{left} {op} {right}' needs a field name on one side"
                ));
            }
        };

        let (op, value) = parse_value(&field, op, constant, now)?;
        Ok(Self {
            field,
            op,
            operand: Operand::Number(value),
        })
    }

    /// Evaluates the comparison. A record without the field never matches.
    pub fn matches<R: RecordAccessor + ?Sized>(&self, record: &R) -> bool {
        let Some(lhs) = record.numeric(&self.field) else {
            return false;
        };
        let rhs = match &self.operand {
            Operand::Number(n) => *n,
            Operand::Field(name) => match record.numeric(name) {
                Some(value) => round2(value),
                None => return false,
            },
        };
        self.op.apply(round2(lhs), rhs)
    }
}

impl fmt::Display for NumericCompare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.field, self.op, self.operand)
    }
}

/// Whether an operand lexeme names a field rather than a value.
fn is_field_name(text: &str) -> bool {
    let lower = text.trim().to_lowercase();
    lower.starts_with(|c: char| c.is_alphabetic() || c == '~') && lower != "now" && lower != "today"
}

/// Rounds to two decimals.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Converts a constant to a number in the unit of `field`.
///
/// Returns the operator to use with it: relative ages on time fields turn into
/// timestamps, which inverts the direction of the comparison. Absolute dates on
/// time fields are already timestamps and keep the operator.
fn parse_value(field: &str, op: RelOp, text: &str, now: f64) -> Result<(RelOp, f64), String> {
    let value = text.trim().to_lowercase();
    let is_time = TIME_FIELDS.contains(&field);

    if field == "date" {
        return date_key(&value)
            .map(|key| (op, key))
            .ok_or_else(|| format!("invalid date '{text}'"));
    }

    if is_time {
        match value.as_str() {
            "now" => return Ok((op.mirrored(), now)),
            "today" => return Ok((op.mirrored(), now - DAY)),
            _ => {}
        }
        if let Some(timestamp) = unix_date(&value) {
            return Ok((op, timestamp));
        }
    }

    if let Some(seconds) = parse_clock(&value) {
        return Ok(if is_time {
            (op.mirrored(), now - seconds)
        } else {
            (op, seconds)
        });
    }

    let (number, unit) =
        split_number(&value).ok_or_else(|| format!("no numeric value in '{text}'"))?;

    if is_time {
        let unit = unit.split_whitespace().next().unwrap_or_default();
        let scale = match unit.trim_end_matches('s') {
            "" => return Err(format!("'{text}' needs a time unit, e.g. '{number} days'")),
            "second" | "sec" => 1.0,
            "minute" | "min" => 60.0,
            "hour" => 60.0 * 60.0,
            "day" => DAY,
            "week" => 7.0 * DAY,
            "month" => 30.0 * DAY,
            "year" => 365.0 * DAY,
            _ => return Err(format!("unknown time unit '{unit}'")),
        };
        return Ok((op.mirrored(), (now - number * scale).trunc()));
    }

    if SIZE_FIELDS.contains(&field) {
        let scale = match unit.chars().next() {
            None | Some('b') => 1.0,
            Some('k') => 1024.0,
            Some('m') => 1024.0 * 1024.0,
            Some('g') => 1024.0 * 1024.0 * 1024.0,
            Some(_) => return Err(format!("unknown size unit '{unit}'")),
        };
        return Ok((op, number * scale));
    }

    if !unit.is_empty() {
        return Err(format!("'{field}' does not support units ('{unit}')"));
    }
    Ok((op, number))
}

/// Parses `m:ss` or `h:mm:ss` into seconds.
fn parse_clock(value: &str) -> Option<f64> {
    if !value.contains(':') {
        return None;
    }
    value.split(':').try_fold(0.0, |total, part| {
        let part: u32 = part.trim().parse().ok()?;
        Some(total * 60.0 + f64::from(part))
    })
}

/// Splits `value` into its longest numeric prefix and the trimmed remainder.
fn split_number(value: &str) -> Option<(f64, &str)> {
    value
        .char_indices()
        .rev()
        .map(|(idx, c)| idx + c.len_utf8())
        .find_map(|end| {
            let prefix = &value[..end];
            // Rust also parses "inf" and "nan", which are words here.
            if !prefix.starts_with(|c: char| c.is_ascii_digit() || matches!(c, '-' | '+' | '.')) {
                return None;
            }
            prefix
                .parse::<f64>()
                .ok()
                .map(|number| (number, value[end..].trim()))
        })
}

/// Turns `YYYY`, `YYYY-MM` or `YYYY-MM-DD` into a sortable integer key (`YYYYMMDD`).
///
/// Missing month and day count as 01, so `2004` equals `2004-01-01`.
pub fn date_key(value: &str) -> Option<f64> {
    let parts: Vec<&str> = value.trim().split('-').collect();
    if parts.len() > 3 {
        return None;
    }

    let year: u32 = parts.first()?.parse().ok()?;
    let month: u32 = match parts.get(1) {
        Some(m) => m.parse().ok().filter(|m| (1..=12).contains(m))?,
        None => 1,
    };
    let day: u32 = match parts.get(2) {
        Some(d) => d.parse().ok().filter(|d| (1..=31).contains(d))?,
        None => 1,
    };

    Some(f64::from(year) * 10_000.0 + f64::from(month * 100 + day))
}

/// Parses `YYYY`, `YYYY-MM` or `YYYY-MM-DD` into the Unix time of that day's UTC midnight.
///
/// The year must have four digits so relative ages like `3 days` never read as dates.
fn unix_date(value: &str) -> Option<f64> {
    let mut parts = value.split('-');
    let year = parts.next()?;
    if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year: i64 = year.parse().ok()?;
    let mut component = |range: RangeInclusive<i64>| -> Option<i64> {
        match parts.next() {
            Some(text) => text.parse().ok().filter(|n| range.contains(n)),
            None => Some(1),
        }
    };
    let month = component(1..=12)?;
    let day = component(1..=31)?;
    if parts.next().is_some() {
        return None;
    }

    // Days since 1970-01-01 in the proleptic Gregorian calendar.
    let y = if month <= 2 { year - 1 } else { year };
    let era = y.div_euclid(400);
    let year_of_era = y - era * 400;
    let day_of_year = (153 * ((month + 9) % 12) + 2) / 5 + day - 1;
    let day_of_era = year_of_era * 365 + year_of_era / 4 - year_of_era / 100 + day_of_year;
    let days = era * 146_097 + day_of_era - 719_468;
    Some(days as f64 * DAY)
}
