//! Cron expressions and fire-time computation.
//!
//! Accepts standard five-field expressions (`min hour dom month dow`),
//! six-field expressions with a leading seconds field, and the `@hourly`,
//! `@daily`, `@weekly`, `@monthly`, `@yearly` descriptors. Everything is
//! rewritten into the seconds-first dialect of the `cron` crate, whose
//! day-of-week numbering is 1-7 starting at Sunday (standard cron uses 0-7
//! with both 0 and 7 meaning Sunday).
//!
//! The `cron` crate requires day-of-month and day-of-week to both match.
//! Standard cron fires when either matches if both are restricted, so such
//! expressions are split into two schedules and the earlier instant wins.

use std::str::FromStr;

use chrono::{DateTime, Local, TimeZone};
use cron::Schedule;
use thiserror::Error;

/// A cron expression that could not be parsed.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct CronParseError(String);

/// Parsed schedule of one job. Computes successive fire instants.
#[derive(Debug, Clone)]
pub struct ScheduleHandle {
    expression: String,
    schedules: Vec<Schedule>,
}

impl ScheduleHandle {
    pub fn parse(expression: &str) -> Result<Self, CronParseError> {
        let schedules = split_day_fields(&normalize(expression)?)
            .iter()
            .map(|e| Schedule::from_str(e).map_err(|e| CronParseError(e.to_string())))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            expression: expression.trim().to_string(),
            schedules,
        })
    }

    /// The expression as written in the config.
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// First fire instant strictly after `after`.
    pub fn next_after<Tz: TimeZone>(&self, after: &DateTime<Tz>) -> Option<DateTime<Tz>> {
        self.schedules
            .iter()
            .filter_map(|s| s.after(after).next())
            .min()
    }

    /// Next fire instant from now, in local time.
    pub fn next_fire(&self) -> Option<DateTime<Local>> {
        self.next_after(&Local::now())
    }
}

/// Rewrite a standard cron expression into the `cron` crate's dialect.
pub(crate) fn normalize(expression: &str) -> Result<String, CronParseError> {
    let trimmed = expression.trim();
    if trimmed.is_empty() {
        return Err(CronParseError("empty expression".to_string()));
    }
    if trimmed.starts_with('@') {
        return Ok(trimmed.to_string());
    }

    let fields: Vec<&str> = trimmed.split_whitespace().collect();
    let (seconds, rest) = match fields.len() {
        5 => ("0", &fields[..]),
        6 => (fields[0], &fields[1..]),
        n => {
            return Err(CronParseError(format!(
                "expected 5 or 6 fields, found {}",
                n
            )));
        }
    };

    Ok(format!(
        "{} {} {} {} {} {}",
        seconds,
        rest[0],
        rest[1],
        rest[2],
        rest[3],
        day_of_week(rest[4])
    ))
}

/// One expression per day rule: two when day-of-month and day-of-week are
/// both restricted, otherwise the expression unchanged.
fn split_day_fields(normalized: &str) -> Vec<String> {
    let fields: Vec<&str> = normalized.split_whitespace().collect();
    if fields.len() != 6 || !is_restricted(fields[3]) || !is_restricted(fields[5]) {
        return vec![normalized.to_string()];
    }

    let with = |dom: &str, dow: &str| {
        format!(
            "{} {} {} {} {} {}",
            fields[0], fields[1], fields[2], dom, fields[4], dow
        )
    };
    vec![with(fields[3], "*"), with("*", fields[5])]
}

// Like cron(8), a field starting with `*` counts as unrestricted.
fn is_restricted(field: &str) -> bool {
    !field.starts_with('*') && field != "?"
}

fn day_of_week(field: &str) -> String {
    field
        .split(',')
        .map(day_of_week_item)
        .collect::<Vec<_>>()
        .join(",")
}

fn day_of_week_item(item: &str) -> String {
    let (base, step) = match item.split_once('/') {
        Some((base, step)) => (base, Some(step)),
        None => (item, None),
    };
    let suffix = step.map(|s| format!("/{}", s)).unwrap_or_default();

    let Some((lo, hi)) = base.split_once('-') else {
        return format!("{}{}", shift_day(base), suffix);
    };
    let (Ok(lo_n), Ok(hi_n)) = (lo.parse::<u8>(), hi.parse::<u8>()) else {
        return item.to_string();
    };

    // A range ending at 7 wraps onto Sunday, which is 1 after shifting.
    if hi_n == 7 && lo_n <= 6 {
        let mut out = format!("{}-7{}", lo_n + 1, suffix);
        let step_n = step.and_then(|s| s.parse::<u8>().ok()).unwrap_or(1);
        if step_n > 0 && (7 - lo_n) % step_n == 0 {
            out.push_str(",1");
        }
        return out;
    }

    format!("{}-{}{}", shift_day(lo), shift_day(hi), suffix)
}

fn shift_day(token: &str) -> String {
    match token.parse::<u8>() {
        Ok(n) if n <= 7 => ((n % 7) + 1).to_string(),
        _ => token.to_string(),
    }
}

#[cfg(test)]
#[path = "schedule_tests.rs"]
mod tests;
