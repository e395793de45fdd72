use anyhow::Context;
use chrono::{Datelike, Duration, NaiveDate};
use regex::Regex;
use serde::Serialize;

const RELATIVE_REGEX: &str = r"^(\d+)\s+(day|days|week|weeks)\s+ago$";
const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Lower bound of a history scan
///
/// Expressions the parser understands are resolved to a calendar date; anything
/// else is handed to `git log --since` verbatim, which may accept or reject it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SinceExpr {
    Date(NaiveDate),
    PassThrough(String),
}

#[derive(Debug, Clone)]
pub struct SinceParser {
    relative: Regex,
}

impl SinceParser {
    pub fn new() -> anyhow::Result<Self> {
        Ok(SinceParser {
            relative: Regex::new(RELATIVE_REGEX)
                .with_context(|| format!("invalid relative date pattern: {RELATIVE_REGEX}"))?,
        })
    }

    /// Resolve an expression relative to `today`
    ///
    /// Accepted forms:
    /// - `YYYY-MM-DD`
    /// - `today`, `yesterday`
    /// - `N day(s) ago`, `N week(s) ago`
    /// - `last monday` / `monday`: the most recent Monday before today
    ///   (on a Monday this is one week back)
    pub fn parse(&self, expression: &str, today: NaiveDate) -> SinceExpr {
        let normalized = expression.trim().to_lowercase();

        if let Ok(date) = NaiveDate::parse_from_str(&normalized, ISO_DATE_FORMAT) {
            return SinceExpr::Date(date);
        }

        match normalized.as_str() {
            "today" => return SinceExpr::Date(today),
            "yesterday" => return SinceExpr::Date(today - Duration::days(1)),
            "monday" | "last monday" => return SinceExpr::Date(Self::previous_monday(today)),
            _ => {}
        }

        if let Some(date) = self.parse_relative(&normalized, today) {
            return SinceExpr::Date(date);
        }

        tracing::debug!("passing time expression through to git: {expression}");
        SinceExpr::PassThrough(expression.trim().to_string())
    }

    fn parse_relative(&self, expression: &str, today: NaiveDate) -> Option<NaiveDate> {
        let captures = self.relative.captures(expression)?;
        let amount = captures.get(1)?.as_str().parse::<i64>().ok()?;
        let span = match captures.get(2)?.as_str() {
            "day" | "days" => Duration::try_days(amount)?,
            _ => Duration::try_weeks(amount)?,
        };

        today.checked_sub_signed(span)
    }

    fn previous_monday(today: NaiveDate) -> NaiveDate {
        let days_since_monday = match today.weekday().num_days_from_monday() {
            0 => 7,
            days => days,
        };
        today - Duration::days(days_since_monday as i64)
    }
}

impl SinceExpr {
    /// Value for `git log --since=<value>`
    pub fn to_git_arg(&self) -> String {
        match self {
            SinceExpr::Date(date) => date.format(ISO_DATE_FORMAT).to_string(),
            SinceExpr::PassThrough(raw) => raw.clone(),
        }
    }
}

impl std::fmt::Display for SinceExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_git_arg())
    }
}
