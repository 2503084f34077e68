use chrono::NaiveDate;
use thiserror::Error;

use super::HistoryRecord;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("empty date range: {from} is after {until}")]
    EmptyRange { from: NaiveDate, until: NaiveDate },
}

/// Narrowing applied to the history list. All set criteria must match.
///
/// Date bounds are inclusive and compare against the UTC calendar date of
/// `recorded_at`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryFilter {
    text: Option<String>,
    from: Option<NaiveDate>,
    until: Option<NaiveDate>,
}

impl HistoryFilter {
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn from(&self) -> Option<NaiveDate> {
        self.from
    }

    pub fn until(&self) -> Option<NaiveDate> {
        self.until
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.from.is_none() && self.until.is_none()
    }

    pub fn set_text(&mut self, text: &str) {
        let trimmed = text.trim();
        self.text = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
    }

    pub fn set_from(&mut self, from: Option<NaiveDate>) -> Result<(), FilterError> {
        check_range(from, self.until)?;
        self.from = from;
        Ok(())
    }

    pub fn set_until(&mut self, until: Option<NaiveDate>) -> Result<(), FilterError> {
        check_range(self.from, until)?;
        self.until = until;
        Ok(())
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn matches(&self, record: &HistoryRecord) -> bool {
        if let Some(ref text) = self.text {
            let needle = text.to_lowercase();
            let admin_match = record
                .admin_name
                .as_deref()
                .is_some_and(|name| name.to_lowercase().contains(&needle));
            let id_match = record.target_id.as_str() == text || record.id.as_str() == text;
            if !admin_match && !id_match {
                return false;
            }
        }

        if self.from.is_some() || self.until.is_some() {
            let Some(date) = record.recorded_date() else {
                return false;
            };
            if self.from.is_some_and(|from| date < from) {
                return false;
            }
            if self.until.is_some_and(|until| date > until) {
                return false;
            }
        }

        true
    }

    pub fn apply<'a>(&self, records: &'a [HistoryRecord]) -> Vec<&'a HistoryRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }

    /// Short description for the header, e.g. `/ana 2024-01-01..`.
    pub fn describe(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        let mut parts = vec![];
        if let Some(ref text) = self.text {
            parts.push(format!("/{}", text));
        }
        if self.from.is_some() || self.until.is_some() {
            let from = self.from.map(|d| d.to_string()).unwrap_or_default();
            let until = self.until.map(|d| d.to_string()).unwrap_or_default();
            parts.push(format!("{}..{}", from, until));
        }
        Some(parts.join(" "))
    }
}

pub fn parse_date(input: &str) -> Result<NaiveDate, FilterError> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| FilterError::InvalidDate(input.trim().to_string()))
}

fn check_range(from: Option<NaiveDate>, until: Option<NaiveDate>) -> Result<(), FilterError> {
    match (from, until) {
        (Some(from), Some(until)) if from > until => Err(FilterError::EmptyRange { from, until }),
        _ => Ok(()),
    }
}
