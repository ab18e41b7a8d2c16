use axum::extract::{FromRequestParts, Path};
use chrono::{Days, NaiveDate, Utc};
use serde::Deserialize;

use crate::error::{AppError, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";
const DEFAULT_CALENDAR_DAYS: u64 = 7;

/// `Path` whose rejection is the JSON `AppError` body.
#[derive(Debug, FromRequestParts)]
#[from_request(via(Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

#[derive(Debug, Deserialize)]
pub struct LookupQuery {
    pub term: Option<String>,
}

impl LookupQuery {
    pub fn term(&self) -> Result<&str> {
        self.term
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::BadRequest("Missing 'term' parameter".to_string()))
    }
}

#[derive(Debug, Deserialize)]
pub struct CalendarQuery {
    pub start: Option<String>,
    pub end: Option<String>,
}

impl CalendarQuery {
    /// Validated `(start, end)` dates; defaults to today through a week out.
    pub fn range(&self) -> Result<(String, String)> {
        let start = match self.start.as_deref() {
            Some(raw) => parse_date("start", raw)?,
            None => Utc::now().date_naive(),
        };
        let end = match self.end.as_deref() {
            Some(raw) => parse_date("end", raw)?,
            None => start
                .checked_add_days(Days::new(DEFAULT_CALENDAR_DAYS))
                .unwrap_or(start),
        };

        if end < start {
            return Err(AppError::BadRequest(
                "'end' must not be before 'start'".to_string(),
            ));
        }

        Ok((
            start.format(DATE_FORMAT).to_string(),
            end.format(DATE_FORMAT).to_string(),
        ))
    }
}

fn parse_date(name: &str, raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|_| {
        AppError::BadRequest(format!("'{}' must be a date in YYYY-MM-DD format", name))
    })
}

#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    #[serde(rename = "deleteFiles")]
    pub delete_files: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_lookup_term_required() {
        let query = LookupQuery { term: None };
        assert!(query.term().is_err());

        let query = LookupQuery {
            term: Some("   ".to_string()),
        };
        assert!(query.term().is_err());

        let query = LookupQuery {
            term: Some(" Andor ".to_string()),
        };
        assert_eq!(query.term().unwrap(), "Andor");
    }

    #[test]
    fn test_calendar_explicit_range() {
        let query = CalendarQuery {
            start: Some("2024-02-01".to_string()),
            end: Some("2024-02-29".to_string()),
        };
        assert_eq!(
            query.range().unwrap(),
            ("2024-02-01".to_string(), "2024-02-29".to_string())
        );
    }

    #[test]
    fn test_calendar_end_defaults_to_a_week() {
        let query = CalendarQuery {
            start: Some("2024-12-28".to_string()),
            end: None,
        };
        assert_eq!(
            query.range().unwrap(),
            ("2024-12-28".to_string(), "2025-01-04".to_string())
        );
    }

    #[test]
    fn test_calendar_rejects_bad_input() {
        let bad_format = CalendarQuery {
            start: Some("01/02/2024".to_string()),
            end: None,
        };
        assert!(matches!(bad_format.range(), Err(AppError::BadRequest(_))));

        let reversed = CalendarQuery {
            start: Some("2024-03-10".to_string()),
            end: Some("2024-03-01".to_string()),
        };
        assert!(matches!(reversed.range(), Err(AppError::BadRequest(_))));
    }
}
