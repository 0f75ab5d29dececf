use chrono::NaiveDate;
use water_core::today_local;

use crate::error::{AppError, Result};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%a %b %d %Y"];

/// Parses a reference day given as `2025-12-19` or as a date key
/// (`Fri Dec 19 2025`). Missing values mean today in local time.
pub fn resolve_date(value: Option<&str>) -> Result<NaiveDate> {
    let Some(value) = value.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(today_local());
    };
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
        .ok_or_else(|| AppError::InvalidInput(format!("invalid date {}", value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_iso_and_date_key() {
        let expected = NaiveDate::from_ymd_opt(2025, 12, 19).expect("date");
        assert_eq!(resolve_date(Some("2025-12-19")).expect("iso"), expected);
        assert_eq!(resolve_date(Some("Fri Dec 19 2025")).expect("key"), expected);
    }

    #[test]
    fn missing_means_today() {
        assert_eq!(resolve_date(None).expect("today"), today_local());
        assert_eq!(resolve_date(Some("  ")).expect("today"), today_local());
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            resolve_date(Some("yesterday")),
            Err(AppError::InvalidInput(_))
        ));
    }
}
