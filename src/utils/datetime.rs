use crate::utils::error::{DashError, Result};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Weekday};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// 星期順序（熱力圖列固定為週一到週日）
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// 解析資料庫中的日期文字，空字串視為缺值
pub fn parse_timestamp(column: &str, raw: Option<&str>) -> Result<Option<NaiveDateTime>> {
    let Some(value) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };

    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(Some(parsed));
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Ok(date.and_hms_opt(0, 0, 0));
        }
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(Some(parsed.naive_local()));
    }

    Err(DashError::DateParseError {
        column: column.to_string(),
        value: value.to_string(),
    })
}

/// 篩選參數的日期 (YYYY-MM-DD)
pub fn parse_filter_date(field: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(value.trim(), "%Y/%m/%d"))
        .map_err(|_| DashError::invalid_filter(field, format!("'{}' is not a YYYY-MM-DD date", value)))
}

pub fn month_key(timestamp: &NaiveDateTime) -> String {
    timestamp.format("%Y-%m").to_string()
}

pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

pub fn weekday_of(timestamp: &NaiveDateTime) -> Weekday {
    timestamp.weekday()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timestamp_formats() {
        let date_only = parse_timestamp("Order_Date", Some("2024-03-05")).unwrap().unwrap();
        assert_eq!(date_only.date(), NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());

        let with_time = parse_timestamp("Order_Date", Some("2024-03-05 14:30:00")).unwrap().unwrap();
        assert_eq!(with_time.format("%H:%M").to_string(), "14:30");

        let slashed = parse_timestamp("Order_Date", Some("2024/03/05")).unwrap().unwrap();
        assert_eq!(slashed.date(), date_only.date());

        let rfc = parse_timestamp("Order_Date", Some("2024-03-05T08:00:00+08:00")).unwrap().unwrap();
        assert_eq!(rfc.date(), date_only.date());
    }

    #[test]
    fn test_parse_timestamp_missing_and_invalid() {
        assert!(parse_timestamp("Course_Date", None).unwrap().is_none());
        assert!(parse_timestamp("Course_Date", Some("  ")).unwrap().is_none());

        let err = parse_timestamp("Course_Date", Some("next tuesday")).unwrap_err();
        assert!(matches!(err, DashError::DateParseError { .. }));
    }

    #[test]
    fn test_month_and_weekday() {
        let ts = parse_timestamp("Order_Date", Some("2024-02-29")).unwrap().unwrap();
        assert_eq!(month_key(&ts), "2024-02");
        assert_eq!(weekday_name(weekday_of(&ts)), "Thursday");
    }

    #[test]
    fn test_parse_filter_date() {
        assert!(parse_filter_date("start_date", "2024-01-01").is_ok());
        assert!(parse_filter_date("start_date", "01/02/2024").is_err());
    }
}
