//! 时间工具函数 (UTC)
//!
//! 所有日期→时间戳转换统一在 API handler 层完成，
//! repository 层只接收 `i64` Unix millis。

use chrono::{DateTime, NaiveDate, Utc};

use super::{AppError, AppResult};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// 解析日期字符串 (严格 YYYY-MM-DD，月/日补零)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, DATE_FORMAT)
        .ok()
        // chrono accepts "2024-3-1"; round-tripping rejects it
        .filter(|d| d.format(DATE_FORMAT).to_string() == date)
        .ok_or_else(|| AppError::validation(format!("Invalid date format: {}", date)))
}

/// 验证日期不在未来
pub fn validate_not_future(date: NaiveDate) -> AppResult<()> {
    let today = Utc::now().date_naive();
    if date > today {
        return Err(AppError::validation(format!(
            "Date {} is in the future (today is {})",
            date, today
        )));
    }
    Ok(())
}

/// 日期开始 (00:00:00 UTC) → Unix millis
pub fn day_start_millis(date: NaiveDate) -> i64 {
    date.and_time(chrono::NaiveTime::MIN)
        .and_utc()
        .timestamp_millis()
}

/// 次日 00:00:00 UTC 的 Unix millis，调用方使用 `< end` 语义
pub fn day_end_millis(date: NaiveDate) -> i64 {
    day_start_millis(date.succ_opt().unwrap_or(date))
}

/// Unix millis → UTC 日期
pub fn millis_to_date(millis: i64) -> NaiveDate {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|dt| dt.date_naive())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-03-01").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
        assert!(parse_date("01/03/2024").is_err());
        assert!(parse_date("2024-02-30").is_err());
        assert!(parse_date("2024-3-1").is_err());
        assert!(parse_date("2024-03-1").is_err());
        assert!(parse_date(" 2024-03-01").is_err());
    }

    #[test]
    fn test_day_bounds() {
        let d = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let start = day_start_millis(d);
        let end = day_end_millis(d);
        assert_eq!(start, 1_709_251_200_000);
        assert_eq!(end - start, 86_400_000);
        assert_eq!(millis_to_date(end - 1), d);
        assert_eq!(millis_to_date(end), d.succ_opt().unwrap());
    }

    #[test]
    fn test_validate_not_future() {
        let today = Utc::now().date_naive();
        assert!(validate_not_future(today).is_ok());
        assert!(validate_not_future(today.succ_opt().unwrap()).is_err());
    }
}
