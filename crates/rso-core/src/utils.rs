//! 通用工具函数

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

/// NUMERIC(10,2) 能容纳的上界
pub const MAX_MEASUREMENT: f64 = 100_000_000.0;

/// 解析 `YYYY-MM-DD`
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// 解析预约时间：纯日期（当日零点）、`YYYY-MM-DDTHH:MM[:SS]`、空格分隔形式或 RFC 3339
pub fn parse_date_time(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Some(date) = parse_date(value) {
        return date.and_hms_opt(0, 0, 0);
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt);
        }
    }
    DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.naive_utc())
}

/// 解析 `HH:MM` 或 `HH:MM:SS`
pub fn parse_time(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .ok()
}

/// 四舍五入到两位小数，与 NUMERIC(10,2) 存储一致
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
