use chrono::{DateTime, TimeDelta, Utc};
use tracing::Level;

// 把字符串转换成 Level，忽略大小写，不识别时返回 None
pub fn parse_level(s: &str) -> Option<Level> {
    match s.to_uppercase().as_str() {
        "ERROR" => Some(Level::ERROR),
        "WARN" | "WARNING" => Some(Level::WARN),
        "INFO" => Some(Level::INFO),
        "DEBUG" => Some(Level::DEBUG),
        "TRACE" => Some(Level::TRACE),
        _ => None,
    }
}

/// 按逗号切分国家列表，去掉首尾空白，忽略空项。
pub fn split_countries(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(String::from)
        .collect()
}

/// 距离 `ts`（Unix 秒）已经过去多久，格式如 `1h2m3s`。
///
/// 时间戳在未来时按 `0s` 处理，无法表示的时间戳返回 `-`。
pub fn since(ts: i64, now: DateTime<Utc>) -> String {
    match DateTime::<Utc>::from_timestamp(ts, 0) {
        Some(checked) => format_elapsed(now.signed_duration_since(checked)),
        None => "-".to_string(),
    }
}

pub fn format_elapsed(elapsed: TimeDelta) -> String {
    let total = elapsed.num_seconds().max(0);
    let (h, m, s) = (total / 3600, total % 3600 / 60, total % 60);

    if h > 0 {
        format!("{}h{}m{}s", h, m, s)
    } else if m > 0 {
        format!("{}m{}s", m, s)
    } else {
        format!("{}s", s)
    }
}
