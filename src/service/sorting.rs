use std::cmp::Ordering;

use tracing::debug;

use crate::model::ProxySettings;
use crate::service::aggregator::ProxyList;

/// 支持排序的列。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Port,
    Speed,
    Country,
    Protocol,
    Uptime,
}

impl SortColumn {
    /// 不认识的列名返回 `None`。
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "port" => Some(Self::Port),
            "speed" => Some(Self::Speed),
            "country" => Some(Self::Country),
            "protocol" => Some(Self::Protocol),
            "uptime" => Some(Self::Uptime),
            _ => None,
        }
    }

    /// 计算排序键。速度放大 100 倍并保留两位小数。
    pub fn key(self, proxy: &ProxySettings) -> String {
        match self {
            Self::Port => proxy.port.clone(),
            Self::Speed => format!("{:.2}", proxy.speed * 100.0),
            Self::Country => proxy.country.clone(),
            Self::Protocol => proxy.protocol.clone(),
            Self::Uptime => proxy.ts_checked.to_string(),
        }
    }
}

/// 排序键的比较方式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    /// 按字符串逐字比较，"1000.00" 会排在 "500.00" 之前
    #[default]
    Lexicographic,
    /// 两个键都能解析为数字时按数值比较，否则退回字符串比较
    Numeric,
}

impl SortMode {
    pub fn compare(self, a: &str, b: &str) -> Ordering {
        match self {
            Self::Lexicographic => a.cmp(b),
            Self::Numeric => match (a.parse::<f64>(), b.parse::<f64>()) {
                (Ok(x), Ok(y)) => x.total_cmp(&y),
                _ => a.cmp(b),
            },
        }
    }
}

impl ProxyList {
    /// 按指定列重新排列代理，排序是稳定的。
    ///
    /// 列名无法识别时保留各条目原有的排序键。
    pub fn sort(&mut self, column: &str, mode: SortMode) {
        match SortColumn::parse(column) {
            Some(col) => {
                for entry in &mut self.entries {
                    entry.filter = col.key(entry);
                }
            }
            None => debug!("未知的排序列 {:?}，沿用原排序键", column),
        }

        self.entries
            .sort_by(|a, b| mode.compare(&a.filter, &b.filter));
    }
}
