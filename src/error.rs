use thiserror::Error;

/// 单次抓取失败的原因。
///
/// 汇总阶段对所有变体一视同仁，区分它们只是为了日志可读。
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("构建请求失败: {0}")]
    Request(#[source] reqwest::Error),
    #[error("无效的请求头 {name}: {source}")]
    Header {
        name: &'static str,
        #[source]
        source: reqwest::header::InvalidHeaderValue,
    },
    #[error("{0}")]
    Transport(#[source] reqwest::Error),
    #[error("解析响应失败: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("{0}")]
    RateLimited(String),
    #[error("抓取任务异常退出")]
    TaskAborted,
}

/// 一批抓取中所有失败信息的合并结果，每条以 `• ` 开头、换行结尾。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct AggregateError(pub String);
