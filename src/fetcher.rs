mod gimmeproxy;

use async_trait::async_trait;

use crate::error::FetchError;
use crate::model::ProxySettings;

pub use gimmeproxy::GimmeProxy;

/// 一次抓取的结果：要么是有效代理且无错误，要么是占位代理加一个错误。
#[derive(Debug)]
pub struct FetchOutcome {
    pub proxy: ProxySettings,
    pub error: Option<FetchError>,
}

impl FetchOutcome {
    pub fn success(proxy: ProxySettings) -> Self {
        Self { proxy, error: None }
    }

    pub fn failure(error: FetchError) -> Self {
        Self {
            proxy: ProxySettings::sentinel(),
            error: Some(error),
        }
    }
}

impl From<Result<ProxySettings, FetchError>> for FetchOutcome {
    fn from(result: Result<ProxySettings, FetchError>) -> Self {
        match result {
            Ok(proxy) => Self::success(proxy),
            Err(e) => Self::failure(e),
        }
    }
}

/// 单条代理的数据源。每次调用只发起一次请求，不做重试。
#[async_trait]
pub trait ProxySource: Send + Sync {
    async fn fetch(&self) -> FetchOutcome;
}
