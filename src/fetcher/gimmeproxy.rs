use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{
    ACCEPT, ACCEPT_LANGUAGE, CONNECTION, HOST, HeaderMap, HeaderName, HeaderValue, USER_AGENT,
};
use tracing::debug;

use crate::error::FetchError;
use crate::fetcher::{FetchOutcome, ProxySource};
use crate::model::{ProxySettings, ServiceConfig};

const RATE_LIMITED: &str = "请求过于频繁 (429)";

/// 从 gimmeproxy 风格的接口获取单条代理。
///
/// 接口每次返回一个 JSON 对象；被限流时仍返回 JSON，
/// 只是 `status_code` 为 429，此时按失败处理。
pub struct GimmeProxy {
    client: Client,
    config: ServiceConfig,
}

impl GimmeProxy {
    /// 构建共享的 HTTP 客户端，超时取自配置。
    pub fn new(config: ServiceConfig) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self { client, config })
    }

    fn headers(&self) -> Result<HeaderMap, FetchError> {
        let pairs: [(HeaderName, &'static str, &str); 5] = [
            (HOST, "Host", self.config.host.as_str()),
            (CONNECTION, "Connection", "keep-alive"),
            (USER_AGENT, "User-Agent", self.config.user_agent.as_str()),
            (ACCEPT, "Accept", self.config.accept.as_str()),
            (ACCEPT_LANGUAGE, "Accept-Language", self.config.accept_language.as_str()),
        ];

        let mut headers = HeaderMap::new();
        for (key, name, value) in pairs {
            let value =
                HeaderValue::from_str(value).map_err(|source| FetchError::Header { name, source })?;
            headers.insert(key, value);
        }
        Ok(headers)
    }

    async fn try_fetch(&self) -> Result<ProxySettings, FetchError> {
        let request = self
            .client
            .get(&self.config.url)
            .headers(self.headers()?)
            .build()
            .map_err(FetchError::Request)?;

        debug!("GET {}", request.url());
        let response = self
            .client
            .execute(request)
            .await
            .map_err(FetchError::Transport)?;

        // 先完整读出响应体，连接随 response 一起释放
        let body = response.bytes().await.map_err(FetchError::Transport)?;
        let proxy: ProxySettings = serde_json::from_slice(&body)?;

        if proxy.is_rate_limited() {
            let message = if proxy.status_message.is_empty() {
                RATE_LIMITED.to_string()
            } else {
                proxy.status_message
            };
            return Err(FetchError::RateLimited(message));
        }

        Ok(proxy)
    }
}

#[async_trait]
impl ProxySource for GimmeProxy {
    async fn fetch(&self) -> FetchOutcome {
        self.try_fetch().await.into()
    }
}
