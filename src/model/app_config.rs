use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_SERVICE: &str = "https://gimmeproxy.com/api/getProxy";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub service: ServiceConfig,
    pub log: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceConfig {
    pub url: String,
    /// 单次请求超时（秒）
    pub timeout: u64,
    pub host: String,
    pub user_agent: String,
    pub accept: String,
    pub accept_language: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub console_levels: Vec<String>,
    /// 可选的日志文件路径，未设置时只输出到终端
    pub file: Option<String>,
}

impl ServiceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

impl AppConfig {
    /// 依次叠加：内置默认值 -> 可选配置文件 `name` -> `PROXYLIST_*` 环境变量。
    ///
    /// 配置文件不存在时不会报错，环境变量使用 `__` 分隔层级，
    /// 例如 `PROXYLIST_SERVICE__TIMEOUT=10`。
    pub fn load(name: &str) -> anyhow::Result<Self> {
        let config = Self::defaults()?
            .add_source(config::File::with_name(name).required(false))
            .add_source(
                config::Environment::with_prefix("PROXYLIST")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("log.console_levels")
                    .try_parsing(true),
            )
            .build()?;
        let config = config.try_deserialize()?;
        Ok(config)
    }

    fn defaults() -> anyhow::Result<config::ConfigBuilder<config::builder::DefaultState>> {
        let builder = config::Config::builder()
            .set_default("service.url", DEFAULT_SERVICE)?
            .set_default("service.timeout", 5)?
            .set_default("service.host", "gimmeproxy.com")?
            .set_default(
                "service.user_agent",
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_13_6) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/11.1.2 Safari/605.1.15",
            )?
            .set_default(
                "service.accept",
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )?
            .set_default("service.accept_language", "en-us")?
            .set_default("log.console_levels", vec!["ERROR", "WARN"])?;
        Ok(builder)
    }
}
