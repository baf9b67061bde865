mod app_config;
mod proxy;

pub use app_config::{AppConfig, LoggingConfig, ServiceConfig, DEFAULT_SERVICE};
pub use proxy::ProxySettings;
