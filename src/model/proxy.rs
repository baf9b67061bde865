use serde::{Deserialize, Deserializer, Serialize};

/// 接口返回的限流状态码。
pub const STATUS_TOO_MANY_REQUESTS: u16 = 429;

/// 代理服务返回的单条代理描述。
///
/// 除 `filter` 外，所有字段均来自接口 JSON；缺失或为 `null` 的字段取默认值，
/// 因为限流响应只包含 `status_code` 与 `status_message`。
///
/// `curl` 为空的实例是“抓取失败”的占位值，既不计入成功数，也不会被渲染。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxySettings {
    /// cURL 风格的连接串，例如 `http://1.2.3.4:8080`。
    #[serde(deserialize_with = "null_as_default")]
    pub curl: String,

    /// ISO2 国家代码。
    #[serde(deserialize_with = "null_as_default")]
    pub country: String,

    /// 服务端测得的速度，数值越小越快。
    #[serde(deserialize_with = "null_as_default")]
    pub speed: f64,

    /// 最近一次检测时间（Unix 秒）。
    #[serde(rename = "tsChecked", deserialize_with = "null_as_default")]
    pub ts_checked: i64,

    #[serde(deserialize_with = "null_as_default")]
    pub get: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub post: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub cookies: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub referer: bool,

    #[serde(rename = "user-agent", deserialize_with = "null_as_default")]
    pub user_agent: bool,

    /// 1：匿名，0：非匿名。
    #[serde(rename = "anonymityLevel", deserialize_with = "null_as_default")]
    pub anonymity_level: u8,

    /// 端口，接口有时返回字符串，有时返回整数，统一存为字符串。
    #[serde(deserialize_with = "port_from_any")]
    pub port: String,

    #[serde(deserialize_with = "null_as_default")]
    pub protocol: String,

    #[serde(deserialize_with = "null_as_default")]
    pub ip: String,

    #[serde(rename = "ipPort", deserialize_with = "null_as_default")]
    pub ip_port: String,

    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub kind: String,

    #[serde(rename = "supportsHttps", deserialize_with = "null_as_default")]
    pub supports_https: bool,

    #[serde(skip_serializing, deserialize_with = "null_as_default")]
    pub status_code: u16,

    #[serde(skip_serializing, deserialize_with = "null_as_default")]
    pub status_message: String,

    /// 排序用的临时键，由排序阶段写入，不参与序列化。
    #[serde(skip)]
    pub filter: String,
}

impl ProxySettings {
    /// 抓取失败时使用的占位实例。
    pub fn sentinel() -> Self {
        Self::default()
    }

    pub fn is_sentinel(&self) -> bool {
        self.curl.is_empty()
    }

    pub fn is_rate_limited(&self) -> bool {
        self.status_code == STATUS_TOO_MANY_REQUESTS
    }

    pub fn is_anonymous(&self) -> bool {
        self.anonymity_level == 1
    }
}

/// 字段为 `null` 时取类型默认值，与缺失字段的处理保持一致。
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PortRepr {
    Text(String),
    Number(u64),
    Null(()),
}

fn port_from_any<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match PortRepr::deserialize(deserializer)? {
        PortRepr::Text(s) => s,
        PortRepr::Number(n) => n.to_string(),
        PortRepr::Null(()) => String::new(),
    })
}
