use clap::Parser;

use crate::common::utils::split_countries;
use crate::model::DEFAULT_SERVICE;
use crate::service::sorting::SortMode;

const ABOUT: &str = "\
In computer networks, a proxy server is a server (a computer system or an
application) that acts as an intermediary for requests from clients seeking
resources from other servers. A client connects to the proxy server, requesting
some service, such as a file, connection, web page, or other resource available
from a different server and the proxy server evaluates the request as a way to
simplify and control its complexity. Proxies were invented to add structure and
encapsulation to distributed systems. Today, most proxies are web proxies,
facilitating access to content on the World Wide Web and providing anonymity.";

#[derive(Parser, Debug, Clone)]
#[command(name = "proxylist", version, about = "ProxyList", long_about = ABOUT,
    after_help = format!("Service: {}", DEFAULT_SERVICE))]
pub struct Cli {
    /// 以 JSON 格式导出全部数据
    #[arg(short = 'e', long)]
    pub export: bool,

    /// 需要获取的代理数量
    #[arg(short = 'n', long = "count", default_value = "10")]
    pub howmany: usize,

    /// 代理所在国家（ISO2，逗号分隔，例如 US,UK）
    #[arg(short = 'c', long, default_value = "US")]
    pub countries: String,

    /// 排序列：port、speed、country、protocol、uptime
    #[arg(short = 's', long = "sort", default_value = "speed")]
    pub sorting: String,

    /// 按数值而不是字符串比较排序键
    #[arg(long)]
    pub numeric_sort: bool,

    /// 配置文件名（不含扩展名），文件不存在时使用默认配置
    #[arg(long, default_value = "Config")]
    pub config: String,
}

/// 一次运行所需的全部参数，由命令行解析一次后显式传递。
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub howmany: usize,
    pub countries: Vec<String>,
    pub sorting: String,
    pub sort_mode: SortMode,
    pub export: bool,
}

impl From<&Cli> for RunConfig {
    fn from(cli: &Cli) -> Self {
        Self {
            howmany: cli.howmany,
            countries: split_countries(&cli.countries),
            sorting: cli.sorting.clone(),
            sort_mode: if cli.numeric_sort {
                SortMode::Numeric
            } else {
                SortMode::Lexicographic
            },
            export: cli.export,
        }
    }
}
