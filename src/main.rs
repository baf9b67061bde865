mod cli;
mod common;
mod error;
mod fetcher;
mod model;
mod render;
mod service;

use std::io::Write;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};

use crate::cli::{Cli, RunConfig};
use crate::common::log::init_logging;
use crate::fetcher::GimmeProxy;
use crate::model::AppConfig;
use crate::service::aggregator::ProxyList;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let app_config = AppConfig::load(&cli.config)?;
    init_logging(&app_config.log)?;

    let run = RunConfig::from(&cli);
    info!("服务地址 {}，国家 {:?}", app_config.service.url, run.countries);

    let source = GimmeProxy::new(app_config.service)?;
    let mut list = ProxyList::new(Arc::new(source), run.countries.clone());

    // 部分失败只提示，不影响后续输出
    if let Err(e) = list.execute(run.howmany).await {
        eprint!("{}", e);
    }

    if list.success == 0 {
        return Ok(());
    }

    list.sort(&run.sorting, run.sort_mode);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if run.export {
        if let Err(e) = list.export(&mut out) {
            error!("导出 JSON 失败：{}", e);
        }
    } else if let Err(e) = list.print(&mut out) {
        error!("输出表格失败：{}", e);
    }
    out.flush()?;

    Ok(())
}
