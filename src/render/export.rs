use std::io::Write;

use crate::service::aggregator::ProxyList;

impl ProxyList {
    /// 把全部条目（含失败占位）以 JSON 数组写出，末尾带换行。
    pub fn export(&self, w: &mut impl Write) -> anyhow::Result<()> {
        serde_json::to_writer(&mut *w, &self.entries)?;
        writeln!(w)?;
        Ok(())
    }
}
