use std::io::Write;

use chrono::{DateTime, Utc};
use owo_colors::OwoColorize;

use crate::common::utils::since;
use crate::model::ProxySettings;
use crate::service::aggregator::ProxyList;

const HEADER: [&str; 10] = ["Country", "cURL", "Speed", "Uptime", "G", "P", "C", "R", "U", "A"];

const LEGEND: &str = "\
G - supports GET requests
P - supports POST requests
C - supports cookies
R - supports 'referer' header
U - supports 'user-agent' header
A - 1:anonymous, 0:notanonymous
";

const BLOCK: &str = "░░";

/// 表格单元：`text` 用于计算宽度，`styled` 是实际输出的内容（可能带 ANSI 颜色）。
struct Cell {
    text: String,
    styled: String,
}

impl Cell {
    fn plain(text: String) -> Self {
        Self {
            styled: text.clone(),
            text,
        }
    }

    fn flag(on: bool) -> Self {
        let styled = if on {
            BLOCK.on_bright_green().to_string()
        } else {
            BLOCK.on_bright_red().to_string()
        };
        Self {
            text: BLOCK.to_string(),
            styled,
        }
    }

    fn width(&self) -> usize {
        self.text.chars().count()
    }
}

fn row(proxy: &ProxySettings, now: DateTime<Utc>) -> Vec<Cell> {
    vec![
        Cell::plain(proxy.country.clone()),
        Cell::plain(proxy.curl.clone()),
        Cell::plain(format!("{:.2}", proxy.speed)),
        Cell::plain(since(proxy.ts_checked, now)),
        Cell::flag(proxy.get),
        Cell::flag(proxy.post),
        Cell::flag(proxy.cookies),
        Cell::flag(proxy.referer),
        Cell::flag(proxy.user_agent),
        Cell::flag(proxy.is_anonymous()),
    ]
}

fn separator(w: &mut impl Write, widths: &[usize]) -> std::io::Result<()> {
    write!(w, "+")?;
    for width in widths {
        write!(w, "{}+", "-".repeat(width + 2))?;
    }
    writeln!(w)
}

impl ProxyList {
    /// 以表格形式输出代理列表。
    ///
    /// 跳过抓取失败的占位条目和不在国家列表中的条目；
    /// 至少输出一行时在表格下方附上各列含义。
    pub fn print(&self, w: &mut impl Write) -> std::io::Result<()> {
        self.print_at(w, Utc::now())
    }

    fn print_at(&self, w: &mut impl Write, now: DateTime<Utc>) -> std::io::Result<()> {
        let rows: Vec<Vec<Cell>> = self
            .entries
            .iter()
            .filter(|p| !p.is_sentinel())
            .filter(|p| self.check_country(&p.country))
            .map(|p| row(p, now))
            .collect();

        let mut widths: Vec<usize> = HEADER.iter().map(|h| h.chars().count()).collect();
        for cells in &rows {
            for (width, cell) in widths.iter_mut().zip(cells) {
                *width = (*width).max(cell.width());
            }
        }

        separator(w, &widths)?;
        write!(w, "|")?;
        for (title, width) in HEADER.iter().zip(&widths) {
            write!(w, " {:^width$} |", title.to_uppercase(), width = *width)?;
        }
        writeln!(w)?;
        separator(w, &widths)?;

        for cells in &rows {
            write!(w, "|")?;
            for (cell, width) in cells.iter().zip(&widths) {
                let pad = width - cell.width();
                write!(w, " {}{} |", cell.styled, " ".repeat(pad))?;
            }
            writeln!(w)?;
        }
        separator(w, &widths)?;

        if !rows.is_empty() {
            write!(w, "{}", LEGEND)?;
        }
        Ok(())
    }
}
