use console::style;
use serde::Serialize;
use std::fmt::Display;
use tabled::{settings::Style, Table, Tabled};

/// Output format mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Human,
    Json,
}

pub struct OutputWriter {
    format: OutputFormat,
}

impl OutputWriter {
    pub fn new(json: bool) -> Self {
        Self { format: if json { OutputFormat::Json } else { OutputFormat::Human } }
    }

    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Status line; suppressed in JSON mode
    pub fn success(&self, message: impl Display) {
        if !self.is_json() {
            println!("{} {}", style("✓").green().bold(), message);
        }
    }

    pub fn info(&self, message: impl Display) {
        if !self.is_json() {
            println!("{} {}", style("ℹ").blue().bold(), message);
        }
    }

    pub fn warning(&self, message: impl Display) {
        if !self.is_json() {
            eprintln!("{} {}", style("⚠").yellow().bold(), message);
        }
    }

    pub fn kv(&self, key: impl Display, value: impl Display) {
        if !self.is_json() {
            println!("{}: {}", style(key).bold(), value);
        }
    }

    pub fn section(&self, title: impl Display) {
        if !self.is_json() {
            println!("\n{}", style(title).bold().underlined());
        }
    }

    /// Rows as a table; nothing in JSON mode, where [`OutputWriter::result`] carries the data
    pub fn table<T: Tabled>(&self, rows: Vec<T>) {
        if self.is_json() {
            return;
        }
        if rows.is_empty() {
            println!("{}", style("(no results)").dim());
        } else {
            let mut table = Table::new(rows);
            table.with(Style::rounded());
            println!("{}", table);
        }
    }

    /// Machine-readable result envelope; no-op in human mode
    pub fn result<T: Serialize>(&self, data: &T) -> anyhow::Result<()> {
        if self.is_json() {
            println!("{}", render_json(data)?);
        }
        Ok(())
    }
}

/// `{"status": "success", "data": ...}`, pretty-printed
pub fn render_json<T: Serialize>(data: &T) -> anyhow::Result<String> {
    let output = serde_json::json!({
        "status": "success",
        "data": data,
    });
    Ok(serde_json::to_string_pretty(&output)?)
}
