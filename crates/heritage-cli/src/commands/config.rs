//! Config command: resolved values and their sources

use crate::output::OutputWriter;
use crate::output_types::ConfigRow;
use crate::session::Session;
use anyhow::Result;

pub fn execute(session: &Session, output: &OutputWriter) -> Result<()> {
    let mut rows: Vec<ConfigRow> = session
        .settings
        .to_inspection_map()
        .into_iter()
        .map(|(key, (value, source))| ConfigRow::new(key, value, source))
        .collect();
    rows.sort_by(|a, b| a.key.cmp(&b.key));

    output.result(&rows)?;
    output.section("Configuration");
    output.table(rows);
    Ok(())
}
