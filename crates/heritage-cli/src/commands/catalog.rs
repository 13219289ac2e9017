//! Catalog overview commands

use crate::output::OutputWriter;
use crate::output_types::{CategoryRow, RegionRow};
use crate::session::Session;
use anyhow::Result;

pub fn categories(session: &Session, output: &OutputWriter) -> Result<()> {
    let counts = session.engine.category_counts()?;
    output.result(&counts)?;

    output.section("Categories");
    output.table(
        counts
            .into_iter()
            .map(|(label, count)| CategoryRow { label, count })
            .collect(),
    );
    Ok(())
}

pub fn counties(session: &Session, output: &OutputWriter) -> Result<()> {
    let regions = session.engine.regions();
    output.result(&regions)?;

    output.section(format!("Counties ({})", regions.len()));
    output.table(regions.iter().map(RegionRow::from).collect());
    Ok(())
}
