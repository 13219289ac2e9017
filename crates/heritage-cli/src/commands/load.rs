//! Load command: run the loaders and report the outcome

use crate::output::OutputWriter;
use crate::session::Session;
use anyhow::Result;
use heritage_store::LoadSummary;

fn report(output: &OutputWriter, what: &str, summary: &LoadSummary) {
    output.success(format!(
        "{}: {} created, {} updated, {} skipped",
        what, summary.created, summary.updated, summary.skipped
    ));
    for failure in &summary.failures {
        output.warning(format!("{}: {}", failure.item, failure.reason));
    }
}

pub fn execute(session: &Session, output: &OutputWriter) -> Result<()> {
    let load = &session.load;
    output.result(load)?;

    if load.boundaries.is_none() && load.sites.is_none() && load.enrichment.is_none() {
        output.info("Nothing to load; pass --sites, --boundaries or --enrich");
        return Ok(());
    }

    if let Some(summary) = &load.boundaries {
        report(output, "Boundaries", summary);
    }
    if let Some(summary) = &load.sites {
        report(output, "Sites", summary);
    }
    if let Some(summary) = &load.enrichment {
        output.success(format!(
            "Enrichment: {} updated, {} not found",
            summary.updated, summary.not_found
        ));
        for failure in &summary.failures {
            output.warning(format!("{}: {}", failure.item, failure.reason));
        }
    }

    output.section("Catalog");
    output.kv("Sites", load.total_sites);
    output.kv("Counties", load.total_regions);
    Ok(())
}
