use std::io::Write;

use serde::Serialize;

use crate::error::Result;
use crate::sim::ResponseSummary;

#[derive(Serialize)]
struct Report<'a> {
    scenario: &'a str,
    response: &'a ResponseSummary,
}

/// Write a response summary as pretty-printed JSON.
pub fn write_summary<W: Write>(
    writer: &mut W,
    scenario: &str,
    summary: &ResponseSummary,
) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, &Report { scenario, response: summary })?;
    writeln!(writer)?;
    Ok(())
}

/// Write a response summary JSON to a file.
pub fn write_summary_file(path: &str, scenario: &str, summary: &ResponseSummary) -> Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_summary(&mut file, scenario, summary)
}
