//! Legible summaries of enrichment results.

use crate::config::ToolConfig;
use crate::data::{ResultTable, SortOrder};
use crate::error::Result;
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// Smallest corrected p-value printed as a number.
pub const P_FLOOR: f64 = 0.00001;

/// Render a corrected p-value as `=0.01234`, or `<0.00001` at the floor.
pub fn format_pvalue(p: f64) -> String {
    if p > P_FLOOR {
        format!("={:.5}", p)
    } else {
        "<0.00001".to_string()
    }
}

/// One report line: `ID : Name p=...`, with ID and name padded into columns.
pub fn describe_term(id: &str, name: &str, corrected_p: f64) -> String {
    format!("{:<12}: {:<48} p{}", id, name, format_pvalue(corrected_p))
}

/// Write the `top_n` most significant terms of a stripped TSV file.
///
/// Terms are ordered by ascending `CorrectedPvalue`, and only terms below
/// 0.05 are written. Returns the number of lines written.
pub fn write_top_results<P, W>(tsv_file: P, top_n: usize, out: &mut W) -> Result<usize>
where
    P: AsRef<Path>,
    W: Write,
{
    write_top_results_with_config(tsv_file, top_n, out, &ToolConfig::default())
}

/// [`write_top_results`] with custom column names and significance level.
pub fn write_top_results_with_config<P, W>(
    tsv_file: P,
    top_n: usize,
    out: &mut W,
    config: &ToolConfig,
) -> Result<usize>
where
    P: AsRef<Path>,
    W: Write,
{
    let table = ResultTable::from_tsv(tsv_file.as_ref())?;
    let lines = top_result_lines(&table, top_n, config)?;
    for line in &lines {
        writeln!(out, "{}", line)?;
    }
    debug!(
        "Reported {} of {} terms from {}",
        lines.len(),
        table.n_rows(),
        tsv_file.as_ref().display()
    );
    Ok(lines.len())
}

/// Print the `top_n` most significant terms of a stripped TSV file to stdout.
pub fn describe_top_results<P: AsRef<Path>>(tsv_file: P, top_n: usize) -> Result<usize> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    write_top_results(tsv_file, top_n, &mut handle)
}

/// Report lines for the most significant terms of an in-memory table.
pub fn top_result_lines(
    table: &ResultTable,
    top_n: usize,
    config: &ToolConfig,
) -> Result<Vec<String>> {
    let column = config.corrected_pvalue_column.as_str();
    let significant = table
        .filter_numeric(column, |p| p < config.significance)?
        .sorted_by_numeric(column, SortOrder::Ascending)?
        .head(top_n);

    let ids = significant.column(&config.id_column)?;
    let names = significant.column(&config.name_column)?;
    let pvalues = significant.numeric_column(column)?;

    Ok(ids
        .iter()
        .zip(names.iter())
        .zip(pvalues)
        .map(|((id, name), p)| describe_term(id, name, p))
        .collect())
}
