//! Empirical p-values from shuffled controls.
//!
//! Each gene-set term carries a p-value computed on real data (`p`) and one
//! p-value per shuffled run (columns whose name contains `p_`, e.g.
//! `p_shuf_1`). The empirical p-value is the fraction of shuffled runs that
//! beat the real run, i.e. where the real p-value is larger:
//!
//! ```text
//! new_p = #{ shuffle : p > p_shuffle } / #{ shuffle }
//! ```
//!
//! A row with no shuffled columns has no defined empirical p-value and is
//! reported as [`ErmineError::NoShuffleColumns`].

use crate::config::ToolConfig;
use crate::data::ResultTable;
use crate::error::{ErmineError, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Comparison of a real statistic against its shuffled controls.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmpiricalP {
    /// Number of shuffled columns the real value exceeds.
    pub numerator: usize,
    /// Number of shuffled columns compared.
    pub denominator: usize,
    /// `numerator / denominator`.
    pub new_p: f64,
}

/// Compute the empirical p-value for one row of `(column, value)` pairs.
///
/// The real value is read from column `p`; every column containing `p_` is
/// a shuffled control.
pub fn p_real_vs_shuffles<'a, I>(row: I) -> Result<EmpiricalP>
where
    I: IntoIterator<Item = (&'a str, f64)>,
{
    p_real_vs_shuffles_with_config(row, &ToolConfig::default())
}

/// [`p_real_vs_shuffles`] with custom real column and shuffle marker.
pub fn p_real_vs_shuffles_with_config<'a, I>(row: I, config: &ToolConfig) -> Result<EmpiricalP>
where
    I: IntoIterator<Item = (&'a str, f64)>,
{
    let row: Vec<(&str, f64)> = row.into_iter().collect();
    let real = row
        .iter()
        .find(|(name, _)| *name == config.real_column)
        .map(|(_, v)| *v)
        .ok_or_else(|| ErmineError::MissingColumn(config.real_column.clone()))?;

    let shuffled: Vec<f64> = row
        .iter()
        .filter(|(name, _)| is_shuffle_column(name, config))
        .map(|(_, v)| *v)
        .collect();

    compare(real, &shuffled)
}

fn is_shuffle_column(name: &str, config: &ToolConfig) -> bool {
    name != config.real_column && name.contains(config.shuffle_marker.as_str())
}

fn compare(real: f64, shuffled: &[f64]) -> Result<EmpiricalP> {
    if shuffled.is_empty() {
        return Err(ErmineError::NoShuffleColumns);
    }
    let numerator = shuffled.iter().filter(|&&s| real > s).count();
    let denominator = shuffled.len();
    Ok(EmpiricalP {
        numerator,
        denominator,
        new_p: numerator as f64 / denominator as f64,
    })
}

/// Compute an empirical p-value for every row of a table, in row order.
pub fn empirical_table(table: &ResultTable) -> Result<Vec<EmpiricalP>> {
    empirical_table_with_config(table, &ToolConfig::default())
}

/// [`empirical_table`] with custom real column and shuffle marker.
pub fn empirical_table_with_config(
    table: &ResultTable,
    config: &ToolConfig,
) -> Result<Vec<EmpiricalP>> {
    let real_column = config.real_column.as_str();
    let shuffle_columns: Vec<&str> = table
        .columns()
        .iter()
        .map(|c| c.as_str())
        .filter(|c| is_shuffle_column(c, config))
        .collect();
    debug!(
        "Comparing '{}' against {} shuffled columns over {} rows",
        real_column,
        shuffle_columns.len(),
        table.n_rows()
    );

    let real_values = table.numeric_column(real_column)?;
    let shuffle_values = shuffle_columns
        .iter()
        .map(|c| table.numeric_column(c))
        .collect::<Result<Vec<_>>>()?;

    (0..table.n_rows())
        .into_par_iter()
        .map(|row_idx| {
            let shuffled: Vec<f64> = shuffle_values.iter().map(|col| col[row_idx]).collect();
            compare(real_values[row_idx], &shuffled)
        })
        .collect()
}

/// Copy of `table` with `numerator`, `denominator` and `new_p` columns appended.
pub fn append_empirical_columns(table: &ResultTable) -> Result<ResultTable> {
    append_empirical_columns_with_config(table, &ToolConfig::default())
}

/// [`append_empirical_columns`] with custom real column and shuffle marker.
pub fn append_empirical_columns_with_config(
    table: &ResultTable,
    config: &ToolConfig,
) -> Result<ResultTable> {
    let records = empirical_table_with_config(table, config)?;
    let mut out = table.clone();
    out.push_column(
        "numerator",
        records.iter().map(|r| r.numerator.to_string()).collect(),
    )?;
    out.push_column(
        "denominator",
        records.iter().map(|r| r.denominator.to_string()).collect(),
    )?;
    out.push_column("new_p", records.iter().map(|r| r.new_p.to_string()).collect())?;
    Ok(out)
}
