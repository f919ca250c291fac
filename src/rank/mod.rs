//! Rank files keyed by entrez id.
//!
//! Probe-level result files are ordered by a ranking statistic (`seq`),
//! highest first, and rewritten as a two-column `entrez_id`/`rank` file that
//! ermineJ can score gene sets against.

use crate::config::ToolConfig;
use crate::data::{IdMapper, ResultTable, SortOrder};
use crate::error::Result;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Extension replacing `.tsv` in the derived rank file path.
pub const RANK_EXTENSION: &str = ".entrez_rank";

/// One entry of a rank file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankEntry {
    /// Mapped gene id, `None` when the probe is unmapped.
    pub entrez_id: Option<String>,
    /// 1-based rank, 1 being the highest statistic.
    pub rank: usize,
}

/// Path of the rank file derived from a result file.
///
/// Every `.tsv` in the path becomes `.entrez_rank`; a path without `.tsv`
/// gets `.entrez_rank` appended so the input is never overwritten.
pub fn rank_file_path<P: AsRef<Path>>(result_file: P) -> PathBuf {
    let path = result_file.as_ref().to_string_lossy();
    if path.contains(".tsv") {
        PathBuf::from(path.replace(".tsv", RANK_EXTENSION))
    } else {
        PathBuf::from(format!("{}{}", path, RANK_EXTENSION))
    }
}

/// Rank the rows of a result table by descending statistic and map their probes.
pub fn rank_entries<M>(
    table: &ResultTable,
    mapper: &M,
    config: &ToolConfig,
) -> Result<Vec<RankEntry>>
where
    M: IdMapper + ?Sized,
{
    let sorted = table
        .clone()
        .sorted_by_numeric(&config.rank_column, SortOrder::Descending)?;
    let probes = sorted.column(&config.probe_column)?;

    let mut unmapped = 0usize;
    let entries = probes
        .iter()
        .enumerate()
        .map(|(idx, probe)| {
            let entrez_id = mapper.map_id(probe);
            if entrez_id.is_none() {
                unmapped += 1;
            }
            RankEntry {
                entrez_id,
                rank: idx + 1,
            }
        })
        .collect();

    if unmapped > 0 {
        warn!("{} of {} probes have no entrez id", unmapped, probes.len());
    }
    Ok(entries)
}

/// Write rank entries as `entrez_id\trank` with a header row.
pub fn write_rank_entries<W: Write>(entries: &[RankEntry], writer: &mut W) -> Result<()> {
    writeln!(writer, "entrez_id\trank")?;
    for entry in entries {
        writeln!(
            writer,
            "{}\t{}",
            entry.entrez_id.as_deref().unwrap_or(""),
            entry.rank
        )?;
    }
    Ok(())
}

/// Rewrite a probe-level result file as an entrez-id rank file.
///
/// Returns the path of the written rank file.
pub fn results_to_entrez_ranks<P, M>(result_file: P, mapper: &M) -> Result<PathBuf>
where
    P: AsRef<Path>,
    M: IdMapper + ?Sized,
{
    results_to_entrez_ranks_with_config(result_file, mapper, &ToolConfig::default())
}

/// [`results_to_entrez_ranks`] with custom ranking and probe columns.
pub fn results_to_entrez_ranks_with_config<P, M>(
    result_file: P,
    mapper: &M,
    config: &ToolConfig,
) -> Result<PathBuf>
where
    P: AsRef<Path>,
    M: IdMapper + ?Sized,
{
    let result_file = result_file.as_ref();
    let rank_file = rank_file_path(result_file);

    let table = ResultTable::from_tsv(result_file)?;
    debug!("Ranking {} probes from {}", table.n_rows(), result_file.display());
    let entries = rank_entries(&table, mapper, config)?;

    let mut writer = BufWriter::new(File::create(&rank_file)?);
    write_rank_entries(&entries, &mut writer)?;
    writer.flush()?;

    info!("Wrote {} ranks to {}", entries.len(), rank_file.display());
    Ok(rank_file)
}
