//! Probe identifier to entrez identifier mapping.

use crate::data::table::ResultTable;
use crate::error::{ErmineError, Result};
use std::collections::HashMap;
use std::path::Path;

/// Maps a probe identifier onto a gene identifier.
///
/// Returns `None` when the probe has no known gene.
pub trait IdMapper {
    fn map_id(&self, probe_id: &str) -> Option<String>;
}

impl<F> IdMapper for F
where
    F: Fn(&str) -> Option<String>,
{
    fn map_id(&self, probe_id: &str) -> Option<String> {
        self(probe_id)
    }
}

impl IdMapper for HashMap<String, String> {
    fn map_id(&self, probe_id: &str) -> Option<String> {
        self.get(probe_id).cloned()
    }
}

/// A probe-to-entrez lookup table loaded from disk.
#[derive(Debug, Clone, Default)]
pub struct IdMap {
    map: HashMap<String, String>,
}

impl IdMap {
    /// Build from `(probe_id, entrez_id)` pairs. Later pairs win.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            map: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Load from a TSV file with a header row.
    ///
    /// The first column holds probe ids and the second entrez ids; any
    /// further columns are ignored.
    pub fn from_tsv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let table = ResultTable::from_tsv(path)?;
        if table.n_columns() < 2 {
            return Err(ErmineError::EmptyData(
                "Mapping file needs a probe column and an entrez column".to_string(),
            ));
        }
        let map = table
            .rows()
            .iter()
            .filter(|row| !row[1].trim().is_empty())
            .map(|row| (row[0].clone(), row[1].clone()))
            .collect();
        Ok(Self { map })
    }

    /// Number of mapped probes.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl IdMapper for IdMap {
    fn map_id(&self, probe_id: &str) -> Option<String> {
        self.map.get(probe_id).cloned()
    }
}
