//! ermineJ result handling
//!
//! This library sits between the ermineJ gene-set enrichment tool and
//! downstream tabular analysis of its results.
//!
//! # Overview
//!
//! - **convert**: Strip ermineJ line markers into plain TSV, load results as tables
//! - **report**: Print the most significant gene-set terms
//! - **empirical**: Empirical p-values of real statistics against shuffled controls
//! - **rank**: Rewrite probe-level results as entrez-id rank files
//! - **invoke**: Entry points for running and viewing results in ermineJ
//! - **data**: Result tables and probe-to-entrez mappings
//! - **config**: Column names, markers and thresholds
//!
//! # Example
//!
//! ```no_run
//! use erminej_tools::prelude::*;
//!
//! let conversion = tsvify_result("ontology.erminej.txt").unwrap();
//! describe_top_results(&conversion.path, 10).unwrap();
//!
//! let ids = IdMap::from_tsv("probe_to_entrez.tsv").unwrap();
//! let rank_file = results_to_entrez_ranks("sub-all_hem-A.tsv", &ids).unwrap();
//! println!("{}", rank_file.display());
//! ```

pub mod config;
pub mod convert;
pub mod data;
pub mod empirical;
pub mod error;
pub mod invoke;
pub mod rank;
pub mod report;

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::config::ToolConfig;
    pub use crate::convert::{
        load_result_table, load_result_table_with_config, strip_line, strip_markers,
        tsvify_result, tsvify_result_with_config, Conversion,
    };
    pub use crate::data::{IdMap, IdMapper, ResultTable, SortOrder};
    pub use crate::empirical::{
        append_empirical_columns, append_empirical_columns_with_config, empirical_table,
        empirical_table_with_config, p_real_vs_shuffles, p_real_vs_shuffles_with_config,
        EmpiricalP,
    };
    pub use crate::error::{ErmineError, Result};
    pub use crate::invoke::{run_erminej_on_result, view_erminej_results};
    pub use crate::rank::{
        rank_entries, rank_file_path, results_to_entrez_ranks,
        results_to_entrez_ranks_with_config, write_rank_entries, RankEntry,
    };
    pub use crate::report::{
        describe_term, describe_top_results, format_pvalue, top_result_lines,
        write_top_results, write_top_results_with_config,
    };
}
