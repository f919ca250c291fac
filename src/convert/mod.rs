//! Conversion of raw ermineJ output into plain TSV.
//!
//! ermineJ writes its results with a two-character `#!` marker in front of
//! the header line and a single `!` in front of each data line, each followed
//! by a tab. Everything else in the file (parameters, comments, gene lists)
//! is dropped.
//!
//! # Example
//!
//! ```no_run
//! use erminej_tools::convert::{load_result_table, tsvify_result};
//!
//! let conversion = tsvify_result("ontology.erminej.txt").unwrap();
//! println!("{} (converted: {})", conversion.path.display(), conversion.converted);
//!
//! let table = load_result_table("ontology.erminej.txt").unwrap();
//! println!("{} terms", table.n_rows());
//! ```

use crate::config::ToolConfig;
use crate::data::{ResultTable, SortOrder};
use crate::error::Result;
use std::ffi::OsString;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Outcome of [`tsvify_result`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    /// Path of the stripped TSV file.
    pub path: PathBuf,
    /// `false` when the TSV file already existed and was left alone.
    pub converted: bool,
}

/// Append `suffix` to the final component of `path`.
pub(crate) fn append_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut os: OsString = path.as_os_str().to_os_string();
    os.push(suffix);
    PathBuf::from(os)
}

/// Strips a single annotated line using the default `#!` / `!` markers.
///
/// Returns `None` for lines carrying neither marker.
pub fn strip_line(line: &str) -> Option<&str> {
    strip_line_with_markers(line, "#!", "!")
}

fn strip_line_with_markers<'a>(line: &'a str, header: &str, data: &str) -> Option<&'a str> {
    let content = line
        .strip_prefix(header)
        .and_then(|rest| rest.strip_prefix('\t'))
        .or_else(|| line.strip_prefix(data).and_then(|rest| rest.strip_prefix('\t')))?;
    Some(content.trim_end())
}

/// Copy marked lines from `reader` to `writer`, stripped of their markers.
///
/// Returns the number of lines written.
pub fn strip_markers<R, W>(reader: R, writer: &mut W, config: &ToolConfig) -> Result<usize>
where
    R: BufRead,
    W: Write,
{
    let mut written = 0;
    for line in reader.lines() {
        let line = line?;
        if let Some(content) =
            strip_line_with_markers(&line, &config.header_marker, &config.data_marker)
        {
            writeln!(writer, "{}", content)?;
            written += 1;
        }
    }
    Ok(written)
}

fn strip_file(source: &Path, target: &Path, config: &ToolConfig) -> Result<usize> {
    let reader = BufReader::new(File::open(source)?);
    let mut writer = BufWriter::new(File::create(target)?);
    let written = strip_markers(reader, &mut writer, config)?;
    writer.flush()?;
    Ok(written)
}

/// Convert a raw ermineJ result file to `<path>-tsv`.
///
/// If the TSV file already exists it is returned untouched and the
/// conversion is reported as not performed.
pub fn tsvify_result<P: AsRef<Path>>(result_file: P) -> Result<Conversion> {
    tsvify_result_with_config(result_file, &ToolConfig::default())
}

/// [`tsvify_result`] with custom markers and suffix.
pub fn tsvify_result_with_config<P: AsRef<Path>>(
    result_file: P,
    config: &ToolConfig,
) -> Result<Conversion> {
    let result_file = result_file.as_ref();
    let tsv_file = append_suffix(result_file, &config.tsv_suffix);

    if tsv_file.is_file() {
        info!("{} already exists, skipping conversion", tsv_file.display());
        return Ok(Conversion {
            path: tsv_file,
            converted: false,
        });
    }

    match strip_file(result_file, &tsv_file, config) {
        Ok(written) => {
            info!(
                "Converted {} to {} ({} lines)",
                result_file.display(),
                tsv_file.display(),
                written
            );
            Ok(Conversion {
                path: tsv_file,
                converted: true,
            })
        }
        Err(e) => {
            // A half-written file would be mistaken for a finished conversion.
            match std::fs::remove_file(&tsv_file) {
                Ok(()) => debug!("Removed partial output {}", tsv_file.display()),
                Err(rm) if rm.kind() == std::io::ErrorKind::NotFound => {}
                Err(rm) => warn!(
                    "Could not remove partial output {}: {}",
                    tsv_file.display(),
                    rm
                ),
            }
            Err(e)
        }
    }
}

/// Removes its file when dropped.
struct TempFileGuard {
    path: PathBuf,
}

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!("Removed temporary file {}", self.path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => debug!("Could not remove {}: {}", self.path.display(), e),
        }
    }
}

/// Load a raw ermineJ result file as a table sorted by `Pval`.
///
/// The stripped intermediate file `<path>.stripped.tsv` is always rebuilt
/// and is removed before returning, whether or not loading succeeds.
pub fn load_result_table<P: AsRef<Path>>(result_file: P) -> Result<ResultTable> {
    load_result_table_with_config(result_file, &ToolConfig::default())
}

/// [`load_result_table`] with custom markers, suffix and p-value column.
pub fn load_result_table_with_config<P: AsRef<Path>>(
    result_file: P,
    config: &ToolConfig,
) -> Result<ResultTable> {
    let result_file = result_file.as_ref();
    let guard = TempFileGuard {
        path: append_suffix(result_file, &config.stripped_suffix),
    };

    let written = strip_file(result_file, &guard.path, config)?;
    debug!(
        "Stripped {} lines from {} into {}",
        written,
        result_file.display(),
        guard.path.display()
    );

    let table = ResultTable::from_tsv(&guard.path)?
        .sorted_by_numeric(&config.pvalue_column, SortOrder::Ascending)?;
    debug!("Loaded {} terms from {}", table.n_rows(), result_file.display());

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErmineError;
    use std::fs;
    use tempfile::tempdir;

    const RAW: &str = "# ermineJ results\n\
        #!\tName\tID\tNumProbes\tPval\tCorrectedPvalue\n\
        !\tcell cycle\tGO:0007049\t120\t0.04\t0.2\n\
        !\tapoptosis\tGO:0006915\t80\t0.001\t0.01  \n\
        # trailing comment\n\
        !no tab here\n";

    #[test]
    fn test_strip_line() {
        assert_eq!(strip_line("#!\tA\tB"), Some("A\tB"));
        assert_eq!(strip_line("!\t1\t2  \r"), Some("1\t2"));
        assert_eq!(strip_line("# comment"), None);
        assert_eq!(strip_line("!1\t2"), None);
        assert_eq!(strip_line("#!A"), None);
    }

    #[test]
    fn test_strip_markers_keeps_order() {
        let mut out = Vec::new();
        let n = strip_markers(RAW.as_bytes(), &mut out, &ToolConfig::default()).unwrap();
        assert_eq!(n, 3);
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "Name\tID\tNumProbes\tPval\tCorrectedPvalue\n\
             cell cycle\tGO:0007049\t120\t0.04\t0.2\n\
             apoptosis\tGO:0006915\t80\t0.001\t0.01\n"
        );
    }

    #[test]
    fn test_tsvify_simple() {
        let dir = tempdir().unwrap();
        let raw = dir.path().join("result.txt");
        fs::write(&raw, "#!\tA\tB\n!\t1\t2\n").unwrap();

        let first = tsvify_result(&raw).unwrap();
        assert!(first.converted);
        assert_eq!(first.path, dir.path().join("result.txt-tsv"));
        assert_eq!(fs::read_to_string(&first.path).unwrap(), "A\tB\n1\t2\n");

        fs::write(&raw, "#!\tX\n!\t9\n").unwrap();
        let second = tsvify_result(&raw).unwrap();
        assert!(!second.converted);
        assert_eq!(second.path, first.path);
        assert_eq!(fs::read_to_string(&second.path).unwrap(), "A\tB\n1\t2\n");
    }

    #[test]
    fn test_tsvify_removes_partial_output() {
        let dir = tempdir().unwrap();
        let raw = dir.path().join("broken.txt");
        fs::write(&raw, b"#!\tA\tB\n!\t\xff\xfe\t2\n").unwrap();

        let err = tsvify_result(&raw).unwrap_err();
        assert!(matches!(err, ErmineError::Io(_)));
        assert!(!dir.path().join("broken.txt-tsv").exists());
    }

    #[test]
    fn test_trailing_empty_column_survives_strip() {
        let dir = tempdir().unwrap();
        let raw = dir.path().join("same_as.erminej");
        fs::write(
            &raw,
            "#!\tName\tID\tPval\tCorrectedPvalue\tSame as\n\
             !\ta\tGO:1\t0.001\t0.01\tGO:3\n\
             !\tb\tGO:2\t0.002\t0.02\t\n",
        )
        .unwrap();

        let conversion = tsvify_result(&raw).unwrap();
        assert_eq!(
            fs::read_to_string(&conversion.path).unwrap().lines().nth(2),
            Some("b\tGO:2\t0.002\t0.02")
        );

        let table = load_result_table(&raw).unwrap();
        assert_eq!(table.n_rows(), 2);
        assert_eq!(table.column("ID").unwrap(), vec!["GO:1", "GO:2"]);
        assert_eq!(table.cell(1, "Same as").unwrap(), "");
        assert!(!dir.path().join("same_as.erminej.stripped.tsv").exists());
    }

    #[test]
    fn test_tsvify_missing_input() {
        let dir = tempdir().unwrap();
        let raw = dir.path().join("missing.txt");
        let err = tsvify_result(&raw).unwrap_err();
        assert!(matches!(err, ErmineError::Io(_)));
        assert!(!dir.path().join("missing.txt-tsv").exists());
    }

    #[test]
    fn test_load_result_table_sorted_and_cleaned() {
        let dir = tempdir().unwrap();
        let raw = dir.path().join("go.erminej");
        fs::write(&raw, RAW).unwrap();

        let table = load_result_table(&raw).unwrap();
        assert_eq!(table.n_rows(), 2);
        assert_eq!(table.column("ID").unwrap(), vec!["GO:0006915", "GO:0007049"]);
        assert!(!dir.path().join("go.erminej.stripped.tsv").exists());
    }

    #[test]
    fn test_load_result_table_rebuilds_stale_file() {
        let dir = tempdir().unwrap();
        let raw = dir.path().join("go.erminej");
        let stale = dir.path().join("go.erminej.stripped.tsv");
        fs::write(&raw, RAW).unwrap();
        fs::write(&stale, "Pval\n0.5\n").unwrap();

        let table = load_result_table(&raw).unwrap();
        assert_eq!(table.n_rows(), 2);
        assert!(!stale.exists());
    }

    #[test]
    fn test_load_result_table_cleans_up_on_failure() {
        let dir = tempdir().unwrap();
        let raw = dir.path().join("no_pval.erminej");
        fs::write(&raw, "#!\tID\tName\n!\tGO:1\tx\n").unwrap();

        let err = load_result_table(&raw).unwrap_err();
        assert!(matches!(err, ErmineError::MissingColumn(c) if c == "Pval"));
        assert!(!dir.path().join("no_pval.erminej.stripped.tsv").exists());
    }

    #[test]
    fn test_load_result_table_missing_input() {
        let dir = tempdir().unwrap();
        let raw = dir.path().join("absent.erminej");
        assert!(matches!(load_result_table(&raw), Err(ErmineError::Io(_))));
        assert!(!dir.path().join("absent.erminej.stripped.tsv").exists());
    }
}
