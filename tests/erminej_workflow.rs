//! Integration tests for the ermineJ result workflow.

use approx::assert_relative_eq;
use erminej_tools::prelude::*;
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use tempfile::{tempdir, NamedTempFile};

/// A raw ermineJ result file with parameters, a header and four terms.
fn write_raw_results(dir: &std::path::Path) -> std::path::PathBuf {
    let path = dir.join("sub-all_hem-A.erminej.txt");
    let mut file = fs::File::create(&path).unwrap();
    writeln!(file, "# Created by ermineJ").unwrap();
    writeln!(file, "#@ Parameters").unwrap();
    writeln!(file, "scoreCol=2").unwrap();
    writeln!(file, "#!\tName\tID\tNumProbes\tNumGenes\tRawScore\tPval\tCorrectedPvalue").unwrap();
    writeln!(file, "!\tsynaptic signaling\tGO:0099536\t310\t290\t0.71\t1e-9\t0.00000002").unwrap();
    writeln!(file, "!\tcell cycle\tGO:0007049\t640\t600\t0.55\t0.002\t0.03").unwrap();
    writeln!(file, "!\tapoptotic process\tGO:0006915\t410\t400\t0.51\t0.04\t0.3").unwrap();
    writeln!(file, "!\tion transport\tGO:0006811\t500\t470\t0.62\t0.0001\t0.004   ").unwrap();
    writeln!(file, "# end").unwrap();
    path
}

#[test]
fn test_convert_then_report() {
    let dir = tempdir().unwrap();
    let raw = write_raw_results(dir.path());

    let conversion = tsvify_result(&raw).unwrap();
    assert!(conversion.converted);
    let before = fs::read_to_string(&conversion.path).unwrap();
    assert_eq!(before.lines().count(), 5);
    assert!(before.starts_with("Name\tID\tNumProbes"));

    let again = tsvify_result(&raw).unwrap();
    assert!(!again.converted);
    assert_eq!(fs::read_to_string(&again.path).unwrap(), before);

    let mut out = Vec::new();
    let n = write_top_results(&conversion.path, 10, &mut out).unwrap();
    assert_eq!(n, 3);
    let text = String::from_utf8(out).unwrap();
    let ids: Vec<&str> = text
        .lines()
        .filter_map(|l| l.split_whitespace().next())
        .collect();
    assert_eq!(ids, vec!["GO:0099536", "GO:0006811", "GO:0007049"]);
    assert!(text.lines().next().unwrap().ends_with("p<0.00001"));
    assert!(text.lines().nth(1).unwrap().ends_with("p=0.00400"));
}

#[test]
fn test_terms_with_empty_last_column() {
    let dir = tempdir().unwrap();
    let raw = dir.path().join("same_as.erminej.txt");
    fs::write(
        &raw,
        "#!\tName\tID\tPval\tCorrectedPvalue\tSame as\n\
         !\tcell cycle\tGO:0007049\t0.001\t0.01\tGO:0000278\n\
         !\tion transport\tGO:0006811\t0.002\t0.02\t\n\
         !\tapoptotic process\tGO:0006915\t0.3\t0.6\t\n",
    )
    .unwrap();

    let conversion = tsvify_result(&raw).unwrap();
    let mut out = Vec::new();
    assert_eq!(write_top_results(&conversion.path, 10, &mut out).unwrap(), 2);
    let text = String::from_utf8(out).unwrap();
    let ids: Vec<&str> = text
        .lines()
        .filter_map(|l| l.split_whitespace().next())
        .collect();
    assert_eq!(ids, vec!["GO:0007049", "GO:0006811"]);

    let table = load_result_table(&raw).unwrap();
    assert_eq!(table.n_rows(), 3);
    assert_eq!(table.n_columns(), 5);
    assert_eq!(table.column("Same as").unwrap(), vec!["GO:0000278", "", ""]);
}

#[test]
fn test_load_result_table_leaves_no_trace() {
    let dir = tempdir().unwrap();
    let raw = write_raw_results(dir.path());

    let table = load_result_table(&raw).unwrap();
    assert_eq!(table.n_rows(), 4);
    let pvals = table.numeric_column("Pval").unwrap();
    assert!(pvals.windows(2).all(|w| w[0] <= w[1]));

    let leftovers: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(leftovers.len(), 1);
}

#[test]
fn test_empirical_over_shuffled_runs() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "ID\tp\tp_shuf_1\tp_shuf_2\tp_shuf_3\tp_shuf_4").unwrap();
    writeln!(file, "GO:0099536\t0.001\t0.2\t0.5\t0.01\t0.9").unwrap();
    writeln!(file, "GO:0007049\t0.3\t0.2\t0.5\t0.01\t0.9").unwrap();
    writeln!(file, "GO:0006915\t0.95\t0.2\t0.5\t0.01\t0.9").unwrap();
    file.flush().unwrap();

    let table = ResultTable::from_tsv(file.path()).unwrap();
    let records = empirical_table(&table).unwrap();
    assert_eq!(records.len(), 3);
    assert_relative_eq!(records[0].new_p, 0.0);
    assert_relative_eq!(records[1].new_p, 0.5);
    assert_relative_eq!(records[2].new_p, 1.0);

    let row = [("p", 0.9), ("p_shuf_1", 0.5), ("p_shuf_2", 0.95)];
    let single = p_real_vs_shuffles(row).unwrap();
    assert_eq!((single.numerator, single.denominator), (1, 2));
    assert_relative_eq!(single.new_p, 0.5);

    let bare = [("p", 0.9)];
    assert!(matches!(
        p_real_vs_shuffles(bare),
        Err(ErmineError::NoShuffleColumns)
    ));
}

#[test]
fn test_entrez_ranks_with_loaded_mapping() {
    let dir = tempdir().unwrap();
    let results = dir.path().join("sub-all_hem-A_ctx-all.tsv");
    fs::write(
        &results,
        "probe_id\tseq\tbest_p\np1\t3.0\t0.1\np2\t1.0\t0.2\np3\t2.0\t0.3\n",
    )
    .unwrap();
    let mapping = dir.path().join("probes.tsv");
    fs::write(&mapping, "probe_id\tentrez_id\np1\te1\np2\te2\np3\te3\n").unwrap();

    let ids = IdMap::from_tsv(&mapping).unwrap();
    let rank_file = results_to_entrez_ranks(&results, &ids).unwrap();
    assert_eq!(rank_file, dir.path().join("sub-all_hem-A_ctx-all.entrez_rank"));
    assert_eq!(
        fs::read_to_string(&rank_file).unwrap(),
        "entrez_id\trank\ne1\t1\ne3\t2\ne2\t3\n"
    );

    let closure = |pid: &str| -> Option<String> {
        let map: HashMap<&str, &str> = [("p1", "1"), ("p2", "2"), ("p3", "3")]
            .into_iter()
            .collect();
        map.get(pid).map(|s| s.to_string())
    };
    let rank_file = results_to_entrez_ranks(&results, &closure).unwrap();
    assert_eq!(
        fs::read_to_string(&rank_file).unwrap(),
        "entrez_id\trank\n1\t1\n3\t2\n2\t3\n"
    );
}

#[test]
fn test_invocation_entry_points_report_not_implemented() {
    assert!(matches!(
        run_erminej_on_result("ranks.entrez_rank", None),
        Err(ErmineError::NotImplemented(_))
    ));
    assert!(matches!(
        view_erminej_results("go.erminej.txt", None),
        Err(ErmineError::NotImplemented(_))
    ));
}

#[test]
fn test_config_driven_columns() {
    let config = ToolConfig::from_yaml(
        "rank_column: score\nprobe_column: probe\ncorrected_pvalue_column: fdr\n",
    )
    .unwrap();

    let dir = tempdir().unwrap();
    let results = dir.path().join("scores.tsv");
    fs::write(&results, "probe\tscore\na\t-1\nb\t5\n").unwrap();
    let ids: HashMap<String, String> = [("a".to_string(), "10".to_string())].into_iter().collect();
    let rank_file = results_to_entrez_ranks_with_config(&results, &ids, &config).unwrap();
    assert_eq!(
        fs::read_to_string(rank_file).unwrap(),
        "entrez_id\trank\n\t1\n10\t2\n"
    );
}
