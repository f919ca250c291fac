//! erminej - ermineJ result handling CLI
//!
//! Command-line interface for converting, summarizing and re-ranking
//! ermineJ gene-set enrichment results.

use clap::{Parser, Subcommand, ValueEnum};
use erminej_tools::config::ToolConfig;
use erminej_tools::convert::{load_result_table_with_config, tsvify_result_with_config};
use erminej_tools::data::{IdMap, ResultTable};
use erminej_tools::empirical::{append_empirical_columns_with_config, empirical_table_with_config};
use erminej_tools::error::Result;
use erminej_tools::invoke::{run_erminej_on_result, view_erminej_results};
use erminej_tools::rank::results_to_entrez_ranks_with_config;
use erminej_tools::report::write_top_results_with_config;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info, trace};

/// Output format for table-producing commands
#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Tab-separated values
    Tsv,
    /// JSON array of records
    Json,
}

/// ermineJ result handling
#[derive(Parser)]
#[command(name = "erminej")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// YAML file overriding column names, markers and thresholds
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Strip ermineJ line markers into <input>-tsv (skipped if it exists)
    Tsvify {
        /// Raw ermineJ result file
        input: PathBuf,
    },

    /// Print the most significant terms of a converted TSV file
    Top {
        /// Converted TSV file
        input: PathBuf,

        /// Number of terms to print (default from config: 10)
        #[arg(short = 'n', long)]
        top_n: Option<usize>,
    },

    /// Load a raw ermineJ result file sorted by p-value
    Load {
        /// Raw ermineJ result file
        input: PathBuf,

        /// Output path (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Compute empirical p-values against shuffled-control columns
    Empirical {
        /// TSV file with a real p column and p_shuf_* columns
        input: PathBuf,

        /// Output path (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "tsv")]
        format: OutputFormat,
    },

    /// Rewrite a probe-level result file as an entrez-id rank file
    Ranks {
        /// Result TSV with seq and probe_id columns
        input: PathBuf,

        /// Two-column TSV mapping probe ids to entrez ids
        #[arg(short, long)]
        mapping: PathBuf,
    },

    /// Run ermineJ against a result file
    Run {
        /// Ranked result file
        input: PathBuf,

        /// Base data directory (default from config: /data)
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },

    /// Open ermineJ results in ermineJ
    View {
        /// ermineJ result file
        input: PathBuf,

        /// Base data directory (default from config: /data)
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },

    /// Print the effective configuration as YAML
    Config,
}

#[derive(Serialize)]
struct EmpiricalRecord<'a> {
    id: &'a str,
    numerator: usize,
    denominator: usize,
    new_p: f64,
}

fn init_logging(verbose: u8) {
    let log_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(std::io::stderr)
        .with_target(verbose >= 2)
        .init();

    debug!("erminej started with verbosity level: {}", verbose);
    trace!("Full CLI args: {:?}", std::env::args().collect::<Vec<_>>());
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = load_config(cli.config.as_ref()).and_then(|config| match cli.command {
        Commands::Tsvify { input } => cmd_tsvify(&input, &config),
        Commands::Top { input, top_n } => cmd_top(&input, top_n, &config),
        Commands::Load { input, output } => cmd_load(&input, output.as_ref(), &config),
        Commands::Empirical {
            input,
            output,
            format,
        } => cmd_empirical(&input, output.as_ref(), format, &config),
        Commands::Ranks { input, mapping } => cmd_ranks(&input, &mapping, &config),
        Commands::Run { input, data_dir } => {
            let data_dir = data_dir.unwrap_or_else(|| config.data_dir.clone());
            run_erminej_on_result(&input, Some(data_dir.as_path()))
                .map(|path| println!("{}", path.display()))
        }
        Commands::View { input, data_dir } => {
            let data_dir = data_dir.unwrap_or_else(|| config.data_dir.clone());
            view_erminej_results(&input, Some(data_dir.as_path()))
        }
        Commands::Config => config.to_yaml().map(|yaml| print!("{}", yaml)),
    });

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<ToolConfig> {
    match path {
        Some(path) => {
            debug!("Loading configuration from {:?}", path);
            ToolConfig::from_file(path)
        }
        None => Ok(ToolConfig::default()),
    }
}

/// Convert a raw result file to TSV
fn cmd_tsvify(input: &PathBuf, config: &ToolConfig) -> Result<()> {
    let conversion = tsvify_result_with_config(input, config)?;
    if !conversion.converted {
        info!("No conversion performed");
    }
    println!("{}", conversion.path.display());
    Ok(())
}

/// Print top terms
fn cmd_top(input: &PathBuf, top_n: Option<usize>, config: &ToolConfig) -> Result<()> {
    let top_n = top_n.unwrap_or(config.top_n);
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    let n = write_top_results_with_config(input, top_n, &mut handle, config)?;
    debug!("{} terms below {}", n, config.significance);
    Ok(())
}

/// Load a raw result file and write it as TSV
fn cmd_load(input: &PathBuf, output: Option<&PathBuf>, config: &ToolConfig) -> Result<()> {
    let table = load_result_table_with_config(input, config)?;
    info!("Loaded {} terms from {:?}", table.n_rows(), input);
    write_table(&table, output)
}

/// Append empirical p-values
fn cmd_empirical(
    input: &PathBuf,
    output: Option<&PathBuf>,
    format: OutputFormat,
    config: &ToolConfig,
) -> Result<()> {
    let table = ResultTable::from_tsv(input)?;
    match format {
        OutputFormat::Tsv => {
            let table = append_empirical_columns_with_config(&table, config)?;
            write_table(&table, output)
        }
        OutputFormat::Json => {
            let records = empirical_table_with_config(&table, config)?;
            let ids = if table.has_column(&config.id_column) {
                table.column(&config.id_column)?
            } else {
                vec![""; table.n_rows()]
            };
            let json: Vec<EmpiricalRecord> = ids
                .into_iter()
                .zip(records)
                .map(|(id, r)| EmpiricalRecord {
                    id,
                    numerator: r.numerator,
                    denominator: r.denominator,
                    new_p: r.new_p,
                })
                .collect();
            let text = serde_json::to_string_pretty(&json)?;
            match output {
                Some(path) => std::fs::write(path, text + "\n")?,
                None => println!("{}", text),
            }
            Ok(())
        }
    }
}

/// Write an entrez rank file
fn cmd_ranks(input: &PathBuf, mapping: &PathBuf, config: &ToolConfig) -> Result<()> {
    let ids = IdMap::from_tsv(mapping)?;
    info!("Loaded {} probe mappings from {:?}", ids.len(), mapping);
    let rank_file = results_to_entrez_ranks_with_config(input, &ids, config)?;
    println!("{}", rank_file.display());
    Ok(())
}

fn write_table(table: &ResultTable, output: Option<&PathBuf>) -> Result<()> {
    match output {
        Some(path) => {
            info!("Writing {} rows to {:?}", table.n_rows(), path);
            table.to_tsv(path)
        }
        None => table.to_writer(std::io::stdout().lock()),
    }
}
