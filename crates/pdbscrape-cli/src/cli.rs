use clap::Parser;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    name = "pdb-scrape",
    version,
    about = "Fetches coordinates, reflections and ligand definitions from the Protein Data Bank and prepares them for collation and alignment.",
    help_template = HELP_TEMPLATE,
)]
pub struct Cli {
    /// Text file containing PDB identifiers on separate lines
    #[arg(value_name = "PATH", required_unless_present = "clean_only")]
    pub input: Option<PathBuf>,

    /// Output directory (defaults to 'output')
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Space-delimited residue names stripped from the coordinates
    #[arg(short, long, value_name = "CODES")]
    pub remove: Option<String>,

    /// Space-delimited codes never considered as the ligand of interest
    #[arg(short, long, value_name = "CODES")]
    pub ignore: Option<String>,

    /// Do not download reflection data
    #[arg(long)]
    pub no_reflections: bool,

    /// Remove the original RCSB downloads once the batch is done
    #[arg(short, long)]
    pub clean: bool,

    /// Only remove the original RCSB downloads from the output directory, then exit
    #[arg(long, conflicts_with_all = ["clean", "force", "archive"])]
    pub clean_only: bool,

    /// Delete the files of a non-empty output directory instead of refusing to run
    /// (subdirectories are kept)
    #[arg(short, long)]
    pub force: bool,

    /// Pack the output directory into '<DIR>.tar.zst' after the batch
    #[arg(long)]
    pub archive: bool,

    /// Path to a configuration file in TOML format
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Network timeout per download, in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}
