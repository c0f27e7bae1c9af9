//! Convert an open Strong's Greek dataset into the gloss JSON format.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use sword2flex::convert::{ConvertOptions, convert_file};

#[derive(Parser)]
#[command(name = "strongs-to-json")]
#[command(version, about = "Convert Strong's datasets (CSV/TSV/JSON) to strongs_greek.json", long_about = None)]
#[command(after_help = "EXAMPLES:
    strongs-to-json -i TBESG.txt --tsv -o data/strongs_greek.json
    strongs-to-json -i glosses.csv --num-field Number --gloss-field Meaning -o out.json")]
struct Cli {
    /// Input CSV, TSV, or JSON file
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,

    /// Output JSON file
    #[arg(short, long, value_name = "FILE")]
    output: PathBuf,

    /// CSV/TSV input has no header row
    #[arg(long)]
    no_header: bool,

    /// Input is tab-separated
    #[arg(long)]
    tsv: bool,

    /// Strong's number column or key
    #[arg(long, value_name = "NAME")]
    num_field: Option<String>,

    /// Gloss column or key
    #[arg(long, value_name = "NAME")]
    gloss_field: Option<String>,

    /// Suppress output messages
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.quiet {
        EnvFilter::new("off")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let options = ConvertOptions {
        no_header: cli.no_header,
        tsv: cli.tsv,
        num_field: cli.num_field,
        gloss_field: cli.gloss_field,
    };

    match convert_file(&cli.input, &cli.output, &options) {
        Ok(count) => {
            if !cli.quiet {
                println!("Wrote {count} entries to {}", cli.output.display());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
