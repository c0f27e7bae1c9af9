//! sword2flex - Greek NT interlinear export for FieldWorks

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use sword2flex::export::{FlexTextWriter, export_book, save_flextext};
use sword2flex::{ExportConfig, Interlinear, NO_TRANSLATION, Settings};

#[derive(Parser)]
#[command(name = "sword2flex")]
#[command(version, about = "Export Greek NT passages as FlexText", long_about = None)]
#[command(after_help = "EXAMPLES:
    sword2flex export \"John 1:1-18\"             Write John_1-1-18.flextext
    sword2flex export \"John 1:1\" -o out/ --json  Also write the passage JSON
    sword2flex show \"1 John 4:8\"                Print the passage as JSON
    sword2flex web-data --books John,Mark        Build per-book JSON
    sword2flex translations --translation KJV=data/KJV.osis.xml

Every command except `translations` needs a Greek text source: --source,
SWORD2FLEX_SOURCE, or MorphGNT.osis.xml / SBLGNT.osis.xml / gnt.osis.xml /
web/ inside the data directory.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Data directory (default: data/ next to the executable, else ./data)
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Greek text source: OSIS XML file or per-book JSON directory
    #[arg(long, global = true, value_name = "PATH")]
    source: Option<PathBuf>,

    /// Strong's gloss JSON file
    #[arg(long, global = true, value_name = "FILE")]
    glosses: Option<PathBuf>,

    /// Translation module as ID=PATH (repeatable; the first is selected)
    #[arg(long = "translation", global = true, value_name = "ID=PATH", value_parser = parse_translation)]
    translations: Vec<(String, PathBuf)>,

    /// Do not attach phrase translations
    #[arg(long, global = true)]
    no_translation: bool,

    /// Log level when RUST_LOG is unset
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Suppress output messages
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Export a passage as FlexText XML
    Export {
        /// Reference such as "John 1:1", "John 1:1-18" or "John 1:1-5:14"
        reference: String,

        /// Output file or directory
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,

        /// Export configuration JSON
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Also write the passage model as JSON beside the FlexText
        #[arg(long)]
        json: bool,
    },
    /// Print a passage as JSON
    Show {
        reference: String,
    },
    /// Write per-book JSON for the browser viewer
    WebData {
        /// Books to export, comma separated
        #[arg(long, value_delimiter = ',', required = true)]
        books: Vec<String>,

        /// Output directory
        #[arg(long, default_value = "web_data", value_name = "DIR")]
        out: PathBuf,
    },
    /// List translation modules (no Greek source needed)
    Translations,
}

fn parse_translation(s: &str) -> Result<(String, PathBuf), String> {
    match s.split_once('=') {
        Some((id, path)) if !id.trim().is_empty() && !path.is_empty() => {
            Ok((id.trim().to_string(), PathBuf::from(path)))
        }
        _ => Err(format!("expected ID=PATH, got '{s}'")),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.quiet {
        EnvFilter::new("off")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> sword2flex::Result<()> {
    let mut settings = Settings::resolve(cli.data_dir, cli.source, cli.glosses);
    settings.translations = cli.translations;

    let open = || -> sword2flex::Result<Interlinear> {
        let mut interlinear = settings.open()?;
        if cli.no_translation {
            interlinear.set_translation(NO_TRANSLATION)?;
        }
        Ok(interlinear)
    };

    match cli.command {
        Commands::Export {
            reference,
            output,
            config,
            json,
        } => export(
            &open()?,
            &reference,
            output.as_deref(),
            config.as_deref(),
            json,
            cli.quiet,
        ),
        Commands::Show { reference } => {
            let passage = open()?.lookup(&reference)?;
            println!("{}", serde_json::to_string_pretty(&passage)?);
            Ok(())
        }
        Commands::WebData { books, out } => {
            let interlinear = open()?;
            for book in books.iter().map(|b| b.trim()).filter(|b| !b.is_empty()) {
                let path = export_book(&interlinear, book, &out)?;
                if !cli.quiet {
                    println!("Wrote {}", path.display());
                }
            }
            Ok(())
        }
        Commands::Translations => {
            let modules = settings.open_translations();
            let selected = modules
                .first()
                .filter(|_| !cli.no_translation)
                .map(|(id, _)| id.clone());
            let mut ids: Vec<String> = modules.into_iter().map(|(id, _)| id).collect();
            ids.sort();
            ids.dedup();
            for id in ids {
                let mark = if Some(&id) == selected.as_ref() { "*" } else { " " };
                println!("{mark} {id}");
            }
            Ok(())
        }
    }
}

fn export(
    interlinear: &Interlinear,
    reference: &str,
    output: Option<&Path>,
    config: Option<&Path>,
    json: bool,
    quiet: bool,
) -> sword2flex::Result<()> {
    let config = match config {
        Some(path) => ExportConfig::load(path)?,
        None => ExportConfig::default(),
    };

    let passage = interlinear.lookup(reference)?;
    let xml = FlexTextWriter::new(config)
        .with_translation(|v| interlinear.phrase_translation(v))
        .write_passage(&passage.verses);

    let target = output.unwrap_or(Path::new("."));
    let path = save_flextext(&xml, target, &passage.passage_ref)?;
    if !quiet {
        println!("Wrote {} ({} verses)", path.display(), passage.verses.len());
    }

    if json {
        let json_path = path.with_extension("json");
        std::fs::write(&json_path, serde_json::to_string_pretty(&passage)?)?;
        if !quiet {
            println!("Wrote {}", json_path.display());
        }
    }
    Ok(())
}
