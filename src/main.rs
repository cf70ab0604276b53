//! fxl2html - fixed-layout EPUB to single-file HTML

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use tracing::Level;
use tracing_subscriber::EnvFilter;

use fxl2html::{Config, Converter, default_output_path};

#[derive(Parser)]
#[command(name = "fxl2html")]
#[command(version, about = "Convert a fixed-layout EPUB into one self-contained HTML file", long_about = None)]
#[command(after_help = "EXAMPLES:
    fxl2html magazine.epub                 Write magazine.html next to the input
    fxl2html magazine.epub out/mag.html    Write to an explicit path
    fxl2html --page-width 768 --page-height 1024 brochure.epub")]
struct Cli {
    /// Input file (fixed-layout EPUB)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output file (default: INPUT with an .html extension)
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// JSON configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Page width in px (overrides the config file)
    #[arg(long, value_name = "W")]
    page_width: Option<f64>,

    /// Page height in px (overrides the config file)
    #[arg(long, value_name = "H")]
    page_height: Option<f64>,

    /// Document title (overrides the config file)
    #[arg(long)]
    title: Option<String>,

    /// Suppress output messages
    #[arg(short, long)]
    quiet: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if !cli.input.is_file() {
        eprintln!("error: input file {} does not exist", cli.input.display());
        return ExitCode::FAILURE;
    }

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&cli.input));

    match Converter::new(config).convert(&cli.input, &output) {
        Ok(result) => {
            if !cli.quiet {
                println!(
                    "Converted {} -> {} ({} pages)",
                    cli.input.display(),
                    result.output.display(),
                    result.pages
                );
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to convert {}: {e}", cli.input.display());
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_config(cli: &Cli) -> fxl2html::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    if let Some(width) = cli.page_width {
        config.page_width = width;
    }
    if let Some(height) = cli.page_height {
        config.page_height = height;
    }
    if let Some(title) = &cli.title {
        config.title = title.clone();
    }

    config.validate()?;
    Ok(config)
}
