use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use pathforge::designer::matrix::from_svg;
use pathforge::{decompose_matrix, init_logging, EditorSettings, PathData, BUILD_DATE, VERSION};

#[derive(Parser, Debug)]
#[command(name = "pathforge", about = "Inspect and rewrite SVG path data")]
struct Cli {
    /// Editor settings file (.json or .toml)
    #[arg(long, env = "PATHFORGE_SETTINGS")]
    settings: Option<PathBuf>,

    /// Fractional digits in printed path data
    #[arg(long)]
    precision: Option<u32>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Re-emit path data with explicit Moves and rounded operands
    Normalize { data: String },
    /// Re-emit path data with absolute commands only
    Absolute { data: String },
    /// Total length of the path
    Length { data: String },
    /// Tight bounding box of the path as JSON
    Bounds { data: String },
    /// Split `matrix(a b c d e f)` into its components, as JSON
    #[command(allow_negative_numbers = true)]
    Decompose {
        a: f64,
        b: f64,
        c: f64,
        d: f64,
        e: f64,
        f: f64,
    },
    /// Print version and build date
    Version,
}

fn parse(data: &str) -> anyhow::Result<PathData> {
    data.parse()
        .with_context(|| format!("cannot read path data {data:?}"))
}

fn main() -> anyhow::Result<()> {
    init_logging()?;
    let cli = Cli::parse();

    let mut settings = match &cli.settings {
        Some(path) => EditorSettings::load_from_file(path)
            .with_context(|| format!("cannot load settings from {}", path.display()))?,
        None => EditorSettings::default(),
    };
    if let Some(precision) = cli.precision {
        settings.precision = precision;
    }
    tracing::debug!(?settings, "Settings in effect");

    match cli.command {
        Command::Normalize { data } => {
            println!("{}", parse(&data)?.to_path_string(settings.precision));
        }
        Command::Absolute { data } => {
            println!(
                "{}",
                parse(&data)?.to_absolute().to_path_string(settings.precision)
            );
        }
        Command::Length { data } => {
            println!("{}", parse(&data)?.total_length(settings.arc_length_resolution));
        }
        Command::Bounds { data } => match parse(&data)?.bounds() {
            Some(bounds) => println!("{}", serde_json::to_string_pretty(&bounds)?),
            None => anyhow::bail!("path data is empty"),
        },
        Command::Decompose { a, b, c, d, e, f } => {
            let decomposed = decompose_matrix(&from_svg(a, b, c, d, e, f));
            println!("{}", serde_json::to_string_pretty(&decomposed)?);
        }
        Command::Version => println!("pathforge {VERSION} (built {BUILD_DATE})"),
    }

    Ok(())
}
