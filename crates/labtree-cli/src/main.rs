use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use labtree::{build_lab_tree, to_xml, Lab};

#[derive(Debug, Parser)]
#[command(
    name = "labtree",
    version,
    about = "Build the quiz tree for a lab definition"
)]
struct Args {
    /// Lab definition JSON file (defaults to stdin)
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,
    /// Output format
    #[arg(short, long, value_enum, default_value = "xml")]
    to: OutputFormat,
    /// Output file (defaults to stdout)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Xml,
    Json,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .without_time()
        .init();

    if let Err(err) = run() {
        tracing::error!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = Args::parse();

    let input_data = read_input(&args.input)?;
    let lab: Lab = serde_json::from_str(&input_data).context("failed to parse lab definition")?;
    info!(
        "building tree for lab {} ({} quiz blocks)",
        lab.id,
        lab.quiz_blocks.len()
    );

    let tree = build_lab_tree(&lab).context("failed to build lab tree")?;

    let output = match args.to {
        OutputFormat::Xml => to_xml(&tree),
        OutputFormat::Json => {
            serde_json::to_string_pretty(&tree).context("failed to serialize tree")?
        }
    };

    write_output(&args.output, output.as_bytes())?;
    Ok(())
}

fn read_input(path: &Option<PathBuf>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read input file {}", path.display())),
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read stdin")?;
            if buffer.trim().is_empty() {
                bail!("no input provided on stdin");
            }
            Ok(buffer)
        }
    }
}

fn write_output(path: &Option<PathBuf>, data: &[u8]) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, data)
            .with_context(|| format!("failed to write output file {}", path.display())),
        None => {
            let mut stdout = io::stdout();
            stdout.write_all(data).context("failed to write stdout")?;
            stdout.write_all(b"\n").context("failed to write stdout")?;
            Ok(())
        }
    }
}
