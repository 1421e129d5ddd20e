//! Sleep spindle detection command-line interface

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use spindle_cli::{init_logging, load_config, read_signal, render, OutputFormat};
use spindle_detect::SpindleDetector;
use tracing::info;

#[derive(Parser)]
#[command(name = "spindle")]
#[command(author, version, about = "Sleep spindle detection", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect spindles and print the event table
    Detect {
        /// Signal file, one sample per line
        #[arg(short, long)]
        input: PathBuf,

        /// Sampling rate in Hz
        #[arg(long)]
        sf: f64,

        /// TOML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "json")]
        format: OutputFormat,
    },

    /// Print the 0/1 spindle mask, one value per sample
    Mask {
        /// Signal file, one sample per line
        #[arg(short, long)]
        input: PathBuf,

        /// Sampling rate in Hz
        #[arg(long)]
        sf: f64,

        /// TOML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    match cli.command {
        Commands::Detect {
            input,
            sf,
            config,
            format,
        } => {
            let detector = SpindleDetector::new(load_config(config.as_deref())?)?;
            let data = read_signal(&input)?;
            info!(samples = data.len(), sf, "running spindle detection");

            let table = detector.detect(&data, sf)?;
            println!("{}", render(table.as_ref(), format)?);
        }
        Commands::Mask { input, sf, config } => {
            let detector = SpindleDetector::new(load_config(config.as_deref())?)?;
            let data = read_signal(&input)?;

            let mask = match detector.detect(&data, sf)? {
                Some(table) => table.bool_vector(data.len(), sf),
                None => vec![0; data.len()],
            };
            let lines: Vec<String> = mask.iter().map(u8::to_string).collect();
            println!("{}", lines.join("\n"));
        }
    }

    Ok(())
}
