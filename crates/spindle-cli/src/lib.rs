//! Spindle CLI support
//!
//! Signal file parsing, layered configuration loading and table rendering
//! for the `spindle` binary.

use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use config::{Config, Environment, File, FileFormat};
use spindle_detect::{DetectorConfig, SpindleTable};
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

/// Printed when detection finds nothing
pub const NO_SPINDLES: &str = "No spindle were found in data.";

/// Environment variable prefix for configuration overrides
const ENV_PREFIX: &str = "SPINDLE";

/// Output table format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Csv,
}

/// Initialize logging on stderr; `verbose` raises the level to DEBUG
pub fn init_logging(verbose: u8) -> Result<()> {
    let level = if verbose > 0 { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")
}

/// Build the detector configuration from defaults, an optional TOML file
/// and `SPINDLE_*` environment variables (nested keys joined by `__`, e.g.
/// `SPINDLE_THRESH__CORR`).
pub fn load_config(path: Option<&Path>) -> Result<DetectorConfig> {
    load_layers(path, environment())
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

fn load_layers(path: Option<&Path>, env: Environment) -> Result<DetectorConfig> {
    let mut builder = Config::builder().add_source(
        Config::try_from(&DetectorConfig::default()).context("Failed to encode default config")?,
    );
    if let Some(path) = path {
        builder = builder.add_source(File::from(path).format(FileFormat::Toml));
    }
    let settings = builder
        .add_source(env)
        .build()
        .context("Failed to load configuration")?;

    let config: DetectorConfig = settings
        .try_deserialize()
        .context("Invalid detector configuration")?;
    config.validate()?;
    debug!(?config, "configuration loaded");
    Ok(config)
}

/// Parse one sample per line. Blank lines and `#` comments are skipped and
/// only the first comma-separated field of a line is read.
pub fn parse_signal(text: &str) -> Result<Vec<f64>> {
    text.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(lineno, line)| {
            let field = line.split(',').next().unwrap_or(line).trim();
            field
                .parse::<f64>()
                .with_context(|| format!("line {lineno}: invalid sample {field:?}"))
        })
        .collect()
}

/// Read and parse a signal file
pub fn read_signal(path: &Path) -> Result<Vec<f64>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let samples = parse_signal(&text).with_context(|| format!("Failed to parse {}", path.display()))?;
    debug!(samples = samples.len(), path = %path.display(), "signal loaded");
    Ok(samples)
}

/// Render a detection outcome
pub fn render(table: Option<&SpindleTable>, format: OutputFormat) -> Result<String> {
    let Some(table) = table else {
        return Ok(NO_SPINDLES.to_string());
    };
    match format {
        OutputFormat::Csv => Ok(table.to_csv()),
        OutputFormat::Json => {
            serde_json::to_string_pretty(&table.events).context("Failed to encode events")
        }
    }
}
