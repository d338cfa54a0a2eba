//! Cocotab: flatten COCO annotations into CSV tables.
//!
//! Cocotab reads an MSCOCO annotation file and writes three delimited
//! tables that a statistics environment such as R can load directly:
//! dataset metadata, one row per image, and one row per annotated object.
//!
//! # Modules
//!
//! - [`coco`]: COCO JSON input types and loader
//! - [`tables`]: Derived metrics (area, aspect ratio, object counts, centers)
//! - [`writer`]: CSV output
//! - [`error`]: Error types for cocotab operations

pub mod coco;
pub mod error;
pub mod tables;
pub mod writer;

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use error::CocotabError;

/// The cocotab CLI application.
#[derive(Debug, Parser)]
#[command(name = "cocotab")]
#[command(version, about)]
pub struct Cli {
    /// The MSCOCO JSON file to collect information on.
    #[arg(short = 'i', long = "input_file_path")]
    pub input_file_path: PathBuf,

    /// Root directory for the output. Tables are written into a
    /// subdirectory named after the input file.
    #[arg(short = 'o', long = "output_dir", default_value = ".")]
    pub output_dir: PathBuf,

    /// Field delimiter (a single printable ASCII character, or a tab).
    #[arg(short = 'd', long, default_value = ",")]
    pub delimiter: String,

    /// Enable debug logging.
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

/// Everything the pipeline needs for one run.
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    pub input_path: PathBuf,
    pub output_root: PathBuf,
    pub write: writer::WriteOptions,
}

impl TryFrom<&Cli> for PipelineConfig {
    type Error = CocotabError;

    fn try_from(cli: &Cli) -> Result<Self, Self::Error> {
        Ok(Self {
            input_path: cli.input_file_path.clone(),
            output_root: cli.output_dir.clone(),
            write: writer::WriteOptions {
                delimiter: parse_delimiter(&cli.delimiter)?,
            },
        })
    }
}

/// What a successful run produced.
#[derive(Clone, Debug)]
pub struct PipelineSummary {
    pub output_dir: PathBuf,
    pub image_count: usize,
    pub object_count: usize,
    pub files: writer::WrittenFiles,
}

/// Parse a delimiter argument into a single byte.
pub fn parse_delimiter(value: &str) -> Result<u8, CocotabError> {
    match value.as_bytes() {
        [b] if *b == b'\t' || (b.is_ascii() && !b.is_ascii_control() && *b != b'"') => Ok(*b),
        _ if value == "\\t" => Ok(b'\t'),
        _ => Err(CocotabError::InvalidDelimiter(format!(
            "'{}' (expected a single printable ASCII character or tab)",
            value
        ))),
    }
}

/// Install the stderr log subscriber. `RUST_LOG` overrides the default.
pub fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "cocotab=debug"
    } else {
        "cocotab=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Load, extract and write: the whole conversion for one input file.
pub fn run_pipeline(config: &PipelineConfig) -> Result<PipelineSummary, CocotabError> {
    let dataset = coco::read_coco_json(&config.input_path)?;
    let tables = tables::extract_tables(&dataset)?;

    let output_dir = writer::output_dir_for(&config.output_root, &config.input_path);
    let files = writer::write_tables(&output_dir, &tables, &config.write)?;

    tracing::info!(
        output_dir = %output_dir.display(),
        images = tables.metadata.image_count,
        objects = tables.metadata.object_count,
        "wrote tables"
    );

    Ok(PipelineSummary {
        output_dir,
        image_count: tables.metadata.image_count,
        object_count: tables.metadata.object_count,
        files,
    })
}

/// Run the cocotab CLI.
///
/// This is the main entry point for the CLI, called from `main.rs` once
/// logging is set up.
pub fn run(cli: &Cli) -> Result<(), CocotabError> {
    let config = PipelineConfig::try_from(cli)?;
    let summary = run_pipeline(&config)?;

    println!(
        "Wrote 3 tables ({} images, {} objects) to {}",
        summary.image_count,
        summary.object_count,
        summary.output_dir.display()
    );
    Ok(())
}
