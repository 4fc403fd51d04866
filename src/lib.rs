//! dbd-icons: loader for the DBD Icons object-detection dataset.
//!
//! The dataset is a directory holding COCO annotation files (`train.json`,
//! `val.json`) next to the icon screenshots they describe. This crate joins
//! each annotation file against the images by file name and yields one
//! [`coco::ImageRecord`] per image: raw bytes, declared size, and bounding
//! boxes labeled with one of the 21 [`taxonomy`] categories.
//!
//! # Modules
//!
//! - [`coco`]: annotation index and the lazy join over candidate files
//! - [`builder`]: dataset info, output schema, split table, file discovery
//! - [`export`]: writes a split as a Hugging Face ImageFolder directory
//! - [`taxonomy`]: the fixed icon category list
//! - [`error`]: error types for dbd-icons operations

pub mod builder;
pub mod coco;
pub mod error;
pub mod export;
pub mod taxonomy;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::json;

pub use error::DbdIconsError;

use builder::{DatasetBuilder, Split};

/// The dbd-icons CLI application.
#[derive(Parser)]
#[command(name = "dbd-icons")]
#[command(version, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Show dataset info, splits and the record schema.
    Info(InfoArgs),
    /// Stream the records of one split as JSON lines.
    Generate(GenerateArgs),
    /// Write one split as a Hugging Face ImageFolder directory.
    Export(ExportArgs),
}

#[derive(clap::Args)]
struct InfoArgs {
    /// Output format ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

/// Where the dataset lives.
#[derive(clap::Args)]
struct SourceArgs {
    /// Directory holding the annotation files and images.
    #[arg(long, env = "DBD_ICONS_ROOT", default_value = builder::DEFAULT_ROOT)]
    root: PathBuf,

    /// Split to read ('train' or 'test').
    #[arg(long, default_value = "train")]
    split: String,
}

#[derive(clap::Args)]
struct GenerateArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Stop after this many records.
    #[arg(long)]
    limit: Option<usize>,
}

#[derive(clap::Args)]
struct ExportArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Output directory; the split is written to `<out>/<split>/`.
    #[arg(long)]
    out: PathBuf,
}

/// Run the dbd-icons CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), DbdIconsError> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Info(args)) => run_info(args),
        Some(Commands::Generate(args)) => run_generate(args),
        Some(Commands::Export(args)) => run_export(args),
        None => {
            println!("dbd-icons {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("{}.", builder::DESCRIPTION);
            println!();
            println!("Run 'dbd-icons --help' for usage information.");
            Ok(())
        }
    }
}

fn run_info(args: InfoArgs) -> Result<(), DbdIconsError> {
    let info = DatasetBuilder::default().info();

    match args.output.as_str() {
        "json" => {
            let splits: Vec<_> = Split::ALL
                .iter()
                .map(|split| json!({"name": split, "annotation_file": split.annotation_file()}))
                .collect();
            let doc = json!({"info": info, "splits": splits});
            println!("{:#}", doc);
        }
        "text" => {
            println!("{} (version {})", info.description, info.version);
            println!();
            println!("Splits:");
            for split in Split::ALL {
                println!("  {:<5} <- {}", split, split.annotation_file());
            }
            println!();
            println!("Features:");
            print!("{}", info.features);
            println!();
            println!("Categories ({}):", taxonomy::NAMES.len());
            for (label, name) in taxonomy::NAMES.iter().enumerate() {
                println!("  {label:>2} {name}");
            }
            println!();
            println!("Citation:");
            println!("{}", info.citation);
        }
        other => {
            return Err(DbdIconsError::UnsupportedOutput(format!(
                "'{other}' (supported: text, json)"
            )));
        }
    }

    Ok(())
}

fn run_generate(args: GenerateArgs) -> Result<(), DbdIconsError> {
    let split: Split = args.source.split.parse()?;
    let builder = DatasetBuilder::new(args.source.root);

    let pass = builder.generate(split)?;
    let limit = args.limit.unwrap_or(usize::MAX);

    for item in pass.take(limit) {
        let (idx, record) = item?;
        let line = json!({
            "index": idx,
            "image_id": record.image_id.as_i64(),
            "path": record.image.path.display().to_string(),
            "num_bytes": record.image.bytes.len(),
            "width": record.width,
            "height": record.height,
            "objects": record.objects,
        });
        println!("{line}");
    }

    Ok(())
}

fn run_export(args: ExportArgs) -> Result<(), DbdIconsError> {
    let split: Split = args.source.split.parse()?;
    let builder = DatasetBuilder::new(args.source.root);

    let summary = export::export_split(&builder, split, &args.out)?;
    println!(
        "Exported split '{}': {} image(s), {} object(s) -> {}",
        summary.split,
        summary.images,
        summary.objects,
        summary.output_dir.display()
    );
    Ok(())
}
