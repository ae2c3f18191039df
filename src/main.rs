//! lens-to-cosy: CLI tool for generating COSY mesh tables from lens designs

use anyhow::{Context, Result};
use clap::Parser;
use cosy_export::LensDesign;
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "lens-to-cosy")]
#[command(about = "Generate COSY Infinity mesh tables from a lens design file")]
#[command(version)]
struct Args {
    /// Input JSON file (lens design)
    #[arg(short, long)]
    input: PathBuf,

    /// Output directory for coefR.txt and coefE.txt
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Override the design's point spacing (mm)
    #[arg(long)]
    point_spacing: Option<f64>,

    /// Override the design's electrode-to-ring spacing (mm)
    #[arg(long)]
    ring_spacing: Option<f64>,

    /// Override the design's axial offset (mm)
    #[arg(long)]
    z_offset: Option<f64>,

    /// Print both tables to stdout instead of writing files
    #[arg(long)]
    stdout: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    // Read and parse the design
    let json = fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read design file: {:?}", args.input))?;
    let mut design: LensDesign = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse design file: {:?}", args.input))?;

    // Apply overrides
    if let Some(spacing) = args.point_spacing {
        design.point_spacing = spacing;
    }
    if let Some(spacing) = args.ring_spacing {
        design.ring_spacing = Some(spacing);
    }
    if let Some(offset) = args.z_offset {
        design.z_offset = offset;
    }

    // Build and validate
    let document = design.build().context("Lens construction failed")?;
    let total_points = document.validate().context("Lens validation failed")?;

    // Output
    if args.stdout {
        print!("{}", document.render_ring_table()?);
        print!("{}", document.render_electrode_table()?);
    } else {
        fs::create_dir_all(&args.output)
            .with_context(|| format!("Failed to create output directory: {:?}", args.output))?;
        document.export(&args.output)?;
        eprintln!("Wrote coefR.txt and coefE.txt to {:?}", args.output);
    }

    eprintln!(
        "{} pieces, {} mesh points",
        document.piece_count(),
        total_points
    );
    for (name, count) in document.tallies() {
        eprintln!("  {name}: {count} pieces");
    }

    Ok(())
}
