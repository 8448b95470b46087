use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use swatch_color::Lab;
use swatchcard::assets::AssetLoader;
use swatchcard::models::{AppConfig, SampleRecord};
use swatchcard::rendering::load_fonts;
use swatchcard::services::extractor;
use swatchcard::services::{load_samples, NamedColorSet, ReportPipeline, TilePool};

#[derive(Parser)]
#[command(name = "swatchcard")]
#[command(about = "Color profile report cards from photographs and tile images")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a report card for an image
    Render {
        /// Source image (PNG)
        #[arg(short, long, required_unless_present = "samples")]
        input: Option<PathBuf>,

        /// Dominant colors as JSON (as written by `extract --json`) instead of an image
        #[arg(short, long, conflicts_with = "input")]
        samples: Option<PathBuf>,

        /// Directory of tile images (PNG)
        #[arg(short, long)]
        tiles: PathBuf,

        /// Title printed under the grid
        #[arg(long)]
        title: String,

        /// Output PNG file path
        #[arg(short, long)]
        output: PathBuf,

        /// Seed for tile rotations (random if omitted)
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Print the dominant colors of an image
    Extract {
        /// Source image (PNG)
        #[arg(short, long)]
        input: PathBuf,

        /// Number of colors (defaults to colors.count from config)
        #[arg(short, long)]
        count: Option<usize>,

        /// Print the colors as JSON sample records
        #[arg(long)]
        json: bool,
    },
    /// Write the embedded config.yaml and colors.json to the filesystem
    Init {
        /// Overwrite existing files
        #[arg(long, short)]
        force: bool,

        /// List embedded assets without extracting
        #[arg(long)]
        list: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Render {
            input,
            samples,
            tiles,
            title,
            output,
            seed,
        }) => {
            init_logging();
            let source = match (samples, input) {
                (Some(path), _) => SampleSource::Json(path),
                (None, Some(path)) => SampleSource::Image(path),
                (None, None) => anyhow::bail!("either --input or --samples is required"),
            };
            run_render_command(&source, &tiles, &title, &output, seed)
        }
        Some(Commands::Extract { input, count, json }) => {
            init_logging();
            run_extract_command(&input, count, json)
        }
        Some(Commands::Init { force, list }) => run_init_command(force, list),
        None => {
            run_status_command();
            Ok(())
        }
    }
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "swatchcard=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();
}

/// Where the dominant colors come from
enum SampleSource {
    Image(PathBuf),
    Json(PathBuf),
}

/// Run the whole pipeline and write the card
fn run_render_command(
    source: &SampleSource,
    tiles_dir: &Path,
    title: &str,
    output: &Path,
    seed: Option<u64>,
) -> anyhow::Result<()> {
    let loader = AssetLoader::from_env();
    let config = AppConfig::load_from_assets(&loader);

    let samples = match source {
        SampleSource::Image(path) => extractor::extract_from_file(path, config.colors.count)?,
        SampleSource::Json(path) => load_samples(path)?,
    };
    let tiles = TilePool::scan_dir(tiles_dir)?;
    let names = NamedColorSet::load(&loader, config.colors.palette.as_deref())?;

    let fontdb = load_fonts(loader.get_fonts());
    let pipeline = ReportPipeline::new(config, fontdb)?;

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let report = pipeline.run(&samples, tiles, names, title, &mut rng)?;
    let png_bytes = report.encode_png()?;

    std::fs::write(output, &png_bytes)?;
    println!("Rendered {} ({} bytes)", output.display(), png_bytes.len());
    for m in &report.matches {
        println!("  {:>3}%  {}", m.allocation, m.label());
    }

    Ok(())
}

/// Print dominant colors with counts and L*a*b* coordinates
fn run_extract_command(input: &Path, count: Option<usize>, json: bool) -> anyhow::Result<()> {
    let loader = AssetLoader::from_env();
    let config = AppConfig::load_from_assets(&loader);
    let count = count.unwrap_or(config.colors.count);

    let samples = extractor::extract_from_file(input, count)?;
    if json {
        let records: Vec<SampleRecord> = samples.iter().map(SampleRecord::from).collect();
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }
    let total: u64 = samples.iter().map(|s| s.count).sum();

    println!("{:<9} {:>9} {:>7}   L*a*b*", "color", "pixels", "share");
    for sample in &samples {
        let Lab { l, a, b } = sample.lab;
        let share = if total == 0 {
            0.0
        } else {
            sample.count as f64 * 100.0 / total as f64
        };
        println!(
            "{:<9} {:>9} {:>6.2}%   {l:6.2} {a:7.2} {b:7.2}",
            sample.rgb.to_hex(),
            sample.count,
            share
        );
    }

    Ok(())
}

/// Extract embedded assets to filesystem
fn run_init_command(force: bool, list: bool) -> anyhow::Result<()> {
    if list {
        println!("Embedded assets:\n");
        for f in AssetLoader::list_embedded() {
            println!("  {f}");
        }
        return Ok(());
    }

    let loader = AssetLoader::from_env();
    let report = loader.init(force)?;

    if !report.written.is_empty() {
        println!("Extracted {} files:", report.written.len());
        for f in &report.written {
            println!("  + {f}");
        }
    }
    if !report.skipped.is_empty() {
        println!(
            "\nSkipped {} existing files (use --force to overwrite):",
            report.skipped.len()
        );
        for f in &report.skipped {
            println!("  - {f}");
        }
    }

    if report.written.is_empty() && report.skipped.is_empty() {
        println!("No files to extract.");
    }

    Ok(())
}

/// Display status and configuration information
fn run_status_command() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let loader = AssetLoader::from_env();
    let show = |path: Option<&Path>| {
        path.map(|p| p.display().to_string())
            .unwrap_or_else(|| "(not set)".to_string())
    };

    println!("Swatchcard v{VERSION}");
    println!("Color profile report cards from photographs and tile images\n");

    println!("Environment Variables:");
    println!("  CONFIG_FILE = {}", show(loader.config_file()));
    println!("  COLORS_FILE = {}", show(loader.colors_file()));
    println!("  FONTS_DIR   = {}", show(loader.fonts_dir()));

    let source = |path: Option<&Path>| match path {
        Some(p) if p.exists() => format!("filesystem ({})", p.display()),
        Some(p) => format!("embedded ({} not found)", p.display()),
        None => "embedded".to_string(),
    };
    println!("\nAsset Sources:");
    println!("  Config: {}", source(loader.config_file()));
    println!("  Colors: {}", source(loader.colors_file()));
    println!("  Fonts:  {} extra font files", loader.get_fonts().len());

    let config = AppConfig::load_from_assets(&loader);
    println!("\nConfiguration:");
    println!(
        "  Grid:   {}x{} tiles of {} px",
        config.grid.width, config.grid.height, config.grid.tile_width
    );
    println!("  Card:   {}x{} px", config.card.width, config.card.height);
    println!(
        "  Colors: {} per image, {:?} distance",
        config.colors.count, config.colors.metric
    );
    if let Err(e) = config.validate() {
        println!("  Invalid: {e}");
    }

    println!("\nCommands:");
    println!("  swatchcard render -i photo.png -t tiles/ --title \"...\" -o card.png");
    println!("  swatchcard extract -i photo.png [--json]");
    println!("  swatchcard render -s samples.json -t tiles/ --title \"...\" -o card.png");
    println!("  swatchcard init");
}
