use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use logo_theme_wasm::contrast::{ContrastReport, analyze_contrast};
use logo_theme_wasm::stylesheet::{self, StylesheetFormat};
use logo_theme_wasm::{HexColor, ThemeConfig, build_theme, load, preview};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Derive an accessible color theme from a logo.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG applies otherwise
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract a palette from one or more images and export it
    Generate(GenerateArgs),
    /// Check text/background contrast of a palette JSON file (role -> hex)
    Contrast {
        palette: PathBuf,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(clap::Args, Debug)]
struct GenerateArgs {
    /// One or more input image paths
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// JSON configuration file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of dominant colors to extract
    #[arg(short = 'k', long)]
    n_colors: Option<usize>,

    /// HSV value shift for the dark/light primary variants
    #[arg(long)]
    brightness_delta: Option<f64>,

    /// Seed of the first k-means run
    #[arg(long)]
    seed: Option<u64>,

    /// Stylesheet format
    #[arg(short, long, value_enum, default_value_t = Format::Scss)]
    format: Format,

    /// Output directory (defaults to the current directory)
    #[arg(short = 'd', long)]
    out_dir: Option<PathBuf>,

    /// Also write a PNG swatch preview next to the stylesheet
    #[arg(long)]
    preview: bool,

    /// Print palette and contrast report as JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Format {
    Scss,
    Css,
}

impl From<Format> for StylesheetFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Scss => StylesheetFormat::Scss,
            Format::Css => StylesheetFormat::Css,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Generate(args) => generate(&args),
        Command::Contrast { palette, json } => contrast(&palette, json),
    }
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(args: &GenerateArgs) -> Result<ThemeConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => ThemeConfig::default(),
    };
    if let Some(n) = args.n_colors {
        config.extraction.n_colors = n;
    }
    if let Some(delta) = args.brightness_delta {
        config.palette.brightness_delta = delta;
    }
    if let Some(seed) = args.seed {
        config.extraction.seed = seed;
    }
    Ok(config)
}

fn generate(args: &GenerateArgs) -> Result<()> {
    let config = load_config(args)?;
    let format = StylesheetFormat::from(args.format);
    let out_dir = args.out_dir.clone().unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&out_dir)?;

    for input in &args.inputs {
        let img = load::open_image(input)?;
        let theme = build_theme(&img, &config)
            .with_context(|| format!("building theme for {}", input.display()))?;

        let stem = input.file_stem().unwrap_or_default().to_string_lossy();
        let sheet_path = out_dir.join(format!("{stem}.{}", format.extension()));
        fs::write(&sheet_path, stylesheet::render(&theme.palette, format))?;
        info!(path = %sheet_path.display(), "wrote stylesheet");
        eprintln!("Saved → {}", sheet_path.display());

        if args.preview {
            let png = preview::encode_png(&preview::render_swatches(&theme.palette))
                .context("encoding palette preview")?;
            let preview_path = out_dir.join(format!("{stem}-palette.png"));
            fs::write(&preview_path, png)?;
            eprintln!("Saved → {}", preview_path.display());
        }

        if args.json {
            let out = serde_json::json!({
                "input": input.display().to_string(),
                "palette": theme.palette,
                "contrast": theme.contrast,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        } else {
            println!("{}:", input.display());
            for (role, color) in theme.palette.entries() {
                println!("  {role:<14} {color}");
            }
            print_report(&theme.contrast);
        }
    }

    Ok(())
}

fn contrast(path: &Path, json: bool) -> Result<()> {
    let content =
        fs::read_to_string(path).with_context(|| format!("reading palette {}", path.display()))?;
    let palette: BTreeMap<String, HexColor> = serde_json::from_str(&content)
        .with_context(|| format!("parsing palette {}", path.display()))?;
    let report = analyze_contrast(&palette)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &ContrastReport) {
    println!("Contrast:");
    for entry in report.entries() {
        println!(
            "  {:<32} {:>6.2}  {}",
            entry.label(),
            entry.rounded_ratio(),
            entry.rating
        );
    }
}
