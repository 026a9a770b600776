//! # imgdither - palette dithering command-line tool
//!
//! Two subcommands:
//! - `dither`: reduces a BMP image to a fixed palette, optionally dithering.
//! - `palette`: emits one of the two static palettes this crate builds
//!   (black-and-white, or an N-step grayscale ramp); no clustering.
//!
//! ## Usage Examples
//! ```sh
//! imgdither dither -i input.bmp -p palette.json -o output.bmp -m floyd
//! imgdither palette bw -o palette.json
//! imgdither palette grayscale -n 16 -o palette.json
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use imgdither::colourspace::Colourspace;
use imgdither::dither::{dither, DitherConfig, DitherType};
use imgdither::palette::Palette;

/// Prints the message only if `verbose` is set.
macro_rules! vprintln {
    ($verbose:expr, $($arg:tt)*) => {
        if $verbose {
            println!($($arg)*);
        }
    };
}

#[derive(Debug, Parser)]
#[command(version, about = "Palette dithering tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    mode: Mode,

    /// Print progress information to stdout.
    #[arg(short = 'v', long = "verbose", default_value_t = false)]
    verbose: bool,
}

#[derive(Debug, Subcommand)]
enum Mode {
    /// Dither an image against a fixed palette.
    Dither(DitherArgs),
    /// Generate a static palette file.
    Palette(PaletteCmd),
}

#[derive(Debug, Args)]
struct PaletteCmd {
    #[command(subcommand)]
    action: PaletteArgs,
}

#[derive(Debug, Args)]
struct DitherArgs {
    /// Input BMP image path.
    #[arg(short = 'i', long = "input", value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Output BMP image path.
    #[arg(short = 'o', long = "output", value_name = "OUTPUT_PATH")]
    output_path: PathBuf,

    /// Palette JSON path.
    #[arg(short = 'p', long = "palette", value_name = "PALETTE_PATH")]
    palette_path: PathBuf,

    /// Dither mode: none, checker, ord2, ord4, ord8, ord16, ord32, ord64, floyd, atkinson.
    #[arg(short = 'm', long = "mode", default_value = "floyd")]
    mode: String,

    /// Dither level; defaults to the mode's own default when omitted.
    #[arg(short = 'l', long = "level")]
    level: Option<f32>,

    /// Working colourspace: srgb, rgb-linear, ycbcr, ycocg, cielab, ictcp, oklab, rgb-psy, ycbcr-psy, ycocg-psy.
    #[arg(short = 'c', long = "colourspace", default_value = "ycbcr-psy")]
    colourspace: String,

    /// Treat source and palette alpha as already premultiplied.
    #[arg(long = "premultiplied", default_value_t = false)]
    premultiplied: bool,

    /// Write an 8-bit palette-indexed BMP instead of 32-bit BGRA.
    #[arg(long = "indexed", default_value_t = false)]
    indexed: bool,
}

#[derive(Debug, Subcommand)]
enum PaletteArgs {
    /// Black-and-white, two-entry palette.
    Bw {
        #[arg(short = 'o', long = "output", value_name = "OUTPUT_PATH")]
        output_path: PathBuf,
    },
    /// Evenly spaced grayscale ramp.
    Grayscale {
        #[arg(short = 'n', long = "count", value_name = "COUNT")]
        count: usize,
        #[arg(short = 'o', long = "output", value_name = "OUTPUT_PATH")]
        output_path: PathBuf,
    },
}

fn main() {
    if cfg!(feature = "logging") {
        env_logger::init();
    }

    let cli_args = Cli::parse();
    log::debug!("Got args: '{:?}'.", cli_args);

    if let Err(e) = run(cli_args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli_args: Cli) -> anyhow::Result<()> {
    match cli_args.mode {
        Mode::Dither(args) => run_dither(cli_args.verbose, args),
        Mode::Palette(cmd) => run_palette(cli_args.verbose, cmd.action),
    }
}

fn run_dither(verbose: bool, args: DitherArgs) -> anyhow::Result<()> {
    vprintln!(verbose, "Loading image '{:?}' ...", args.input_path);
    let image = imgdither::bmp::load(&args.input_path).context("failed to load input BMP")?;
    vprintln!(verbose, "Loaded {}x{} image.", image.width, image.height);

    let palette = Palette::load_from_json(&args.palette_path).context("failed to load palette")?;
    vprintln!(verbose, "Loaded palette with {} colours.", palette.len());

    let dither_type = DitherType::parse(&args.mode)
        .with_context(|| format!("unknown dither mode '{}'", args.mode))?;
    let colourspace = Colourspace::parse(&args.colourspace)
        .with_context(|| format!("unknown colourspace '{}'", args.colourspace))?;
    let dither_level = args.level.unwrap_or_else(|| dither_type.default_level());

    let config = DitherConfig {
        dither_type,
        dither_level,
        colourspace,
        premultiplied_alpha: args.premultiplied,
    };

    let mut out_indices = vec![0u8; image.width * image.height];
    let report = dither(&mut out_indices, &image.rgba, image.width, image.height, &palette, config)
        .context("dithering failed")?;

    if report.diffusion_degraded {
        log::warn!("diffusion buffer allocation failed; fell back to no dithering");
        eprintln!("warning: diffusion buffer allocation failed, output is undithered");
    }

    if args.indexed {
        imgdither::bmp::save_indexed(&args.output_path, image.width, image.height, &out_indices, palette.entries())
            .context("failed to save indexed BMP")?;
    } else {
        let rgba: Vec<u8> = out_indices
            .iter()
            .flat_map(|&idx| palette.entries()[idx as usize])
            .collect();
        imgdither::bmp::save_rgba(&args.output_path, image.width, image.height, &rgba)
            .context("failed to save BMP")?;
    }

    vprintln!(verbose, "Saved to {:?}.", args.output_path);
    Ok(())
}

fn run_palette(verbose: bool, args: PaletteArgs) -> anyhow::Result<()> {
    let (palette, output_path) = match args {
        PaletteArgs::Bw { output_path } => (Palette::black_and_white(), output_path),
        PaletteArgs::Grayscale { count, output_path } => {
            (Palette::grayscale(count).context("invalid grayscale count")?, output_path)
        }
    };

    palette.save_to_json(&output_path).context("failed to save palette")?;
    vprintln!(verbose, "Saved {}-colour palette to {:?}.", palette.len(), output_path);
    Ok(())
}
