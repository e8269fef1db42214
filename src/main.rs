//! asciigram CLI - Convert images to ASCII art, as text or as a rendered PNG

use asciigram::{AsciiError, Converter, PipelineConfig, Preset, Ramp, Rendition};
use clap::Parser;
use rayon::prelude::*;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "asciigram", about = "Convert images to ASCII art")]
struct Args {
    /// Input image files
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
    /// Built-in rendition: monospace, chunked, edges or simple
    #[arg(short, long, default_value = "monospace")]
    preset: String,
    /// JSON pipeline config, replaces the preset
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Output width in characters
    #[arg(short, long)]
    width: Option<u32>,
    /// Character ramp, darkest first
    #[arg(short, long)]
    ramp: Option<String>,
    /// Font file for PNG output
    #[arg(short, long)]
    font: Option<PathBuf>,
    /// Directory for PNG output (defaults to next to each input)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let converter = match build_converter(&args) {
        Ok(converter) => converter,
        Err(e) => {
            eprintln!("asciigram: {e}");
            std::process::exit(2);
        }
    };

    // convert in parallel, report in input order
    let results: Vec<Result<Option<String>, AsciiError>> = args
        .inputs
        .par_iter()
        .map(|input| process(&converter, input, args.output_dir.as_deref()))
        .collect();

    let failures = match report(&args.inputs, results, &mut std::io::stdout().lock()) {
        Ok(failures) => failures,
        Err(e) => {
            eprintln!("asciigram: {e}");
            std::process::exit(2);
        }
    };
    if failures > 0 {
        std::process::exit(1);
    }
}

/// Print text results in input order, headed by their path when there are
/// several inputs. Returns the number of failed conversions.
fn report(
    inputs: &[PathBuf],
    results: Vec<Result<Option<String>, AsciiError>>,
    out: &mut impl Write,
) -> std::io::Result<usize> {
    let headers = inputs.len() > 1;
    let mut failures = 0;
    for (input, result) in inputs.iter().zip(results) {
        match result {
            Ok(Some(text)) => {
                if headers {
                    writeln!(out, "==> {} <==", input.display())?;
                }
                write!(out, "{text}")?;
            }
            Ok(None) => {}
            Err(e) => {
                log::error!("{}: {e}", input.display());
                eprintln!("asciigram: could not convert {}: {e}", input.display());
                failures += 1;
            }
        }
    }
    Ok(failures)
}

fn build_converter(args: &Args) -> Result<Converter, AsciiError> {
    let config = match &args.config {
        Some(path) => PipelineConfig::load(path)?,
        None => args.preset.parse::<Preset>()?.config(),
    };
    let mut converter = Converter::new(config)?;
    if let Some(width) = args.width {
        converter = converter.with_width(width);
    }
    if let Some(ramp) = &args.ramp {
        converter = converter.with_ramp(Ramp::new(ramp)?);
    }
    if let Some(font) = &args.font {
        converter = converter.with_font(font);
    }
    log::info!("converting {} file(s) at width {}", args.inputs.len(), converter.config().width);
    Ok(converter)
}

/// Text renditions are returned for printing; PNGs are written next to the input.
fn process(
    converter: &Converter,
    input: &Path,
    output_dir: Option<&Path>,
) -> Result<Option<String>, AsciiError> {
    log::info!("processing {}", input.display());
    let bytes = std::fs::read(input)?;

    match converter.convert_bytes(&bytes)? {
        Rendition::Text(messages) => {
            let mut out = String::new();
            for message in messages {
                out.push_str(&message);
                out.push('\n');
            }
            Ok(Some(out))
        }
        Rendition::Png(png) => {
            let path = png_path(input, output_dir);
            std::fs::write(&path, png)?;
            log::info!("wrote {}", path.display());
            Ok(None)
        }
    }
}

fn png_path(input: &Path, output_dir: Option<&Path>) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    let dir = output_dir
        .map(Path::to_path_buf)
        .or_else(|| input.parent().map(Path::to_path_buf))
        .unwrap_or_default();
    dir.join(format!("{stem}.ascii.png"))
}
