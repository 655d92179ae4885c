//! Print the color distribution of an image, or discover and print a named palette for it.

#![deny(unsafe_code, unsafe_op_in_unsafe_fn)]
#![warn(
    clippy::pedantic,
    clippy::cargo,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used,
    clippy::unwrap_in_result,
    clippy::unneeded_field_pattern,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::unnecessary_self_imports,
    clippy::str_to_string,
    clippy::string_to_string,
    clippy::string_slice,
    missing_docs,
    clippy::missing_docs_in_private_items,
    rustdoc::all,
    clippy::float_cmp_const,
    clippy::lossy_float_literal
)]
#![allow(
    clippy::doc_markdown,
    clippy::module_name_repetitions,
    clippy::missing_panics_doc,
    clippy::unreadable_literal
)]

mod cli;

#[allow(clippy::wildcard_imports)]
use cli::*;

use std::{path::Path, process::ExitCode, time::Instant};

use clap::Parser;
use colored::Colorize;
use image::{DynamicImage, RgbaImage};
use palette::Srgba;
use palettester::{
    palettes, ColorCounts, EmptyClusterPolicy, Kmeans, Metric, Palette, PaletteDistribution,
    PaletteNamer, Palettester, ToneCount, WeightedEuclidean,
};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Record the running time of a function and log the elapsed time
macro_rules! time {
    ($name: literal, $func_call: expr) => {{
        let start = Instant::now();
        let result = $func_call;
        info!("{} took {}ms", $name, start.elapsed().as_millis());
        result
    }};
}

/// Error cases for loading an image and running the analysis
#[derive(Debug, Error)]
enum CliError {
    /// Failed to read or decode the image file
    #[error("Failed to load the image file: {0}")]
    ImageLoad(#[from] image::ImageError),
    /// The weighted metric was given the wrong number of weights
    #[error("Expected 4 comma separated weights for red, green, blue, and alpha, but got {0}")]
    WeightCount(usize),
    /// An option or the analysis itself was rejected by the library
    #[error("{0}")]
    Analysis(#[from] palettester::Error),
}

/// The concrete analysis type configured by the CLI
type Analyser = Palettester<Metric, Kmeans<Metric>, PaletteNamer<Metric>>;

fn main() -> ExitCode {
    let options = Options::parse();

    init_logging(options.verbose);

    let result = analyse_and_print(&options);

    // Returning Result<_> uses Debug printing instead of Display
    if let Err(e) = result {
        eprintln!("{e}");
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Log to stderr, filtered by `RUST_LOG` or else by `--verbose`
fn init_logging(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Load an image, analyse it, and print the result using the given options
fn analyse_and_print(options: &Options) -> Result<(), CliError> {
    // Input
    let image = time!("Image loading", load_image(&options.image))?;
    let image = image.into_rgba8();

    // Processing
    let distribution = {
        let start = Instant::now();
        let result = analyse(&image, options);
        info!("Analysis took {}ms in total", start.elapsed().as_millis());
        result?
    };

    // Output
    let tone_counts = sorted_tone_counts(&distribution, options);
    print_tone_counts(&tone_counts, distribution.total(), options);

    Ok(())
}

/// Load the image at the given path
fn load_image(path: &Path) -> Result<DynamicImage, CliError> {
    Ok(image::open(path)?)
}

/// The metric selected by the options
fn metric(options: &Options) -> Result<Metric, CliError> {
    Ok(match options.metric {
        MetricArg::Euclidean => Metric::Euclidean,
        MetricArg::Manhattan => Metric::Manhattan,
        MetricArg::Compuphase => Metric::CompuPhase,
        MetricArg::Weighted => match *options.weights.as_slice() {
            [] => Metric::Weighted(WeightedEuclidean::default()),
            [r, g, b, a] => Metric::Weighted(WeightedEuclidean::new([r, g, b, a])?),
            ref weights => return Err(CliError::WeightCount(weights.len())),
        },
    })
}

/// The built-in palette selected by the options
fn reference_palette(options: &Options) -> Palette {
    match options.reference {
        ReferencePalette::Standard => palettes::standard(),
        ReferencePalette::Greyscale => palettes::greyscale(),
    }
}

/// The palette to match against in palette mode
fn target_palette(options: &Options) -> Palette {
    if options.tone.is_empty() {
        reference_palette(options)
    } else {
        options.tone.iter().cloned().collect()
    }
}

/// Configure the analysis from the options
fn analyser(options: &Options) -> Result<Analyser, CliError> {
    let metric = metric(options)?;

    let empty_clusters = match options.empty_clusters {
        EmptyClusters::Retain => EmptyClusterPolicy::Retain,
        EmptyClusters::Farthest => EmptyClusterPolicy::Farthest,
    };

    let kmeans = Kmeans::new(metric)
        .with_max_iter(options.max_iter)
        .with_seed(options.seed)
        .with_empty_cluster_policy(empty_clusters);

    let namer = PaletteNamer::new(reference_palette(options)).with_max_distance(options.name_distance);

    Ok(Palettester::new()
        .with_distance(metric)
        .with_clusterer(kmeans)
        .with_namer(namer)
        .with_max_match_distance(options.max_distance))
}

/// Compute the distribution requested by the options
fn analyse(image: &RgbaImage, options: &Options) -> Result<PaletteDistribution, CliError> {
    let palettester = analyser(options)?;

    let counts = time!("Counting colors", palettester.count_colors(image));
    info!("Reduced image to {} distinct colors", counts.num_colors());

    analyse_counts(&palettester, &counts, options)
}

/// Compute the distribution requested by the options for already counted colors
fn analyse_counts(
    palettester: &Analyser,
    counts: &ColorCounts,
    options: &Options,
) -> Result<PaletteDistribution, CliError> {
    Ok(match options.mode {
        Mode::All => palettester.analyse_all_colors_counts(counts),
        Mode::Palette => palettester.analyse_palette_counts(counts, &target_palette(options)),
        Mode::Discover => {
            let palette = time!(
                "Palette discovery",
                palettester.define_palette_counts(counts, options.k)
            )?;
            info!("Discovered palette {palette}");
            palettester.analyse_palette_counts(counts, &palette)
        }
    })
}

/// Order the tone counts by the given sort option
fn sorted_tone_counts(distribution: &PaletteDistribution, options: &Options) -> Vec<ToneCount> {
    let mut tone_counts = match options.sort {
        SortOutput::N => distribution.by_count(),
        SortOutput::Discovery => distribution.tone_counts().to_vec(),
    };

    if options.reverse {
        tone_counts.reverse();
    }

    tone_counts
}

/// The percentage of `total` made up by `count`
fn percentage(count: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        // Only inaccurate for pixel counts in the quadrillions
        #[allow(clippy::cast_precision_loss)]
        {
            100.0 * count as f64 / total as f64
        }
    }
}

/// Format one line of text output
fn text_line(tone_count: &ToneCount, total: u64) -> String {
    let count = tone_count.count();
    format!(
        "{}: {} ({:.1}%)",
        tone_count.name(),
        count,
        percentage(count, total)
    )
}

/// Print the given tone counts based off the provided options
fn print_tone_counts(tone_counts: &[ToneCount], total: u64, options: &Options) {
    match options.output {
        FormatOutput::Text => {
            for tone_count in tone_counts {
                let line = text_line(tone_count, total);
                match tone_count.tone() {
                    Some(tone) => println!("{}", colorize(&line, tone.color(), options.colorize)),
                    None => println!("{line}"),
                }
            }
        }

        FormatOutput::Hex => color_format_print(tone_counts, options, |color| {
            palettester::tone::hex_code(color)
        }),

        FormatOutput::Rgb => color_format_print(tone_counts, options, |color| {
            format!("({},{},{})", color.red, color.green, color.blue)
        }),

        FormatOutput::Swatch => print_colors(tone_counts, "", |color| {
            "   "
                .on_truecolor(color.red, color.green, color.blue)
                .to_string()
        }),
    }
}

/// Apply the colorize option to some text
fn colorize(text: &str, color: Srgba<u8>, colorize: Option<ColorizeOutput>) -> String {
    match colorize {
        Some(ColorizeOutput::Fg) => text.truecolor(color.red, color.green, color.blue).to_string(),
        Some(ColorizeOutput::Bg) => text
            .on_truecolor(color.red, color.green, color.blue)
            .to_string(),
        None => text.to_owned(),
    }
}

/// Print a line of colors using the given format, skipping uncategorized pixels
fn print_colors(tone_counts: &[ToneCount], delimiter: &str, format: impl Fn(Srgba<u8>) -> String) {
    println!(
        "{}",
        tone_counts
            .iter()
            .filter_map(ToneCount::tone)
            .map(|tone| format(tone.color()))
            .collect::<Vec<_>>()
            .join(delimiter)
    );
}

/// Format, colorize, and then print the text for all colors
fn color_format_print(
    tone_counts: &[ToneCount],
    options: &Options,
    format: impl Fn(Srgba<u8>) -> String,
) {
    print_colors(tone_counts, " ", |color| {
        colorize(&format(color), color, options.colorize)
    });
}
