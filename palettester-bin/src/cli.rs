//! Specifies the CLI and handles arg parsing

use clap::{Parser, ValueEnum};
use palettester::Tone;
use std::{
	fmt::{Debug, Display},
	num::ParseFloatError,
	ops::RangeBounds,
	path::PathBuf,
	str::FromStr,
};

/// What to compute for the image
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Mode {
	/// Every distinct color with its pixel count
	All,
	/// Pixel counts for the closest tone of a given palette
	Palette,
	/// Discover a named palette with k-means, then count the pixels for each of its tones
	Discover,
}

/// Color difference metrics
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum MetricArg {
	/// Euclidean distance over red, green, blue, and alpha
	Euclidean,
	/// Sum of absolute channel differences
	Manhattan,
	/// Euclidean distance with per channel weights (see --weights)
	Weighted,
	/// Redmean weighted distance from compuphase.com
	Compuphase,
}

/// Built-in reference palettes
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReferencePalette {
	/// The 16 basic HTML colors plus orange, brown, and pink
	Standard,
	/// Black, white, six greys, and transparent
	Greyscale,
}

/// Handling of k-means centers that lose all their colors
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum EmptyClusters {
	/// Keep the center where it was
	Retain,
	/// Move the center to the color farthest from its current center
	Farthest,
}

/// Supported output formats for the final tones
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum FormatOutput {
	/// One line per tone with its name, pixel count, and share of the image
	Text,
	/// sRGB hexcode
	Hex,
	/// sRGB (r,g,b) triple
	Rgb,
	/// Whitespace with true color background
	Swatch,
}

/// Sort orders for the final tones
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum SortOutput {
	/// Descending number of pixels
	N,
	/// The order in which tones were first matched
	#[value(name = "none")]
	Discovery,
}

/// Ways to colorize the output text
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorizeOutput {
	/// Foreground
	Fg,
	/// Background
	Bg,
}

/// Analyse the colors of an image.
///
/// Counts how many pixels belong to each tone of a palette,
/// where the palette is either given or discovered from the image with k-means clustering.
#[derive(Parser, Debug)]
#[command(version)]
pub struct Options {
	/// The path to the input image
	pub image: PathBuf,

	/// What to compute for the image
	#[arg(short, long, default_value = "discover")]
	pub mode: Mode,

	/// The (maximum) number of tones to discover
	#[arg(short, default_value_t = 8)]
	pub k: usize,

	/// The metric used to compare colors
	///
	/// The same metric is used for k-means and for matching colors to tones.
	#[arg(long, default_value = "euclidean")]
	pub metric: MetricArg,

	/// A comma separated list of red, green, blue, and alpha weights for the weighted metric
	///
	/// Defaults to 2,4,3,1.
	#[arg(short, long, value_delimiter = ',', value_parser = parse_valid_weight)]
	pub weights: Vec<f64>,

	/// Leave pixels farther than this distance from every tone uncategorized
	///
	/// The scale depends on the metric. By default, every pixel is matched to some tone.
	#[arg(short = 'd', long, value_parser = parse_valid_distance)]
	pub max_distance: Option<f64>,

	/// The largest distance at which a discovered tone borrows a name from the reference palette
	///
	/// Discovered tones farther away are named by their hex code.
	/// This is always measured with the compuphase metric.
	#[arg(long, default_value_t = 75.0, value_parser = parse_valid_distance)]
	pub name_distance: f64,

	/// The palette to match against in palette mode, and to borrow names from in discover mode
	#[arg(long, default_value = "standard")]
	pub reference: ReferencePalette,

	/// A named tone to use instead of the reference palette in palette mode, given as Name=#rrggbb
	///
	/// May be given multiple times.
	#[arg(short, long, value_parser = parse_tone)]
	pub tone: Vec<Tone>,

	/// The maximum number of k-means iterations
	#[arg(short = 'i', long, default_value_t = 100)]
	pub max_iter: u32,

	/// The seed value used for choosing the starting k-means centers
	#[arg(long, default_value_t = 0)]
	pub seed: u64,

	/// How to handle k-means centers that lose all their colors
	#[arg(long, default_value = "retain")]
	pub empty_clusters: EmptyClusters,

	/// The order to print the tones in
	#[arg(short, long, default_value = "n")]
	pub sort: SortOutput,

	/// Reverse the printed order of the tones
	#[arg(short, long)]
	pub reverse: bool,

	/// The format to print the tones in
	#[arg(short, long, default_value = "text")]
	pub output: FormatOutput,

	/// Color the foreground or background for each printed tone
	#[arg(short, long)]
	pub colorize: Option<ColorizeOutput>,

	/// Print additional information, such as the running time of each step
	///
	/// The RUST_LOG environment variable takes precedence over this option.
	#[arg(long)]
	pub verbose: bool,
}

/// Parse a float value and ensure it in the provided, valid range
fn parse_float_in_range<T>(s: &str, range: impl RangeBounds<T> + Debug) -> Result<T, String>
where
	T: FromStr<Err = ParseFloatError> + Display + PartialOrd,
{
	let value: T = s.parse().map_err(|e| format!("{e}"))?;
	if range.contains(&value) {
		Ok(value)
	} else {
		Err(format!("{value} is not in {range:?}"))
	}
}

/// Parse a channel weight and ensure it is >= `0.0`
fn parse_valid_weight(s: &str) -> Result<f64, String> {
	parse_float_in_range(s, 0.0..)
}

/// Parse a distance threshold and ensure it is >= `0.0`
fn parse_valid_distance(s: &str) -> Result<f64, String> {
	parse_float_in_range(s, 0.0..)
}

/// Parse a `Name=#rrggbb` tone
fn parse_tone(s: &str) -> Result<Tone, String> {
	Tone::parse_named(s).map_err(|e| e.to_string())
}
