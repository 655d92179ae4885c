//! Turns the pixels of an image into a distribution of named tones

use crate::{
	Clusterer, ColorCounts, ColorDistance, ColorNamer, HexNamer, Kmeans, Metric, Palette, PaletteDistribution,
	PaletteNamer, PixelSource, Result, Tone, ToneCount,
};
use palette::Srgba;
use std::collections::HashMap;
use tracing::debug;

/// Analyses the colors of images against palettes, or discovers palettes for them.
///
/// The metric, clusterer, and namer are chosen at construction time with the `with_*` methods.
#[derive(Debug, Clone)]
pub struct Palettester<D = Metric, C = Kmeans, N = PaletteNamer> {
	/// Metric used to match colors to palette tones
	distance: D,
	/// Clusterer used to discover palettes
	clusterer: C,
	/// Namer for discovered palettes
	namer: N,
	/// Colors farther than this from every palette tone are left uncategorized
	max_match_distance: Option<f64>,
}

impl Palettester {
	/// Create a [`Palettester`] with the default metric, clusterer, and namer
	#[must_use]
	pub fn new() -> Self {
		Self {
			distance: Metric::default(),
			clusterer: Kmeans::default(),
			namer: PaletteNamer::default(),
			max_match_distance: None,
		}
	}
}

impl Default for Palettester {
	fn default() -> Self {
		Self::new()
	}
}

impl<D, C, N> Palettester<D, C, N>
where
	D: ColorDistance,
	C: Clusterer,
	N: ColorNamer,
{
	/// Use a different metric for matching colors to palette tones
	pub fn with_distance<E: ColorDistance>(self, distance: E) -> Palettester<E, C, N> {
		Palettester {
			distance,
			clusterer: self.clusterer,
			namer: self.namer,
			max_match_distance: self.max_match_distance,
		}
	}

	/// Use a different clusterer for discovering palettes
	pub fn with_clusterer<E: Clusterer>(self, clusterer: E) -> Palettester<D, E, N> {
		Palettester {
			distance: self.distance,
			clusterer,
			namer: self.namer,
			max_match_distance: self.max_match_distance,
		}
	}

	/// Use a different namer for discovered palettes
	pub fn with_namer<E: ColorNamer>(self, namer: E) -> Palettester<D, C, E> {
		Palettester {
			distance: self.distance,
			clusterer: self.clusterer,
			namer,
			max_match_distance: self.max_match_distance,
		}
	}

	/// Leave colors farther than `max_distance` from every palette tone uncategorized.
	///
	/// `None` (the default) matches every color to some tone.
	#[must_use]
	pub fn with_max_match_distance(mut self, max_distance: Option<f64>) -> Self {
		self.max_match_distance = max_distance;
		self
	}

	/// Count the distinct colors of an image
	pub fn count_colors(&self, image: &(impl PixelSource + ?Sized)) -> ColorCounts {
		let counts = ColorCounts::from_image(image);
		debug!(
			width = image.width(),
			height = image.height(),
			colors = counts.num_colors(),
			"counted colors"
		);
		counts
	}

	/// Attribute each pixel of an image to its closest tone in `palette`.
	///
	/// Tones without any pixels are left out.
	pub fn analyse_palette(&self, image: &(impl PixelSource + ?Sized), palette: &Palette) -> PaletteDistribution {
		self.analyse_palette_counts(&self.count_colors(image), palette)
	}

	/// Attribute each counted color to its closest tone in `palette`.
	///
	/// Entries are ordered by when their tone first matched a color.
	/// Uncategorized colors, if any, are put in a final entry.
	pub fn analyse_palette_counts(&self, counts: &ColorCounts, palette: &Palette) -> PaletteDistribution {
		if palette.is_empty() {
			return PaletteDistribution::default();
		}

		let nearest = nearest_tones(&self.distance, palette, counts.colors());

		let mut tone_counts = Vec::<ToneCount>::new();
		let mut index_of_tone = HashMap::<usize, usize>::new();
		let mut uncategorized = ToneCount::new(None, HashMap::new());

		for ((color, n), nearest) in counts.pairs().zip(nearest) {
			match nearest {
				Some((tone, dist)) if self.max_match_distance.map_or(true, |max| dist <= max) => {
					let i = *index_of_tone.entry(tone).or_insert_with(|| {
						tone_counts.push(ToneCount::new(Some(palette[tone].clone()), HashMap::new()));
						tone_counts.len() - 1
					});
					tone_counts[i].add(color, n);
				},
				_ => uncategorized.add(color, n),
			}
		}

		if uncategorized.count() > 0 {
			tone_counts.push(uncategorized);
		}

		debug!(tones = tone_counts.len(), palette = palette.len(), "analysed palette");

		PaletteDistribution::new(tone_counts)
	}

	/// Give each distinct color of an image its own entry, named by its `#rrggbb` code
	pub fn analyse_all_colors(&self, image: &(impl PixelSource + ?Sized)) -> PaletteDistribution {
		self.analyse_all_colors_counts(&self.count_colors(image))
	}

	/// Give each counted color its own entry, named by its `#rrggbb` code
	#[must_use]
	pub fn analyse_all_colors_counts(&self, counts: &ColorCounts) -> PaletteDistribution {
		counts
			.pairs()
			.map(|(color, n)| {
				let mut tc = ToneCount::new(Some(Tone::unnamed(color)), HashMap::new());
				tc.add(color, n);
				tc
			})
			.collect::<Vec<_>>()
			.into()
	}

	/// Find a palette of at most `max_colors` named tones for an image.
	///
	/// # Errors
	/// Returns any error from the clusterer.
	pub fn define_palette(&self, image: &(impl PixelSource + ?Sized), max_colors: usize) -> Result<Palette> {
		self.define_palette_counts(&self.count_colors(image), max_colors)
	}

	/// Find a palette of at most `max_colors` named tones for the counted colors.
	///
	/// If there are no more than `max_colors` distinct colors, each one becomes a tone named by its `#rrggbb` code.
	/// Otherwise, the colors are clustered and the cluster colors are named by the namer.
	///
	/// # Errors
	/// Returns any error from the clusterer.
	pub fn define_palette_counts(&self, counts: &ColorCounts, max_colors: usize) -> Result<Palette> {
		if counts.num_colors() <= max_colors {
			debug!(colors = counts.num_colors(), max_colors, "using every color as a tone");
			return Ok(HexNamer.name(counts.colors()).into());
		}

		let centroids = self.clusterer.cluster(counts, max_colors)?;
		Ok(self.namer.name(&centroids).into())
	}

	/// Find a palette for an image with [`Palettester::define_palette`], then analyse the image against it.
	///
	/// # Errors
	/// Returns any error from the clusterer.
	pub fn analyse_discovered(
		&self,
		image: &(impl PixelSource + ?Sized),
		max_colors: usize,
	) -> Result<PaletteDistribution> {
		let counts = self.count_colors(image);
		let palette = self.define_palette_counts(&counts, max_colors)?;
		Ok(self.analyse_palette_counts(&counts, &palette))
	}

	/// The metric used for matching colors to palette tones
	pub const fn distance(&self) -> &D {
		&self.distance
	}
}

/// Find the closest palette tone for each color
#[cfg(not(feature = "threads"))]
fn nearest_tones<D: ColorDistance>(distance: &D, palette: &Palette, colors: &[Srgba<u8>]) -> Vec<Option<(usize, f64)>> {
	colors.iter().map(|&color| palette.nearest(distance, color)).collect()
}

/// Find the closest palette tone for each color
#[cfg(feature = "threads")]
fn nearest_tones<D: ColorDistance>(distance: &D, palette: &Palette, colors: &[Srgba<u8>]) -> Vec<Option<(usize, f64)>> {
	use rayon::prelude::*;

	colors.par_iter().map(|&color| palette.nearest(distance, color)).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
	use super::*;
	use crate::{palettes, CompuPhase, Manhattan};
	use image::{Rgba, RgbaImage};

	const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
	const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

	fn srgba(Rgba([r, g, b, a]): Rgba<u8>) -> Srgba<u8> {
		Srgba::new(r, g, b, a)
	}

	/// 10x10, top three quarters red and bottom quarter blue (by pixel count)
	fn red_blue_image() -> RgbaImage {
		RgbaImage::from_fn(10, 10, |x, y| if y * 10 + x < 75 { RED } else { BLUE })
	}

	fn striped_image() -> RgbaImage {
		let stripes = [
			Rgba([250, 5, 5, 255]),
			Rgba([245, 10, 0, 255]),
			Rgba([5, 5, 250, 255]),
			Rgba([0, 10, 245, 255]),
			Rgba([250, 250, 250, 255]),
			Rgba([245, 245, 255, 255]),
		];
		RgbaImage::from_fn(12, 4, |x, _| stripes[(x / 2) as usize])
	}

	#[test]
	fn single_color_against_palette() {
		let image = RgbaImage::from_pixel(8, 5, RED);
		let distribution = Palettester::new().analyse_palette(&image, &palettes::standard());

		assert_eq!(distribution.len(), 1);
		let tc = &distribution.tone_counts()[0];
		assert_eq!(tc.name(), "Red");
		assert_eq!(tc.count(), 40);
		assert_eq!(tc.pixel_counts().len(), 1);
		assert_eq!(tc.count_of(srgba(RED)), 40);
	}

	#[test]
	fn all_colors_of_two_regions() {
		let distribution = Palettester::new().analyse_all_colors(&red_blue_image());

		assert_eq!(distribution.to_string(), "[#ff0000: 75, #0000ff: 25]");
		for tc in &distribution {
			assert_eq!(tc.pixel_counts().len(), 1);
		}
		assert_eq!(distribution.total(), 100);
		assert_eq!(distribution.by_name("#0000ff").unwrap().count(), 25);
	}

	#[test]
	fn palette_matches_group_similar_colors() {
		let distribution = Palettester::new().analyse_palette(&striped_image(), &palettes::standard());

		assert_eq!(distribution.to_string(), "[Red: 16, Blue: 16, White: 16]");
		let red = distribution.by_name("Red").unwrap();
		assert_eq!(red.pixel_counts().len(), 2);
		assert_eq!(red.count_of(Srgba::new(245, 10, 0, 255)), 8);
	}

	#[test]
	fn unmatched_tones_are_omitted() {
		let palette = Palette::new(vec![
			Tone::from_rgba("Green", 0, 255, 0, 255),
			Tone::from_rgba("Blue", 0, 0, 255, 255),
			Tone::from_rgba("Red", 255, 0, 0, 255),
		]);
		let distribution = Palettester::new().analyse_palette(&red_blue_image(), &palette);

		// Red is discovered first even though Blue comes first in the palette
		assert_eq!(distribution.to_string(), "[Red: 75, Blue: 25]");
		assert!(distribution.by_name("Green").is_none());
	}

	#[test]
	fn empty_palette_gives_empty_distribution() {
		let distribution = Palettester::new().analyse_palette(&red_blue_image(), &Palette::default());
		assert!(distribution.is_empty());
	}

	#[test]
	fn far_colors_can_be_uncategorized() {
		let palette = Palette::new(vec![Tone::from_rgba("Red", 255, 0, 0, 255)]);
		let palettester = Palettester::new().with_max_match_distance(Some(100.0));
		let distribution = palettester.analyse_palette(&red_blue_image(), &palette);

		assert_eq!(distribution.to_string(), "[Red: 75, uncategorized: 25]");
		assert_eq!(distribution.uncategorized().unwrap().count_of(srgba(BLUE)), 25);
	}

	#[test]
	fn metric_changes_matches() {
		let counts = ColorCounts::from_pixels(&[Srgba::new(0, 0, 0, 255)]);
		let palette = Palette::new(vec![
			Tone::from_rgba("One channel", 90, 0, 0, 255),
			Tone::from_rgba("All channels", 40, 40, 40, 255),
		]);

		// 90 < 120 by Manhattan, but 90 > 69.3 by Euclidean
		let manhattan = Palettester::new().with_distance(Manhattan).analyse_palette_counts(&counts, &palette);
		let euclidean = Palettester::new().analyse_palette_counts(&counts, &palette);
		assert_eq!(manhattan.tone_counts()[0].name(), "One channel");
		assert_eq!(euclidean.tone_counts()[0].name(), "All channels");

		let compuphase = Palettester::new().with_distance(CompuPhase).analyse_palette_counts(&counts, &palette);
		assert_eq!(compuphase.tone_counts()[0].name(), "All channels");
	}

	#[test]
	fn few_colors_define_themselves() {
		let palette = Palettester::new().define_palette(&red_blue_image(), 2).unwrap();
		let names = palette.iter().map(Tone::name).collect::<Vec<_>>();
		assert_eq!(names, ["#ff0000", "#0000ff"]);
	}

	#[test]
	fn clustered_palette_is_named() {
		let palette = Palettester::new().define_palette(&striped_image(), 3).unwrap();
		assert_eq!(palette.len(), 3);

		let mut names = palette.iter().map(Tone::name).collect::<Vec<_>>();
		names.sort_unstable();
		assert_eq!(names, ["Blue", "Red", "White"]);
	}

	#[test]
	fn clustered_names_collide() {
		let palette = Palettester::new()
			.with_namer(PaletteNamer::new(palettes::greyscale()).with_max_distance(500.0))
			.define_palette(&striped_image(), 3)
			.unwrap();

		let mut names = palette.iter().map(Tone::name).collect::<Vec<_>>();
		names.sort_unstable();
		assert_eq!(names[2], "White");
		assert!(names[0].starts_with("Grey"));
		assert_eq!(names[1], format!("{}2", names[0]));
	}

	#[test]
	fn single_cluster_is_the_mean_color() {
		let palette = Palettester::new()
			.with_namer(HexNamer)
			.define_palette(&red_blue_image(), 1)
			.unwrap();

		// Red 191.25 and blue 63.75 round to 191 and 64
		assert_eq!(palette.tones(), &[Tone::from_rgba("any", 191, 0, 64, 255)]);
		assert_eq!(palette[0].name(), "#bf0040");
	}

	#[test]
	fn empty_image() {
		let image = RgbaImage::new(0, 0);
		let palettester = Palettester::new();
		assert!(palettester.analyse_all_colors(&image).is_empty());
		assert!(palettester.analyse_palette(&image, &palettes::standard()).is_empty());
		assert!(palettester.define_palette(&image, 4).unwrap().is_empty());
	}

	#[test]
	fn discovered_distribution_covers_every_pixel() {
		let image = striped_image();
		let distribution = Palettester::new().analyse_discovered(&image, 3).unwrap();
		assert_eq!(distribution.len(), 3);
		assert_eq!(distribution.total(), 48);
		for tc in &distribution {
			assert_eq!(tc.count(), 16);
		}
	}

	#[test]
	fn works_with_dynamic_images() {
		let image = image::DynamicImage::ImageRgba8(red_blue_image());
		let distribution = Palettester::new().analyse_all_colors(&image);
		assert_eq!(distribution.by_count()[0].count(), 75);
	}
}
