//! Counting the distinct colors of an image

use crate::tone::argb;
use image::{GenericImageView, Rgba};
use palette::Srgba;
use std::collections::HashMap;

/// A decoded image that can be read pixel by pixel
pub trait PixelSource {
	/// Width in pixels
	fn width(&self) -> u32;

	/// Height in pixels
	fn height(&self) -> u32;

	/// The 8-bit RGBA color of the pixel at `(x, y)`
	fn pixel(&self, x: u32, y: u32) -> Srgba<u8>;
}

impl<I> PixelSource for I
where
	I: GenericImageView<Pixel = Rgba<u8>>,
{
	fn width(&self) -> u32 {
		GenericImageView::width(self)
	}

	fn height(&self) -> u32 {
		GenericImageView::height(self)
	}

	fn pixel(&self, x: u32, y: u32) -> Srgba<u8> {
		let Rgba([r, g, b, a]) = self.get_pixel(x, y);
		Srgba::new(r, g, b, a)
	}
}

/// Distinct colors and the number of pixels with each color.
///
/// Colors are kept in the order they first appear.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorCounts {
	/// Distinct colors
	pub(crate) colors: Vec<Srgba<u8>>,
	/// The number of pixels for each color
	pub(crate) counts: Vec<u64>,
}

impl ColorCounts {
	/// Count the distinct colors in a slice of pixels
	#[must_use]
	pub fn from_pixels(pixels: &[Srgba<u8>]) -> Self {
		let mut builder = CountBuilder::default();
		for &pixel in pixels {
			builder.add(pixel, 1);
		}
		builder.finish()
	}

	/// Count the distinct colors of an image, scanning rows top to bottom
	#[must_use]
	pub fn from_image(image: &(impl PixelSource + ?Sized)) -> Self {
		let mut builder = CountBuilder::default();
		for y in 0..image.height() {
			for x in 0..image.width() {
				builder.add(image.pixel(x, y), 1);
			}
		}
		builder.finish()
	}

	/// Build from `(color, count)` pairs, merging duplicate colors and dropping zero counts
	#[must_use]
	pub fn from_pairs(pairs: impl IntoIterator<Item = (Srgba<u8>, u64)>) -> Self {
		let mut builder = CountBuilder::default();
		for (color, n) in pairs {
			if n > 0 {
				builder.add(color, n);
			}
		}
		builder.finish()
	}

	/// The distinct colors
	#[must_use]
	pub fn colors(&self) -> &[Srgba<u8>] {
		&self.colors
	}

	/// The number of pixels for each color in [`ColorCounts::colors`]
	#[must_use]
	pub fn counts(&self) -> &[u64] {
		&self.counts
	}

	/// Iterate over `(color, count)` pairs
	pub fn pairs(&self) -> impl ExactSizeIterator<Item = (Srgba<u8>, u64)> + '_ {
		self.colors.iter().copied().zip(self.counts.iter().copied())
	}

	/// The number of distinct colors
	#[must_use]
	pub fn num_colors(&self) -> usize {
		self.colors.len()
	}

	/// Whether there are no colors
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.colors.is_empty()
	}

	/// The total number of pixels
	#[must_use]
	pub fn total(&self) -> u64 {
		self.counts.iter().sum()
	}

	/// The number of pixels with the given color
	#[must_use]
	pub fn count_of(&self, color: Srgba<u8>) -> u64 {
		let key = argb(color);
		self.pairs().find(|&(c, _)| argb(c) == key).map_or(0, |(_, n)| n)
	}
}

/// Merges colors by their packed value while remembering first appearance order
#[derive(Default)]
struct CountBuilder {
	/// The counts being built
	data: ColorCounts,
	/// Packed color -> data index
	memo: HashMap<u32, usize>,
}

impl CountBuilder {
	/// Add `n` pixels of `color`
	fn add(&mut self, color: Srgba<u8>, n: u64) {
		let data = &mut self.data;
		let index = *self.memo.entry(argb(color)).or_insert_with(|| {
			data.colors.push(color);
			data.counts.push(0);
			data.colors.len() - 1
		});

		self.data.counts[index] += n;
	}

	/// Finish counting
	fn finish(self) -> ColorCounts {
		self.data
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use image::RgbaImage;

	#[test]
	fn counts_in_first_appearance_order() {
		let red = Srgba::new(255, 0, 0, 255);
		let blue = Srgba::new(0, 0, 255, 255);
		let counts = ColorCounts::from_pixels(&[blue, red, blue, blue, red]);

		assert_eq!(counts.colors(), &[blue, red]);
		assert_eq!(counts.counts(), &[3, 2]);
		assert_eq!(counts.total(), 5);
		assert_eq!(counts.count_of(red), 2);
		assert_eq!(counts.count_of(Srgba::new(0, 0, 0, 0)), 0);
	}

	#[test]
	fn alpha_distinguishes_colors() {
		let counts = ColorCounts::from_pixels(&[Srgba::new(1, 2, 3, 255), Srgba::new(1, 2, 3, 0)]);
		assert_eq!(counts.num_colors(), 2);
	}

	#[test]
	fn image_scanned_row_major() {
		let image = RgbaImage::from_fn(4, 3, |x, y| match (x, y) {
			(3, 0) => Rgba([0, 0, 255, 255]),
			(_, 2) => Rgba([0, 255, 0, 255]),
			_ => Rgba([255, 0, 0, 255]),
		});

		let counts = ColorCounts::from_image(&image);
		assert_eq!(
			counts.colors(),
			&[Srgba::new(255, 0, 0, 255), Srgba::new(0, 0, 255, 255), Srgba::new(0, 255, 0, 255)]
		);
		assert_eq!(counts.counts(), &[7, 1, 4]);
		assert_eq!(counts.total(), 12);
	}

	#[test]
	fn from_pairs_merges_duplicates() {
		let a = Srgba::new(9, 9, 9, 9);
		let b = Srgba::new(8, 8, 8, 8);
		let counts = ColorCounts::from_pairs([(a, 2), (b, 0), (a, 3)]);
		assert_eq!(counts.colors(), &[a]);
		assert_eq!(counts.counts(), &[5]);
	}

	#[test]
	fn counts_are_not_capped_at_u32() {
		let a = Srgba::new(9, 9, 9, 9);
		let counts = ColorCounts::from_pairs([(a, u64::from(u32::MAX)), (a, 2)]);
		assert_eq!(counts.count_of(a), u64::from(u32::MAX) + 2);
		assert_eq!(counts.total(), u64::from(u32::MAX) + 2);
	}

	#[test]
	fn empty_image() {
		let image = RgbaImage::new(0, 0);
		assert!(ColorCounts::from_image(&image).is_empty());
	}
}
