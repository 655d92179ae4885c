//! Naming discovered colors

use crate::{palettes, ColorDistance, Metric, Palette, Tone};
use palette::Srgba;
use std::collections::HashMap;

/// Produces one named tone for each color in a list
pub trait ColorNamer {
	/// Name each color, in order
	fn name(&self, colors: &[Srgba<u8>]) -> Vec<Tone>;
}

impl<N: ColorNamer + ?Sized> ColorNamer for &N {
	fn name(&self, colors: &[Srgba<u8>]) -> Vec<Tone> {
		(**self).name(colors)
	}
}

/// Names every color by its `#rrggbb` code
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HexNamer;

impl ColorNamer for HexNamer {
	fn name(&self, colors: &[Srgba<u8>]) -> Vec<Tone> {
		colors.iter().map(|&color| Tone::unnamed(color)).collect()
	}
}

/// Names colors after the closest tone of a reference palette.
///
/// Colors farther than `max_distance` from every reference tone are named by their `#rrggbb` code.
/// When a name is produced more than once, the first color keeps the plain name
/// and later colors get a number appended, starting at 2: `Red`, `Red2`, `Red3`, ...
#[derive(Debug, Clone)]
pub struct PaletteNamer<D = Metric> {
	/// Reference tones to borrow names from
	reference: Palette,
	/// Metric used to find the closest reference tone
	distance: D,
	/// Largest distance at which a reference name is still used
	max_distance: f64,
}

impl PaletteNamer {
	/// The default metric
	pub const DEFAULT_DISTANCE: Metric = Metric::CompuPhase;

	/// The default naming threshold, on the scale of [`CompuPhase`](crate::CompuPhase)
	pub const DEFAULT_MAX_DISTANCE: f64 = 75.0;

	/// Create a namer for the given reference palette using [`CompuPhase`](crate::CompuPhase) and its default threshold
	#[must_use]
	pub const fn new(reference: Palette) -> Self {
		Self {
			reference,
			distance: Self::DEFAULT_DISTANCE,
			max_distance: Self::DEFAULT_MAX_DISTANCE,
		}
	}
}

impl Default for PaletteNamer {
	fn default() -> Self {
		Self::new(palettes::standard())
	}
}

impl<D: ColorDistance> PaletteNamer<D> {
	/// Use a different metric.
	///
	/// Different metrics have different scales, so the threshold should usually be changed as well.
	pub fn with_distance<E: ColorDistance>(self, distance: E) -> PaletteNamer<E> {
		PaletteNamer {
			reference: self.reference,
			distance,
			max_distance: self.max_distance,
		}
	}

	/// Set the largest distance at which a reference name is still used
	#[must_use]
	pub const fn with_max_distance(mut self, max_distance: f64) -> Self {
		self.max_distance = max_distance;
		self
	}

	/// Use a different reference palette
	#[must_use]
	pub fn with_reference(mut self, reference: Palette) -> Self {
		self.reference = reference;
		self
	}

	/// The reference palette
	pub const fn reference(&self) -> &Palette {
		&self.reference
	}

	/// The naming threshold
	pub const fn max_distance(&self) -> f64 {
		self.max_distance
	}

	/// The base name for a single color, before collisions are handled
	fn base_name(&self, color: Srgba<u8>) -> String {
		match self.reference.nearest(&self.distance, color) {
			Some((i, dist)) if dist <= self.max_distance => self.reference[i].name().to_owned(),
			_ => crate::tone::hex_code(color),
		}
	}
}

impl<D: ColorDistance> ColorNamer for PaletteNamer<D> {
	fn name(&self, colors: &[Srgba<u8>]) -> Vec<Tone> {
		let mut uses = HashMap::<String, u32>::new();
		colors
			.iter()
			.map(|&color| {
				let name = self.base_name(color);
				let n = uses.entry(name.clone()).or_insert(0);
				*n += 1;
				if *n == 1 {
					Tone::new(name, color)
				} else {
					Tone::new(format!("{name}{n}"), color)
				}
			})
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{Euclidean, Manhattan};

	fn rgb(red: u8, green: u8, blue: u8) -> Srgba<u8> {
		Srgba::new(red, green, blue, 255)
	}

	fn names(tones: &[Tone]) -> Vec<&str> {
		tones.iter().map(Tone::name).collect()
	}

	fn primaries() -> Palette {
		Palette::new(vec![
			Tone::new("Red", rgb(255, 0, 0)),
			Tone::new("Green", rgb(0, 255, 0)),
			Tone::new("Blue", rgb(0, 0, 255)),
		])
	}

	#[test]
	fn collisions_are_numbered_from_two() {
		let (red, green, blue) = (rgb(255, 0, 0), rgb(0, 255, 0), rgb(0, 0, 255));
		let tones = PaletteNamer::new(primaries()).name(&[red, blue, green, red, green, green]);
		assert_eq!(names(&tones), ["Red", "Blue", "Green", "Red2", "Green2", "Green3"]);
		assert_eq!(tones[3].color(), red);
	}

	#[test]
	fn near_colors_borrow_reference_names() {
		let tones = PaletteNamer::new(primaries()).name(&[rgb(240, 20, 10), rgb(10, 10, 230)]);
		assert_eq!(names(&tones), ["Red", "Blue"]);
		assert_eq!(tones[0].color(), rgb(240, 20, 10));
	}

	#[test]
	fn far_colors_use_hex_codes() {
		let grey = rgb(128, 128, 128);
		let tones = PaletteNamer::new(primaries()).name(&[grey, rgb(250, 0, 0)]);
		assert_eq!(names(&tones), ["#808080", "Red"]);
	}

	#[test]
	fn threshold_is_configurable() {
		let color = rgb(200, 0, 0);
		let namer = PaletteNamer::new(primaries()).with_distance(Euclidean);

		assert_eq!(names(&namer.clone().with_max_distance(60.0).name(&[color])), ["Red"]);
		assert_eq!(names(&namer.with_max_distance(50.0).name(&[color])), ["#c80000"]);

		let namer = PaletteNamer::new(primaries()).with_distance(Manhattan).with_max_distance(55.0);
		assert_eq!(names(&namer.name(&[color])), ["Red"]);
	}

	#[test]
	fn ties_use_first_reference_tone() {
		let reference = Palette::new(vec![Tone::new("Dark", rgb(0, 0, 0)), Tone::new("Darker", rgb(0, 0, 0))]);
		let tones = PaletteNamer::new(reference).name(&[rgb(1, 1, 1)]);
		assert_eq!(names(&tones), ["Dark"]);
	}

	#[test]
	fn empty_reference_uses_hex_codes() {
		let tones = PaletteNamer::new(Palette::default()).name(&[rgb(1, 2, 3), rgb(1, 2, 3)]);
		assert_eq!(names(&tones), ["#010203", "#0102032"]);
	}

	#[test]
	fn default_namer_uses_standard_palette() {
		let namer = PaletteNamer::default();
		assert_eq!(namer.reference().len(), palettes::STANDARD_COLORS.len());
		let tones = namer.name(&[rgb(255, 165, 0), rgb(250, 160, 5)]);
		assert_eq!(names(&tones), ["Orange", "Orange2"]);
	}

	#[test]
	fn hex_namer_never_borrows_names() {
		let tones = HexNamer.name(&[rgb(255, 0, 0), rgb(255, 0, 0)]);
		assert_eq!(names(&tones), ["#ff0000", "#ff0000"]);
	}

	#[test]
	fn hex_named_collisions_are_numbered() {
		// Alpha is not part of the hex code
		let namer = PaletteNamer::new(primaries());
		let tones = namer.name(&[Srgba::new(9, 9, 9, 255), Srgba::new(9, 9, 9, 0)]);
		assert_eq!(names(&tones), ["#090909", "#0909092"]);
	}
}
