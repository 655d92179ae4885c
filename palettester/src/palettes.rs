//! Ordered sets of reference tones

use crate::{tone::from_argb, ColorDistance, Tone};
use palette::Srgba;
use std::{
	fmt::{self, Display},
	ops::Index,
};

/// An ordered list of tones.
///
/// Duplicate colors are allowed, but nearest-tone lookups resolve ties to the first matching tone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Palette {
	/// The tones, in order
	tones: Vec<Tone>,
}

impl Palette {
	/// Create a palette from the given tones
	#[must_use]
	pub const fn new(tones: Vec<Tone>) -> Self {
		Self { tones }
	}

	/// Create a palette from `(name, 0xAARRGGBB)` pairs
	#[must_use]
	pub fn from_named(colors: &[(&str, u32)]) -> Self {
		colors.iter().map(|&(name, argb)| Tone::new(name, from_argb(argb))).collect()
	}

	/// The tones of this palette
	#[must_use]
	pub fn tones(&self) -> &[Tone] {
		&self.tones
	}

	/// Consume the palette, returning its tones
	#[must_use]
	pub fn into_tones(self) -> Vec<Tone> {
		self.tones
	}

	/// The number of tones
	#[must_use]
	pub fn len(&self) -> usize {
		self.tones.len()
	}

	/// Whether there are no tones
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.tones.is_empty()
	}

	/// Iterate over the tones
	pub fn iter(&self) -> std::slice::Iter<'_, Tone> {
		self.tones.iter()
	}

	/// Find the first tone with the given name
	#[must_use]
	pub fn by_name(&self, name: &str) -> Option<&Tone> {
		self.tones.iter().find(|tone| tone.name() == name)
	}

	/// The index of the closest tone and its distance from `color`.
	///
	/// The first tone wins ties. Returns `None` for an empty palette.
	pub fn nearest<D: ColorDistance + ?Sized>(&self, distance: &D, color: Srgba<u8>) -> Option<(usize, f64)> {
		let mut nearest: Option<(usize, f64)> = None;
		for (i, tone) in self.tones.iter().enumerate() {
			let dist = distance.distance(color, tone.color());
			if nearest.map_or(true, |(_, min_dist)| dist < min_dist) {
				nearest = Some((i, dist));
			}
		}
		nearest
	}
}

impl Index<usize> for Palette {
	type Output = Tone;

	fn index(&self, index: usize) -> &Tone {
		&self.tones[index]
	}
}

impl FromIterator<Tone> for Palette {
	fn from_iter<I: IntoIterator<Item = Tone>>(iter: I) -> Self {
		Self::new(iter.into_iter().collect())
	}
}

impl From<Vec<Tone>> for Palette {
	fn from(tones: Vec<Tone>) -> Self {
		Self::new(tones)
	}
}

impl IntoIterator for Palette {
	type Item = Tone;
	type IntoIter = std::vec::IntoIter<Tone>;

	fn into_iter(self) -> Self::IntoIter {
		self.tones.into_iter()
	}
}

impl<'a> IntoIterator for &'a Palette {
	type Item = &'a Tone;
	type IntoIter = std::slice::Iter<'a, Tone>;

	fn into_iter(self) -> Self::IntoIter {
		self.tones.iter()
	}
}

impl Display for Palette {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.write_str("[")?;
		for (i, tone) in self.tones.iter().enumerate() {
			if i > 0 {
				f.write_str(", ")?;
			}
			write!(f, "{}: {}", tone.name(), tone.hex())?;
		}
		f.write_str("]")
	}
}

/// The 16 HTML basic colors plus orange, brown, and pink
pub const STANDARD_COLORS: &[(&str, u32)] = &[
	("Black", 0xFF000000),
	("Silver", 0xFFC0C0C0),
	("Gray", 0xFF808080),
	("White", 0xFFFFFFFF),
	("Maroon", 0xFF800000),
	("Red", 0xFFFF0000),
	("Purple", 0xFF800080),
	("Fuchsia", 0xFFFF00FF),
	("Green", 0xFF008000),
	("Lime", 0xFF00FF00),
	("Olive", 0xFF808000),
	("Yellow", 0xFFFFFF00),
	("Navy", 0xFF000080),
	("Blue", 0xFF0000FF),
	("Teal", 0xFF008080),
	("Aqua", 0xFF00FFFF),
	("Orange", 0xFFFFA500),
	("Brown", 0xFFA52A2A),
	("Pink", 0xFFFFC0CB),
];

/// Black to white in eight steps, plus fully transparent
pub const GREYSCALE_COLORS: &[(&str, u32)] = &[
	("Black", 0xFF000000),
	("Grey1", 0xFF242424),
	("Grey2", 0xFF494949),
	("Grey3", 0xFF6D6D6D),
	("Grey4", 0xFF929292),
	("Grey5", 0xFFB6B6B6),
	("Grey6", 0xFFDBDBDB),
	("White", 0xFFFFFFFF),
	("Transparent", 0x00000000),
];

/// A palette of [`STANDARD_COLORS`]
#[must_use]
pub fn standard() -> Palette {
	Palette::from_named(STANDARD_COLORS)
}

/// A palette of [`GREYSCALE_COLORS`]
#[must_use]
pub fn greyscale() -> Palette {
	Palette::from_named(GREYSCALE_COLORS)
}
