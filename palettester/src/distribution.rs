//! Per-tone pixel counts for an analysed image

use crate::{tone::argb, Tone};
use palette::Srgba;
use std::{
	cmp::Reverse,
	collections::HashMap,
	fmt::{self, Display},
};

/// The name shown for pixels that were not assigned to any tone
pub const UNCATEGORIZED: &str = "uncategorized";

/// A tone and the pixel counts of every image color attributed to it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToneCount {
	/// The tone, or `None` for uncategorized pixels
	tone: Option<Tone>,
	/// Packed `0xAARRGGBB` color -> number of pixels
	pixel_counts: HashMap<u32, u64>,
}

impl ToneCount {
	/// Create a tone count from a map of packed `0xAARRGGBB` colors to pixel counts
	#[must_use]
	pub fn new(tone: Option<Tone>, pixel_counts: HashMap<u32, u64>) -> Self {
		Self { tone, pixel_counts }
	}

	/// The tone, or `None` for uncategorized pixels
	#[must_use]
	pub const fn tone(&self) -> Option<&Tone> {
		self.tone.as_ref()
	}

	/// The tone's name, or [`UNCATEGORIZED`]
	#[must_use]
	pub fn name(&self) -> &str {
		self.tone.as_ref().map_or(UNCATEGORIZED, Tone::name)
	}

	/// Packed `0xAARRGGBB` color -> number of pixels
	#[must_use]
	pub const fn pixel_counts(&self) -> &HashMap<u32, u64> {
		&self.pixel_counts
	}

	/// The colors attributed to this tone
	pub fn colors(&self) -> impl Iterator<Item = Srgba<u8>> + '_ {
		self.pixel_counts.keys().map(|&key| crate::tone::from_argb(key))
	}

	/// The number of pixels with the given color
	#[must_use]
	pub fn count_of(&self, color: Srgba<u8>) -> u64 {
		self.pixel_counts.get(&argb(color)).copied().unwrap_or(0)
	}

	/// The total number of pixels
	#[must_use]
	pub fn count(&self) -> u64 {
		self.pixel_counts.values().sum()
	}

	/// Add `n` pixels of the given color
	pub(crate) fn add(&mut self, color: Srgba<u8>, n: u64) {
		*self.pixel_counts.entry(argb(color)).or_insert(0) += n;
	}
}

/// The tones of an image and the pixels attributed to each of them, in discovery order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaletteDistribution {
	/// Tone counts in discovery order
	tone_counts: Vec<ToneCount>,
}

impl PaletteDistribution {
	/// Create a distribution from tone counts in discovery order
	#[must_use]
	pub const fn new(tone_counts: Vec<ToneCount>) -> Self {
		Self { tone_counts }
	}

	/// The tone counts in discovery order
	#[must_use]
	pub fn tone_counts(&self) -> &[ToneCount] {
		&self.tone_counts
	}

	/// Consume the distribution, returning the tone counts in discovery order
	#[must_use]
	pub fn into_tone_counts(self) -> Vec<ToneCount> {
		self.tone_counts
	}

	/// Iterate over the tone counts in discovery order
	pub fn iter(&self) -> std::slice::Iter<'_, ToneCount> {
		self.tone_counts.iter()
	}

	/// The number of tones
	#[must_use]
	pub fn len(&self) -> usize {
		self.tone_counts.len()
	}

	/// Whether there are no tones
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.tone_counts.is_empty()
	}

	/// The first entry whose tone has the given name
	#[must_use]
	pub fn by_name(&self, name: &str) -> Option<&ToneCount> {
		self.tone_counts.iter().find(|tc| tc.tone().is_some_and(|tone| tone.name() == name))
	}

	/// The first entry whose tone has the given color
	#[must_use]
	pub fn by_color(&self, color: Srgba<u8>) -> Option<&ToneCount> {
		let key = argb(color);
		self.tone_counts.iter().find(|tc| tc.tone().is_some_and(|tone| tone.argb() == key))
	}

	/// The entry for uncategorized pixels, if any
	#[must_use]
	pub fn uncategorized(&self) -> Option<&ToneCount> {
		self.tone_counts.iter().find(|tc| tc.tone().is_none())
	}

	/// The tone counts sorted by descending pixel count.
	///
	/// Entries with equal counts stay in discovery order.
	#[must_use]
	pub fn by_count(&self) -> Vec<ToneCount> {
		let mut sorted = self.tone_counts.clone();
		sorted.sort_by_key(|tc| Reverse(tc.count()));
		sorted
	}

	/// The total number of pixels
	#[must_use]
	pub fn total(&self) -> u64 {
		self.tone_counts.iter().map(ToneCount::count).sum()
	}
}

impl From<Vec<ToneCount>> for PaletteDistribution {
	fn from(tone_counts: Vec<ToneCount>) -> Self {
		Self::new(tone_counts)
	}
}

impl<'a> IntoIterator for &'a PaletteDistribution {
	type Item = &'a ToneCount;
	type IntoIter = std::slice::Iter<'a, ToneCount>;

	fn into_iter(self) -> Self::IntoIter {
		self.tone_counts.iter()
	}
}

impl Display for PaletteDistribution {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.write_str("[")?;
		for (i, tc) in self.tone_counts.iter().enumerate() {
			if i > 0 {
				f.write_str(", ")?;
			}
			write!(f, "{}: {}", tc.name(), tc.count())?;
		}
		f.write_str("]")
	}
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
	use super::*;

	fn tone_count(name: &str, color: Srgba<u8>, n: u64) -> ToneCount {
		ToneCount::new(Some(Tone::new(name, color)), HashMap::from([(argb(color), n)]))
	}

	fn test_distribution() -> PaletteDistribution {
		PaletteDistribution::new(vec![
			tone_count("Red", Srgba::new(255, 0, 0, 255), 10),
			tone_count("Green", Srgba::new(0, 255, 0, 255), 30),
			tone_count("Blue", Srgba::new(0, 0, 255, 255), 10),
			tone_count("White", Srgba::new(255, 255, 255, 255), 30),
			tone_count("Black", Srgba::new(0, 0, 0, 255), 5),
		])
	}

	#[test]
	fn count_sums_breakdown() {
		let red = Srgba::new(255, 0, 0, 255);
		let dark_red = Srgba::new(200, 0, 0, 255);
		let tc = ToneCount::new(None, HashMap::from([(argb(red), 7), (argb(dark_red), 3)]));

		assert_eq!(tc.count(), 10);
		assert_eq!(tc.count_of(dark_red), 3);
		assert_eq!(tc.count_of(Srgba::new(0, 0, 0, 0)), 0);
		assert_eq!(tc.name(), UNCATEGORIZED);
		assert_eq!(tc.colors().count(), 2);
	}

	#[test]
	fn empty_breakdown_counts_zero() {
		let tc = ToneCount::new(Some(Tone::from_rgba("Red", 255, 0, 0, 255)), HashMap::new());
		assert_eq!(tc.count(), 0);
	}

	#[test]
	fn by_count_is_stable_and_descending() {
		let sorted = test_distribution().by_count();
		let names = sorted.iter().map(ToneCount::name).collect::<Vec<_>>();
		assert_eq!(names, ["Green", "White", "Red", "Blue", "Black"]);
	}

	#[test]
	fn by_count_leaves_discovery_order() {
		let distribution = test_distribution();
		let _ = distribution.by_count();
		assert_eq!(distribution.tone_counts()[0].name(), "Red");
	}

	#[test]
	fn lookups() {
		let distribution = test_distribution();
		assert_eq!(distribution.by_name("Blue").unwrap().count(), 10);
		assert!(distribution.by_name("Pink").is_none());

		// Lookup by color ignores names
		assert_eq!(distribution.by_color(Srgba::new(0, 255, 0, 255)).unwrap().name(), "Green");
		assert!(distribution.by_color(Srgba::new(0, 255, 0, 0)).is_none());
		assert!(distribution.uncategorized().is_none());
	}

	#[test]
	fn insertion_order_round_trips() {
		let tone_counts = test_distribution().into_tone_counts();
		let distribution = PaletteDistribution::new(tone_counts.clone());
		assert_eq!(distribution.tone_counts(), tone_counts.as_slice());

		// Changing a returned copy does not change the distribution
		let mut copy = distribution.by_count();
		copy.clear();
		assert_eq!(distribution.len(), 5);
		assert_eq!(distribution.total(), 85);
	}

	#[test]
	fn display_in_insertion_order() {
		let distribution = PaletteDistribution::new(vec![
			tone_count("#ff0000", Srgba::new(255, 0, 0, 255), 75),
			tone_count("#0000ff", Srgba::new(0, 0, 255, 255), 25),
			ToneCount::new(None, HashMap::from([(0, 4)])),
		]);
		assert_eq!(distribution.to_string(), "[#ff0000: 75, #0000ff: 25, uncategorized: 4]");
		assert_eq!(PaletteDistribution::default().to_string(), "[]");
	}
}
