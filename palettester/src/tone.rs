//! Named color values

use crate::{Error, Result};
use palette::{rgb::channels::Argb, FromColor, Hsl, Hsv, Srgb, Srgba};
use std::{
	fmt::{self, Display},
	hash::{Hash, Hasher},
	str::FromStr,
};

/// The lowercase `#rrggbb` code for the RGB channels of a color
#[must_use]
pub fn hex_code(color: Srgba<u8>) -> String {
	format!("#{:x}", color.color)
}

/// Pack a color into a `0xAARRGGBB` value
#[must_use]
pub fn argb(color: Srgba<u8>) -> u32 {
	color.into_u32::<Argb>()
}

/// Unpack a `0xAARRGGBB` value into a color
#[must_use]
pub fn from_argb(argb: u32) -> Srgba<u8> {
	Srgba::from_u32::<Argb>(argb)
}

/// A named color along with its HSL and HSV components.
///
/// Two tones are equal (and hash the same) when their RGBA colors are equal, regardless of their names.
#[derive(Debug, Clone)]
pub struct Tone {
	/// Display name
	name: String,
	/// 8-bit sRGB color with alpha
	color: Srgba<u8>,
	/// Hue in degrees, `0.0..360.0`
	hue: f32,
	/// HSL saturation
	saturation_l: f32,
	/// HSV saturation
	saturation_v: f32,
	/// HSL lightness
	lightness: f32,
	/// HSV value
	value: f32,
}

impl Tone {
	/// Create a tone with the given name
	#[must_use]
	pub fn new(name: impl Into<String>, color: Srgba<u8>) -> Self {
		let rgb: Srgb<f32> = color.color.into_format();
		let hsl: Hsl = Hsl::from_color(rgb);
		let hsv: Hsv = Hsv::from_color(rgb);

		// Achromatic colors get a hue of 0.
		let hue = hsl.hue.into_positive_degrees();
		let hue = if hue >= 360.0 { 0.0 } else { hue };

		Self {
			name: name.into(),
			color,
			hue,
			saturation_l: hsl.saturation,
			saturation_v: hsv.saturation,
			lightness: hsl.lightness,
			value: hsv.value,
		}
	}

	/// Create a tone named after its own `#rrggbb` code
	#[must_use]
	pub fn unnamed(color: Srgba<u8>) -> Self {
		Self::new(hex_code(color), color)
	}

	/// Create a tone from RGBA components
	#[must_use]
	pub fn from_rgba(name: impl Into<String>, red: u8, green: u8, blue: u8, alpha: u8) -> Self {
		Self::new(name, Srgba::new(red, green, blue, alpha))
	}

	/// Parse a `Name=#rrggbb` or `Name=#rrggbbaa` pair.
	///
	/// Input without a `=` is parsed as an unnamed color code.
	///
	/// # Errors
	/// Returns [`Error::InvalidHex`] if the color code is malformed.
	pub fn parse_named(s: &str) -> Result<Self> {
		match s.split_once('=') {
			Some((name, code)) if !name.trim().is_empty() => Ok(Self::new(name.trim(), parse_hex(code.trim())?)),
			Some(_) => Err(Error::InvalidHex(s.to_owned())),
			None => s.parse(),
		}
	}

	/// The display name
	#[must_use]
	pub fn name(&self) -> &str {
		&self.name
	}

	/// The RGBA color
	#[must_use]
	pub const fn color(&self) -> Srgba<u8> {
		self.color
	}

	/// The packed `0xAARRGGBB` color
	#[must_use]
	pub fn argb(&self) -> u32 {
		argb(self.color)
	}

	/// The lowercase `#rrggbb` code of this tone's color
	#[must_use]
	pub fn hex(&self) -> String {
		hex_code(self.color)
	}

	/// Red channel
	#[must_use]
	pub fn red(&self) -> u8 {
		self.color.red
	}

	/// Green channel
	#[must_use]
	pub fn green(&self) -> u8 {
		self.color.green
	}

	/// Blue channel
	#[must_use]
	pub fn blue(&self) -> u8 {
		self.color.blue
	}

	/// Alpha channel
	#[must_use]
	pub const fn alpha(&self) -> u8 {
		self.color.alpha
	}

	/// Hue in degrees, in the range `0.0..360.0`
	#[must_use]
	pub const fn hue(&self) -> f32 {
		self.hue
	}

	/// Saturation in the HSL color space
	#[must_use]
	pub const fn saturation_l(&self) -> f32 {
		self.saturation_l
	}

	/// Saturation in the HSV color space
	#[must_use]
	pub const fn saturation_v(&self) -> f32 {
		self.saturation_v
	}

	/// HSL lightness
	#[must_use]
	pub const fn lightness(&self) -> f32 {
		self.lightness
	}

	/// HSV value
	#[must_use]
	pub const fn value(&self) -> f32 {
		self.value
	}
}

impl PartialEq for Tone {
	fn eq(&self, other: &Self) -> bool {
		self.argb() == other.argb()
	}
}

impl Eq for Tone {}

impl Hash for Tone {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.argb().hash(state);
	}
}

impl Display for Tone {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.write_str(&self.name)
	}
}

impl From<Srgba<u8>> for Tone {
	fn from(color: Srgba<u8>) -> Self {
		Self::unnamed(color)
	}
}

impl FromStr for Tone {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self> {
		parse_hex(s).map(Self::unnamed)
	}
}

/// Parse `#rrggbb` (opaque) or `#rrggbbaa`
fn parse_hex(s: &str) -> Result<Srgba<u8>> {
	let invalid = || Error::InvalidHex(s.to_owned());
	let digits = s.strip_prefix('#').unwrap_or(s);

	if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
		return Err(invalid());
	}

	let value = u32::from_str_radix(digits, 16).map_err(|_| invalid())?;
	match digits.len() {
		6 => Ok(from_argb(0xFF00_0000 | value)),
		8 => Ok(from_argb(value.rotate_right(8))),
		_ => Err(invalid()),
	}
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
	use super::*;
	use approx::assert_relative_eq;
	use std::collections::HashSet;

	#[test]
	fn unnamed_uses_lowercase_hex() {
		let tone = Tone::unnamed(Srgba::new(0xAB, 0x0C, 0xFF, 0xFF));
		assert_eq!(tone.name(), "#ab0cff");
		assert_eq!(tone.hex(), "#ab0cff");
	}

	#[test]
	fn unnamed_ignores_alpha() {
		let opaque = Tone::unnamed(Srgba::new(10, 20, 30, 255));
		let clear = Tone::unnamed(Srgba::new(10, 20, 30, 0));
		assert_eq!(opaque.name(), clear.name());
		assert_ne!(opaque, clear);
	}

	#[test]
	fn equality_ignores_name() {
		let a = Tone::from_rgba("Red", 255, 0, 0, 255);
		let b = Tone::from_rgba("Crimson-ish", 255, 0, 0, 255);
		assert_eq!(a, b);

		let set = [a, b].into_iter().collect::<HashSet<_>>();
		assert_eq!(set.len(), 1);
	}

	#[test]
	fn primary_colors_hsl_hsv() {
		let red = Tone::from_rgba("Red", 255, 0, 0, 255);
		assert_relative_eq!(red.hue(), 0.0);
		assert_relative_eq!(red.saturation_l(), 1.0);
		assert_relative_eq!(red.saturation_v(), 1.0);
		assert_relative_eq!(red.lightness(), 0.5);
		assert_relative_eq!(red.value(), 1.0);

		let green = Tone::from_rgba("Green", 0, 255, 0, 255);
		assert_relative_eq!(green.hue(), 120.0, epsilon = 1e-3);

		let blue = Tone::from_rgba("Blue", 0, 0, 255, 255);
		assert_relative_eq!(blue.hue(), 240.0, epsilon = 1e-3);
	}

	#[test]
	fn greys_have_zero_hue_and_saturation() {
		for level in [0, 64, 128, 255] {
			let grey = Tone::from_rgba("Grey", level, level, level, 255);
			assert_relative_eq!(grey.hue(), 0.0);
			assert_relative_eq!(grey.saturation_l(), 0.0);
			assert_relative_eq!(grey.saturation_v(), 0.0);
			assert_relative_eq!(grey.lightness(), f32::from(level) / 255.0, epsilon = 1e-6);
			assert_relative_eq!(grey.value(), f32::from(level) / 255.0, epsilon = 1e-6);
		}
	}

	#[test]
	fn hsl_and_hsv_saturation_differ() {
		// #804040: max 0.502, min 0.251
		let tone = Tone::from_rgba("Brownish", 128, 64, 64, 255);
		assert_relative_eq!(tone.hue(), 0.0);
		assert_relative_eq!(tone.saturation_v(), 0.5, epsilon = 1e-3);
		assert_relative_eq!(tone.saturation_l(), 1.0 / 3.0, epsilon = 1e-3);
		assert_relative_eq!(tone.lightness(), 0.3765, epsilon = 1e-3);
	}

	#[test]
	fn parse_hex_codes() {
		let tone = "#ff8000".parse::<Tone>().unwrap();
		assert_eq!(tone.color(), Srgba::new(255, 128, 0, 255));
		assert_eq!(tone.name(), "#ff8000");

		let tone = "#ff800080".parse::<Tone>().unwrap();
		assert_eq!(tone.argb(), 0x80FF_8000);

		assert!("#ff80".parse::<Tone>().is_err());
		assert!("#gg0000".parse::<Tone>().is_err());
		assert!("#+f0000".parse::<Tone>().is_err());
	}

	#[test]
	fn parse_named_tones() {
		let tone = Tone::parse_named("Sky=#87ceeb").unwrap();
		assert_eq!(tone.name(), "Sky");
		assert_eq!(tone.color(), Srgba::new(0x87, 0xCE, 0xEB, 0xFF));

		assert_eq!(Tone::parse_named("#000000").unwrap().name(), "#000000");
		assert_eq!(Tone::parse_named("=#000000"), Err(Error::InvalidHex("=#000000".to_owned())));
	}

	#[test]
	fn argb_packing() {
		let color = Srgba::new(0x12, 0x34, 0x56, 0x78);
		assert_eq!(argb(color), 0x7812_3456);
		assert_eq!(argb(from_argb(0x7812_3456)), 0x7812_3456);
	}
}
