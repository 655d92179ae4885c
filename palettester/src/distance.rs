//! Color difference metrics over the 4-dimensional RGBA space

use crate::{Error, Result, Tone};
use palette::Srgba;

/// A symmetric color difference metric.
///
/// `distance` is zero only for equal colors.
/// `ranking_distance` must order any set of colors the same way as `distance`,
/// but it may skip a final monotonic transform (such as a square root)
/// since only comparisons are made with it.
pub trait ColorDistance: Send + Sync {
	/// The color difference
	fn distance(&self, x: Srgba<u8>, y: Srgba<u8>) -> f64;

	/// A cheaper surrogate for [`ColorDistance::distance`] that preserves ordering
	fn ranking_distance(&self, x: Srgba<u8>, y: Srgba<u8>) -> f64 {
		self.distance(x, y)
	}

	/// The color difference between two tones
	fn tone_distance(&self, x: &Tone, y: &Tone) -> f64 {
		self.distance(x.color(), y.color())
	}
}

impl<D: ColorDistance + ?Sized> ColorDistance for &D {
	fn distance(&self, x: Srgba<u8>, y: Srgba<u8>) -> f64 {
		(**self).distance(x, y)
	}

	fn ranking_distance(&self, x: Srgba<u8>, y: Srgba<u8>) -> f64 {
		(**self).ranking_distance(x, y)
	}
}

/// Per channel differences in (red, green, blue, alpha) order
fn deltas(x: Srgba<u8>, y: Srgba<u8>) -> [f64; 4] {
	[
		f64::from(x.red) - f64::from(y.red),
		f64::from(x.green) - f64::from(y.green),
		f64::from(x.blue) - f64::from(y.blue),
		f64::from(x.alpha) - f64::from(y.alpha),
	]
}

/// Regular Euclidean distance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Euclidean;

impl ColorDistance for Euclidean {
	fn distance(&self, x: Srgba<u8>, y: Srgba<u8>) -> f64 {
		self.ranking_distance(x, y).sqrt()
	}

	fn ranking_distance(&self, x: Srgba<u8>, y: Srgba<u8>) -> f64 {
		deltas(x, y).iter().map(|d| d * d).sum()
	}
}

/// Sum of absolute channel differences
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Manhattan;

impl ColorDistance for Manhattan {
	fn distance(&self, x: Srgba<u8>, y: Srgba<u8>) -> f64 {
		deltas(x, y).iter().map(|d| d.abs()).sum()
	}
}

/// Euclidean distance with a weight for each channel.
///
/// The distance is normalized by the mean weight,
/// so equal weights give exactly the same result as [`Euclidean`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedEuclidean {
	/// Red, green, blue, and alpha weights
	weights: [f64; 4],
}

impl WeightedEuclidean {
	/// The weights used by [`WeightedEuclidean::default`]
	pub const DEFAULT_WEIGHTS: [f64; 4] = [2.0, 4.0, 3.0, 1.0];

	/// Create a metric with the given red, green, blue, and alpha weights.
	///
	/// # Errors
	/// Returns [`Error::InvalidWeights`] if any weight is negative or not finite, or if all weights are zero.
	pub fn new(weights: [f64; 4]) -> Result<Self> {
		let valid = weights.iter().all(|w| w.is_finite() && *w >= 0.0) && weights.iter().any(|&w| w > 0.0);
		if valid {
			Ok(Self { weights })
		} else {
			Err(Error::InvalidWeights(weights))
		}
	}

	/// The red, green, blue, and alpha weights
	#[must_use]
	pub const fn weights(&self) -> [f64; 4] {
		self.weights
	}

	/// Arithmetic mean of the weights
	fn mean_weight(&self) -> f64 {
		self.weights.iter().sum::<f64>() / 4.0
	}
}

impl Default for WeightedEuclidean {
	fn default() -> Self {
		Self { weights: Self::DEFAULT_WEIGHTS }
	}
}

impl ColorDistance for WeightedEuclidean {
	fn distance(&self, x: Srgba<u8>, y: Srgba<u8>) -> f64 {
		(self.ranking_distance(x, y) / self.mean_weight()).sqrt()
	}

	fn ranking_distance(&self, x: Srgba<u8>, y: Srgba<u8>) -> f64 {
		deltas(x, y).iter().zip(self.weights).map(|(d, w)| w * d * d).sum()
	}
}

/// Weighted Euclidean distance whose red and blue weights shift with how red the pair of colors is.
///
/// See <https://www.compuphase.com/cmetric.htm>.
/// The result is scaled to the same `0.0..=510.0` range as [`Euclidean`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompuPhase;

impl ColorDistance for CompuPhase {
	fn distance(&self, x: Srgba<u8>, y: Srgba<u8>) -> f64 {
		(self.ranking_distance(x, y) / 2.5).sqrt()
	}

	fn ranking_distance(&self, x: Srgba<u8>, y: Srgba<u8>) -> f64 {
		let red_base = (f64::from(x.red) + f64::from(y.red)) / 2.0;
		let red_mod = red_base / 256.0;
		let blue_mod = (256.0 - red_base) / 256.0;
		let [dr, dg, db, da] = deltas(x, y);
		(2.0 + red_mod) * dr * dr + 4.0 * dg * dg + (2.0 + blue_mod) * db * db + da * da
	}
}

/// One of the provided metrics, chosen at runtime
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Metric {
	/// See [`Euclidean`]
	#[default]
	Euclidean,
	/// See [`Manhattan`]
	Manhattan,
	/// See [`WeightedEuclidean`]
	Weighted(WeightedEuclidean),
	/// See [`CompuPhase`]
	CompuPhase,
}

impl ColorDistance for Metric {
	fn distance(&self, x: Srgba<u8>, y: Srgba<u8>) -> f64 {
		match self {
			Self::Euclidean => Euclidean.distance(x, y),
			Self::Manhattan => Manhattan.distance(x, y),
			Self::Weighted(weighted) => weighted.distance(x, y),
			Self::CompuPhase => CompuPhase.distance(x, y),
		}
	}

	fn ranking_distance(&self, x: Srgba<u8>, y: Srgba<u8>) -> f64 {
		match self {
			Self::Euclidean => Euclidean.ranking_distance(x, y),
			Self::Manhattan => Manhattan.ranking_distance(x, y),
			Self::Weighted(weighted) => weighted.ranking_distance(x, y),
			Self::CompuPhase => CompuPhase.ranking_distance(x, y),
		}
	}
}

impl From<Euclidean> for Metric {
	fn from(_: Euclidean) -> Self {
		Self::Euclidean
	}
}

impl From<Manhattan> for Metric {
	fn from(_: Manhattan) -> Self {
		Self::Manhattan
	}
}

impl From<WeightedEuclidean> for Metric {
	fn from(weighted: WeightedEuclidean) -> Self {
		Self::Weighted(weighted)
	}
}

impl From<CompuPhase> for Metric {
	fn from(_: CompuPhase) -> Self {
		Self::CompuPhase
	}
}
