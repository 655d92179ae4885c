//! Error types returned by the library

use thiserror::Error;

/// Errors that can occur while building tones, metrics, or palettes
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
	/// Clustering was asked for a non-zero number of centers from zero colors
	#[error("cannot find {k} clusters in an empty set of colors")]
	NoColors {
		/// The requested number of clusters
		k: usize,
	},

	/// Channel weights for a weighted metric were negative, non-finite, or all zero
	#[error("invalid channel weights {0:?}: weights must be finite, non-negative, and not all zero")]
	InvalidWeights([f64; 4]),

	/// A color code could not be parsed
	#[error("invalid color code {0:?}: expected #rrggbb or #rrggbbaa")]
	InvalidHex(String),
}

/// Result type for fallible library operations
pub type Result<T> = std::result::Result<T, Error>;
