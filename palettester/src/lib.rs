//! Analyse the color composition of an image.
//!
//! Palettester counts the colors of an image and attributes them to a set of named tones.
//! When no target palette is known, it can discover one by clustering the image's colors
//! with weighted k-means and naming the results after a reference palette.
//!
//! # Examples
//!
//! ## Compare an image against the standard palette
//!
//! ```no_run
//! use palettester::{palettes, Palettester};
//!
//! let image = image::open("some image").unwrap();
//! let distribution = Palettester::new().analyse_palette(&image, &palettes::standard());
//! println!("{distribution}"); // e.g., [Red: 1200, White: 830, Black: 70]
//! ```
//!
//! ## Discover a palette of at most 5 colors
//!
//! ```no_run
//! use palettester::Palettester;
//!
//! let image = image::open("some image").unwrap();
//! let palette = Palettester::new().define_palette(&image, 5).unwrap();
//! println!("{palette}"); // e.g., [Navy: #11135a, Gray: #7a7d80, Navy2: #0a0c3b, ...]
//! ```
//!
//! ## Count once, analyse many times
//!
//! Counting the pixels of a large image is the expensive part,
//! so the `*_counts` methods take a precomputed [`ColorCounts`].
//!
//! ```no_run
//! use palettester::{palettes, CompuPhase, Kmeans, Palettester};
//!
//! let image = image::open("some image").unwrap();
//! let palettester = Palettester::new()
//! 	.with_distance(CompuPhase)
//! 	.with_clusterer(Kmeans::new(CompuPhase).with_seed(42));
//!
//! let counts = palettester.count_colors(&image);
//! let standard = palettester.analyse_palette_counts(&counts, &palettes::standard());
//! let greys = palettester.analyse_palette_counts(&counts, &palettes::greyscale());
//! let discovered = palettester.define_palette_counts(&counts, 8).unwrap();
//! ```
//!
//! # Metrics
//!
//! All metrics operate on the four 8-bit channels (red, green, blue, and alpha) as a 4-dimensional space.
//! See [`Euclidean`], [`Manhattan`], [`WeightedEuclidean`], and [`CompuPhase`].
//! Each metric has its own scale, so naming and matching thresholds should be chosen per metric.
//!
//! # Clustering
//!
//! [`Kmeans`] starts from centroids chosen by k-means++ (weighted by pixel count)
//! and then alternates between assigning colors to the closest centroid
//! and moving each centroid to the pixel-weighted mean of its colors.
//! It stops once the centroids no longer change or after a maximum number of iterations.
//! The starting centroids depend on the seed, so results for `k` > 1 can differ between seeds.

#![deny(unsafe_code)]
#![warn(clippy::pedantic, clippy::cargo)]
#![warn(clippy::use_debug, clippy::dbg_macro, clippy::todo, clippy::unimplemented)]
#![warn(clippy::unwrap_used, clippy::unwrap_in_result)]
#![warn(clippy::unneeded_field_pattern, clippy::rest_pat_in_fully_bound_structs)]
#![warn(clippy::unnecessary_self_imports)]
#![warn(clippy::str_to_string, clippy::string_to_string, clippy::string_slice)]
#![warn(missing_docs, clippy::missing_docs_in_private_items, rustdoc::all)]
#![warn(clippy::float_cmp_const, clippy::lossy_float_literal)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::enum_glob_use)]
#![allow(clippy::unreadable_literal)]

mod counts;
mod distance;
mod distribution;
mod error;
mod kmeans;
mod namer;
mod palettester;
pub mod palettes;
pub mod tone;

pub use counts::{ColorCounts, PixelSource};
pub use distance::{ColorDistance, CompuPhase, Euclidean, Manhattan, Metric, WeightedEuclidean};
pub use distribution::{PaletteDistribution, ToneCount, UNCATEGORIZED};
pub use error::{Error, Result};
pub use kmeans::{Clusterer, EmptyClusterPolicy, Kmeans, KmeansResult};
pub use namer::{ColorNamer, HexNamer, PaletteNamer};
pub use palettes::Palette;
pub use palettester::Palettester;
pub use tone::Tone;
