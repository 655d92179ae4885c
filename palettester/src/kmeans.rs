//! Provides the implementation for weighted k-means over RGBA colors

use crate::{ColorCounts, ColorDistance, Error, Metric, Result};
use palette::Srgba;
use rand::{
	distributions::{Distribution, WeightedIndex},
	Rng, SeedableRng,
};
use rand_xoshiro::Xoshiro256PlusPlus;
use tracing::{debug, trace};

/// Finds a number of representative colors for a set of weighted colors
pub trait Clusterer {
	/// Find `k` representative colors for `counts`.
	///
	/// # Errors
	/// Returns [`Error::NoColors`] if `counts` is empty and `k` > 0.
	fn cluster(&self, counts: &ColorCounts, k: usize) -> Result<Vec<Srgba<u8>>>;
}

impl<C: Clusterer + ?Sized> Clusterer for &C {
	fn cluster(&self, counts: &ColorCounts, k: usize) -> Result<Vec<Srgba<u8>>> {
		(**self).cluster(counts, k)
	}
}

/// What to do with a center that no colors were assigned to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EmptyClusterPolicy {
	/// Keep the center where it was
	#[default]
	Retain,
	/// Move the center to the color farthest from its own center
	Farthest,
}

/// Result from running k-means
#[derive(Debug, Clone, PartialEq)]
pub struct KmeansResult {
	/// Final centroid colors, one for each of the `k` centers
	pub centroids: Vec<Srgba<u8>>,
	/// Number of pixels assigned to each of the final centroids
	pub counts: Vec<u64>,
	/// Number of elapsed iterations
	pub iterations: u32,
	/// Whether the centroids stopped changing before the iteration limit
	pub converged: bool,
}

impl KmeansResult {
	/// Create an empty result, representing that k-means was not able to run
	const fn empty() -> Self {
		Self {
			centroids: Vec::new(),
			counts: Vec::new(),
			iterations: 0,
			converged: true,
		}
	}
}

/// Weighted k-means clustering where each color counts once for every pixel it covers
#[derive(Debug, Clone)]
pub struct Kmeans<D = Metric> {
	/// Metric used for seeding and assignment
	distance: D,
	/// Maximum number of assign/update iterations
	max_iter: u32,
	/// Seed for choosing the starting centroids
	seed: u64,
	/// Handling of centers that lose all their colors
	empty_clusters: EmptyClusterPolicy,
}

impl Default for Kmeans {
	fn default() -> Self {
		Self::new(Metric::default())
	}
}

impl<D: ColorDistance> Kmeans<D> {
	/// The default maximum number of iterations
	pub const DEFAULT_MAX_ITER: u32 = 100;

	/// Create a clusterer with the given metric and default settings
	pub const fn new(distance: D) -> Self {
		Self {
			distance,
			max_iter: Self::DEFAULT_MAX_ITER,
			seed: 0,
			empty_clusters: EmptyClusterPolicy::Retain,
		}
	}

	/// Use a different metric
	pub fn with_distance<E: ColorDistance>(self, distance: E) -> Kmeans<E> {
		Kmeans {
			distance,
			max_iter: self.max_iter,
			seed: self.seed,
			empty_clusters: self.empty_clusters,
		}
	}

	/// Set the maximum number of iterations
	#[must_use]
	pub const fn with_max_iter(mut self, max_iter: u32) -> Self {
		self.max_iter = max_iter;
		self
	}

	/// Set the random seed used to choose the starting centroids
	#[must_use]
	pub const fn with_seed(mut self, seed: u64) -> Self {
		self.seed = seed;
		self
	}

	/// Set how centers without any colors are handled
	#[must_use]
	pub const fn with_empty_cluster_policy(mut self, policy: EmptyClusterPolicy) -> Self {
		self.empty_clusters = policy;
		self
	}

	/// The metric in use
	pub const fn distance(&self) -> &D {
		&self.distance
	}

	/// Run k-means for `k` centers.
	///
	/// If there are no more than `k` distinct colors, then each color is its own centroid.
	///
	/// # Errors
	/// Returns [`Error::NoColors`] if `counts` is empty and `k` > 0.
	pub fn run(&self, counts: &ColorCounts, k: usize) -> Result<KmeansResult> {
		if k == 0 {
			return Ok(KmeansResult::empty());
		}

		if counts.is_empty() {
			return Err(Error::NoColors { k });
		}

		if counts.num_colors() <= k {
			debug!(colors = counts.num_colors(), k, "skipping k-means since there are few enough colors");
			return Ok(KmeansResult {
				centroids: counts.colors.clone(),
				counts: counts.counts.clone(),
				iterations: 0,
				converged: true,
			});
		}

		let mut rng = Xoshiro256PlusPlus::seed_from_u64(self.seed);
		let mut centroids = kmeans_plus_plus(&self.distance, k, &mut rng, counts);
		let mut assignment = vec![0; counts.num_colors()];
		let mut sizes = Vec::new();

		let mut iterations = 0;
		let mut converged = false;
		while iterations < self.max_iter {
			update_assignments(&self.distance, counts.colors(), &centroids, &mut assignment);
			let (next, next_sizes) =
				update_centroids(&self.distance, counts, &centroids, &assignment, self.empty_clusters);
			iterations += 1;
			sizes = next_sizes;

			trace!(iterations, ?next, "updated centroids");

			if next == centroids {
				converged = true;
				break;
			}

			centroids = next;
		}

		if !converged {
			// The sizes above are for the centroids before the last update
			update_assignments(&self.distance, counts.colors(), &centroids, &mut assignment);
			sizes = cluster_sizes(counts, &assignment, k);
		}

		debug!(k, colors = counts.num_colors(), iterations, converged, "finished k-means");

		Ok(KmeansResult { centroids, counts: sizes, iterations, converged })
	}
}

impl<D: ColorDistance> Clusterer for Kmeans<D> {
	fn cluster(&self, counts: &ColorCounts, k: usize) -> Result<Vec<Srgba<u8>>> {
		self.run(counts, k).map(|result| result.centroids)
	}
}

/// Choose the starting centroids using the k-means++ algorithm, weighting each color by its pixel count.
///
/// `k` must be less than the number of colors.
fn kmeans_plus_plus<D: ColorDistance>(
	distance: &D,
	k: usize,
	rng: &mut impl Rng,
	counts: &ColorCounts,
) -> Vec<Srgba<u8>> {
	let colors = counts.colors();
	let mut chosen = vec![false; colors.len()];
	let mut centroids = Vec::with_capacity(k);

	// Pick the first centroid with a probability based off its pixel count
	#[allow(clippy::cast_precision_loss)]
	let mut weights = counts.counts().iter().map(|&n| n as f64).collect::<Vec<_>>();
	let first = match WeightedIndex::new(&weights) {
		Ok(sampler) => sampler.sample(rng),
		Err(_) => 0,
	};
	chosen[first] = true;
	centroids.push(colors[first]);

	// Pick each next centroid with a probability based off its pixel count
	// times the distance to its closest centroid
	let mut min_dist = vec![f64::INFINITY; colors.len()];
	while centroids.len() < k {
		let centroid = centroids[centroids.len() - 1];
		for (((min, weight), &color), &n) in min_dist.iter_mut().zip(&mut weights).zip(colors).zip(counts.counts()) {
			*min = f64::min(*min, distance.ranking_distance(color, centroid));
			#[allow(clippy::cast_precision_loss)]
			let n = n as f64;
			*weight = n * *min;
		}

		// Fails if all remaining colors exactly match a centroid under this metric
		let Ok(sampler) = WeightedIndex::new(&weights) else { break };
		let i = sampler.sample(rng);
		chosen[i] = true;
		centroids.push(colors[i]);
	}

	// Fill in any remaining centers with the first unused colors
	let remaining = k - centroids.len();
	centroids.extend(
		colors
			.iter()
			.zip(&chosen)
			.filter_map(|(&color, &chosen)| (!chosen).then_some(color))
			.take(remaining),
	);

	centroids
}

/// Index of the closest centroid, taking the first one on ties
fn nearest_centroid<D: ColorDistance>(distance: &D, color: Srgba<u8>, centroids: &[Srgba<u8>]) -> usize {
	let mut min_dist = f64::INFINITY;
	let mut min_center = 0;
	for (i, &centroid) in centroids.iter().enumerate() {
		let dist = distance.ranking_distance(color, centroid);
		if dist < min_dist {
			min_dist = dist;
			min_center = i;
		}
	}
	min_center
}

/// For each color, update its assigned center
fn update_assignments<D: ColorDistance>(
	distance: &D,
	colors: &[Srgba<u8>],
	centroids: &[Srgba<u8>],
	assignment: &mut [usize],
) {
	for (center, &color) in assignment.iter_mut().zip(colors) {
		*center = nearest_centroid(distance, color, centroids);
	}
}

/// The number of pixels assigned to each of the `k` centers
fn cluster_sizes(counts: &ColorCounts, assignment: &[usize], k: usize) -> Vec<u64> {
	let mut sizes = vec![0; k];
	for (&n, &center) in counts.counts().iter().zip(assignment) {
		sizes[center] += n;
	}
	sizes
}

/// Integer channel mean, rounded to the nearest integer with ties rounded down
fn channel_mean(sum: u64, total: u64) -> u8 {
	u8::try_from((2 * sum + total - 1) / (2 * total)).unwrap_or(u8::MAX)
}

/// Compute the weighted mean of each center's colors, returning the new centroids and the pixels in each center
fn update_centroids<D: ColorDistance>(
	distance: &D,
	counts: &ColorCounts,
	centroids: &[Srgba<u8>],
	assignment: &[usize],
	policy: EmptyClusterPolicy,
) -> (Vec<Srgba<u8>>, Vec<u64>) {
	let k = centroids.len();
	let mut sums = vec![[0u64; 4]; k];
	let mut totals = vec![0u64; k];

	for ((color, n), &center) in counts.pairs().zip(assignment) {
		let sum = &mut sums[center];
		sum[0] += n * u64::from(color.red);
		sum[1] += n * u64::from(color.green);
		sum[2] += n * u64::from(color.blue);
		sum[3] += n * u64::from(color.alpha);
		totals[center] += n;
	}

	let mut next = centroids.to_vec();
	let mut empty = Vec::new();
	for (i, (sum, &total)) in sums.iter().zip(&totals).enumerate() {
		if total == 0 {
			empty.push(i);
		} else {
			next[i] = Srgba::new(
				channel_mean(sum[0], total),
				channel_mean(sum[1], total),
				channel_mean(sum[2], total),
				channel_mean(sum[3], total),
			);
		}
	}

	if policy == EmptyClusterPolicy::Farthest {
		for i in empty {
			if let Some(color) = farthest_color(distance, counts.colors(), centroids, assignment, &next) {
				trace!(center = i, ?color, "reseeding empty center");
				next[i] = color;
			}
		}
	}

	(next, totals)
}

/// The color farthest from its assigned center that is not already one of the `taken` centroids
fn farthest_color<D: ColorDistance>(
	distance: &D,
	colors: &[Srgba<u8>],
	centroids: &[Srgba<u8>],
	assignment: &[usize],
	taken: &[Srgba<u8>],
) -> Option<Srgba<u8>> {
	let mut max_dist = 0.0;
	let mut farthest = None;
	for (&color, &center) in colors.iter().zip(assignment) {
		if taken.contains(&color) {
			continue;
		}

		let dist = distance.ranking_distance(color, centroids[center]);
		if farthest.is_none() || dist > max_dist {
			max_dist = dist;
			farthest = Some(color);
		}
	}
	farthest
}
