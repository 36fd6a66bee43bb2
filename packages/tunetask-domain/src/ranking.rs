//! Exhaustive cosine ranking over an in-memory candidate snapshot.
//!
//! Every candidate is scored against the query, so a search costs `O(corpus * D)`. Selection keeps
//! a bounded min-heap of `top_n` entries. An approximate index can replace [`rank`] as long as it
//! keeps the same contract: invalid candidates are skipped, scores never increase down the list,
//! ties resolve by ascending id, and a short corpus yields a short result instead of an error.

use std::{
	cmp::{Ordering, Reverse},
	collections::BinaryHeap,
	fmt::Debug,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SimilarityError {
	#[error("Vector dimensions differ: query has {query}, candidate has {candidate}.")]
	DimensionMismatch { query: usize, candidate: usize },
	#[error("Vectors are empty.")]
	Empty,
	#[error("Vector has zero magnitude.")]
	ZeroMagnitude,
	#[error("Similarity is not a finite number.")]
	NonFinite,
}

#[derive(Clone, Copy, Debug)]
pub struct RankOptions {
	pub top_n: usize,
	/// Scores strictly below this value are dropped. `-1.0` keeps every valid candidate.
	pub min_score: f32,
}
impl Default for RankOptions {
	fn default() -> Self {
		Self { top_n: 5, min_score: -1.0 }
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct Ranked<Id> {
	pub id: Id,
	pub score: f32,
}

struct Entry<Id> {
	score: f32,
	id: Id,
}
impl<Id: Ord> Ord for Entry<Id> {
	// Greater means better: higher score first, then the smaller id.
	fn cmp(&self, other: &Self) -> Ordering {
		self.score.total_cmp(&other.score).then_with(|| other.id.cmp(&self.id))
	}
}
impl<Id: Ord> PartialOrd for Entry<Id> {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}
impl<Id: Ord> PartialEq for Entry<Id> {
	fn eq(&self, other: &Self) -> bool {
		self.cmp(other) == Ordering::Equal
	}
}
impl<Id: Ord> Eq for Entry<Id> {}

/// Cosine similarity accumulated in `f64` and clamped to `[-1, 1]`.
pub fn cosine_similarity(lhs: &[f32], rhs: &[f32]) -> Result<f32, SimilarityError> {
	if lhs.len() != rhs.len() {
		return Err(SimilarityError::DimensionMismatch { query: lhs.len(), candidate: rhs.len() });
	}
	if lhs.is_empty() {
		return Err(SimilarityError::Empty);
	}

	let mut dot = 0.0_f64;
	let mut lhs_norm = 0.0_f64;
	let mut rhs_norm = 0.0_f64;

	for (l, r) in lhs.iter().zip(rhs.iter()) {
		let (l, r) = (f64::from(*l), f64::from(*r));

		dot += l * r;
		lhs_norm += l * l;
		rhs_norm += r * r;
	}

	if lhs_norm == 0.0 || rhs_norm == 0.0 {
		return Err(SimilarityError::ZeroMagnitude);
	}

	let score = dot / (lhs_norm.sqrt() * rhs_norm.sqrt());

	if !score.is_finite() {
		return Err(SimilarityError::NonFinite);
	}

	Ok(score.clamp(-1.0, 1.0) as f32)
}

pub fn rank<'a, Id, I>(query: &[f32], candidates: I, options: RankOptions) -> Vec<Ranked<Id>>
where
	Id: Ord + Debug,
	I: IntoIterator<Item = (Id, &'a [f32])>,
{
	if options.top_n == 0 {
		return Vec::new();
	}
	if !is_rankable(query) {
		tracing::warn!(dim = query.len(), "Query vector is empty, zero, or non-finite.");

		return Vec::new();
	}

	let mut heap = BinaryHeap::with_capacity(options.top_n.saturating_add(1));
	let mut scanned = 0_usize;
	let mut discarded = 0_usize;

	for (id, vec) in candidates {
		scanned += 1;

		let score = match cosine_similarity(query, vec) {
			Ok(score) => score,
			Err(err @ SimilarityError::DimensionMismatch { .. }) => {
				tracing::warn!(candidate = ?id, error = %err, "Discarding ranking candidate.");

				discarded += 1;

				continue;
			},
			Err(err) => {
				tracing::debug!(candidate = ?id, error = %err, "Discarding ranking candidate.");

				discarded += 1;

				continue;
			},
		};

		if score < options.min_score {
			continue;
		}

		heap.push(Reverse(Entry { score, id }));

		if heap.len() > options.top_n {
			heap.pop();
		}
	}

	tracing::debug!(scanned, discarded, kept = heap.len(), "Ranking pass finished.");

	heap.into_sorted_vec()
		.into_iter()
		.map(|Reverse(entry)| Ranked { id: entry.id, score: entry.score })
		.collect()
}

fn is_rankable(vec: &[f32]) -> bool {
	!vec.is_empty() && vec.iter().all(|value| value.is_finite()) && vec.iter().any(|v| *v != 0.0)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn options(top_n: usize) -> RankOptions {
		RankOptions { top_n, ..Default::default() }
	}

	#[test]
	fn identical_direction_scores_one() {
		let score = cosine_similarity(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]).expect("score failed");

		assert!((score - 1.0).abs() < 1e-6);
	}

	#[test]
	fn orthogonal_and_opposite_vectors() {
		assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), Ok(0.0));
		assert_eq!(cosine_similarity(&[1.0, 0.0], &[-3.0, 0.0]), Ok(-1.0));
	}

	#[test]
	fn invalid_pairs_are_errors() {
		assert_eq!(
			cosine_similarity(&[1.0, 0.0], &[1.0, 0.0, 0.0]),
			Err(SimilarityError::DimensionMismatch { query: 2, candidate: 3 })
		);
		assert_eq!(cosine_similarity(&[], &[]), Err(SimilarityError::Empty));
		assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), Err(SimilarityError::ZeroMagnitude));
		assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 0.0]), Err(SimilarityError::ZeroMagnitude));
		assert_eq!(
			cosine_similarity(&[f32::NAN, 1.0], &[1.0, 1.0]),
			Err(SimilarityError::NonFinite)
		);
	}

	#[test]
	fn ranks_by_descending_score() {
		let query = [0.1, 0.2, 0.3];
		let t1 = [0.11, 0.21, 0.29];
		let t2 = [0.9, 0.0, 0.0];
		let ranked = rank(&query, [(2_u32, &t2[..]), (1, &t1[..])], options(5));

		assert_eq!(ranked.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 2]);
		assert!(ranked[0].score > ranked[1].score);
	}

	#[test]
	fn truncates_to_top_n() {
		let query = [1.0, 0.0];
		let vecs = [[1.0, 0.0], [1.0, 0.1], [1.0, 0.5], [0.0, 1.0]];
		let ranked = rank(&query, vecs.iter().enumerate().map(|(i, v)| (i, &v[..])), options(2));

		assert_eq!(ranked.iter().map(|r| r.id).collect::<Vec<_>>(), vec![0, 1]);
	}

	#[test]
	fn short_corpus_returns_everything_valid() {
		let query = [1.0, 1.0];
		let good = [1.0, 0.0];
		let zero = [0.0, 0.0];
		let wrong_dim = [1.0, 1.0, 1.0];
		let ranked = rank(
			&query,
			[("good", &good[..]), ("zero", &zero[..]), ("wrong_dim", &wrong_dim[..])],
			options(5),
		);

		assert_eq!(ranked.len(), 1);
		assert_eq!(ranked[0].id, "good");
	}

	#[test]
	fn all_candidates_invalid_is_empty_not_error() {
		let query = [1.0, 1.0];
		let zero = [0.0, 0.0];
		let ranked = rank(&query, [(1, &zero[..]), (2, &zero[..])], options(3));

		assert!(ranked.is_empty());
	}

	#[test]
	fn ties_break_by_ascending_id() {
		let query = [1.0, 0.0];
		let same = [2.0, 0.0];
		let ranked =
			rank(&query, [(9, &same[..]), (3, &same[..]), (7, &same[..])], options(2));

		assert_eq!(ranked.iter().map(|r| r.id).collect::<Vec<_>>(), vec![3, 7]);
	}

	#[test]
	fn zero_query_ranks_nothing() {
		let query = [0.0, 0.0];
		let vec = [1.0, 0.0];

		assert!(rank(&query, [(1, &vec[..])], options(3)).is_empty());
	}

	#[test]
	fn zero_top_n_ranks_nothing() {
		let query = [1.0, 0.0];
		let vec = [1.0, 0.0];

		assert!(rank(&query, [(1, &vec[..])], options(0)).is_empty());
	}

	#[test]
	fn min_score_filters_weak_candidates() {
		let query = [1.0, 0.0];
		let close = [1.0, 0.1];
		let far = [-1.0, 0.2];
		let ranked = rank(
			&query,
			[(1, &close[..]), (2, &far[..])],
			RankOptions { top_n: 5, min_score: 0.0 },
		);

		assert_eq!(ranked.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1]);
	}
}
