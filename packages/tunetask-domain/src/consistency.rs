//! Decides whether a task write needs a fresh embedding.
//!
//! The embedding of a task is derived from its description only. A write that keeps the
//! description, and whose stored vector is still usable, carries that vector forward. Every
//! other write asks the embedding provider exactly once.

/// The persisted text and vector of an existing task.
#[derive(Clone, Copy, Debug)]
pub struct StoredText<'a> {
	pub description: &'a str,
	/// `None` when the vector is missing, unreadable, or from another embedding version.
	pub embedding: Option<&'a [f32]>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EmbeddingDecision<'a> {
	Fetch,
	Reuse(&'a [f32]),
}
impl EmbeddingDecision<'_> {
	pub fn requires_provider(&self) -> bool {
		matches!(self, Self::Fetch)
	}
}

pub fn reconcile<'a>(
	existing: Option<StoredText<'a>>,
	new_description: &str,
) -> EmbeddingDecision<'a> {
	let Some(existing) = existing else {
		return EmbeddingDecision::Fetch;
	};

	if existing.description != new_description {
		return EmbeddingDecision::Fetch;
	}

	match existing.embedding {
		Some(vec) if !vec.is_empty() => EmbeddingDecision::Reuse(vec),
		_ => EmbeddingDecision::Fetch,
	}
}
