//! Embedding column codec: consecutive little-endian `f32` values.
//!
//! The encoding is bit-exact, so `decode(&encode(v)?, Some(v.len()))? == v` for every finite `v`.

use crate::{Error, Result};

const F32_BYTES: usize = std::mem::size_of::<f32>();

pub fn encode(vec: &[f32]) -> Result<Vec<u8>> {
	if vec.is_empty() {
		return Err(Error::InvalidArgument("Embedding must not be empty.".to_string()));
	}
	if let Some(index) = vec.iter().position(|value| !value.is_finite()) {
		return Err(Error::InvalidArgument(format!(
			"Embedding value at index {index} is not finite."
		)));
	}

	let mut out = Vec::with_capacity(vec.len() * F32_BYTES);

	for value in vec {
		out.extend_from_slice(&value.to_le_bytes());
	}

	Ok(out)
}

/// Decodes a stored embedding. `expected_dim` is the dimension recorded next to the blob.
pub fn decode(raw: &[u8], expected_dim: Option<usize>) -> Result<Vec<f32>> {
	if raw.is_empty() {
		return Err(Error::CorruptVector("Embedding blob is empty.".to_string()));
	}
	if raw.len() % F32_BYTES != 0 {
		return Err(Error::CorruptVector(format!(
			"Embedding blob length {} is not a multiple of {F32_BYTES}.",
			raw.len()
		)));
	}

	let dim = raw.len() / F32_BYTES;

	if let Some(expected) = expected_dim
		&& expected != dim
	{
		return Err(Error::CorruptVector(format!(
			"Embedding blob holds {dim} values, expected {expected}."
		)));
	}

	let mut vec = Vec::with_capacity(dim);

	for chunk in raw.chunks_exact(F32_BYTES) {
		let &[b0, b1, b2, b3] = chunk else {
			return Err(Error::CorruptVector("Embedding blob is truncated.".to_string()));
		};
		let value = f32::from_le_bytes([b0, b1, b2, b3]);

		if !value.is_finite() {
			return Err(Error::CorruptVector(format!(
				"Embedding value at index {} is not finite.",
				vec.len()
			)));
		}

		vec.push(value);
	}

	Ok(vec)
}
