use time::OffsetDateTime;
use uuid::Uuid;

use crate::{Error, Result, vector};
use tunetask_domain::task::TaskStatus;

/// A `tasks` row as stored, before the status and vector are decoded.
#[derive(Debug, sqlx::FromRow)]
pub struct TaskRow {
	pub task_id: Uuid,
	pub owner_id: Uuid,
	pub title: String,
	pub description: String,
	pub status: String,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
	pub embedding: Option<Vec<u8>>,
	pub embedding_dim: Option<i64>,
	pub embedding_version: Option<String>,
	pub version: i64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Task {
	pub task_id: Uuid,
	pub owner_id: Uuid,
	pub title: String,
	pub description: String,
	pub status: TaskStatus,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
	/// `None` when no vector was stored or the stored bytes did not decode.
	pub embedding: Option<Vec<f32>>,
	pub embedding_version: Option<String>,
	pub version: i64,
}
impl Task {
	/// The embedding, if present and produced under `embedding_version`.
	pub fn embedding_for(&self, embedding_version: &str) -> Option<&[f32]> {
		match (&self.embedding, &self.embedding_version) {
			(Some(vec), Some(version)) if version == embedding_version => Some(vec.as_slice()),
			_ => None,
		}
	}
}
impl TryFrom<TaskRow> for Task {
	type Error = Error;

	fn try_from(row: TaskRow) -> Result<Self> {
		let status = row.status.parse::<TaskStatus>().map_err(|err| {
			Error::InvalidArgument(format!("Task {} has an unreadable status: {err}", row.task_id))
		})?;
		let embedding = match row.embedding.as_deref() {
			None => None,
			Some(raw) => {
				let expected_dim = row.embedding_dim.and_then(|dim| usize::try_from(dim).ok());

				match vector::decode(raw, expected_dim) {
					Ok(vec) => Some(vec),
					Err(err) => {
						tracing::warn!(
							task_id = %row.task_id,
							error = %err,
							"Stored embedding is unreadable. Treating the task as unembedded."
						);

						None
					},
				}
			},
		};

		Ok(Self {
			task_id: row.task_id,
			owner_id: row.owner_id,
			title: row.title,
			description: row.description,
			status,
			created_at: row.created_at,
			updated_at: row.updated_at,
			embedding,
			embedding_version: row.embedding_version,
			version: row.version,
		})
	}
}

/// Optional narrowing for [`crate::tasks::list`].
#[derive(Clone, Debug, Default)]
pub struct TaskFilter {
	pub owner_id: Option<Uuid>,
	pub status: Option<TaskStatus>,
}
