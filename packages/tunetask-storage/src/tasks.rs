//! Point CRUD and corpus reads for task records.
//!
//! Each write is a single SQL statement, so a reader sees a record either entirely before or
//! entirely after a write. Text and embedding columns always change together.

use sqlx::{QueryBuilder, Sqlite};
use uuid::Uuid;

use crate::{
	Error, Result,
	db::Db,
	models::{Task, TaskFilter, TaskRow},
	vector,
};

const TASK_COLUMNS: &str = "\
task_id,
	owner_id,
	title,
	description,
	status,
	created_at,
	updated_at,
	embedding,
	embedding_dim,
	embedding_version,
	version";

struct EmbeddingColumns<'a> {
	blob: Option<Vec<u8>>,
	dim: Option<i64>,
	version: Option<&'a str>,
}
impl<'a> EmbeddingColumns<'a> {
	fn encode(embedding: Option<&[f32]>, embedding_version: Option<&'a str>) -> Result<Self> {
		let Some(vec) = embedding else {
			return Ok(Self { blob: None, dim: None, version: None });
		};
		let dim = i64::try_from(vec.len())
			.map_err(|_| Error::InvalidArgument("Embedding is too long.".to_string()))?;

		Ok(Self { blob: Some(vector::encode(vec)?), dim: Some(dim), version: embedding_version })
	}
}

pub async fn get(db: &Db, task_id: Uuid) -> Result<Option<Task>> {
	let sql = format!("SELECT {TASK_COLUMNS}\nFROM tasks\nWHERE task_id = ?");
	let row: Option<TaskRow> =
		sqlx::query_as(&sql).bind(task_id).fetch_optional(&db.pool).await?;

	row.map(Task::try_from).transpose()
}

pub async fn insert(db: &Db, task: &Task) -> Result<()> {
	let embedding =
		EmbeddingColumns::encode(task.embedding.as_deref(), task.embedding_version.as_deref())?;

	sqlx::query(
		"\
INSERT INTO tasks (
	task_id,
	owner_id,
	title,
	description,
	status,
	created_at,
	updated_at,
	embedding,
	embedding_dim,
	embedding_version,
	version
)
VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
	)
	.bind(task.task_id)
	.bind(task.owner_id)
	.bind(task.title.as_str())
	.bind(task.description.as_str())
	.bind(task.status.as_str())
	.bind(task.created_at)
	.bind(task.updated_at)
	.bind(embedding.blob)
	.bind(embedding.dim)
	.bind(embedding.version)
	.bind(task.version)
	.execute(&db.pool)
	.await
	.map_err(|err| match err {
		sqlx::Error::Database(ref inner) if inner.is_unique_violation() =>
			Error::DuplicateId(task.task_id),
		other => Error::Sqlx(other),
	})?;

	Ok(())
}

/// Replaces the mutable fields of an existing task and returns its new version.
///
/// `task_id`, `owner_id`, and `created_at` are never rewritten.
pub async fn update(db: &Db, task: &Task) -> Result<i64> {
	let embedding =
		EmbeddingColumns::encode(task.embedding.as_deref(), task.embedding_version.as_deref())?;

	sqlx::query_scalar(
		"\
UPDATE tasks
SET
	title = ?,
	description = ?,
	status = ?,
	updated_at = ?,
	embedding = ?,
	embedding_dim = ?,
	embedding_version = ?,
	version = version + 1
WHERE task_id = ?
RETURNING version",
	)
	.bind(task.title.as_str())
	.bind(task.description.as_str())
	.bind(task.status.as_str())
	.bind(task.updated_at)
	.bind(embedding.blob)
	.bind(embedding.dim)
	.bind(embedding.version)
	.bind(task.task_id)
	.fetch_optional(&db.pool)
	.await?
	.ok_or(Error::NotFound(task.task_id))
}

/// Stores a regenerated embedding only if the task is still at `expected_version`.
///
/// Returns `false` when the task was rewritten or deleted in the meantime.
pub async fn update_embedding_if_version(
	db: &Db,
	task_id: Uuid,
	expected_version: i64,
	embedding: &[f32],
	embedding_version: &str,
) -> Result<bool> {
	let columns = EmbeddingColumns::encode(Some(embedding), Some(embedding_version))?;
	let result = sqlx::query(
		"\
UPDATE tasks
SET
	embedding = ?,
	embedding_dim = ?,
	embedding_version = ?,
	version = version + 1
WHERE task_id = ? AND version = ?",
	)
	.bind(columns.blob)
	.bind(columns.dim)
	.bind(columns.version)
	.bind(task_id)
	.bind(expected_version)
	.execute(&db.pool)
	.await?;

	Ok(result.rows_affected() == 1)
}

/// Removes the task row together with its embedding.
pub async fn delete(db: &Db, task_id: Uuid) -> Result<()> {
	let result = sqlx::query("DELETE FROM tasks WHERE task_id = ?")
		.bind(task_id)
		.execute(&db.pool)
		.await?;

	if result.rows_affected() == 0 {
		return Err(Error::NotFound(task_id));
	}

	Ok(())
}

pub async fn list(db: &Db, filter: &TaskFilter) -> Result<Vec<Task>> {
	let mut builder: QueryBuilder<'_, Sqlite> =
		QueryBuilder::new(format!("SELECT {TASK_COLUMNS}\nFROM tasks\nWHERE 1 = 1"));

	if let Some(owner_id) = filter.owner_id {
		builder.push(" AND owner_id = ");
		builder.push_bind(owner_id);
	}
	if let Some(status) = filter.status {
		builder.push(" AND status = ");
		builder.push_bind(status.as_str());
	}

	builder.push(" ORDER BY created_at, task_id");

	let rows: Vec<TaskRow> = builder.build_query_as().fetch_all(&db.pool).await?;

	rows.into_iter().map(Task::try_from).collect()
}

/// The ranking corpus: tasks whose stored vector decodes and matches `embedding_version`.
pub async fn list_with_embedding(db: &Db, embedding_version: &str) -> Result<Vec<Task>> {
	let sql = format!(
		"SELECT {TASK_COLUMNS}\nFROM tasks\nWHERE embedding IS NOT NULL AND embedding_version = ?"
	);
	let rows: Vec<TaskRow> =
		sqlx::query_as(&sql).bind(embedding_version).fetch_all(&db.pool).await?;
	let mut tasks = Vec::with_capacity(rows.len());

	for row in rows {
		let task = Task::try_from(row)?;

		if task.embedding.is_some() {
			tasks.push(task);
		}
	}

	Ok(tasks)
}

/// Tasks that [`list_with_embedding`] would skip: no vector, an unreadable one, or one from
/// another embedding version.
pub async fn list_missing_embedding(db: &Db, embedding_version: &str) -> Result<Vec<Task>> {
	let tasks = list(db, &TaskFilter::default()).await?;

	Ok(tasks.into_iter().filter(|task| task.embedding_for(embedding_version).is_none()).collect())
}
