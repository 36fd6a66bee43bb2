use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Sqlx(#[from] sqlx::Error),
	#[error("Invalid argument: {0}")]
	InvalidArgument(String),
	#[error("Task {0} not found.")]
	NotFound(Uuid),
	#[error("Task {0} already exists.")]
	DuplicateId(Uuid),
	#[error("Corrupt vector: {0}")]
	CorruptVector(String),
}
