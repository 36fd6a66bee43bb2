pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Validation failed: {message}")]
	Validation { message: String },
	#[error("Invalid query: {message}")]
	InvalidQuery { message: String },
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Duplicate id: {message}")]
	DuplicateId { message: String },
	#[error("Provider error: {message}")]
	Provider { message: String },
	#[error("Search unavailable: {message}")]
	SearchUnavailable { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl From<tunetask_storage::Error> for Error {
	fn from(err: tunetask_storage::Error) -> Self {
		match err {
			tunetask_storage::Error::NotFound(_) => Self::NotFound { message: err.to_string() },
			tunetask_storage::Error::DuplicateId(_) =>
				Self::DuplicateId { message: err.to_string() },
			tunetask_storage::Error::Sqlx(_)
			| tunetask_storage::Error::InvalidArgument(_)
			| tunetask_storage::Error::CorruptVector(_) => Self::Storage { message: err.to_string() },
		}
	}
}

impl From<tunetask_providers::Error> for Error {
	fn from(err: tunetask_providers::Error) -> Self {
		Self::Provider { message: err.to_string() }
	}
}
