pub mod admin;
pub mod create;
pub mod delete;
pub mod list;
pub mod search;
pub mod time_serde;
pub mod update;

mod error;

pub use admin::ReembedReport;
pub use create::CreateRequest;
pub use error::{Error, Result};
pub use list::{ListRequest, ListResponse, TaskItem};
pub use search::{SearchItem, SearchRequest, SearchResponse};
pub use update::UpdateRequest;

use std::{future::Future, pin::Pin, sync::Arc, time::Duration};

use uuid::Uuid;

use tunetask_config::{Config, EmbeddingProviderConfig};
use tunetask_domain::consistency::EmbeddingDecision;
use tunetask_providers::embedding;
use tunetask_storage::db::Db;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		text: &'a str,
	) -> BoxFuture<'a, tunetask_providers::Result<Vec<f32>>>;
}

#[derive(Clone)]
pub struct Providers {
	pub embedding: Arc<dyn EmbeddingProvider>,
}
impl Providers {
	pub fn new(embedding: Arc<dyn EmbeddingProvider>) -> Self {
		Self { embedding }
	}
}
impl Default for Providers {
	fn default() -> Self {
		Self { embedding: Arc::new(DefaultProviders) }
	}
}

struct DefaultProviders;
impl EmbeddingProvider for DefaultProviders {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		text: &'a str,
	) -> BoxFuture<'a, tunetask_providers::Result<Vec<f32>>> {
		Box::pin(async move {
			let texts = [text.to_string()];
			let mut vectors = embedding::embed(cfg, &texts).await?;

			vectors.pop().ok_or_else(|| tunetask_providers::Error::InvalidResponse {
				message: "Embedding provider returned no vectors.".to_string(),
			})
		})
	}
}

/// Task CRUD and semantic search over one database and one embedding provider.
pub struct TaskService {
	pub cfg: Config,
	pub db: Db,
	pub providers: Providers,
}
impl TaskService {
	pub fn new(cfg: Config, db: Db) -> Self {
		Self { cfg, db, providers: Providers::default() }
	}

	pub fn with_providers(cfg: Config, db: Db, providers: Providers) -> Self {
		Self { cfg, db, providers }
	}

	/// Identifies the vector space of the configured provider. Only vectors stored under this
	/// value are compared with each other.
	pub fn embedding_version(&self) -> String {
		embedding_version(&self.cfg.providers.embedding)
	}

	/// One provider round trip, bounded by `timeout_ms`. The returned vector has the configured
	/// dimension and only finite values.
	pub(crate) async fn embed_text(&self, text: &str) -> Result<Vec<f32>> {
		let cfg = &self.cfg.providers.embedding;
		let call = self.providers.embedding.embed(cfg, text);
		let vec = tokio::time::timeout(Duration::from_millis(cfg.timeout_ms), call)
			.await
			.map_err(|_| Error::Provider {
				message: format!("Embedding provider timed out after {} ms.", cfg.timeout_ms),
			})??;

		validate_vector(&vec, cfg.dimensions as usize)?;

		Ok(vec)
	}

	pub(crate) async fn resolve_embedding(
		&self,
		decision: EmbeddingDecision<'_>,
		description: &str,
	) -> Result<Vec<f32>> {
		match decision {
			EmbeddingDecision::Reuse(vec) => Ok(vec.to_vec()),
			EmbeddingDecision::Fetch => self.embed_text(description).await,
		}
	}
}

pub fn embedding_version(cfg: &EmbeddingProviderConfig) -> String {
	format!("{}:{}:{}", cfg.provider_id, cfg.model, cfg.dimensions)
}

pub(crate) fn validate_title(title: &str) -> Result<String> {
	tunetask_domain::task::normalize_title(title)
		.map(str::to_string)
		.ok_or_else(|| Error::Validation { message: "title must not be empty.".to_string() })
}

pub(crate) fn not_found(task_id: Uuid) -> Error {
	Error::NotFound { message: format!("Task {task_id} not found.") }
}

fn validate_vector(vec: &[f32], dimensions: usize) -> Result<()> {
	if vec.len() != dimensions {
		return Err(Error::Provider {
			message: format!(
				"Embedding vector has {} dimensions, expected {dimensions}.",
				vec.len()
			),
		});
	}
	if vec.iter().any(|value| !value.is_finite()) {
		return Err(Error::Provider {
			message: "Embedding vector contains non-finite values.".to_string(),
		});
	}

	Ok(())
}
