use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub providers: Providers,
	#[serde(default)]
	pub search: Search,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Storage {
	pub sqlite: Sqlite,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Sqlite {
	/// Database file path. `:memory:` opens a private in-memory database on a single connection.
	pub path: String,
	pub pool_max_conns: u32,
	#[serde(default = "default_busy_timeout_ms")]
	pub busy_timeout_ms: u64,
}
impl Sqlite {
	pub fn is_memory(&self) -> bool {
		self.path == MEMORY_PATH
	}
}

#[derive(Clone, Debug, Deserialize)]
pub struct Providers {
	pub embedding: EmbeddingProviderConfig,
}

#[derive(Clone, Debug, Deserialize)]
pub struct EmbeddingProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub dimensions: u32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Search {
	/// Result count used when a search request does not ask for one.
	pub top_n: u32,
	/// Upper bound a caller may request.
	pub max_top_n: u32,
	/// Candidates scoring below this cosine similarity are dropped.
	pub min_score: f32,
}
impl Default for Search {
	fn default() -> Self {
		Self { top_n: 5, max_top_n: 50, min_score: -1.0 }
	}
}

pub const MEMORY_PATH: &str = ":memory:";

fn default_busy_timeout_ms() -> u64 {
	5_000
}
