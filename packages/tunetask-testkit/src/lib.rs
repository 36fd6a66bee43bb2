//! Fixtures shared by the workspace's integration tests.

use std::{env, fs, path::PathBuf};

use serde_json::Map;
use uuid::Uuid;

use tunetask_config::{
	Config, EmbeddingProviderConfig, MEMORY_PATH, Providers, Search, Service, Sqlite, Storage,
};

pub const TEST_DIMENSIONS: u32 = 3;

/// A task database file under the system temp dir, removed (with its WAL files) on drop.
pub struct TempDatabase {
	path: PathBuf,
}
impl TempDatabase {
	pub fn new() -> Self {
		let mut path = env::temp_dir();

		path.push(format!("tunetask_test_{}.db", Uuid::new_v4().simple()));

		Self { path }
	}

	pub fn path(&self) -> &PathBuf {
		&self.path
	}

	pub fn sqlite(&self, pool_max_conns: u32) -> Sqlite {
		Sqlite {
			path: self.path.to_string_lossy().into_owned(),
			pool_max_conns,
			busy_timeout_ms: 5_000,
		}
	}
}
impl Default for TempDatabase {
	fn default() -> Self {
		Self::new()
	}
}
impl Drop for TempDatabase {
	fn drop(&mut self) {
		for suffix in ["", "-wal", "-shm"] {
			let mut target = self.path.clone().into_os_string();

			target.push(suffix);

			if let Err(err) = fs::remove_file(&target)
				&& err.kind() != std::io::ErrorKind::NotFound
			{
				eprintln!("Test database cleanup warning: {err}.");
			}
		}
	}
}

pub fn memory_sqlite() -> Sqlite {
	Sqlite { path: MEMORY_PATH.to_string(), pool_max_conns: 1, busy_timeout_ms: 5_000 }
}

pub fn embedding_provider_config(dimensions: u32) -> EmbeddingProviderConfig {
	EmbeddingProviderConfig {
		provider_id: "test".to_string(),
		api_base: "http://127.0.0.1:9".to_string(),
		api_key: "test-key".to_string(),
		path: "/v1/embeddings".to_string(),
		model: "test-embedding".to_string(),
		dimensions,
		timeout_ms: 1_000,
		default_headers: Map::new(),
	}
}

/// A valid config on an in-memory database with [`TEST_DIMENSIONS`]-wide embeddings.
pub fn test_config() -> Config {
	Config {
		service: Service { http_bind: "127.0.0.1:0".to_string(), log_level: "info".to_string() },
		storage: Storage { sqlite: memory_sqlite() },
		providers: Providers { embedding: embedding_provider_config(TEST_DIMENSIONS) },
		search: Search::default(),
	}
}
