mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Config, EmbeddingProviderConfig, MEMORY_PATH, Providers, Search, Service, Sqlite, Storage,
};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::invalid("service.http_bind", "must be non-empty."));
	}
	if cfg.storage.sqlite.path.trim().is_empty() {
		return Err(Error::invalid("storage.sqlite.path", "must be non-empty."));
	}
	if cfg.storage.sqlite.pool_max_conns == 0 {
		return Err(Error::invalid("storage.sqlite.pool_max_conns", "must be greater than zero."));
	}

	let embedding = &cfg.providers.embedding;

	if embedding.dimensions == 0 {
		return Err(Error::invalid("providers.embedding.dimensions", "must be greater than zero."));
	}
	if embedding.timeout_ms == 0 {
		return Err(Error::invalid("providers.embedding.timeout_ms", "must be greater than zero."));
	}
	if embedding.api_key.trim().is_empty() {
		return Err(Error::invalid("providers.embedding.api_key", "must be non-empty."));
	}
	if embedding.api_base.trim().is_empty() {
		return Err(Error::invalid("providers.embedding.api_base", "must be non-empty."));
	}
	if embedding.model.trim().is_empty() {
		return Err(Error::invalid("providers.embedding.model", "must be non-empty."));
	}
	if embedding.default_headers.values().any(|value| !value.is_string()) {
		return Err(Error::invalid(
			"providers.embedding.default_headers",
			"values must be strings.",
		));
	}
	if cfg.search.top_n == 0 {
		return Err(Error::invalid("search.top_n", "must be greater than zero."));
	}
	if cfg.search.max_top_n < cfg.search.top_n {
		return Err(Error::invalid("search.max_top_n", "must be at least search.top_n."));
	}
	if !cfg.search.min_score.is_finite() {
		return Err(Error::invalid("search.min_score", "must be a finite number."));
	}
	if !(-1.0..=1.0).contains(&cfg.search.min_score) {
		return Err(Error::invalid("search.min_score", "must be in the range -1.0-1.0."));
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	let embedding = &mut cfg.providers.embedding;
	let api_base = embedding.api_base.trim().trim_end_matches('/');

	embedding.api_base = api_base.to_string();

	if !embedding.path.is_empty() && !embedding.path.starts_with('/') {
		embedding.path.insert(0, '/');
	}

	cfg.storage.sqlite.path = cfg.storage.sqlite.path.trim().to_string();
}
