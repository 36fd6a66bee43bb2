use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result, TaskItem, TaskService};
use tunetask_domain::ranking::{self, RankOptions};
use tunetask_storage::{models::Task, tasks};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchRequest {
	pub query: String,
	/// Falls back to `search.top_n` from the config.
	#[serde(default)]
	pub top_n: Option<u32>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchItem {
	pub task: TaskItem,
	pub score: f32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchResponse {
	pub items: Vec<SearchItem>,
}

impl TaskService {
	/// Ranks stored tasks by cosine similarity between their description vectors and the query.
	///
	/// Results are ordered by score, ties by ascending `task_id`, and hold at most `top_n` items.
	pub async fn search(&self, req: SearchRequest) -> Result<SearchResponse> {
		if req.query.trim().is_empty() {
			return Err(Error::InvalidQuery { message: "query must not be empty.".to_string() });
		}

		let top_n = req.top_n.unwrap_or(self.cfg.search.top_n);

		if top_n == 0 || top_n > self.cfg.search.max_top_n {
			return Err(Error::Validation {
				message: format!("top_n must be between 1 and {}.", self.cfg.search.max_top_n),
			});
		}

		let query_vec = self.embed_text(&req.query).await.map_err(|err| {
			tracing::warn!(error = %err, "Query embedding failed.");

			Error::SearchUnavailable { message: err.to_string() }
		})?;
		let embedding_version = self.embedding_version();
		let corpus = tasks::list_with_embedding(&self.db, &embedding_version).await?;
		let options = RankOptions { top_n: top_n as usize, min_score: self.cfg.search.min_score };
		let ranked = ranking::rank(
			&query_vec,
			corpus.iter().filter_map(|task| {
				task.embedding_for(&embedding_version).map(|vec| (task.task_id, vec))
			}),
			options,
		);
		let mut by_id: HashMap<Uuid, Task> =
			corpus.into_iter().map(|task| (task.task_id, task)).collect();
		let items = ranked
			.into_iter()
			.filter_map(|hit| {
				by_id.remove(&hit.id).map(|task| SearchItem {
					task: TaskItem::new(task, &embedding_version),
					score: hit.score,
				})
			})
			.collect::<Vec<_>>();

		tracing::debug!(top_n, returned = items.len(), "Search finished.");

		Ok(SearchResponse { items })
	}
}
