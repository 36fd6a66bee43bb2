use serde::{Deserialize, Serialize};

use crate::{Result, TaskService};
use tunetask_storage::tasks;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReembedReport {
	pub scanned: u64,
	pub rebuilt: u64,
	/// Tasks rewritten by a caller while their vector was being fetched.
	pub skipped: u64,
	pub failed: u64,
}

impl TaskService {
	/// Regenerates vectors for tasks that are missing from search: never embedded, unreadable,
	/// or embedded under a previous provider configuration.
	///
	/// Each write is conditional on the task version read at scan time, so a concurrent update
	/// always wins.
	pub async fn reembed_missing(&self) -> Result<ReembedReport> {
		let embedding_version = self.embedding_version();
		let pending = tasks::list_missing_embedding(&self.db, &embedding_version).await?;
		let mut report = ReembedReport::default();

		for task in pending {
			report.scanned += 1;

			let vec = match self.embed_text(&task.description).await {
				Ok(vec) => vec,
				Err(err) => {
					tracing::warn!(task_id = %task.task_id, error = %err, "Re-embedding failed.");

					report.failed += 1;

					continue;
				},
			};
			let written = tasks::update_embedding_if_version(
				&self.db,
				task.task_id,
				task.version,
				&vec,
				&embedding_version,
			)
			.await?;

			if written {
				report.rebuilt += 1;
			} else {
				tracing::debug!(task_id = %task.task_id, "Task changed during re-embedding.");

				report.skipped += 1;
			}
		}

		tracing::info!(
			scanned = report.scanned,
			rebuilt = report.rebuilt,
			skipped = report.skipped,
			failed = report.failed,
			"Re-embedding finished."
		);

		Ok(report)
	}
}
