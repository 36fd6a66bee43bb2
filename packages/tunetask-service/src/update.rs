use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{Result, TaskItem, TaskService};
use tunetask_domain::{
	consistency::{self, StoredText},
	task::TaskStatus,
};
use tunetask_storage::tasks;

/// Full replacement of a task's mutable fields.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UpdateRequest {
	pub task_id: Uuid,
	pub title: String,
	#[serde(default)]
	pub description: String,
	pub status: TaskStatus,
}

impl TaskService {
	/// Rewrites a task. The provider is called only when the description changed or the stored
	/// vector is unusable; otherwise the stored vector is written back unchanged.
	pub async fn update(&self, req: UpdateRequest) -> Result<TaskItem> {
		let title = crate::validate_title(&req.title)?;
		let mut task =
			tasks::get(&self.db, req.task_id).await?.ok_or_else(|| crate::not_found(req.task_id))?;
		let embedding_version = self.embedding_version();
		let existing = StoredText {
			description: &task.description,
			embedding: task.embedding_for(&embedding_version),
		};
		let decision = consistency::reconcile(Some(existing), &req.description);
		let fetched = decision.requires_provider();
		let embedding = self.resolve_embedding(decision, &req.description).await?;

		task.title = title;
		task.description = req.description;
		task.status = req.status;
		task.updated_at = OffsetDateTime::now_utc();
		task.embedding = Some(embedding);
		task.embedding_version = Some(embedding_version.clone());
		task.version = tasks::update(&self.db, &task).await?;

		tracing::info!(task_id = %task.task_id, reembedded = fetched, "Task updated.");

		Ok(TaskItem::new(task, &embedding_version))
	}
}
