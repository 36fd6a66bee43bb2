use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{Result, TaskItem, TaskService};
use tunetask_domain::{consistency, task::TaskStatus};
use tunetask_storage::{models::Task, tasks};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateRequest {
	pub owner_id: Uuid,
	pub title: String,
	#[serde(default)]
	pub description: String,
}

impl TaskService {
	/// Embeds the description, then stores the task and its vector in one insert.
	///
	/// Nothing is written when the title is blank or the provider fails.
	pub async fn create(&self, req: CreateRequest) -> Result<TaskItem> {
		let title = crate::validate_title(&req.title)?;
		let decision = consistency::reconcile(None, &req.description);
		let embedding = self.resolve_embedding(decision, &req.description).await?;
		let embedding_version = self.embedding_version();
		let now = OffsetDateTime::now_utc();
		let task = Task {
			task_id: Uuid::new_v4(),
			owner_id: req.owner_id,
			title,
			description: req.description,
			status: TaskStatus::Pending,
			created_at: now,
			updated_at: now,
			embedding: Some(embedding),
			embedding_version: Some(embedding_version.clone()),
			version: 1,
		};

		tasks::insert(&self.db, &task).await?;

		tracing::info!(task_id = %task.task_id, owner_id = %task.owner_id, "Task created.");

		Ok(TaskItem::new(task, &embedding_version))
	}
}
