use uuid::Uuid;

use crate::{Result, TaskService};
use tunetask_storage::tasks;

impl TaskService {
	/// Removes the task and its vector. Later searches never return it.
	pub async fn delete(&self, task_id: Uuid) -> Result<()> {
		tasks::delete(&self.db, task_id).await?;

		tracing::info!(task_id = %task_id, "Task deleted.");

		Ok(())
	}
}
