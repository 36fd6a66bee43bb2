use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{Result, TaskService};
use tunetask_domain::task::TaskStatus;
use tunetask_storage::{
	models::{Task, TaskFilter},
	tasks,
};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ListRequest {
	pub owner_id: Option<Uuid>,
	pub status: Option<TaskStatus>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ListResponse {
	pub items: Vec<TaskItem>,
}

/// Caller-facing view of a task. The vector itself never leaves the service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TaskItem {
	pub task_id: Uuid,
	pub owner_id: Uuid,
	pub title: String,
	pub description: String,
	pub status: TaskStatus,
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
	#[serde(with = "crate::time_serde")]
	pub updated_at: OffsetDateTime,
	/// Whether the task currently takes part in search.
	pub searchable: bool,
	pub version: i64,
}
impl TaskItem {
	pub(crate) fn new(task: Task, embedding_version: &str) -> Self {
		let searchable = task.embedding_for(embedding_version).is_some();

		Self {
			task_id: task.task_id,
			owner_id: task.owner_id,
			title: task.title,
			description: task.description,
			status: task.status,
			created_at: task.created_at,
			updated_at: task.updated_at,
			searchable,
			version: task.version,
		}
	}
}

impl TaskService {
	pub async fn get(&self, task_id: Uuid) -> Result<TaskItem> {
		let task = tasks::get(&self.db, task_id).await?.ok_or_else(|| crate::not_found(task_id))?;

		Ok(TaskItem::new(task, &self.embedding_version()))
	}

	pub async fn list(&self, req: ListRequest) -> Result<ListResponse> {
		let filter = TaskFilter { owner_id: req.owner_id, status: req.status };
		let embedding_version = self.embedding_version();
		let items = tasks::list(&self.db, &filter)
			.await?
			.into_iter()
			.map(|task| TaskItem::new(task, &embedding_version))
			.collect();

		Ok(ListResponse { items })
	}
}
