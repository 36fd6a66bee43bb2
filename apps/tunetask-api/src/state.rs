use std::sync::Arc;

use tunetask_service::TaskService;
use tunetask_storage::db::Db;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<TaskService>,
}
impl AppState {
	pub async fn new(config: tunetask_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.sqlite).await?;

		db.ensure_schema().await?;

		Ok(Self::from_service(TaskService::new(config, db)))
	}

	pub fn from_service(service: TaskService) -> Self {
		Self { service: Arc::new(service) }
	}
}
