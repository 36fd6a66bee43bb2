use time::OffsetDateTime;
use uuid::Uuid;

use tunetask_domain::task::TaskStatus;
use tunetask_storage::{
	Error,
	db::Db,
	models::{Task, TaskFilter},
	tasks,
};
use tunetask_testkit::TempDatabase;

const VERSION: &str = "test:test-embedding:3";

async fn memory_db() -> Db {
	let db = Db::connect(&tunetask_testkit::memory_sqlite())
		.await
		.expect("Failed to open in-memory database.");

	db.ensure_schema().await.expect("Failed to ensure schema.");

	db
}

fn task(owner_id: Uuid, title: &str, description: &str, embedding: Option<Vec<f32>>) -> Task {
	let now = OffsetDateTime::now_utc();
	let embedding_version = embedding.as_ref().map(|_| VERSION.to_string());

	Task {
		task_id: Uuid::new_v4(),
		owner_id,
		title: title.to_string(),
		description: description.to_string(),
		status: TaskStatus::Pending,
		created_at: now,
		updated_at: now,
		embedding,
		embedding_version,
		version: 1,
	}
}

#[tokio::test]
async fn insert_then_get_round_trips() {
	let db = memory_db().await;
	let stored = task(Uuid::new_v4(), "Focus", "deep focus coding", Some(vec![0.11, 0.21, 0.29]));

	tasks::insert(&db, &stored).await.expect("Failed to insert task.");

	let loaded = tasks::get(&db, stored.task_id)
		.await
		.expect("Failed to load task.")
		.expect("Task must exist.");

	assert_eq!(loaded.title, "Focus");
	assert_eq!(loaded.status, TaskStatus::Pending);
	assert_eq!(loaded.embedding, Some(vec![0.11, 0.21, 0.29]));
	assert_eq!(loaded.embedding_for(VERSION), Some(&[0.11_f32, 0.21, 0.29][..]));
	assert_eq!(loaded.embedding_for("other:model:3"), None);
}

#[tokio::test]
async fn duplicate_ids_are_rejected() {
	let db = memory_db().await;
	let stored = task(Uuid::new_v4(), "Once", "", None);

	tasks::insert(&db, &stored).await.expect("Failed to insert task.");

	let err = tasks::insert(&db, &stored).await.expect_err("Expected duplicate id error.");

	assert!(matches!(err, Error::DuplicateId(id) if id == stored.task_id), "Unexpected: {err}");
}

#[tokio::test]
async fn update_and_delete_require_existing_rows() {
	let db = memory_db().await;
	let missing = task(Uuid::new_v4(), "Ghost", "", None);

	assert!(matches!(tasks::update(&db, &missing).await, Err(Error::NotFound(_))));
	assert!(matches!(tasks::delete(&db, missing.task_id).await, Err(Error::NotFound(_))));
	assert!(tasks::get(&db, missing.task_id).await.expect("Failed to query.").is_none());
}

#[tokio::test]
async fn update_rewrites_text_and_vector_together() {
	let db = memory_db().await;
	let mut stored = task(Uuid::new_v4(), "Shop", "buy groceries", Some(vec![0.9, 0.0, 0.0]));

	tasks::insert(&db, &stored).await.expect("Failed to insert task.");

	stored.description = "buy flowers".to_string();
	stored.status = TaskStatus::InProgress;
	stored.embedding = Some(vec![0.1, 0.8, 0.0]);

	let version = tasks::update(&db, &stored).await.expect("Failed to update task.");
	let loaded =
		tasks::get(&db, stored.task_id).await.expect("Failed to load.").expect("Task must exist.");

	assert_eq!(version, 2);
	assert_eq!(loaded.version, 2);
	assert_eq!(loaded.description, "buy flowers");
	assert_eq!(loaded.status, TaskStatus::InProgress);
	assert_eq!(loaded.embedding, Some(vec![0.1, 0.8, 0.0]));
}

#[tokio::test]
async fn delete_removes_vector_with_row() {
	let db = memory_db().await;
	let stored = task(Uuid::new_v4(), "Focus", "deep focus", Some(vec![0.1, 0.2, 0.3]));

	tasks::insert(&db, &stored).await.expect("Failed to insert task.");
	tasks::delete(&db, stored.task_id).await.expect("Failed to delete task.");

	assert!(tasks::get(&db, stored.task_id).await.expect("Failed to query.").is_none());
	assert!(
		tasks::list_with_embedding(&db, VERSION).await.expect("Failed to list corpus.").is_empty()
	);
}

#[tokio::test]
async fn corrupt_vectors_are_listed_but_not_ranked() {
	let db = memory_db().await;
	let healthy = task(Uuid::new_v4(), "Healthy", "a", Some(vec![1.0, 0.0, 0.0]));
	let corrupt = task(Uuid::new_v4(), "Corrupt", "b", Some(vec![0.0, 1.0, 0.0]));

	tasks::insert(&db, &healthy).await.expect("Failed to insert task.");
	tasks::insert(&db, &corrupt).await.expect("Failed to insert task.");

	sqlx::query("UPDATE tasks SET embedding = ? WHERE task_id = ?")
		.bind(vec![1_u8, 2, 3])
		.bind(corrupt.task_id)
		.execute(&db.pool)
		.await
		.expect("Failed to corrupt vector.");

	let loaded =
		tasks::get(&db, corrupt.task_id).await.expect("Failed to load.").expect("Task must exist.");

	assert_eq!(loaded.title, "Corrupt");
	assert_eq!(loaded.embedding, None);

	let corpus = tasks::list_with_embedding(&db, VERSION).await.expect("Failed to list corpus.");

	assert_eq!(corpus.iter().map(|t| t.task_id).collect::<Vec<_>>(), vec![healthy.task_id]);

	let missing =
		tasks::list_missing_embedding(&db, VERSION).await.expect("Failed to list missing.");

	assert_eq!(missing.iter().map(|t| t.task_id).collect::<Vec<_>>(), vec![corrupt.task_id]);
	assert_eq!(tasks::list(&db, &TaskFilter::default()).await.expect("Failed to list.").len(), 2);
}

#[tokio::test]
async fn truncated_vectors_fail_the_dimension_check() {
	let db = memory_db().await;
	let stored = task(Uuid::new_v4(), "Short", "a", Some(vec![1.0, 0.0, 0.0]));

	tasks::insert(&db, &stored).await.expect("Failed to insert task.");

	sqlx::query("UPDATE tasks SET embedding_dim = 4 WHERE task_id = ?")
		.bind(stored.task_id)
		.execute(&db.pool)
		.await
		.expect("Failed to alter dimension.");

	assert!(
		tasks::list_with_embedding(&db, VERSION).await.expect("Failed to list corpus.").is_empty()
	);
}

#[tokio::test]
async fn corpus_excludes_other_versions_and_unembedded_tasks() {
	let db = memory_db().await;
	let current = task(Uuid::new_v4(), "Current", "a", Some(vec![1.0, 0.0, 0.0]));
	let mut stale = task(Uuid::new_v4(), "Stale", "b", Some(vec![0.0, 1.0, 0.0]));
	let bare = task(Uuid::new_v4(), "Bare", "c", None);

	stale.embedding_version = Some("old:model:3".to_string());

	for t in [&current, &stale, &bare] {
		tasks::insert(&db, t).await.expect("Failed to insert task.");
	}

	let corpus = tasks::list_with_embedding(&db, VERSION).await.expect("Failed to list corpus.");

	assert_eq!(corpus.iter().map(|t| t.task_id).collect::<Vec<_>>(), vec![current.task_id]);

	let mut missing: Vec<Uuid> = tasks::list_missing_embedding(&db, VERSION)
		.await
		.expect("Failed to list missing.")
		.into_iter()
		.map(|t| t.task_id)
		.collect();
	let mut expected = vec![stale.task_id, bare.task_id];

	missing.sort();
	expected.sort();

	assert_eq!(missing, expected);
}

#[tokio::test]
async fn list_filters_by_owner_and_status() {
	let db = memory_db().await;
	let alice = Uuid::new_v4();
	let bob = Uuid::new_v4();
	let first = task(alice, "One", "", None);
	let mut second = task(alice, "Two", "", None);
	let third = task(bob, "Three", "", None);

	second.status = TaskStatus::Completed;

	for t in [&first, &second, &third] {
		tasks::insert(&db, t).await.expect("Failed to insert task.");
	}

	let owned = tasks::list(&db, &TaskFilter { owner_id: Some(alice), status: None })
		.await
		.expect("Failed to list.");

	assert_eq!(owned.len(), 2);
	assert!(owned.iter().all(|t| t.owner_id == alice));

	let done = tasks::list(
		&db,
		&TaskFilter { owner_id: Some(alice), status: Some(TaskStatus::Completed) },
	)
	.await
	.expect("Failed to list.");

	assert_eq!(done.iter().map(|t| t.task_id).collect::<Vec<_>>(), vec![second.task_id]);
}

#[tokio::test]
async fn conditional_embedding_write_respects_version() {
	let db = memory_db().await;
	let mut stored = task(Uuid::new_v4(), "Heal", "needs vector", None);

	tasks::insert(&db, &stored).await.expect("Failed to insert task.");

	let written =
		tasks::update_embedding_if_version(&db, stored.task_id, 1, &[0.5, 0.5, 0.0], VERSION)
			.await
			.expect("Failed to write embedding.");

	assert!(written);

	stored.title = "Healed".to_string();

	tasks::update(&db, &stored).await.expect("Failed to update task.");

	let stale_write =
		tasks::update_embedding_if_version(&db, stored.task_id, 2, &[0.0, 0.0, 1.0], VERSION)
			.await
			.expect("Failed to attempt embedding write.");

	assert!(!stale_write);
}

#[tokio::test]
async fn records_survive_reopening_the_file() {
	let file = TempDatabase::new();
	let stored = task(Uuid::new_v4(), "Durable", "kept on disk", Some(vec![0.3, 0.4, 0.5]));

	{
		let db = Db::connect(&file.sqlite(2)).await.expect("Failed to open database file.");

		db.ensure_schema().await.expect("Failed to ensure schema.");
		tasks::insert(&db, &stored).await.expect("Failed to insert task.");
		db.pool.close().await;
	}

	let db = Db::connect(&file.sqlite(2)).await.expect("Failed to reopen database file.");

	db.ensure_schema().await.expect("Schema bootstrap must be idempotent.");

	let loaded =
		tasks::get(&db, stored.task_id).await.expect("Failed to load.").expect("Task must exist.");

	assert_eq!(loaded.embedding, stored.embedding);

	db.pool.close().await;
}
