// PostgreSQL implementation of the TaskStore and TimerStore ports.
//
// Responsibilities
// - Generate task and interval identities in the database.
// - Enforce the at-most-one-open-interval invariant with the partial unique
//   index on `labor_time (task_id) WHERE stopped_at IS NULL`; the insert is
//   conflict-safe under concurrent starts.
// - Aggregate labor per task in one GROUP BY query mirroring
//   `core::labor::contribution`.

use async_trait::async_trait;
use chrono::TimeDelta;
use sqlx::PgPool;
use uuid::Uuid;

use crate::modules::tasks::core::model::{LaborWindow, Task, TaskLabor};
use crate::modules::tasks::ports::{StoreError, TaskStore, TimerStore};

pub struct PostgresTaskStore {
    pool: PgPool,
}

impl PostgresTaskStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn backend(err: sqlx::Error) -> StoreError {
    StoreError::Backend(err.to_string())
}

#[async_trait]
impl TaskStore for PostgresTaskStore {
    async fn create(&self, user_id: Uuid, text: &str) -> Result<Task, StoreError> {
        let id: Uuid =
            sqlx::query_scalar("INSERT INTO tasks (task, user_id) VALUES ($1, $2) RETURNING id")
                .bind(text)
                .bind(user_id)
                .fetch_one(&self.pool)
                .await
                .map_err(backend)?;
        Ok(Task {
            id,
            user_id,
            task: text.to_string(),
        })
    }
}

#[async_trait]
impl TimerStore for PostgresTaskStore {
    async fn insert_open_interval(&self, task_id: Uuid) -> Result<Option<Uuid>, StoreError> {
        // RETURNING yields no row when the conflict arm fires, which is the
        // already-running case.
        sqlx::query_scalar(
            "INSERT INTO labor_time (task_id) VALUES ($1) \
             ON CONFLICT (task_id) WHERE stopped_at IS NULL DO NOTHING \
             RETURNING id",
        )
        .bind(task_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)
    }

    async fn close_open_interval(&self, task_id: Uuid) -> Result<u64, StoreError> {
        let result = sqlx::query(
            "UPDATE labor_time SET stopped_at = now() \
             WHERE task_id = $1 AND stopped_at IS NULL",
        )
        .bind(task_id)
        .execute(&self.pool)
        .await
        .map_err(backend)?;
        Ok(result.rows_affected())
    }

    async fn has_open_interval(&self, task_id: Uuid) -> Result<bool, StoreError> {
        sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM labor_time WHERE task_id = $1 AND stopped_at IS NULL)",
        )
        .bind(task_id)
        .fetch_one(&self.pool)
        .await
        .map_err(backend)
    }

    async fn aggregate_intervals(
        &self,
        user_id: Uuid,
        window: &LaborWindow,
    ) -> Result<Vec<TaskLabor>, StoreError> {
        let rows: Vec<(Uuid, String, i64)> = sqlx::query_as(
            "SELECT t.id, t.task, \
                    FLOOR(SUM(EXTRACT(EPOCH FROM (COALESCE(l.stopped_at, now()) - l.started_at))))::BIGINT AS total_seconds \
               FROM tasks t \
               JOIN labor_time l ON l.task_id = t.id \
              WHERE t.user_id = $1 \
                AND (l.stopped_at IS NOT NULL OR $3::timestamptz IS NULL OR $3 > now()) \
                AND ($2::timestamptz IS NULL OR COALESCE(l.stopped_at, now()) > $2) \
                AND ($3::timestamptz IS NULL OR l.started_at < $3) \
              GROUP BY t.id, t.task \
              ORDER BY total_seconds, t.id",
        )
        .bind(user_id)
        .bind(window.from)
        .bind(window.to)
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;

        Ok(rows
            .into_iter()
            .map(|(task_id, task, seconds)| TaskLabor {
                task_id,
                task,
                total: TimeDelta::seconds(seconds),
            })
            .collect())
    }
}
