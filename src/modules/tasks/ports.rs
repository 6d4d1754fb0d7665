// Ports define what the task module needs from the outside world, without
// implementing it.
//
// Responsibilities
// - Keep the service independent of any database by coding against traits.
//
// Boundaries
// - No concrete input or output here. Adapters implement these traits in the
//   adapters layer.
//
// Testing guidance
// - The in-memory adapter implements both traits for tests and local
//   development.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::modules::tasks::core::model::{LaborWindow, Task, TaskLabor};

/// Infrastructure failure talking to the store. Retryable by the caller;
/// the service never retries internally.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("backend error: {0}")]
    Backend(String),
}

#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Persist a new task. Identity generation is the store's responsibility.
    async fn create(&self, user_id: Uuid, text: &str) -> Result<Task, StoreError>;
}

#[async_trait]
pub trait TimerStore: Send + Sync {
    /// Insert an open interval for the task unless one is already open.
    ///
    /// Returns the new interval id, or `None` when an open interval already
    /// exists. The at-most-one-open-interval invariant is enforced here,
    /// atomically with respect to concurrent callers; the service cannot
    /// provide mutual exclusion across separate store calls.
    async fn insert_open_interval(&self, task_id: Uuid) -> Result<Option<Uuid>, StoreError>;

    /// Close the task's open interval, if any. Returns rows affected;
    /// closing zero rows is not an error.
    async fn close_open_interval(&self, task_id: Uuid) -> Result<u64, StoreError>;

    /// Whether the task currently has an open interval. Absence of an open
    /// row is the normal Idle case, not a failure.
    async fn has_open_interval(&self, task_id: Uuid) -> Result<bool, StoreError>;

    /// Total elapsed duration per task over intervals of `user_id`'s tasks
    /// intersecting the window. Tasks with no qualifying interval are omitted.
    async fn aggregate_intervals(
        &self,
        user_id: Uuid,
        window: &LaborWindow,
    ) -> Result<Vec<TaskLabor>, StoreError>;
}
