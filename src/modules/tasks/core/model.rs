use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A labor activity owned by a user. Immutable after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub user_id: Uuid,
    pub task: String,
}

/// One start/stop timer record for a task. Append-only: a closed interval is
/// never rewritten, a new start always creates a new interval.
///
/// Invariant: per task, at most one interval has `stopped_at = None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerInterval {
    pub id: Uuid,
    pub task_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub stopped_at: Option<DateTime<Utc>>,
}

impl TimerInterval {
    pub fn is_open(&self) -> bool {
        self.stopped_at.is_none()
    }
}

/// Half-open `[from, to)` time range for labor aggregation.
/// An absent bound means unbounded on that side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LaborWindow {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl LaborWindow {
    pub fn unbounded() -> Self {
        Self::default()
    }
}

/// Timer state for a single task, derived entirely from the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Idle,
    Running,
}

/// Aggregated elapsed labor for one task within a window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskLabor {
    pub task_id: Uuid,
    pub task: String,
    pub total: TimeDelta,
}
