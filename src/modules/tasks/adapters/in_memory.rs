// In memory implementation of the TaskStore and TimerStore ports.
//
// Purpose
// - Support service tests and local development without a database.
//
// Responsibilities
// - Hold tasks and intervals behind one mutex so the check-then-insert in
//   `insert_open_interval` is atomic with respect to concurrent callers.
// - Enforce the at-most-one-open-interval-per-task invariant.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::modules::tasks::core::labor::contribution;
use crate::modules::tasks::core::model::{LaborWindow, Task, TaskLabor, TimerInterval};
use crate::modules::tasks::ports::{StoreError, TaskStore, TimerStore};

#[derive(Default)]
struct Inner {
    tasks: HashMap<Uuid, Task>,
    intervals: Vec<TimerInterval>,
}

#[derive(Default)]
pub struct InMemoryTaskStore {
    inner: Mutex<Inner>,
    offline: bool,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate the backend being unreachable. Every port call fails until
    /// toggled back.
    pub fn toggle_offline(&mut self) {
        self.offline = !self.offline;
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.offline {
            return Err(StoreError::Backend("task store offline".into()));
        }
        Ok(())
    }

    /// Seed a task with a known id.
    pub async fn put_task(&self, task: Task) {
        self.inner.lock().await.tasks.insert(task.id, task);
    }

    /// Seed an interval with explicit timestamps, bypassing the clock.
    pub async fn put_interval(&self, interval: TimerInterval) {
        self.inner.lock().await.intervals.push(interval);
    }

    pub async fn intervals_for(&self, task_id: Uuid) -> Vec<TimerInterval> {
        self.inner
            .lock()
            .await
            .intervals
            .iter()
            .filter(|i| i.task_id == task_id)
            .cloned()
            .collect()
    }

    pub async fn open_interval_count(&self, task_id: Uuid) -> usize {
        self.intervals_for(task_id)
            .await
            .iter()
            .filter(|i| i.is_open())
            .count()
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn create(&self, user_id: Uuid, text: &str) -> Result<Task, StoreError> {
        self.check_online()?;
        let task = Task {
            id: Uuid::now_v7(),
            user_id,
            task: text.to_string(),
        };
        self.inner.lock().await.tasks.insert(task.id, task.clone());
        Ok(task)
    }
}

#[async_trait]
impl TimerStore for InMemoryTaskStore {
    async fn insert_open_interval(&self, task_id: Uuid) -> Result<Option<Uuid>, StoreError> {
        self.check_online()?;
        let mut g = self.inner.lock().await;
        if g.intervals.iter().any(|i| i.task_id == task_id && i.is_open()) {
            return Ok(None);
        }
        let interval = TimerInterval {
            id: Uuid::now_v7(),
            task_id,
            started_at: Utc::now(),
            stopped_at: None,
        };
        let id = interval.id;
        g.intervals.push(interval);
        Ok(Some(id))
    }

    async fn close_open_interval(&self, task_id: Uuid) -> Result<u64, StoreError> {
        self.check_online()?;
        let now = Utc::now();
        let mut g = self.inner.lock().await;
        let mut closed = 0;
        for interval in g
            .intervals
            .iter_mut()
            .filter(|i| i.task_id == task_id && i.is_open())
        {
            interval.stopped_at = Some(now);
            closed += 1;
        }
        Ok(closed)
    }

    async fn has_open_interval(&self, task_id: Uuid) -> Result<bool, StoreError> {
        self.check_online()?;
        let g = self.inner.lock().await;
        Ok(g.intervals.iter().any(|i| i.task_id == task_id && i.is_open()))
    }

    async fn aggregate_intervals(
        &self,
        user_id: Uuid,
        window: &LaborWindow,
    ) -> Result<Vec<TaskLabor>, StoreError> {
        self.check_online()?;
        let now = Utc::now();
        let g = self.inner.lock().await;
        let mut summary = Vec::new();
        for task in g.tasks.values().filter(|t| t.user_id == user_id) {
            let mut total = None;
            for interval in g.intervals.iter().filter(|i| i.task_id == task.id) {
                if let Some(delta) = contribution(window, interval, now) {
                    total = Some(total.unwrap_or_else(chrono::TimeDelta::zero) + delta);
                }
            }
            // A task with no qualifying interval is omitted, not reported
            // with a zero total.
            if let Some(total) = total {
                summary.push(TaskLabor {
                    task_id: task.id,
                    task: task.task.clone(),
                    total,
                });
            }
        }
        Ok(summary)
    }
}
