// Task service: timer state machine and labor aggregation.
//
// Responsibilities
// - Derive the per-task timer state (Idle/Running) from the store on every
//   call; no in-memory state is held here.
// - Treat double start and double stop as idempotent successes, surfaced as
//   typed outcomes so the transport can tell them apart.
// - Reduce the store's window aggregation into a deterministically ordered
//   summary.

use std::sync::Arc;

use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::modules::tasks::core::labor::order_summary;
use crate::modules::tasks::core::model::{LaborWindow, Task, TaskLabor, TimerState};
use crate::modules::tasks::ports::{StoreError, TaskStore, TimerStore};

#[derive(Debug, Error)]
pub enum TaskError {
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Outcome of `start_timer`. Both variants are successes; `AlreadyRunning`
/// means no new interval was created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started,
    AlreadyRunning,
}

/// Outcome of `stop_timer`. `NotRunning` means there was nothing to close.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    Stopped,
    NotRunning,
}

pub struct TaskService {
    tasks: Arc<dyn TaskStore>,
    timers: Arc<dyn TimerStore>,
}

impl TaskService {
    pub fn new(tasks: Arc<dyn TaskStore>, timers: Arc<dyn TimerStore>) -> Self {
        Self { tasks, timers }
    }

    pub async fn create_task(&self, user_id: Uuid, text: &str) -> Result<Task, TaskError> {
        debug!(%user_id, "creating task");
        Ok(self.tasks.create(user_id, text).await?)
    }

    /// Start the task's timer. Starting an already-running timer is a no-op.
    ///
    /// The read here only short-circuits the common case; the store's
    /// insert is itself conflict-safe, so a concurrent racer between the
    /// read and the insert still cannot open a second interval.
    pub async fn start_timer(&self, task_id: Uuid) -> Result<StartOutcome, TaskError> {
        if self.timer_state(task_id).await? == TimerState::Running {
            debug!(%task_id, "timer already running");
            return Ok(StartOutcome::AlreadyRunning);
        }
        match self.timers.insert_open_interval(task_id).await? {
            Some(interval_id) => {
                debug!(%task_id, %interval_id, "timer started");
                Ok(StartOutcome::Started)
            }
            None => Ok(StartOutcome::AlreadyRunning),
        }
    }

    /// Stop the task's timer. Stopping an idle timer is a no-op.
    pub async fn stop_timer(&self, task_id: Uuid) -> Result<StopOutcome, TaskError> {
        let closed = self.timers.close_open_interval(task_id).await?;
        if closed == 0 {
            debug!(%task_id, "no open interval to close");
            return Ok(StopOutcome::NotRunning);
        }
        debug!(%task_id, closed, "timer stopped");
        Ok(StopOutcome::Stopped)
    }

    async fn timer_state(&self, task_id: Uuid) -> Result<TimerState, TaskError> {
        let running = self.timers.has_open_interval(task_id).await?;
        Ok(if running {
            TimerState::Running
        } else {
            TimerState::Idle
        })
    }

    /// Elapsed labor per task for the user over the window, ascending by
    /// total with task id as tiebreak. Tasks without qualifying intervals
    /// are omitted; an empty result is not an error.
    pub async fn labor_summary(
        &self,
        user_id: Uuid,
        window: LaborWindow,
    ) -> Result<Vec<TaskLabor>, TaskError> {
        let mut summary = self.timers.aggregate_intervals(user_id, &window).await?;
        order_summary(&mut summary);
        Ok(summary)
    }
}

#[cfg(test)]
mod task_service_tests {
    use super::*;
    use crate::modules::tasks::adapters::in_memory::InMemoryTaskStore;
    use crate::modules::tasks::core::model::TimerInterval;
    use chrono::{TimeDelta, TimeZone, Utc};
    use rstest::{fixture, rstest};

    fn service(store: Arc<InMemoryTaskStore>) -> TaskService {
        TaskService::new(store.clone(), store)
    }

    #[fixture]
    fn store() -> Arc<InMemoryTaskStore> {
        Arc::new(InMemoryTaskStore::new())
    }

    fn at(secs: i64) -> chrono::DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn closed(task_id: Uuid, start: i64, stop: i64) -> TimerInterval {
        TimerInterval {
            id: Uuid::now_v7(),
            task_id,
            started_at: at(start),
            stopped_at: Some(at(stop)),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_start_an_idle_timer(store: Arc<InMemoryTaskStore>) {
        let svc = service(store.clone());
        let task_id = Uuid::now_v7();
        let outcome = svc.start_timer(task_id).await.unwrap();
        assert_eq!(outcome, StartOutcome::Started);
        assert_eq!(store.open_interval_count(task_id).await, 1);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_treat_a_second_start_as_a_no_op(store: Arc<InMemoryTaskStore>) {
        let svc = service(store.clone());
        let task_id = Uuid::now_v7();
        svc.start_timer(task_id).await.unwrap();
        let second = svc.start_timer(task_id).await.unwrap();
        assert_eq!(second, StartOutcome::AlreadyRunning);
        assert_eq!(store.open_interval_count(task_id).await, 1);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_keep_a_single_open_interval_under_concurrent_starts(
        store: Arc<InMemoryTaskStore>,
    ) {
        let svc = Arc::new(service(store.clone()));
        let task_id = Uuid::now_v7();
        let mut handles = Vec::new();
        for _ in 0..32 {
            let svc = svc.clone();
            handles.push(tokio::spawn(async move { svc.start_timer(task_id).await }));
        }
        let mut started = 0;
        for handle in handles {
            match handle.await.unwrap().unwrap() {
                StartOutcome::Started => started += 1,
                StartOutcome::AlreadyRunning => {}
            }
        }
        assert_eq!(started, 1, "exactly one start should create an interval");
        assert_eq!(store.open_interval_count(task_id).await, 1);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_treat_stop_without_a_running_timer_as_a_no_op(
        store: Arc<InMemoryTaskStore>,
    ) {
        let svc = service(store);
        let outcome = svc.stop_timer(Uuid::now_v7()).await.unwrap();
        assert_eq!(outcome, StopOutcome::NotRunning);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_stop_a_running_timer_and_allow_a_restart(store: Arc<InMemoryTaskStore>) {
        let svc = service(store.clone());
        let task_id = Uuid::now_v7();
        svc.start_timer(task_id).await.unwrap();
        assert_eq!(svc.stop_timer(task_id).await.unwrap(), StopOutcome::Stopped);
        assert_eq!(store.open_interval_count(task_id).await, 0);
        // A restart opens a fresh interval instead of reusing the closed one.
        assert_eq!(
            svc.start_timer(task_id).await.unwrap(),
            StartOutcome::Started
        );
        assert_eq!(store.intervals_for(task_id).await.len(), 2);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_surface_a_store_failure_from_start() {
        let mut raw = InMemoryTaskStore::new();
        raw.toggle_offline();
        let svc = service(Arc::new(raw));
        let result = svc.start_timer(Uuid::now_v7()).await;
        assert!(matches!(result, Err(TaskError::Store(_))));
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_sum_sequential_start_stop_pairs(store: Arc<InMemoryTaskStore>) {
        let svc = service(store.clone());
        let user_id = Uuid::now_v7();
        let task = svc.create_task(user_id, "sum of pairs").await.unwrap();
        for (start, stop) in [(0, 10), (100, 130), (200, 260)] {
            store.put_interval(closed(task.id, start, stop)).await;
        }
        let summary = svc
            .labor_summary(user_id, LaborWindow::unbounded())
            .await
            .unwrap();
        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].total, TimeDelta::seconds(100));
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_order_the_summary_by_ascending_total(store: Arc<InMemoryTaskStore>) {
        let svc = service(store.clone());
        let user_id = Uuid::now_v7();
        let long = svc.create_task(user_id, "long").await.unwrap();
        let short = svc.create_task(user_id, "short").await.unwrap();
        store.put_interval(closed(long.id, 0, 500)).await;
        store.put_interval(closed(short.id, 0, 50)).await;
        let summary = svc
            .labor_summary(user_id, LaborWindow::unbounded())
            .await
            .unwrap();
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].task_id, short.id);
        assert_eq!(summary[1].task_id, long.id);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_count_an_open_interval_as_ongoing_work(store: Arc<InMemoryTaskStore>) {
        let svc = service(store.clone());
        let user_id = Uuid::now_v7();
        let task = svc.create_task(user_id, "ongoing").await.unwrap();
        store
            .put_interval(TimerInterval {
                id: Uuid::now_v7(),
                task_id: task.id,
                started_at: Utc::now() - TimeDelta::seconds(90),
                stopped_at: None,
            })
            .await;
        let first = svc
            .labor_summary(user_id, LaborWindow::unbounded())
            .await
            .unwrap();
        assert_eq!(first.len(), 1);
        assert!(first[0].total >= TimeDelta::seconds(90));

        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        let second = svc
            .labor_summary(user_id, LaborWindow::unbounded())
            .await
            .unwrap();
        assert!(
            second[0].total > first[0].total,
            "an open interval keeps accruing between queries"
        );
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_omit_tasks_with_no_intervals_in_the_window(
        store: Arc<InMemoryTaskStore>,
    ) {
        let svc = service(store.clone());
        let user_id = Uuid::now_v7();
        let task = svc.create_task(user_id, "old work").await.unwrap();
        store.put_interval(closed(task.id, 0, 60)).await;
        let window = LaborWindow {
            from: Some(at(1_000)),
            to: Some(at(2_000)),
        };
        let summary = svc.labor_summary(user_id, window).await.unwrap();
        assert!(summary.is_empty());
    }
}
