// Pure labor-time math. No I/O here: stores call into these rules so the
// in-memory and Postgres adapters agree on what counts toward a window.

use chrono::{DateTime, TimeDelta, Utc};

use crate::modules::tasks::core::model::{LaborWindow, TaskLabor, TimerInterval};

/// Elapsed duration the interval contributes to the window, evaluated at `now`.
///
/// Rules:
/// - A closed interval intersecting the window contributes its full
///   `stopped_at - started_at` (no clipping to the window edges).
/// - An open interval contributes `now - started_at`, but only while the
///   window's upper bound is unbounded or still in the future.
/// - An interval entirely outside the window contributes nothing.
pub fn contribution(
    window: &LaborWindow,
    interval: &TimerInterval,
    now: DateTime<Utc>,
) -> Option<TimeDelta> {
    if interval.is_open() {
        if let Some(to) = window.to
            && to <= now
        {
            return None;
        }
    }

    let effective_end = interval.stopped_at.unwrap_or(now);
    if let Some(from) = window.from
        && effective_end <= from
    {
        return None;
    }
    if let Some(to) = window.to
        && interval.started_at >= to
    {
        return None;
    }

    Some(effective_end - interval.started_at)
}

/// Deterministic summary order: ascending total, task id as tiebreak.
pub fn order_summary(summary: &mut [TaskLabor]) {
    summary.sort_by(|a, b| a.total.cmp(&b.total).then(a.task_id.cmp(&b.task_id)));
}
