//! Progress rules: completion ratios, current phase and streaks.
//!
//! These are pure functions over a progress record and the plan it tracks.
//! `current_phase` is never trusted from storage; it is recomputed from the
//! completed set every time it is read or written.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::plan::{total_tasks, PlanPhase};
use crate::models::progress::ProgressRow;

/// A phase stops being current once this share of its tasks is done.
pub const PHASE_COMPLETE_THRESHOLD: f64 = 0.8;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressStats {
    pub streak_days: i32,
    pub current_phase: usize,
    pub completed_tasks: usize,
    pub total_tasks: usize,
    pub last_activity: DateTime<Utc>,
}

pub fn completed_set(progress: &ProgressRow) -> BTreeSet<String> {
    progress.completed_tasks.iter().cloned().collect()
}

/// Share of the phase's tasks that are done. A phase with no tasks is complete.
pub fn phase_completion_ratio(phase: &PlanPhase, completed: &BTreeSet<String>) -> f64 {
    let total = phase.task_count();
    if total == 0 {
        return 1.0;
    }
    let done = phase.task_ids().filter(|id| completed.contains(*id)).count();
    done as f64 / total as f64
}

/// Index of the first phase below the threshold, else the last phase.
/// An empty plan reports 0.
pub fn current_phase_index(phases: &[PlanPhase], completed: &BTreeSet<String>) -> usize {
    phases
        .iter()
        .position(|phase| phase_completion_ratio(phase, completed) < PHASE_COMPLETE_THRESHOLD)
        .unwrap_or_else(|| phases.len().saturating_sub(1))
}

/// Streak after a task update. Only completions move the streak.
pub fn next_streak(
    streak_days: i32,
    last_activity: DateTime<Utc>,
    now: DateTime<Utc>,
    completed: bool,
) -> i32 {
    if !completed {
        return streak_days;
    }
    match (now - last_activity).num_days() {
        0 => streak_days,
        1 => streak_days + 1,
        _ => 1,
    }
}

/// Applies one task toggle to `progress` in memory.
pub fn apply_task_update(
    progress: &mut ProgressRow,
    phases: &[PlanPhase],
    task_id: &str,
    completed: bool,
    now: DateTime<Utc>,
) {
    let mut done = completed_set(progress);
    if completed {
        done.insert(task_id.to_string());
    } else {
        done.remove(task_id);
    }

    progress.streak_days = next_streak(progress.streak_days, progress.last_activity, now, completed);
    progress.current_phase = current_phase_index(phases, &done) as i32;
    progress.last_activity = now;
    progress.completed_tasks = done.into_iter().collect();
}

/// Ids of the milestone's tasks that are still open, in plan order.
/// Unknown milestones yield nothing.
pub fn pending_milestone_tasks(
    phases: &[PlanPhase],
    milestone_id: &str,
    completed: &BTreeSet<String>,
) -> Vec<String> {
    phases
        .iter()
        .flat_map(|phase| phase.milestones.iter())
        .filter(|milestone| milestone.id == milestone_id)
        .flat_map(|milestone| milestone.tasks.iter())
        .filter(|task| !completed.contains(&task.id))
        .map(|task| task.id.clone())
        .collect()
}

pub fn progress_stats(progress: &ProgressRow, phases: &[PlanPhase]) -> ProgressStats {
    let completed = completed_set(progress);
    ProgressStats {
        streak_days: progress.streak_days,
        current_phase: current_phase_index(phases, &completed),
        completed_tasks: completed.len(),
        total_tasks: total_tasks(phases),
        last_activity: progress.last_activity,
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::models::plan::{Milestone, PlanPhase, Task};

    /// Builds a plan where `shape[p][m]` is the task count of milestone `m` in
    /// phase `p`. Ids follow `milestone_{p}_{m}` and `task_{p}_{m}_{t}`, 1-based.
    pub fn plan(shape: &[&[usize]]) -> Vec<PlanPhase> {
        shape
            .iter()
            .enumerate()
            .map(|(p, milestones)| PlanPhase {
                phase_number: p as u32 + 1,
                title: format!("Phase {}", p + 1),
                duration: "1 month".to_string(),
                description: String::new(),
                milestones: milestones
                    .iter()
                    .enumerate()
                    .map(|(m, &tasks)| Milestone {
                        id: format!("milestone_{}_{}", p + 1, m + 1),
                        title: format!("Milestone {}.{}", p + 1, m + 1),
                        description: String::new(),
                        estimated_duration: "1 week".to_string(),
                        tasks: (0..tasks)
                            .map(|t| Task {
                                id: format!("task_{}_{}_{}", p + 1, m + 1, t + 1),
                                title: format!("Task {}.{}.{}", p + 1, m + 1, t + 1),
                                description: String::new(),
                                resources: Vec::new(),
                            })
                            .collect(),
                    })
                    .collect(),
            })
            .collect()
    }
}
