//! Read-only progress views: the per-phase breakdown and the dashboard.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::plan::{total_tasks, PlanPhase};
use crate::models::progress::ProgressRow;
use crate::progress::tracker::{completed_set, current_phase_index};

const RECENT_MILESTONES: usize = 3;
const UPCOMING_TASKS: usize = 5;
const ACTIVITY_DAYS: i64 = 7;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskProgress {
    pub id: String,
    pub title: String,
    pub completed: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneProgress {
    pub id: String,
    pub title: String,
    pub description: String,
    pub tasks_completed: usize,
    pub tasks_total: usize,
    pub tasks: Vec<TaskProgress>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseProgress {
    pub phase_number: u32,
    pub title: String,
    pub tasks_completed: usize,
    pub tasks_total: usize,
    pub milestones: Vec<MilestoneProgress>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedProgress {
    pub plan_id: Uuid,
    pub current_phase: usize,
    pub streak_days: i32,
    pub last_activity: DateTime<Utc>,
    pub phases: Vec<PhaseProgress>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub unlocked_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MilestoneSummary {
    pub id: String,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityDay {
    pub date: NaiveDate,
    pub tasks_completed: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingTask {
    pub id: String,
    pub title: String,
    /// Tasks carry no due dates yet; always null.
    pub due_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub user_id: Uuid,
    pub current_phase: usize,
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub current_streak: i32,
    pub achievements: Vec<Achievement>,
    pub recent_milestones: Vec<MilestoneSummary>,
    pub activity_data: Vec<ActivityDay>,
    pub upcoming_deadlines: Vec<UpcomingTask>,
}

pub fn detailed_progress(progress: &ProgressRow, phases: &[PlanPhase]) -> DetailedProgress {
    let done = completed_set(progress);

    let phase_views = phases
        .iter()
        .map(|phase| {
            let milestones: Vec<MilestoneProgress> = phase
                .milestones
                .iter()
                .map(|milestone| {
                    let tasks: Vec<TaskProgress> = milestone
                        .tasks
                        .iter()
                        .map(|task| TaskProgress {
                            id: task.id.clone(),
                            title: task.title.clone(),
                            completed: done.contains(&task.id),
                        })
                        .collect();
                    MilestoneProgress {
                        id: milestone.id.clone(),
                        title: milestone.title.clone(),
                        description: milestone.description.clone(),
                        tasks_completed: tasks.iter().filter(|t| t.completed).count(),
                        tasks_total: tasks.len(),
                        tasks,
                    }
                })
                .collect();

            PhaseProgress {
                phase_number: phase.phase_number,
                title: phase.title.clone(),
                tasks_completed: milestones.iter().map(|m| m.tasks_completed).sum(),
                tasks_total: milestones.iter().map(|m| m.tasks_total).sum(),
                milestones,
            }
        })
        .collect();

    DetailedProgress {
        plan_id: progress.plan_id,
        current_phase: current_phase_index(phases, &done),
        streak_days: progress.streak_days,
        last_activity: progress.last_activity,
        phases: phase_views,
    }
}

pub fn dashboard(progress: &ProgressRow, phases: &[PlanPhase], now: DateTime<Utc>) -> Dashboard {
    let done = completed_set(progress);

    let recent_milestones = phases
        .iter()
        .flat_map(|phase| phase.milestones.iter())
        .filter(|m| !m.tasks.is_empty() && m.tasks.iter().all(|t| done.contains(&t.id)))
        .take(RECENT_MILESTONES)
        .map(|m| MilestoneSummary {
            id: m.id.clone(),
            title: m.title.clone(),
            description: m.description.clone(),
        })
        .collect();

    let upcoming_deadlines = phases
        .iter()
        .flat_map(|phase| phase.milestones.iter())
        .flat_map(|m| m.tasks.iter())
        .filter(|t| !done.contains(&t.id))
        .take(UPCOMING_TASKS)
        .map(|t| UpcomingTask {
            id: t.id.clone(),
            title: t.title.clone(),
            due_date: None,
        })
        .collect();

    Dashboard {
        user_id: progress.user_id,
        current_phase: current_phase_index(phases, &done),
        total_tasks: total_tasks(phases),
        completed_tasks: done.len(),
        current_streak: progress.streak_days,
        achievements: achievements(progress, &done),
        recent_milestones,
        activity_data: activity_series(now.date_naive(), done.len()),
        upcoming_deadlines,
    }
}

fn achievements(progress: &ProgressRow, done: &BTreeSet<String>) -> Vec<Achievement> {
    let mut unlocked = Vec::new();
    if !done.is_empty() {
        unlocked.push(Achievement {
            id: "first-task",
            title: "First Steps",
            description: "Completed your first task",
            icon: "🎯",
            unlocked_at: progress.created_at,
        });
    }
    if progress.streak_days >= 7 {
        unlocked.push(Achievement {
            id: "week-streak",
            title: "Week Warrior",
            description: "7-day streak!",
            icon: "🔥",
            unlocked_at: progress.last_activity,
        });
    }
    if done.len() >= 5 {
        unlocked.push(Achievement {
            id: "five-tasks",
            title: "Task Master",
            description: "Completed 5 tasks",
            icon: "⭐",
            unlocked_at: progress.last_activity,
        });
    }
    unlocked
}

/// Seven days ending today, oldest first. No per-day history is stored, so
/// today carries the completed total and earlier days carry zero.
fn activity_series(today: NaiveDate, completed_total: usize) -> Vec<ActivityDay> {
    (0..ACTIVITY_DAYS)
        .rev()
        .map(|offset| ActivityDay {
            date: today - Duration::days(offset),
            tasks_completed: if offset == 0 { completed_total } else { 0 },
        })
        .collect()
}
