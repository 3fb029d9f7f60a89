//! Selectors computed from a cached collection for the dashboard and the
//! list screens. All of them are pure and borrow from the cache.

use chrono::NaiveDate;
use strum::IntoEnumIterator;
use taskboard_types::{timestamp, Project, Task, TaskStatus};

/// Task counts per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusSummary {
    pub pending: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub total: usize,
}

impl StatusSummary {
    pub fn count(&self, status: TaskStatus) -> usize {
        match status {
            TaskStatus::Pending => self.pending,
            TaskStatus::InProgress => self.in_progress,
            TaskStatus::Completed => self.completed,
        }
    }

    /// Share of tasks in `status`, as a percentage. Zero for an empty board.
    pub fn share(&self, status: TaskStatus) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.count(status) as f64 * 100.0 / self.total as f64
    }

    /// Every status with its count and share, in workflow order.
    pub fn breakdown(&self) -> Vec<(TaskStatus, usize, f64)> {
        TaskStatus::iter()
            .map(|status| (status, self.count(status), self.share(status)))
            .collect()
    }
}

/// Parse a status filter as sent by a list screen's selector. `"all"` (or an
/// empty value) means no filter; anything else must name a status.
pub fn parse_status_filter(raw: &str) -> Result<Option<TaskStatus>, strum::ParseError> {
    match raw.trim() {
        "" | "all" => Ok(None),
        other => other.parse().map(Some),
    }
}

pub fn status_summary(tasks: &[Task]) -> StatusSummary {
    tasks.iter().fold(StatusSummary::default(), |mut acc, task| {
        match task.status {
            TaskStatus::Pending => acc.pending += 1,
            TaskStatus::InProgress => acc.in_progress += 1,
            TaskStatus::Completed => acc.completed += 1,
        }
        acc.total += 1;
        acc
    })
}

/// Up to `n` tasks, newest `createdAt` first.
pub fn recent_tasks(tasks: &[Task], n: usize) -> Vec<&Task> {
    let mut recent: Vec<&Task> = tasks.iter().collect();
    recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    recent.truncate(n);
    recent
}

/// Tasks whose due date falls on `day` (UTC). Due dates that do not parse
/// never match.
pub fn tasks_due_on(tasks: &[Task], day: NaiveDate) -> Vec<&Task> {
    tasks
        .iter()
        .filter(|task| timestamp::parse(&task.due_date).is_some_and(|due| due.date_naive() == day))
        .collect()
}

/// Case-insensitive search over title and description, optionally narrowed
/// to one status. An empty query matches everything.
pub fn filter_tasks<'a>(tasks: &'a [Task], query: &str, status: Option<TaskStatus>) -> Vec<&'a Task> {
    let needle = query.to_lowercase();
    tasks
        .iter()
        .filter(|task| status.is_none_or(|s| task.status == s))
        .filter(|task| contains(&task.title, &needle) || contains(&task.description, &needle))
        .collect()
}

pub fn filter_projects<'a>(projects: &'a [Project], query: &str) -> Vec<&'a Project> {
    let needle = query.to_lowercase();
    projects
        .iter()
        .filter(|p| contains(&p.name, &needle) || contains(&p.description, &needle))
        .collect()
}

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}
