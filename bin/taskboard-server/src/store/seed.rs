//! Sample records loaded at startup unless `TASKBOARD_SEED=false`.

use chrono::{DateTime, Duration, Utc};
use serde_json::Map;
use taskboard_types::timestamp;
use taskboard_types::{Priority, Project, Task, TaskStatus};

pub(super) fn tasks(now: DateTime<Utc>) -> Vec<Task> {
    vec![
        Task {
            id: "task1".to_owned(),
            title: "Complete project documentation".to_owned(),
            description: "Write comprehensive documentation for the new feature".to_owned(),
            status: TaskStatus::Pending,
            priority: Priority::High,
            due_date: timestamp::format(&now),
            project: "Documentation Project".to_owned(),
            created_at: now,
            updated_at: now,
            extra: Map::new(),
        },
        Task {
            id: "task2".to_owned(),
            title: "Review code changes".to_owned(),
            description: "Review and approve pending pull requests".to_owned(),
            status: TaskStatus::InProgress,
            priority: Priority::Medium,
            due_date: timestamp::format(&(now + Duration::days(1))),
            project: "Code Review".to_owned(),
            created_at: now,
            updated_at: now,
            extra: Map::new(),
        },
    ]
}

pub(super) fn projects(now: DateTime<Utc>) -> Vec<Project> {
    vec![
        Project {
            id: "proj1".to_owned(),
            name: "Documentation Project".to_owned(),
            description: "Comprehensive documentation for all features".to_owned(),
            start_date: timestamp::format(&now),
            end_date: timestamp::format(&(now + Duration::days(30))),
            created_at: now,
            updated_at: now,
            extra: Map::new(),
        },
        Project {
            id: "proj2".to_owned(),
            name: "Code Review System".to_owned(),
            description: "Implement automated code review workflows".to_owned(),
            start_date: timestamp::format(&now),
            end_date: timestamp::format(&(now + Duration::days(45))),
            created_at: now,
            updated_at: now,
            extra: Map::new(),
        },
    ]
}
