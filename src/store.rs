//! In-memory task list state
//!
//! Holds the ordered task collection as last confirmed by the server.
//! Every mutation applies a record the server returned; the list never
//! contains a locally guessed state. Wholesale replacement, append,
//! update-in-place by id and removal by id are the only operations.

use crate::model::{Status, Task};
use chrono::{DateTime, Utc};

/// The ordered task collection mirrored from the server
#[derive(Debug, Clone, Default)]
pub struct TaskList {
    tasks: Vec<Task>,
}

/// Status breakdown of a task list, in whole percent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskStats {
    pub total: usize,
    pub completed_pct: u32,
    pub in_progress_pct: u32,
    pub not_started_pct: u32,
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_slice(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Replace the whole collection with a fresh server response
    pub fn replace_all(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
    }

    /// Append a newly created record and return a reference to it
    pub fn append(&mut self, task: Task) -> &Task {
        self.tasks.push(task);
        // push guarantees a last element
        &self.tasks[self.tasks.len() - 1]
    }

    /// Replace the record with the same id in place.
    ///
    /// If no record with that id is held (the list was never fetched), the
    /// confirmed record is appended instead so the list still reflects the
    /// server's state.
    pub fn upsert(&mut self, task: Task) -> &Task {
        match self.tasks.iter().position(|t| t.id == task.id) {
            Some(index) => {
                self.tasks[index] = task;
                &self.tasks[index]
            }
            None => self.append(task),
        }
    }

    /// Remove the record with the given id. Returns whether it was present.
    pub fn remove(&mut self, id: u64) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        self.tasks.len() < before
    }

    pub fn clear(&mut self) {
        self.tasks.clear();
    }

    /// Tasks past their due date and not yet completed
    pub fn overdue(&self, now: DateTime<Utc>) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.is_overdue(now)).collect()
    }

    /// Percentage breakdown by status, as shown on the dashboard
    pub fn stats(&self) -> TaskStats {
        let total = self.tasks.len();
        let count = |status: Status| self.tasks.iter().filter(|t| t.status == status).count();

        TaskStats {
            total,
            completed_pct: pct(count(Status::Completed), total),
            in_progress_pct: pct(count(Status::InProgress), total),
            not_started_pct: pct(count(Status::NotStarted), total),
        }
    }
}

fn pct(part: usize, total: usize) -> u32 {
    if total == 0 {
        0
    } else {
        ((part as f64 / total as f64) * 100.0).round() as u32
    }
}
