/// Derived subsets of task and category collections
///
/// Handlers fetch the requesting owner's rows first, then apply these
/// helpers, so every subset is automatically owner-restricted. The functions
/// are pure: the clock is a parameter, there are no side effects, and the
/// same inputs always produce the same partition.
///
/// # Partitions
///
/// - [`overdue`] / [`upcoming`] split a task collection around a point in
///   time with no overlap and no leftovers.
/// - [`partition_by_status`] splits by completion flag, independent of the
///   deadline.
/// - [`empty_categories`] / [`full_categories`] split categories by whether
///   any task belongs to them.
///
/// # Example
///
/// ```
/// use tasknest_shared::queries::{overdue, upcoming};
/// use chrono::Utc;
///
/// let tasks = vec![];
/// let now = Utc::now();
/// assert!(overdue(&tasks, now).is_empty());
/// assert!(upcoming(&tasks, now).is_empty());
/// ```

use chrono::{DateTime, Duration, Utc};

use crate::models::category::CategoryTaskCount;
use crate::models::task::Task;

/// Tasks whose deadline is strictly before `now`
pub fn overdue(tasks: &[Task], now: DateTime<Utc>) -> Vec<Task> {
    tasks
        .iter()
        .filter(|task| task.deadline < now)
        .cloned()
        .collect()
}

/// Tasks whose deadline is at `now` or later
///
/// Exact complement of [`overdue`] over the same collection.
pub fn upcoming(tasks: &[Task], now: DateTime<Utc>) -> Vec<Task> {
    tasks
        .iter()
        .filter(|task| task.deadline >= now)
        .cloned()
        .collect()
}

/// Two-way split of a task collection by completion status
///
/// `pending` means "not marked done", independent of the deadline.
#[derive(Debug, Clone, Default)]
pub struct StatusPartition {
    /// Tasks with status = done
    pub completed: Vec<Task>,

    /// Tasks not yet marked done
    pub pending: Vec<Task>,
}

/// Splits tasks into completed and pending subsets
pub fn partition_by_status(tasks: &[Task]) -> StatusPartition {
    let mut partition = StatusPartition::default();

    for task in tasks {
        if task.status.is_done() {
            partition.completed.push(task.clone());
        } else {
            partition.pending.push(task.clone());
        }
    }

    partition
}

/// Categories with zero associated tasks
pub fn empty_categories(categories: &[CategoryTaskCount]) -> Vec<CategoryTaskCount> {
    categories
        .iter()
        .filter(|category| category.task_count == 0)
        .cloned()
        .collect()
}

/// Categories with at least one associated task
///
/// Exact complement of [`empty_categories`] over the same collection.
pub fn full_categories(categories: &[CategoryTaskCount]) -> Vec<CategoryTaskCount> {
    categories
        .iter()
        .filter(|category| category.task_count > 0)
        .cloned()
        .collect()
}

/// Signed time remaining until a deadline
///
/// Positive while the deadline is in the future, negative once it has
/// passed. Callers render this as "N days, H hours, M minutes left" or
/// "expired N days ago".
pub fn time_left(deadline: DateTime<Utc>, now: DateTime<Utc>) -> Duration {
    deadline - now
}
