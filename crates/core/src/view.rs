//! Read-only projections over the committed task collection.

use serde::Serialize;

use crate::model::{FilterMode, Task};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskCounts {
    pub open: usize,
    pub closed: usize,
}

/// Borrowed view over the committed collection under one filter.
#[derive(Debug, Clone, Copy)]
pub struct TaskView<'a> {
    tasks: &'a [Task],
    filter: FilterMode,
}

impl<'a> TaskView<'a> {
    pub fn new(tasks: &'a [Task], filter: FilterMode) -> Self {
        Self { tasks, filter }
    }

    pub fn filtered_tasks(&self) -> Vec<&'a Task> {
        let filter = self.filter;
        self.tasks
            .iter()
            .filter(|task| filter.matches(task))
            .collect()
    }

    pub fn counts(&self) -> TaskCounts {
        let closed = self.closed_count();
        TaskCounts {
            open: self.tasks.len() - closed,
            closed,
        }
    }

    pub fn open_count(&self) -> usize {
        self.tasks.iter().filter(|task| !task.completed).count()
    }

    pub fn closed_count(&self) -> usize {
        self.tasks.iter().filter(|task| task.completed).count()
    }

    /// An empty collection does not count as all completed.
    pub fn all_completed(&self) -> bool {
        !self.tasks.is_empty() && self.tasks.iter().all(|task| task.completed)
    }

    pub fn has_tasks(&self) -> bool {
        !self.tasks.is_empty()
    }

    pub fn can_clear_completed(&self) -> bool {
        self.tasks.iter().any(|task| task.completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn task(id: u64, completed: bool) -> Task {
        Task {
            id,
            owner_id: 1,
            title: format!("task {id}"),
            completed,
        }
    }

    fn sample() -> Vec<Task> {
        vec![task(1, false), task(2, true), task(3, false), task(4, true)]
    }

    #[rstest]
    #[case(FilterMode::All, vec![1, 2, 3, 4])]
    #[case(FilterMode::Active, vec![1, 3])]
    #[case(FilterMode::Completed, vec![2, 4])]
    fn filtered_tasks_follow_mode(#[case] mode: FilterMode, #[case] expected: Vec<u64>) {
        let tasks = sample();
        let view = TaskView::new(&tasks, mode);
        let ids: Vec<u64> = view.filtered_tasks().iter().map(|task| task.id).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn counts_ignore_filter() {
        let tasks = sample();
        for mode in FilterMode::ALL {
            let view = TaskView::new(&tasks, *mode);
            assert_eq!(view.counts(), TaskCounts { open: 2, closed: 2 });
            assert_eq!(view.open_count(), 2);
            assert_eq!(view.closed_count(), 2);
        }
    }

    #[rstest]
    #[case(vec![], false)]
    #[case(vec![task(1, true), task(2, false)], false)]
    #[case(vec![task(1, true), task(2, true)], true)]
    fn all_completed_requires_non_empty(#[case] tasks: Vec<Task>, #[case] expected: bool) {
        assert_eq!(TaskView::new(&tasks, FilterMode::All).all_completed(), expected);
    }

    #[test]
    fn clear_completed_affordance_tracks_closed_tasks() {
        let open_only = vec![task(1, false)];
        let view = TaskView::new(&open_only, FilterMode::All);
        assert!(view.has_tasks());
        assert!(!view.can_clear_completed());

        let empty: Vec<Task> = Vec::new();
        let view = TaskView::new(&empty, FilterMode::Completed);
        assert!(!view.has_tasks());
        assert!(view.filtered_tasks().is_empty());
    }
}
