//! Shared state models that keep the session in sync with the remote todo collection.

use serde::Serialize;
use todo_sync_core::model::{FilterMode, Task};
use todo_sync_core::notifications::{NotificationBanner, NotificationFlag, Notifications};
use todo_sync_core::view::TaskView;

use crate::app::options::SessionOptions;
use crate::telemetry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum DeleteOrigin {
    Single,
    Batch,
}

impl DeleteOrigin {
    pub(crate) fn label(self) -> &'static str {
        match self {
            DeleteOrigin::Single => "delete",
            DeleteOrigin::Batch => "clear completed",
        }
    }
}

/// The task store: committed collection plus the transient fields the protocols drive.
///
/// Only the update handlers mutate it, and only the runtime task calls those.
pub(crate) struct SessionState {
    pub(crate) owner_id: u64,
    pub(crate) tasks: Vec<Task>,
    pub(crate) placeholder_task: Option<Task>,
    pub(crate) pending_delete_id: Option<u64>,
    pub(crate) input_locked: bool,
    pub(crate) filter_mode: FilterMode,
    pub(crate) draft_title: String,
    pub(crate) notifications: Notifications,
    pub(crate) in_flight: usize,
    pub(crate) intents_handled: u64,
    pub(crate) release_lock_on_delete_failure: bool,
    pub(crate) telemetry: telemetry::Handle,
}

impl SessionState {
    pub(crate) fn new(options: &SessionOptions) -> Self {
        Self {
            owner_id: options.owner_id,
            tasks: Vec::new(),
            placeholder_task: None,
            pending_delete_id: None,
            input_locked: false,
            filter_mode: FilterMode::All,
            draft_title: String::new(),
            notifications: Notifications::new(options.notification_ttl),
            in_flight: 0,
            intents_handled: 0,
            release_lock_on_delete_failure: options.release_lock_on_delete_failure,
            telemetry: telemetry::Handle::new(),
        }
    }

    pub(crate) fn task_view(&self) -> TaskView<'_> {
        TaskView::new(&self.tasks, self.filter_mode)
    }

    pub(crate) fn view(&self) -> SessionView {
        let projection = self.task_view();
        let counts = projection.counts();
        SessionView {
            tasks: projection.filtered_tasks().into_iter().cloned().collect(),
            open_count: counts.open,
            closed_count: counts.closed,
            all_completed: projection.all_completed(),
            has_tasks: projection.has_tasks(),
            can_clear_completed: projection.can_clear_completed(),
            placeholder_task: self.placeholder_task.clone(),
            pending_delete_id: self.pending_delete_id,
            input_locked: self.input_locked,
            filter_mode: self.filter_mode,
            draft_title: self.draft_title.clone(),
            notification: self.notifications.banner(projection.has_tasks()),
            active_notifications: self.notifications.active_flags(),
            in_flight: self.in_flight,
            intents_handled: self.intents_handled,
        }
    }
}

/// Everything presentation needs to render one frame of the task list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub tasks: Vec<Task>,
    pub open_count: usize,
    pub closed_count: usize,
    pub all_completed: bool,
    pub has_tasks: bool,
    pub can_clear_completed: bool,
    pub placeholder_task: Option<Task>,
    pub pending_delete_id: Option<u64>,
    pub input_locked: bool,
    pub filter_mode: FilterMode,
    pub draft_title: String,
    pub notification: NotificationBanner,
    pub active_notifications: Vec<NotificationFlag>,
    pub in_flight: usize,
    #[serde(skip)]
    pub intents_handled: u64,
}

impl SessionView {
    /// Whether a row should render as busy.
    pub fn is_deleting(&self, id: u64) -> bool {
        self.pending_delete_id == Some(id)
    }
}
