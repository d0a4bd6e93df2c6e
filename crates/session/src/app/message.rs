//! Message definitions passed around the session update loop.

use todo_sync_core::model::{FilterMode, NewTask, Task};
use todo_sync_core::notifications::ExpiryTicket;

use crate::app::state::DeleteOrigin;

/// What the presentation layer can ask the session to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Load,
    SetDraft(String),
    Submit(String),
    SubmitDraft,
    Delete(u64),
    ClearCompleted,
    SetFilter(FilterMode),
    DismissNotifications,
}

#[derive(Debug, Clone)]
pub(crate) enum Message {
    Intent(Intent),
    Loaded(Result<Vec<Task>, String>),
    Created(Result<Task, String>),
    Deleted {
        id: u64,
        origin: DeleteOrigin,
        result: Result<(), String>,
    },
    NotificationExpired(ExpiryTicket),
}

/// Side effects requested by the update loop; the runtime performs them off the state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Effect {
    Load,
    Create(NewTask),
    Delete { id: u64, origin: DeleteOrigin },
    ScheduleExpiry(ExpiryTicket),
}
