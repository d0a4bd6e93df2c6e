//! Core update loop translating intents and remote outcomes into state changes.
//!
//! Every handler returns the effects the runtime must perform. Nothing here awaits; a
//! remote call started by one message is settled by a later `Loaded`, `Created` or
//! `Deleted` message.

use std::collections::HashSet;

use todo_sync_core::capture::prepare_new_task;
use todo_sync_core::model::{FilterMode, Task, PLACEHOLDER_ID};
use todo_sync_core::notifications::{ExpiryTicket, NotificationFlag};

use crate::app::message::{Effect, Intent, Message};
use crate::app::state::{DeleteOrigin, SessionState};
use crate::telemetry::Event as TelemetryEvent;

impl SessionState {
    pub(crate) fn react(&mut self, message: Message) -> Vec<Effect> {
        match message {
            Message::Intent(intent) => {
                self.intents_handled = self.intents_handled.wrapping_add(1);
                self.handle_intent(intent)
            }
            Message::Loaded(result) => self.finish_load(result),
            Message::Created(result) => self.finish_create(result),
            Message::Deleted { id, origin, result } => self.finish_delete(id, origin, result),
            Message::NotificationExpired(ticket) => {
                self.expire_notification(ticket);
                Vec::new()
            }
        }
    }

    fn handle_intent(&mut self, intent: Intent) -> Vec<Effect> {
        match intent {
            Intent::Load => self.request_load(),
            Intent::SetDraft(value) => {
                self.draft_title = value;
                Vec::new()
            }
            Intent::Submit(raw_title) => self.submit(&raw_title),
            Intent::SubmitDraft => {
                let raw_title = self.draft_title.clone();
                self.submit(&raw_title)
            }
            Intent::Delete(id) => self.request_delete(id),
            Intent::ClearCompleted => self.clear_completed(),
            Intent::SetFilter(mode) => {
                self.set_filter(mode);
                Vec::new()
            }
            Intent::DismissNotifications => {
                self.notifications.dismiss_all();
                Vec::new()
            }
        }
    }

    pub(super) fn request_load(&mut self) -> Vec<Effect> {
        self.telemetry.record(TelemetryEvent::LoadRequested);
        self.in_flight += 1;
        vec![Effect::Load]
    }

    pub(super) fn finish_load(&mut self, result: Result<Vec<Task>, String>) -> Vec<Effect> {
        self.settle_call();
        match result {
            Ok(tasks) => {
                let count = tasks.len();
                let mut seen = HashSet::new();
                self.tasks = tasks
                    .into_iter()
                    .filter(|task| !task.is_placeholder() && seen.insert(task.id))
                    .collect();
                if self.tasks.len() != count {
                    tracing::warn!(
                        received = count,
                        kept = self.tasks.len(),
                        "dropped todos without a usable id from load"
                    );
                }
                self.telemetry.record(TelemetryEvent::LoadCompleted {
                    count: self.tasks.len(),
                });
                Vec::new()
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to load todos");
                self.telemetry
                    .record(TelemetryEvent::LoadFailed { error: err });
                self.raise(NotificationFlag::LoadFailed)
            }
        }
    }

    pub(super) fn submit(&mut self, raw_title: &str) -> Vec<Effect> {
        if self.input_locked {
            tracing::debug!("ignoring submit while input is locked");
            return Vec::new();
        }

        let draft = match prepare_new_task(self.owner_id, raw_title) {
            Ok(draft) => draft,
            Err(_) => return self.raise(NotificationFlag::EmptyTitle),
        };

        self.placeholder_task = Some(draft.placeholder());
        self.input_locked = true;
        self.in_flight += 1;
        self.telemetry.record(TelemetryEvent::CreateStarted);
        vec![Effect::Create(draft)]
    }

    pub(super) fn finish_create(&mut self, result: Result<Task, String>) -> Vec<Effect> {
        self.settle_call();
        self.placeholder_task = None;
        self.input_locked = false;

        let result = result.and_then(|task| {
            if task.id == PLACEHOLDER_ID {
                Err(format!("created todo '{}' has no id", task.title))
            } else {
                Ok(task)
            }
        });

        match result {
            Ok(task) => {
                let id = task.id;
                if self.tasks.iter().any(|existing| existing.id == id) {
                    tracing::warn!(task_id = id, "created todo is already in the collection");
                } else {
                    self.tasks.push(task);
                }
                self.draft_title.clear();
                self.telemetry.record(TelemetryEvent::CreateFinished(id));
                Vec::new()
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to add todo");
                self.telemetry
                    .record(TelemetryEvent::CreateFailed { error: err });
                self.raise(NotificationFlag::AddFailed)
            }
        }
    }

    pub(super) fn request_delete(&mut self, id: u64) -> Vec<Effect> {
        if id == PLACEHOLDER_ID {
            tracing::debug!("ignoring delete of unconfirmed todo");
            return Vec::new();
        }
        self.pending_delete_id = Some(id);
        self.input_locked = true;
        vec![self.start_delete(id, DeleteOrigin::Single)]
    }

    /// Deletes every task completed right now, one independent call each. The batch has no
    /// completion of its own: each call settles on its own message.
    pub(super) fn clear_completed(&mut self) -> Vec<Effect> {
        self.input_locked = true;
        let targets: Vec<u64> = self
            .tasks
            .iter()
            .filter(|task| task.completed)
            .map(|task| task.id)
            .collect();

        if targets.is_empty() {
            self.input_locked = false;
            return Vec::new();
        }

        targets
            .into_iter()
            .map(|id| self.start_delete(id, DeleteOrigin::Batch))
            .collect()
    }

    fn start_delete(&mut self, id: u64, origin: DeleteOrigin) -> Effect {
        self.in_flight += 1;
        self.telemetry.record(TelemetryEvent::DeleteStarted {
            id,
            action: origin.label(),
        });
        Effect::Delete { id, origin }
    }

    pub(super) fn finish_delete(
        &mut self,
        id: u64,
        origin: DeleteOrigin,
        result: Result<(), String>,
    ) -> Vec<Effect> {
        self.settle_call();
        match result {
            Ok(()) => {
                self.tasks.retain(|task| task.id != id);
                self.input_locked = false;
                if self.pending_delete_id == Some(id) {
                    self.pending_delete_id = None;
                }
                self.telemetry.record(TelemetryEvent::DeleteApplied {
                    id,
                    action: origin.label(),
                });
                Vec::new()
            }
            Err(err) => {
                tracing::warn!(
                    task_id = id,
                    action = origin.label(),
                    error = %err,
                    "failed to delete todo"
                );
                self.telemetry.record(TelemetryEvent::DeleteFailed {
                    id,
                    action: origin.label(),
                    error: err,
                });
                match origin {
                    DeleteOrigin::Single => {
                        if self.release_lock_on_delete_failure {
                            self.input_locked = false;
                            if self.pending_delete_id == Some(id) {
                                self.pending_delete_id = None;
                            }
                        }
                        self.raise(NotificationFlag::DeleteFailed)
                    }
                    DeleteOrigin::Batch => {
                        self.input_locked = false;
                        self.raise(NotificationFlag::CompletedDeleteFailed)
                    }
                }
            }
        }
    }

    pub(super) fn set_filter(&mut self, mode: FilterMode) {
        self.filter_mode = mode;
    }

    fn raise(&mut self, flag: NotificationFlag) -> Vec<Effect> {
        self.telemetry
            .record(TelemetryEvent::NotificationRaised(flag));
        vec![Effect::ScheduleExpiry(self.notifications.raise(flag))]
    }

    pub(super) fn expire_notification(&mut self, ticket: ExpiryTicket) {
        if self.notifications.expire(&ticket) {
            self.telemetry
                .record(TelemetryEvent::NotificationExpired(ticket.flag));
        }
    }

    fn settle_call(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }
}
