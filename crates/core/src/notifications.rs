//! Transient error flags with auto-expiry and the single message shown for them.
//!
//! Raising a flag hands back an [`ExpiryTicket`]; whoever owns the clock schedules it and
//! feeds it back through [`Notifications::expire`]. Re-raising bumps the flag's generation,
//! so an expiry scheduled for an earlier raise is ignored.

use std::time::Duration;

use serde::Serialize;

pub const LOAD_FAILED_MESSAGE: &str = "Unable to load todos";
pub const EMPTY_TITLE_MESSAGE: &str = "Title should not be empty";
pub const ADD_FAILED_MESSAGE: &str = "Unable to add a todo";
pub const DELETE_FAILED_MESSAGE: &str = "Unable to delete a todo";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NotificationFlag {
    LoadFailed,
    EmptyTitle,
    AddFailed,
    DeleteFailed,
    CompletedDeleteFailed,
}

impl NotificationFlag {
    pub const ALL: [NotificationFlag; 5] = [
        NotificationFlag::LoadFailed,
        NotificationFlag::EmptyTitle,
        NotificationFlag::AddFailed,
        NotificationFlag::DeleteFailed,
        NotificationFlag::CompletedDeleteFailed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationFlag::LoadFailed => "load_failed",
            NotificationFlag::EmptyTitle => "empty_title",
            NotificationFlag::AddFailed => "add_failed",
            NotificationFlag::DeleteFailed => "delete_failed",
            NotificationFlag::CompletedDeleteFailed => "completed_delete_failed",
        }
    }

    fn index(self) -> usize {
        match self {
            NotificationFlag::LoadFailed => 0,
            NotificationFlag::EmptyTitle => 1,
            NotificationFlag::AddFailed => 2,
            NotificationFlag::DeleteFailed => 3,
            NotificationFlag::CompletedDeleteFailed => 4,
        }
    }
}

/// Scheduling request for clearing one raise of a flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiryTicket {
    pub flag: NotificationFlag,
    pub generation: u64,
    pub after: Duration,
}

/// What presentation renders: whether the banner shows and the one line of text in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NotificationBanner {
    pub visible: bool,
    pub message: Option<&'static str>,
}

#[derive(Debug, Clone, Copy, Default)]
struct Slot {
    active: bool,
    generation: u64,
}

#[derive(Debug, Clone)]
pub struct Notifications {
    ttl: Duration,
    slots: [Slot; 5],
}

impl Notifications {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slots: [Slot::default(); 5],
        }
    }

    pub fn raise(&mut self, flag: NotificationFlag) -> ExpiryTicket {
        let slot = &mut self.slots[flag.index()];
        slot.active = true;
        slot.generation = slot.generation.wrapping_add(1);
        ExpiryTicket {
            flag,
            generation: slot.generation,
            after: self.ttl,
        }
    }

    /// Clear the flag if `ticket` belongs to its latest raise. Returns whether anything changed.
    pub fn expire(&mut self, ticket: &ExpiryTicket) -> bool {
        let slot = &mut self.slots[ticket.flag.index()];
        if slot.active && slot.generation == ticket.generation {
            slot.active = false;
            return true;
        }
        false
    }

    pub fn dismiss(&mut self, flag: NotificationFlag) -> bool {
        let slot = &mut self.slots[flag.index()];
        let was_active = slot.active;
        slot.active = false;
        slot.generation = slot.generation.wrapping_add(1);
        was_active
    }

    pub fn dismiss_all(&mut self) {
        for flag in NotificationFlag::ALL {
            self.dismiss(flag);
        }
    }

    pub fn is_active(&self, flag: NotificationFlag) -> bool {
        self.slots[flag.index()].active
    }

    pub fn active_flags(&self) -> Vec<NotificationFlag> {
        NotificationFlag::ALL
            .into_iter()
            .filter(|flag| self.is_active(*flag))
            .collect()
    }

    pub fn visible(&self) -> bool {
        self.slots.iter().any(|slot| slot.active)
    }

    /// Single line of text for the banner. An empty collection reads as a load failure and
    /// masks every other flag; masked flags stay raised.
    pub fn message(&self, has_tasks: bool) -> Option<&'static str> {
        if !self.visible() {
            return None;
        }
        if !has_tasks {
            return Some(LOAD_FAILED_MESSAGE);
        }
        if self.is_active(NotificationFlag::EmptyTitle) {
            return Some(EMPTY_TITLE_MESSAGE);
        }
        if self.is_active(NotificationFlag::AddFailed) {
            return Some(ADD_FAILED_MESSAGE);
        }
        if self.is_active(NotificationFlag::DeleteFailed)
            || self.is_active(NotificationFlag::CompletedDeleteFailed)
        {
            return Some(DELETE_FAILED_MESSAGE);
        }
        Some(LOAD_FAILED_MESSAGE)
    }

    pub fn banner(&self, has_tasks: bool) -> NotificationBanner {
        NotificationBanner {
            visible: self.visible(),
            message: self.message(has_tasks),
        }
    }
}
