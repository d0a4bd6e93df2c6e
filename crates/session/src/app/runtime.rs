//! Single-writer runtime: one task owns the session state and drains every message.
//!
//! Remote calls and notification timers run as their own tokio tasks and report back
//! through the same channel, so completions from a batch of deletes apply one at a time
//! in whatever order the network delivers them.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::{anyhow, Result};
use tokio::sync::{mpsc, watch};
use tokio::task::AbortHandle;
use todo_sync_core::client::TaskService;
use todo_sync_core::model::FilterMode;
use todo_sync_core::notifications::{ExpiryTicket, NotificationFlag};

use crate::app::commands::{create_command, delete_command, load_command};
use crate::app::message::{Effect, Intent, Message};
use crate::app::options::SessionOptions;
use crate::app::state::{SessionState, SessionView};

/// Start a session on the current tokio runtime and return the handle presentation talks to.
///
/// The session stops once every handle is dropped and its outstanding calls have settled.
pub fn spawn(service: Arc<dyn TaskService>, options: SessionOptions) -> SessionHandle {
    let (sender, inbox) = mpsc::unbounded_channel();
    let state = SessionState::new(&options);
    let (published, view) = watch::channel(state.view());

    let runtime = SessionRuntime {
        state,
        service,
        outbox: sender.downgrade(),
        inbox,
        timers: HashMap::new(),
        published,
    };
    tokio::spawn(runtime.run());

    SessionHandle {
        sender,
        view,
        intents_sent: Arc::new(AtomicU64::new(0)),
    }
}

struct SessionRuntime {
    state: SessionState,
    service: Arc<dyn TaskService>,
    outbox: mpsc::WeakUnboundedSender<Message>,
    inbox: mpsc::UnboundedReceiver<Message>,
    timers: HashMap<NotificationFlag, AbortHandle>,
    published: watch::Sender<SessionView>,
}

impl SessionRuntime {
    async fn run(mut self) {
        while let Some(message) = self.inbox.recv().await {
            for effect in self.state.react(message) {
                self.dispatch(effect);
            }
            self.published.send_replace(self.state.view());
        }

        for (_, timer) in self.timers.drain() {
            timer.abort();
        }
        tracing::debug!("session runtime stopped");
    }

    fn dispatch(&mut self, effect: Effect) {
        let Some(outbox) = self.outbox.upgrade() else {
            tracing::debug!(?effect, "session is shutting down, dropping effect");
            return;
        };

        match effect {
            Effect::Load => spawn_call(outbox, load_command(self.service.clone())),
            Effect::Create(draft) => {
                spawn_call(outbox, create_command(self.service.clone(), draft))
            }
            Effect::Delete { id, origin } => {
                spawn_call(outbox, delete_command(self.service.clone(), id, origin))
            }
            Effect::ScheduleExpiry(ticket) => self.schedule_expiry(outbox, ticket),
        }
    }

    /// One timer per flag: a re-raise aborts the previous timer before arming the next.
    fn schedule_expiry(&mut self, outbox: mpsc::UnboundedSender<Message>, ticket: ExpiryTicket) {
        let timer = tokio::spawn(async move {
            tokio::time::sleep(ticket.after).await;
            let _ = outbox.send(Message::NotificationExpired(ticket));
        });
        if let Some(previous) = self.timers.insert(ticket.flag, timer.abort_handle()) {
            previous.abort();
        }
    }
}

fn spawn_call<F>(outbox: mpsc::UnboundedSender<Message>, call: F)
where
    F: Future<Output = Message> + Send + 'static,
{
    tokio::spawn(async move {
        let message = call.await;
        if outbox.send(message).is_err() {
            tracing::debug!("session stopped before a remote call settled");
        }
    });
}

/// Cloneable entry point for presentation: send intents, read or await views.
#[derive(Clone)]
pub struct SessionHandle {
    sender: mpsc::UnboundedSender<Message>,
    view: watch::Receiver<SessionView>,
    intents_sent: Arc<AtomicU64>,
}

impl SessionHandle {
    pub fn send(&self, intent: Intent) -> Result<()> {
        self.intents_sent.fetch_add(1, Ordering::SeqCst);
        self.sender
            .send(Message::Intent(intent))
            .map_err(|_| anyhow!("session runtime has stopped"))
    }

    pub fn load(&self) -> Result<()> {
        self.send(Intent::Load)
    }

    pub fn set_draft(&self, text: impl Into<String>) -> Result<()> {
        self.send(Intent::SetDraft(text.into()))
    }

    pub fn submit(&self, title: impl Into<String>) -> Result<()> {
        self.send(Intent::Submit(title.into()))
    }

    pub fn submit_draft(&self) -> Result<()> {
        self.send(Intent::SubmitDraft)
    }

    pub fn delete(&self, id: u64) -> Result<()> {
        self.send(Intent::Delete(id))
    }

    pub fn clear_completed(&self) -> Result<()> {
        self.send(Intent::ClearCompleted)
    }

    pub fn set_filter(&self, mode: FilterMode) -> Result<()> {
        self.send(Intent::SetFilter(mode))
    }

    pub fn dismiss_notifications(&self) -> Result<()> {
        self.send(Intent::DismissNotifications)
    }

    /// Latest published view.
    pub fn view(&self) -> SessionView {
        self.view.borrow().clone()
    }

    pub async fn wait_until<F>(&mut self, predicate: F) -> Result<SessionView>
    where
        F: FnMut(&SessionView) -> bool,
    {
        let view = self
            .view
            .wait_for(predicate)
            .await
            .map_err(|_| anyhow!("session runtime has stopped"))?;
        Ok(view.clone())
    }

    /// Wait until every intent sent so far is handled and no remote call is outstanding.
    pub async fn settled(&mut self) -> Result<SessionView> {
        let sent = self.intents_sent.load(Ordering::SeqCst);
        self.wait_until(move |view| view.intents_handled >= sent && view.in_flight == 0)
            .await
    }
}
