//! Async adapters that map session effects into remote task service calls.

use std::future::Future;
use std::sync::Arc;

use todo_sync_core::client::TaskService;
use todo_sync_core::model::NewTask;

use crate::app::message::Message;
use crate::app::state::DeleteOrigin;

pub(crate) fn load_command(service: Arc<dyn TaskService>) -> impl Future<Output = Message> {
    async move {
        let result = service.list().await.map_err(|err| err.to_string());
        Message::Loaded(result)
    }
}

pub(crate) fn create_command(
    service: Arc<dyn TaskService>,
    draft: NewTask,
) -> impl Future<Output = Message> {
    async move {
        let result = service.create(&draft).await.map_err(|err| err.to_string());
        Message::Created(result)
    }
}

pub(crate) fn delete_command(
    service: Arc<dyn TaskService>,
    id: u64,
    origin: DeleteOrigin,
) -> impl Future<Output = Message> {
    async move {
        let result = service.delete(id).await.map_err(|err| err.to_string());
        Message::Deleted { id, origin, result }
    }
}
