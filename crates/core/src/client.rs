//! Remote task service client: list, create and delete against one owner's todo collection.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Response, Url};

use crate::config::AppConfig;
use crate::error::ServiceError;
use crate::model::{NewTask, Task, PLACEHOLDER_ID};

/// Capabilities the session needs from the remote collection resource.
///
/// Implementations make exactly one attempt per call; retrying is up to the caller.
#[async_trait]
pub trait TaskService: Send + Sync {
    async fn list(&self) -> Result<Vec<Task>, ServiceError>;

    async fn create(&self, draft: &NewTask) -> Result<Task, ServiceError>;

    async fn delete(&self, id: u64) -> Result<(), ServiceError>;
}

#[derive(Debug, Clone)]
pub struct HttpTaskService {
    client: Client,
    collection_url: Url,
    owner_id: u64,
}

impl HttpTaskService {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .context("failed to build HTTP client")?;
        let mut collection_url = Url::parse(config.api_url())
            .with_context(|| format!("invalid API url '{}'", config.api_url()))?;
        collection_url
            .path_segments_mut()
            .map_err(|_| anyhow!("API url '{}' cannot carry a path", config.api_url()))?
            .pop_if_empty()
            .push("todos");
        Ok(Self {
            client,
            collection_url,
            owner_id: config.owner_id(),
        })
    }

    fn item_url(&self, id: u64) -> Url {
        let mut url = self.collection_url.clone();
        // The collection url was built through path segments, so it is always a base.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(&id.to_string());
        }
        url
    }
}

#[async_trait]
impl TaskService for HttpTaskService {
    async fn list(&self) -> Result<Vec<Task>, ServiceError> {
        let url = self.collection_url.as_str();
        tracing::debug!(url, owner_id = self.owner_id, "listing todos");
        let response = self
            .client
            .get(self.collection_url.clone())
            .query(&[("userId", self.owner_id)])
            .send()
            .await
            .map_err(|source| transport(url, source))?;
        let response = ensure_success("GET", url, response)?;
        let tasks: Vec<Task> = response
            .json()
            .await
            .map_err(|source| ServiceError::Decode {
                url: url.to_string(),
                source,
            })?;
        tracing::debug!(count = tasks.len(), "listed todos");
        Ok(tasks)
    }

    async fn create(&self, draft: &NewTask) -> Result<Task, ServiceError> {
        let url = self.collection_url.as_str();
        tracing::debug!(title = draft.title.as_str(), "creating todo");
        let response = self
            .client
            .post(self.collection_url.clone())
            .json(draft)
            .send()
            .await
            .map_err(|source| transport(url, source))?;
        let response = ensure_success("POST", url, response)?;
        let task: Task = response
            .json()
            .await
            .map_err(|source| ServiceError::Decode {
                url: url.to_string(),
                source,
            })?;
        if task.id == PLACEHOLDER_ID {
            return Err(ServiceError::InvalidResponse(format!(
                "created todo '{}' came back without an id",
                task.title
            )));
        }
        tracing::debug!(task_id = task.id, "created todo");
        Ok(task)
    }

    async fn delete(&self, id: u64) -> Result<(), ServiceError> {
        let url = self.item_url(id);
        tracing::debug!(task_id = id, "deleting todo");
        let response = self
            .client
            .delete(url.clone())
            .send()
            .await
            .map_err(|source| transport(url.as_str(), source))?;
        ensure_success("DELETE", url.as_str(), response)?;
        Ok(())
    }
}

fn transport(url: &str, source: reqwest::Error) -> ServiceError {
    ServiceError::Transport {
        url: url.to_string(),
        source,
    }
}

fn ensure_success(
    method: &'static str,
    url: &str,
    response: Response,
) -> Result<Response, ServiceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    tracing::debug!(method, url, status = status.as_u16(), "todo service rejected request");
    Err(ServiceError::Status {
        method,
        url: url.to_string(),
        status: status.as_u16(),
    })
}
