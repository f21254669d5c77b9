//! HTTP client for the server's REST task endpoints.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use deployctl_core::{TaskDetail, TaskId, TaskSummary};

use crate::error::ClientError;
use crate::gateway::TaskStatusGateway;

const API_KEY_HEADER: &str = "X-Octopus-ApiKey";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// One page of a paged collection response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Page<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
    #[serde(default)]
    links: HashMap<String, String>,
}

impl<T> Page<T> {
    fn next_link(&self) -> Option<&str> {
        self.links.get("Page.Next").map(String::as_str)
    }
}

/// Error body returned by the server on failed requests.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ApiErrorBody {
    error_message: String,
}

/// HTTP client for the task REST API.
pub struct HttpClient {
    inner: reqwest::Client,
    base_url: String,
    api_key: String,
    space: Option<String>,
}

impl HttpClient {
    /// Create a new HTTP client.
    ///
    /// `space` scopes every request to that space; `None` uses the server default.
    pub fn new(
        base_url: &str,
        api_key: impl Into<String>,
        space: Option<String>,
    ) -> Result<Self, ClientError> {
        let inner = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ClientError::Connection(e.to_string()))?;

        Ok(Self {
            inner,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            space: space.filter(|s| !s.is_empty()),
        })
    }

    /// Absolute URL of the tasks collection.
    fn tasks_url(&self) -> String {
        match &self.space {
            Some(space) => format!("{}/api/{}/tasks", self.base_url, space),
            None => format!("{}/api/tasks", self.base_url),
        }
    }

    fn task_url(&self, id: &TaskId, suffix: &str) -> String {
        format!("{}/{}/{}", self.tasks_url(), id, suffix)
    }

    /// Resolve a link returned by the server, which is relative to the host.
    fn resolve_link(&self, link: &str) -> String {
        if link.starts_with("http://") || link.starts_with("https://") {
            link.to_string()
        } else {
            format!("{}/{}", self.base_url, link.trim_start_matches('/'))
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = request.header(API_KEY_HEADER, &self.api_key).send().await?;
        decode(response).await
    }
}

/// Map a response to either its decoded body or a `ClientError`.
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return response
            .json()
            .await
            .map_err(|e| ClientError::Serialization(e.to_string()));
    }

    let url = response.url().path().to_string();
    let body = response.text().await.unwrap_or_default();
    let message = error_message(&body).unwrap_or_else(|| format!("{} {}", status, url));

    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(ClientError::NotFound(message));
    }
    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}

fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .map(|b| b.error_message)
        .filter(|m| !m.is_empty())
}

#[async_trait]
impl TaskStatusGateway for HttpClient {
    async fn fetch_tasks(&self, ids: &[TaskId]) -> Result<Vec<TaskSummary>, ClientError> {
        let joined = ids.iter().map(TaskId::as_str).collect::<Vec<_>>().join(",");
        let take = ids.len().to_string();

        let mut tasks = Vec::with_capacity(ids.len());
        let mut page: Page<TaskSummary> = {
            let url = self.tasks_url();
            debug!(url = %url, count = ids.len(), "Fetching tasks");
            self.get_json(
                self.inner
                    .get(&url)
                    .query(&[("ids", joined.as_str()), ("take", take.as_str())]),
            )
            .await?
        };

        loop {
            let next = page.next_link().map(|link| self.resolve_link(link));
            tasks.append(&mut page.items);
            let Some(url) = next else { break };

            debug!(url = %url, "Fetching next page of tasks");
            page = self.get_json(self.inner.get(&url)).await?;
        }

        Ok(tasks)
    }

    async fn fetch_task_detail(&self, id: &TaskId) -> Result<TaskDetail, ClientError> {
        let url = self.task_url(id, "details");
        debug!(url = %url, "Fetching task detail");
        self.get_json(self.inner.get(&url).query(&[("verbose", "false")]))
            .await
    }

    /// Every ID gets a cancel request. Fails only when none of them succeed.
    async fn cancel_tasks(&self, ids: &[TaskId]) -> Result<Vec<TaskSummary>, ClientError> {
        let mut cancelled = Vec::with_capacity(ids.len());
        let mut last_error = None;
        for id in ids {
            let url = self.task_url(id, "cancel");
            debug!(url = %url, "Cancelling task");
            match self.get_json::<TaskSummary>(self.inner.post(&url)).await {
                Ok(task) => cancelled.push(task),
                Err(e) => {
                    warn!(task_id = %id, error = %e, "Failed to cancel task");
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) if cancelled.is_empty() => Err(e),
            _ => Ok(cancelled),
        }
    }
}
