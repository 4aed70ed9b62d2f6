//! Todo Commands
//!
//! The controller talks to the store only through [`TodoGateway`]; the
//! browser build uses [`HttpGateway`] against `/api/todo`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::controller::Mutation;
use crate::models::Todo;

// ========================
// Argument Structs
// ========================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoArgs<'a> {
    pub todo: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_completed: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

// ========================
// Gateway
// ========================

#[async_trait(?Send)]
pub trait TodoGateway {
    async fn list_todos(&self) -> Result<Vec<Todo>, String>;

    async fn create_todo(&self, todo: &str) -> Result<(), String>;

    async fn update_todo(&self, id: &str, todo: &str, is_completed: bool) -> Result<(), String>;

    async fn delete_todo(&self, id: &str) -> Result<(), String>;

    /// Send a planned mutation to the store
    async fn apply(&self, mutation: &Mutation) -> Result<(), String> {
        match mutation {
            Mutation::Create { todo } => self.create_todo(todo).await,
            Mutation::Edit {
                id,
                todo,
                is_completed,
            }
            | Mutation::Toggle {
                id,
                todo,
                is_completed,
            } => self.update_todo(id, todo, *is_completed).await,
            Mutation::Delete { id } => self.delete_todo(id).await,
        }
    }
}

/// Gateway client over HTTP
#[derive(Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn collection_url(&self) -> String {
        join_url(&self.base_url, "/api/todo")
    }

    pub fn item_url(&self, id: &str) -> String {
        join_url(&self.base_url, &format!("/api/todo/{}", id))
    }

    pub fn events_url(&self) -> String {
        join_url(&self.base_url, "/api/events")
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

/// Turn a non-2xx reply into its `{error}` message
async fn expect_success(response: reqwest::Response) -> Result<reqwest::Response, String> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    match response.json::<ErrorBody>().await {
        Ok(body) => Err(body.error),
        Err(_) => Err(format!("HTTP {}", status)),
    }
}

#[async_trait(?Send)]
impl TodoGateway for HttpGateway {
    async fn list_todos(&self) -> Result<Vec<Todo>, String> {
        let response = self
            .client
            .get(self.collection_url())
            .send()
            .await
            .map_err(|e| e.to_string())?;
        expect_success(response)
            .await?
            .json::<Vec<Todo>>()
            .await
            .map_err(|e| e.to_string())
    }

    async fn create_todo(&self, todo: &str) -> Result<(), String> {
        let args = TodoArgs {
            todo,
            is_completed: None,
        };
        let response = self
            .client
            .post(self.collection_url())
            .json(&args)
            .send()
            .await
            .map_err(|e| e.to_string())?;
        expect_success(response).await.map(|_| ())
    }

    async fn update_todo(&self, id: &str, todo: &str, is_completed: bool) -> Result<(), String> {
        let args = TodoArgs {
            todo,
            is_completed: Some(is_completed),
        };
        let response = self
            .client
            .put(self.item_url(id))
            .json(&args)
            .send()
            .await
            .map_err(|e| e.to_string())?;
        expect_success(response).await.map(|_| ())
    }

    async fn delete_todo(&self, id: &str) -> Result<(), String> {
        let response = self
            .client
            .delete(self.item_url(id))
            .send()
            .await
            .map_err(|e| e.to_string())?;
        expect_success(response).await.map(|_| ())
    }
}
