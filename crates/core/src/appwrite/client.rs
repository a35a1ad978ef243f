//! Appwrite REST client
//!
//! Talks to the database, storage and users endpoints of an Appwrite
//! project. One client is built per process and handed to the operations
//! that need it.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::query::Query;
use crate::error::Error;
use crate::task::{TaskRecord, TaskRepository};
use crate::user::{FileStorage, User, UserDirectory};
use crate::Result;

pub const DEFAULT_ENDPOINT: &str = "https://cloud.appwrite.io/v1";

/// Documents requested per list call
pub const LIST_PAGE_SIZE: usize = 100;

/// Connection settings for an Appwrite project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppwriteConfig {
    pub endpoint: String,
    pub project_id: String,
    pub api_key: Option<String>,
    pub database_id: String,
    pub collection_id: String,
}

impl AppwriteConfig {
    pub fn new(
        project_id: impl Into<String>,
        database_id: impl Into<String>,
        collection_id: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            project_id: project_id.into(),
            api_key: None,
            database_id: database_id.into(),
            collection_id: collection_id.into(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}

#[derive(Deserialize)]
struct DocumentList {
    #[serde(default)]
    documents: Vec<TaskRecord>,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
    #[serde(rename = "type", default)]
    kind: Option<String>,
}

pub struct AppwriteClient {
    client: Client,
    config: AppwriteConfig,
    page_size: usize,
}

impl AppwriteClient {
    pub fn new(config: AppwriteConfig) -> Result<Self> {
        if config.project_id.trim().is_empty() {
            return Err(Error::Config("Appwrite project ID is empty".into()));
        }

        let client = Client::builder().build()?;

        Ok(Self {
            client,
            config,
            page_size: LIST_PAGE_SIZE,
        })
    }

    /// Override the number of documents requested per list call
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.endpoint.trim_end_matches('/'), path)
    }

    fn documents_path(&self) -> String {
        format!(
            "/databases/{}/collections/{}/documents",
            urlencoding::encode(&self.config.database_id),
            urlencoding::encode(&self.config.collection_id)
        )
    }

    fn document_path(&self, id: &str) -> String {
        format!("{}/{}", self.documents_path(), urlencoding::encode(id))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        debug!("Appwrite {} {}", method, path);

        let builder = self
            .client
            .request(method, self.url(path))
            .header("X-Appwrite-Project", &self.config.project_id)
            .header("X-Appwrite-Response-Format", "1.5.0");

        match &self.config.api_key {
            Some(key) => builder.header("X-Appwrite-Key", key),
            None => builder,
        }
    }

    async fn check(resp: Response) -> Result<Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        Err(match serde_json::from_str::<ErrorBody>(&body) {
            Ok(err) => Error::Backend {
                code: status.as_u16(),
                kind: err.kind,
                message: err.message,
            },
            Err(_) if body.trim().is_empty() => {
                Error::backend(status.as_u16(), format!("HTTP {}", status))
            }
            Err(_) => Error::backend(status.as_u16(), body),
        })
    }

    async fn send_json<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T> {
        let resp = Self::check(builder.send().await?).await?;
        let bytes = resp.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn send_empty(builder: RequestBuilder) -> Result<()> {
        Self::check(builder.send().await?).await?;
        Ok(())
    }

    async fn list_page(&self, user_id: &str, cursor: Option<&str>) -> Result<Vec<TaskRecord>> {
        let mut queries = vec![
            Query::equal("userId", user_id),
            Query::order_asc("order"),
            Query::limit(self.page_size),
        ];
        if let Some(cursor) = cursor {
            queries.push(Query::cursor_after(cursor));
        }

        let params: Vec<(&str, String)> = queries
            .iter()
            .map(|q| ("queries[]", q.to_string()))
            .collect();

        let list: DocumentList =
            Self::send_json(self.request(Method::GET, &self.documents_path()).query(&params))
                .await?;
        Ok(list.documents)
    }
}

#[async_trait]
impl TaskRepository for AppwriteClient {
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<TaskRecord>> {
        let mut records = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let page = self.list_page(user_id, cursor.as_deref()).await?;
            let fetched = page.len();
            cursor = page.last().map(|record| record.id.clone());
            records.extend(page);

            if fetched < self.page_size {
                break;
            }
        }

        debug!("Fetched {} tasks for user {:?}", records.len(), user_id);
        Ok(records)
    }

    async fn update_order(&self, id: &str, order: i64) -> Result<TaskRecord> {
        Self::send_json(
            self.request(Method::PATCH, &self.document_path(id))
                .json(&json!({ "data": { "order": order } })),
        )
        .await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        Self::send_empty(self.request(Method::DELETE, &self.document_path(id))).await
    }
}

#[async_trait]
impl UserDirectory for AppwriteClient {
    async fn get(&self, user_id: &str) -> Result<User> {
        let path = format!("/users/{}", urlencoding::encode(user_id));
        Self::send_json(self.request(Method::GET, &path)).await
    }

    async fn delete(&self, user_id: &str) -> Result<()> {
        let path = format!("/users/{}", urlencoding::encode(user_id));
        Self::send_empty(self.request(Method::DELETE, &path)).await
    }
}

#[async_trait]
impl FileStorage for AppwriteClient {
    async fn delete_file(&self, bucket_id: &str, file_id: &str) -> Result<()> {
        let path = format!(
            "/storage/buckets/{}/files/{}",
            urlencoding::encode(bucket_id),
            urlencoding::encode(file_id)
        );
        Self::send_empty(self.request(Method::DELETE, &path)).await
    }
}
