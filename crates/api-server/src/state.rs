//! Application state

use std::sync::Arc;

use todo_core::appwrite::AppwriteClient;
use todo_core::memory::MemoryBackend;
use todo_core::ops::ReorderOptions;
use todo_core::task::TaskRepository;
use todo_core::user::{FileStorage, UserDirectory};

use crate::config::{BackendConfig, FunctionConfig};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    backend: &'static str,
    tasks: Arc<dyn TaskRepository>,
    users: Arc<dyn UserDirectory>,
    files: Arc<dyn FileStorage>,
    bucket_id: Option<String>,
    reorder: ReorderOptions,
}

impl AppState {
    /// Build the state around a single backend serving tasks, users and files
    pub fn new<B>(
        backend_name: &'static str,
        backend: Arc<B>,
        bucket_id: Option<String>,
        reorder: ReorderOptions,
    ) -> Self
    where
        B: TaskRepository + UserDirectory + FileStorage + 'static,
    {
        Self::with_parts(
            backend_name,
            backend.clone(),
            backend.clone(),
            backend,
            bucket_id,
            reorder,
        )
    }

    pub fn with_parts(
        backend_name: &'static str,
        tasks: Arc<dyn TaskRepository>,
        users: Arc<dyn UserDirectory>,
        files: Arc<dyn FileStorage>,
        bucket_id: Option<String>,
        reorder: ReorderOptions,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                backend: backend_name,
                tasks,
                users,
                files,
                bucket_id,
                reorder,
            }),
        }
    }

    /// Construct the configured backend client
    pub async fn from_config(config: &FunctionConfig) -> todo_core::Result<Self> {
        let name = config.backend.name();
        let bucket_id = config.bucket_id.clone();

        Ok(match &config.backend {
            BackendConfig::Appwrite(appwrite) => {
                if appwrite.api_key.is_none() {
                    tracing::warn!("APPWRITE_API_KEY is not set; account deletion will fail");
                }
                let client = AppwriteClient::new(appwrite.clone())?;
                Self::new(name, Arc::new(client), bucket_id, config.reorder)
            }
            BackendConfig::Memory { seed } => {
                let backend = match seed {
                    Some(path) => MemoryBackend::load(path).await?,
                    None => MemoryBackend::new(),
                };
                Self::new(name, Arc::new(backend), bucket_id, config.reorder)
            }
        })
    }

    pub fn backend_name(&self) -> &'static str {
        self.inner.backend
    }

    pub fn tasks(&self) -> &dyn TaskRepository {
        self.inner.tasks.as_ref()
    }

    pub fn users(&self) -> &dyn UserDirectory {
        self.inner.users.as_ref()
    }

    pub fn files(&self) -> &dyn FileStorage {
        self.inner.files.as_ref()
    }

    pub fn bucket_id(&self) -> Option<&str> {
        self.inner.bucket_id.as_deref()
    }

    pub fn reorder_options(&self) -> ReorderOptions {
        self.inner.reorder
    }
}
