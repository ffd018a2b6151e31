use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::core::{AppError, Result};
use crate::modules::paypal::models::ProcessStatus;

/// How long a finished process stays pollable
pub const DEFAULT_RETENTION: Duration = Duration::from_secs(15 * 60);

#[derive(Debug, Clone)]
struct ProcessEntry {
    status: ProcessStatus,
    finished_at: Option<Instant>,
}

/// Tracks gateway operations running in the background
///
/// Finished processes are dropped once they are older than the retention
/// window. Pending ones are kept until their task ends.
#[derive(Debug, Clone)]
pub struct ProcessRegistry {
    processes: Arc<RwLock<HashMap<Uuid, ProcessEntry>>>,
    retention: Duration,
}

impl Default for ProcessRegistry {
    fn default() -> Self {
        Self::with_retention(DEFAULT_RETENTION)
    }
}

impl ProcessRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_retention(retention: Duration) -> Self {
        Self {
            processes: Arc::new(RwLock::new(HashMap::new())),
            retention,
        }
    }

    /// Spawn `operation` on the runtime and return its process token
    ///
    /// The token is registered as pending before the task starts, so a
    /// caller polling right away never sees an unknown token.
    pub async fn start<F, T>(&self, name: &'static str, operation: F) -> Uuid
    where
        F: Future<Output = Result<T>> + Send + 'static,
        T: Serialize + Send + 'static,
    {
        let token = Uuid::new_v4();
        {
            let mut processes = self.processes.write().await;
            self.prune(&mut processes);
            processes.insert(
                token,
                ProcessEntry {
                    status: ProcessStatus::Pending,
                    finished_at: None,
                },
            );
        }

        let processes = Arc::clone(&self.processes);
        tokio::spawn(async move {
            let status = match operation.await {
                Ok(value) => match serde_json::to_value(value) {
                    Ok(result) => ProcessStatus::Completed { result },
                    Err(e) => ProcessStatus::Failed {
                        error_msg: format!("Failed to serialize process result: {}", e),
                    },
                },
                Err(e) => ProcessStatus::Failed {
                    error_msg: e.message(),
                },
            };

            match &status {
                ProcessStatus::Failed { error_msg } => {
                    warn!(process = %name, token = %token, error = %error_msg, "Process failed")
                }
                _ => info!(process = %name, token = %token, "Process completed"),
            }

            processes.write().await.insert(
                token,
                ProcessEntry {
                    status,
                    finished_at: Some(Instant::now()),
                },
            );
        });

        info!(process = %name, token = %token, "Process started");
        token
    }

    pub async fn status(&self, token: Uuid) -> Result<ProcessStatus> {
        let mut processes = self.processes.write().await;
        self.prune(&mut processes);

        processes
            .get(&token)
            .map(|entry| entry.status.clone())
            .ok_or_else(|| AppError::not_found(format!("Process {}", token)))
    }

    /// Number of tracked processes, pending or finished
    pub async fn len(&self) -> usize {
        self.processes.read().await.len()
    }

    fn prune(&self, processes: &mut HashMap<Uuid, ProcessEntry>) {
        let before = processes.len();
        processes.retain(|_, entry| match entry.finished_at {
            Some(finished_at) => finished_at.elapsed() < self.retention,
            None => true,
        });

        let evicted = before - processes.len();
        if evicted > 0 {
            debug!(evicted, "Evicted finished processes");
        }
    }
}
