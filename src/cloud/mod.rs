//! Ports to the AWS services behind the dashboard. Handlers only see these
//! traits; [`aws::AwsCloud`] is the production implementation.

pub mod arn;
pub mod aws;
pub mod types;

use std::fmt;
use std::sync::Arc;

use self::types::{ClusterDescription, Datapoint, LogEvent, LogQuery, MetricQuery, Service, Task};

#[derive(Debug, thiserror::Error)]
pub enum CloudError {
    /// The SDK call itself failed (network, credentials, throttling, bad input).
    #[error("{operation} failed: {message}")]
    Api {
        operation: &'static str,
        message: String,
    },
    /// The call succeeded but the service reported a lookup failure.
    #[error("{reason}")]
    Failure { reason: String, arn: Option<String> },
}

impl CloudError {
    pub fn api(operation: &'static str, err: impl fmt::Display) -> Self {
        Self::Api {
            operation,
            message: err.to_string(),
        }
    }
}

#[axum::async_trait]
pub trait EcsApi: Send + Sync {
    async fn describe_clusters(&self, clusters: &[String]) -> Result<ClusterDescription, CloudError>;

    /// Every cluster ARN in the account/region, all pages.
    async fn list_clusters(&self) -> Result<Vec<String>, CloudError>;

    /// Every service ARN in `cluster`, all pages.
    async fn list_services(&self, cluster: &str) -> Result<Vec<String>, CloudError>;

    async fn describe_services(
        &self,
        cluster: &str,
        services: &[String],
    ) -> Result<Vec<Service>, CloudError>;

    /// Task ARNs belonging to `service` in `cluster`, all pages.
    async fn list_tasks(&self, cluster: &str, service: &str) -> Result<Vec<String>, CloudError>;

    async fn describe_tasks(&self, cluster: &str, tasks: &[String]) -> Result<Vec<Task>, CloudError>;
}

#[axum::async_trait]
pub trait MetricsApi: Send + Sync {
    async fn get_metric_statistics(&self, query: &MetricQuery) -> Result<Vec<Datapoint>, CloudError>;
}

#[axum::async_trait]
pub trait LogsApi: Send + Sync {
    async fn get_log_events(&self, query: &LogQuery) -> Result<Vec<LogEvent>, CloudError>;
}

/// Long-lived client handles shared by every request.
#[derive(Clone)]
pub struct CloudClients {
    pub ecs: Arc<dyn EcsApi>,
    pub metrics: Arc<dyn MetricsApi>,
    pub logs: Arc<dyn LogsApi>,
}

impl CloudClients {
    /// Uses one value for all three ports.
    pub fn from_backend<B>(backend: Arc<B>) -> Self
    where
        B: EcsApi + MetricsApi + LogsApi + 'static,
    {
        Self {
            ecs: backend.clone(),
            metrics: backend.clone(),
            logs: backend,
        }
    }
}
