use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use serde::Serialize;

use crate::cloud::arn::{resource_name, ArnView};
use crate::cloud::types::{Cluster, Deployment, Service, ServiceEvent};
use crate::cloud::{CloudError, EcsApi};

const UNKNOWN_FAILURE: &str = "Cluster lookup failed";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSummary {
    pub cluster_arn: String,
    pub cluster_name: String,
    pub arn: ArnView,
    pub status: Option<String>,
    pub registered_container_instances_count: i32,
    pub running_tasks_count: i32,
    pub pending_tasks_count: i32,
    pub active_services_count: i32,
    pub capacity_providers: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSummary {
    pub service_arn: String,
    pub service_name: String,
    pub arn: ArnView,
    pub status: Option<String>,
    pub desired_count: i32,
    pub running_count: i32,
    pub pending_count: i32,
    pub launch_type: Option<String>,
    pub task_definition: Option<String>,
    pub role_arn: Option<String>,
    pub role: Option<ArnView>,
    pub created_at: Option<DateTime<Utc>>,
    pub deployments: Vec<DeploymentSummary>,
    pub events: Vec<ServiceEventSummary>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentSummary {
    pub id: Option<String>,
    pub status: Option<String>,
    pub task_definition: Option<String>,
    pub desired_count: i32,
    pub running_count: i32,
    pub pending_count: i32,
    pub failed_tasks: i32,
    pub rollout_state: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceEventSummary {
    pub id: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterDetail {
    pub cluster: ClusterSummary,
    pub services: Vec<ServiceSummary>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterOverview {
    pub cluster_arn: String,
    pub cluster_name: String,
    pub services: Vec<ServiceOverview>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceOverview {
    pub service_arn: String,
    pub service_name: String,
    pub status: Option<String>,
    pub desired_count: i32,
    pub running_count: i32,
    pub pending_count: i32,
}

impl From<Cluster> for ClusterSummary {
    fn from(c: Cluster) -> Self {
        Self {
            arn: ArnView::parse(&c.arn),
            cluster_arn: c.arn,
            cluster_name: c.name,
            status: c.status,
            registered_container_instances_count: c.registered_container_instances,
            running_tasks_count: c.running_tasks,
            pending_tasks_count: c.pending_tasks,
            active_services_count: c.active_services,
            capacity_providers: c.capacity_providers,
        }
    }
}

impl ServiceSummary {
    /// Flattens a described service, keeping at most `event_limit` of its
    /// newest events.
    pub fn from_service(service: Service, event_limit: usize) -> Self {
        let mut events = service.events;
        events.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        events.truncate(event_limit);

        Self {
            arn: ArnView::parse(&service.arn),
            role: service.role_arn.as_deref().map(ArnView::parse),
            service_arn: service.arn,
            service_name: service.name,
            status: service.status,
            desired_count: service.desired_count,
            running_count: service.running_count,
            pending_count: service.pending_count,
            launch_type: service.launch_type,
            task_definition: service.task_definition,
            role_arn: service.role_arn,
            created_at: service.created_at,
            deployments: service.deployments.into_iter().map(Into::into).collect(),
            events: events.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<Deployment> for DeploymentSummary {
    fn from(d: Deployment) -> Self {
        Self {
            id: d.id,
            status: d.status,
            task_definition: d.task_definition,
            desired_count: d.desired_count,
            running_count: d.running_count,
            pending_count: d.pending_count,
            failed_tasks: d.failed_tasks,
            rollout_state: d.rollout_state,
            created_at: d.created_at,
            updated_at: d.updated_at,
        }
    }
}

impl From<ServiceEvent> for ServiceEventSummary {
    fn from(e: ServiceEvent) -> Self {
        Self {
            id: e.id,
            created_at: e.created_at,
            message: e.message,
        }
    }
}

impl From<Service> for ServiceOverview {
    fn from(s: Service) -> Self {
        Self {
            service_arn: s.arn,
            service_name: s.name,
            status: s.status,
            desired_count: s.desired_count,
            running_count: s.running_count,
            pending_count: s.pending_count,
        }
    }
}

/// Describes `cluster` and turns a reported lookup failure into
/// [`CloudError::Failure`].
pub async fn require_cluster(ecs: &dyn EcsApi, cluster: &str) -> Result<Cluster, CloudError> {
    let description = ecs.describe_clusters(&[cluster.to_string()]).await?;

    if let Some(failure) = description.failures.into_iter().next() {
        tracing::warn!(
            cluster,
            reason = ?failure.reason,
            arn = ?failure.arn,
            "DescribeClusters reported a failure"
        );
        return Err(CloudError::Failure {
            reason: failure
                .reason
                .unwrap_or_else(|| UNKNOWN_FAILURE.to_string()),
            arn: failure.arn,
        });
    }

    description
        .clusters
        .into_iter()
        .next()
        .ok_or_else(|| CloudError::Failure {
            reason: UNKNOWN_FAILURE.to_string(),
            arn: None,
        })
}

/// Describes every service of `cluster_arn`, one DescribeServices call per
/// service, all in flight at once. Any failed call fails the whole listing.
async fn describe_each_service(
    ecs: &dyn EcsApi,
    cluster_arn: &str,
) -> Result<Vec<Service>, CloudError> {
    let service_arns = ecs.list_services(cluster_arn).await?;
    let described = try_join_all(
        service_arns
            .iter()
            .map(|arn| ecs.describe_services(cluster_arn, std::slice::from_ref(arn))),
    )
    .await?;
    Ok(described.into_iter().flatten().collect())
}

pub async fn describe_cluster(
    ecs: &dyn EcsApi,
    cluster: &str,
    event_limit: usize,
) -> Result<ClusterDetail, CloudError> {
    let found = require_cluster(ecs, cluster).await?;
    let services = describe_each_service(ecs, &found.arn).await?;

    Ok(ClusterDetail {
        cluster: found.into(),
        services: services
            .into_iter()
            .map(|s| ServiceSummary::from_service(s, event_limit))
            .collect(),
    })
}

pub async fn list_clusters(ecs: &dyn EcsApi) -> Result<Vec<ClusterOverview>, CloudError> {
    let cluster_arns = ecs.list_clusters().await?;

    try_join_all(cluster_arns.into_iter().map(|cluster_arn| async move {
        let services = describe_each_service(ecs, &cluster_arn).await?;
        Ok::<_, CloudError>(ClusterOverview {
            cluster_name: resource_name(&cluster_arn).to_string(),
            cluster_arn,
            services: services.into_iter().map(Into::into).collect(),
        })
    }))
    .await
}
