use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_cloudwatch::primitives::DateTime as SmithyDateTime;
use aws_sdk_cloudwatch::types as cw;
use aws_sdk_ecs::error::DisplayErrorContext;
use aws_sdk_ecs::types as ecs;
use chrono::{DateTime, Utc};

use super::types::{
    Cluster, ClusterDescription, ClusterFailure, Container, Datapoint, Deployment, Dimension, LogEvent,
    LogQuery, MetricQuery, Service, ServiceEvent, Statistic, Task,
};
use super::{CloudError, EcsApi, LogsApi, MetricsApi};
use crate::config::AwsConfig;

/// DescribeServices accepts at most 10 identifiers per call.
const DESCRIBE_SERVICES_BATCH: usize = 10;
/// DescribeTasks accepts at most 100 identifiers per call.
const DESCRIBE_TASKS_BATCH: usize = 100;

pub struct AwsCloud {
    ecs: aws_sdk_ecs::Client,
    cloudwatch: aws_sdk_cloudwatch::Client,
    logs: aws_sdk_cloudwatchlogs::Client,
}

impl AwsCloud {
    /// Resolves region and credentials through the standard provider chain,
    /// with explicit overrides from `config`.
    pub async fn connect(config: &AwsConfig) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &config.region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let Some(profile) = &config.profile {
            loader = loader.profile_name(profile);
        }
        if let Some(endpoint) = &config.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }
        let sdk_config = loader.load().await;
        tracing::info!(region = ?sdk_config.region(), "AWS clients configured");
        Self::from_sdk_config(&sdk_config)
    }

    pub fn from_sdk_config(sdk_config: &SdkConfig) -> Self {
        Self {
            ecs: aws_sdk_ecs::Client::new(sdk_config),
            cloudwatch: aws_sdk_cloudwatch::Client::new(sdk_config),
            logs: aws_sdk_cloudwatchlogs::Client::new(sdk_config),
        }
    }
}

#[axum::async_trait]
impl EcsApi for AwsCloud {
    async fn describe_clusters(&self, clusters: &[String]) -> Result<ClusterDescription, CloudError> {
        let out = self
            .ecs
            .describe_clusters()
            .set_clusters(Some(clusters.to_vec()))
            .send()
            .await
            .map_err(|e| CloudError::api("DescribeClusters", DisplayErrorContext(&e)))?;

        Ok(ClusterDescription {
            clusters: out.clusters().iter().map(cluster_from_sdk).collect(),
            failures: out
                .failures()
                .iter()
                .map(|f| ClusterFailure {
                    arn: f.arn().map(str::to_string),
                    reason: f.reason().map(str::to_string),
                })
                .collect(),
        })
    }

    async fn list_clusters(&self) -> Result<Vec<String>, CloudError> {
        self.ecs
            .list_clusters()
            .into_paginator()
            .items()
            .send()
            .collect::<Result<Vec<_>, _>>()
            .await
            .map_err(|e| CloudError::api("ListClusters", DisplayErrorContext(&e)))
    }

    async fn list_services(&self, cluster: &str) -> Result<Vec<String>, CloudError> {
        self.ecs
            .list_services()
            .cluster(cluster)
            .into_paginator()
            .items()
            .send()
            .collect::<Result<Vec<_>, _>>()
            .await
            .map_err(|e| CloudError::api("ListServices", DisplayErrorContext(&e)))
    }

    async fn describe_services(
        &self,
        cluster: &str,
        services: &[String],
    ) -> Result<Vec<Service>, CloudError> {
        let mut described = Vec::with_capacity(services.len());
        for batch in services.chunks(DESCRIBE_SERVICES_BATCH) {
            let out = self
                .ecs
                .describe_services()
                .cluster(cluster)
                .set_services(Some(batch.to_vec()))
                .send()
                .await
                .map_err(|e| CloudError::api("DescribeServices", DisplayErrorContext(&e)))?;
            for failure in out.failures() {
                tracing::warn!(
                    cluster,
                    arn = failure.arn().unwrap_or_default(),
                    reason = failure.reason().unwrap_or_default(),
                    "DescribeServices reported a failure"
                );
            }
            described.extend(out.services().iter().map(service_from_sdk));
        }
        Ok(described)
    }

    async fn list_tasks(&self, cluster: &str, service: &str) -> Result<Vec<String>, CloudError> {
        self.ecs
            .list_tasks()
            .cluster(cluster)
            .service_name(service)
            .into_paginator()
            .items()
            .send()
            .collect::<Result<Vec<_>, _>>()
            .await
            .map_err(|e| CloudError::api("ListTasks", DisplayErrorContext(&e)))
    }

    async fn describe_tasks(&self, cluster: &str, tasks: &[String]) -> Result<Vec<Task>, CloudError> {
        let mut described = Vec::with_capacity(tasks.len());
        for batch in tasks.chunks(DESCRIBE_TASKS_BATCH) {
            let out = self
                .ecs
                .describe_tasks()
                .cluster(cluster)
                .set_tasks(Some(batch.to_vec()))
                .send()
                .await
                .map_err(|e| CloudError::api("DescribeTasks", DisplayErrorContext(&e)))?;
            described.extend(out.tasks().iter().map(task_from_sdk));
        }
        Ok(described)
    }
}

#[axum::async_trait]
impl MetricsApi for AwsCloud {
    async fn get_metric_statistics(&self, query: &MetricQuery) -> Result<Vec<Datapoint>, CloudError> {
        let mut request = self
            .cloudwatch
            .get_metric_statistics()
            .namespace(&query.namespace)
            .metric_name(&query.metric_name)
            .start_time(to_smithy(query.range.start()))
            .end_time(to_smithy(query.range.end()))
            .period(query.period_secs);
        for dimension in &query.dimensions {
            request = request.dimensions(dimension_to_sdk(dimension));
        }
        for statistic in &query.statistics {
            request = request.statistics(statistic_to_sdk(*statistic));
        }

        let out = request
            .send()
            .await
            .map_err(|e| CloudError::api("GetMetricStatistics", DisplayErrorContext(&e)))?;

        tracing::debug!(
            metric = %query.metric_name,
            period = query.period_secs,
            datapoints = out.datapoints().len(),
            "GetMetricStatistics"
        );

        Ok(out.datapoints().iter().filter_map(datapoint_from_sdk).collect())
    }
}

#[axum::async_trait]
impl LogsApi for AwsCloud {
    async fn get_log_events(&self, query: &LogQuery) -> Result<Vec<LogEvent>, CloudError> {
        let out = self
            .logs
            .get_log_events()
            .log_group_name(&query.log_group)
            .log_stream_name(&query.log_stream)
            .start_time(query.range.start().timestamp_millis())
            .end_time(query.range.end().timestamp_millis())
            .set_limit(query.limit)
            .send()
            .await
            .map_err(|e| CloudError::api("GetLogEvents", DisplayErrorContext(&e)))?;

        Ok(out
            .events()
            .iter()
            .map(|e| LogEvent {
                timestamp: e.timestamp(),
                ingestion_time: e.ingestion_time(),
                message: e.message().map(str::to_string),
            })
            .collect())
    }
}

fn to_smithy(dt: DateTime<Utc>) -> SmithyDateTime {
    SmithyDateTime::from_millis(dt.timestamp_millis())
}

fn to_utc(dt: &SmithyDateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(dt.secs(), dt.subsec_nanos())
}

fn dimension_to_sdk(dimension: &Dimension) -> cw::Dimension {
    cw::Dimension::builder()
        .name(&dimension.name)
        .value(&dimension.value)
        .build()
}

fn statistic_to_sdk(statistic: Statistic) -> cw::Statistic {
    match statistic {
        Statistic::Average => cw::Statistic::Average,
        Statistic::Maximum => cw::Statistic::Maximum,
        Statistic::Minimum => cw::Statistic::Minimum,
        Statistic::Sum => cw::Statistic::Sum,
    }
}

fn datapoint_from_sdk(dp: &cw::Datapoint) -> Option<Datapoint> {
    Some(Datapoint {
        timestamp: dp.timestamp().and_then(to_utc)?,
        average: dp.average(),
        maximum: dp.maximum(),
        minimum: dp.minimum(),
        sum: dp.sum(),
        unit: dp.unit().map(|u| u.as_str().to_string()),
    })
}

fn cluster_from_sdk(c: &ecs::Cluster) -> Cluster {
    Cluster {
        arn: c.cluster_arn().unwrap_or_default().to_string(),
        name: c.cluster_name().unwrap_or_default().to_string(),
        status: c.status().map(str::to_string),
        registered_container_instances: c.registered_container_instances_count(),
        running_tasks: c.running_tasks_count(),
        pending_tasks: c.pending_tasks_count(),
        active_services: c.active_services_count(),
        capacity_providers: c.capacity_providers().to_vec(),
    }
}

fn service_from_sdk(s: &ecs::Service) -> Service {
    Service {
        arn: s.service_arn().unwrap_or_default().to_string(),
        name: s.service_name().unwrap_or_default().to_string(),
        cluster_arn: s.cluster_arn().map(str::to_string),
        status: s.status().map(str::to_string),
        desired_count: s.desired_count(),
        running_count: s.running_count(),
        pending_count: s.pending_count(),
        launch_type: s.launch_type().map(|lt| lt.as_str().to_string()),
        task_definition: s.task_definition().map(str::to_string),
        role_arn: s.role_arn().map(str::to_string),
        created_at: s.created_at().and_then(to_utc),
        deployments: s.deployments().iter().map(deployment_from_sdk).collect(),
        events: s
            .events()
            .iter()
            .map(|e| ServiceEvent {
                id: e.id().map(str::to_string),
                created_at: e.created_at().and_then(to_utc),
                message: e.message().map(str::to_string),
            })
            .collect(),
    }
}

fn deployment_from_sdk(d: &ecs::Deployment) -> Deployment {
    Deployment {
        id: d.id().map(str::to_string),
        status: d.status().map(str::to_string),
        task_definition: d.task_definition().map(str::to_string),
        desired_count: d.desired_count(),
        running_count: d.running_count(),
        pending_count: d.pending_count(),
        failed_tasks: d.failed_tasks(),
        rollout_state: d.rollout_state().map(|r| r.as_str().to_string()),
        created_at: d.created_at().and_then(to_utc),
        updated_at: d.updated_at().and_then(to_utc),
    }
}

fn task_from_sdk(t: &ecs::Task) -> Task {
    Task {
        arn: t.task_arn().unwrap_or_default().to_string(),
        containers: t
            .containers()
            .iter()
            .map(|c| Container {
                name: c.name().map(str::to_string),
            })
            .collect(),
    }
}
