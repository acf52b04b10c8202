use chrono::{DateTime, Duration, Utc};
use futures::future::try_join_all;
use serde::Serialize;

use crate::cloud::arn::resource_name;
use crate::cloud::types::{MetricQuery, Statistic, Task};
use crate::cloud::{CloudClients, CloudError};
use crate::constants::{
    CLUSTER_NAME_DIMENSION, CONTAINER_INSIGHTS_NAMESPACE, CONTAINER_RESTART_COUNT_METRIC,
    RESTART_PERIOD_SECS, TASK_ID_DIMENSION,
};
use crate::metrics::total_of;
use crate::timerange::TimeRange;

const UNKNOWN_CONTAINER: &str = "unknown";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRestarts {
    pub task_arn: String,
    pub task_id: String,
    pub container_name: String,
    pub restart_count: u64,
}

/// Container restarts per running task of `service` over the trailing
/// `window`. An empty result means the service has no tasks.
pub async fn restart_counts(
    clients: &CloudClients,
    cluster: &str,
    service: &str,
    window: Duration,
    now: DateTime<Utc>,
) -> Result<Vec<TaskRestarts>, CloudError> {
    let task_arns = clients.ecs.list_tasks(cluster, service).await?;
    if task_arns.is_empty() {
        return Ok(Vec::new());
    }

    let tasks = clients.ecs.describe_tasks(cluster, &task_arns).await?;
    let range = TimeRange::trailing(window, now).map_err(|e| CloudError::Failure {
        reason: e.to_string(),
        arn: None,
    })?;

    try_join_all(
        tasks
            .iter()
            .map(|task| task_restarts(clients, cluster, task, range)),
    )
    .await
}

async fn task_restarts(
    clients: &CloudClients,
    cluster: &str,
    task: &Task,
    range: TimeRange,
) -> Result<TaskRestarts, CloudError> {
    let task_id = resource_name(&task.arn);
    let query = MetricQuery::new(
        CONTAINER_INSIGHTS_NAMESPACE,
        CONTAINER_RESTART_COUNT_METRIC,
        range,
        RESTART_PERIOD_SECS,
    )
    .with_dimension(CLUSTER_NAME_DIMENSION, cluster)
    .with_dimension(TASK_ID_DIMENSION, task_id)
    .with_statistics(&[Statistic::Sum]);

    let datapoints = clients.metrics.get_metric_statistics(&query).await?;

    Ok(TaskRestarts {
        task_arn: task.arn.clone(),
        task_id: task_id.to_string(),
        container_name: task
            .containers
            .first()
            .and_then(|c| c.name.clone())
            .unwrap_or_else(|| UNKNOWN_CONTAINER.to_string()),
        restart_count: total_of(&datapoints).max(0.0).round() as u64,
    })
}
