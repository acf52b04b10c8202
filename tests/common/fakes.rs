use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Duration, TimeZone, Utc};

use ecs_dashboard_backend::cloud::types::{
    Cluster, ClusterDescription, ClusterFailure, Container, Datapoint, LogEvent, LogQuery,
    MetricQuery, Service, ServiceEvent, Task,
};
use ecs_dashboard_backend::cloud::{CloudError, EcsApi, LogsApi, MetricsApi};

pub const ACCOUNT: &str = "123456789012";
pub const REGION: &str = "us-east-1";

pub fn cluster_arn(name: &str) -> String {
    format!("arn:aws:ecs:{REGION}:{ACCOUNT}:cluster/{name}")
}

pub fn service_arn(cluster: &str, name: &str) -> String {
    format!("arn:aws:ecs:{REGION}:{ACCOUNT}:service/{cluster}/{name}")
}

pub fn task_arn(cluster: &str, id: &str) -> String {
    format!("arn:aws:ecs:{REGION}:{ACCOUNT}:task/{cluster}/{id}")
}

pub fn at(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap() + Duration::minutes(minutes)
}

pub fn sample(minutes: i64, average: f64, maximum: f64, minimum: f64) -> Datapoint {
    Datapoint {
        timestamp: at(minutes),
        average: Some(average),
        maximum: Some(maximum),
        minimum: Some(minimum),
        unit: Some("Percent".to_string()),
        ..Datapoint::default()
    }
}

pub fn restarts(minutes: i64, sum: f64) -> Datapoint {
    Datapoint {
        timestamp: at(minutes),
        sum: Some(sum),
        unit: Some("Count".to_string()),
        ..Datapoint::default()
    }
}

#[derive(Default)]
struct World {
    clusters: Vec<Cluster>,
    services: HashMap<String, Vec<Service>>,
    tasks: HashMap<(String, String), Vec<Task>>,
    /// Keyed by metric name, then by TaskId dimension (empty for cluster metrics).
    metrics: HashMap<(String, String), Vec<Datapoint>>,
    log_events: Vec<LogEvent>,
    failing_operations: Vec<&'static str>,
    metric_queries: Vec<MetricQuery>,
    log_queries: Vec<LogQuery>,
}

/// In-memory stand-in for ECS, CloudWatch and CloudWatch Logs. Unknown
/// clusters are reported the way DescribeClusters does: a `MISSING` failure.
#[derive(Default)]
pub struct FakeCloud {
    world: Mutex<World>,
}

impl FakeCloud {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cluster(self, name: &str, running_tasks: i32) -> Self {
        self.world.lock().unwrap().clusters.push(Cluster {
            arn: cluster_arn(name),
            name: name.to_string(),
            status: Some("ACTIVE".to_string()),
            running_tasks,
            active_services: 0,
            ..Cluster::default()
        });
        self
    }

    pub fn with_service(self, cluster: &str, name: &str, running: i32, events: usize) -> Self {
        {
            let mut world = self.world.lock().unwrap();
            if let Some(c) = world.clusters.iter_mut().find(|c| c.name == cluster) {
                c.active_services += 1;
            }
            let service = Service {
                arn: service_arn(cluster, name),
                name: name.to_string(),
                cluster_arn: Some(cluster_arn(cluster)),
                status: Some("ACTIVE".to_string()),
                desired_count: running,
                running_count: running,
                launch_type: Some("FARGATE".to_string()),
                role_arn: Some(format!("arn:aws:iam::{ACCOUNT}:role/ecs-service-role")),
                created_at: Some(at(-600)),
                events: (0..events)
                    .map(|i| ServiceEvent {
                        id: Some(format!("evt-{i}")),
                        created_at: Some(at(i as i64)),
                        message: Some(format!("(service {name}) event {i}")),
                    })
                    .collect(),
                ..Service::default()
            };
            world
                .services
                .entry(cluster_arn(cluster))
                .or_default()
                .push(service);
        }
        self
    }

    pub fn with_task(self, cluster: &str, service: &str, id: &str, container: Option<&str>) -> Self {
        self.world
            .lock()
            .unwrap()
            .tasks
            .entry((cluster.to_string(), service.to_string()))
            .or_default()
            .push(Task {
                arn: task_arn(cluster, id),
                containers: container
                    .map(|name| {
                        vec![Container {
                            name: Some(name.to_string()),
                        }]
                    })
                    .unwrap_or_default(),
            });
        self
    }

    pub fn with_metric(self, metric: &str, datapoints: Vec<Datapoint>) -> Self {
        self.with_task_metric(metric, "", datapoints)
    }

    pub fn with_task_metric(self, metric: &str, task_id: &str, datapoints: Vec<Datapoint>) -> Self {
        self.world
            .lock()
            .unwrap()
            .metrics
            .insert((metric.to_string(), task_id.to_string()), datapoints);
        self
    }

    pub fn with_log_events(self, events: Vec<LogEvent>) -> Self {
        self.world.lock().unwrap().log_events = events;
        self
    }

    /// Makes every call to `operation` (e.g. `"GetMetricStatistics"`) fail.
    pub fn failing(self, operation: &'static str) -> Self {
        self.world.lock().unwrap().failing_operations.push(operation);
        self
    }

    pub fn metric_queries(&self) -> Vec<MetricQuery> {
        self.world.lock().unwrap().metric_queries.clone()
    }

    pub fn log_queries(&self) -> Vec<LogQuery> {
        self.world.lock().unwrap().log_queries.clone()
    }

    fn check(&self, operation: &'static str) -> Result<(), CloudError> {
        if self
            .world
            .lock()
            .unwrap()
            .failing_operations
            .contains(&operation)
        {
            return Err(CloudError::api(operation, "simulated outage"));
        }
        Ok(())
    }
}

fn matches_cluster(cluster: &Cluster, wanted: &str) -> bool {
    cluster.name == wanted || cluster.arn == wanted
}

#[axum::async_trait]
impl EcsApi for FakeCloud {
    async fn describe_clusters(&self, clusters: &[String]) -> Result<ClusterDescription, CloudError> {
        self.check("DescribeClusters")?;
        let world = self.world.lock().unwrap();
        let mut description = ClusterDescription::default();
        for wanted in clusters {
            match world.clusters.iter().find(|c| matches_cluster(c, wanted)) {
                Some(found) => description.clusters.push(found.clone()),
                None => description.failures.push(ClusterFailure {
                    arn: Some(cluster_arn(wanted)),
                    reason: Some("MISSING".to_string()),
                }),
            }
        }
        Ok(description)
    }

    async fn list_clusters(&self) -> Result<Vec<String>, CloudError> {
        self.check("ListClusters")?;
        Ok(self
            .world
            .lock()
            .unwrap()
            .clusters
            .iter()
            .map(|c| c.arn.clone())
            .collect())
    }

    async fn list_services(&self, cluster: &str) -> Result<Vec<String>, CloudError> {
        self.check("ListServices")?;
        Ok(self
            .world
            .lock()
            .unwrap()
            .services
            .get(cluster)
            .map(|services| services.iter().map(|s| s.arn.clone()).collect())
            .unwrap_or_default())
    }

    async fn describe_services(
        &self,
        cluster: &str,
        services: &[String],
    ) -> Result<Vec<Service>, CloudError> {
        self.check("DescribeServices")?;
        let world = self.world.lock().unwrap();
        let known = world.services.get(cluster).cloned().unwrap_or_default();
        Ok(known
            .into_iter()
            .filter(|s| services.contains(&s.arn) || services.contains(&s.name))
            .collect())
    }

    async fn list_tasks(&self, cluster: &str, service: &str) -> Result<Vec<String>, CloudError> {
        self.check("ListTasks")?;
        Ok(self
            .world
            .lock()
            .unwrap()
            .tasks
            .get(&(cluster.to_string(), service.to_string()))
            .map(|tasks| tasks.iter().map(|t| t.arn.clone()).collect())
            .unwrap_or_default())
    }

    async fn describe_tasks(&self, _cluster: &str, tasks: &[String]) -> Result<Vec<Task>, CloudError> {
        self.check("DescribeTasks")?;
        let world = self.world.lock().unwrap();
        Ok(world
            .tasks
            .values()
            .flatten()
            .filter(|t| tasks.contains(&t.arn))
            .cloned()
            .collect())
    }
}

#[axum::async_trait]
impl MetricsApi for FakeCloud {
    async fn get_metric_statistics(&self, query: &MetricQuery) -> Result<Vec<Datapoint>, CloudError> {
        self.check("GetMetricStatistics")?;
        let mut world = self.world.lock().unwrap();
        world.metric_queries.push(query.clone());
        let key = (
            query.metric_name.clone(),
            query.dimension("TaskId").unwrap_or_default().to_string(),
        );
        Ok(world.metrics.get(&key).cloned().unwrap_or_default())
    }
}

#[axum::async_trait]
impl LogsApi for FakeCloud {
    async fn get_log_events(&self, query: &LogQuery) -> Result<Vec<LogEvent>, CloudError> {
        self.check("GetLogEvents")?;
        let mut world = self.world.lock().unwrap();
        world.log_queries.push(query.clone());
        let mut events = world.log_events.clone();
        if let Some(limit) = query.limit {
            events.truncate(limit.max(0) as usize);
        }
        Ok(events)
    }
}
