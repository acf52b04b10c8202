use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::Router;
use chrono::{DateTime, Duration, Local, Utc};
use serde::Deserialize;

use crate::constants::MIN_PERIOD_SECS;
use crate::extractors::JsonBody;
use crate::response::{ok, ok_flat, AppError};
use crate::services::{clusters, restarts, utilization};
use crate::state::AppState;
use crate::timerange::{parse_time_range, TimeRange};
use crate::validation::{invalid, missing, positive, present, Validate};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/cluster", post(cluster_detail))
        .route("/cpu", post(cpu_utilization))
        .route("/list", post(list_clusters))
        .route("/resource", post(resource_metrics))
        .route("/restart-status", post(restart_status))
        .route("/custom-metric", post(custom_metric))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ClusterDetailRequest {
    cluster: Option<String>,
    event_limit: Option<usize>,
}

struct ClusterDetailCommand {
    cluster: String,
    event_limit: Option<usize>,
}

impl Validate for ClusterDetailRequest {
    type Output = ClusterDetailCommand;

    fn validate(self) -> Result<Self::Output, AppError> {
        let cluster = present(self.cluster).ok_or_else(|| missing("Missing required parameter: cluster"))?;
        Ok(ClusterDetailCommand {
            cluster,
            event_limit: self.event_limit,
        })
    }
}

async fn cluster_detail(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<ClusterDetailRequest>,
) -> Result<impl IntoResponse, AppError> {
    let cmd = req.validate()?;
    let event_limit = cmd
        .event_limit
        .unwrap_or(state.config().dashboard.default_event_limit);
    let detail = clusters::describe_cluster(state.ecs(), &cmd.cluster, event_limit).await?;
    Ok(ok(detail))
}

async fn list_clusters(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let clusters = clusters::list_clusters(state.ecs()).await?;
    Ok(ok(clusters))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct CpuRequest {
    cluster: Option<String>,
    time: Option<String>,
    limit: Option<u32>,
}

struct CpuCommand {
    cluster: String,
    time: String,
    limit: Option<u32>,
}

impl Validate for CpuRequest {
    type Output = CpuCommand;

    fn validate(self) -> Result<Self::Output, AppError> {
        let (Some(cluster), Some(time)) = (present(self.cluster), present(self.time)) else {
            return Err(missing("Missing required parameters: cluster and time"));
        };
        if self.limit == Some(0) {
            return Err(invalid("limit must be greater than 0"));
        }
        Ok(CpuCommand {
            cluster,
            time,
            limit: self.limit,
        })
    }
}

async fn cpu_utilization(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CpuRequest>,
) -> Result<impl IntoResponse, AppError> {
    let cmd = req.validate()?;
    let range = parse_time_range(&cmd.time, &Local::now())?;
    let report = utilization::cpu_utilization(
        state.cloud(),
        &cmd.cluster,
        range,
        cmd.limit,
        state.config().dashboard.metric_point_budget,
    )
    .await?;
    Ok(ok_flat(report))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ResourceRequest {
    cluster: Option<String>,
    info: Option<Vec<String>>,
    timelong: Option<f64>,
}

struct ResourceCommand {
    cluster: String,
    metrics: Vec<String>,
    hours: f64,
}

impl Validate for ResourceRequest {
    type Output = ResourceCommand;

    fn validate(self) -> Result<Self::Output, AppError> {
        let metrics: Vec<String> = self
            .info
            .unwrap_or_default()
            .into_iter()
            .filter_map(|m| present(Some(m)))
            .collect();
        match (present(self.cluster), positive(self.timelong)) {
            (Some(cluster), Some(hours)) if !metrics.is_empty() => Ok(ResourceCommand {
                cluster,
                metrics,
                hours,
            }),
            _ => Err(missing("Missing required parameters: cluster, info and timelong")),
        }
    }
}

async fn resource_metrics(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<ResourceRequest>,
) -> Result<impl IntoResponse, AppError> {
    let cmd = req.validate()?;
    let range = TimeRange::trailing_hours(cmd.hours, Utc::now())?;
    let report = utilization::resource_averages(
        state.cloud(),
        &cmd.cluster,
        &cmd.metrics,
        range,
        state.config().dashboard.resource_period_secs,
    )
    .await?;
    Ok(ok_flat(report))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RestartStatusRequest {
    cluster: Option<String>,
    service_name: Option<String>,
}

struct RestartStatusCommand {
    cluster: String,
    service_name: String,
}

impl Validate for RestartStatusRequest {
    type Output = RestartStatusCommand;

    fn validate(self) -> Result<Self::Output, AppError> {
        match (present(self.cluster), present(self.service_name)) {
            (Some(cluster), Some(service_name)) => Ok(RestartStatusCommand {
                cluster,
                service_name,
            }),
            _ => Err(missing("Missing required parameters: cluster and serviceName")),
        }
    }
}

async fn restart_status(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<RestartStatusRequest>,
) -> Result<impl IntoResponse, AppError> {
    let cmd = req.validate()?;
    let window = Duration::try_hours(state.config().dashboard.restart_window_hours)
        .ok_or_else(|| AppError::internal("Restart window out of range"))?;
    let counts = restarts::restart_counts(
        state.cloud(),
        &cmd.cluster,
        &cmd.service_name,
        window,
        Utc::now(),
    )
    .await?;
    if counts.is_empty() {
        return Err(AppError::not_found("No tasks found for the specified service"));
    }
    Ok(ok(counts))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct CustomMetricRequest {
    cluster: Option<String>,
    metric: Option<String>,
    start_time: Option<String>,
    end_time: Option<String>,
    period: Option<i32>,
}

struct CustomMetricCommand {
    cluster: String,
    metric: String,
    range: TimeRange,
    period: i32,
}

impl Validate for CustomMetricRequest {
    type Output = CustomMetricCommand;

    fn validate(self) -> Result<Self::Output, AppError> {
        let (Some(cluster), Some(metric), Some(start), Some(end), Some(period)) = (
            present(self.cluster),
            present(self.metric),
            present(self.start_time),
            present(self.end_time),
            self.period.filter(|p| *p > 0),
        ) else {
            return Err(missing(
                "Missing required parameters: cluster, metric, startTime, endTime, and period",
            ));
        };
        if period < MIN_PERIOD_SECS || period % MIN_PERIOD_SECS != 0 {
            return Err(invalid(PERIOD_MESSAGE));
        }
        let range = TimeRange::new(parse_instant(&start)?, parse_instant(&end)?)?;
        Ok(CustomMetricCommand {
            cluster,
            metric,
            range,
            period,
        })
    }
}

const PERIOD_MESSAGE: &str = "period must be a positive multiple of 60 seconds";

fn parse_instant(raw: &str) -> Result<DateTime<Utc>, AppError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| invalid("startTime and endTime must be ISO 8601 timestamps"))
}

async fn custom_metric(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CustomMetricRequest>,
) -> Result<impl IntoResponse, AppError> {
    let cmd = req.validate()?;
    let trend = utilization::custom_trend(
        state.metrics(),
        &cmd.cluster,
        &cmd.metric,
        cmd.range,
        cmd.period,
    )
    .await?;
    Ok(ok(trend))
}
