/// CloudWatch namespace for ECS cluster/service metrics
pub const ECS_NAMESPACE: &str = "AWS/ECS";

/// CloudWatch namespace published by Container Insights
pub const CONTAINER_INSIGHTS_NAMESPACE: &str = "ECS/ContainerInsights";

pub const CPU_UTILIZATION_METRIC: &str = "CPUUtilization";

pub const CONTAINER_RESTART_COUNT_METRIC: &str = "ContainerRestartCount";

pub const CLUSTER_NAME_DIMENSION: &str = "ClusterName";

pub const TASK_ID_DIMENSION: &str = "TaskId";

/// Upper bound on datapoints per series when the caller gives no `limit`
pub const DEFAULT_METRIC_POINT_BUDGET: u32 = 600;

/// Period used by the multi-metric resource endpoint
pub const DEFAULT_RESOURCE_PERIOD_SECS: i32 = 300;

/// Period of the restart-count query
pub const RESTART_PERIOD_SECS: i32 = 300;

/// Look-back window of the restart-count query
pub const DEFAULT_RESTART_WINDOW_HOURS: i64 = 24;

/// Service events returned per service when `eventLimit` is absent
pub const DEFAULT_EVENT_LIMIT: usize = 10;

/// CloudWatch accepts periods in whole minutes for standard-resolution metrics
pub const MIN_PERIOD_SECS: i32 = 60;

/// Display format for log event timestamps
pub const LOG_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Frontend page the static server redirects to when nothing matches
pub const NOT_FOUND_PAGE: &str = "/404";
