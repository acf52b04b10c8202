use std::env;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;

use crate::constants::{
    DEFAULT_EVENT_LIMIT, DEFAULT_METRIC_POINT_BUDGET, DEFAULT_RESOURCE_PERIOD_SECS,
    DEFAULT_RESTART_WINDOW_HOURS, MIN_PERIOD_SECS,
};

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    pub log_json: bool,
    pub enable_file_logs: bool,
    pub log_dir: String,
    pub cors_origin: String,
    pub static_dir: String,
    pub aws: AwsConfig,
    pub dashboard: DashboardConfig,
}

/// Overrides for the AWS SDK provider chain. Credentials themselves are
/// always resolved by the SDK (env vars, profile, instance role).
#[derive(Debug, Clone, Default)]
pub struct AwsConfig {
    pub region: Option<String>,
    pub profile: Option<String>,
    pub endpoint_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub metric_point_budget: u32,
    pub resource_period_secs: i32,
    pub restart_window_hours: i64,
    pub default_event_limit: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            metric_point_budget: DEFAULT_METRIC_POINT_BUDGET,
            resource_period_secs: DEFAULT_RESOURCE_PERIOD_SECS,
            restart_window_hours: DEFAULT_RESTART_WINDOW_HOURS,
            default_event_limit: DEFAULT_EVENT_LIMIT,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            host: env_or_parse("HOST", IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))),
            port: env_or_parse("PORT", 8080_u16),
            log_level: env_or("RUST_LOG", "info"),
            log_json: env_or("LOG_FORMAT", "text").eq_ignore_ascii_case("json"),
            enable_file_logs: env_or_bool("ENABLE_FILE_LOGS", false),
            log_dir: env_or("LOG_DIR", "./logs"),
            cors_origin: env_or("CORS_ORIGIN", "*"),
            static_dir: env_or("STATIC_DIR", "./public"),
            aws: AwsConfig {
                region: env_opt("AWS_REGION"),
                profile: env_opt("AWS_PROFILE"),
                endpoint_url: env_opt("AWS_ENDPOINT_URL"),
            },
            dashboard: DashboardConfig {
                metric_point_budget: env_or_parse(
                    "METRIC_POINT_BUDGET",
                    DEFAULT_METRIC_POINT_BUDGET,
                )
                .max(1),
                resource_period_secs: env_or_parse(
                    "RESOURCE_PERIOD_SECS",
                    DEFAULT_RESOURCE_PERIOD_SECS,
                )
                .max(MIN_PERIOD_SECS),
                restart_window_hours: env_or_parse(
                    "RESTART_WINDOW_HOURS",
                    DEFAULT_RESTART_WINDOW_HOURS,
                )
                .max(1),
                default_event_limit: env_or_parse("DEFAULT_EVENT_LIMIT", DEFAULT_EVENT_LIMIT),
            },
        }
    }
}

pub fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// `None` when unset or blank.
pub fn env_opt(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn env_or_parse<T>(key: &str, default: T) -> T
where
    T: FromStr + Copy,
{
    match env::var(key) {
        Ok(raw) => match raw.trim().parse::<T>() {
            Ok(v) => v,
            Err(_) => {
                tracing::warn!(
                    key,
                    value = %raw,
                    "Failed to parse env var, using default"
                );
                default
            }
        },
        Err(_) => default,
    }
}

pub fn env_or_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        Err(_) => default,
    }
}
