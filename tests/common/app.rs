use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;

use axum::Router;
use tempfile::TempDir;

use ecs_dashboard_backend::cloud::CloudClients;
use ecs_dashboard_backend::config::{AwsConfig, Config, DashboardConfig};
use ecs_dashboard_backend::routes::build_router;
use ecs_dashboard_backend::state::AppState;

use super::fakes::FakeCloud;

pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    pub cloud: Arc<FakeCloud>,
    pub static_dir: TempDir,
}

/// Builds the config directly instead of through `set_var` so parallel
/// tests never race on the process environment.
pub fn test_config(static_dir: &TempDir) -> Config {
    Config {
        host: IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
        port: 8080,
        log_level: "info".to_string(),
        log_json: false,
        enable_file_logs: false,
        log_dir: "./logs".to_string(),
        cors_origin: "*".to_string(),
        static_dir: static_dir.path().to_string_lossy().to_string(),
        aws: AwsConfig {
            region: Some("us-east-1".to_string()),
            profile: None,
            endpoint_url: None,
        },
        dashboard: DashboardConfig::default(),
    }
}

pub fn spawn_with(cloud: FakeCloud) -> TestApp {
    let static_dir = tempfile::tempdir().expect("tempdir");
    let config = test_config(&static_dir);

    let cloud = Arc::new(cloud);
    let state = AppState::new(CloudClients::from_backend(cloud.clone()), &config);
    let app = build_router(state.clone());

    TestApp {
        app,
        state,
        cloud,
        static_dir,
    }
}

pub fn spawn_test_app() -> TestApp {
    spawn_with(FakeCloud::new())
}
