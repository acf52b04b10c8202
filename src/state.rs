use std::sync::Arc;
use std::time::Instant;

use crate::cloud::{CloudClients, EcsApi, LogsApi, MetricsApi};
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    cloud: CloudClients,
    config: Arc<Config>,
    started_at: Instant,
}

impl AppState {
    pub fn new(cloud: CloudClients, config: &Config) -> Self {
        Self {
            cloud,
            config: Arc::new(config.clone()),
            started_at: Instant::now(),
        }
    }

    pub fn cloud(&self) -> &CloudClients {
        &self.cloud
    }

    pub fn ecs(&self) -> &dyn EcsApi {
        self.cloud.ecs.as_ref()
    }

    pub fn metrics(&self) -> &dyn MetricsApi {
        self.cloud.metrics.as_ref()
    }

    pub fn logs(&self) -> &dyn LogsApi {
        self.cloud.logs.as_ref()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
