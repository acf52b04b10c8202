pub mod cloud;
pub mod config;
pub mod constants;
pub mod extractors;
pub mod logging;
pub mod metrics;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod services;
pub mod state;
pub mod timerange;
pub mod validation;
