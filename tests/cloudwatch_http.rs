mod common;

use axum::http::StatusCode;
use serde_json::json;

use ecs_dashboard_backend::cloud::types::LogEvent;

use common::app::{spawn_test_app, spawn_with};
use common::fakes::FakeCloud;
use common::http::{assert_json_error, assert_status_ok_json, post_json};

const ACCEPTED: &str =
    "2 123456789010 eni-1235b8ca123456789 172.31.16.139 172.31.16.21 20641 22 6 20 4249 1418530010 1418530070 ACCEPT OK";
const REJECTED: &str =
    "2 123456789010 eni-1235b8ca123456789 172.31.9.69 172.31.9.12 49761 3389 6 20 4249 1418530010 1418530070 REJECT OK";

fn flow_log_cloud() -> FakeCloud {
    FakeCloud::new().with_log_events(vec![
        LogEvent {
            timestamp: Some(1_418_530_010_000),
            ingestion_time: Some(1_418_530_075_000),
            message: Some(ACCEPTED.to_string()),
        },
        LogEvent {
            timestamp: Some(1_418_530_020_000),
            ingestion_time: None,
            message: Some(REJECTED.to_string()),
        },
    ])
}

#[tokio::test]
async fn it_parses_flow_log_records() {
    let app = spawn_with(flow_log_cloud());

    let (status, _, body) = post_json(
        &app.app,
        "/api/cloudwatch/logs",
        json!({
            "logGroupName": "vpc-flow-logs",
            "logStreamName": "eni-1235b8ca123456789-all",
            "timeRange": 2,
        }),
    )
    .await;
    assert_status_ok_json(status, &body);

    let entries = body["data"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert!(entries[0]["timestamp"].as_str().unwrap().starts_with("2014-12-1"));
    assert_eq!(entries[0]["messages"]["srcaddr"], "172.31.16.139");
    assert_eq!(entries[0]["messages"]["dstport"], "22");
    assert_eq!(entries[0]["messages"]["action"], "ACCEPT");
    assert_eq!(entries[1]["messages"]["action"], "REJECT");
    assert!(entries[1]["ingestionTime"].is_null());

    let queries = app.cloud.log_queries();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].log_group, "vpc-flow-logs");
    assert_eq!(queries[0].range.duration(), chrono::Duration::hours(2));
    assert_eq!(queries[0].limit, None);
}

#[tokio::test]
async fn it_passes_limit_through() {
    let app = spawn_with(flow_log_cloud());

    let (status, _, body) = post_json(
        &app.app,
        "/api/cloudwatch/logs",
        json!({
            "logGroupName": "vpc-flow-logs",
            "logStreamName": "eni-1235b8ca123456789-all",
            "timeRange": 0.5,
            "limit": 1,
        }),
    )
    .await;
    assert_status_ok_json(status, &body);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(app.cloud.log_queries()[0].limit, Some(1));
}

#[tokio::test]
async fn it_empty_stream_is_not_found() {
    let app = spawn_test_app();

    let (status, _, body) = post_json(
        &app.app,
        "/api/cloudwatch/logs",
        json!({
            "logGroupName": "vpc-flow-logs",
            "logStreamName": "quiet",
            "timeRange": 1,
        }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_json_error(&body, "NOT_FOUND");
    assert_eq!(body["message"], "No log events found");
}

#[tokio::test]
async fn it_requires_group_stream_and_range() {
    let app = spawn_test_app();

    let (status, _, body) = post_json(
        &app.app,
        "/api/cloudwatch/logs",
        json!({ "logGroupName": "vpc-flow-logs", "timeRange": 1 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_json_error(&body, "MISSING_PARAMETERS");
    assert!(app.cloud.log_queries().is_empty());
}

#[tokio::test]
async fn it_rejects_non_positive_limit() {
    let app = spawn_test_app();

    let (status, _, body) = post_json(
        &app.app,
        "/api/cloudwatch/logs",
        json!({
            "logGroupName": "vpc-flow-logs",
            "logStreamName": "quiet",
            "timeRange": 1,
            "limit": 0,
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_json_error(&body, "INVALID_PARAMETER");
}

#[tokio::test]
async fn it_logs_outage_is_upstream_error() {
    let app = spawn_with(flow_log_cloud().failing("GetLogEvents"));

    let (status, _, body) = post_json(
        &app.app,
        "/api/cloudwatch/logs",
        json!({
            "logGroupName": "vpc-flow-logs",
            "logStreamName": "eni-1235b8ca123456789-all",
            "timeRange": 1,
        }),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_json_error(&body, "UPSTREAM_ERROR");
    assert_eq!(body["error"], "GetLogEvents failed: simulated outage");
}
