use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::Router;
use chrono::Utc;
use serde::Deserialize;

use crate::cloud::types::LogQuery;
use crate::extractors::JsonBody;
use crate::response::{ok, AppError};
use crate::services::flow_logs;
use crate::state::AppState;
use crate::timerange::TimeRange;
use crate::validation::{invalid, missing, positive, present, Validate};

pub fn router() -> Router<AppState> {
    Router::new().route("/logs", post(fetch_logs))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct LogsRequest {
    log_group_name: Option<String>,
    log_stream_name: Option<String>,
    /// Look-back window in hours.
    time_range: Option<f64>,
    limit: Option<i32>,
}

struct LogsCommand {
    log_group: String,
    log_stream: String,
    hours: f64,
    limit: Option<i32>,
}

impl Validate for LogsRequest {
    type Output = LogsCommand;

    fn validate(self) -> Result<Self::Output, AppError> {
        let (Some(log_group), Some(log_stream), Some(hours)) = (
            present(self.log_group_name),
            present(self.log_stream_name),
            positive(self.time_range),
        ) else {
            return Err(missing(
                "Missing required parameters: logGroupName, logStreamName and timeRange",
            ));
        };
        if matches!(self.limit, Some(l) if l <= 0) {
            return Err(invalid("limit must be greater than 0"));
        }
        Ok(LogsCommand {
            log_group,
            log_stream,
            hours,
            limit: self.limit,
        })
    }
}

async fn fetch_logs(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<LogsRequest>,
) -> Result<impl IntoResponse, AppError> {
    let cmd = req.validate()?;
    let query = LogQuery {
        log_group: cmd.log_group,
        log_stream: cmd.log_stream,
        range: TimeRange::trailing_hours(cmd.hours, Utc::now())?,
        limit: cmd.limit,
    };

    let entries = flow_logs::fetch_flow_logs(state.logs(), &query).await?;
    if entries.is_empty() {
        return Err(AppError::not_found("No log events found"));
    }
    Ok(ok(entries))
}
