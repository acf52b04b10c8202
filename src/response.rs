use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::cloud::CloudError;
use crate::timerange::TimeRangeError;

const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

/// Success envelope whose payload fields sit next to `success` instead of
/// under `data` (used by the metric endpoints: `{success, response, raw}`).
#[derive(Debug, Serialize)]
pub struct FlatResponse<T: Serialize> {
    pub success: bool,
    #[serde(flatten)]
    pub body: T,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub success: bool,
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub trace_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppError {
    pub status: StatusCode,
    pub code: String,
    pub message: String,
    /// Raw upstream detail, returned to the caller as `error`.
    pub detail: Option<String>,
    pub is_operational: bool,
}

impl AppError {
    pub fn bad_request(code: &str, message: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: code.to_string(),
            message: message.to_string(),
            detail: None,
            is_operational: true,
        }
    }

    pub fn not_found(message: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            code: "NOT_FOUND".to_string(),
            message: message.to_string(),
            detail: None,
            is_operational: true,
        }
    }

    /// The AWS API answered, but reported the resource as unusable
    /// (e.g. DescribeClusters failure `MISSING`).
    pub fn upstream_failure(reason: &str, arn: Option<&str>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: "UPSTREAM_FAILURE".to_string(),
            message: reason.to_string(),
            detail: arn.map(str::to_string),
            is_operational: true,
        }
    }

    /// The AWS call itself failed; the SDK message is exposed as `error`.
    pub fn upstream(detail: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: "UPSTREAM_ERROR".to_string(),
            message: INTERNAL_ERROR_MESSAGE.to_string(),
            detail: Some(detail.to_string()),
            is_operational: true,
        }
    }

    pub fn internal(message: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: "INTERNAL_ERROR".to_string(),
            message: message.to_string(),
            detail: None,
            is_operational: false,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let exposed_message = if self.is_operational {
            self.message.clone()
        } else {
            INTERNAL_ERROR_MESSAGE.to_string()
        };

        if self.status.is_server_error() {
            tracing::error!(
                status = %self.status,
                code = %self.code,
                error = %self.message,
                detail = ?self.detail,
                "API error"
            );
        } else {
            tracing::warn!(status = %self.status, code = %self.code, error = %self.message, "API error");
        }

        (
            self.status,
            Json(ErrorBody {
                success: false,
                code: self.code,
                message: exposed_message,
                error: self.detail,
                trace_id: None,
            }),
        )
            .into_response()
    }
}

impl From<CloudError> for AppError {
    fn from(value: CloudError) -> Self {
        match &value {
            CloudError::Failure { reason, arn } => AppError::upstream_failure(reason, arn.as_deref()),
            CloudError::Api { .. } => AppError::upstream(&value.to_string()),
        }
    }
}

impl From<TimeRangeError> for AppError {
    fn from(value: TimeRangeError) -> Self {
        AppError::bad_request("INVALID_TIME_RANGE", &value.to_string())
    }
}

pub fn ok<T: Serialize>(data: T) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(ApiResponse {
            success: true,
            data,
        }),
    )
}

pub fn ok_flat<T: Serialize>(body: T) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(FlatResponse {
            success: true,
            body,
        }),
    )
}
