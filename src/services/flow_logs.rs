//! VPC flow logs read from a CloudWatch Logs stream.

use std::fmt::Display;

use chrono::{Local, TimeZone};
use serde::Serialize;

use crate::cloud::types::{LogEvent, LogQuery};
use crate::cloud::{CloudError, LogsApi};
use crate::constants::LOG_TIME_FORMAT;

/// Default (version 2) flow log record. Fields beyond those present in the
/// message are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowLogRecord {
    pub version: Option<String>,
    pub account_id: Option<String>,
    pub interface_id: Option<String>,
    pub srcaddr: Option<String>,
    pub dstaddr: Option<String>,
    pub srcport: Option<String>,
    pub dstport: Option<String>,
    pub protocol: Option<String>,
    pub packets: Option<String>,
    pub bytes: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub action: Option<String>,
    pub log_status: Option<String>,
}

impl FlowLogRecord {
    pub fn parse(message: &str) -> Self {
        let mut fields = message.split_whitespace().map(str::to_string);
        Self {
            version: fields.next(),
            account_id: fields.next(),
            interface_id: fields.next(),
            srcaddr: fields.next(),
            dstaddr: fields.next(),
            srcport: fields.next(),
            dstport: fields.next(),
            protocol: fields.next(),
            packets: fields.next(),
            bytes: fields.next(),
            start: fields.next(),
            end: fields.next(),
            action: fields.next(),
            log_status: fields.next(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub timestamp: Option<String>,
    pub ingestion_time: Option<String>,
    pub messages: Option<FlowLogRecord>,
}

impl LogEntry {
    pub fn from_event<Tz>(event: &LogEvent, tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        Self {
            timestamp: event.timestamp.and_then(|ms| format_millis(ms, tz)),
            ingestion_time: event.ingestion_time.and_then(|ms| format_millis(ms, tz)),
            messages: event.message.as_deref().map(FlowLogRecord::parse),
        }
    }
}

/// Epoch milliseconds as `YYYY-MM-DD HH:MM:SS` in `tz`.
pub fn format_millis<Tz>(ms: i64, tz: &Tz) -> Option<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    tz.timestamp_millis_opt(ms)
        .single()
        .map(|dt| dt.format(LOG_TIME_FORMAT).to_string())
}

pub async fn fetch_flow_logs(logs: &dyn LogsApi, query: &LogQuery) -> Result<Vec<LogEntry>, CloudError> {
    let events = logs.get_log_events(query).await?;
    tracing::debug!(
        group = %query.log_group,
        stream = %query.log_stream,
        events = events.len(),
        "GetLogEvents"
    );
    Ok(events
        .iter()
        .map(|event| LogEntry::from_event(event, &Local))
        .collect())
}
