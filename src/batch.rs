use aws_lambda_events::cloudwatch_logs::LogData;
use base64::prelude::*;
use flate2::read::MultiGzDecoder;
use std::io::Read;
use tracing::{debug, info};

use crate::error::DecodeError;

/// Sent by CloudWatch Logs when a subscription filter is created; carries no log events.
pub const CONTROL_MESSAGE: &str = "CONTROL_MESSAGE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEvent {
    pub id: String,
    pub message: String,
}

/// A decoded subscription batch. `events` keeps delivery order.
#[derive(Debug, Clone, Default)]
pub struct LogBatch {
    pub owner: String,
    pub log_group: String,
    pub log_stream: String,
    pub message_type: String,
    pub events: Vec<LogEvent>,
}

impl LogBatch {
    pub fn is_control_message(&self) -> bool {
        self.message_type == CONTROL_MESSAGE
    }
}

impl From<LogData> for LogBatch {
    fn from(data: LogData) -> Self {
        let events = if data.message_type == CONTROL_MESSAGE {
            Vec::new()
        } else {
            data.log_events
                .into_iter()
                .map(|entry| LogEvent {
                    id: entry.id,
                    message: entry.message,
                })
                .collect()
        };

        LogBatch {
            owner: data.owner,
            log_group: data.log_group,
            log_stream: data.log_stream,
            message_type: data.message_type,
            events,
        }
    }
}

/// Decodes the `awslogs.data` blob of a subscription event: base64, then gzip, then JSON.
pub fn decode_batch(data: &str) -> Result<LogBatch, DecodeError> {
    let compressed = BASE64_STANDARD.decode(data.trim())?;
    let raw = gunzip(&compressed)?;
    let log_data: LogData = serde_json::from_slice(&raw).map_err(DecodeError::Document)?;

    let batch = LogBatch::from(log_data);
    if batch.is_control_message() {
        info!(
            log_group = %batch.log_group,
            "control message received, no log events to process"
        );
    } else {
        info!(
            log_group = %batch.log_group,
            log_stream = %batch.log_stream,
            "Received {} CloudWatch logs",
            batch.events.len()
        );
    }
    Ok(batch)
}

fn gunzip(compressed: &[u8]) -> Result<Vec<u8>, DecodeError> {
    let mut output = Vec::new();
    MultiGzDecoder::new(compressed)
        .read_to_end(&mut output)
        .map_err(DecodeError::Decompress)?;

    if output.is_empty() {
        return Err(DecodeError::Empty);
    }
    debug!("decompressed log batch to {} bytes", output.len());
    Ok(output)
}
