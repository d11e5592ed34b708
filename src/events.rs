use serde::Deserialize;

/// A CloudWatch Logs subscription invocation.
///
/// `aws_lambda_events::cloudwatch_logs::LogsEvent` decompresses the batch
/// inside its deserializer; this type keeps the blob opaque so that a bad
/// batch is reported by [`crate::batch::decode_batch`] instead of the runtime.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionEvent {
    #[serde(rename = "awslogs")]
    pub aws_logs: RawAwsLogs,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RawAwsLogs {
    /// Base64 encoded gzip of a CloudWatch Logs `LogData` document.
    pub data: String,
}
