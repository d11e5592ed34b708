use async_trait::async_trait;
use aws_sdk_firehose::primitives::Blob;
use aws_sdk_firehose::types::Record;
use aws_sdk_firehose::Client as FirehoseClient;
use aws_smithy_types::error::display::DisplayErrorContext;
use std::time::Instant;
use tracing::debug;

use crate::envelope::Envelope;
use crate::error::PublishError;

/// Append-only destination for serialized envelopes, one record per call.
#[async_trait]
pub trait RecordSink: Send + Sync {
    async fn put_record(&self, data: Vec<u8>) -> Result<(), PublishError>;
}

/// Serializes an envelope and hands it to the sink.
pub async fn publish<S>(sink: &S, envelope: &Envelope) -> Result<(), PublishError>
where
    S: RecordSink + ?Sized,
{
    let data = serde_json::to_vec(envelope)?;
    sink.put_record(data).await
}

/// Writes records to a Kinesis Data Firehose delivery stream.
#[derive(Clone, Debug)]
pub struct FirehoseSink {
    client: FirehoseClient,
    stream_name: String,
}

impl FirehoseSink {
    pub fn new(client: FirehoseClient, stream_name: impl Into<String>) -> Self {
        FirehoseSink {
            client,
            stream_name: stream_name.into(),
        }
    }

    pub fn stream_name(&self) -> &str {
        &self.stream_name
    }
}

#[async_trait]
impl RecordSink for FirehoseSink {
    async fn put_record(&self, data: Vec<u8>) -> Result<(), PublishError> {
        let start_time = Instant::now();
        let bytes = data.len();
        let record = Record::builder()
            .data(Blob::new(data))
            .build()
            .map_err(|e| PublishError::Request(e.to_string()))?;

        let output = self
            .client
            .put_record()
            .delivery_stream_name(&self.stream_name)
            .record(record)
            .send()
            .await
            .map_err(|e| PublishError::Service {
                stream: self.stream_name.clone(),
                reason: DisplayErrorContext(&e).to_string(),
            })?;

        debug!(
            stream = %self.stream_name,
            record_id = %output.record_id(),
            bytes,
            elapsed_ms = start_time.elapsed().as_millis(),
            "record delivered to firehose"
        );
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use aws_sdk_firehose::config::retry::RetryConfig;
    use aws_sdk_firehose::config::{BehaviorVersion, Credentials, Region};
    use aws_smithy_runtime::client::http::test_util::{
        capture_request, ReplayEvent, StaticReplayClient,
    };
    use aws_smithy_runtime_api::client::http::HttpClient;
    use aws_smithy_types::body::SdkBody;
    use base64::prelude::*;
    use serde_json::Value;

    fn firehose_client(http_client: impl HttpClient + 'static) -> FirehoseClient {
        let conf = aws_sdk_firehose::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .credentials_provider(Credentials::new(
                "SOMETESTKEYID",
                "somesecretkey",
                Some("somesessiontoken".to_string()),
                None,
                "",
            ))
            .region(Region::new("eu-central-1"))
            .retry_config(RetryConfig::disabled())
            .http_client(http_client)
            .build();
        FirehoseClient::from_conf(conf)
    }

    #[tokio::test]
    async fn test_put_record_targets_stream() {
        let (http_client, request) = capture_request(None);
        let sink = FirehoseSink::new(firehose_client(http_client), "tenant-stream");

        sink.put_record(br#"{"company_id":"T1"}"#.to_vec())
            .await
            .unwrap();

        let sent = request.expect_request();
        let body: Value = serde_json::from_slice(sent.body().bytes().unwrap()).unwrap();
        assert_eq!(body["DeliveryStreamName"], "tenant-stream");
        let data = BASE64_STANDARD
            .decode(body["Record"]["Data"].as_str().unwrap())
            .unwrap();
        assert_eq!(data, br#"{"company_id":"T1"}"#.to_vec());
    }

    #[tokio::test]
    async fn test_put_record_rejected() {
        let replay = StaticReplayClient::new(vec![ReplayEvent::new(
            http::Request::builder()
                .uri("https://firehose.eu-central-1.amazonaws.com/")
                .body(SdkBody::from(""))
                .unwrap(),
            http::Response::builder()
                .status(400)
                .header("content-type", "application/x-amz-json-1.1")
                .body(SdkBody::from(
                    r#"{"__type":"ResourceNotFoundException","message":"Firehose missing-stream not found"}"#,
                ))
                .unwrap(),
        )]);
        let sink = FirehoseSink::new(firehose_client(replay), "missing-stream");

        let err = sink.put_record(b"{}".to_vec()).await.unwrap_err();
        match err {
            PublishError::Service { stream, reason } => {
                assert_eq!(stream, "missing-stream");
                assert!(reason.contains("ResourceNotFoundException"), "got {}", reason);
            }
            other => panic!("expected service error, got {:?}", other),
        }
    }
}
