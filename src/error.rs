use thiserror::Error;

/// The subscription batch could not be turned into log events.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("log batch is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("log batch is not valid gzip: {0}")]
    Decompress(std::io::Error),
    #[error("log batch decompressed to zero bytes")]
    Empty,
    #[error("log batch is not a valid CloudWatch Logs document: {0}")]
    Document(serde_json::Error),
}

/// A log message that is not well-formed JSON.
#[derive(Error, Debug)]
#[error("log message is not valid JSON: {0}")]
pub struct ParseError(#[from] pub serde_json::Error);

/// A well-formed log message without the fields an EMF transaction needs.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SchemaError {
    #[error("log message is not a JSON object")]
    NotAnObject,
    #[error("required field `{0}` is missing")]
    MissingField(String),
    #[error("field `{field}` must be {expected}")]
    WrongType {
        field: String,
        expected: &'static str,
    },
    #[error("first `_aws.CloudWatchMetrics` directive is malformed: {0}")]
    InvalidDirective(String),
    #[error("`_aws.CloudWatchMetrics` holds no metric directives")]
    EmptyDirectives,
}

#[derive(Error, Debug)]
pub enum PayloadError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// The delivery stream did not accept a record.
#[derive(Error, Debug)]
pub enum PublishError {
    #[error("failed to encode envelope: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("failed to build firehose record: {0}")]
    Request(String),
    #[error("firehose rejected record for stream {stream}: {reason}")]
    Service { stream: String, reason: String },
}

/// Aborts the whole invocation; events after the failing one are not attempted.
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("log event {event_id}: {source}")]
    Parse {
        event_id: String,
        #[source]
        source: ParseError,
    },
    #[error("log event {event_id}: {source}")]
    Schema {
        event_id: String,
        #[source]
        source: SchemaError,
    },
    #[error("log event {event_id}: {source}")]
    Publish {
        event_id: String,
        #[source]
        source: PublishError,
    },
}

impl ProcessError {
    pub(crate) fn from_payload(event_id: &str, error: PayloadError) -> Self {
        match error {
            PayloadError::Parse(source) => ProcessError::Parse {
                event_id: event_id.to_string(),
                source,
            },
            PayloadError::Schema(source) => ProcessError::Schema {
                event_id: event_id.to_string(),
                source,
            },
        }
    }

    pub(crate) fn from_publish(event_id: &str, source: PublishError) -> Self {
        ProcessError::Publish {
            event_id: event_id.to_string(),
            source,
        }
    }
}
