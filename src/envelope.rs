use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::batch::LogEvent;
use crate::emf::{MetricSet, Payload};

/// Value of `metadata.source` on every envelope.
pub const SOURCE: &str = "kinesis";
pub const ACTION_NAME_PREFIX: &str = "Processed Transaction for";

/// One processed transaction, as written to the delivery stream.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Envelope {
    pub action_name: String,
    pub request: Request,
    pub company_id: String,
    pub transaction_id: Uuid,
    /// `service`, `source`, `log_event_id`, then metrics in extraction order.
    pub metadata: Map<String, Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub time: String,
}

/// Source of the per-envelope transaction id and timestamp.
pub trait Stamper: Send + Sync {
    fn transaction_id(&self) -> Uuid;
    fn now(&self) -> DateTime<Utc>;
}

/// Random v4 ids and the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemStamper;

impl Stamper for SystemStamper {
    fn transaction_id(&self) -> Uuid {
        Uuid::new_v4()
    }

    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

pub fn action_name(service: &str) -> String {
    format!("{} {}", ACTION_NAME_PREFIX, service)
}

/// ISO-8601 in UTC, whole seconds, `+00:00` offset.
pub fn format_request_time(now: DateTime<Utc>) -> String {
    now.trunc_subsecs(0)
        .to_rfc3339_opts(SecondsFormat::Secs, false)
}

pub fn build_envelope(
    event: &LogEvent,
    payload: &Payload,
    metrics: MetricSet,
    transaction_id: Uuid,
    now: DateTime<Utc>,
) -> Envelope {
    let mut metadata = Map::new();
    metadata.insert("service".to_string(), Value::from(payload.service.as_str()));
    metadata.insert("source".to_string(), Value::from(SOURCE));
    metadata.insert("log_event_id".to_string(), Value::from(event.id.as_str()));
    // a metric sharing a leading key's name replaces its value in place
    for (name, value) in metrics {
        metadata.insert(name, value);
    }

    Envelope {
        action_name: action_name(&payload.service),
        request: Request {
            time: format_request_time(now),
        },
        company_id: payload.tenant_id.clone(),
        transaction_id,
        metadata,
    }
}
