//! CloudWatch Embedded Metric Format payloads.
//!
//! An EMF log line is a JSON object whose `_aws.CloudWatchMetrics` directive
//! lists metric names, and whose top-level keys carry the values of those
//! metrics. Only the first directive is read, and only the first value of
//! each metric; see [`RESOLVED_DIRECTIVE_INDEX`] and [`RESOLVED_VALUE_INDEX`].

use itertools::Itertools;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{ParseError, PayloadError, SchemaError};

/// Index of the `CloudWatchMetrics` directive whose metrics are extracted.
/// Later directives never contribute.
pub const RESOLVED_DIRECTIVE_INDEX: usize = 0;

/// Index of the element taken from a metric's value list.
pub const RESOLVED_VALUE_INDEX: usize = 0;

pub const SERVICE_FIELD: &str = "service";
pub const TENANT_ID_FIELD: &str = "tenant_id";
pub const AWS_FIELD: &str = "_aws";
pub const CLOUDWATCH_METRICS_FIELD: &str = "CloudWatchMetrics";

/// The metric list of one `CloudWatchMetrics` entry. Only `Name` is read;
/// `Namespace`, `Dimensions` and `Unit` may hold anything.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct MetricDirective {
    #[serde(rename = "Metrics")]
    pub metrics: Vec<MetricDefinition>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct MetricDefinition {
    #[serde(rename = "Name")]
    pub name: String,
}

/// A validated EMF log line.
#[derive(Debug, Clone)]
pub struct Payload {
    pub service: String,
    pub tenant_id: String,
    /// The directive at [`RESOLVED_DIRECTIVE_INDEX`].
    pub directive: MetricDirective,
    /// Every top-level key of the log line, required ones included.
    pub fields: Map<String, Value>,
}

/// Resolved metrics in the order their names appear in the first directive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricSet(Vec<(String, Value)>);

impl MetricSet {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(n, _)| n.as_str())
    }
}

impl IntoIterator for MetricSet {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

pub fn parse_payload(message: &str) -> Result<Payload, PayloadError> {
    let value: Value = serde_json::from_str(message).map_err(ParseError::from)?;
    let Value::Object(fields) = value else {
        return Err(SchemaError::NotAnObject.into());
    };

    let service = required_string(&fields, SERVICE_FIELD)?;
    let tenant_id = required_string(&fields, TENANT_ID_FIELD)?;
    let directive = resolved_directive(&fields)?;

    Ok(Payload {
        service,
        tenant_id,
        directive,
        fields,
    })
}

fn required_string(fields: &Map<String, Value>, field: &str) -> Result<String, SchemaError> {
    match fields.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(SchemaError::WrongType {
            field: field.to_string(),
            expected: "a string",
        }),
        None => Err(SchemaError::MissingField(field.to_string())),
    }
}

fn resolved_directive(fields: &Map<String, Value>) -> Result<MetricDirective, SchemaError> {
    let aws = match fields.get(AWS_FIELD) {
        Some(Value::Object(aws)) => aws,
        Some(_) => {
            return Err(SchemaError::WrongType {
                field: AWS_FIELD.to_string(),
                expected: "an object",
            })
        }
        None => return Err(SchemaError::MissingField(AWS_FIELD.to_string())),
    };

    let field = format!("{}.{}", AWS_FIELD, CLOUDWATCH_METRICS_FIELD);
    let directives = match aws.get(CLOUDWATCH_METRICS_FIELD) {
        Some(Value::Array(directives)) => directives,
        Some(_) => {
            return Err(SchemaError::WrongType {
                field,
                expected: "a list",
            })
        }
        None => return Err(SchemaError::MissingField(field)),
    };

    // directives after the resolved one are never read, so their shape is not checked
    let raw = directives
        .get(RESOLVED_DIRECTIVE_INDEX)
        .ok_or(SchemaError::EmptyDirectives)?;
    MetricDirective::deserialize(raw).map_err(|e| SchemaError::InvalidDirective(e.to_string()))
}

pub fn extract_metrics(payload: &Payload) -> MetricSet {
    let metrics = payload
        .directive
        .metrics
        .iter()
        .map(|definition| definition.name.as_str())
        .unique()
        .filter_map(|name| {
            let value = resolve_value(payload.fields.get(name)?)?;
            Some((name.to_string(), value.clone()))
        })
        .collect();

    MetricSet(metrics)
}

// EMF allows a bare scalar as well as a list of values.
fn resolve_value(value: &Value) -> Option<&Value> {
    let resolved = match value {
        Value::Array(values) => values.get(RESOLVED_VALUE_INDEX)?,
        scalar => scalar,
    };
    (!resolved.is_null()).then_some(resolved)
}
