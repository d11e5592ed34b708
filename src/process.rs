use tracing::{debug, info};

use crate::batch::{self, LogEvent};
use crate::emf;
use crate::envelope::{self, Envelope, Stamper};
use crate::error::ProcessError;
use crate::publisher::{self, RecordSink};

/// Parses one log event and builds its envelope, drawing a fresh id and time from `stamper`.
pub fn transform_event<T>(event: &LogEvent, stamper: &T) -> Result<Envelope, ProcessError>
where
    T: Stamper + ?Sized,
{
    let payload = emf::parse_payload(&event.message)
        .map_err(|e| ProcessError::from_payload(&event.id, e))?;
    let metrics = emf::extract_metrics(&payload);
    debug!(
        log_event_id = %event.id,
        service = %payload.service,
        metrics = metrics.len(),
        "extracted metrics"
    );

    Ok(envelope::build_envelope(
        event,
        &payload,
        metrics,
        stamper.transaction_id(),
        stamper.now(),
    ))
}

/// Decodes a subscription batch and publishes one envelope per log event, in
/// delivery order. The first failure aborts the batch; returns the number of
/// records published.
pub async fn log_batch<S, T>(sink: &S, stamper: &T, data: &str) -> Result<usize, ProcessError>
where
    S: RecordSink + ?Sized,
    T: Stamper + ?Sized,
{
    let batch = batch::decode_batch(data)?;

    let mut published = 0;
    for event in &batch.events {
        debug!("Log event: {:?}", event);
        let envelope = transform_event(event, stamper)?;
        debug!("Envelope: {:?}", envelope);

        publisher::publish(sink, &envelope)
            .await
            .map_err(|e| ProcessError::from_publish(&event.id, e))?;
        published += 1;
    }

    info!(
        log_group = %batch.log_group,
        published,
        "published transactions to delivery stream"
    );
    Ok(published)
}
