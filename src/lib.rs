use lambda_runtime::{Error, LambdaEvent};
use tracing::level_filters::LevelFilter;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::envelope::Stamper;
use crate::events::SubscriptionEvent;
use crate::publisher::RecordSink;

pub mod batch;
pub mod clients;
pub mod config;
pub mod emf;
pub mod envelope;
pub mod error;
pub mod events;
pub mod process;
pub mod publisher;

pub fn set_up_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .from_env_lossy(),
        )
        .init();
}

// lambda handler
pub async fn handler<S, T>(
    sink: &S,
    stamper: &T,
    evt: LambdaEvent<SubscriptionEvent>,
) -> Result<(), Error>
where
    S: RecordSink + ?Sized,
    T: Stamper + ?Sized,
{
    info!("Handling lambda invocation");
    debug!(request_id = %evt.context.request_id, "Handling event: {:?}", evt.payload);

    let published = process::log_batch(sink, stamper, &evt.payload.aws_logs.data).await?;
    info!("Published {} transactions", published);

    Ok(())
}
