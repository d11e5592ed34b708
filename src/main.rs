use aws_config::BehaviorVersion;
use emf_firehose_shipper::clients::AwsClients;
use emf_firehose_shipper::config::Config;
use emf_firehose_shipper::envelope::SystemStamper;
use emf_firehose_shipper::events::SubscriptionEvent;
use emf_firehose_shipper::publisher::FirehoseSink;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Error> {
    emf_firehose_shipper::set_up_logging();

    info!(
        "Initializing {} version {}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    let aws_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let config = Config::load_from_env()?;
    let clients = AwsClients::new(&aws_config);
    let sink = FirehoseSink::new(clients.firehose, config.stream_name.clone());
    info!(stream = %sink.stream_name(), "publishing to firehose delivery stream");

    run(service_fn(|request: LambdaEvent<SubscriptionEvent>| {
        emf_firehose_shipper::handler(&sink, &SystemStamper, request)
    }))
    .await
}
