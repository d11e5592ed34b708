use aws_config::SdkConfig;
use aws_sdk_firehose::config::retry::RetryConfig;
use aws_sdk_firehose::Client as FirehoseClient;

/// A type used to hold the AWS clients required to interact with AWS services
/// used by the lambda function.
#[derive(Clone, Debug)]
pub struct AwsClients {
    pub firehose: FirehoseClient,
}

impl AwsClients {
    /// Redelivery of a failed batch is left to the log subscription, so the
    /// Firehose client makes a single attempt per record.
    pub fn new(sdk_config: &SdkConfig) -> Self {
        let firehose_config = aws_sdk_firehose::config::Builder::from(sdk_config)
            .retry_config(RetryConfig::disabled())
            .build();
        AwsClients {
            firehose: FirehoseClient::from_conf(firehose_config),
        }
    }
}
