use std::env;
use std::string::String;

pub const STREAM_ARN_VAR: &str = "FIREHOSE_STREAM_ARN";
pub const STREAM_NAME_VAR: &str = "FIREHOSE_STREAM_NAME";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub stream_arn: Option<String>,
    /// Delivery stream the publisher writes to.
    pub stream_name: String,
}

impl Config {
    pub fn load_from_env() -> Result<Config, String> {
        let stream_arn = env::var(STREAM_ARN_VAR).ok().filter(|s| !s.trim().is_empty());

        let stream_name = match &stream_arn {
            Some(arn) => stream_name_from_arn(arn)?,
            None => env::var(STREAM_NAME_VAR)
                .map_err(|e| format!("{} or {} not set - {}", STREAM_ARN_VAR, STREAM_NAME_VAR, e))?
                .trim()
                .to_string(),
        };

        if stream_name.is_empty() {
            return Err(format!("{} must not be empty", STREAM_NAME_VAR));
        }

        Ok(Config {
            stream_arn,
            stream_name,
        })
    }
}

/// `arn:aws:firehose:<region>:<account>:deliverystream/<name>` -> `<name>`
pub fn stream_name_from_arn(arn: &str) -> Result<String, String> {
    let name = arn.trim().rsplit('/').next().unwrap_or_default();
    if name.is_empty() {
        return Err(format!("{} has no stream name - {}", STREAM_ARN_VAR, arn));
    }
    Ok(name.to_string())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_stream_name_from_arn() {
        let arn = "arn:aws:firehose:eu-central-1:123456789012:deliverystream/tenant-stream";
        assert_eq!(stream_name_from_arn(arn).unwrap(), "tenant-stream");
        assert_eq!(stream_name_from_arn("tenant-stream").unwrap(), "tenant-stream");

        let arn = "arn:aws:firehose:eu-central-1:123456789012:deliverystream/";
        assert!(stream_name_from_arn(arn).is_err());
    }

    #[test]
    fn test_load_from_arn() {
        temp_env::with_vars(
            [
                (
                    STREAM_ARN_VAR,
                    Some("arn:aws:firehose:eu-central-1:123456789012:deliverystream/tenant-stream"),
                ),
                (STREAM_NAME_VAR, Some("ignored")),
            ],
            || {
                let config = Config::load_from_env().unwrap();
                assert_eq!(config.stream_name, "tenant-stream");
                assert!(config.stream_arn.is_some());
            },
        );
    }

    #[test]
    fn test_load_from_name() {
        temp_env::with_vars(
            [
                (STREAM_ARN_VAR, None),
                (STREAM_NAME_VAR, Some("direct-stream")),
            ],
            || {
                let config = Config::load_from_env().unwrap();
                assert_eq!(config.stream_name, "direct-stream");
                assert_eq!(config.stream_arn, None);
            },
        );
    }

    #[test]
    fn test_load_without_stream() {
        temp_env::with_vars_unset([STREAM_ARN_VAR, STREAM_NAME_VAR], || {
            let err = Config::load_from_env().unwrap_err();
            assert!(err.contains(STREAM_ARN_VAR), "got {}", err);
        });

        temp_env::with_vars([(STREAM_ARN_VAR, None), (STREAM_NAME_VAR, Some("  "))], || {
            assert!(Config::load_from_env().is_err());
        });
    }
}
