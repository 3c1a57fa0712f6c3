//! SDK client construction for the DynamoDB store.

use aws_config::retry::RetryConfig;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_dynamodb::config::Credentials;
use aws_sdk_dynamodb::Client;

use crate::config::Config;

const CREDENTIALS_PROVIDER_NAME: &str = "dynaload-static";

/// Build a DynamoDB client from `config`, falling back to the default AWS
/// provider chain for anything unset.
pub async fn connect(config: &Config) -> Client {
    let mut loader = aws_config::defaults(BehaviorVersion::latest())
        .retry_config(RetryConfig::standard().with_max_attempts(config.max_attempts));

    if let Some(region) = &config.region {
        loader = loader.region(Region::new(region.clone()));
    }
    if let Some(url) = &config.endpoint_url {
        loader = loader.endpoint_url(url);
    }
    if let (Some(key), Some(secret)) = (&config.access_key_id, &config.secret_access_key) {
        loader = loader.credentials_provider(Credentials::new(
            key,
            secret,
            config.session_token.clone(),
            None,
            CREDENTIALS_PROVIDER_NAME,
        ));
    }

    let sdk_config = loader.load().await;
    tracing::debug!(
        region = ?sdk_config.region(),
        endpoint = config.endpoint_url.as_deref(),
        static_credentials = config.has_static_credentials(),
        "DynamoDB client configured"
    );
    Client::new(&sdk_config)
}
