use std::sync::Arc;

use anyhow::Context;
use lambda_runtime::{Error, LambdaEvent, service_fn};
use sentiment_router::clients::{ComprehendClassifier, S3Store, SqsChannel};
use sentiment_router::core::config::AppConfig;
use sentiment_router::router::{IngestRouter, handler};
use serde_json::Value;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Error> {
    sentiment_router::setup_logging();

    let config = AppConfig::from_env().context("loading router configuration")?;
    let shared = aws_config::from_env().load().await;
    let sqs = aws_sdk_sqs::Client::new(&shared);

    let ingest = IngestRouter::new(
        Arc::new(S3Store::new(aws_sdk_s3::Client::new(&shared))),
        Arc::new(ComprehendClassifier::new(aws_sdk_comprehend::Client::new(
            &shared,
        ))),
        Arc::new(SqsChannel::new(sqs.clone(), &config.high_priority_queue_url)),
        Arc::new(SqsChannel::new(sqs, &config.normal_queue_url)),
    )
    .configured(&config);
    info!(
        move_to_processed = config.move_to_processed,
        processed_prefix = %config.processed_prefix,
        "Router ready"
    );

    let ingest = &ingest;
    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
        handler(ingest, event).await
    }))
    .await
}
