use std::sync::Arc;

use anyhow::Context;
use lambda_runtime::{Error, LambdaEvent, service_fn};
use sentiment_router::aggregator::{QueueAggregator, handler};
use sentiment_router::clients::SqsChannel;
use sentiment_router::core::config::AppConfig;
use serde_json::Value;

#[tokio::main]
async fn main() -> Result<(), Error> {
    sentiment_router::setup_logging();

    let config = AppConfig::from_env().context("loading aggregator configuration")?;
    let shared = aws_config::from_env().load().await;
    let sqs = aws_sdk_sqs::Client::new(&shared);

    let aggregator = QueueAggregator::new(
        Arc::new(SqsChannel::new(sqs.clone(), &config.high_priority_queue_url)),
        Arc::new(SqsChannel::new(sqs, &config.normal_queue_url)),
    );

    let aggregator = &aggregator;
    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
        handler(aggregator, event).await
    }))
    .await
}
