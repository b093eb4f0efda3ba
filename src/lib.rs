/// Sentiment Router - routes uploaded documents to priority queues by detected sentiment.
///
/// This crate implements a two-Lambda pipeline:
/// 1. A Router Lambda triggered by S3 uploads that classifies each document with
///    Amazon Comprehend and queues a compact summary on a high-priority (negative) or
///    normal queue
/// 2. An Aggregator Lambda that peeks both queues without consuming them, for display
///
/// # Architecture
///
/// The system uses:
/// - AWS Lambda for serverless execution
/// - S3 for the uploaded documents
/// - Comprehend for sentiment detection
/// - SQS for the two priority queues
/// - Tokio for async runtime
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use sentiment_router::clients::{ComprehendClassifier, S3Store, SqsChannel};
/// use sentiment_router::core::config::AppConfig;
/// use sentiment_router::router::IngestRouter;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     sentiment_router::setup_logging();
///
///     let config = AppConfig {
///         high_priority_queue_url: "https://sqs.us-east-1.amazonaws.com/123/High".to_string(),
///         normal_queue_url: "https://sqs.us-east-1.amazonaws.com/123/Normal".to_string(),
///         move_to_processed: false,
///         processed_prefix: "processed/".to_string(),
///     };
///
///     let shared = aws_config::from_env().load().await;
///     let sqs = aws_sdk_sqs::Client::new(&shared);
///     let router = IngestRouter::new(
///         Arc::new(S3Store::new(aws_sdk_s3::Client::new(&shared))),
///         Arc::new(ComprehendClassifier::new(aws_sdk_comprehend::Client::new(&shared))),
///         Arc::new(SqsChannel::new(sqs.clone(), &config.high_priority_queue_url)),
///         Arc::new(SqsChannel::new(sqs, &config.normal_queue_url)),
///     )
///     .configured(&config);
///
///     let notification = serde_json::json!({
///         "Records": [{ "s3": { "bucket": { "name": "uploads" }, "object": { "key": "review.txt" } } }]
///     });
///     let response = sentiment_router::router::handler::handle_notification(&router, &notification).await;
///     println!("{response}");
///
///     Ok(())
/// }
/// ```
pub mod aggregator;
pub mod clients;
pub mod core;
pub mod errors;
pub mod response;
pub mod router;

pub use errors::PipelineError;

/// Configure structured logging with JSON format for AWS Lambda environments.
///
/// Sets up tracing-subscriber with a JSON formatter suitable for `CloudWatch` Logs
/// and an `EnvFilter` read from `RUST_LOG` (default `info`). Calling it more than once
/// is harmless; only the first call installs the subscriber.
///
/// # Example
///
/// ```
/// sentiment_router::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = fmt::layer().json().with_target(true);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
