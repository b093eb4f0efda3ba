//! Client modules for the managed services the pipeline talks to.
//!
//! Each service sits behind a narrow trait so handlers can be driven by the AWS
//! implementations in production and by [`memory`] in tests.

pub mod comprehend;
pub mod memory;
pub mod s3;
pub mod sqs;

use std::collections::HashMap;

use async_trait::async_trait;

use crate::core::models::Classification;
use crate::errors::PipelineError;

pub use comprehend::ComprehendClassifier;
pub use s3::S3Store;
pub use sqs::SqsChannel;

/// String attributes sent alongside a message body.
pub type MessageAttributes = HashMap<String, String>;

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Reads the whole object. A missing object is [`PipelineError::NoSuchKey`].
    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, PipelineError>;

    async fn copy(&self, bucket: &str, src_key: &str, dst_key: &str)
    -> Result<(), PipelineError>;

    async fn delete(&self, bucket: &str, key: &str) -> Result<(), PipelineError>;
}

#[async_trait]
pub trait SentimentClassifier: Send + Sync {
    async fn classify(&self, text: &str, language: &str)
    -> Result<Classification, PipelineError>;
}

/// Receive parameters for a non-destructive peek.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiveOptions {
    pub max_messages: i32,
    pub visibility_timeout_secs: i32,
    pub wait_time_secs: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedMessage {
    pub body: String,
    pub attributes: MessageAttributes,
}

#[async_trait]
pub trait MessageChannel: Send + Sync {
    /// Queues `body` and returns the channel-assigned message id.
    async fn send(
        &self,
        body: &str,
        attributes: &MessageAttributes,
    ) -> Result<String, PipelineError>;

    /// Returns currently visible messages without acknowledging them.
    async fn receive(&self, options: ReceiveOptions)
    -> Result<Vec<ReceivedMessage>, PipelineError>;
}
