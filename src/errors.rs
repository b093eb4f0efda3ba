use aws_sdk_sqs::error::{DisplayErrorContext, SdkError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The notified object no longer exists. Displays as the bare S3 error code, which is
    /// what ends up in the per-file result.
    #[error("NoSuchKey")]
    NoSuchKey { bucket: String, key: String },

    #[error("Failed to access object storage: {0}")]
    Storage(String),

    #[error("Failed to classify sentiment: {0}")]
    Classifier(String),

    #[error("Failed to access message queue: {0}")]
    Channel(String),

    #[error("Failed to relocate object: {0}")]
    Relocation(String),

    #[error("Failed to serialize payload: {0}")]
    Serialization(String),

    #[error("Invalid upload record: {0}")]
    InvalidRecord(String),

    #[error("Failed to interact with AWS services: {0}")]
    Aws(String),
}

impl From<serde_json::Error> for PipelineError {
    fn from(error: serde_json::Error) -> Self {
        PipelineError::Serialization(error.to_string())
    }
}

// Every AWS SDK crate shares one `SdkError`, so this covers S3, Comprehend and SQS alike.
impl<E, R> From<SdkError<E, R>> for PipelineError
where
    E: std::error::Error + 'static,
    R: std::fmt::Debug,
{
    fn from(error: SdkError<E, R>) -> Self {
        PipelineError::Aws(DisplayErrorContext(&error).to_string())
    }
}
