use std::error::Error;

use aws_sdk_sqs::error::SdkError;
use aws_sdk_sqs::operation::send_message::SendMessageError;
use sentiment_router::errors::PipelineError;

#[test]
fn test_pipeline_error_implements_error_trait() {
    fn assert_error<T: Error + Send + Sync + 'static>(_: &T) {}

    let error = PipelineError::Storage("test error".to_string());
    assert_error(&error);
}

#[test]
fn test_pipeline_error_display() {
    let error = PipelineError::NoSuchKey {
        bucket: "b".to_string(),
        key: "missing.txt".to_string(),
    };
    assert_eq!(format!("{error}"), "NoSuchKey");

    let error = PipelineError::Classifier("throttled".to_string());
    assert_eq!(
        format!("{error}"),
        "Failed to classify sentiment: throttled"
    );

    let error = PipelineError::Channel("queue unavailable".to_string());
    assert_eq!(
        format!("{error}"),
        "Failed to access message queue: queue unavailable"
    );
}

#[test]
fn test_pipeline_error_from_serde() {
    let err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
    let pipeline_err: PipelineError = err.into();

    match pipeline_err {
        PipelineError::Serialization(msg) => assert!(!msg.is_empty()),
        _ => panic!("Unexpected error type"),
    }
}

#[test]
fn test_pipeline_error_from_sdk_error() {
    let err: SdkError<SendMessageError> = SdkError::construction_failure("bad input");
    let pipeline_err: PipelineError = err.into();

    match &pipeline_err {
        PipelineError::Aws(msg) => assert!(msg.contains("bad input"), "{msg}"),
        _ => panic!("Unexpected error type"),
    }
    assert!(
        pipeline_err
            .to_string()
            .starts_with("Failed to interact with AWS services: ")
    );
}
