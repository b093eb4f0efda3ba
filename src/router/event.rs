//! S3 notification parsing.

use serde::Deserialize;
use serde_json::Value;

use crate::core::models::UploadEvent;
use crate::core::text::decode_object_key;
use crate::errors::PipelineError;

#[derive(Debug, Deserialize)]
struct S3EventRecord {
    s3: S3Entity,
}

#[derive(Debug, Deserialize)]
struct S3Entity {
    bucket: S3Bucket,
    object: S3Object,
}

#[derive(Debug, Deserialize)]
struct S3Bucket {
    name: String,
}

#[derive(Debug, Deserialize)]
struct S3Object {
    key: String,
}

/// Returns the notification's records, or `None` when there is nothing to process.
#[must_use]
pub fn records(payload: &Value) -> Option<&[Value]> {
    payload
        .get("Records")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .filter(|records| !records.is_empty())
}

/// Extracts the bucket and decoded key from one notification record.
pub fn upload_event(record: &Value) -> Result<UploadEvent, PipelineError> {
    let parsed = S3EventRecord::deserialize(record)
        .map_err(|e| PipelineError::InvalidRecord(e.to_string()))?;
    Ok(UploadEvent {
        bucket: parsed.s3.bucket.name,
        key: decode_object_key(&parsed.s3.object.key),
    })
}

/// Best-effort file name for a record that could not be parsed.
#[must_use]
pub fn raw_key(record: &Value) -> &str {
    record
        .get("s3")
        .and_then(|s3| s3.get("object"))
        .and_then(|object| object.get("key"))
        .and_then(Value::as_str)
        .unwrap_or("unknown")
}
