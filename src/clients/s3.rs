//! Object storage backed by Amazon S3.

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::error::DisplayErrorContext;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use super::ObjectStore;
use crate::errors::PipelineError;

// `CopySource` is a URL path: keep the characters S3 treats as unreserved plus `/`.
const COPY_SOURCE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

#[derive(Debug, Clone)]
pub struct S3Store {
    client: Client,
}

impl S3Store {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

fn copy_source(bucket: &str, key: &str) -> String {
    format!("{bucket}/{}", utf8_percent_encode(key, COPY_SOURCE))
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, PipelineError> {
        let output = match self.client.get_object().bucket(bucket).key(key).send().await {
            Ok(output) => output,
            Err(e) => {
                if e.as_service_error().is_some_and(|se| se.is_no_such_key()) {
                    return Err(PipelineError::NoSuchKey {
                        bucket: bucket.to_string(),
                        key: key.to_string(),
                    });
                }
                return Err(PipelineError::Storage(format!(
                    "s3 get_object: {}",
                    DisplayErrorContext(&e)
                )));
            }
        };

        let data = output
            .body
            .collect()
            .await
            .map_err(|e| PipelineError::Storage(format!("s3 read body: {e}")))?;
        Ok(data.into_bytes().to_vec())
    }

    async fn copy(
        &self,
        bucket: &str,
        src_key: &str,
        dst_key: &str,
    ) -> Result<(), PipelineError> {
        self.client
            .copy_object()
            .bucket(bucket)
            .copy_source(copy_source(bucket, src_key))
            .key(dst_key)
            .send()
            .await?;
        Ok(())
    }

    async fn delete(&self, bucket: &str, key: &str) -> Result<(), PipelineError> {
        self.client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_source_escapes_key_but_keeps_slashes() {
        assert_eq!(copy_source("b", "inbox/a b+c.txt"), "b/inbox/a%20b%2Bc.txt");
        assert_eq!(copy_source("b", "note.txt"), "b/note.txt");
    }
}
