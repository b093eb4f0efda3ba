use async_trait::async_trait;
use aws_sdk_sqs::Client as SqsClient;
use aws_sdk_sqs::error::DisplayErrorContext;
use aws_sdk_sqs::types::MessageAttributeValue;

use super::{MessageAttributes, MessageChannel, ReceiveOptions, ReceivedMessage};
use crate::errors::PipelineError;

/// One SQS queue addressed by URL.
#[derive(Debug, Clone)]
pub struct SqsChannel {
    client: SqsClient,
    queue_url: String,
}

impl SqsChannel {
    pub fn new(client: SqsClient, queue_url: impl Into<String>) -> Self {
        Self {
            client,
            queue_url: queue_url.into(),
        }
    }

    #[must_use]
    pub fn queue_url(&self) -> &str {
        &self.queue_url
    }
}

#[async_trait]
impl MessageChannel for SqsChannel {
    async fn send(
        &self,
        body: &str,
        attributes: &MessageAttributes,
    ) -> Result<String, PipelineError> {
        let mut request = self
            .client
            .send_message()
            .queue_url(&self.queue_url)
            .message_body(body);

        for (name, value) in attributes {
            let attribute = MessageAttributeValue::builder()
                .data_type("String")
                .string_value(value)
                .build()
                .map_err(|e| PipelineError::Channel(format!("attribute {name}: {e}")))?;
            request = request.message_attributes(name, attribute);
        }

        let output = request.send().await.map_err(|e| {
            PipelineError::Channel(format!(
                "Failed to send message to SQS: {}",
                DisplayErrorContext(&e)
            ))
        })?;

        output
            .message_id()
            .map(ToString::to_string)
            .ok_or_else(|| PipelineError::Channel("SQS returned no message id".to_string()))
    }

    async fn receive(
        &self,
        options: ReceiveOptions,
    ) -> Result<Vec<ReceivedMessage>, PipelineError> {
        let output = self
            .client
            .receive_message()
            .queue_url(&self.queue_url)
            .max_number_of_messages(options.max_messages)
            .visibility_timeout(options.visibility_timeout_secs)
            .wait_time_seconds(options.wait_time_secs)
            .message_attribute_names("All")
            .send()
            .await
            .map_err(|e| {
                PipelineError::Channel(format!(
                    "Failed to receive from SQS: {}",
                    DisplayErrorContext(&e)
                ))
            })?;

        let messages = output
            .messages()
            .iter()
            .map(|m| ReceivedMessage {
                body: m.body().unwrap_or_default().to_string(),
                attributes: m
                    .message_attributes()
                    .map(|attrs| {
                        attrs
                            .iter()
                            .filter_map(|(k, v)| {
                                v.string_value().map(|s| (k.clone(), s.to_string()))
                            })
                            .collect()
                    })
                    .unwrap_or_default(),
            })
            .collect();

        Ok(messages)
    }
}
