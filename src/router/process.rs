//! Per-event pipeline: fetch, validate, classify, route, optionally relocate.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{error, info, warn};

use super::event;
use crate::clients::{MessageAttributes, MessageChannel, ObjectStore, SentimentClassifier};
use crate::core::config::AppConfig;
use crate::core::models::{
    Outcome, ProcessingResult, Route, RoutedMessage, SkipReason, UploadEvent,
};
use crate::core::text::{self, MAX_ANALYSIS_BYTES};
use crate::errors::PipelineError;

/// Language hint passed to the classifier.
pub const SOURCE_LANGUAGE: &str = "en";

/// A downloaded object that decoded to non-blank UTF-8.
#[derive(Debug)]
pub struct AnalyzedDocument {
    pub raw_bytes: Vec<u8>,
    pub text: String,
}

impl AnalyzedDocument {
    pub fn from_bytes(raw_bytes: Vec<u8>) -> Result<Self, SkipReason> {
        let text = match std::str::from_utf8(&raw_bytes) {
            Ok(text) => text.to_string(),
            Err(_) => return Err(SkipReason::NonUtf8),
        };
        if is_blank(&text) {
            return Err(SkipReason::EmptyFile);
        }
        Ok(Self { raw_bytes, text })
    }

    #[must_use]
    pub fn text_for_analysis(&self) -> &str {
        text::truncate_utf8_bytes(&self.text, MAX_ANALYSIS_BYTES)
    }

    #[must_use]
    pub fn preview(&self) -> String {
        text::preview(&self.text)
    }
}

/// Blank means nothing but whitespace or the ASCII file, group, record and unit
/// separators (U+001C to U+001F).
fn is_blank(text: &str) -> bool {
    text.chars()
        .all(|c| c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c))
}

/// Results for one notification batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    pub results: Vec<ProcessingResult>,
}

impl BatchReport {
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.results.iter().any(ProcessingResult::is_error)
    }

    /// 207 when any item failed, 200 otherwise. Skipped files are not failures.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        if self.has_errors() { 207 } else { 200 }
    }
}

pub struct IngestRouter {
    storage: Arc<dyn ObjectStore>,
    classifier: Arc<dyn SentimentClassifier>,
    high_priority: Arc<dyn MessageChannel>,
    normal: Arc<dyn MessageChannel>,
    processed_prefix: Option<String>,
}

impl IngestRouter {
    pub fn new(
        storage: Arc<dyn ObjectStore>,
        classifier: Arc<dyn SentimentClassifier>,
        high_priority: Arc<dyn MessageChannel>,
        normal: Arc<dyn MessageChannel>,
    ) -> Self {
        Self {
            storage,
            classifier,
            high_priority,
            normal,
            processed_prefix: None,
        }
    }

    /// Moves each source object under `prefix` after its message is queued.
    #[must_use]
    pub fn with_relocation(mut self, prefix: impl Into<String>) -> Self {
        self.processed_prefix = Some(prefix.into());
        self
    }

    /// Applies the relocation settings from `config`.
    #[must_use]
    pub fn configured(self, config: &AppConfig) -> Self {
        if config.move_to_processed {
            self.with_relocation(config.processed_prefix.clone())
        } else {
            self
        }
    }

    fn channel(&self, route: Route) -> &dyn MessageChannel {
        match route {
            Route::HighPriority => self.high_priority.as_ref(),
            Route::Normal => self.normal.as_ref(),
        }
    }

    /// Processes every record in order. Each record's failure is recorded and never
    /// affects its siblings.
    pub async fn process_batch(&self, records: &[Value]) -> BatchReport {
        let mut results = Vec::with_capacity(records.len());
        for record in records {
            results.push(self.process_record(record).await);
        }
        BatchReport { results }
    }

    pub async fn process_record(&self, record: &Value) -> ProcessingResult {
        let upload = match event::upload_event(record) {
            Ok(upload) => upload,
            Err(e) => {
                error!(error = %e, "Error parsing upload record");
                return ProcessingResult::failed(event::raw_key(record), e.to_string());
            }
        };

        match self.process_event(&upload).await {
            Ok(outcome) => ProcessingResult {
                file: upload.key,
                outcome,
            },
            Err(e) => {
                error!(bucket = %upload.bucket, key = %upload.key, error = %e, "Error processing upload");
                ProcessingResult::failed(upload.key, e.to_string())
            }
        }
    }

    /// Runs the pipeline for one upload. Content problems come back as
    /// [`Outcome::Skipped`]; collaborator failures come back as `Err`.
    pub async fn process_event(&self, upload: &UploadEvent) -> Result<Outcome, PipelineError> {
        info!(bucket = %upload.bucket, key = %upload.key, "New upload");

        let raw_bytes = self.storage.get(&upload.bucket, &upload.key).await?;
        let document = match AnalyzedDocument::from_bytes(raw_bytes) {
            Ok(document) => document,
            Err(reason) => {
                warn!(key = %upload.key, reason = ?reason, "Skipping upload");
                return Ok(Outcome::Skipped { status: reason });
            }
        };

        let classification = self
            .classifier
            .classify(document.text_for_analysis(), SOURCE_LANGUAGE)
            .await?;
        info!(
            sentiment = %classification.sentiment,
            positive = classification.scores.positive,
            negative = classification.scores.negative,
            neutral = classification.scores.neutral,
            mixed = classification.scores.mixed,
            "Detected sentiment"
        );

        let message = RoutedMessage {
            s3_bucket: upload.bucket.clone(),
            s3_key: upload.key.clone(),
            sentiment: classification.sentiment,
            sentiment_scores: classification.scores,
            preview: document.preview(),
            timestamp: text::now_iso(),
        };
        let body = serde_json::to_string(&message)?;

        let mut attributes = MessageAttributes::new();
        attributes.insert(
            "Sentiment".to_string(),
            classification.sentiment.as_str().to_string(),
        );
        attributes.insert("S3Key".to_string(), upload.key.clone());

        let route = Route::for_sentiment(classification.sentiment);
        let message_id = self.channel(route).send(&body, &attributes).await?;
        info!(
            queue = route.queue_name(),
            priority = route.priority_label(),
            message_id = %message_id,
            "Message queued"
        );

        if let Some(prefix) = &self.processed_prefix {
            self.relocate(upload, prefix).await?;
        }

        Ok(Outcome::Routed {
            queue: route.queue_name().to_string(),
            priority: route.priority_label().to_string(),
            sentiment: classification.sentiment,
            message_id,
        })
    }

    async fn relocate(&self, upload: &UploadEvent, prefix: &str) -> Result<(), PipelineError> {
        let dest_key = text::processed_key(&upload.key, prefix);

        self.storage
            .copy(&upload.bucket, &upload.key, &dest_key)
            .await
            .map_err(|e| PipelineError::Relocation(format!("copy to {dest_key}: {e}")))?;
        self.storage
            .delete(&upload.bucket, &upload.key)
            .await
            .map_err(|e| {
                PipelineError::Relocation(format!(
                    "copied to {dest_key} but original was not deleted: {e}"
                ))
            })?;

        info!(key = %upload.key, dest_key = %dest_key, "Moved to processed");
        Ok(())
    }
}
