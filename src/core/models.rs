use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One uploaded object named by an S3 notification record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadEvent {
    pub bucket: String,
    pub key: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
    Mixed,
}

impl Sentiment {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Sentiment::Positive => "POSITIVE",
            Sentiment::Negative => "NEGATIVE",
            Sentiment::Neutral => "NEUTRAL",
            Sentiment::Mixed => "MIXED",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-class confidence as returned by the classifier; not normalized.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SentimentScores {
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
    pub mixed: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub sentiment: Sentiment,
    pub scores: SentimentScores,
}

/// Destination channel for a classified document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    HighPriority,
    Normal,
}

impl Route {
    /// Negative documents jump the line; everything else is routine.
    #[must_use]
    pub fn for_sentiment(sentiment: Sentiment) -> Self {
        match sentiment {
            Sentiment::Negative => Route::HighPriority,
            Sentiment::Positive | Sentiment::Neutral | Sentiment::Mixed => Route::Normal,
        }
    }

    #[must_use]
    pub fn queue_name(self) -> &'static str {
        match self {
            Route::HighPriority => "HighPriorityQueue",
            Route::Normal => "NormalQueue",
        }
    }

    #[must_use]
    pub fn priority_label(self) -> &'static str {
        match self {
            Route::HighPriority => "🔴 HIGH PRIORITY",
            Route::Normal => "🟢 NORMAL PRIORITY",
        }
    }
}

/// JSON body placed on a channel. Carries a pointer to the object and a short preview,
/// never the full text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutedMessage {
    pub s3_bucket: String,
    pub s3_key: String,
    pub sentiment: Sentiment,
    pub sentiment_scores: SentimentScores,
    pub preview: String,
    pub timestamp: String,
}

/// Outcome of one upload event, serialized flat next to `file`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingResult {
    pub file: String,
    #[serde(flatten)]
    pub outcome: Outcome,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Outcome {
    Routed {
        queue: String,
        priority: String,
        sentiment: Sentiment,
        message_id: String,
    },
    Failed {
        error: String,
    },
    Skipped {
        status: SkipReason,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    #[serde(rename = "skipped_non_utf8")]
    NonUtf8,
    #[serde(rename = "empty_file")]
    EmptyFile,
}

impl ProcessingResult {
    pub fn skipped(file: impl Into<String>, reason: SkipReason) -> Self {
        Self {
            file: file.into(),
            outcome: Outcome::Skipped { status: reason },
        }
    }

    pub fn failed(file: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            outcome: Outcome::Failed {
                error: error.into(),
            },
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self.outcome, Outcome::Failed { .. })
    }
}

/// A queued body as read back by the aggregator. Fields are passed through as raw JSON
/// so that messages produced by older or partial writers still render; a missing field
/// is `null`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueuedEnvelope {
    #[serde(default)]
    pub s3_bucket: Value,
    #[serde(default)]
    pub s3_key: Value,
    #[serde(default)]
    pub sentiment: Value,
    #[serde(default)]
    pub sentiment_scores: Value,
    #[serde(default)]
    pub preview: Value,
    #[serde(default)]
    pub timestamp: Value,
}

/// Display row returned by the aggregator endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayRecord {
    pub queue: String,
    pub sentiment: Value,
    pub scores: Value,
    pub preview: Value,
    pub timestamp: Value,
    pub s3_bucket: Value,
    pub s3_key: Value,
}

impl DisplayRecord {
    pub fn from_envelope(queue: impl Into<String>, envelope: QueuedEnvelope) -> Self {
        Self {
            queue: queue.into(),
            sentiment: envelope.sentiment,
            scores: envelope.sentiment_scores,
            preview: envelope.preview,
            timestamp: envelope.timestamp,
            s3_bucket: envelope.s3_bucket,
            s3_key: envelope.s3_key,
        }
    }
}
