//! Sentiment classification backed by Amazon Comprehend `DetectSentiment`.

use async_trait::async_trait;
use aws_sdk_comprehend::Client;
use aws_sdk_comprehend::error::DisplayErrorContext;
use aws_sdk_comprehend::types::{LanguageCode, SentimentScore, SentimentType};

use super::SentimentClassifier;
use crate::core::models::{Classification, Sentiment, SentimentScores};
use crate::errors::PipelineError;

#[derive(Debug, Clone)]
pub struct ComprehendClassifier {
    client: Client,
}

impl ComprehendClassifier {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

fn map_sentiment(label: &SentimentType) -> Result<Sentiment, PipelineError> {
    match label {
        SentimentType::Positive => Ok(Sentiment::Positive),
        SentimentType::Negative => Ok(Sentiment::Negative),
        SentimentType::Neutral => Ok(Sentiment::Neutral),
        SentimentType::Mixed => Ok(Sentiment::Mixed),
        other => Err(PipelineError::Classifier(format!(
            "unexpected sentiment label: {}",
            other.as_str()
        ))),
    }
}

fn map_scores(score: &SentimentScore) -> Result<SentimentScores, PipelineError> {
    let field = |value: Option<f32>, name: &str| {
        value
            .map(f64::from)
            .ok_or_else(|| PipelineError::Classifier(format!("missing {name} score")))
    };
    Ok(SentimentScores {
        positive: field(score.positive(), "positive")?,
        negative: field(score.negative(), "negative")?,
        neutral: field(score.neutral(), "neutral")?,
        mixed: field(score.mixed(), "mixed")?,
    })
}

#[async_trait]
impl SentimentClassifier for ComprehendClassifier {
    async fn classify(
        &self,
        text: &str,
        language: &str,
    ) -> Result<Classification, PipelineError> {
        let output = self
            .client
            .detect_sentiment()
            .text(text)
            .language_code(LanguageCode::from(language))
            .send()
            .await
            .map_err(|e| {
                PipelineError::Classifier(format!(
                    "comprehend detect_sentiment: {}",
                    DisplayErrorContext(&e)
                ))
            })?;

        let label = output
            .sentiment()
            .ok_or_else(|| PipelineError::Classifier("response has no sentiment".to_string()))?;
        let score = output
            .sentiment_score()
            .ok_or_else(|| PipelineError::Classifier("response has no scores".to_string()))?;

        Ok(Classification {
            sentiment: map_sentiment(label)?,
            scores: map_scores(score)?,
        })
    }
}
