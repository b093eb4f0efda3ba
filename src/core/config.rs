use std::env;

use crate::errors::PipelineError;

pub const DEFAULT_PROCESSED_PREFIX: &str = "processed/";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub high_priority_queue_url: String,
    pub normal_queue_url: String,
    /// Move objects under `processed_prefix` once their message is queued.
    pub move_to_processed: bool,
    pub processed_prefix: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, PipelineError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, PipelineError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| PipelineError::Config(format!("{name} is not set")))
        };

        Ok(Self {
            high_priority_queue_url: required("HIGH_PRIORITY_QUEUE_URL")?,
            normal_queue_url: required("NORMAL_QUEUE_URL")?,
            move_to_processed: lookup("MOVE_TO_PROCESSED")
                .is_some_and(|v| v.trim().eq_ignore_ascii_case("true")),
            processed_prefix: lookup("PROCESSED_PREFIX")
                .unwrap_or_else(|| DEFAULT_PROCESSED_PREFIX.to_string()),
        })
    }
}
