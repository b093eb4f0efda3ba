//! In-process implementations of the client traits, for tests and local runs.
//!
//! They keep everything in memory and never expire anything: a [`MemoryChannel`]
//! ignores visibility timeouts and returns the same messages on every receive.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use uuid::Uuid;

use super::{
    MessageAttributes, MessageChannel, ObjectStore, ReceiveOptions, ReceivedMessage,
    SentimentClassifier,
};
use crate::core::models::Classification;
use crate::errors::PipelineError;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Bucket/key addressed byte store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: Mutex<HashMap<(String, String), Vec<u8>>>,
    read_only: Mutex<bool>,
    fail_deletes: Mutex<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, bucket: &str, key: &str, data: impl Into<Vec<u8>>) {
        lock(&self.objects).insert((bucket.to_string(), key.to_string()), data.into());
    }

    #[must_use]
    pub fn contains(&self, bucket: &str, key: &str) -> bool {
        lock(&self.objects).contains_key(&(bucket.to_string(), key.to_string()))
    }

    /// Rejects copies and deletes while set.
    pub fn set_read_only(&self, read_only: bool) {
        *lock(&self.read_only) = read_only;
    }

    /// Rejects deletes only while set, so a copy can land and its source stay behind.
    pub fn set_fail_deletes(&self, fail: bool) {
        *lock(&self.fail_deletes) = fail;
    }

    fn check_writable(&self, op: &str) -> Result<(), PipelineError> {
        if *lock(&self.read_only) {
            return Err(PipelineError::Storage(format!("{op}: store is read-only")));
        }
        Ok(())
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, PipelineError> {
        lock(&self.objects)
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
            .ok_or_else(|| PipelineError::NoSuchKey {
                bucket: bucket.to_string(),
                key: key.to_string(),
            })
    }

    async fn copy(
        &self,
        bucket: &str,
        src_key: &str,
        dst_key: &str,
    ) -> Result<(), PipelineError> {
        self.check_writable("copy")?;
        let mut objects = lock(&self.objects);
        let data = objects
            .get(&(bucket.to_string(), src_key.to_string()))
            .cloned()
            .ok_or_else(|| PipelineError::NoSuchKey {
                bucket: bucket.to_string(),
                key: src_key.to_string(),
            })?;
        objects.insert((bucket.to_string(), dst_key.to_string()), data);
        Ok(())
    }

    async fn delete(&self, bucket: &str, key: &str) -> Result<(), PipelineError> {
        self.check_writable("delete")?;
        if *lock(&self.fail_deletes) {
            return Err(PipelineError::Storage("delete: access denied".to_string()));
        }
        lock(&self.objects).remove(&(bucket.to_string(), key.to_string()));
        Ok(())
    }
}

/// Classifier answering from a fixed text → result table.
#[derive(Debug, Default)]
pub struct ScriptedClassifier {
    answers: HashMap<String, Classification>,
    fallback: Option<Classification>,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_answer(mut self, text: impl Into<String>, answer: Classification) -> Self {
        self.answers.insert(text.into(), answer);
        self
    }

    /// Used for any text without a scripted answer.
    #[must_use]
    pub fn with_fallback(mut self, answer: Classification) -> Self {
        self.fallback = Some(answer);
        self
    }

    /// Every `(text, language)` pair seen so far.
    #[must_use]
    pub fn calls(&self) -> Vec<(String, String)> {
        lock(&self.calls).clone()
    }
}

#[async_trait]
impl SentimentClassifier for ScriptedClassifier {
    async fn classify(
        &self,
        text: &str,
        language: &str,
    ) -> Result<Classification, PipelineError> {
        lock(&self.calls).push((text.to_string(), language.to_string()));
        self.answers
            .get(text)
            .or(self.fallback.as_ref())
            .copied()
            .ok_or_else(|| PipelineError::Classifier("no scripted answer".to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMessage {
    pub message_id: String,
    pub body: String,
    pub attributes: MessageAttributes,
}

/// Append-only queue. Receives never remove anything.
#[derive(Debug, Default)]
pub struct MemoryChannel {
    messages: Mutex<Vec<StoredMessage>>,
    unavailable: Mutex<bool>,
}

impl MemoryChannel {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn messages(&self) -> Vec<StoredMessage> {
        lock(&self.messages).clone()
    }

    /// Fails every send and receive while set.
    pub fn set_unavailable(&self, unavailable: bool) {
        *lock(&self.unavailable) = unavailable;
    }

    fn check_available(&self) -> Result<(), PipelineError> {
        if *lock(&self.unavailable) {
            return Err(PipelineError::Channel("queue unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl MessageChannel for MemoryChannel {
    async fn send(
        &self,
        body: &str,
        attributes: &MessageAttributes,
    ) -> Result<String, PipelineError> {
        self.check_available()?;
        let message_id = Uuid::new_v4().to_string();
        lock(&self.messages).push(StoredMessage {
            message_id: message_id.clone(),
            body: body.to_string(),
            attributes: attributes.clone(),
        });
        Ok(message_id)
    }

    async fn receive(
        &self,
        options: ReceiveOptions,
    ) -> Result<Vec<ReceivedMessage>, PipelineError> {
        self.check_available()?;
        let limit = usize::try_from(options.max_messages).unwrap_or(0);
        Ok(lock(&self.messages)
            .iter()
            .take(limit)
            .map(|m| ReceivedMessage {
                body: m.body.clone(),
                attributes: m.attributes.clone(),
            })
            .collect())
    }
}
