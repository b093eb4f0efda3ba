use std::sync::Arc;

use tracing::{info, warn};

use crate::clients::{MessageChannel, ReceiveOptions};
use crate::core::models::{DisplayRecord, QueuedEnvelope, Route};
use crate::errors::PipelineError;

/// Small, short-lived peek: messages reappear after two seconds.
pub const PEEK_OPTIONS: ReceiveOptions = ReceiveOptions {
    max_messages: 5,
    visibility_timeout_secs: 2,
    wait_time_secs: 1,
};

/// Read-only view over both channels. Never deletes or acknowledges anything.
pub struct QueueAggregator {
    high_priority: Arc<dyn MessageChannel>,
    normal: Arc<dyn MessageChannel>,
}

impl QueueAggregator {
    pub fn new(high_priority: Arc<dyn MessageChannel>, normal: Arc<dyn MessageChannel>) -> Self {
        Self {
            high_priority,
            normal,
        }
    }

    /// High-priority messages first, then normal, each in channel read order.
    pub async fn read_all(&self) -> Result<Vec<DisplayRecord>, PipelineError> {
        let mut combined = read_from(self.high_priority.as_ref(), Route::HighPriority).await?;
        combined.extend(read_from(self.normal.as_ref(), Route::Normal).await?);
        Ok(combined)
    }
}

async fn read_from(
    channel: &dyn MessageChannel,
    route: Route,
) -> Result<Vec<DisplayRecord>, PipelineError> {
    let messages = channel.receive(PEEK_OPTIONS).await?;
    info!(queue = route.queue_name(), count = messages.len(), "Peeked queue");

    Ok(messages
        .into_iter()
        .filter_map(
            |m| match serde_json::from_str::<QueuedEnvelope>(&m.body) {
                Ok(envelope) => Some(DisplayRecord::from_envelope(route.queue_name(), envelope)),
                Err(e) => {
                    warn!(queue = route.queue_name(), error = %e, "Skipping unreadable message body");
                    None
                }
            },
        )
        .collect())
}
