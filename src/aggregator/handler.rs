use lambda_runtime::{Error, LambdaEvent};
use serde_json::Value;
use tracing::error;

use super::read::QueueAggregator;
use crate::response;

/// Lambda handler for the queue viewer endpoint. The request itself is ignored.
#[tracing::instrument(level = "info", skip(aggregator, event), fields(request_id = %event.context.request_id))]
pub async fn function_handler(
    aggregator: &QueueAggregator,
    event: LambdaEvent<Value>,
) -> Result<Value, Error> {
    Ok(handle_peek(aggregator).await)
}

pub async fn handle_peek(aggregator: &QueueAggregator) -> Value {
    let records = match aggregator.read_all().await {
        Ok(records) => records,
        Err(e) => {
            error!("Failed to read queues: {}", e);
            return response::cors_err_response(500, &e.to_string());
        }
    };

    match serde_json::to_string(&records) {
        Ok(body) => response::cors_json_response(200, &body),
        Err(e) => {
            error!("Failed to serialize queue view: {}", e);
            response::handler_error(&e.to_string())
        }
    }
}

pub use self::function_handler as handler;
