use lambda_runtime::{Error, LambdaEvent};
use serde_json::Value;
use tracing::{error, info};

use super::event;
use super::process::IngestRouter;
use crate::response;

/// Lambda handler for S3 upload notifications.
///
/// Always answers with a structured response: 400 when the notification carries no
/// records, 200/207 with one result per record otherwise, 500 if the report itself
/// cannot be produced.
#[tracing::instrument(level = "info", skip(router, event), fields(request_id = %event.context.request_id))]
pub async fn function_handler(
    router: &IngestRouter,
    event: LambdaEvent<Value>,
) -> Result<Value, Error> {
    Ok(handle_notification(router, &event.payload).await)
}

pub async fn handle_notification(router: &IngestRouter, payload: &Value) -> Value {
    let Some(records) = event::records(payload) else {
        error!("Notification has no records");
        return response::err_response(400, "No Records in event");
    };
    info!(count = records.len(), "Processing upload notification");

    let report = router.process_batch(records).await;
    match serde_json::to_string(&report) {
        Ok(body) => {
            info!(
                status = report.status_code(),
                results = report.results.len(),
                "Batch complete"
            );
            response::json_response(report.status_code(), &body)
        }
        Err(e) => {
            error!("Fatal handler error: {}", e);
            response::handler_error(&e.to_string())
        }
    }
}

pub use self::function_handler as handler;
