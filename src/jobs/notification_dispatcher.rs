use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::app::notifications::NotificationSink;
use crate::domain::notification::EngagementEvent;

/// Drains the outbox until every sender is gone. Delivery failures are
/// logged and the event is dropped.
pub async fn run(mut receiver: mpsc::Receiver<EngagementEvent>, sink: Arc<dyn NotificationSink>) {
    info!("notification dispatcher started");
    while let Some(event) = receiver.recv().await {
        if let Err(err) = sink.deliver(&event).await {
            warn!(
                error = ?err,
                event_id = %event.id,
                target_user_id = event.target_user_id,
                kind = event.kind.as_db(),
                "failed to deliver notification"
            );
        }
    }
    info!("notification dispatcher stopped");
}
