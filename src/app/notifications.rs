use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::warn;

use crate::domain::notification::{EngagementEvent, NotificationKind};

/// Where engagement events end up once they leave the request path.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn deliver(&self, event: &EngagementEvent) -> Result<()>;
}

/// Non-blocking producer side of the notification queue.
#[derive(Clone)]
pub struct NotificationOutbox {
    sender: mpsc::Sender<EngagementEvent>,
}

impl NotificationOutbox {
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<EngagementEvent>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { sender }, receiver)
    }

    /// Queues `event` unless the actor is notifying themselves. A full or
    /// closed queue drops the event.
    pub fn publish(&self, event: EngagementEvent) {
        if event.actor_id == event.target_user_id {
            return;
        }
        match self.sender.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => warn!(
                event_id = %event.id,
                kind = event.kind.as_db(),
                "notification queue full, dropping event"
            ),
            Err(TrySendError::Closed(event)) => warn!(
                event_id = %event.id,
                kind = event.kind.as_db(),
                "notification queue closed, dropping event"
            ),
        }
    }
}

pub(crate) fn describe(kind: NotificationKind) -> &'static str {
    match kind {
        NotificationKind::UpvoteThread => "upvoted your thread",
        NotificationKind::DownvoteThread => "downvoted your thread",
        NotificationKind::CommentThread => "commented on your thread",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn self_engagement_is_not_queued() {
        let (outbox, mut receiver) = NotificationOutbox::channel(4);
        outbox.publish(EngagementEvent::new(1, 1, 10, NotificationKind::UpvoteThread, "x"));
        outbox.publish(EngagementEvent::new(2, 1, 10, NotificationKind::UpvoteThread, "y"));
        drop(outbox);

        let event = receiver.recv().await.unwrap();
        assert_eq!(event.actor_id, 2);
        assert!(receiver.recv().await.is_none());
    }

    #[tokio::test]
    async fn full_queue_drops_instead_of_blocking() {
        let (outbox, mut receiver) = NotificationOutbox::channel(1);
        outbox.publish(EngagementEvent::new(2, 1, 10, NotificationKind::CommentThread, "a"));
        outbox.publish(EngagementEvent::new(3, 1, 10, NotificationKind::CommentThread, "b"));
        drop(outbox);

        assert_eq!(receiver.recv().await.unwrap().actor_id, 2);
        assert!(receiver.recv().await.is_none());
    }
}
