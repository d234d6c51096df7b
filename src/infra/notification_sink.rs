use anyhow::Result;
use async_trait::async_trait;
use serde_json::json;

use crate::app::notifications::NotificationSink;
use crate::domain::notification::EngagementEvent;
use crate::infra::db::Db;

/// Writes events into the `notifications` inbox table read by the
/// notification service.
#[derive(Clone)]
pub struct PgNotificationSink {
    db: Db,
}

impl PgNotificationSink {
    pub fn new(db: Db) -> Self {
        Self { db }
    }
}

#[async_trait]
impl NotificationSink for PgNotificationSink {
    async fn deliver(&self, event: &EngagementEvent) -> Result<()> {
        let payload = json!({
            "actor_id": event.actor_id,
            "ref_id": event.ref_id,
            "body": event.body,
        });
        sqlx::query(
            "INSERT INTO notifications (id, user_id, notification_type, payload) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (id) DO NOTHING",
        )
        .bind(event.id)
        .bind(event.target_user_id)
        .bind(event.kind.as_db())
        .bind(payload)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }
}
