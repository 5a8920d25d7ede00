use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::models::piece::Color;
use crate::repositories::notification_repository::NotificationRepository;

/// Thin wrapper over the push channel. Delivery failures are the
/// caller's decision to swallow or propagate; a finalized move must
/// never be rolled back because a notification was lost.
#[derive(Clone)]
pub struct NotificationService {
    repository: Arc<dyn NotificationRepository>,
}

impl NotificationService {
    pub fn new(repository: Arc<dyn NotificationRepository>) -> Self {
        Self { repository }
    }

    pub async fn notify_turn_changed(
        &self,
        game_id: &str,
        turn: Color,
        changed_at: DateTime<Utc>,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        info!("Notifying turn change for game {}: {:?}", game_id, turn);
        self.repository
            .send_turn_change(game_id, turn, changed_at)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::notification_repository::InMemoryNotificationRepository;

    #[tokio::test]
    async fn test_notify_turn_changed_forwards_to_repository() {
        let repository = Arc::new(InMemoryNotificationRepository::new());
        let service = NotificationService::new(repository.clone());
        let now = Utc::now();

        service
            .notify_turn_changed("game-1", Color::White, now)
            .await
            .unwrap();

        let events = repository.sent_events().await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].game_id, "game-1");
        assert_eq!(events[0].turn, Color::White);
    }
}
