use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::models::piece::Color;

#[cfg(test)]
use mockall::automock;

/// A turn-change event as handed to the push channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnChange {
    pub game_id: String,
    pub turn: Color,
    pub changed_at: DateTime<Utc>,
}

/// Push-notification boundary. The engine emits one turn-change event per
/// finalized move; how it reaches clients is the channel's concern.
#[async_trait]
#[cfg_attr(test, automock)]
pub trait NotificationRepository: Send + Sync {
    async fn send_turn_change(
        &self,
        game_id: &str,
        turn: Color,
        changed_at: DateTime<Utc>,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// Records events instead of delivering them. Backs tests and
/// single-process embedders that poll rather than push.
pub struct InMemoryNotificationRepository {
    sent: Mutex<Vec<TurnChange>>,
}

impl InMemoryNotificationRepository {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
        }
    }

    pub async fn sent_events(&self) -> Vec<TurnChange> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl NotificationRepository for InMemoryNotificationRepository {
    async fn send_turn_change(
        &self,
        game_id: &str,
        turn: Color,
        changed_at: DateTime<Utc>,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.sent.lock().await.push(TurnChange {
            game_id: game_id.to_string(),
            turn,
            changed_at,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_repository_records_events() {
        let repository = InMemoryNotificationRepository::new();
        let now = Utc::now();

        repository
            .send_turn_change("game-1", Color::Black, now)
            .await
            .unwrap();

        let events = repository.sent_events().await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].game_id, "game-1");
        assert_eq!(events[0].turn, Color::Black);
        assert_eq!(events[0].changed_at, now);
    }
}
