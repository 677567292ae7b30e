// Queue Domain Model

use serde::{Deserialize, Serialize};

/// Queue ID (UUID v4)
pub type QueueId = String;

/// Opaque user identity supplied by the external identity layer
pub type UserId = String;

/// Queue lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QueueStatus {
    Active,
    Paused,
    Closed,
}

impl std::fmt::Display for QueueStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueueStatus::Active => write!(f, "ACTIVE"),
            QueueStatus::Paused => write!(f, "PAUSED"),
            QueueStatus::Closed => write!(f, "CLOSED"),
        }
    }
}

impl std::str::FromStr for QueueStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(QueueStatus::Active),
            "PAUSED" => Ok(QueueStatus::Paused),
            "CLOSED" => Ok(QueueStatus::Closed),
            other => Err(format!("Unknown queue status: {}", other)),
        }
    }
}

/// Queue Entity
///
/// `last_position` is the per-queue position counter. It only ever grows,
/// so positions are never reused even after cancellations. The counter is
/// incremented by the store inside the join transaction, never in memory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Queue {
    pub id: QueueId,
    pub name: String,
    pub business_name: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub status: QueueStatus,
    pub estimated_service_minutes: i64,
    pub last_position: i64,
    pub created_at: i64, // epoch ms
    pub updated_at: Option<i64>,
}

impl Queue {
    pub fn new(
        id: impl Into<String>,
        created_at: i64,
        name: impl Into<String>,
        business_name: impl Into<String>,
        estimated_service_minutes: i64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            business_name: business_name.into(),
            description: None,
            address: None,
            status: QueueStatus::Active,
            estimated_service_minutes,
            last_position: 0,
            created_at,
            updated_at: None,
        }
    }

    /// Whether the queue accepts new entries
    pub fn accepts_entries(&self) -> bool {
        self.status == QueueStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_display() {
        for status in [QueueStatus::Active, QueueStatus::Paused, QueueStatus::Closed] {
            let parsed: QueueStatus = status.to_string().parse().unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn only_active_queues_accept_entries() {
        let mut queue = Queue::new("q-1", 1000, "front-desk", "Acme Barbers", 5);
        assert!(queue.accepts_entries());

        queue.status = QueueStatus::Paused;
        assert!(!queue.accepts_entries());

        queue.status = QueueStatus::Closed;
        assert!(!queue.accepts_entries());
    }
}
