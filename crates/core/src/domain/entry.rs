// Queue Entry Domain Model - the ledger state machine

use crate::domain::error::{DomainError, Result};
use crate::domain::queue::QueueId;
use serde::{Deserialize, Serialize};

/// Entry ID (UUID v4)
pub type EntryId = String;

/// Position within a queue: positive, unique per queue, assigned once at
/// join time and never reassigned
pub type Position = i64;

/// Entry lifecycle status
///
/// Allowed transitions: WAITING -> CALLED -> SERVED, WAITING -> SERVED
/// (walk-up service), and WAITING/CALLED -> CANCELLED. SERVED and
/// CANCELLED are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryStatus {
    Waiting,
    Called,
    Served,
    Cancelled,
}

impl EntryStatus {
    /// Part of the customer-facing "current line"
    pub fn is_active(&self) -> bool {
        matches!(self, EntryStatus::Waiting | EntryStatus::Called)
    }

    /// Terminal entries are immutable
    pub fn is_terminal(&self) -> bool {
        matches!(self, EntryStatus::Served | EntryStatus::Cancelled)
    }
}

impl std::fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryStatus::Waiting => write!(f, "WAITING"),
            EntryStatus::Called => write!(f, "CALLED"),
            EntryStatus::Served => write!(f, "SERVED"),
            EntryStatus::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

impl std::str::FromStr for EntryStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "WAITING" => Ok(EntryStatus::Waiting),
            "CALLED" => Ok(EntryStatus::Called),
            "SERVED" => Ok(EntryStatus::Served),
            "CANCELLED" => Ok(EntryStatus::Cancelled),
            other => Err(format!("Unknown entry status: {}", other)),
        }
    }
}

/// Queue Entry Entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    pub queue_id: QueueId,
    pub customer_name: String,
    pub phone_number: String,
    pub party_size: i64,
    pub position: Position,
    pub status: EntryStatus,
    pub joined_at: i64, // epoch ms
    pub called_at: Option<i64>,
    pub served_at: Option<i64>,
}

impl Entry {
    pub fn new(
        id: impl Into<String>,
        queue_id: impl Into<String>,
        customer_name: impl Into<String>,
        phone_number: impl Into<String>,
        party_size: i64,
        position: Position,
        joined_at: i64,
    ) -> Self {
        Self {
            id: id.into(),
            queue_id: queue_id.into(),
            customer_name: customer_name.into(),
            phone_number: phone_number.into(),
            party_size,
            position,
            status: EntryStatus::Waiting,
            joined_at,
            called_at: None,
            served_at: None,
        }
    }

    /// Transition to CALLED with explicit timestamp
    pub fn call(&mut self, now_millis: i64) -> Result<()> {
        if self.status != EntryStatus::Waiting {
            return Err(DomainError::InvalidTransition {
                from: self.status.to_string(),
                to: "CALLED".to_string(),
            });
        }
        self.status = EntryStatus::Called;
        self.called_at = Some(now_millis);
        Ok(())
    }

    /// Transition to SERVED with explicit timestamp
    ///
    /// Serving directly from WAITING is permitted (walk-up service).
    pub fn serve(&mut self, now_millis: i64) -> Result<()> {
        if self.status.is_terminal() {
            return Err(DomainError::InvalidTransition {
                from: self.status.to_string(),
                to: "SERVED".to_string(),
            });
        }
        self.status = EntryStatus::Served;
        self.served_at = Some(now_millis);
        Ok(())
    }

    /// Transition to CANCELLED
    ///
    /// No timestamp field; positions of later entries are never renumbered.
    pub fn cancel(&mut self) -> Result<()> {
        if self.status.is_terminal() {
            return Err(DomainError::InvalidTransition {
                from: self.status.to_string(),
                to: "CANCELLED".to_string(),
            });
        }
        self.status = EntryStatus::Cancelled;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn waiting_entry() -> Entry {
        Entry::new("e-1", "q-1", "Dana", "+12025550123", 2, 1, 1000)
    }

    #[test]
    fn call_then_serve_sets_timestamps_once() {
        let mut entry = waiting_entry();

        entry.call(2000).unwrap();
        assert_eq!(entry.status, EntryStatus::Called);
        assert_eq!(entry.called_at, Some(2000));

        entry.serve(3000).unwrap();
        assert_eq!(entry.status, EntryStatus::Served);
        assert_eq!(entry.served_at, Some(3000));
    }

    #[test]
    fn serve_is_allowed_directly_from_waiting() {
        let mut entry = waiting_entry();
        entry.serve(2000).unwrap();
        assert_eq!(entry.status, EntryStatus::Served);
        assert_eq!(entry.called_at, None);
    }

    #[test]
    fn call_rejects_non_waiting_entry() {
        let mut entry = waiting_entry();
        entry.call(2000).unwrap();
        assert!(entry.call(3000).is_err());
    }

    #[test]
    fn terminal_entries_are_immutable() {
        let mut served = waiting_entry();
        served.serve(2000).unwrap();
        assert!(served.call(3000).is_err());
        assert!(served.serve(3000).is_err());
        assert!(served.cancel().is_err());

        let mut cancelled = waiting_entry();
        cancelled.cancel().unwrap();
        assert!(cancelled.call(3000).is_err());
        assert!(cancelled.serve(3000).is_err());
        assert!(cancelled.cancel().is_err());
    }

    #[test]
    fn cancel_is_allowed_from_called() {
        let mut entry = waiting_entry();
        entry.call(2000).unwrap();
        entry.cancel().unwrap();
        assert_eq!(entry.status, EntryStatus::Cancelled);
    }
}
