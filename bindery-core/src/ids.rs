//! Identifier generation for package identifiers and temporary filenames

use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Source of fresh identifiers
pub trait IdGenerator: Send + Sync {
    /// Produce an identifier never returned before by this generator
    fn next_id(&self) -> Uuid;
}

/// Random v4 UUIDs
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn next_id(&self) -> Uuid {
        Uuid::new_v4()
    }
}

/// Counts upward from a starting value, for reproducible filenames
#[derive(Debug, Default)]
pub struct SequentialIds {
    next: AtomicU64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start counting at `start`
    pub fn starting_at(start: u64) -> Self {
        Self {
            next: AtomicU64::new(start),
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> Uuid {
        Uuid::from_u128(u128::from(self.next.fetch_add(1, Ordering::Relaxed)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_ids() {
        let ids = SequentialIds::starting_at(1);
        assert_eq!(
            ids.next_id().to_string(),
            "00000000-0000-0000-0000-000000000001"
        );
        assert_eq!(
            ids.next_id().to_string(),
            "00000000-0000-0000-0000-000000000002"
        );
    }

    #[test]
    fn test_random_ids_differ() {
        assert_ne!(RandomIds.next_id(), RandomIds.next_id());
    }
}
