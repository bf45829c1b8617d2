//! In-memory snapshot store
//!
//! Backs the local store port with a plain vector. Used by tests and by
//! embeddings that keep their cache elsewhere.

use tokio::sync::RwLock;

use staysync_core::domain::booking::Booking;
use staysync_core::ports::local_store::ILocalStore;

/// `ILocalStore` backed by process memory
#[derive(Default)]
pub struct MemoryStore {
    bookings: RwLock<Vec<Booking>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-seeded with a snapshot
    pub fn with_bookings(bookings: Vec<Booking>) -> Self {
        Self {
            bookings: RwLock::new(bookings),
        }
    }

    /// Copies out the current snapshot, for assertions
    pub async fn snapshot(&self) -> Vec<Booking> {
        self.bookings.read().await.clone()
    }
}

#[async_trait::async_trait]
impl ILocalStore for MemoryStore {
    async fn read(&self) -> anyhow::Result<Vec<Booking>> {
        Ok(self.bookings.read().await.clone())
    }

    async fn write(&self, bookings: &[Booking]) -> anyhow::Result<()> {
        *self.bookings.write().await = bookings.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use staysync_core::domain::booking::BookingStatus;
    use staysync_core::domain::newtypes::BookingId;

    fn booking(id: &str) -> Booking {
        Booking::new(BookingId::new(id).unwrap(), BookingStatus::Pending, 100.0)
    }

    #[tokio::test]
    async fn test_read_write_roundtrip() {
        let store = MemoryStore::new();
        assert!(store.read().await.unwrap().is_empty());

        store.write(&[booking("B1"), booking("B2")]).await.unwrap();
        let snapshot = store.read().await.unwrap();
        assert_eq!(snapshot.len(), 2);
    }

    #[tokio::test]
    async fn test_write_replaces_snapshot() {
        let store = MemoryStore::with_bookings(vec![booking("B1")]);
        store.write(&[booking("B2")]).await.unwrap();

        let snapshot = store.snapshot().await;
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].id().as_str(), "B2");
    }
}
