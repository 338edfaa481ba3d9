//! Per-table write locks
//!
//! Every order write for a table runs under that table's lock, so the
//! order document and the table's occupancy are updated together.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Debug, Default)]
pub struct TableLocks {
    locks: DashMap<i32, Arc<Mutex<()>>>,
}

impl TableLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `table_number`
    pub async fn lock(&self, table_number: i32) -> OwnedMutexGuard<()> {
        // clone the Arc so the map shard is not held across the await
        let mutex = self
            .locks
            .entry(table_number)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        mutex.lock_owned().await
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_table_is_serialized() {
        let locks = Arc::new(TableLocks::new());
        let guard = locks.lock(1).await;

        let waiting = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _g = locks.lock(1).await;
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiting.is_finished());

        drop(guard);
        tokio::time::timeout(Duration::from_secs(1), waiting)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn test_other_tables_do_not_block() {
        let locks = TableLocks::new();
        let _one = locks.lock(1).await;
        let two = tokio::time::timeout(Duration::from_millis(100), locks.lock(2)).await;
        assert!(two.is_ok());
        assert_eq!(locks.len(), 2);
    }
}
