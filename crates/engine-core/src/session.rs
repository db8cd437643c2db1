use std::{collections::BTreeSet, sync::Arc};
use tokio::sync::RwLock;
use tracing::info;

/// Tables cleared by a first batch since the last reset.
///
/// This is bookkeeping only: whether a batch clears its table is decided by
/// the batch's own `is_first_batch` flag, never by this set.
#[derive(Debug, Clone, Default)]
pub struct SyncSession {
    truncated: Arc<RwLock<BTreeSet<String>>>,
}

impl SyncSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn mark_truncated(&self, table: &str) {
        self.truncated.write().await.insert(table.to_string());
    }

    pub async fn was_truncated(&self, table: &str) -> bool {
        self.truncated.read().await.contains(table)
    }

    pub async fn truncated_tables(&self) -> Vec<String> {
        self.truncated.read().await.iter().cloned().collect()
    }

    /// Forgets every tracked table, returning how many there were.
    pub async fn reset(&self) -> usize {
        let mut truncated = self.truncated.write().await;
        let cleared = truncated.len();
        truncated.clear();
        info!(cleared, "Sync session reset - truncation tracking cleared");
        cleared
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mark_and_reset() {
        let session = SyncSession::new();
        session.mark_truncated("acc_product").await;
        session.mark_truncated("acc_product").await;
        session.mark_truncated("acc_users").await;

        assert!(session.was_truncated("acc_product").await);
        assert_eq!(
            session.truncated_tables().await,
            vec!["acc_product".to_string(), "acc_users".to_string()]
        );

        assert_eq!(session.reset().await, 2);
        assert!(session.truncated_tables().await.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_marks_from_clones() {
        let session = SyncSession::new();
        let handles: Vec<_> = ["acc_invmast", "acc_invdetails", "acc_product"]
            .into_iter()
            .map(|table| {
                let session = session.clone();
                tokio::spawn(async move { session.mark_truncated(table).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(session.truncated_tables().await.len(), 3);
    }
}
