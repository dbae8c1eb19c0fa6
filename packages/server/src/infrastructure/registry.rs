//! In-memory connection registry.
//!
//! ## 責務
//!
//! - 接続中クライアントの `ClientRecord` を挿入順に保持する
//! - 全ての読み書きを単一の排他ロックの下で行う
//!
//! ## 設計ノート
//!
//! ロックは `Registry` の内部実装であり、外部には公開しない。
//! ブロードキャストだけはファンアウト全体を同じロックの下で行う必要があるため、
//! クレート内に限り `lock()` でガードを渡す。

use tokio::sync::{Mutex, MutexGuard};

use crate::domain::{ClientRecord, ClientSummary, ConnectionId};

/// Shared, lock-protected collection of [`ClientRecord`]s.
///
/// Records are kept in insertion order. Every operation holds the same
/// exclusive lock for its whole duration, so no caller ever observes a
/// partially applied insert or removal.
#[derive(Debug, Default)]
pub struct Registry {
    records: Mutex<Vec<ClientRecord>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record.
    ///
    /// The caller guarantees the connection is not already registered.
    pub async fn insert(&self, record: ClientRecord) {
        let mut records = self.records.lock().await;
        tracing::debug!(
            "Registering '{}' ({}), {} client(s) already connected",
            record.username,
            record.id,
            records.len()
        );
        records.push(record);
    }

    /// Remove the record registered for `id` and hand it back.
    ///
    /// Returns `None` when nothing matches, which makes repeated removals of the
    /// same connection harmless.
    pub async fn remove_by_connection(&self, id: &ConnectionId) -> Option<ClientRecord> {
        let mut records = self.records.lock().await;
        let position = records.iter().position(|record| &record.id == id)?;
        let removed = records.remove(position);
        tracing::debug!(
            "Unregistered '{}' ({}), {} client(s) remain",
            removed.username,
            removed.id,
            records.len()
        );
        Some(removed)
    }

    /// Run `f` once per registered record, in insertion order, under the lock.
    pub async fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(&ClientRecord),
    {
        let records = self.records.lock().await;
        for record in records.iter() {
            f(record);
        }
    }

    /// Detached copy of the registered clients, in insertion order
    pub async fn snapshot(&self) -> Vec<ClientSummary> {
        let mut summaries = Vec::new();
        self.for_each(|record| summaries.push(record.summary())).await;
        summaries
    }

    pub async fn contains(&self, id: &ConnectionId) -> bool {
        let records = self.records.lock().await;
        records.iter().any(|record| &record.id == id)
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }

    /// Exclusive access to the records for a whole fan-out.
    pub(crate) async fn lock(&self) -> MutexGuard<'_, Vec<ClientRecord>> {
        self.records.lock().await
    }
}
