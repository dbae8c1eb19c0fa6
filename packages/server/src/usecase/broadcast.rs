//! UseCase: ブロードキャスト（送信者以外の全クライアントへの配信）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - Broadcaster::broadcast() メソッド
//! - 送信者の除外と、一部のピアへの書き込み失敗時の挙動
//!
//! ### なぜこのテストが必要か
//! - N クライアント中、送信者を除く N-1 クライアントにだけ届くことを保証
//! - 壊れたピアが 1 つあっても残りのピアへの配信が止まらないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：複数クライアントへの配信
//! - 異常系：書き込みに失敗するピアを含む配信
//! - エッジケース：空の Registry、登録されていない送信者

use std::sync::Arc;

use crate::{domain::ConnectionId, infrastructure::Registry};

/// Outcome of one broadcast call
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Peers the message was written to
    pub delivered: usize,
    /// Peers whose write failed and were skipped
    pub failed: usize,
}

/// Fans a message out to every registered connection except one.
pub struct Broadcaster {
    registry: Arc<Registry>,
}

impl Broadcaster {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    /// Write `message` to every registered client other than `exclude`.
    ///
    /// The registry lock is held until the last write completes, so the
    /// fan-out is atomic with respect to every other registry operation.
    /// A failed write is logged and skipped; the peer's own session
    /// notices the broken connection on its next read.
    ///
    /// # Arguments
    ///
    /// * `message` - Newline-terminated text to deliver
    /// * `exclude` - Connection that must not receive the message (the sender)
    pub async fn broadcast(&self, message: &str, exclude: &ConnectionId) -> BroadcastReport {
        let mut records = self.registry.lock().await;
        let mut report = BroadcastReport::default();

        for record in records.iter_mut().filter(|record| &record.id != exclude) {
            let result = record.sink_mut().send_line(message).await;
            match result {
                Ok(()) => {
                    report.delivered += 1;
                    tracing::debug!("Delivered message to '{}' ({})", record.username, record.id);
                }
                Err(e) => {
                    report.failed += 1;
                    tracing::warn!(
                        "Failed to deliver message to '{}' ({}): {}",
                        record.username,
                        record.id,
                        e
                    );
                }
            }
        }

        report
    }
}
