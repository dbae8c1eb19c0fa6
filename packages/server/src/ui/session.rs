//! Per-connection session handler.
//!
//! A session moves through three phases:
//!
//! 1. awaiting username: the first line names the client; a read failure here
//!    closes the connection without touching the registry
//! 2. active: the client is registered, its join is announced and every line it
//!    sends is relayed to the others
//! 3. terminated: after the first read failure the client is unregistered, its
//!    leave is announced and the connection is closed

use std::{io, net::SocketAddr, sync::Arc};

use relaychat_shared::time::{format_elapsed, timestamp_to_rfc3339};
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::domain::{
    ClientRecord, ConnectionId, MessageSink, join_announcement, leave_announcement,
    parse_username, relay_line,
};

use super::state::AppState;

/// Why reading the next line from a client stopped
#[derive(Debug, Error)]
pub enum ReadFailure {
    #[error("connection closed by peer")]
    Closed,

    /// The stream ended in the middle of a line
    #[error("stream ended without a trailing newline ({0} bytes discarded)")]
    Truncated(usize),

    #[error("read error: {0}")]
    Io(#[from] io::Error),
}

/// Read one `\n`-terminated line, terminator included.
///
/// A final fragment without a terminator counts as a failure, not a message.
/// Invalid UTF-8 surfaces as [`ReadFailure::Io`], so such a line ends the
/// session instead of being relayed as raw bytes.
pub async fn read_message<R>(reader: &mut R) -> Result<String, ReadFailure>
where
    R: AsyncBufRead + Unpin,
{
    let mut line = String::new();
    let read = reader.read_line(&mut line).await?;
    if read == 0 {
        return Err(ReadFailure::Closed);
    }
    if !line.ends_with('\n') {
        return Err(ReadFailure::Truncated(read));
    }
    Ok(line)
}

/// Drive one client connection from its username line until disconnect.
///
/// # Arguments
///
/// * `state` - Shared registry and broadcaster
/// * `connection_id` - Identity of this connection, unique per session
/// * `peer` - Remote address, for logging
/// * `reader` - Read side of the connection
/// * `sink` - Write side of the connection; owned by the registry while active
pub async fn handle_connection<R, S>(
    state: Arc<AppState>,
    connection_id: ConnectionId,
    peer: SocketAddr,
    mut reader: R,
    mut sink: S,
) where
    R: AsyncBufRead + Unpin + Send,
    S: MessageSink + 'static,
{
    let username = match read_message(&mut reader).await {
        Ok(line) => parse_username(&line),
        Err(e) => {
            tracing::info!(
                "Connection {} from {} ended before a username was sent: {}",
                connection_id,
                peer,
                e
            );
            if let Err(e) = sink.close().await {
                tracing::debug!("Failed to close connection {}: {}", connection_id, e);
            }
            return;
        }
    };

    let joined_at = state.clock.now_millis();
    state
        .registry
        .insert(ClientRecord::new(
            connection_id,
            username.clone(),
            joined_at,
            Box::new(sink),
        ))
        .await;
    tracing::info!(
        "'{}' connected from {} ({}) at {}",
        username,
        peer,
        connection_id,
        timestamp_to_rfc3339(joined_at)
    );

    let report = state
        .broadcaster
        .broadcast(&join_announcement(&username), &connection_id)
        .await;
    tracing::debug!(
        "Announced join of '{}' to {} client(s)",
        username,
        report.delivered
    );

    let failure = loop {
        match read_message(&mut reader).await {
            Ok(line) => {
                tracing::debug!("Received {} bytes from '{}'", line.len(), username);
                state
                    .broadcaster
                    .broadcast(&relay_line(&username, &line), &connection_id)
                    .await;
            }
            Err(failure) => break failure,
        }
    };

    let removed = state.registry.remove_by_connection(&connection_id).await;
    state
        .broadcaster
        .broadcast(&leave_announcement(&username), &connection_id)
        .await;

    if let Some(mut record) = removed {
        if let Err(e) = record.sink_mut().close().await {
            tracing::debug!("Failed to close connection {}: {}", connection_id, e);
        }
    }

    tracing::info!(
        "'{}' ({}) disconnected after {}: {}",
        username,
        peer,
        format_elapsed(joined_at, state.clock.now_millis()),
        failure
    );
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use relaychat_shared::time::FixedClock;
    use tokio::{
        io::{AsyncWriteExt, BufReader, DuplexStream, ReadHalf, WriteHalf},
        task::JoinHandle,
        time::timeout,
    };

    use super::*;
    use crate::infrastructure::StreamSink;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - handle_connection のライフサイクル（ユーザー名待ち → 参加中 → 終了）
    // - read_message の行区切り判定
    //
    // 【なぜこのテストが必要か】
    // - 参加・退出の通知と Registry の更新が正しい順序で行われることを保証
    // - ユーザー名を送る前に切断したクライアントが通知されないことを保証
    //
    // 【どのようなシナリオをテストするか】
    // 1. 参加通知、メッセージ中継、退出通知
    // 2. ユーザー名を送る前の切断
    // 3. 空のユーザー名
    // 4. 改行なしで終わるストリーム
    // ========================================

    const READ_TIMEOUT: Duration = Duration::from_secs(2);

    /// Test-side end of an in-memory connection
    struct TestClient {
        reader: BufReader<ReadHalf<DuplexStream>>,
        writer: WriteHalf<DuplexStream>,
        id: ConnectionId,
        session: JoinHandle<()>,
    }

    impl TestClient {
        async fn send(&mut self, text: &str) {
            self.writer.write_all(text.as_bytes()).await.unwrap();
        }

        async fn next_line(&mut self) -> String {
            timeout(READ_TIMEOUT, read_message(&mut self.reader))
                .await
                .expect("timed out waiting for a line")
                .expect("connection failed")
        }

        async fn disconnect(mut self) {
            self.writer.shutdown().await.unwrap();
            timeout(READ_TIMEOUT, self.session)
                .await
                .expect("session did not finish")
                .unwrap();
        }
    }

    fn create_test_state() -> Arc<AppState> {
        Arc::new(AppState::new(Arc::new(FixedClock::new(1_000))))
    }

    fn connect(state: &Arc<AppState>) -> TestClient {
        let (client, server) = tokio::io::duplex(1024);
        let (server_read, server_write) = tokio::io::split(server);
        let (client_read, client_write) = tokio::io::split(client);
        let id = ConnectionId::generate();
        let peer: SocketAddr = "127.0.0.1:40000".parse().unwrap();
        let session = tokio::spawn(handle_connection(
            state.clone(),
            id,
            peer,
            BufReader::new(server_read),
            StreamSink::new(server_write),
        ));
        TestClient {
            reader: BufReader::new(client_read),
            writer: client_write,
            id,
            session,
        }
    }

    async fn wait_for_clients(state: &Arc<AppState>, count: usize) {
        timeout(READ_TIMEOUT, async {
            while state.registry.len().await != count {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("registry never reached the expected size");
    }

    async fn join(state: &Arc<AppState>, username: &str) -> TestClient {
        let expected = state.registry.len().await + 1;
        let mut client = connect(state);
        client.send(&format!("{}\n", username)).await;
        wait_for_clients(state, expected).await;
        client
    }

    #[tokio::test]
    async fn test_read_message_keeps_terminator() {
        // テスト項目: 改行で終わる行は改行を含めて返される
        // given (前提条件):
        let mut reader = BufReader::new(&b"hello\nworld\n"[..]);

        // when (操作):
        let first = read_message(&mut reader).await.unwrap();
        let second = read_message(&mut reader).await.unwrap();

        // then (期待する結果):
        assert_eq!(first, "hello\n");
        assert_eq!(second, "world\n");
        assert!(matches!(
            read_message(&mut reader).await,
            Err(ReadFailure::Closed)
        ));
    }

    #[tokio::test]
    async fn test_read_message_rejects_unterminated_fragment() {
        // テスト項目: 改行なしでストリームが終わった場合は失敗として扱われる
        // given (前提条件):
        let mut reader = BufReader::new(&b"partial"[..]);

        // when (操作):
        let result = read_message(&mut reader).await;

        // then (期待する結果):
        assert!(matches!(result, Err(ReadFailure::Truncated(7))));
    }

    #[tokio::test]
    async fn test_read_message_rejects_invalid_utf8() {
        // テスト項目: 不正な UTF-8 は I/O エラーとして扱われる
        // given (前提条件):
        let mut reader = BufReader::new(&b"\xff\xfe\n"[..]);

        // when (操作):
        let result = read_message(&mut reader).await;

        // then (期待する結果):
        assert!(matches!(result, Err(ReadFailure::Io(_))));
    }

    #[tokio::test]
    async fn test_join_chat_and_leave() {
        // テスト項目: 参加通知・メッセージ中継・退出通知が他のクライアントにだけ届く
        // given (前提条件):
        let state = create_test_state();
        let mut alice = join(&state, "alice").await;
        let mut bob = join(&state, "bob").await;

        // when (操作) / then (期待する結果): bob の参加は alice に通知される
        assert_eq!(alice.next_line().await, "bob has joined.\n");

        // alice の発言は bob にだけ届く
        alice.send("hello\n").await;
        assert_eq!(bob.next_line().await, "[alice]: hello\n");

        // bob の発言は alice に届く（alice 自身の発言は返ってこない）
        bob.send("hi alice\n").await;
        assert_eq!(alice.next_line().await, "[bob]: hi alice\n");

        // alice が切断すると bob に退出が通知され、Registry には bob だけが残る
        let alice_id = alice.id;
        alice.disconnect().await;
        assert_eq!(bob.next_line().await, "alice has left.\n");
        assert!(!state.registry.contains(&alice_id).await);
        let usernames: Vec<String> = state
            .registry
            .snapshot()
            .await
            .into_iter()
            .map(|summary| summary.username)
            .collect();
        assert_eq!(usernames, vec!["bob"]);

        bob.disconnect().await;
        assert!(state.registry.is_empty().await);
    }

    #[tokio::test]
    async fn test_disconnect_before_username_is_not_announced() {
        // テスト項目: ユーザー名を送る前に切断したクライアントは登録も通知もされない
        // given (前提条件):
        let state = create_test_state();
        let mut alice = join(&state, "alice").await;

        // when (操作):
        let silent = connect(&state);
        silent.disconnect().await;
        let _bob = join(&state, "bob").await;

        // then (期待する結果): alice が最初に受け取るのは bob の参加通知
        assert_eq!(alice.next_line().await, "bob has joined.\n");
        assert_eq!(state.registry.len().await, 2);
    }

    #[tokio::test]
    async fn test_empty_username_is_accepted() {
        // テスト項目: 空のユーザー名もそのまま登録され、通知される
        // given (前提条件):
        let state = create_test_state();
        let mut alice = join(&state, "alice").await;

        // when (操作):
        let nameless = join(&state, "   ").await;

        // then (期待する結果):
        assert_eq!(alice.next_line().await, " has joined.\n");
        let snapshot = state.registry.snapshot().await;
        assert_eq!(snapshot[1].id, nameless.id);
        assert_eq!(snapshot[1].username, "");
        assert_eq!(snapshot[1].joined_at, 1_000);
    }

    #[tokio::test]
    async fn test_unterminated_final_line_is_not_relayed() {
        // テスト項目: 改行なしで終わった最後の断片は中継されず、退出として扱われる
        // given (前提条件):
        let state = create_test_state();
        let mut alice = join(&state, "alice").await;
        let mut bob = join(&state, "bob").await;
        assert_eq!(alice.next_line().await, "bob has joined.\n");

        // when (操作):
        bob.send("partial").await;
        bob.disconnect().await;

        // then (期待する結果):
        assert_eq!(alice.next_line().await, "bob has left.\n");
        assert_eq!(state.registry.len().await, 1);
    }

    #[tokio::test]
    async fn test_invalid_utf8_line_ends_session() {
        // テスト項目: 不正な UTF-8 の行は中継されず、送信者の退出として扱われる
        // given (前提条件):
        let state = create_test_state();
        let mut alice = join(&state, "alice").await;
        let mut bob = join(&state, "bob").await;
        assert_eq!(alice.next_line().await, "bob has joined.\n");

        // when (操作):
        bob.writer.write_all(b"\xff\xfe\n").await.unwrap();

        // then (期待する結果): 書き込み側を閉じなくてもセッションは終了する
        timeout(READ_TIMEOUT, &mut bob.session)
            .await
            .expect("session did not finish")
            .unwrap();
        assert_eq!(alice.next_line().await, "bob has left.\n");
        assert!(!state.registry.contains(&bob.id).await);
        assert_eq!(state.registry.len().await, 1);
    }

    #[tokio::test]
    async fn test_session_closes_connection_on_leave() {
        // テスト項目: 終了したセッションは接続の書き込み側を閉じる
        // given (前提条件):
        let state = create_test_state();
        let alice = join(&state, "alice").await;
        let TestClient {
            mut reader,
            mut writer,
            session,
            ..
        } = alice;

        // when (操作):
        writer.shutdown().await.unwrap();
        timeout(READ_TIMEOUT, session).await.unwrap().unwrap();

        // then (期待する結果): クライアント側の読み込みは EOF になる
        assert!(matches!(
            read_message(&mut reader).await,
            Err(ReadFailure::Closed)
        ));
    }
}
