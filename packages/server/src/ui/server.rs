//! Connection acceptor.

use std::{future::Future, net::SocketAddr, sync::Arc};

use tokio::{
    io::BufReader,
    net::{TcpListener, TcpStream},
};

use crate::{
    config::ServerConfig, domain::ConnectionId, error::ServerError,
    infrastructure::StreamSink,
};

use super::{session::handle_connection, state::AppState};

/// TCP chat server
///
/// Binding and serving are separate steps so a bind failure can be reported
/// before the accept loop starts.
///
/// # Example
///
/// ```ignore
/// let state = Arc::new(AppState::new(Arc::new(SystemClock)));
/// let server = Server::bind(&ServerConfig::default(), state).await?;
/// server.run_until(shutdown_signal()).await?;
/// ```
pub struct Server {
    listener: TcpListener,
    state: Arc<AppState>,
}

impl Server {
    /// Bind the listening socket
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Bind`] if the address cannot be bound.
    pub async fn bind(config: &ServerConfig, state: Arc<AppState>) -> Result<Self, ServerError> {
        let addr = config.bind_addr();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;
        Ok(Self { listener, state })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        self.listener.local_addr().map_err(ServerError::LocalAddr)
    }

    /// Accept connections until `shutdown` resolves.
    ///
    /// Each accepted connection gets its own task; the acceptor keeps no handle
    /// to it. Accept errors are logged and the loop continues.
    pub async fn run_until<F>(self, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()>,
    {
        tracing::info!("Chat server listening on {}", self.local_addr()?);

        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, peer)) => self.spawn_session(stream, peer),
                    Err(e) => tracing::error!("{}", ServerError::Accept(e)),
                },
            }
        }

        tracing::info!("Server shutdown complete");

        Ok(())
    }

    fn spawn_session(&self, stream: TcpStream, peer: SocketAddr) {
        let connection_id = ConnectionId::generate();
        tracing::debug!("Accepted connection {} from {}", connection_id, peer);

        let (read_half, write_half) = stream.into_split();
        tokio::spawn(handle_connection(
            self.state.clone(),
            connection_id,
            peer,
            BufReader::new(read_half),
            StreamSink::new(write_half),
        ));
    }
}
