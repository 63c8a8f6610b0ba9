//! TCP transport implementation

use std::net::SocketAddr;
use std::time::Duration;

use serde::Serialize;
use tokio::io::BufReader;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream, ToSocketAddrs};

use mural_core::{MuralError, MuralResult, PeerAddr};
use mural_wire::{read_frame, write_frame, Request, Response, MAX_FRAME_SIZE};

/// Listening socket for a node
pub struct TcpTransport {
    listener: TcpListener,
    local_addr: SocketAddr,
}

impl TcpTransport {
    /// Bind to a local address
    pub async fn bind(addr: impl ToSocketAddrs) -> MuralResult<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| MuralError::Transport(e.to_string()))?;
        Self::from_listener(listener)
    }

    /// Wrap an already bound listener
    pub fn from_listener(listener: TcpListener) -> MuralResult<Self> {
        let local_addr = listener
            .local_addr()
            .map_err(|e| MuralError::Transport(e.to_string()))?;

        Ok(TcpTransport {
            listener,
            local_addr,
        })
    }

    /// Get local address
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Accept the next inbound connection (blocking)
    pub async fn accept(&self) -> MuralResult<(TcpStream, SocketAddr)> {
        self.listener
            .accept()
            .await
            .map_err(|e| MuralError::Transport(e.to_string()))
    }
}

/// A persistent request/response connection to a node.
///
/// Requests are strictly sequential: one request, then exactly one response.
pub struct Connection {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
    timeout: Option<Duration>,
    max_frame_size: usize,
}

impl Connection {
    /// Connect to a configured peer
    pub async fn connect(peer: &PeerAddr, timeout: Option<Duration>) -> MuralResult<Self> {
        Self::connect_to((peer.host.as_str(), peer.port), timeout).await
    }

    /// Connect to any socket address
    pub async fn connect_to(addr: impl ToSocketAddrs, timeout: Option<Duration>) -> MuralResult<Self> {
        let stream = with_timeout(timeout, async {
            TcpStream::connect(addr)
                .await
                .map_err(|e| MuralError::Transport(e.to_string()))
        })
        .await?;
        Ok(Self::from_stream(stream, timeout))
    }

    fn from_stream(stream: TcpStream, timeout: Option<Duration>) -> Self {
        let (read_half, writer) = stream.into_split();
        Connection {
            reader: BufReader::new(read_half),
            writer,
            timeout,
            max_frame_size: MAX_FRAME_SIZE,
        }
    }

    /// Accept responses up to `max_frame_size` bytes instead of the default
    pub fn with_max_frame_size(mut self, max_frame_size: usize) -> Self {
        self.max_frame_size = max_frame_size;
        self
    }

    /// Send one message and wait for its response.
    ///
    /// Any serializable object may be sent, which lets callers speak actions
    /// this crate does not model.
    pub async fn request<T: Serialize>(&mut self, msg: &T) -> MuralResult<Response> {
        let timeout = self.timeout;
        with_timeout(timeout, async {
            write_frame(&mut self.writer, msg).await?;
            let frame = read_frame(&mut self.reader, self.max_frame_size)
                .await?
                .ok_or(MuralError::ConnectionClosed)?;
            serde_json::from_slice(&frame).map_err(|e| MuralError::MalformedFrame(e.to_string()))
        })
        .await
    }
}

/// One-shot exchange with a peer: connect, send `request`, read one
/// response, close.
///
/// `timeout` bounds the whole exchange, connect included. The response may
/// be up to `max_frame_size` bytes.
pub async fn exchange(
    peer: &PeerAddr,
    request: &Request,
    timeout: Duration,
    max_frame_size: usize,
) -> MuralResult<Response> {
    with_timeout(Some(timeout), async {
        let mut conn = Connection::connect(peer, None)
            .await?
            .with_max_frame_size(max_frame_size);
        conn.request(request).await
    })
    .await
}

async fn with_timeout<T, F>(timeout: Option<Duration>, fut: F) -> MuralResult<T>
where
    F: std::future::Future<Output = MuralResult<T>>,
{
    match timeout {
        Some(limit) => tokio::time::timeout(limit, fut)
            .await
            .map_err(|_| MuralError::Timeout)?,
        None => fut.await,
    }
}
