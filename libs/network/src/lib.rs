//! Unix-domain-socket transports for the three channel kinds spec §4.2
//! requires: fan-in pull/push, fan-out pub/sub, and synchronous req/rep.
//!
//! Every channel frames messages identically: a 4-byte big-endian length
//! prefix followed by that many bytes of MessagePack-encoded envelope (see
//! [`codec`]). None of the socket types interpret the payload — they move
//! opaque byte slices, leaving encoding to callers.

pub mod error;

pub use error::TransportError;

use std::path::{Path, PathBuf};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::{broadcast, mpsc};

/// Frames above this size are rejected rather than allocated, guarding
/// against a corrupt or hostile length prefix.
const MAX_FRAME_SIZE: usize = 64 * 1024 * 1024;

/// Backlog depth for a `PullSocket`'s merged receiver and a `PubSocket`'s
/// fan-out broadcast channel.
const CHANNEL_CAPACITY: usize = 4096;

async fn write_frame<W: tokio::io::AsyncWrite + Unpin>(
    writer: &mut W,
    bytes: &[u8],
) -> error::Result<()> {
    if bytes.len() > MAX_FRAME_SIZE {
        return Err(TransportError::FrameTooLarge(bytes.len()));
    }
    writer.write_all(&(bytes.len() as u32).to_be_bytes()).await?;
    writer.write_all(bytes).await?;
    writer.flush().await?;
    Ok(())
}

async fn read_frame<R: tokio::io::AsyncRead + Unpin>(reader: &mut R) -> error::Result<Vec<u8>> {
    let mut len_bytes = [0u8; 4];
    match reader.read_exact(&mut len_bytes).await {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
            return Err(TransportError::PeerClosed)
        }
        Err(e) => return Err(e.into()),
    }
    let len = u32::from_be_bytes(len_bytes) as usize;
    if len > MAX_FRAME_SIZE {
        return Err(TransportError::FrameTooLarge(len));
    }
    let mut buf = vec![0u8; len];
    reader.read_exact(&mut buf).await?;
    Ok(buf)
}

/// Removes a stale socket file (if one exists from a previous run) and
/// creates the parent directory so `bind` never fails on a fresh
/// `transport.socket_dir`.
fn prepare_socket_path(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    if path.exists() {
        std::fs::remove_file(path)?;
    }
    Ok(())
}

/// Fan-in endpoint: binds a listener and merges every connected producer's
/// framed byte-messages into a single stream, in the order frames finish
/// arriving (not connection order).
pub struct PullSocket {
    path: PathBuf,
    receiver: mpsc::Receiver<Vec<u8>>,
}

impl PullSocket {
    pub async fn bind(path: impl Into<PathBuf>) -> error::Result<Self> {
        let path = path.into();
        prepare_socket_path(&path)?;
        let listener = UnixListener::bind(&path)?;
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);

        let accept_path = path.clone();
        tokio::spawn(async move {
            loop {
                let (stream, _) = match listener.accept().await {
                    Ok(pair) => pair,
                    Err(e) => {
                        tracing::warn!(path = %accept_path.display(), error = %e, "pull socket accept failed");
                        continue;
                    }
                };
                let tx = tx.clone();
                tokio::spawn(async move {
                    let mut stream = stream;
                    loop {
                        match read_frame(&mut stream).await {
                            Ok(bytes) => {
                                if tx.send(bytes).await.is_err() {
                                    break;
                                }
                            }
                            Err(TransportError::PeerClosed) => break,
                            Err(e) => {
                                tracing::warn!(error = %e, "pull socket connection read failed");
                                break;
                            }
                        }
                    }
                });
            }
        });

        Ok(Self { path, receiver: rx })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the next message, or `None` once every producer task has
    /// ended and the sender side has been dropped.
    pub async fn recv(&mut self) -> Option<Vec<u8>> {
        self.receiver.recv().await
    }
}

/// Fan-in producer side: connects to a [`PullSocket`]'s path and sends
/// framed messages.
pub struct PushSocket {
    stream: UnixStream,
}

impl PushSocket {
    pub async fn connect(path: impl AsRef<Path>) -> error::Result<Self> {
        let stream = UnixStream::connect(path.as_ref()).await?;
        Ok(Self { stream })
    }

    pub async fn send(&mut self, bytes: &[u8]) -> error::Result<()> {
        write_frame(&mut self.stream, bytes).await
    }
}

/// Fan-out endpoint: binds a listener and broadcasts every published
/// message to all currently-connected subscribers. A subscriber that
/// connects after a message was published never sees it.
pub struct PubSocket {
    path: PathBuf,
    sender: broadcast::Sender<Vec<u8>>,
}

impl PubSocket {
    pub async fn bind(path: impl Into<PathBuf>) -> error::Result<Self> {
        let path = path.into();
        prepare_socket_path(&path)?;
        let listener = UnixListener::bind(&path)?;
        let (tx, _rx) = broadcast::channel(CHANNEL_CAPACITY);

        let accept_path = path.clone();
        let accept_tx = tx.clone();
        tokio::spawn(async move {
            loop {
                let (stream, _) = match listener.accept().await {
                    Ok(pair) => pair,
                    Err(e) => {
                        tracing::warn!(path = %accept_path.display(), error = %e, "pub socket accept failed");
                        continue;
                    }
                };
                let mut subscriber_rx = accept_tx.subscribe();
                tokio::spawn(async move {
                    let mut stream = stream;
                    loop {
                        match subscriber_rx.recv().await {
                            Ok(bytes) => {
                                if write_frame(&mut stream, &bytes).await.is_err() {
                                    break;
                                }
                            }
                            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                                tracing::warn!(skipped, "subscriber lagged, dropping messages");
                            }
                            Err(broadcast::error::RecvError::Closed) => break,
                        }
                    }
                });
            }
        });

        Ok(Self { path, sender: tx })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Publishes to every currently-connected subscriber. Publishing with
    /// no subscribers connected is not an error — the message is simply
    /// dropped, matching a fire-and-forget fan-out.
    pub fn publish(&self, bytes: Vec<u8>) -> error::Result<()> {
        let _ = self.sender.send(bytes);
        Ok(())
    }
}

/// Fan-out subscriber side: connects to a [`PubSocket`]'s path and
/// receives framed messages published from the moment of connection
/// onward.
pub struct SubSocket {
    stream: UnixStream,
}

impl SubSocket {
    pub async fn connect(path: impl AsRef<Path>) -> error::Result<Self> {
        let stream = UnixStream::connect(path.as_ref()).await?;
        Ok(Self { stream })
    }

    pub async fn recv(&mut self) -> error::Result<Vec<u8>> {
        read_frame(&mut self.stream).await
    }
}

/// Synchronous request side: connects to a [`RepSocket`]'s path and
/// performs one request/reply round trip per call.
pub struct ReqSocket {
    stream: UnixStream,
}

impl ReqSocket {
    pub async fn connect(path: impl AsRef<Path>) -> error::Result<Self> {
        let stream = UnixStream::connect(path.as_ref()).await?;
        Ok(Self { stream })
    }

    /// Sends `bytes` and waits for exactly one reply frame. A peer that
    /// closes the connection before replying surfaces as
    /// [`TransportError::PeerClosed`] — the Sequencer treats this as an
    /// implicit disconnect (spec §5.5).
    pub async fn request(&mut self, bytes: &[u8]) -> error::Result<Vec<u8>> {
        write_frame(&mut self.stream, bytes).await?;
        read_frame(&mut self.stream).await
    }
}

/// Synchronous reply side: binds at a path and accepts exactly one peer
/// connection for the lifetime of the socket, matching the
/// one-strategy-per-connection topology spec §4.2 describes.
///
/// `bind` only creates the listener — it does not wait for a peer. The
/// connection is accepted lazily on the first `recv_request`/`send_reply`,
/// so a caller that needs to announce its own readiness (e.g. send CONNECT)
/// before the other side dials in can do so without deadlocking against an
/// `accept()` that only resolves once that announcement arrives.
pub struct RepSocket {
    listener: UnixListener,
    stream: Option<UnixStream>,
}

impl RepSocket {
    pub async fn bind(path: impl AsRef<Path>) -> error::Result<Self> {
        let path = path.as_ref();
        prepare_socket_path(path)?;
        let listener = UnixListener::bind(path)?;
        Ok(Self {
            listener,
            stream: None,
        })
    }

    async fn stream(&mut self) -> error::Result<&mut UnixStream> {
        if self.stream.is_none() {
            let (stream, _) = self.listener.accept().await?;
            self.stream = Some(stream);
        }
        Ok(self.stream.as_mut().expect("just populated"))
    }

    pub async fn recv_request(&mut self) -> error::Result<Vec<u8>> {
        let stream = self.stream().await?;
        read_frame(stream).await
    }

    pub async fn send_reply(&mut self, bytes: &[u8]) -> error::Result<()> {
        let stream = self.stream().await?;
        write_frame(stream, bytes).await
    }
}
