//! Flow abstraction over an allocated data-transfer channel.

use crate::error::FlowError;
use async_trait::async_trait;
use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;

/// An established, data-ready flow.
///
/// The transport that allocated the flow owns its byte layout; this trait
/// only moves whole SDUs off it.
#[async_trait]
pub trait Flow: Send {
    /// Read the next SDU into `buf`, returning its length in bytes.
    ///
    /// Awaits until an SDU is available. Fails when the peer closed the flow
    /// or the transport broke; after an error no further reads are useful.
    async fn read_sdu(&mut self, buf: &mut [u8]) -> Result<usize, FlowError>;

    /// Local port id of this flow, for diagnostics
    fn port_id(&self) -> u32;
}

/// Flow over a plain TCP stream, one `read` per SDU.
///
/// TCP gives no record boundaries, so an SDU here is whatever one read
/// returns; good enough for harness traffic and throughput measurement.
#[derive(Debug)]
pub struct TcpFlow {
    stream: TcpStream,
    port_id: u32,
}

impl TcpFlow {
    /// Wrap an established TCP stream as a flow
    pub fn new(stream: TcpStream, port_id: u32) -> Self {
        Self { stream, port_id }
    }
}

#[async_trait]
impl Flow for TcpFlow {
    async fn read_sdu(&mut self, buf: &mut [u8]) -> Result<usize, FlowError> {
        let bytes_read = self.stream.read(buf).await?;
        if bytes_read == 0 {
            return Err(FlowError::PeerClosed);
        }
        Ok(bytes_read)
    }

    fn port_id(&self) -> u32 {
        self.port_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncWriteExt;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_tcp_flow_reads_and_signals_peer_close() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            socket.write_all(b"hello").await.unwrap();
            // Dropping the socket closes the flow.
        });

        let stream = TcpStream::connect(addr).await.unwrap();
        let mut flow = TcpFlow::new(stream, 7);
        assert_eq!(flow.port_id(), 7);

        let mut buf = vec![0u8; 1500];
        let bytes_read = flow.read_sdu(&mut buf).await.unwrap();
        assert_eq!(&buf[..bytes_read], b"hello");

        let err = flow.read_sdu(&mut buf).await.unwrap_err();
        assert!(matches!(err, FlowError::PeerClosed));
    }
}
