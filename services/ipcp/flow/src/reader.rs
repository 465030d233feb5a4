//! Per-flow data worker.
//!
//! One `FlowReader` per active flow: started when the flow is allocated,
//! stopped when it is deallocated or torn down. Stop is cooperative: the
//! flag is observed before each read, never by cancelling a read already in
//! flight, so shutdown latency is bounded by the current read. Callers that
//! need a hard bound must also close the underlying flow.

use crate::flow::Flow;
use crate::listener::SduListener;
use bytes::Bytes;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, info, warn};

/// Configuration for a flow reader
#[derive(Clone, Debug)]
pub struct FlowReaderConfig {
    /// Delay before the first read, giving the peer time to finish flow
    /// setup and registration. Best effort only.
    pub warmup: Duration,
    /// Maximum SDU size accepted from the flow, in bytes
    pub max_sdu_size: usize,
}

impl Default for FlowReaderConfig {
    fn default() -> Self {
        Self {
            warmup: Duration::from_secs(1),
            max_sdu_size: 1500,
        }
    }
}

/// Background worker draining one flow into an [`SduListener`].
pub struct FlowReader {
    flow: Box<dyn Flow>,
    listener: Arc<dyn SduListener>,
    config: FlowReaderConfig,
    stop: Arc<AtomicBool>,
}

impl FlowReader {
    /// Create a reader bound to one flow and one listener
    pub fn new(
        flow: Box<dyn Flow>,
        listener: Arc<dyn SduListener>,
        config: FlowReaderConfig,
    ) -> Self {
        Self {
            flow,
            listener,
            config,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Spawn the worker task and return its control handle
    pub fn start(self) -> FlowReaderHandle {
        let stop = self.stop.clone();
        let port_id = self.flow.port_id();
        let task = tokio::spawn(self.run());
        FlowReaderHandle {
            stop,
            port_id,
            task,
        }
    }

    async fn run(mut self) {
        let port_id = self.flow.port_id();
        info!(
            "starting reader of flow {}, warming up for {:?}",
            port_id, self.config.warmup
        );
        tokio::time::sleep(self.config.warmup).await;
        debug!("reader of flow {} warmed up", port_id);

        let mut buffer = vec![0u8; self.config.max_sdu_size];
        while !self.stop.load(Ordering::Acquire) {
            let bytes_read = match self.flow.read_sdu(&mut buffer).await {
                Ok(bytes_read) => bytes_read,
                Err(e) => {
                    // Nothing is delivered for a failed read and no retry is
                    // attempted; flow re-establishment is a higher-level
                    // policy.
                    warn!("read failed on flow {}: {}", port_id, e);
                    break;
                }
            };

            // Hand over exactly the bytes read, trimming unused capacity,
            // before issuing the next read.
            let sdu = Bytes::copy_from_slice(&buffer[..bytes_read]);
            self.listener.sdu_delivered(sdu);
        }

        self.stop.store(true, Ordering::Release);
        info!("reader of flow {} stopped", port_id);
    }
}

/// Control surface for a started flow reader, usable from the owning
/// control-plane task.
pub struct FlowReaderHandle {
    stop: Arc<AtomicBool>,
    port_id: u32,
    task: JoinHandle<()>,
}

impl FlowReaderHandle {
    /// Request cooperative termination.
    ///
    /// The run loop observes the request before its next read; a read
    /// already in flight completes (or fails) first.
    pub fn stop(&self) {
        info!("requesting reader of flow {} to stop", self.port_id);
        self.stop.store(true, Ordering::Release);
    }

    /// Whether a stop has been requested or the worker has terminated
    pub fn is_stopped(&self) -> bool {
        self.stop.load(Ordering::Acquire)
    }

    /// Port id of the flow this reader drains
    pub fn port_id(&self) -> u32 {
        self.port_id
    }

    /// Await worker termination
    pub async fn join(self) -> Result<(), JoinError> {
        self.task.await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FlowError;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicU64;
    use std::sync::Mutex;

    /// Flow yielding scripted SDU sizes, then failing.
    struct ScriptedFlow {
        sizes: Vec<usize>,
        next: usize,
        reads: Arc<AtomicU64>,
    }

    impl ScriptedFlow {
        fn new(sizes: Vec<usize>) -> (Self, Arc<AtomicU64>) {
            let reads = Arc::new(AtomicU64::new(0));
            (
                Self {
                    sizes,
                    next: 0,
                    reads: reads.clone(),
                },
                reads,
            )
        }
    }

    #[async_trait]
    impl Flow for ScriptedFlow {
        async fn read_sdu(&mut self, buf: &mut [u8]) -> Result<usize, FlowError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            if self.next >= self.sizes.len() {
                return Err(FlowError::PeerClosed);
            }
            let size = self.sizes[self.next];
            self.next += 1;
            for byte in &mut buf[..size] {
                *byte = self.next as u8;
            }
            Ok(size)
        }

        fn port_id(&self) -> u32 {
            7
        }
    }

    /// Listener recording delivered SDUs in order.
    #[derive(Default)]
    struct RecordingListener {
        sdus: Mutex<Vec<Bytes>>,
    }

    impl SduListener for RecordingListener {
        fn sdu_delivered(&self, sdu: Bytes) {
            self.sdus.lock().unwrap().push(sdu);
        }
    }

    fn test_config() -> FlowReaderConfig {
        FlowReaderConfig {
            warmup: Duration::from_millis(0),
            max_sdu_size: 1500,
        }
    }

    #[tokio::test]
    async fn test_delivers_sdus_in_read_order_until_error() {
        let (flow, reads) = ScriptedFlow::new(vec![100, 0, 50]);
        let listener = Arc::new(RecordingListener::default());

        let handle = FlowReader::new(Box::new(flow), listener.clone(), test_config()).start();
        handle.join().await.unwrap();

        let sizes: Vec<usize> = listener
            .sdus
            .lock()
            .unwrap()
            .iter()
            .map(|sdu| sdu.len())
            .collect();
        assert_eq!(sizes, vec![100, 0, 50]);
        // Three successful reads plus the failing one, nothing afterwards.
        assert_eq!(reads.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_sdu_is_trimmed_to_bytes_read() {
        let (flow, _) = ScriptedFlow::new(vec![3]);
        let listener = Arc::new(RecordingListener::default());

        let handle = FlowReader::new(Box::new(flow), listener.clone(), test_config()).start();
        handle.join().await.unwrap();

        let sdus = listener.sdus.lock().unwrap();
        assert_eq!(sdus.len(), 1);
        // Exactly the bytes read, not the 1500-byte buffer.
        assert_eq!(sdus[0].as_ref(), &[1, 1, 1]);
    }

    /// Listener that requests a stop from within the delivery callback, the
    /// one point where no read is pending.
    struct StoppingListener {
        stop: Arc<AtomicBool>,
        delivered: AtomicU64,
    }

    impl SduListener for StoppingListener {
        fn sdu_delivered(&self, _sdu: Bytes) {
            self.delivered.fetch_add(1, Ordering::SeqCst);
            self.stop.store(true, Ordering::Release);
        }
    }

    #[tokio::test]
    async fn test_stop_between_reads_prevents_the_next_read() {
        let (flow, reads) = ScriptedFlow::new(vec![10, 10, 10]);
        let reader = FlowReader::new(
            Box::new(flow),
            Arc::new(RecordingListener::default()),
            test_config(),
        );

        // Swap in a listener sharing the reader's stop flag, equivalent to
        // calling stop() immediately after a delivery.
        let listener = Arc::new(StoppingListener {
            stop: reader.stop.clone(),
            delivered: AtomicU64::new(0),
        });
        let reader = FlowReader {
            listener: listener.clone(),
            ..reader
        };

        let handle = reader.start();
        handle.join().await.unwrap();

        assert_eq!(listener.delivered.load(Ordering::SeqCst), 1);
        // The loop observed the stop request before attempting another read.
        assert_eq!(reads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_stop_before_warmup_prevents_any_read() {
        let (flow, reads) = ScriptedFlow::new(vec![10]);
        let listener = Arc::new(RecordingListener::default());
        let handle = FlowReader::new(
            Box::new(flow),
            listener.clone(),
            FlowReaderConfig {
                warmup: Duration::from_millis(50),
                max_sdu_size: 1500,
            },
        )
        .start();

        handle.stop();
        assert!(handle.is_stopped());
        handle.join().await.unwrap();

        assert_eq!(reads.load(Ordering::SeqCst), 0);
        assert!(listener.sdus.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reader_reports_stopped_after_read_failure() {
        let (flow, _) = ScriptedFlow::new(vec![]);
        let listener = Arc::new(RecordingListener::default());

        let handle = FlowReader::new(Box::new(flow), listener.clone(), test_config()).start();
        // Give the worker time to hit the failing read.
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(handle.is_stopped());
        handle.join().await.unwrap();
        assert!(listener.sdus.lock().unwrap().is_empty());
    }
}
