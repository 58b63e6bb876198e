use crate::api::DetectionSink;
use crate::event::{DetectionEvent, StatusUpdate};
use crate::recording::RawSample;
use anyhow::{anyhow, Result};
use log::{debug, error};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, PartialEq)]
pub enum SinkMessage {
    Sample(RawSample),
    Status(StatusUpdate),
    Detection(DetectionEvent),
}

#[derive(Debug, Clone)]
pub struct SinkHandle {
    tx: mpsc::UnboundedSender<SinkMessage>,
}

impl SinkHandle {
    /// Never blocks. Messages sent after the dispatcher closed are dropped.
    pub fn send(&self, message: SinkMessage) {
        if self.tx.send(message).is_err() {
            debug!("Dispatcher closed, dropping message");
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchStats {
    pub delivered: u64,
    pub failures: u64,
}

pub struct Dispatcher {
    handle: SinkHandle,
    worker: JoinHandle<DispatchStats>,
}

impl Dispatcher {
    /// Must be called from within a tokio runtime.
    pub fn spawn(mut sinks: Vec<Box<dyn DetectionSink>>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<SinkMessage>();
        let worker = tokio::task::spawn_blocking(move || {
            let mut stats = DispatchStats::default();
            while let Some(message) = rx.blocking_recv() {
                for sink in sinks.iter_mut() {
                    let result = match &message {
                        SinkMessage::Sample(sample) => sink.on_sample(sample),
                        SinkMessage::Status(status) => sink.on_status(status),
                        SinkMessage::Detection(event) => sink.on_detection(event),
                    };
                    match result {
                        Ok(()) => stats.delivered += 1,
                        Err(e) => {
                            stats.failures += 1;
                            error!("Sink {} failed: {:#}", sink.name(), e);
                        }
                    }
                }
            }
            for sink in sinks.iter_mut() {
                if let Err(e) = sink.on_close() {
                    stats.failures += 1;
                    error!("Sink {} failed to close: {:#}", sink.name(), e);
                }
            }
            stats
        });
        Self {
            handle: SinkHandle { tx },
            worker,
        }
    }

    pub fn handle(&self) -> SinkHandle {
        self.handle.clone()
    }

    pub async fn close(self) -> Result<DispatchStats> {
        drop(self.handle);
        self.worker
            .await
            .map_err(|e| anyhow!("Dispatcher worker panicked: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confirmation::DetectionSignal;
    use std::sync::{Arc, Mutex};

    struct Recording {
        seen: Arc<Mutex<Vec<String>>>,
        fail: bool,
    }

    impl DetectionSink for Recording {
        fn name(&self) -> &str {
            "recording"
        }

        fn on_status(&mut self, status: &StatusUpdate) -> Result<()> {
            self.seen.lock().unwrap().push(status.line());
            Ok(())
        }

        fn on_detection(&mut self, event: &DetectionEvent) -> Result<()> {
            if self.fail {
                return Err(anyhow!("offline"));
            }
            self.seen.lock().unwrap().push(format!("detection {}", event.timestamp));
            Ok(())
        }

        fn on_close(&mut self) -> Result<()> {
            self.seen.lock().unwrap().push("closed".to_string());
            Ok(())
        }
    }

    fn detection(timestamp: u64) -> DetectionEvent {
        DetectionEvent {
            timestamp,
            latitude: 0.0,
            longitude: 0.0,
            energy: 1.0,
            variance: 1.0,
            peak_count: 10,
            device_id: "t".to_string(),
        }
    }

    #[tokio::test]
    async fn test_delivers_in_order_then_closes() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let dispatcher = Dispatcher::spawn(vec![Box::new(Recording {
            seen: seen.clone(),
            fail: false,
        })]);
        let handle = dispatcher.handle();
        handle.send(SinkMessage::Status(StatusUpdate {
            timestamp: 1,
            signal: DetectionSignal::Monitoring,
        }));
        handle.send(SinkMessage::Detection(detection(2)));
        drop(handle);

        let stats = dispatcher.close().await.unwrap();
        assert_eq!(stats, DispatchStats { delivered: 2, failures: 0 });
        assert_eq!(
            *seen.lock().unwrap(),
            vec!["Monitoring...".to_string(), "detection 2".to_string(), "closed".to_string()]
        );
    }

    #[tokio::test]
    async fn test_failing_sink_does_not_block_others() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let dispatcher = Dispatcher::spawn(vec![
            Box::new(Recording {
                seen: Arc::new(Mutex::new(Vec::new())),
                fail: true,
            }),
            Box::new(Recording {
                seen: seen.clone(),
                fail: false,
            }),
        ]);
        dispatcher.handle().send(SinkMessage::Detection(detection(7)));

        let stats = dispatcher.close().await.unwrap();
        assert_eq!(stats.failures, 1);
        assert!(seen.lock().unwrap().contains(&"detection 7".to_string()));
    }
}
