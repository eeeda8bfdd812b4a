//! Collaborator seam between the engine and its transports.
//!
//! The engine itself performs no I/O. The hub wraps it with the two
//! outward paths every deployment needs: a fire-and-forget broadcast
//! channel for live-update subscribers (dashboards, WebSocket bridges)
//! and a list of persistence sinks. Transports call
//! [`Hub::dispatch`] instead of [`Engine::process`] when they want the
//! result fanned out.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::warn;

use crate::engine::Engine;
use crate::engine::Event;
use crate::engine::ProcessedResult;
use crate::engine::Reading;
use crate::error::ReadingError;

/// Capacity for the live-update broadcast channel. Slow subscribers lag
/// and drop events rather than blocking dispatch.
const EVENT_CHANNEL_SIZE: usize = 1024;

/// A persistence collaborator. Implementations own their retry/backoff
/// policy; the hub only logs failures and moves on.
#[async_trait]
pub trait RecordSink: Send + Sync {
    /// Name used in failure logs.
    fn name(&self) -> &str;

    /// Durably store one processed record. The caller is responsible for
    /// attaching a timestamp and provenance label at this point.
    async fn store(&self, device_id: &str, result: &ProcessedResult) -> anyhow::Result<()>;
}

/// Fans engine results out to subscribers and sinks.
pub struct Hub {
    engine: Arc<Engine>,
    events: broadcast::Sender<Event>,
    sinks: Vec<Box<dyn RecordSink>>,
}

impl Hub {
    pub fn new(engine: Arc<Engine>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_SIZE);
        Self {
            engine,
            events,
            sinks: Vec::new(),
        }
    }

    pub fn engine(&self) -> &Arc<Engine> {
        &self.engine
    }

    /// Register a persistence sink. Sinks are invoked in registration
    /// order on every dispatched reading.
    pub fn add_sink(&mut self, sink: Box<dyn RecordSink>) {
        self.sinks.push(sink);
    }

    /// Subscribe to live updates. Dropped receivers and lagging
    /// subscribers never affect dispatch.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }

    /// Process a reading and fan the result out.
    ///
    /// The engine call is synchronous and bounded; only sink storage
    /// awaits. A sink failure is logged and does not fail the dispatch,
    /// and no acknowledgment is expected from broadcast subscribers.
    pub async fn dispatch(&self, reading: &Reading) -> Result<ProcessedResult, ReadingError> {
        let result = self.engine.process(reading)?;

        // send only errors when there are no receivers; fire-and-forget
        let _ = self.events.send(Event::ReadingProcessed {
            device_id: reading.device_id.clone(),
            result: result.clone(),
        });

        for sink in &self.sinks {
            if let Err(e) = sink.store(&reading.device_id, &result).await {
                warn!(
                    sink = sink.name(),
                    device_id = %reading.device_id,
                    "sink failed to store record: {e}"
                );
            }
        }

        Ok(result)
    }

    /// Remove a device from the engine store and tell subscribers.
    pub fn remove_device(&self, device_id: &str) -> bool {
        let removed = self.engine.remove_device(device_id);
        if removed {
            let _ = self.events.send(Event::DeviceRemoved {
                device_id: device_id.to_string(),
            });
        }
        removed
    }
}
