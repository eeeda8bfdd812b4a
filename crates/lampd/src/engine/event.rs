use super::record::ProcessedResult;

/// Live-update events published to broadcast subscribers.
///
/// Distinct from the engine's return value: events carry the device id so
/// a subscriber watching the whole fleet can route them without holding
/// the original reading.
#[derive(Debug, Clone)]
pub enum Event {
    /// A reading completed all four processing stages.
    ReadingProcessed {
        device_id: String,
        result: ProcessedResult,
    },

    /// A device was dropped from the store, either explicitly or by the
    /// bounded-store eviction policy.
    DeviceRemoved { device_id: String },
}
