//! lampd: the per-device stream-processing core for adaptive streetlights.
//!
//! Transports (HTTP, MQTT, test harnesses) hand the engine raw readings;
//! it returns a stable operating decision per reading and keeps all
//! per-device state in-process. See [`Engine`] for the processing stages
//! and [`hub::Hub`] for the collaborator seam.

pub mod config;
mod engine;
pub mod error;
pub mod hub;

#[cfg(doc)]
pub mod examples;

pub use config::AnomalyModel;
pub use config::EngineConfig;
pub use config::LightProfile;
pub use engine::Anomaly;
pub use engine::Engine;
pub use engine::Event;
pub use engine::Mode;
pub use engine::ProcessedResult;
pub use engine::Reading;
pub use engine::SampleWindow;
pub use error::ConfigError;
pub use error::ReadingError;
pub use hub::Hub;
pub use hub::RecordSink;
