//! # Usage Examples
//!
//! This module only exists for documentation. The doc tests below show the
//! engine API the way a transport front-end drives it.
//!
//! ## Processing a feed of readings
//!
//! ```
//! use lampd::{Engine, EngineConfig, Reading};
//!
//! let engine = Engine::new(EngineConfig::default()).unwrap();
//!
//! // Ten dark samples with motion: the lamp latches night and goes full
//! let mut result = None;
//! for _ in 0..10 {
//!     let reading = Reading::new("lamp-1", 1, 1, 4.5);
//!     result = Some(engine.process(&reading).unwrap());
//! }
//!
//! let result = result.unwrap();
//! assert!(result.is_night);
//! assert_eq!(result.brightness_pct, 100);
//! ```
//!
//! ## Fanning results out to collaborators
//!
//! ```
//! use std::sync::Arc;
//! use lampd::{Engine, EngineConfig, Event, Hub, Reading};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let engine = Arc::new(Engine::new(EngineConfig::default()).unwrap());
//! let hub = Hub::new(engine);
//!
//! let mut updates = hub.subscribe();
//! hub.dispatch(&Reading::new("lamp-1", 1, 0, 0.3)).await.unwrap();
//!
//! match updates.recv().await.unwrap() {
//!     Event::ReadingProcessed { device_id, .. } => assert_eq!(device_id, "lamp-1"),
//!     other => panic!("unexpected event: {other:?}"),
//! }
//! # });
//! ```
