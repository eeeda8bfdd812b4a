use std::collections::HashMap;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::PoisonError;
use std::sync::RwLock;

use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::config::EngineConfig;
use crate::error::ConfigError;
use crate::error::ReadingError;

use super::decision::classify_anomaly;
use super::decision::target_brightness;
use super::decision::Mode;
use super::device::DeviceState;
use super::reading::Reading;
use super::record::ProcessedResult;

/// One slot in the device store. The mutex serializes the four processing
/// stages for a device; the last-seen tick drives bounded-store eviction.
struct DeviceEntry {
    state: Mutex<DeviceState>,
    last_seen: AtomicU64,
}

/// The per-device streaming processing engine.
///
/// Holds one [`DeviceState`] per device id, created lazily on first
/// contact, and exposes [`process`](Engine::process) as its single
/// streaming operation. The engine performs no I/O: transports feed it
/// readings and hand the results to persistence and live-update
/// collaborators.
///
/// Readings for the same device are serialized for the full read-modify-
/// write of all four stages; readings for distinct devices run in
/// parallel.
pub struct Engine {
    config: EngineConfig,

    /// Device store. The outer lock only guards map shape (insert/remove);
    /// per-device mutation happens under each entry's own mutex.
    devices: RwLock<HashMap<String, Arc<DeviceEntry>>>,

    /// Monotonic tick stamped onto entries for least-recently-seen
    /// eviction.
    clock: AtomicU64,
}

impl Engine {
    /// Create an engine from a validated configuration.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            devices: RwLock::new(HashMap::new()),
            clock: AtomicU64::new(0),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Process one reading through all four stages: light smoothing,
    /// night hysteresis, traffic aggregation, decision/anomaly.
    ///
    /// Validation happens before any state is touched, so a rejected
    /// reading leaves the device windows untouched and never creates
    /// state for a malformed device id.
    pub fn process(&self, reading: &Reading) -> Result<ProcessedResult, ReadingError> {
        reading.validate()?;

        let entry = self.entry_for(&reading.device_id);
        entry.last_seen.store(
            self.clock.fetch_add(1, Ordering::Relaxed),
            Ordering::Relaxed,
        );

        let motion = reading.motion_detected();
        let (smoothed_light, is_night, traffic_intensity_pct, brightness_pct) = {
            let mut state = entry
                .state
                .lock()
                .unwrap_or_else(PoisonError::into_inner);

            let (smoothed_light, is_night) =
                state.observe_light(&self.config.light_profile, reading.raw_light);
            let traffic = state.observe_motion(motion);
            let computed = target_brightness(is_night, motion);
            let brightness = state.override_brightness().unwrap_or(computed);
            (smoothed_light, is_night, traffic, brightness)
        };

        let anomaly = classify_anomaly(&self.config.anomaly_model, brightness_pct, reading.power);
        if anomaly.is_anomalous() {
            warn!(
                device_id = %reading.device_id,
                brightness_pct,
                power = reading.power,
                code = anomaly.code(),
                "power draw inconsistent with brightness decision"
            );
        } else {
            debug!(
                device_id = %reading.device_id,
                smoothed_light,
                is_night,
                traffic_intensity_pct,
                brightness_pct,
                "reading processed"
            );
        }

        Ok(ProcessedResult {
            smoothed_light,
            is_night,
            traffic_intensity_pct,
            brightness_pct,
            mode: Mode::from_brightness(brightness_pct),
            anomaly,
        })
    }

    /// Zero a device's windows and night latch, keeping its store entry.
    /// Returns false if the device is unknown.
    pub fn reset_device(&self, device_id: &str) -> bool {
        let devices = self.devices.read().unwrap_or_else(PoisonError::into_inner);
        match devices.get(device_id) {
            Some(entry) => {
                entry
                    .state
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .reset();
                info!(device_id, "device state reset");
                true
            }
            None => false,
        }
    }

    /// Drop a device from the store entirely. Returns false if the device
    /// is unknown.
    pub fn remove_device(&self, device_id: &str) -> bool {
        let removed = self
            .devices
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(device_id)
            .is_some();
        if removed {
            info!(device_id, "device removed from store");
        }
        removed
    }

    /// Set or clear a manual brightness override for a device, creating
    /// its state if the device has not reported yet.
    pub fn set_override(
        &self,
        device_id: &str,
        brightness_pct: Option<u8>,
    ) -> Result<(), ReadingError> {
        if device_id.is_empty() {
            return Err(ReadingError::EmptyDeviceId);
        }
        if let Some(pct) = brightness_pct {
            if pct > 100 {
                return Err(ReadingError::OverrideOutOfRange(pct));
            }
        }
        let entry = self.entry_for(device_id);
        entry
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .set_override(brightness_pct);
        info!(device_id, ?brightness_pct, "brightness override updated");
        Ok(())
    }

    pub fn device_count(&self) -> usize {
        self.devices
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn device_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .devices
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        ids.sort();
        ids
    }

    /// Look up the entry for a device, creating it lazily. When the store
    /// is capped, makes room by evicting the least-recently-seen device
    /// first.
    fn entry_for(&self, device_id: &str) -> Arc<DeviceEntry> {
        {
            let devices = self.devices.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(entry) = devices.get(device_id) {
                return Arc::clone(entry);
            }
        }

        let mut devices = self.devices.write().unwrap_or_else(PoisonError::into_inner);
        // Another caller may have created the entry between the locks
        if let Some(entry) = devices.get(device_id) {
            return Arc::clone(entry);
        }

        if let Some(cap) = self.config.max_devices {
            while devices.len() >= cap {
                let stale = devices
                    .iter()
                    .min_by_key(|(_, entry)| entry.last_seen.load(Ordering::Relaxed))
                    .map(|(id, _)| id.clone());
                match stale {
                    Some(id) => {
                        devices.remove(&id);
                        info!(device_id = %id, "evicted least-recently-seen device");
                    }
                    None => break,
                }
            }
        }

        info!(device_id, "created state for new device");
        let entry = Arc::new(DeviceEntry {
            state: Mutex::new(DeviceState::new(&self.config)),
            last_seen: AtomicU64::new(self.clock.fetch_add(1, Ordering::Relaxed)),
        });
        devices.insert(device_id.to_string(), Arc::clone(&entry));
        entry
    }
}
