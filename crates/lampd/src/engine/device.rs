use crate::config::EngineConfig;
use crate::config::LightProfile;

use super::window::SampleWindow;

/// Mutable per-device state, owned exclusively by the engine and created
/// lazily on the first reading for a device id.
///
/// Callers must hold the device's lock across all four processing stages;
/// see [`Engine::process`](super::Engine::process).
#[derive(Debug)]
pub struct DeviceState {
    light_window: SampleWindow,
    motion_window: SampleWindow,

    /// Night latch, the hysteresis memory. Initial state is day.
    is_night: bool,

    /// Manual brightness override set by an operator command. While set,
    /// the decision stage reports this value instead of the computed one.
    override_brightness: Option<u8>,
}

impl DeviceState {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            light_window: SampleWindow::new(config.light_window),
            motion_window: SampleWindow::new(config.motion_window),
            is_night: false,
            override_brightness: None,
        }
    }

    /// Stage 1 + 2: push the raw light sample and update the night latch.
    /// Returns the reported aggregate (sum or mean per profile) and the
    /// latch state.
    pub fn observe_light(&mut self, profile: &LightProfile, raw_light: u32) -> (f64, bool) {
        self.light_window.push(raw_light);
        match *profile {
            LightProfile::BinaryVote => {
                let doubled = 2 * self.light_window.sum();
                let capacity = self.light_window.capacity() as u64;
                if doubled > capacity {
                    self.is_night = true;
                } else if doubled < capacity {
                    self.is_night = false;
                }
                // doubled == capacity: exact midpoint, latch unchanged
                (self.light_window.sum() as f64, self.is_night)
            }
            LightProfile::Analog {
                night_above,
                day_below,
            } => {
                let mean = self.light_window.mean();
                if mean > night_above {
                    self.is_night = true;
                } else if mean < day_below {
                    self.is_night = false;
                }
                (mean, self.is_night)
            }
        }
    }

    /// Stage 3: push the motion sample and return the traffic intensity
    /// as a percentage of the full window, rounded to one decimal.
    pub fn observe_motion(&mut self, motion: bool) -> f64 {
        let sum = self.motion_window.push(u32::from(motion));
        let pct = sum as f64 * 100.0 / self.motion_window.capacity() as f64;
        (pct * 10.0).round() / 10.0
    }

    pub fn is_night(&self) -> bool {
        self.is_night
    }

    pub fn override_brightness(&self) -> Option<u8> {
        self.override_brightness
    }

    pub fn set_override(&mut self, brightness_pct: Option<u8>) {
        self.override_brightness = brightness_pct;
    }

    /// Return the device to its initial state: zeroed windows, day latch,
    /// no override.
    pub fn reset(&mut self) {
        self.light_window.reset();
        self.motion_window.reset();
        self.is_night = false;
        self.override_brightness = None;
    }

    #[cfg(test)]
    pub fn windows_consistent(&self) -> bool {
        self.light_window.sum() == self.light_window.recomputed_sum()
            && self.motion_window.sum() == self.motion_window.recomputed_sum()
    }
}
