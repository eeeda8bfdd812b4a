use serde::Deserialize;

use crate::error::ReadingError;

/// One raw sample from a device, as handed over by a transport front-end.
///
/// Transports deserialize this straight from the device payload (`ldr` is
/// accepted as an alias for `raw_light` to match the firmware field name)
/// and fill in `device_id` from the topic or request, then call
/// [`Engine::process`](crate::Engine::process).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Reading {
    /// State-partition key. Must be non-empty.
    pub device_id: String,

    /// Raw light sample. Scale is deployment-dependent: a 0/1 darkness
    /// vote under the binary-vote profile, an ADC reading under the
    /// analog profile.
    #[serde(alias = "ldr")]
    pub raw_light: u32,

    /// Motion flag, 0 or 1.
    pub motion: u8,

    /// Reported power draw in watts.
    pub power: f64,
}

impl Reading {
    pub fn new(device_id: impl Into<String>, raw_light: u32, motion: u8, power: f64) -> Self {
        Self {
            device_id: device_id.into(),
            raw_light,
            motion,
            power,
        }
    }

    /// Precondition checks. The engine calls this before touching any
    /// window, so a malformed reading can never leave a partially applied
    /// update behind.
    pub fn validate(&self) -> Result<(), ReadingError> {
        if self.device_id.is_empty() {
            return Err(ReadingError::EmptyDeviceId);
        }
        if self.motion > 1 {
            return Err(ReadingError::MotionOutOfRange(self.motion));
        }
        if !self.power.is_finite() || self.power < 0.0 {
            return Err(ReadingError::InvalidPower(self.power));
        }
        Ok(())
    }

    pub fn motion_detected(&self) -> bool {
        self.motion == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_reading() {
        let reading = Reading::new("lamp-1", 1, 1, 4.5);
        assert_eq!(reading.validate(), Ok(()));
        assert!(reading.motion_detected());
    }

    #[test]
    fn test_rejects_empty_device_id() {
        let reading = Reading::new("", 1, 0, 0.0);
        assert_eq!(reading.validate(), Err(ReadingError::EmptyDeviceId));
    }

    #[test]
    fn test_rejects_out_of_range_motion() {
        let reading = Reading::new("lamp-1", 1, 2, 0.0);
        assert_eq!(reading.validate(), Err(ReadingError::MotionOutOfRange(2)));
    }

    #[test]
    fn test_rejects_nan_and_negative_power() {
        let nan = Reading::new("lamp-1", 1, 0, f64::NAN);
        assert!(matches!(
            nan.validate(),
            Err(ReadingError::InvalidPower(_))
        ));

        let negative = Reading::new("lamp-1", 1, 0, -0.5);
        assert_eq!(
            negative.validate(),
            Err(ReadingError::InvalidPower(-0.5))
        );
    }

    #[test]
    fn test_deserialize_firmware_payload() {
        // Field names as published by the controller firmware
        let reading: Reading = serde_json::from_str(
            r#"{"device_id": "1", "ldr": 2600, "motion": 1, "power": 4.8}"#,
        )
        .unwrap();
        assert_eq!(reading.raw_light, 2600);
        assert!(reading.motion_detected());
    }
}
