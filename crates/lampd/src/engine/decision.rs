//! Pure decision logic: target brightness, operating mode, anomaly code.
//!
//! Everything here is a function of the current call's inputs plus the
//! night latch; no window state is touched.

use serde::Serialize;
use serde::Serializer;

use crate::config::AnomalyModel;

/// Daytime target.
pub const BRIGHTNESS_OFF: u8 = 0;
/// Night with no recent motion: dimmed eco level.
pub const BRIGHTNESS_DIM: u8 = 30;
/// Night with motion present.
pub const BRIGHTNESS_FULL: u8 = 100;

/// Target brightness from the night latch and the current motion sample.
///
/// Deliberately ignores the traffic-intensity aggregate: the lamp reacts
/// to the motion in front of it right now, not to the rolling average.
pub fn target_brightness(is_night: bool, motion: bool) -> u8 {
    if !is_night {
        BRIGHTNESS_OFF
    } else if motion {
        BRIGHTNESS_FULL
    } else {
        BRIGHTNESS_DIM
    }
}

/// Coarse operating mode derived from the final brightness, as shown on
/// operator dashboards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Mode {
    Off,
    Eco,
    Active,
}

impl Mode {
    pub fn from_brightness(brightness_pct: u8) -> Self {
        match brightness_pct {
            0 => Mode::Off,
            1..=49 => Mode::Eco,
            _ => Mode::Active,
        }
    }
}

/// Mismatch between the brightness decision and the reported power draw.
///
/// Serializes as its numeric code so persisted records stay compatible
/// with the historical document shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anomaly {
    /// Power draw is consistent with the decision.
    None,
    /// Expected light but negligible power: likely a failed bulb. Also
    /// used for any deviation under the expected-power model.
    BulbOut,
    /// Expected off but power present: likely leakage or a stuck relay.
    PowerLeak,
}

impl Anomaly {
    pub fn code(self) -> u8 {
        match self {
            Anomaly::None => 0,
            Anomaly::BulbOut => 1,
            Anomaly::PowerLeak => 2,
        }
    }

    pub fn is_anomalous(self) -> bool {
        self != Anomaly::None
    }
}

impl Serialize for Anomaly {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

/// Classify the reported power draw against the brightness decision.
///
/// Under [`AnomalyModel::PowerBands`] the two checks are evaluated in
/// order and the leak check wins when both fire, so callers always see
/// exactly one code. Under [`AnomalyModel::ExpectedPower`] only
/// [`Anomaly::BulbOut`] can be reported.
pub fn classify_anomaly(model: &AnomalyModel, brightness_pct: u8, power: f64) -> Anomaly {
    match *model {
        AnomalyModel::PowerBands {
            lit_floor_watts,
            dark_ceiling_watts,
        } => {
            let mut anomaly = Anomaly::None;
            if brightness_pct > 10 && power < lit_floor_watts {
                anomaly = Anomaly::BulbOut;
            }
            if brightness_pct == 0 && power > dark_ceiling_watts {
                anomaly = Anomaly::PowerLeak;
            }
            anomaly
        }
        AnomalyModel::ExpectedPower {
            rated_watts,
            tolerance_watts,
        } => {
            let expected = f64::from(brightness_pct) / 100.0 * rated_watts;
            if (power - expected).abs() > tolerance_watts {
                Anomaly::BulbOut
            } else {
                Anomaly::None
            }
        }
    }
}
