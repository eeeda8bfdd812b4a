use serde::Serialize;

use super::decision::Anomaly;
use super::decision::Mode;

/// The engine's output for one processed reading.
///
/// Immutable once produced. The transport collaborator attaches the
/// timestamp and a provenance label before persisting or broadcasting;
/// the engine deliberately records neither.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessedResult {
    /// Smoothed light aggregate: the window sum under the binary-vote
    /// profile, the window mean under the analog profile.
    pub smoothed_light: f64,

    /// Hysteresis-stable night flag.
    pub is_night: bool,

    /// Share of recent samples with motion present, 0-100, one decimal.
    pub traffic_intensity_pct: f64,

    /// Target brightness in percent: 0, 30 or 100, unless a manual
    /// override is active.
    pub brightness_pct: u8,

    /// Dashboard mode label derived from `brightness_pct`.
    pub mode: Mode,

    /// Power-consistency verdict.
    pub anomaly: Anomaly,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_serializes_codes_and_labels() {
        let result = ProcessedResult {
            smoothed_light: 10.0,
            is_night: true,
            traffic_intensity_pct: 16.7,
            brightness_pct: 100,
            mode: Mode::Active,
            anomaly: Anomaly::None,
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["anomaly"], 0);
        assert_eq!(json["mode"], "ACTIVE");
        assert_eq!(json["traffic_intensity_pct"], 16.7);
    }
}
