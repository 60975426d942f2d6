//! Configuration for hull construction.

use serde::{Deserialize, Serialize};

/// How the per-day z coordinate of the hull is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeAxis {
    /// Calendar days since the first kept perimeter (gaps stay visible).
    DaysSinceStart,
    /// Ordinal position of the day in the cleaned series.
    DayIndex,
}

impl TimeAxis {
    /// Parse from string (case-insensitive).
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "index" | "day_index" => Self::DayIndex,
            _ => Self::DaysSinceStart,
        }
    }
}

impl Default for TimeAxis {
    fn default() -> Self {
        Self::DaysSinceStart
    }
}

/// Configuration for [`RuledMeshBuilder`](crate::RuledMeshBuilder).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HullConfig {
    /// Number of fixed radial directions per day.
    pub n_theta: usize,

    /// Equal arc-length samples taken on each day's boundary.
    pub n_ring_samples: usize,

    /// Width of the centred moving average over days (odd; 1 disables).
    pub smooth_window: usize,

    /// Subtract each day's sample centroid before lofting.
    pub recenter: bool,

    /// Source of the z coordinate.
    pub time_axis: TimeAxis,
}

impl Default for HullConfig {
    fn default() -> Self {
        Self {
            n_theta: 72,
            n_ring_samples: 512,
            smooth_window: 1,
            recenter: false,
            time_axis: TimeAxis::DaysSinceStart,
        }
    }
}

impl HullConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("TIME_HULL_N_THETA") {
            if let Ok(n) = val.parse() {
                config.n_theta = n;
            }
        }

        if let Ok(val) = std::env::var("TIME_HULL_RING_SAMPLES") {
            if let Ok(n) = val.parse() {
                config.n_ring_samples = n;
            }
        }

        if let Ok(val) = std::env::var("TIME_HULL_SMOOTH_WINDOW") {
            if let Ok(n) = val.parse() {
                config.smooth_window = n;
            }
        }

        if let Ok(val) = std::env::var("TIME_HULL_RECENTER") {
            config.recenter = val.to_lowercase() == "true" || val == "1";
        }

        if let Ok(val) = std::env::var("TIME_HULL_TIME_AXIS") {
            config.time_axis = TimeAxis::from_str(&val);
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.n_theta < 3 {
            return Err("n_theta must be >= 3".to_string());
        }

        if self.n_ring_samples < 3 {
            return Err("n_ring_samples must be >= 3".to_string());
        }

        if self.smooth_window == 0 || self.smooth_window % 2 == 0 {
            return Err("smooth_window must be odd and >= 1".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(HullConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects() {
        let mut config = HullConfig::default();
        config.smooth_window = 4;
        assert!(config.validate().is_err());

        let mut config = HullConfig::default();
        config.n_theta = 2;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_time_axis_from_str() {
        assert_eq!(TimeAxis::from_str("INDEX"), TimeAxis::DayIndex);
        assert_eq!(TimeAxis::from_str("days"), TimeAxis::DaysSinceStart);
    }

    #[test]
    fn test_from_env() {
        std::env::set_var("TIME_HULL_N_THETA", "36");
        std::env::set_var("TIME_HULL_RING_SAMPLES", "256");
        std::env::set_var("TIME_HULL_SMOOTH_WINDOW", "3");
        std::env::set_var("TIME_HULL_RECENTER", "1");
        std::env::set_var("TIME_HULL_TIME_AXIS", "day_index");
        let config = HullConfig::from_env();
        assert_eq!(config.n_theta, 36);
        assert_eq!(config.n_ring_samples, 256);
        assert_eq!(config.smooth_window, 3);
        assert!(config.recenter);
        assert_eq!(config.time_axis, TimeAxis::DayIndex);
        assert!(config.validate().is_ok());

        std::env::set_var("TIME_HULL_N_THETA", "lots");
        assert_eq!(HullConfig::from_env().n_theta, 72);

        for key in [
            "TIME_HULL_N_THETA",
            "TIME_HULL_RING_SAMPLES",
            "TIME_HULL_SMOOTH_WINDOW",
            "TIME_HULL_RECENTER",
            "TIME_HULL_TIME_AXIS",
        ] {
            std::env::remove_var(key);
        }
        let config = HullConfig::from_env();
        assert_eq!(config.n_theta, 72);
        assert!(!config.recenter);
    }
}
