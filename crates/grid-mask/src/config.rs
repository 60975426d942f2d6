//! Configuration for masking and sampling.

use serde::{Deserialize, Serialize};

/// Which mask strategy is tried first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaskStrategyKind {
    /// Exact cell-rectangle intersection (the default path).
    Exact,
    /// All-touched scan conversion, falling back to `Exact` on failure.
    Scanline,
}

impl MaskStrategyKind {
    /// Parse from string (case-insensitive).
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "scanline" | "raster" | "rasterize" => Self::Scanline,
            _ => Self::Exact,
        }
    }
}

impl Default for MaskStrategyKind {
    fn default() -> Self {
        Self::Exact
    }
}

impl std::fmt::Display for MaskStrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exact => write!(f, "exact"),
            Self::Scanline => write!(f, "scanline"),
        }
    }
}

/// Configuration for [`ClimateSampler`](crate::ClimateSampler) and vase panels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaskConfig {
    /// Preferred mask strategy.
    pub strategy: MaskStrategyKind,

    /// Drop NaN and infinite cell values before pooling.
    pub skip_non_finite: bool,

    /// Angular steps per keyframe when building vase panels.
    pub panel_steps: usize,
}

impl Default for MaskConfig {
    fn default() -> Self {
        Self {
            strategy: MaskStrategyKind::Exact,
            skip_non_finite: true,
            panel_steps: 16,
        }
    }
}

impl MaskConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("GRID_MASK_STRATEGY") {
            config.strategy = MaskStrategyKind::from_str(&val);
        }

        if let Ok(val) = std::env::var("GRID_MASK_SKIP_NON_FINITE") {
            config.skip_non_finite = val.to_lowercase() == "true" || val == "1";
        }

        if let Ok(val) = std::env::var("GRID_MASK_PANEL_STEPS") {
            if let Ok(steps) = val.parse() {
                config.panel_steps = steps;
            }
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.panel_steps < 3 {
            return Err("panel_steps must be >= 3".to_string());
        }

        Ok(())
    }
}
