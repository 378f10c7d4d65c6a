//! Roadmap construction settings

use serde::{Deserialize, Serialize};

use crate::config::{Config, ConfigError};
use crate::foundation::math::{is_finite, Real};
use crate::geometry::Rect;

/// Tolerances and sampling parameters for roadmap construction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoadmapConfig {
    /// Convergence threshold of the probe searches
    pub accuracy: Real,
    /// Furthest a sample may travel while being retracted
    pub max_step_distance: Real,
    /// Time window given to each collision probe, in seconds
    pub probe_time_window: Real,
    /// Number of random samples drawn by the builder
    pub samples: usize,
    /// Seed for reproducible sampling, entropy when absent
    pub seed: Option<u64>,
    /// Retracted vertices closer than this are merged
    pub merge_distance: Real,
    /// Vertices closer than this are connected when the path is free
    pub connect_radius: Real,
    /// Search area
    pub bounds: Rect,
}

impl Default for RoadmapConfig {
    fn default() -> Self {
        Self {
            accuracy: 0.00005,
            max_step_distance: 10.0,
            probe_time_window: 1.0,
            samples: 200,
            seed: None,
            merge_distance: 0.5,
            connect_radius: 15.0,
            bounds: Rect::from_bounds(0.0, 0.0, 100.0, 100.0),
        }
    }
}

impl Config for RoadmapConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        let positive = |name: &str, value: Real| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid(format!("{name} must be positive, got {value}")))
            }
        };
        let non_negative = |name: &str, value: Real| {
            if value.is_finite() && value >= 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid(format!("{name} must not be negative, got {value}")))
            }
        };

        positive("accuracy", self.accuracy)?;
        positive("max_step_distance", self.max_step_distance)?;
        non_negative("probe_time_window", self.probe_time_window)?;
        non_negative("merge_distance", self.merge_distance)?;
        non_negative("connect_radius", self.connect_radius)?;
        let finite = is_finite(&self.bounds.min) && is_finite(&self.bounds.max);
        if !finite || self.bounds.is_empty() || self.bounds.shorter_side() <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "bounds must have positive area, got {:?}",
                self.bounds
            )));
        }
        Ok(())
    }
}
