//! Field configuration and engine tuning constants.
//!
//! [`FieldConfig`] is the construction contract handed over by whoever sets
//! up a run (dimensions, duration, tick size). [`Tuning`] gathers every
//! constant the engine uses for ball flight, duels, steering and hazard
//! scoring. Both are plain serde types so a collaborator can load them from
//! JSON; every `Tuning` field has a default matching the stock game.
//!
//! # Example
//!
//! ```
//! use scrimmage_core::config::{FieldConfig, Tuning};
//!
//! let config = FieldConfig::new(100.0, 50.0, 5.0, 0.1);
//! assert!(config.validate().is_ok());
//! assert_eq!(config.tick_budget(), 50);
//!
//! let tuning = Tuning::from_json_str(r#"{ "prone_ticks": 4 }"#).unwrap();
//! assert_eq!(tuning.prone_ticks, 4);
//! assert_eq!(tuning.end_zone_depth, Tuning::default().end_zone_depth);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

// =============================================================================
// Field Configuration
// =============================================================================

/// Dimensions and timing of a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldConfig {
    /// Field length along x. Home scores at `x = width`, away at `x = 0`.
    pub width: f32,
    /// Field breadth along y.
    pub height: f32,
    /// Total intended duration of the run, in seconds.
    pub duration: f32,
    /// Tick duration, in seconds.
    pub dt: f32,
}

impl FieldConfig {
    /// Creates a new field configuration.
    #[must_use]
    pub const fn new(width: f32, height: f32, duration: f32, dt: f32) -> Self {
        Self {
            width,
            height,
            duration,
            dt,
        }
    }

    /// Rejects non-physical values.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfig`] naming the first offending value.
    pub fn validate(&self) -> Result<()> {
        require_positive("width", self.width)?;
        require_positive("height", self.height)?;
        require_positive("duration", self.duration)?;
        require_positive("dt", self.dt)?;
        Ok(())
    }

    /// Number of ticks needed to cover the configured duration.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn tick_budget(&self) -> u64 {
        (self.duration / self.dt).ceil().max(0.0) as u64
    }
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self::new(100.0, 50.0, 50.0, 0.1)
    }
}

fn require_positive(field: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidConfig {
            field,
            reason: format!("must be a positive finite number, got {value}"),
        })
    }
}

// =============================================================================
// Hazard Weights
// =============================================================================

/// Weights of the four hazard terms. See [`crate::hazard::HazardMap`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HazardWeights {
    /// Squared distance to the attacking goal line.
    pub goal: f32,
    /// Squared distance to the ball carrier (pass length).
    pub pass: f32,
    /// Distance to the nearest defender (subtracted).
    pub defender: f32,
    /// Distance to the nearest other receiver (subtracted).
    pub receiver: f32,
}

impl Default for HazardWeights {
    fn default() -> Self {
        Self {
            goal: 0.01,
            pass: 0.0001,
            defender: 1.0,
            receiver: 1.0,
        }
    }
}

// =============================================================================
// Tuning
// =============================================================================

/// Engine constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Gravity used for ball flight. Larger than 9.81 to stand in for drag.
    pub gravity: f32,
    /// Height the ball leaves the thrower's hand at.
    pub launch_height: f32,
    /// The ball can be caught once it is at or below this height.
    pub catch_height: f32,
    /// Depth of each end zone measured from its boundary.
    pub end_zone_depth: f32,
    /// Ticks a player stays down after losing a duel.
    pub prone_ticks: u32,
    /// Maximum ball scatter after a successful tackle.
    pub scatter_distance: f32,
    /// Distance a narrowly beaten blocker is pushed back.
    pub push_back_distance: f32,
    /// Half-width of the band around the win threshold that counts as a close block.
    pub block_draw_band: f32,
    /// Chance a close block knocks both players down.
    pub mutual_knockdown_chance: f32,
    /// Inset from the field edge that every objective is clamped into.
    pub objective_margin: f32,
    /// Half-width of the arc searched when running to goal, in degrees.
    pub run_arc_degrees: f32,
    /// Angular step of the run-to-goal search, in degrees.
    pub run_step_degrees: f32,
    /// Coarse samples taken around the circle before refining a steering angle.
    pub steering_samples: u32,
    /// Angular tolerance of the steering refinement, in radians.
    pub steering_tolerance: f32,
    /// Initial simplex size for find-space minimization.
    pub find_space_step: f32,
    /// Iteration cap for find-space minimization.
    pub find_space_iterations: u32,
    /// Hazard scoring weights.
    pub hazard: HazardWeights,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 19.6,
            launch_height: 2.0,
            catch_height: 2.5,
            end_zone_depth: 5.0,
            prone_ticks: 10,
            scatter_distance: 4.0,
            push_back_distance: 1.0,
            block_draw_band: 0.05,
            mutual_knockdown_chance: 0.1,
            objective_margin: 0.5,
            run_arc_degrees: 45.0,
            run_step_degrees: 5.0,
            steering_samples: 16,
            steering_tolerance: 1.0e-4,
            find_space_step: 2.0,
            find_space_iterations: 80,
            hazard: HazardWeights::default(),
        }
    }
}

impl Tuning {
    /// Parses tuning constants from JSON. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Tuning`] for malformed JSON and
    /// [`SimError::InvalidConfig`] if the parsed values fail [`Tuning::validate`].
    pub fn from_json_str(json: &str) -> Result<Self> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Rejects constants the engine cannot run with.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfig`] naming the first offending value.
    pub fn validate(&self) -> Result<()> {
        require_positive("gravity", self.gravity)?;
        require_positive("run_step_degrees", self.run_step_degrees)?;
        require_positive("steering_tolerance", self.steering_tolerance)?;
        require_positive("find_space_step", self.find_space_step)?;
        if self.steering_samples < 3 {
            return Err(SimError::InvalidConfig {
                field: "steering_samples",
                reason: format!("need at least 3 samples, got {}", self.steering_samples),
            });
        }
        if !(0.0..=1.0).contains(&self.mutual_knockdown_chance) {
            return Err(SimError::InvalidConfig {
                field: "mutual_knockdown_chance",
                reason: format!("must be a probability, got {}", self.mutual_knockdown_chance),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod field_config_tests {
        use super::*;

        #[test]
        fn default_is_valid() {
            assert!(FieldConfig::default().validate().is_ok());
        }

        #[test]
        fn rejects_non_positive_dimensions() {
            let err = FieldConfig::new(0.0, 50.0, 1.0, 0.1).validate().unwrap_err();
            assert!(matches!(err, SimError::InvalidConfig { field: "width", .. }));

            let err = FieldConfig::new(100.0, -5.0, 1.0, 0.1).validate().unwrap_err();
            assert!(matches!(err, SimError::InvalidConfig { field: "height", .. }));
        }

        #[test]
        fn rejects_nan_tick() {
            let err = FieldConfig::new(100.0, 50.0, 1.0, f32::NAN).validate().unwrap_err();
            assert!(matches!(err, SimError::InvalidConfig { field: "dt", .. }));
        }

        #[test]
        fn tick_budget_rounds_up() {
            assert_eq!(FieldConfig::new(100.0, 50.0, 1.0, 0.3).tick_budget(), 4);
            assert_eq!(FieldConfig::new(100.0, 50.0, 3.0, 1.0).tick_budget(), 3);
        }
    }

    mod tuning_tests {
        use super::*;

        #[test]
        fn default_is_valid() {
            assert!(Tuning::default().validate().is_ok());
        }

        #[test]
        fn partial_json_keeps_defaults() {
            let tuning = Tuning::from_json_str(r#"{ "gravity": 30.0, "hazard": { "goal": 0.5 } }"#)
                .unwrap();
            assert!((tuning.gravity - 30.0).abs() < f32::EPSILON);
            assert!((tuning.hazard.goal - 0.5).abs() < f32::EPSILON);
            assert_eq!(tuning.hazard.defender, HazardWeights::default().defender);
            assert_eq!(tuning.prone_ticks, Tuning::default().prone_ticks);
        }

        #[test]
        fn malformed_json_is_tuning_error() {
            let err = Tuning::from_json_str("{ gravity: ").unwrap_err();
            assert!(matches!(err, SimError::Tuning(_)));
        }

        #[test]
        fn rejects_zero_gravity() {
            let err = Tuning::from_json_str(r#"{ "gravity": 0.0 }"#).unwrap_err();
            assert!(matches!(err, SimError::InvalidConfig { field: "gravity", .. }));
        }

        #[test]
        fn rejects_bad_probability() {
            let tuning = Tuning {
                mutual_knockdown_chance: 1.5,
                ..Tuning::default()
            };
            assert!(tuning.validate().is_err());
        }
    }
}
