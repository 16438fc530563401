//! Straight-corridor reference environment.
//!
//! A deliberately small stand-in for the car playground: the car moves at
//! constant speed along a corridor, steering deltas rotate its heading, and
//! the episode ends when it touches a side wall or crosses the goal line.

use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    ports::{Environment, StepResult},
    types::{EpisodeOutcome, SensorState},
};

/// Reward for every step the car survives.
pub const STEP_REWARD: f64 = 1.0;
/// Reward for crossing the goal line.
pub const GOAL_REWARD: f64 = 10.0;
/// Reward for touching a wall.
pub const CRASH_REWARD: f64 = -10.0;

/// Geometry and dynamics of a [`CorridorTrack`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorridorConfig {
    /// Distance between the side walls
    pub width: f64,
    /// Distance from the start line to the goal line
    pub length: f64,
    /// Distance travelled per step
    pub speed: f64,
    /// Heading change in degrees per degree of steering
    pub turn_gain: f64,
    /// Heading limit in degrees (either side of straight ahead)
    pub max_heading: f64,
    /// Initial heading is drawn from `[-initial_heading, initial_heading]`
    pub initial_heading: f64,
}

impl Default for CorridorConfig {
    fn default() -> Self {
        Self {
            width: 16.0,
            length: 60.0,
            speed: 1.0,
            turn_gain: 0.25,
            max_heading: 60.0,
            initial_heading: 30.0,
        }
    }
}

impl CorridorConfig {
    fn validate(&self) -> Result<()> {
        let positive = [
            ("width", self.width),
            ("length", self.length),
            ("speed", self.speed),
            ("max_heading", self.max_heading),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::InvalidConfiguration {
                    message: format!("corridor {name} must be positive, got {value}"),
                });
            }
        }
        if !self.turn_gain.is_finite() {
            return Err(Error::InvalidConfiguration {
                message: format!("corridor turn_gain must be finite, got {}", self.turn_gain),
            });
        }
        if !(self.initial_heading >= 0.0 && self.initial_heading <= self.max_heading) {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "corridor initial_heading must lie in [0, {}], got {}",
                    self.max_heading, self.initial_heading
                ),
            });
        }
        Ok(())
    }
}

/// Car in a straight corridor.
///
/// Coordinates: `x` runs from the left wall (0) to the right wall (`width`),
/// `y` from the start line (0) to the goal line (`length`). Heading is in
/// degrees, positive to the right.
///
/// Sensors: front is the distance along the heading to the first wall or the
/// goal line; right and left are perpendicular wall clearances.
#[derive(Debug, Clone)]
pub struct CorridorTrack {
    config: CorridorConfig,
    x: f64,
    y: f64,
    heading: f64,
    rng: StdRng,
}

impl CorridorTrack {
    pub fn new(config: CorridorConfig, seed: u64) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            x: config.width / 2.0,
            y: 0.0,
            heading: 0.0,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    pub fn config(&self) -> &CorridorConfig {
        &self.config
    }

    pub fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    pub fn heading(&self) -> f64 {
        self.heading
    }

    fn sense(&self) -> SensorState {
        let (sin, cos) = self.heading.to_radians().sin_cos();
        let to_goal = (self.config.length - self.y) / cos;
        let to_wall = if sin > 0.0 {
            (self.config.width - self.x) / sin
        } else if sin < 0.0 {
            self.x / -sin
        } else {
            f64::INFINITY
        };
        SensorState::new(
            to_goal.min(to_wall).max(0.0),
            (self.config.width - self.x).max(0.0),
            self.x.max(0.0),
        )
    }
}

impl Environment for CorridorTrack {
    fn reset(&mut self) -> Result<SensorState> {
        let spread = self.config.initial_heading;
        self.heading = if spread > 0.0 {
            self.rng.random_range(-spread..=spread)
        } else {
            0.0
        };
        self.x = self.config.width / 2.0;
        self.y = 0.0;
        Ok(self.sense())
    }

    fn step(&mut self, action: i32) -> Result<StepResult> {
        let limit = self.config.max_heading;
        self.heading =
            (self.heading + f64::from(action) * self.config.turn_gain).clamp(-limit, limit);

        let (sin, cos) = self.heading.to_radians().sin_cos();
        self.x += self.config.speed * sin;
        self.y += self.config.speed * cos;

        let (reward, outcome) = if self.x <= 0.0 || self.x >= self.config.width {
            (CRASH_REWARD, Some(EpisodeOutcome::Crashed))
        } else if self.y >= self.config.length {
            (GOAL_REWARD, Some(EpisodeOutcome::ReachedGoal))
        } else {
            (STEP_REWARD, None)
        };

        Ok(StepResult {
            next_state: self.sense(),
            reward,
            outcome,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn straight_track() -> CorridorTrack {
        let config = CorridorConfig {
            initial_heading: 0.0,
            ..CorridorConfig::default()
        };
        CorridorTrack::new(config, 0).unwrap()
    }

    #[test]
    fn test_reset_centers_car() {
        let mut track = straight_track();
        let state = track.reset().unwrap();
        assert_eq!(state.right(), 8.0);
        assert_eq!(state.left(), 8.0);
        assert_eq!(state.front(), 60.0);
    }

    #[test]
    fn test_driving_straight_reaches_goal() {
        let mut track = straight_track();
        track.reset().unwrap();

        let mut last = None;
        for _ in 0..60 {
            let result = track.step(0).unwrap();
            last = Some(result);
            if result.outcome.is_some() {
                break;
            }
        }
        let result = last.unwrap();
        assert_eq!(result.outcome, Some(EpisodeOutcome::ReachedGoal));
        assert_eq!(result.reward, GOAL_REWARD);
    }

    #[test]
    fn test_hard_right_crashes() {
        let mut track = straight_track();
        track.reset().unwrap();

        let outcome = (0..60)
            .map(|_| track.step(40).unwrap())
            .find_map(|result| result.outcome);
        assert_eq!(outcome, Some(EpisodeOutcome::Crashed));
        assert!(track.position().0 >= 16.0);
    }

    #[test]
    fn test_heading_is_clamped() {
        let mut track = straight_track();
        track.reset().unwrap();
        track.step(-40).unwrap();
        track.step(-40).unwrap();
        assert!(track.heading() >= -60.0);
        assert_eq!(track.heading(), -20.0);
    }

    #[test]
    fn test_front_sensor_sees_wall_when_turned() {
        let mut track = straight_track();
        track.reset().unwrap();
        let result = track.step(40).unwrap();
        // heading 10 degrees right: side wall is closer than the goal line
        assert!(result.next_state.front() < 60.0);
        assert!(result.next_state.right() < result.next_state.left());
    }

    #[test]
    fn test_rejects_non_finite_turn_gain() {
        for turn_gain in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let config = CorridorConfig {
                turn_gain,
                ..CorridorConfig::default()
            };
            assert!(matches!(
                CorridorTrack::new(config, 0),
                Err(Error::InvalidConfiguration { .. })
            ));
        }

        let inverted = CorridorConfig {
            turn_gain: -0.25,
            ..CorridorConfig::default()
        };
        assert!(CorridorTrack::new(inverted, 0).is_ok());
    }

    #[test]
    fn test_rejects_bad_geometry() {
        let config = CorridorConfig {
            width: 0.0,
            ..CorridorConfig::default()
        };
        assert!(CorridorTrack::new(config, 0).is_err());
    }
}
