//! Learning hyperparameters

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Learning rate, discount factor and exploration rate of a learner.
///
/// Stored next to the table when a model is saved, but independent of it:
/// a table can be loaded and then driven with different values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hyperparameters {
    /// α, in (0, 1]
    #[serde(alias = "lr")]
    pub learning_rate: f64,
    /// γ, in [0, 1)
    #[serde(alias = "gamma")]
    pub discount_factor: f64,
    /// ε, in [0, 1]
    pub epsilon: f64,
}

impl Hyperparameters {
    pub fn new(learning_rate: f64, discount_factor: f64, epsilon: f64) -> Result<Self> {
        let params = Self {
            learning_rate,
            discount_factor,
            epsilon,
        };
        params.validate()?;
        Ok(params)
    }

    /// Check every parameter lies in its admissible interval.
    ///
    /// NaN fails every comparison and is therefore rejected.
    pub fn validate(&self) -> Result<()> {
        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return Err(Error::InvalidHyperparameter {
                name: "learning rate",
                value: self.learning_rate,
                expected: "a value in (0, 1]",
            });
        }
        if !(self.discount_factor >= 0.0 && self.discount_factor < 1.0) {
            return Err(Error::InvalidHyperparameter {
                name: "discount factor",
                value: self.discount_factor,
                expected: "a value in [0, 1)",
            });
        }
        validate_epsilon(self.epsilon)
    }
}

pub(crate) fn validate_epsilon(epsilon: f64) -> Result<()> {
    if (0.0..=1.0).contains(&epsilon) {
        Ok(())
    } else {
        Err(Error::InvalidHyperparameter {
            name: "exploration rate",
            value: epsilon,
            expected: "a value in [0, 1]",
        })
    }
}

impl Default for Hyperparameters {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            discount_factor: 0.95,
            epsilon: 0.1,
        }
    }
}
