use serde::{Deserialize, Serialize};

use crate::error::DeliveryError;

/// Configuration for the iterative uniformity solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UniformConfig {
    max_iter: usize,
    tol: f64,
    step_scale: f64,
    accelerated: bool,
}

impl Default for UniformConfig {
    fn default() -> Self {
        Self {
            max_iter: 50_000,
            tol: 1e-6,
            step_scale: 0.95,
            accelerated: true,
        }
    }
}

impl UniformConfig {
    /// Creates a config with the given budget and tolerance.
    ///
    /// # Errors
    ///
    /// Returns an error if `max_iter` is zero or `tol` is not a positive
    /// finite number.
    pub fn new(max_iter: usize, tol: f64) -> Result<Self, DeliveryError> {
        let config = Self {
            max_iter,
            tol,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Sets the multiplier step as a fraction of the stable maximum.
    ///
    /// # Errors
    ///
    /// Returns an error unless `0 < step_scale < 1`.
    pub fn with_step_scale(mut self, step_scale: f64) -> Result<Self, DeliveryError> {
        self.step_scale = step_scale;
        self.validate()?;
        Ok(self)
    }

    /// Enables or disables Nesterov momentum on the multiplier updates.
    #[must_use]
    pub fn with_acceleration(mut self, accelerated: bool) -> Self {
        self.accelerated = accelerated;
        self
    }

    /// Checks all fields; deserialized configs are not validated on load.
    ///
    /// # Errors
    ///
    /// Returns the first invalid field.
    pub fn validate(&self) -> Result<(), DeliveryError> {
        if self.max_iter == 0 {
            return Err(DeliveryError::InvalidConfig {
                reason: "max_iter must be at least 1",
            });
        }
        if !self.tol.is_finite() || self.tol <= 0.0 {
            return Err(DeliveryError::InvalidConfig {
                reason: "tol must be finite and positive",
            });
        }
        if !self.step_scale.is_finite() || self.step_scale <= 0.0 || self.step_scale >= 1.0 {
            return Err(DeliveryError::InvalidConfig {
                reason: "step_scale must lie in (0, 1)",
            });
        }
        Ok(())
    }

    /// Returns the iteration budget.
    #[must_use]
    pub fn max_iter(&self) -> usize {
        self.max_iter
    }

    /// Returns the convergence tolerance.
    #[must_use]
    pub fn tol(&self) -> f64 {
        self.tol
    }

    /// Returns the multiplier step scale.
    #[must_use]
    pub fn step_scale(&self) -> f64 {
        self.step_scale
    }

    /// Returns whether momentum is enabled.
    #[must_use]
    pub fn accelerated(&self) -> bool {
        self.accelerated
    }
}
