//! Temperature validator for the probe's accepted window
//!
//! The probe reports two channels per frame; a reading outside the accepted
//! window means a disconnected or faulted element, so the whole record is
//! dropped rather than uploading one good channel.

use crate::{
    constants::probe::{TEMP_ACCEPT_MAX_C, TEMP_ACCEPT_MIN_C},
    errors::ValidationResult,
};

use super::{utils, Validator};

/// Range validator for probe channel temperatures in °C
#[derive(Debug, Clone)]
pub struct TemperatureValidator {
    /// Minimum accepted temperature in Celsius
    min_c: f32,

    /// Maximum accepted temperature in Celsius
    max_c: f32,
}

impl Default for TemperatureValidator {
    fn default() -> Self {
        Self {
            min_c: TEMP_ACCEPT_MIN_C,
            max_c: TEMP_ACCEPT_MAX_C,
        }
    }
}

impl TemperatureValidator {
    /// Create a validator with custom limits
    pub fn new_with_limits(min: f32, max: f32) -> Self {
        // Sanity check: can't have min > max
        let (min, max) = if min > max { (max, min) } else { (min, max) };
        Self { min_c: min, max_c: max }
    }

    /// Check both channels of a reading; either failing rejects the pair
    pub fn validate_pair(&self, t1: f32, t2: f32) -> ValidationResult<()> {
        self.validate(t1)?;
        self.validate(t2)
    }

    /// Minimum accepted temperature
    pub fn min_c(&self) -> f32 {
        self.min_c
    }

    /// Maximum accepted temperature
    pub fn max_c(&self) -> f32 {
        self.max_c
    }
}

impl Validator for TemperatureValidator {
    type Value = f32;

    fn validate(&self, value: Self::Value) -> ValidationResult<()> {
        utils::check_finite(value)?;
        utils::check_range(value, self.min_c, self.max_c)
    }
}
