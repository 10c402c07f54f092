//! Flow validator - structural sanity only
//!
//! The flow pipeline carries no range filter: every structurally complete
//! record is emitted. Only values that are not numbers at all are stopped,
//! which the line parser can produce from pathological tokens that overflow
//! to infinity.

use crate::errors::ValidationResult;

use super::{utils, Validator};

/// Pass-through validator for flow and velocity readings
#[derive(Debug, Clone, Copy, Default)]
pub struct FlowValidator;

impl FlowValidator {
    /// Check both fields of a record; either failing rejects it
    pub fn validate_record(&self, flow: f32, velocity: f32) -> ValidationResult<()> {
        self.validate(flow)?;
        self.validate(velocity)
    }
}

impl Validator for FlowValidator {
    type Value = f32;

    fn validate(&self, value: Self::Value) -> ValidationResult<()> {
        utils::check_finite(value)
    }
}
