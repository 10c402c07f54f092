//! Range Sanity Checks Applied Before Emission
//!
//! ## Overview
//!
//! Structural decoding proves a unit was well-framed; it says nothing about
//! whether the values make sense. This module holds the per-pipeline
//! validators that run between decoding and the record sink.
//!
//! ## Validation Asymmetry
//!
//! The two pipelines deliberately validate differently:
//!
//! - **Temperature**: both channels must lie inside a configured physical
//!   window, or the whole record is dropped - a reading outside it means a
//!   faulted sensor element, and half a record is worse than none.
//! - **Flow**: no range filter. The deployment has no agreed bounds for flow
//!   or velocity, so every structurally complete record is emitted; only
//!   mathematically invalid values (NaN, infinity) are stopped.
//!
//! Keep the asymmetry unless deployment requirements change; widening the
//! temperature window or adding flow bounds is configuration, not code.

mod flow;
mod temperature;
pub mod utils;

pub use flow::FlowValidator;
pub use temperature::TemperatureValidator;

use crate::errors::ValidationResult;

/// A sanity check applied to decoded values before emission
///
/// Validators are pure and synchronous; they run in the decode path and
/// must not block or allocate.
pub trait Validator {
    /// Type of value this validator checks
    type Value;

    /// Accept or reject a decoded value
    fn validate(&self, value: Self::Value) -> ValidationResult<()>;
}
