
//! Unit algebra: scale factors with rational exponent vectors over a
//! registry of dimension categories.

pub mod dimension;
pub mod unit;

#[cfg(test)]
pub(crate) mod test_utils;

pub use dimension::{BaseDimension, DimensionRegistry, UnitDisplay, UnknownDimensionError};
pub use unit::{Unit, DivisionByZeroExponentError, DEFAULT_TOLERANCE};
