//! Common types and utilities shared across the forecast grid loader crates.
//!
//! - Coordinate stepping and grid traversal
//! - Hourly forecast data model
//! - Forecast record validation
//! - Error taxonomy

pub mod coordinate;
pub mod error;
pub mod forecast;
pub mod grid;
pub mod validation;

pub use coordinate::{Coordinate, KM_PER_DEGREE};
pub use error::{ErrorKind, LoaderError, LoaderResult, ValidationError};
pub use forecast::{Condition, ForecastBatch, ForecastEntry};
pub use grid::{GridParameters, GridWalker};
pub use validation::validate;
