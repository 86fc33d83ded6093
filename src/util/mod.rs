//! Utility types shared by the codec.
//!
//! - [`Error`] / [`Result`] - Error handling
//! - Math type re-exports from glam and the engine's fixed-point types
//! - [`coords`] - conversion between host and engine coordinate systems

mod error;
mod math;
pub mod coords;

pub use error::*;
pub use math::*;
