//! Deterministic procedural world generation: plate tectonics, elevation
//! post-processing, climate, and hydrology, composed into one pipeline.
//!
//! [`generate`] is the single public entry point; everything else is
//! exposed for testing and for consumers that need a single phase in
//! isolation (e.g. a visualizer driving only the elevation stage).

pub mod climate;
pub mod elevation;
pub mod error;
pub mod ffi;
pub mod generator;
pub mod grid;
pub mod hydrology;
pub mod noise;
pub mod params;

pub use error::ErrorKind;
pub use generator::{generate, WorldGenerationResult};
pub use grid::Grid;
pub use params::GenerationParams;
