//! FFI boundary to the native plate-tectonics solver (spec §4.1, §6.2).

mod bindings;
mod driver;

pub use driver::{CancelToken, NativePlateDriver, NativePlateOutput, PlateKinematics};
