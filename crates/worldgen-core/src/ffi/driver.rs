//! Safe wrapper around the native plate-tectonics solver (spec §4.1).
//!
//! The native library is not re-entrant (spec §5): only one [`Handle`] may
//! exist process-wide at a time. [`NativePlateDriver::run`] acquires a
//! process-wide mutex for the duration of create→step→extract→destroy and
//! releases it (and the native handle) on every exit path, including an
//! early return through `?`.

use std::sync::{Mutex, OnceLock};

use tracing::{debug, warn};

use super::bindings::{self, RawHandle};
use crate::error::ErrorKind;
use crate::grid::Grid;
use crate::params::GenerationParams;

/// Safety cap on solver steps (spec §4.1): failing to finish within this
/// many steps is `ErrorKind::NativeDidNotConverge`, not an infinite loop.
const MAX_STEPS: u32 = 10_000;

/// How often the step loop checks the cancellation token and logs progress.
const STEP_LOG_INTERVAL: u32 = 500;

fn global_lock() -> &'static Mutex<()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
}

/// RAII handle to a live solver instance. `destroy` runs in `Drop`, so the
/// handle is released on every exit path — including panics unwinding
/// through this scope. Never cloned, never stored beyond one
/// [`NativePlateDriver::run`] call.
struct Handle(RawHandle);

impl Drop for Handle {
    fn drop(&mut self) {
        if !self.0.is_null() {
            unsafe { bindings::platec_api_destroy(self.0) };
        }
    }
}

/// One plate's kinematic summary (spec §3).
#[derive(Debug, Clone, Copy)]
pub struct PlateKinematics {
    pub plate_id: u32,
    pub velocity_unit: (f32, f32),
    pub velocity_magnitude: f32,
    pub mass_center: (f32, f32),
}

/// Owned output of one solver run, copied out of native memory (spec §4.1:
/// never retains pointers into native memory beyond `extract`).
pub struct NativePlateOutput {
    pub heightmap: Grid<f32>,
    pub plates: Grid<u32>,
    pub kinematics: Vec<PlateKinematics>,
}

/// Optional cooperative cancellation, checked at coarse granularity inside
/// the native step loop (spec §5).
pub trait CancelToken {
    fn is_cancelled(&self) -> bool;
}

impl<F: Fn() -> bool> CancelToken for F {
    fn is_cancelled(&self) -> bool {
        self()
    }
}

pub struct NativePlateDriver;

impl NativePlateDriver {
    /// Run the native solver to completion and copy its outputs into owned
    /// grids. Acquires the process-wide native-library lock for the whole
    /// call.
    pub fn run(
        params: &GenerationParams,
        cancel: Option<&dyn CancelToken>,
    ) -> Result<NativePlateOutput, ErrorKind> {
        let _guard = global_lock()
            .lock()
            .map_err(|_| ErrorKind::native_create_failed("process-wide plate-tectonics lock poisoned"))?;

        let handle = Self::create(params)?;
        Self::run_to_completion(&handle, cancel)?;
        Self::extract(&handle, params)
    }

    fn create(params: &GenerationParams) -> Result<Handle, ErrorKind> {
        let raw = unsafe {
            bindings::platec_api_create(
                params.seed as i32,
                params.width,
                params.height,
                params.sea_level,
                params.erosion_period,
                params.folding_ratio,
                params.aggr_overlap_abs,
                params.aggr_overlap_rel,
                params.cycle_count,
                params.plate_count,
            )
        };
        if raw.is_null() {
            return Err(ErrorKind::native_create_failed(format!(
                "platec_api_create returned null for seed={} {}x{}",
                params.seed, params.width, params.height
            )));
        }
        Ok(Handle(raw))
    }

    fn run_to_completion(handle: &Handle, cancel: Option<&dyn CancelToken>) -> Result<(), ErrorKind> {
        for step in 0..MAX_STEPS {
            if unsafe { bindings::platec_api_is_finished(handle.0) } != 0 {
                return Ok(());
            }
            if step % STEP_LOG_INTERVAL == 0 {
                debug!(step, "plate-tectonics solver stepping");
                if let Some(c) = cancel {
                    if c.is_cancelled() {
                        return Err(ErrorKind::cancelled("cancelled during native plate-tectonics step loop"));
                    }
                }
            }
            unsafe { bindings::platec_api_step(handle.0) };
        }
        Err(ErrorKind::native_did_not_converge(format!(
            "solver did not finish within {MAX_STEPS} steps"
        )))
    }

    fn extract(handle: &Handle, params: &GenerationParams) -> Result<NativePlateOutput, ErrorKind> {
        let w = unsafe { bindings::platec_api_get_map_width(handle.0) } as usize;
        let h = unsafe { bindings::platec_api_get_map_height(handle.0) } as usize;
        if w != params.width as usize || h != params.height as usize {
            return Err(ErrorKind::native_create_failed(format!(
                "solver grid {w}x{h} does not match requested {}x{}",
                params.width, params.height
            )));
        }
        let n = w * h;

        let height_ptr = unsafe { bindings::platec_api_get_heightmap(handle.0) };
        if height_ptr.is_null() {
            return Err(ErrorKind::native_create_failed("solver returned null heightmap"));
        }
        let heightmap_data = unsafe { std::slice::from_raw_parts(height_ptr, n) }.to_vec();

        let plates_ptr = unsafe { bindings::platec_api_get_plates_map(handle.0) };
        if plates_ptr.is_null() {
            return Err(ErrorKind::native_create_failed("solver returned null plate map"));
        }
        let plates_data = unsafe { std::slice::from_raw_parts(plates_ptr, n) }.to_vec();

        let kinematics = Self::extract_kinematics(handle, params.plate_count);

        Ok(NativePlateOutput {
            heightmap: Grid::from_vec(w, h, heightmap_data),
            plates: Grid::from_vec(w, h, plates_data),
            kinematics,
        })
    }

    /// Batched single-call kinematics fetch (spec §4.1). Tolerates the
    /// known quirk where the solver reports zero plates even after a
    /// successful run: that is logged once and surfaced as an empty slice,
    /// never as an error (spec §9).
    fn extract_kinematics(handle: &Handle, plate_count: u32) -> Vec<PlateKinematics> {
        let mut raw = vec![
            bindings::RawPlateKinematics {
                plate_id: 0,
                velocity_x: 0.0,
                velocity_y: 0.0,
                mass_center_x: 0.0,
                mass_center_y: 0.0,
            };
            plate_count as usize
        ];
        let mut count = raw.len() as u32;
        unsafe {
            bindings::platec_api_get_plate_kinematics(handle.0, raw.as_mut_ptr(), &mut count as *mut u32);
        }

        if count == 0 {
            warn!("native solver returned zero plate kinematics (known quirk); continuing with empty slice");
            return Vec::new();
        }

        raw.into_iter()
            .take(count as usize)
            .map(|r| {
                let magnitude = (r.velocity_x * r.velocity_x + r.velocity_y * r.velocity_y).sqrt();
                let unit = if magnitude > f32::EPSILON {
                    (r.velocity_x / magnitude, r.velocity_y / magnitude)
                } else {
                    (0.0, 0.0)
                };
                PlateKinematics {
                    plate_id: r.plate_id,
                    velocity_unit: unit,
                    velocity_magnitude: magnitude,
                    mass_center: (r.mass_center_x, r.mass_center_y),
                }
            })
            .collect()
    }
}
