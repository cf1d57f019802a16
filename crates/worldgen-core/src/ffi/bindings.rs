//! Raw FFI surface to the native plate-tectonics solver (spec §6.2).
//!
//! These declarations describe the C ABI exactly as the solver exposes it;
//! nothing here is safe to call directly outside [`super::driver`]. Pointers
//! returned by the solver are read-only snapshots valid until the next
//! `step`/`destroy` call — see [`super::driver::NativePlateDriver::extract`].

use std::ffi::c_void;

/// Opaque handle to a live solver instance.
pub type RawHandle = *mut c_void;

/// Mirrors the solver's per-plate kinematics record exactly, field for
/// field — `#[repr(C)]` so the layout matches what `get_plate_kinematics`
/// writes into the output buffer.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RawPlateKinematics {
    pub plate_id: u32,
    pub velocity_x: f32,
    pub velocity_y: f32,
    pub mass_center_x: f32,
    pub mass_center_y: f32,
}

extern "C" {
    pub fn platec_api_create(
        seed: i32,
        width: u32,
        height: u32,
        sea_level: f32,
        erosion_period: u32,
        folding_ratio: f32,
        aggr_overlap_abs: u32,
        aggr_overlap_rel: f32,
        cycle_count: u32,
        num_plates: u32,
    ) -> RawHandle;

    pub fn platec_api_destroy(handle: RawHandle);

    pub fn platec_api_step(handle: RawHandle);

    pub fn platec_api_is_finished(handle: RawHandle) -> u32;

    pub fn platec_api_get_map_width(handle: RawHandle) -> u32;
    pub fn platec_api_get_map_height(handle: RawHandle) -> u32;

    pub fn platec_api_get_heightmap(handle: RawHandle) -> *const f32;
    pub fn platec_api_get_plates_map(handle: RawHandle) -> *const u32;

    /// Writes up to `*count` entries into `out`, then overwrites `*count`
    /// with the number actually written. A count of 0 on return is the
    /// documented "kinematics missing" quirk (spec §9), not an error.
    pub fn platec_api_get_plate_kinematics(
        handle: RawHandle,
        out: *mut RawPlateKinematics,
        count: *mut u32,
    );
}
