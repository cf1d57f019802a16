//! Priority-Flood pit filling with preserved-basin extraction (spec
//! §4.7.2).

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet};

use crate::grid::Grid;

/// A basin surviving the min-area/min-depth filter, exported as a lake.
#[derive(Debug, Clone)]
pub struct PreservedBasin {
    pub basin_id: u32,
    pub cells: Vec<(usize, usize)>,
    pub surface_elevation: f32,
    pub area: u32,
    pub center: (f32, f32),
}

/// Heap entry for the flood fill. Ordered by `(elevation, y, x)` so ties at
/// equal elevation break lexicographically on `(y, x)` — a deterministic
/// total order, independent of hash/insertion order.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PriorityFloodEntry {
    elevation: f32,
    y: usize,
    x: usize,
}

impl Eq for PriorityFloodEntry {}

impl PartialOrd for PriorityFloodEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PriorityFloodEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.elevation
            .partial_cmp(&other.elevation)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(self.y.cmp(&other.y))
            .then(self.x.cmp(&other.x))
    }
}

pub struct PitFillResult {
    pub filled: Grid<f32>,
    pub basins: Vec<PreservedBasin>,
}

/// Tie-breaking gradient applied to resolve flats (see [`resolve_flats`]).
/// Kept far below any realistic elevation gap between data points: the
/// largest possible bump on an `N`-cell grid is `FLAT_EPSILON`, spread over
/// the flood's pop order.
const FLAT_EPSILON: f32 = 1e-4;

/// Run Priority-Flood over `hf`, seeded from every ocean cell, preserving
/// basins whose area and depth meet the given thresholds.
pub fn fill(
    hf: &Grid<f32>,
    ocean: &Grid<bool>,
    min_basin_area: u32,
    min_basin_depth: f32,
) -> PitFillResult {
    let width = hf.width();
    let height = hf.height();
    let mut filled = hf.clone();
    let mut visited = Grid::new(width, height, false);
    let mut heap: BinaryHeap<Reverse<PriorityFloodEntry>> = BinaryHeap::new();

    // Pop order of the flood, used by `resolve_flats` to break elevation
    // ties deterministically along the direction water actually arrived
    // from — i.e. back towards the ocean or preserved-basin outlet.
    let mut order = Grid::new(width, height, 0u32);
    let mut seq = 0u32;

    for y in 0..height {
        for x in 0..width {
            if *ocean.get(x, y) {
                visited.set(x, y, true);
                heap.push(Reverse(PriorityFloodEntry { elevation: *hf.get(x, y), y, x }));
            }
        }
    }

    // Raised cells (H' > H) form candidate basins once the flood completes;
    // connected-component labeling over this marker grid recovers them.
    let mut raised = Grid::new(width, height, false);

    while let Some(Reverse(entry)) = heap.pop() {
        let (x, y) = (entry.x, entry.y);
        order.set(x, y, seq);
        seq += 1;
        let spill = *filled.get(x, y);

        for (dx, dy) in [(0i64, -1i64), (0, 1), (-1, 0), (1, 0), (-1, -1), (1, -1), (-1, 1), (1, 1)] {
            let nx = x as i64 + dx;
            let ny = y as i64 + dy;
            if !hf.in_bounds(nx, ny) {
                continue;
            }
            let (nx, ny) = (nx as usize, ny as usize);
            if *visited.get(nx, ny) {
                continue;
            }
            visited.set(nx, ny, true);
            let original = *hf.get(nx, ny);
            let new_elev = original.max(spill);
            filled.set(nx, ny, new_elev);
            if new_elev > original {
                raised.set(nx, ny, true);
            }
            heap.push(Reverse(PriorityFloodEntry { elevation: new_elev, y: ny, x: nx }));
        }
    }

    let basins = extract_basins(hf, &filled, &raised, min_basin_area, min_basin_depth);
    resolve_flats(&mut filled, ocean, &order, &basins);

    PitFillResult { filled, basins }
}

/// Breaks ties on every flat plateau the flood produced so D8 steepest
/// descent (which requires a *strictly* lower neighbour) always finds one,
/// except at ocean cells and inside preserved basins.
///
/// The flood visits cells in non-decreasing elevation order; a cell's flood
/// parent (the neighbour it was pushed from) therefore always has an equal
/// or lower elevation and a strictly earlier pop order. Adding a tiny
/// monotone function of pop order to every non-preserved, non-ocean cell
/// turns that implicit parent chain into an explicit downhill gradient:
/// every cell ends up strictly higher than its parent, without disturbing
/// the relative order of cells whose original elevations already differed.
/// Preserved basins are left untouched so their surface stays a single flat
/// `surface_elevation`, per spec.
fn resolve_flats(filled: &mut Grid<f32>, ocean: &Grid<bool>, order: &Grid<u32>, basins: &[PreservedBasin]) {
    let width = filled.width();
    let height = filled.height();
    if width == 0 || height == 0 {
        return;
    }

    let mut preserved = HashSet::new();
    for basin in basins {
        for &cell in &basin.cells {
            preserved.insert(cell);
        }
    }

    let total_cells = (width * height) as f32;
    for y in 0..height {
        for x in 0..width {
            if *ocean.get(x, y) || preserved.contains(&(x, y)) {
                continue;
            }
            let bump = FLAT_EPSILON * (*order.get(x, y) as f32 / total_cells);
            filled.set(x, y, *filled.get(x, y) + bump);
        }
    }
}

/// 4-connected component labeling over `raised`, filtered by the
/// area/depth preservation criteria (spec §4.7.2 steps 4-5). Basin IDs are
/// assigned in raster-scan discovery order.
fn extract_basins(
    original: &Grid<f32>,
    filled: &Grid<f32>,
    raised: &Grid<bool>,
    min_basin_area: u32,
    min_basin_depth: f32,
) -> Vec<PreservedBasin> {
    let width = raised.width();
    let height = raised.height();
    let mut seen: HashSet<(usize, usize)> = HashSet::new();
    let mut basins = Vec::new();
    let mut next_id = 0u32;

    for y0 in 0..height {
        for x0 in 0..width {
            if !*raised.get(x0, y0) || seen.contains(&(x0, y0)) {
                continue;
            }

            let mut stack = vec![(x0, y0)];
            let mut component = Vec::new();
            seen.insert((x0, y0));
            while let Some((x, y)) = stack.pop() {
                component.push((x, y));
                for (dx, dy) in [(0i64, -1i64), (0, 1), (-1, 0), (1, 0)] {
                    let nx = x as i64 + dx;
                    let ny = y as i64 + dy;
                    if !raised.in_bounds(nx, ny) {
                        continue;
                    }
                    let (nx, ny) = (nx as usize, ny as usize);
                    if *raised.get(nx, ny) && seen.insert((nx, ny)) {
                        stack.push((nx, ny));
                    }
                }
            }

            let surface_elevation =
                component.iter().map(|&(x, y)| *filled.get(x, y)).fold(f32::NEG_INFINITY, f32::max);
            let min_floor =
                component.iter().map(|&(x, y)| *original.get(x, y)).fold(f32::INFINITY, f32::min);
            let depth = surface_elevation - min_floor;
            let area = component.len() as u32;

            if area >= min_basin_area && depth >= min_basin_depth {
                let (sum_x, sum_y) = component
                    .iter()
                    .fold((0.0f32, 0.0f32), |(sx, sy), &(x, y)| (sx + x as f32, sy + y as f32));
                let center = (sum_x / area as f32, sum_y / area as f32);
                basins.push(PreservedBasin {
                    basin_id: next_id,
                    cells: component,
                    surface_elevation,
                    area,
                    center,
                });
                next_id += 1;
            }
        }
    }

    basins
}
