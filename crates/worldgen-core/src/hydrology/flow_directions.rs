//! Steepest-descent D-8 flow direction encoding (spec §4.7.1).

use crate::grid::Grid;

/// `0..7 = N, NE, E, SE, S, SW, W, NW`; offsets `(dx, dy)` in grid space
/// (`y` increasing south). Index order is also the tie-break order:
/// the lowest index wins among equally steep candidates.
pub const OFFSETS: [(i64, i64); 8] =
    [(0, -1), (1, -1), (1, 0), (1, 1), (0, 1), (-1, 1), (-1, 0), (-1, -1)];

const SINK: i8 = -1;

/// Compute flow directions over the filled heightmap `filled`. Ocean cells
/// are always terminal (`-1`).
pub fn compute(filled: &Grid<f32>, ocean: &Grid<bool>) -> Grid<i8> {
    let width = filled.width();
    let height = filled.height();
    let mut dirs = Grid::new(width, height, SINK);

    for y in 0..height {
        for x in 0..width {
            if *ocean.get(x, y) {
                continue;
            }

            let here = *filled.get(x, y);
            let mut best_dir: i8 = SINK;
            let mut best_slope = 0.0f32;

            for (i, &(dx, dy)) in OFFSETS.iter().enumerate() {
                let nx = x as i64 + dx;
                let ny = y as i64 + dy;
                if !filled.in_bounds(nx, ny) {
                    continue;
                }
                let (nx, ny) = (nx as usize, ny as usize);
                let there = *filled.get(nx, ny);
                if there >= here {
                    continue;
                }
                let d = if dx != 0 && dy != 0 { std::f32::consts::SQRT_2 } else { 1.0 };
                let slope = (here - there) / d;
                if best_dir == SINK || slope > best_slope {
                    best_dir = i as i8;
                    best_slope = slope;
                }
            }

            dirs.set(x, y, best_dir);
        }
    }

    dirs
}

/// Resolve the downstream neighbour of `(x, y)` given its flow direction,
/// or `None` if it is terminal.
pub fn downstream(dirs: &Grid<i8>, x: usize, y: usize) -> Option<(usize, usize)> {
    let dir = *dirs.get(x, y);
    if dir < 0 {
        return None;
    }
    let (dx, dy) = OFFSETS[dir as usize];
    let nx = x as i64 + dx;
    let ny = y as i64 + dy;
    if !dirs.in_bounds(nx, ny) {
        return None;
    }
    Some((nx as usize, ny as usize))
}
