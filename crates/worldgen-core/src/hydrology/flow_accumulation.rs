//! Topological flow accumulation over the D-8 flow direction field (spec
//! §4.7.3).

use std::collections::VecDeque;

use crate::grid::Grid;
use crate::hydrology::flow_directions::{downstream, OFFSETS};

/// Compute `A[y,x]`, the total contribution routed through each cell, for
/// per-cell source term `source`. Passing a uniform `1.0` grid yields plain
/// cell-count accumulation; passing precipitation yields `A_precip`.
pub fn compute(dirs: &Grid<i8>, source: &Grid<f32>) -> Grid<f32> {
    let width = dirs.width();
    let height = dirs.height();
    let mut accum = Grid::new(width, height, 0.0f32);
    let mut indeg = Grid::new(width, height, 0u32);

    for y in 0..height {
        for x in 0..width {
            let dir = *dirs.get(x, y);
            if dir < 0 {
                continue;
            }
            let (dx, dy) = OFFSETS[dir as usize];
            let nx = x as i64 + dx;
            let ny = y as i64 + dy;
            if dirs.in_bounds(nx, ny) {
                let (nx, ny) = (nx as usize, ny as usize);
                indeg.set(nx, ny, *indeg.get(nx, ny) + 1);
            }
        }
    }

    let mut queue = VecDeque::new();
    for y in 0..height {
        for x in 0..width {
            if *indeg.get(x, y) == 0 {
                queue.push_back((x, y));
            }
        }
    }

    while let Some((x, y)) = queue.pop_front() {
        let contribution = *source.get(x, y);
        accum.set(x, y, *accum.get(x, y) + contribution);

        if let Some((dx, dy)) = downstream(dirs, x, y) {
            accum.set(dx, dy, *accum.get(dx, dy) + *accum.get(x, y));
            let remaining = indeg.get(dx, dy).saturating_sub(1);
            indeg.set(dx, dy, remaining);
            if remaining == 0 {
                queue.push_back((dx, dy));
            }
        }
    }

    accum
}
