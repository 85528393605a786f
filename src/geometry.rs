//! Lattice geometry for plan construction.
//!
//! Plans are defined as straight segments between grid points and, for the
//! right-side variants, a horizontal reflection of the left-side tables.
//! Both operations run once at plan construction.

use crate::constants::*;
use crate::location::Location;

/// Rasterize the straight segment between two lattice points.
///
/// Steps along whichever axis has the larger |delta| (ties step in x) and
/// derives the other axis proportionally, producing `max(|dx|,|dy|)+1`
/// points with both endpoints included. The minor axis rounds
/// half-away-from-zero (`f64::round`); any reimplementation of these
/// tables must use the same mode or the plan geometry will not line up.
/// Coincident endpoints yield the single starting point.
pub fn rasterize_line(from: Location, to: Location) -> Vec<Location> {
    let (x0, y0) = (from.x() as i32, from.y() as i32);
    let (x1, y1) = (to.x() as i32, to.y() as i32);
    let dx = x1 - x0;
    let dy = y1 - y0;

    let major = dx.abs().max(dy.abs());
    if major == 0 {
        return vec![from];
    }

    let mut points = Vec::with_capacity(major as usize + 1);
    if dx.abs() >= dy.abs() {
        let step_sign = if dx >= 0 { 1 } else { -1 };
        for step in 0..=dx.abs() {
            let x = x0 + step * step_sign;
            let y = (dy as f64 * step as f64 / dx.abs() as f64).round() as i32 + y0;
            points.push(Location::from_coords(x as u32, y as u32));
        }
    } else {
        let step_sign = if dy >= 0 { 1 } else { -1 };
        for step in 0..=dy.abs() {
            let y = y0 + step * step_sign;
            let x = (dx as f64 * step as f64 / dy.abs() as f64).round() as i32 + x0;
            points.push(Location::from_coords(x as u32, y as u32));
        }
    }
    points
}

/// Reflect a single coordinate across the arena's vertical centerline.
pub fn mirror_point(loc: Location) -> Location {
    Location::from_coords((ARENA_SIZE - 1 - loc.x()) as u32, loc.y() as u32)
}

/// Reflect a sequence of coordinates across the arena's vertical
/// centerline. Applying this twice returns the original sequence.
pub fn mirror_horizontal(locs: &[Location]) -> Vec<Location> {
    locs.iter().copied().map(mirror_point).collect()
}
