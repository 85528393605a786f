//! Fixed defensive layouts and upkeep.
//!
//! Construction rebuilds the same hardcoded turret and wall layout every
//! turn, skipping whatever the chosen attack plan has reserved. The
//! maintenance sweep then condemns anything not worth keeping; freed cells
//! are rebuilt by construction on a later turn rather than repaired in
//! place.

use fnv::FnvHashSet;
use itertools::chain;
use log::*;

use crate::constants::*;
use crate::engine::{ResourceKind, TurnState, UnitKind};
use crate::geometry::rasterize_line;
use crate::location::Location;

// Hardcoded layout tables.
const CRITICAL_TURRETS: [(u32, u32); 4] = [(3, 12), (24, 12), (11, 8), (16, 8)];
const BONUS_TURRETS: [(u32, u32); 4] = [(10, 8), (17, 8), (12, 8), (15, 8)];
// Jagged wall with traps, in priority order: edge caps first, then the
// center line, then the two sloped flanks.
const WALL_SPANS: [((u32, u32), (u32, u32)); 5] = [
    ((0, 13), (3, 13)),
    ((27, 13), (23, 13)),
    ((9, 9), (18, 9)),
    ((4, 12), (8, 8)),
    ((23, 12), (19, 8)),
];
const CORNER_WALL_CAPS: [(u32, u32); 2] = [(0, 13), (27, 13)];
// Central support rows fed by the surplus loop.
const SURPLUS_SUPPORT_SPANS: [((u32, u32), (u32, u32)); 2] =
    [((13, 7), (14, 7)), ((13, 6), (14, 6))];

fn table(cells: &[(u32, u32)]) -> Vec<Location> {
    cells
        .iter()
        .map(|&(x, y)| Location::from_coords(x, y))
        .collect()
}

fn span(from: (u32, u32), to: (u32, u32)) -> Vec<Location> {
    rasterize_line(
        Location::from_coords(from.0, from.1),
        Location::from_coords(to.0, to.1),
    )
}

/// Spawn `kind` at every listed cell outside the reservation set,
/// optionally upgrading the same cells. Returns placements plus upgrades.
fn build(
    state: &mut dyn TurnState,
    cells: &[Location],
    kind: UnitKind,
    upgrade: bool,
    reserved: &FnvHashSet<Location>,
) -> u32 {
    let open: Vec<Location> = cells
        .iter()
        .copied()
        .filter(|cell| !reserved.contains(cell))
        .collect();

    let mut total = state.request_spawn(kind, &open, 1);
    if upgrade {
        total += state.request_upgrade(&open);
    }
    total
}

/// Build the fixed defensive layout in priority order.
pub fn build_core_defenses(state: &mut dyn TurnState, reserved: &FnvHashSet<Location>) {
    let critical_turrets = table(&CRITICAL_TURRETS);
    build(state, &critical_turrets, UnitKind::Turret, true, reserved);

    for &(from, to) in &WALL_SPANS {
        build(state, &span(from, to), UnitKind::Wall, false, reserved);
    }

    let bonus_turrets = table(&BONUS_TURRETS);
    build(state, &bonus_turrets, UnitKind::Turret, false, reserved);

    // Walls worth upgrading: the cell sheltering each critical turret plus
    // the corner caps.
    let critical_walls: Vec<Location> = chain!(
        CRITICAL_TURRETS
            .iter()
            .map(|&(x, y)| Location::from_coords(x, y + 1)),
        CORNER_WALL_CAPS
            .iter()
            .map(|&(x, y)| Location::from_coords(x, y)),
    )
    .filter(|cell| !reserved.contains(cell))
    .collect();
    state.request_upgrade(&critical_walls);

    build(state, &bonus_turrets, UnitKind::Turret, true, reserved);
}

/// Sweep the friendly triangle and condemn any stationary unit that is not
/// both upgraded and at least at the rebuild health ratio. Removal is a
/// request to the engine; rebuilding happens through
/// [`build_core_defenses`] on a later turn.
pub fn maintain_defenses(state: &mut dyn TurnState) {
    let mut condemned = Vec::new();

    for y in 0..HALF_ARENA {
        for x in (HALF_ARENA - 1 - y)..=(HALF_ARENA + y) {
            let cell = Location::from_coords(x as u32, y as u32);
            if let Some(unit) = state.stationary_unit_at(cell) {
                if unit.upgraded && unit.health >= unit.max_health * REBUILD_HEALTH_RATIO {
                    continue;
                }
                condemned.push(cell);
            }
        }
    }

    if !condemned.is_empty() {
        let removed = state.request_remove(&condemned);
        debug!(
            "[upkeep] condemned {} unit(s), {} removed",
            condemned.len(),
            removed
        );
    }
}

/// Convert surplus structure points into upgraded central support rows.
/// Bounded by the iteration cap and a zero-progress break.
pub fn spend_surplus(state: &mut dyn TurnState, reserved: &FnvHashSet<Location>) {
    let rows: Vec<Vec<Location>> = SURPLUS_SUPPORT_SPANS
        .iter()
        .map(|&(from, to)| span(from, to))
        .collect();

    let mut iterations = 0;
    while state.resource_balance(ResourceKind::Structure) > SURPLUS_THRESHOLD {
        iterations += 1;
        let mut placed = 0;
        for row in &rows {
            placed += build(state, row, UnitKind::Support, true, reserved);
        }
        if placed == 0 || iterations >= SURPLUS_ITERATION_CAP {
            break;
        }
    }

    if iterations > 0 {
        debug!("[surplus] ran {} iteration(s)", iterations);
    }
}
