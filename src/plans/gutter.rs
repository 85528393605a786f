//! The gutter lane rush.
//!
//! Walls off a diagonal corridor along one arena edge, buffs it with
//! upgraded supports near the centerline, then floods the corridor with
//! mobile units. The left-side geometry is the source of truth; right-side
//! variants mirror it at construction.

use itertools::Itertools;
use log::*;
use uuid::Uuid;

use crate::constants::*;
use crate::engine::{ResourceKind, TurnState, UnitKind};
use crate::geometry::{mirror_horizontal, mirror_point, rasterize_line};
use crate::location::Location;
use crate::plans::{AttackPlan, Evaluation, PlanDescriptor};

// Left-side source tables. Spans are rasterized and deduplicated at
// construction (adjacent spans share their junction cells).
const WALL_SPANS: [((u32, u32), (u32, u32)); 3] =
    [((14, 2), (3, 13)), ((14, 2), (16, 4)), ((16, 4), (18, 4))];
const LANE_SPANS: [((u32, u32), (u32, u32)); 2] = [((14, 0), (17, 3)), ((13, 0), (1, 12))];
const BUFF_SPAN: ((u32, u32), (u32, u32)) = ((13, 7), (14, 7));

const LAUNCH_PRIMARY: (u32, u32) = (17, 3);
const LAUNCH_SECONDARY: (u32, u32) = (12, 1);
const SCORING_CELL: (u32, u32) = (17, 3);
const DEMOLISHER_CELL: (u32, u32) = (8, 5);

fn span_cells(spans: &[((u32, u32), (u32, u32))]) -> Vec<Location> {
    spans
        .iter()
        .flat_map(|&((x0, y0), (x1, y1))| {
            rasterize_line(
                Location::from_coords(x0, y0),
                Location::from_coords(x1, y1),
            )
        })
        .unique()
        .collect()
}

pub struct GutterRush {
    id: Uuid,
    name: &'static str,
    heavy: bool,
    lane_path: Vec<Location>,
    wall_path: Vec<Location>,
    buff_region: Vec<Location>,
    launch_primary: Location,
    launch_secondary: Location,
    scoring_cell: Location,
    demolisher_cell: Location,
}

impl GutterRush {
    pub fn new(descriptor: &PlanDescriptor) -> Self {
        let wall_path = span_cells(&WALL_SPANS);
        let floor = span_cells(&LANE_SPANS);

        // The rush traverses the corridor floor and the row above it; both
        // must stay clear.
        let lane_path: Vec<Location> = floor
            .iter()
            .copied()
            .chain(
                floor
                    .iter()
                    .map(|cell| Location::from_coords(cell.x() as u32, cell.y() as u32 + 1)),
            )
            .unique()
            .collect();

        let mut plan = GutterRush {
            id: descriptor.id,
            name: descriptor.name,
            heavy: descriptor.heavy,
            lane_path,
            wall_path,
            buff_region: span_cells(&[BUFF_SPAN]),
            launch_primary: Location::from_coords(LAUNCH_PRIMARY.0, LAUNCH_PRIMARY.1),
            launch_secondary: Location::from_coords(LAUNCH_SECONDARY.0, LAUNCH_SECONDARY.1),
            scoring_cell: Location::from_coords(SCORING_CELL.0, SCORING_CELL.1),
            demolisher_cell: Location::from_coords(DEMOLISHER_CELL.0, DEMOLISHER_CELL.1),
        };

        if descriptor.mirrored {
            plan.lane_path = mirror_horizontal(&plan.lane_path);
            plan.wall_path = mirror_horizontal(&plan.wall_path);
            plan.buff_region = mirror_horizontal(&plan.buff_region);
            plan.launch_primary = mirror_point(plan.launch_primary);
            plan.launch_secondary = mirror_point(plan.launch_secondary);
            plan.scoring_cell = mirror_point(plan.scoring_cell);
            plan.demolisher_cell = mirror_point(plan.demolisher_cell);
        }

        plan
    }

    pub fn lane_path(&self) -> &[Location] {
        &self.lane_path
    }

    pub fn wall_path(&self) -> &[Location] {
        &self.wall_path
    }
}

impl AttackPlan for GutterRush {
    fn id(&self) -> Uuid {
        self.id
    }

    fn name(&self) -> &str {
        self.name
    }

    fn evaluate(&self, state: &dyn TurnState) -> Evaluation {
        // Anything stationary on the lane kills the rush outright.
        for &cell in &self.lane_path {
            if state.stationary_unit_at(cell).is_some() {
                debug!(
                    "[{}] lane blocked at ({}, {})",
                    self.name,
                    cell.x(),
                    cell.y()
                );
                return Evaluation::infeasible();
            }
        }

        let support_base = state.unit_cost(UnitKind::Support, false).structure;
        let support_upgrade = state.unit_cost(UnitKind::Support, true).structure;
        let wall_base = state.unit_cost(UnitKind::Wall, false).structure;

        let mut structure_cost = 0.0;
        for &cell in &self.buff_region {
            match state.stationary_unit_at(cell) {
                None => structure_cost += support_base + support_upgrade,
                Some(unit) if !unit.upgraded => structure_cost += support_upgrade,
                Some(_) => {}
            }
        }
        for &cell in &self.wall_path {
            if state.stationary_unit_at(cell).is_none() {
                structure_cost += wall_base;
            }
        }

        let mobile_cost = if self.heavy {
            HEAVY_LAUNCH_COST
        } else {
            LIGHT_LAUNCH_COST
        };
        let feasible = state.resource_balance(ResourceKind::Mobile) >= mobile_cost
            && state.resource_balance(ResourceKind::Structure) >= structure_cost;

        // Bonus conversion: while committing would leave less than the
        // reserve in hand, promote empty wall cells to supports. Each
        // promotion adds the support price on top of the wall price
        // already counted, so the committed spend grows; one wall cell is
        // examined per iteration whether or not it converts.
        let mut conversions = Vec::new();
        if feasible {
            let structure_balance = state.resource_balance(ResourceKind::Structure);
            let mut examined = 0;
            while structure_cost > structure_balance - STRUCTURE_RESERVE
                && examined < self.wall_path.len()
            {
                let site = self.wall_path[examined];
                if state.stationary_unit_at(site).is_none() {
                    conversions.push(site);
                    structure_cost += support_base;
                }
                examined += 1;
            }
        }

        Evaluation {
            feasible,
            structure_cost,
            mobile_cost,
            conversions,
        }
    }

    fn reserve_cells(&self) -> &[Location] {
        &self.lane_path
    }

    fn commit(&self, state: &mut dyn TurnState, evaluation: &Evaluation) {
        state.request_spawn(UnitKind::Support, &self.buff_region, 1);
        state.request_upgrade(&self.buff_region);
        if !evaluation.conversions.is_empty() {
            state.request_spawn(UnitKind::Support, &evaluation.conversions, 1);
        }
        state.request_spawn(UnitKind::Wall, &self.wall_path, 1);

        if self.heavy {
            state.request_spawn(
                UnitKind::Demolisher,
                &[self.demolisher_cell],
                HEAVY_DEMOLISHER_BATCH,
            );
            state.request_spawn(UnitKind::Scout, &[self.scoring_cell], MAX_BATCH);
        } else {
            state.request_spawn(
                UnitKind::Scout,
                &[self.launch_secondary],
                LIGHT_SECONDARY_BATCH,
            );
            state.request_spawn(UnitKind::Scout, &[self.launch_primary], MAX_BATCH);
        }

        info!(
            "[{}] committed ({} conversion(s), structure {:.1}, mobile {:.1})",
            self.name,
            evaluation.conversions.len(),
            evaluation.structure_cost,
            evaluation.mobile_cost
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MatchConfig;
    use crate::sandbox::{Request, SandboxState};
    use serde_json::json;

    fn config() -> MatchConfig {
        MatchConfig::from_payload(&json!({
            "unitInformation": [
                { "shorthand": "FF", "cost1": 2.0 },
                { "shorthand": "EF", "cost1": 4.0, "upgrade": { "cost1": 4.0 } },
                { "shorthand": "DF", "cost1": 3.0, "upgrade": { "cost1": 5.0 } },
                { "shorthand": "PI", "cost2": 1.0 },
                { "shorthand": "EI", "cost2": 3.0 },
                { "shorthand": "SI", "cost2": 1.0 },
            ]
        }))
        .unwrap()
    }

    fn plan(index: usize) -> GutterRush {
        GutterRush::new(&crate::plans::REGISTERED_PLANS[index])
    }

    fn loc(x: u32, y: u32) -> Location {
        Location::from_coords(x, y)
    }

    // Distinct wall cells across the three spans: 12 + 3 + 3 minus the two
    // shared junction cells.
    const WALL_CELLS: usize = 16;

    #[test]
    fn empty_board_light_plan_costs() {
        let state = SandboxState::new(config(), 60.0, 20.0);
        let evaluation = plan(0).evaluate(&state);

        assert!(evaluation.feasible);
        assert_eq!(evaluation.mobile_cost, 16.0);
        // Two empty buff cells at (4 + 4) each, plus a wall per empty cell.
        assert_eq!(
            evaluation.structure_cost,
            2.0 * 8.0 + WALL_CELLS as f32 * 2.0
        );
        assert!(evaluation.conversions.is_empty());
    }

    #[test]
    fn heavy_plan_mobile_cost() {
        let state = SandboxState::new(config(), 100.0, 20.0);
        let evaluation = plan(2).evaluate(&state);
        assert!(evaluation.feasible);
        assert_eq!(evaluation.mobile_cost, 15.0);
    }

    #[test]
    fn occupied_lane_cell_is_infeasible() {
        let mut state = SandboxState::new(config(), 1000.0, 1000.0);
        state.insert_fresh(loc(12, 1), UnitKind::Wall);

        let evaluation = plan(0).evaluate(&state);
        assert!(!evaluation.feasible);
        assert_eq!(evaluation.structure_cost, 0.0);
        assert_eq!(evaluation.mobile_cost, 0.0);
    }

    #[test]
    fn prebuilt_wall_cell_reduces_cost_by_wall_price() {
        let gutter = plan(0);
        let baseline = SandboxState::new(config(), 60.0, 20.0);
        let base_cost = gutter.evaluate(&baseline).structure_cost;

        let mut prebuilt = SandboxState::new(config(), 60.0, 20.0);
        prebuilt.insert_fresh(gutter.wall_path()[3], UnitKind::Wall);
        let reduced_cost = gutter.evaluate(&prebuilt).structure_cost;

        assert_eq!(reduced_cost, base_cost - 2.0);
    }

    #[test]
    fn upgraded_buff_cells_cost_nothing() {
        let gutter = plan(0);
        let mut state = SandboxState::new(config(), 60.0, 20.0);
        for &cell in &gutter.buff_region {
            state.insert_unit(
                cell,
                crate::engine::StationaryUnit {
                    kind: UnitKind::Support,
                    upgraded: true,
                    health: 30.0,
                    max_health: 30.0,
                },
            );
        }

        let evaluation = gutter.evaluate(&state);
        assert_eq!(evaluation.structure_cost, WALL_CELLS as f32 * 2.0);
    }

    #[test]
    fn tight_balance_converts_every_empty_wall_cell() {
        // Base cost 48; balance 50 leaves less than the 6-point reserve,
        // so the pass sweeps the whole wall path.
        let state = SandboxState::new(config(), 50.0, 20.0);
        let evaluation = plan(0).evaluate(&state);

        assert!(evaluation.feasible);
        assert_eq!(evaluation.conversions.len(), WALL_CELLS);
        assert_eq!(evaluation.structure_cost, 48.0 + WALL_CELLS as f32 * 4.0);
    }

    #[test]
    fn single_empty_wall_cell_converts_exactly_once() {
        let gutter = plan(0);
        let mut state = SandboxState::new(config(), 7.0, 20.0);
        // Buff region satisfied, every wall cell built except one.
        for &cell in &gutter.buff_region {
            state.insert_unit(
                cell,
                crate::engine::StationaryUnit {
                    kind: UnitKind::Support,
                    upgraded: true,
                    health: 30.0,
                    max_health: 30.0,
                },
            );
        }
        // The junction cell shared with the lane is the one wall cell that
        // cannot be prebuilt without obstructing the rush.
        let open_cell = loc(17, 4);
        assert!(gutter.lane_path().contains(&open_cell));
        for &cell in gutter.wall_path() {
            if cell != open_cell {
                state.insert_fresh(cell, UnitKind::Wall);
            }
        }

        let evaluation = gutter.evaluate(&state);
        assert!(evaluation.feasible);
        // Base cost is the one wall (2.0); 2.0 > 7.0 - 6.0 triggers the
        // pass, and only the open cell converts: one site, one support
        // price added.
        assert_eq!(evaluation.conversions, vec![open_cell]);
        assert_eq!(evaluation.structure_cost, 2.0 + 4.0);
    }

    #[test]
    fn mirrored_variant_reflects_geometry() {
        let left = plan(0);
        let right = plan(1);

        assert_eq!(
            right.lane_path().to_vec(),
            mirror_horizontal(left.lane_path())
        );
        assert_eq!(right.launch_primary, loc(10, 3));
        assert_eq!(right.demolisher_cell, loc(19, 5));
        // The buff span sits astride the centerline; mirroring permutes it.
        let mut mirrored_buff = right.buff_region.clone();
        mirrored_buff.sort_by_key(|cell| cell.packed_repr());
        let mut left_buff = left.buff_region.clone();
        left_buff.sort_by_key(|cell| cell.packed_repr());
        assert_eq!(mirrored_buff, left_buff);
    }

    #[test]
    fn commit_orders_requests_and_launches_light() {
        let gutter = plan(0);
        let mut state = SandboxState::new(config(), 60.0, 20.0);
        let evaluation = gutter.evaluate(&state);
        gutter.commit(&mut state, &evaluation);

        let kinds: Vec<&Request> = state.requests().iter().collect();
        assert!(matches!(
            kinds[0],
            Request::Spawn {
                kind: UnitKind::Support,
                ..
            }
        ));
        assert!(matches!(kinds[1], Request::Upgrade { .. }));
        assert!(matches!(
            kinds[2],
            Request::Spawn {
                kind: UnitKind::Wall,
                ..
            }
        ));
        // Light launch: the small secondary batch, then the max batch.
        assert!(matches!(
            kinds[3],
            Request::Spawn {
                kind: UnitKind::Scout,
                placed: 8,
                ..
            }
        ));
        // 20 mobile points at 1 each: 8 spent, the rest capped to 12.
        assert!(matches!(
            kinds[4],
            Request::Spawn {
                kind: UnitKind::Scout,
                placed: 12,
                ..
            }
        ));
    }

    #[test]
    fn commit_heavy_launches_demolishers_then_scouts() {
        let gutter = plan(2);
        let mut state = SandboxState::new(config(), 100.0, 15.0);
        let evaluation = gutter.evaluate(&state);
        gutter.commit(&mut state, &evaluation);

        // 15 mobile points: 4 demolishers at 3 each, then 3 scouts at 1.
        assert_eq!(state.spawned_count(UnitKind::Demolisher), 4);
        assert_eq!(state.spawned_count(UnitKind::Scout), 3);
    }

    #[test]
    fn conversion_sites_receive_supports_before_walls() {
        let gutter = plan(0);
        let mut state = SandboxState::new(config(), 50.0, 20.0);
        let evaluation = gutter.evaluate(&state);
        assert!(!evaluation.conversions.is_empty());

        gutter.commit(&mut state, &evaluation);
        let first_site = evaluation.conversions[0];
        let unit = state.stationary_unit_at(first_site).unwrap();
        assert_eq!(unit.kind, UnitKind::Support);
    }
}
