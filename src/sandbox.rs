//! Offline engine implementation.
//!
//! An in-memory [`TurnState`] so the crate runs and tests on native
//! targets without the real game engine. It models the parts of the
//! engine contract the planner depends on: one stationary unit per cell,
//! stationary placement restricted to the friendly half, silent capping
//! of over-budget requests, and authoritative placed counts. Removal
//! requests take effect immediately rather than at end of turn.
//!
//! Every request is appended to an ordered log so tests can assert
//! request sequencing.

use fnv::FnvHashMap;
use log::*;

use crate::config::MatchConfig;
use crate::engine::{ResourceKind, StationaryUnit, TurnState, UnitCost, UnitKind};
use crate::location::Location;

/// One logged engine request.
#[derive(Clone, Debug, PartialEq)]
pub enum Request {
    Spawn {
        kind: UnitKind,
        locations: Vec<Location>,
        placed: u32,
    },
    Upgrade {
        locations: Vec<Location>,
        upgraded: u32,
    },
    Remove {
        locations: Vec<Location>,
        removed: u32,
    },
    Submit,
}

pub struct SandboxState {
    config: MatchConfig,
    board: FnvHashMap<Location, StationaryUnit>,
    structure_points: f32,
    mobile_points: f32,
    requests: Vec<Request>,
    submit_count: u32,
}

impl SandboxState {
    pub fn new(config: MatchConfig, structure_points: f32, mobile_points: f32) -> Self {
        SandboxState {
            config,
            board: FnvHashMap::default(),
            structure_points,
            mobile_points,
            requests: Vec::new(),
            submit_count: 0,
        }
    }

    /// Place a unit directly on the board, bypassing costs and logging.
    /// Test fixture; also usable to seed a board snapshot.
    pub fn insert_unit(&mut self, loc: Location, unit: StationaryUnit) {
        self.board.insert(loc, unit);
    }

    /// Seed a freshly-built (un-upgraded, full-health) unit of `kind`.
    pub fn insert_fresh(&mut self, loc: Location, kind: UnitKind) {
        self.insert_unit(
            loc,
            StationaryUnit {
                kind,
                upgraded: false,
                health: full_health(kind),
                max_health: full_health(kind),
            },
        );
    }

    pub fn set_balances(&mut self, structure_points: f32, mobile_points: f32) {
        self.structure_points = structure_points;
        self.mobile_points = mobile_points;
    }

    pub fn requests(&self) -> &[Request] {
        &self.requests
    }

    pub fn submit_count(&self) -> u32 {
        self.submit_count
    }

    /// Total units of `kind` spawned so far, per the request log.
    pub fn spawned_count(&self, kind: UnitKind) -> u32 {
        self.requests
            .iter()
            .map(|request| match request {
                Request::Spawn {
                    kind: spawned,
                    placed,
                    ..
                } if *spawned == kind => *placed,
                _ => 0,
            })
            .sum()
    }
}

/// Full health per stationary kind. The real engine supplies these; the
/// sandbox only needs values consistent enough for the upkeep policy.
fn full_health(kind: UnitKind) -> f32 {
    match kind {
        UnitKind::Wall => 60.0,
        UnitKind::Support => 30.0,
        UnitKind::Turret => 75.0,
        _ => 0.0,
    }
}

impl TurnState for SandboxState {
    fn resource_balance(&self, kind: ResourceKind) -> f32 {
        match kind {
            ResourceKind::Structure => self.structure_points,
            ResourceKind::Mobile => self.mobile_points,
        }
    }

    fn unit_cost(&self, kind: UnitKind, upgrade: bool) -> UnitCost {
        self.config.cost(kind, upgrade)
    }

    fn stationary_unit_at(&self, loc: Location) -> Option<StationaryUnit> {
        self.board.get(&loc).copied()
    }

    fn request_spawn(&mut self, kind: UnitKind, locs: &[Location], count: u32) -> u32 {
        let cost = self.config.cost(kind, false);
        let mut placed = 0;

        for &loc in locs {
            if kind.is_stationary() {
                if !loc.in_friendly_half() || self.board.contains_key(&loc) {
                    continue;
                }
                if self.structure_points < cost.structure {
                    continue;
                }
                self.structure_points -= cost.structure;
                self.board.insert(
                    loc,
                    StationaryUnit {
                        kind,
                        upgraded: false,
                        health: full_health(kind),
                        max_health: full_health(kind),
                    },
                );
                placed += 1;
            } else {
                if !loc.in_arena() {
                    continue;
                }
                // Mobile units stack; spawn until the batch or the mobile
                // balance runs out.
                for _ in 0..count {
                    if self.mobile_points < cost.mobile {
                        break;
                    }
                    self.mobile_points -= cost.mobile;
                    placed += 1;
                }
            }
        }

        self.requests.push(Request::Spawn {
            kind,
            locations: locs.to_vec(),
            placed,
        });
        placed
    }

    fn request_upgrade(&mut self, locs: &[Location]) -> u32 {
        let mut upgraded = 0;

        for &loc in locs {
            if let Some(unit) = self.board.get_mut(&loc) {
                if unit.upgraded {
                    continue;
                }
                let cost = self.config.cost(unit.kind, true);
                if self.structure_points < cost.structure {
                    continue;
                }
                self.structure_points -= cost.structure;
                unit.upgraded = true;
                upgraded += 1;
            }
        }

        self.requests.push(Request::Upgrade {
            locations: locs.to_vec(),
            upgraded,
        });
        upgraded
    }

    fn request_remove(&mut self, locs: &[Location]) -> u32 {
        let mut removed = 0;

        for &loc in locs {
            if self.board.remove(&loc).is_some() {
                removed += 1;
            }
        }

        self.requests.push(Request::Remove {
            locations: locs.to_vec(),
            removed,
        });
        removed
    }

    fn submit_turn(&mut self) {
        self.submit_count += 1;
        self.requests.push(Request::Submit);
        debug!(
            "[sandbox] turn submitted ({} request(s), structure {:.1}, mobile {:.1} remaining)",
            self.requests.len(),
            self.structure_points,
            self.mobile_points
        );
    }
}
