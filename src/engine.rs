//! Boundary types for the external game engine.
//!
//! The planner never talks to the engine directly; everything it needs is
//! expressed through the [`TurnState`] trait. Implementations exist for
//! both live play (the hosting process wrapping the real engine) and
//! offline use (the [`crate::sandbox`] module).

use serde::{Deserialize, Serialize};

use crate::location::Location;

/// The engine's unit vocabulary, in unit-information-table order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitKind {
    Wall,
    Support,
    Turret,
    Scout,
    Demolisher,
    Interceptor,
}

pub const UNIT_KIND_COUNT: usize = 6;

impl UnitKind {
    /// Position of this kind in the engine's unit information table.
    pub fn table_index(self) -> usize {
        match self {
            UnitKind::Wall => 0,
            UnitKind::Support => 1,
            UnitKind::Turret => 2,
            UnitKind::Scout => 3,
            UnitKind::Demolisher => 4,
            UnitKind::Interceptor => 5,
        }
    }

    /// Stationary kinds occupy a board cell; mobile kinds traverse it.
    pub fn is_stationary(self) -> bool {
        matches!(self, UnitKind::Wall | UnitKind::Support | UnitKind::Turret)
    }
}

/// The two per-turn resource pools.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    /// Gates stationary builds.
    Structure,
    /// Gates mobile-unit deployment.
    Mobile,
}

/// A (structure, mobile) price pair.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UnitCost {
    pub structure: f32,
    pub mobile: f32,
}

/// Engine-reported snapshot of a stationary unit on the board.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StationaryUnit {
    pub kind: UnitKind,
    pub upgraded: bool,
    pub health: f32,
    pub max_health: f32,
}

/// One turn's view of the arena, plus the request sink for that turn.
///
/// Read queries are pure against the turn snapshot. Mutating requests are
/// fire-and-forget: the engine silently caps anything over budget and the
/// returned count of units actually placed/upgraded/removed is
/// authoritative. [`TurnState::submit_turn`] must be called exactly once
/// per turn, after all planning completes.
pub trait TurnState {
    fn resource_balance(&self, kind: ResourceKind) -> f32;

    /// Price of a unit kind. With `upgrade` set, the pair is the upgrade
    /// increment on top of the base price, not a combined total.
    fn unit_cost(&self, kind: UnitKind, upgrade: bool) -> UnitCost;

    fn stationary_unit_at(&self, loc: Location) -> Option<StationaryUnit>;

    /// Attempt to spawn `count` units of `kind` at each listed cell.
    fn request_spawn(&mut self, kind: UnitKind, locs: &[Location], count: u32) -> u32;

    /// Attempt to upgrade the stationary unit at each listed cell.
    fn request_upgrade(&mut self, locs: &[Location]) -> u32;

    /// Request removal of the stationary unit at each listed cell.
    fn request_remove(&mut self, locs: &[Location]) -> u32;

    /// Finalize and transmit this turn's accumulated requests.
    fn submit_turn(&mut self);
}
