//! Attack plans.
//!
//! A plan owns precomputed geometry (derived once at construction) and a
//! per-turn feasibility/cost evaluation. Plans are stateless across turns:
//! everything transient lives in the [`Evaluation`] returned by
//! [`AttackPlan::evaluate`] and is threaded back into
//! [`AttackPlan::commit`] explicitly.

pub mod gutter;

pub use gutter::GutterRush;

use uuid::Uuid;

use crate::engine::TurnState;
use crate::location::Location;

/// Result of one feasibility evaluation. Board state changes every turn,
/// so evaluations are recomputed per turn and never cached.
#[derive(Clone, Debug, Default)]
pub struct Evaluation {
    pub feasible: bool,
    pub structure_cost: f32,
    pub mobile_cost: f32,
    /// Wall cells promoted to support structures by the bonus-conversion
    /// pass, in wall-path order.
    pub conversions: Vec<Location>,
}

impl Evaluation {
    /// An infeasible result; cost fields are zero and irrelevant.
    pub fn infeasible() -> Self {
        Evaluation::default()
    }
}

/// A scripted offensive maneuver the orchestrator can arbitrate between.
pub trait AttackPlan {
    /// Stable identity of this registration. Distinct per registry row,
    /// so the anti-repeat heuristic can compare choices across turns.
    fn id(&self) -> Uuid;

    fn name(&self) -> &str;

    /// Check obstruction and affordability against the current turn state.
    fn evaluate(&self, state: &dyn TurnState) -> Evaluation;

    /// Lane cells the plan claims for the current turn when chosen.
    fn reserve_cells(&self) -> &[Location];

    /// Issue this plan's placement and launch requests. Only called with
    /// the feasible evaluation produced this turn.
    fn commit(&self, state: &mut dyn TurnState, evaluation: &Evaluation);
}

/// One row of the plan registry.
pub struct PlanDescriptor {
    pub id: Uuid,
    pub name: &'static str,
    /// Reflect the left-side geometry across the arena centerline.
    pub mirrored: bool,
    /// Demolisher-led launch instead of scout-only.
    pub heavy: bool,
}

/// The registered plan variants.
///
/// The heavy right-side rush is registered twice under distinct ids: the
/// arbitration draw is uniform over registrations, so the duplicate row
/// doubles that variant's draw weight.
pub const REGISTERED_PLANS: &[PlanDescriptor] = &[
    PlanDescriptor {
        id: Uuid::from_u128(0x8c40_1b6e_2a5d_4e91_b3f7_60c8_d4a1_7e25u128),
        name: "gutter-left",
        mirrored: false,
        heavy: false,
    },
    PlanDescriptor {
        id: Uuid::from_u128(0x31fa_9d02_75c4_4b88_a1e6_4f0b_92d7_c85au128),
        name: "gutter-right",
        mirrored: true,
        heavy: false,
    },
    PlanDescriptor {
        id: Uuid::from_u128(0xe7b2_48c1_063f_4d7a_9c55_1da8_30b6_f49cu128),
        name: "gutter-right-heavy",
        mirrored: true,
        heavy: true,
    },
    PlanDescriptor {
        id: Uuid::from_u128(0x5d98_e3b7_c12a_406d_8f20_7b4e_a95c_613fu128),
        name: "gutter-right-heavy-b",
        mirrored: true,
        heavy: true,
    },
];

/// Instantiate one gutter rush per registered descriptor.
pub fn default_plans() -> Vec<Box<dyn AttackPlan>> {
    REGISTERED_PLANS
        .iter()
        .map(|descriptor| Box::new(GutterRush::new(descriptor)) as Box<dyn AttackPlan>)
        .collect()
}
