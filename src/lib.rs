pub mod config;
pub mod constants;
pub mod defense;
pub mod engine;
pub mod geometry;
pub mod location;
pub mod orchestrator;
pub mod plans;
pub mod sandbox;

pub use config::{ConfigError, MatchConfig, UnitProfile};
pub use engine::{ResourceKind, StationaryUnit, TurnState, UnitCost, UnitKind};
pub use location::Location;
pub use orchestrator::TurnOrchestrator;
pub use plans::{default_plans, AttackPlan, Evaluation, GutterRush, PlanDescriptor, REGISTERED_PLANS};
pub use sandbox::SandboxState;
