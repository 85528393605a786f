pub const ARENA_SIZE: u8 = 28;
pub const HALF_ARENA: u8 = 14;

/// Structure points the planner prefers to keep in hand after committing an
/// attack; drives the bonus-conversion heuristic.
pub const STRUCTURE_RESERVE: f32 = 6.0;

/// Structure balance above which the surplus-spending loop keeps running.
pub const SURPLUS_THRESHOLD: f32 = 20.0;

/// Hard cap on surplus-spending iterations within a single turn.
pub const SURPLUS_ITERATION_CAP: u32 = 10;

/// Fraction of max health below which an upgraded defensive unit is torn
/// down and rebuilt rather than left standing.
pub const REBUILD_HEALTH_RATIO: f32 = 0.9;

/// Mobile-point price of the demolisher-led launch.
pub const HEAVY_LAUNCH_COST: f32 = 15.0;

/// Mobile-point price of the scout-only launch.
pub const LIGHT_LAUNCH_COST: f32 = 16.0;

/// Demolishers launched ahead of the scoring scouts in the heavy variant.
pub const HEAVY_DEMOLISHER_BATCH: u32 = 4;

/// Scouts launched at the secondary cell in the light variant.
pub const LIGHT_SECONDARY_BATCH: u32 = 8;

/// Oversized batch size used to mean "as many as the mobile balance allows";
/// the engine caps the actual spawn count.
pub const MAX_BATCH: u32 = 100;
