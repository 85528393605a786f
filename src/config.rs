//! Match configuration.
//!
//! The engine hands over a JSON payload once at match start; everything
//! the planner needs from it is the unit information table: per-kind
//! shorthand identifiers and cost pairs. A malformed or missing table is
//! fatal -- the match cannot proceed without cost data, so errors surface
//! immediately and are never recovered.

use serde::Deserialize;
use thiserror::Error;

use crate::engine::{UnitCost, UnitKind, UNIT_KIND_COUNT};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration payload is not valid JSON: {0}")]
    InvalidPayload(#[from] serde_json::Error),
    #[error("configuration payload has no unit information table")]
    MissingUnitTable,
    #[error("unit information table has {found} entries, expected {expected}")]
    TruncatedUnitTable { expected: usize, found: usize },
}

#[derive(Debug, Deserialize)]
struct RawUnit {
    shorthand: String,
    #[serde(default)]
    cost1: f32,
    #[serde(default)]
    cost2: f32,
    #[serde(default)]
    upgrade: Option<RawUpgrade>,
}

#[derive(Debug, Default, Deserialize)]
struct RawUpgrade {
    #[serde(default)]
    cost1: f32,
    #[serde(default)]
    cost2: f32,
}

/// One row of the unit information table.
#[derive(Clone, Debug)]
pub struct UnitProfile {
    /// The engine's wire identifier for this kind.
    pub shorthand: String,
    pub base: UnitCost,
    /// Increment on top of `base`, not a combined total. Zero for kinds
    /// the engine does not allow upgrading.
    pub upgrade: UnitCost,
}

/// Unit identifiers and cost tables, consumed once at match start.
#[derive(Clone, Debug)]
pub struct MatchConfig {
    units: Vec<UnitProfile>,
}

impl MatchConfig {
    /// Build from the engine's startup payload.
    pub fn from_payload(payload: &serde_json::Value) -> Result<MatchConfig, ConfigError> {
        let table = payload
            .get("unitInformation")
            .ok_or(ConfigError::MissingUnitTable)?;
        let raw: Vec<RawUnit> = serde_json::from_value(table.clone())?;
        if raw.len() < UNIT_KIND_COUNT {
            return Err(ConfigError::TruncatedUnitTable {
                expected: UNIT_KIND_COUNT,
                found: raw.len(),
            });
        }

        let units = raw
            .into_iter()
            .take(UNIT_KIND_COUNT)
            .map(|unit| UnitProfile {
                shorthand: unit.shorthand,
                base: UnitCost {
                    structure: unit.cost1,
                    mobile: unit.cost2,
                },
                upgrade: unit
                    .upgrade
                    .map(|up| UnitCost {
                        structure: up.cost1,
                        mobile: up.cost2,
                    })
                    .unwrap_or_default(),
            })
            .collect();

        Ok(MatchConfig { units })
    }

    /// Build from the raw payload string as received from the engine.
    pub fn from_json(payload: &str) -> Result<MatchConfig, ConfigError> {
        let value: serde_json::Value = serde_json::from_str(payload)?;
        MatchConfig::from_payload(&value)
    }

    pub fn unit(&self, kind: UnitKind) -> &UnitProfile {
        &self.units[kind.table_index()]
    }

    pub fn cost(&self, kind: UnitKind, upgrade: bool) -> UnitCost {
        let profile = self.unit(kind);
        if upgrade {
            profile.upgrade
        } else {
            profile.base
        }
    }
}
