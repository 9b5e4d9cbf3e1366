//! Simulation tuning.
//!
//! The allocation tax, per-slot capacities, capability thresholds and slot
//! priority are empirical constants. They live here as named defaults and can
//! be overridden from a JSON file with [`load_config_from_path`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::capability::ScoringSlot;

/// Fraction of a team's level coral lost when sharing the reef with partners.
pub const EFFICIENCY_TAX: f64 = 0.15;
/// Per-slot cap when building combined alliance scores.
pub const LEVEL_CAPACITY: f64 = 12.0;
/// Per-level bar for the coral rank point checks.
pub const RANK_POINT_LEVEL_CAPACITY: f64 = 5.0;
/// Levels at the bar required for the cooperative coral rank point.
pub const COOP_LEVELS_REQUIRED: usize = 3;
/// Alliance endgame points needed for the barge rank point.
pub const BARGE_THRESHOLD: f64 = 14.0;

/// Slot walk order when allocating alliance game pieces.
pub const DEFAULT_PRIORITY: [ScoringSlot; 5] = [
    ScoringSlot::L4,
    ScoringSlot::L3,
    ScoringSlot::Net,
    ScoringSlot::L2,
    ScoringSlot::L1,
];

/// Minimum fraction of matches in which a team must perform an action to count as capable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapabilityThresholds {
    /// Applies to L4, L3 and L2.
    pub upper_levels: f64,
    pub l1: f64,
    pub net: f64,
}

impl Default for CapabilityThresholds {
    fn default() -> Self {
        Self {
            upper_levels: 0.10,
            l1: 0.25,
            net: 0.15,
        }
    }
}

impl CapabilityThresholds {
    pub fn for_slot(&self, slot: ScoringSlot) -> f64 {
        match slot {
            ScoringSlot::L4 | ScoringSlot::L3 | ScoringSlot::L2 => self.upper_levels,
            ScoringSlot::L1 => self.l1,
            ScoringSlot::Net => self.net,
        }
    }
}

/// Teleoperated points per game piece in each slot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointValues {
    pub l4: f64,
    pub l3: f64,
    pub l2: f64,
    pub l1: f64,
    pub net: f64,
}

impl Default for PointValues {
    fn default() -> Self {
        Self {
            l4: 5.0,
            l3: 4.0,
            l2: 3.0,
            l1: 2.0,
            net: 4.0,
        }
    }
}

impl PointValues {
    pub fn for_slot(&self, slot: ScoringSlot) -> f64 {
        match slot {
            ScoringSlot::L4 => self.l4,
            ScoringSlot::L3 => self.l3,
            ScoringSlot::L2 => self.l2,
            ScoringSlot::L1 => self.l1,
            ScoringSlot::Net => self.net,
        }
    }
}

/// Everything the outcome simulator and rank point estimator can be tuned by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub efficiency_tax: f64,
    pub level_capacity: f64,
    pub rank_point_level_capacity: f64,
    pub coop_levels_required: usize,
    pub barge_threshold: f64,
    pub priority: Vec<ScoringSlot>,
    pub thresholds: CapabilityThresholds,
    pub point_values: PointValues,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            efficiency_tax: EFFICIENCY_TAX,
            level_capacity: LEVEL_CAPACITY,
            rank_point_level_capacity: RANK_POINT_LEVEL_CAPACITY,
            coop_levels_required: COOP_LEVELS_REQUIRED,
            barge_threshold: BARGE_THRESHOLD,
            priority: DEFAULT_PRIORITY.to_vec(),
            thresholds: CapabilityThresholds::default(),
            point_values: PointValues::default(),
        }
    }
}

/// Load a simulation config from JSON. Missing keys keep their defaults.
pub fn load_config_from_path(path: &Path) -> std::io::Result<SimulationConfig> {
    let raw = std::fs::read_to_string(path)?;
    serde_json::from_str::<SimulationConfig>(&raw).map_err(|e| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("failed to parse simulation config JSON: {e}"),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let cfg = SimulationConfig::default();
        assert_eq!(cfg.efficiency_tax, 0.15);
        assert_eq!(cfg.level_capacity, 12.0);
        assert_eq!(cfg.rank_point_level_capacity, 5.0);
        assert_eq!(cfg.barge_threshold, 14.0);
        assert_eq!(cfg.thresholds.for_slot(ScoringSlot::L3), 0.10);
        assert_eq!(cfg.thresholds.for_slot(ScoringSlot::L1), 0.25);
        assert_eq!(cfg.point_values.for_slot(ScoringSlot::Net), 4.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let cfg: SimulationConfig =
            serde_json::from_str(r#"{"efficiency_tax": 0.2, "thresholds": {"l1": 0.5}}"#).unwrap();
        assert_eq!(cfg.efficiency_tax, 0.2);
        assert_eq!(cfg.thresholds.l1, 0.5);
        assert_eq!(cfg.thresholds.upper_levels, 0.10);
        assert_eq!(cfg.priority, DEFAULT_PRIORITY.to_vec());
    }

    #[test]
    fn test_load_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"barge_threshold": 20, "priority": ["l4", "net", "l1"]}}"#).unwrap();
        let cfg = load_config_from_path(file.path()).unwrap();
        assert_eq!(cfg.barge_threshold, 20.0);
        assert_eq!(
            cfg.priority,
            vec![ScoringSlot::L4, ScoringSlot::Net, ScoringSlot::L1]
        );
    }

    #[test]
    fn test_load_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = load_config_from_path(file.path()).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
    }
}
