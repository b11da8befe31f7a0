//! Energy systems supply heat to building types, either with one unit per building or from a
//! central plant.
use crate::curve::CostCurve;
use crate::energy_carrier::EnergyCarrierID;
use crate::error::EngineError;
use crate::id::{define_id_getter, define_id_type};
use indexmap::IndexMap;
use serde_string_enum::DeserializeLabeledStringEnum;
use std::str::FromStr;
use strum::{Display, EnumIter};

define_id_type! {EnergySystemID}

/// A map of [`EnergySystem`]s, keyed by energy system ID
pub type EnergySystemMap = IndexMap<EnergySystemID, EnergySystem>;

/// Cost curves for an energy system, keyed by the part of the system and the kind of cost
pub type CostCurveMap = IndexMap<(CurveScale, CostCategory), CostCurve>;

/// How an energy system is arranged
#[derive(PartialEq, Eq, Debug, Clone, Copy, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum SystemCategory {
    /// One plant serving many buildings through a network, plus a substation in each building
    Centralized,
    /// One unit per building
    Decentralized,
    /// The system has no cost of its own (e.g. the existing system is kept)
    None,
}

impl FromStr for SystemCategory {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "centralized" => Ok(Self::Centralized),
            "decentralized" => Ok(Self::Decentralized),
            "none" => Ok(Self::None),
            other => Err(EngineError::UnknownSystemCategory(other.to_string())),
        }
    }
}

/// The part of an energy system a cost curve applies to
#[derive(
    PartialEq, Eq, Debug, Clone, Copy, Hash, DeserializeLabeledStringEnum, Display, EnumIter,
)]
#[strum(serialize_all = "snake_case")]
pub enum CurveScale {
    /// The unit installed in each building (the whole system, for decentralised systems)
    #[string = "substation"]
    Substation,
    /// Central fuel or heat intake
    #[string = "intake"]
    Intake,
    /// Central heat generation
    #[string = "generation"]
    Generation,
    /// The distribution network
    #[string = "circulation"]
    Circulation,
}

impl CurveScale {
    /// Whether this part belongs to the central plant
    pub fn is_centralized(&self) -> bool {
        !matches!(self, Self::Substation)
    }
}

/// The kind of cost described by a cost curve
#[derive(
    PartialEq, Eq, Debug, Clone, Copy, Hash, DeserializeLabeledStringEnum, Display, EnumIter,
)]
#[strum(serialize_all = "snake_case")]
pub enum CostCategory {
    /// Investment cost
    #[string = "investment"]
    Investment,
    /// Annual maintenance cost
    #[string = "maintenance"]
    Maintenance,
    /// Embodied emissions (kg CO2-eq)
    #[string = "embodied"]
    Embodied,
}

/// A heat-supply system which can be assigned to building types
#[derive(PartialEq, Debug, Clone)]
pub struct EnergySystem {
    /// Unique identifier for the energy system (e.g. "GAS_BOILER")
    pub id: EnergySystemID,
    /// Human-readable name
    pub name: String,
    /// How the system is arranged
    pub category: SystemCategory,
    /// Efficiency of the system (for centralised systems, of the central plant)
    pub efficiency: f64,
    /// Coefficient of performance (for heat pumps; 1 otherwise)
    pub cop: f64,
    /// Lifetime in years
    pub lifetime: u32,
    /// The energy carrier consumed by the system
    pub energy_carrier_id: EnergyCarrierID,
    /// Cost, maintenance and embodied-emissions curves
    pub cost_curves: CostCurveMap,
}
define_id_getter! {EnergySystem, EnergySystemID}

impl EnergySystem {
    /// Get the cost curve for a part of the system, if there is one
    pub fn cost_curve(&self, scale: CurveScale, category: CostCategory) -> Option<&CostCurve> {
        self.cost_curves.get(&(scale, category))
    }

    /// Check that the system can be sized and costed
    pub fn check_valid(&self) -> Result<(), EngineError> {
        let invalid = |reason: &str| EngineError::InvalidEnergySystem {
            system_id: self.id.clone(),
            reason: reason.to_string(),
        };

        if self.energy_carrier_id.is_empty() {
            return Err(invalid("no energy carrier given"));
        }
        if self.lifetime == 0 {
            return Err(invalid("lifetime must be greater than zero"));
        }
        if !(self.efficiency.is_finite() && self.efficiency > 0.0) {
            return Err(invalid("efficiency must be a finite number greater than zero"));
        }

        Ok(())
    }
}
