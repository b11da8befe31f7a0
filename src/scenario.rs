//! Scenarios are the what-if cases compared within a project.
use crate::building::BuildingTypeID;
use crate::energy_system::EnergySystemID;
use crate::id::{define_id_getter, define_id_type};
use crate::measure::{MeasureCategory, MeasureID};
use indexmap::IndexMap;
use serde_string_enum::DeserializeLabeledStringEnum;
use strum::Display;

define_id_type! {ScenarioID}

/// A map of [`Scenario`]s, keyed by scenario ID
pub type ScenarioMap = IndexMap<ScenarioID, Scenario>;

/// How the energy cost over a system's lifetime is calculated
#[derive(PartialEq, Eq, Debug, Clone, Copy, Default, DeserializeLabeledStringEnum, Display)]
#[strum(serialize_all = "snake_case")]
pub enum LifetimeEnergyCostMode {
    /// The carrier's projected price is paid in every year
    #[default]
    #[string = "projected_price"]
    ProjectedPrice,
    /// The carrier's current price increases by its annual price increase every year
    #[string = "annual_increase"]
    AnnualIncrease,
}

/// A what-if case assigning energy systems and renovation measures to building types
#[derive(PartialEq, Debug, Clone)]
pub struct Scenario {
    /// Unique identifier for the scenario (e.g. "DEEP_RENO")
    pub id: ScenarioID,
    /// Human-readable name
    pub name: String,
    /// Free-text description
    pub description: String,
    /// How lifetime energy costs are calculated for this scenario
    pub energy_cost_mode: LifetimeEnergyCostMode,
    /// The building types in this scenario and what is done to them
    pub building_types: IndexMap<BuildingTypeID, ScenarioInfo>,
}
define_id_getter! {Scenario, ScenarioID}

/// What a scenario does with one building type
#[derive(PartialEq, Debug, Clone)]
pub struct ScenarioInfo {
    /// The building type
    pub building_type_id: BuildingTypeID,
    /// Number of buildings of this type
    pub building_count: u32,
    /// Annual heating need of one building (kWh/a)
    pub heating_need: f64,
    /// The energy system supplying these buildings, if any
    pub energy_system_id: Option<EnergySystemID>,
    /// The renovation measure selected for each category, if any
    pub measures: IndexMap<MeasureCategory, MeasureID>,
}

impl ScenarioInfo {
    /// Annual heating need of all buildings of this type
    pub fn total_heating_need(&self) -> f64 {
        self.heating_need * f64::from(self.building_count)
    }

    /// Get the measure selected for a category
    pub fn measure_id(&self, category: MeasureCategory) -> Option<&MeasureID> {
        self.measures.get(&category)
    }
}
