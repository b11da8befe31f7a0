//! The project represents the static input data provided by the user.
use crate::building::BuildingTypeMap;
use crate::energy_carrier::EnergyCarrierMap;
use crate::energy_system::EnergySystemMap;
use crate::measure::BuildingMeasureMap;
use crate::scenario::{Scenario, ScenarioID, ScenarioMap};
use std::path::PathBuf;

pub mod parameters;
pub use parameters::{MeasureAggregation, ProjectParameters, ValidationConfig};

/// Project definition
#[derive(Debug, Clone)]
pub struct Project {
    /// Path to project folder
    pub project_path: PathBuf,
    /// Parameters from the project TOML file
    pub parameters: ProjectParameters,
    /// The catalogues scenarios draw on
    pub calculation_data: CalculationData,
    /// Scenarios to compare
    pub scenarios: ScenarioMap,
}

impl Project {
    /// Iterate over the project's scenarios
    pub fn iter_scenarios(&self) -> indexmap::map::Values<'_, ScenarioID, Scenario> {
        self.scenarios.values()
    }
}

/// Building types, energy systems, energy carriers, measures and climate for a project
#[derive(Debug, Clone, Default)]
pub struct CalculationData {
    /// Building types (including soft-deleted ones)
    pub building_types: BuildingTypeMap,
    /// Energy systems
    pub energy_systems: EnergySystemMap,
    /// Energy carriers
    pub energy_carriers: EnergyCarrierMap,
    /// Renovation measures
    pub building_measures: BuildingMeasureMap,
    /// Climate of the district
    pub climate: DistrictClimate,
}

/// Climate data for the district the project is located in
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DistrictClimate {
    /// Outdoor temperature used for sizing heating systems (°C)
    pub outdoor_design_temperature: f64,
}
