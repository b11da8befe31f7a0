//! Code for reading scenarios and the building types assigned to them.
use super::{check_non_negative, collect_id_map, input_err_msg, read_csv};
use crate::building::{BuildingTypeID, BuildingTypeMap};
use crate::energy_system::{EnergySystemID, EnergySystemMap};
use crate::error::EngineError;
use crate::id::IDCollection;
use crate::measure::{BuildingMeasureMap, MeasureCategory, MeasureID};
use crate::project::ProjectParameters;
use crate::scenario::{LifetimeEnergyCostMode, Scenario, ScenarioInfo, ScenarioMap};
use anyhow::{Context, Result, ensure};
use indexmap::IndexMap;
use log::warn;
use serde::Deserialize;
use std::path::Path;

const SCENARIOS_FILE_NAME: &str = "scenarios.csv";
const SCENARIO_BUILDING_TYPES_FILE_NAME: &str = "scenario_building_types.csv";

#[derive(PartialEq, Debug, Deserialize)]
struct ScenarioRaw {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    lifetime_energy_cost_mode: Option<LifetimeEnergyCostMode>,
}

#[derive(PartialEq, Debug, Clone, Deserialize)]
struct ScenarioBuildingTypeRaw {
    scenario_id: String,
    building_type_id: String,
    building_count: u32,
    heating_need: f64,
    #[serde(default)]
    energy_system_id: Option<String>,
    #[serde(default)]
    roof_measure_id: Option<String>,
    #[serde(default)]
    facade_measure_id: Option<String>,
    #[serde(default)]
    foundation_measure_id: Option<String>,
    #[serde(default)]
    hvac_measure_id: Option<String>,
    #[serde(default)]
    windows_measure_id: Option<String>,
}

impl ScenarioBuildingTypeRaw {
    /// The measure IDs given in this row, with the category of the column they are in
    fn iter_measure_ids(&self) -> impl Iterator<Item = (MeasureCategory, &str)> {
        [
            (MeasureCategory::Roof, &self.roof_measure_id),
            (MeasureCategory::Facade, &self.facade_measure_id),
            (MeasureCategory::Foundation, &self.foundation_measure_id),
            (MeasureCategory::Hvac, &self.hvac_measure_id),
            (MeasureCategory::Windows, &self.windows_measure_id),
        ]
        .into_iter()
        .filter_map(|(category, id)| {
            id.as_deref()
                .filter(|id| !id.is_empty())
                .map(|id| (category, id))
        })
    }
}

/// Read scenarios from the specified project directory.
///
/// # Arguments
///
/// * `project_dir` - Folder containing project input files
/// * `parameters` - Project parameters
/// * `building_types` - All building types, including deleted ones
/// * `energy_systems` - All energy systems
/// * `building_measures` - All building measures
///
/// # Returns
///
/// A map of scenarios, keyed by ID, or an error.
pub fn read_scenarios(
    project_dir: &Path,
    parameters: &ProjectParameters,
    building_types: &BuildingTypeMap,
    energy_systems: &EnergySystemMap,
    building_measures: &BuildingMeasureMap,
) -> Result<ScenarioMap> {
    let file_path = project_dir.join(SCENARIOS_FILE_NAME);
    let scenarios_csv = read_csv(&file_path)?;
    let mut scenarios = read_scenarios_from_iter(scenarios_csv, parameters)
        .with_context(|| input_err_msg(&file_path))?;

    let file_path = project_dir.join(SCENARIO_BUILDING_TYPES_FILE_NAME);
    let rows_csv = read_csv(&file_path)?;
    read_scenario_building_types_from_iter(
        rows_csv,
        &mut scenarios,
        building_types,
        energy_systems,
        building_measures,
    )
    .with_context(|| input_err_msg(&file_path))?;

    for scenario in scenarios.values() {
        if scenario.building_types.is_empty() {
            warn!("Scenario {} has no building types", scenario.id);
        }
    }

    Ok(scenarios)
}

fn read_scenarios_from_iter<I>(iter: I, parameters: &ProjectParameters) -> Result<ScenarioMap>
where
    I: Iterator<Item = ScenarioRaw>,
{
    let scenarios = iter.map(|raw| Scenario {
        id: raw.id.as_str().into(),
        name: raw.name,
        description: raw.description,
        energy_cost_mode: raw
            .lifetime_energy_cost_mode
            .unwrap_or(parameters.lifetime_energy_cost_mode),
        building_types: IndexMap::new(),
    });
    let scenarios = collect_id_map(scenarios)?;

    let limits = &parameters.validation;
    limits.check_count("scenarios", scenarios.len(), limits.max_scenarios)?;

    Ok(scenarios)
}

fn read_scenario_building_types_from_iter<I>(
    iter: I,
    scenarios: &mut ScenarioMap,
    building_types: &BuildingTypeMap,
    energy_systems: &EnergySystemMap,
    building_measures: &BuildingMeasureMap,
) -> Result<()>
where
    I: Iterator<Item = ScenarioBuildingTypeRaw>,
{
    for raw in iter {
        let scenario_id = scenarios.get_id(&raw.scenario_id)?.clone();
        let building_type_id = building_types.get_id(&raw.building_type_id)?.clone();
        if building_types[&building_type_id].deleted {
            warn!(
                "Skipping deleted building type {building_type_id} in scenario {scenario_id}"
            );
            continue;
        }

        let info = scenario_info_from_raw(
            &raw,
            building_type_id.clone(),
            energy_systems,
            building_measures,
        )
        .with_context(|| {
            format!("Invalid building type {building_type_id} in scenario {scenario_id}")
        })?;

        let scenario = &mut scenarios[&scenario_id];
        let existing = scenario
            .building_types
            .insert(building_type_id.clone(), info)
            .is_some();
        ensure!(
            !existing,
            "Building type {building_type_id} given more than once for scenario {scenario_id}"
        );
    }

    Ok(())
}

fn scenario_info_from_raw(
    raw: &ScenarioBuildingTypeRaw,
    building_type_id: BuildingTypeID,
    energy_systems: &EnergySystemMap,
    building_measures: &BuildingMeasureMap,
) -> Result<ScenarioInfo> {
    check_non_negative("heating_need", raw.heating_need)?;

    let energy_system_id: Option<EnergySystemID> = raw
        .energy_system_id
        .as_deref()
        .filter(|id| !id.is_empty())
        .map(|id| energy_systems.get_id(id).cloned())
        .transpose()?;

    let mut measures = IndexMap::new();
    for (category, id) in raw.iter_measure_ids() {
        let measure_id: MeasureID = building_measures.get_id(id)?.clone();
        let actual = building_measures[&measure_id].category();
        if actual != category {
            return Err(EngineError::MeasureCategoryMismatch {
                measure_id,
                expected: category,
                actual,
            }
            .into());
        }
        measures.insert(category, measure_id);
    }

    Ok(ScenarioInfo {
        building_type_id,
        building_count: raw.building_count,
        heating_need: raw.heating_need,
        energy_system_id,
        measures,
    })
}
