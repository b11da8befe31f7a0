//! The calculation engine.
//!
//! For each scenario, the applied renovation measures are aggregated, the energy systems are sized
//! and costed and everything is folded into a summary. Scenarios are independent of one another:
//! an error in one scenario does not affect the results of the others.
use crate::error::EngineError;
use crate::project::{CalculationData, Project};
use crate::scenario::{Scenario, ScenarioID, ScenarioInfo};
use indexmap::IndexMap;
use log::{error, info, warn};

pub mod energy_system;
pub mod heat_loss;
pub mod measures;
pub mod summary;
use energy_system::{SystemResultMap, size_and_cost_scenario};
use heat_loss::{HeatLossCalculator, TransmissionHeatLoss};
use measures::{MeasureTotalsMap, aggregate_scenario_measures};
use summary::{ScenarioSummary, summarize_scenario};

/// All results for one scenario
#[derive(PartialEq, Debug, Clone)]
pub struct ScenarioResults {
    /// Results for each energy system used, ordered by system ID
    pub systems: SystemResultMap,
    /// Totals for each measure applied, by category
    pub measures: MeasureTotalsMap,
    /// Scenario totals
    pub summary: ScenarioSummary,
}

/// The building types of a scenario which take part in the calculation, ordered by ID.
///
/// Soft-deleted building types are left out. Building types missing from the project are kept so
/// that looking them up fails.
fn active_building_types<'a>(
    calculation_data: &CalculationData,
    scenario: &'a Scenario,
) -> Vec<&'a ScenarioInfo> {
    let mut infos: Vec<_> = scenario
        .building_types
        .values()
        .filter(|info| {
            let deleted = calculation_data
                .building_types
                .get(&info.building_type_id)
                .is_some_and(|building_type| building_type.deleted);
            if deleted {
                warn!(
                    "Scenario {} refers to deleted building type {}; it will be ignored",
                    scenario.id, info.building_type_id
                );
            }
            !deleted
        })
        .collect();
    infos.sort_by(|a, b| a.building_type_id.cmp(&b.building_type_id));
    infos
}

/// Calculate all results for one scenario
pub fn calculate_scenario(
    project: &Project,
    scenario: &Scenario,
    heat_loss: &dyn HeatLossCalculator,
) -> Result<ScenarioResults, EngineError> {
    let calculation_data = &project.calculation_data;
    let measures = aggregate_scenario_measures(
        calculation_data,
        scenario,
        project.parameters.measure_aggregation,
    )?;
    let systems = size_and_cost_scenario(calculation_data, scenario, heat_loss)?;
    let summary = summarize_scenario(calculation_data, scenario, &systems, &measures)?;

    Ok(ScenarioResults {
        systems,
        measures,
        summary,
    })
}

/// Holds the latest successful results for each scenario of a project.
///
/// Results for a scenario are only ever replaced as a whole. If recalculating a scenario fails,
/// its previous results are kept.
#[derive(Debug, Default)]
pub struct ResultStore {
    results: IndexMap<ScenarioID, ScenarioResults>,
}

impl ResultStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Recalculate every scenario in the project with [`TransmissionHeatLoss`].
    ///
    /// # Returns
    ///
    /// The errors for scenarios which could not be calculated, keyed by scenario ID.
    pub fn recalculate(&mut self, project: &Project) -> IndexMap<ScenarioID, EngineError> {
        self.recalculate_with(project, &TransmissionHeatLoss)
    }

    /// Recalculate every scenario in the project with the given heat-loss calculator.
    ///
    /// Results for scenarios no longer in the project are dropped.
    pub fn recalculate_with(
        &mut self,
        project: &Project,
        heat_loss: &dyn HeatLossCalculator,
    ) -> IndexMap<ScenarioID, EngineError> {
        self.results.retain(|id, _| project.scenarios.contains_key(id));

        let mut errors = IndexMap::new();
        for scenario in project.iter_scenarios() {
            match calculate_scenario(project, scenario, heat_loss) {
                Ok(results) => {
                    info!("Calculated scenario {}", scenario.id);
                    self.results.insert(scenario.id.clone(), results);
                }
                Err(err) => {
                    error!("Could not calculate scenario {}: {err}", scenario.id);
                    if self.results.contains_key(&scenario.id) {
                        info!("Keeping previous results for scenario {}", scenario.id);
                    }
                    errors.insert(scenario.id.clone(), err);
                }
            }
        }

        // Keep results in the same order as the project's scenarios
        let position = |id: &ScenarioID| project.scenarios.get_index_of(id);
        self.results
            .sort_by(|id1, _, id2, _| position(id1).cmp(&position(id2)));

        errors
    }

    /// Get the results for a scenario, if it has been calculated successfully
    pub fn get(&self, scenario_id: &ScenarioID) -> Option<&ScenarioResults> {
        self.results.get(scenario_id)
    }

    /// Iterate over the results, in the order of the project's scenarios
    pub fn iter(&self) -> indexmap::map::Iter<'_, ScenarioID, ScenarioResults> {
        self.results.iter()
    }

    /// Whether there are no results
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::project;
    use rstest::rstest;

    #[rstest]
    fn calculate_scenario_works(project: Project) {
        let scenario = &project.scenarios["RENO"];
        let results = calculate_scenario(&project, scenario, &TransmissionHeatLoss).unwrap();
        assert_eq!(results.summary.scenario_id, scenario.id);
        assert!(results.systems.contains_key("GAS_BOILER"));
        assert!(results.summary.specific.primary_energy > 0.0);
    }

    #[rstest]
    fn calculate_scenario_ignores_deleted_building_types(mut project: Project) {
        project.calculation_data.building_types["SFH"].deleted = true;
        let scenario = &project.scenarios["RENO"];
        let results = calculate_scenario(&project, scenario, &TransmissionHeatLoss).unwrap();
        assert!(results.systems.is_empty());
        assert!(results.measures.values().all(IndexMap::is_empty));
        assert_eq!(results.summary.total_building_area, 0.0);
        assert_eq!(results.summary.total_heating_need, 0.0);
    }

    #[rstest]
    fn result_store_keeps_last_good_results(mut project: Project) {
        let mut store = ResultStore::new();
        assert!(store.recalculate(&project).is_empty());
        let good = store.get(&"RENO".into()).unwrap().clone();

        // Break the scenario by removing its energy system
        project.calculation_data.energy_systems.clear();
        let errors = store.recalculate(&project);
        assert_eq!(
            errors[&ScenarioID::from("RENO")],
            EngineError::MissingEnergySystem("GAS_BOILER".into())
        );
        assert_eq!(store.get(&"RENO".into()), Some(&good));
    }

    #[rstest]
    fn result_store_replaces_results(mut project: Project) {
        let mut store = ResultStore::new();
        store.recalculate(&project);
        let before = store.get(&"RENO".into()).unwrap().summary.clone();

        project.scenarios["RENO"].building_types["SFH"].building_count = 6;
        assert!(store.recalculate(&project).is_empty());
        let after = &store.get(&"RENO".into()).unwrap().summary;
        assert_eq!(after.total_building_area, 2.0 * before.total_building_area);
    }

    #[rstest]
    fn result_store_drops_removed_scenarios(mut project: Project) {
        let mut store = ResultStore::new();
        store.recalculate(&project);
        assert!(!store.is_empty());

        project.scenarios.clear();
        store.recalculate(&project);
        assert!(store.is_empty());
    }
}
