//! Aggregation of the renovation measures applied in each scenario.
use super::active_building_types;
use crate::error::EngineError;
use crate::measure::{BuildingMeasure, MeasureCategory, MeasureID};
use crate::project::{CalculationData, MeasureAggregation, Project};
use crate::scenario::{Scenario, ScenarioID};
use indexmap::IndexMap;
use strum::IntoEnumIterator;

/// Totals for each measure applied in a scenario, grouped by category
pub type MeasureTotalsMap = IndexMap<MeasureCategory, IndexMap<MeasureID, MeasureTotals>>;

/// Cost and embodied impact of one measure across a scenario
#[derive(PartialEq, Debug, Clone, Default)]
pub struct MeasureTotals {
    /// Renovation cost
    pub cost: f64,
    /// Embodied energy (kWh)
    pub embodied_energy: f64,
    /// Embodied emissions (kg CO2-eq)
    pub embodied_emissions: f64,
    /// Number of building types the measure is applied to
    pub occurrences: u32,
    /// Number of buildings the measure is applied to
    pub building_count: u32,
}

/// Embodied impact per unit of floor area
#[derive(PartialEq, Debug, Clone, Copy, Default)]
pub struct SpecificEmbodiedImpact {
    /// Embodied energy (kWh/m²)
    pub energy: f64,
    /// Embodied emissions (kg CO2-eq/m²)
    pub emissions: f64,
}

/// Aggregate the measures applied in every scenario of a project
pub fn aggregate_building_measures(
    project: &Project,
) -> Result<IndexMap<ScenarioID, MeasureTotalsMap>, EngineError> {
    project
        .iter_scenarios()
        .map(|scenario| {
            let totals = aggregate_scenario_measures(
                &project.calculation_data,
                scenario,
                project.parameters.measure_aggregation,
            )?;
            Ok((scenario.id.clone(), totals))
        })
        .collect()
}

/// Aggregate the measures applied in one scenario.
///
/// Every category is present in the result, even if no measure of that category is applied.
/// Measures within a category are ordered by ID.
pub fn aggregate_scenario_measures(
    calculation_data: &CalculationData,
    scenario: &Scenario,
    aggregation: MeasureAggregation,
) -> Result<MeasureTotalsMap, EngineError> {
    let infos = active_building_types(calculation_data, scenario);

    let mut all_totals = MeasureTotalsMap::new();
    for category in MeasureCategory::iter() {
        let mut category_totals: IndexMap<MeasureID, MeasureTotals> = IndexMap::new();
        for info in &infos {
            let Some(measure_id) = info.measure_id(category) else {
                continue;
            };
            let measure = lookup_measure(calculation_data, measure_id, category)?;
            let totals = category_totals.entry(measure_id.clone()).or_default();
            let first_occurrence = totals.occurrences == 0;
            totals.occurrences += 1;
            totals.building_count += info.building_count;

            let multiplier = match aggregation {
                MeasureAggregation::PerMeasure if first_occurrence => 1.0,
                MeasureAggregation::PerMeasure => 0.0,
                MeasureAggregation::PerBuilding => f64::from(info.building_count),
            };
            totals.cost += measure.cost * multiplier;
            totals.embodied_energy += measure.embodied_energy * multiplier;
            totals.embodied_emissions += measure.embodied_emissions * multiplier;
        }

        category_totals.sort_keys();
        all_totals.insert(category, category_totals);
    }

    Ok(all_totals)
}

/// Look up a measure, checking it belongs to the category it was selected for and has a valid
/// lifetime
pub(crate) fn lookup_measure<'a>(
    calculation_data: &'a CalculationData,
    measure_id: &MeasureID,
    category: MeasureCategory,
) -> Result<&'a BuildingMeasure, EngineError> {
    let measure = calculation_data
        .building_measures
        .get(measure_id)
        .ok_or_else(|| EngineError::MissingBuildingMeasure(measure_id.clone()))?;

    let actual = measure.category();
    if actual != category {
        return Err(EngineError::MeasureCategoryMismatch {
            measure_id: measure_id.clone(),
            expected: category,
            actual,
        });
    }
    measure.check_valid()?;

    Ok(measure)
}

/// Cost of a measure per year of its lifetime and per unit of floor area.
///
/// Fails if the measure has no lifetime to spread the cost over.
pub fn annualized_specific_cost(
    totals: &MeasureTotals,
    measure: &BuildingMeasure,
    total_building_area: f64,
) -> Result<f64, EngineError> {
    measure.check_valid()?;
    Ok(totals.cost / (total_building_area * f64::from(measure.lifetime)))
}

/// Embodied impact of a measure per unit of floor area
pub fn specific_embodied_impact(
    totals: &MeasureTotals,
    total_building_area: f64,
) -> SpecificEmbodiedImpact {
    SpecificEmbodiedImpact {
        energy: totals.embodied_energy / total_building_area,
        emissions: totals.embodied_emissions / total_building_area,
    }
}
