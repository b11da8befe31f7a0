//! Scenario totals, expressed per unit of floor area so that scenarios can be compared.
use super::active_building_types;
use super::energy_system::SystemResultMap;
use super::measures::{
    MeasureTotalsMap, annualized_specific_cost, lookup_measure, specific_embodied_impact,
};
use crate::error::EngineError;
use crate::project::CalculationData;
use crate::scenario::{Scenario, ScenarioID};
use log::warn;

/// Indicators per m² of floor area
#[derive(PartialEq, Debug, Clone, Copy, Default)]
pub struct SpecificIndicators {
    /// Measure cost per year of lifetime
    pub measure_annualized_cost: f64,
    /// Energy system investment per year of lifetime, plus annual maintenance
    pub system_annualized_cost: f64,
    /// Average annual energy cost over the systems' lifetimes
    pub annual_energy_cost: f64,
    /// Sum of the annualised measure, system and energy costs
    pub total_annualized_cost: f64,
    /// Embodied emissions of measures and energy systems (kg CO2-eq/m²)
    pub embodied_emissions: f64,
    /// Embodied energy of measures (kWh/m²)
    pub embodied_energy: f64,
    /// Annual primary energy use (kWh/(m²·a))
    pub primary_energy: f64,
    /// Annual emissions from energy use (kg CO2-eq/(m²·a))
    pub emissions: f64,
}

/// Summary indicators for one scenario
#[derive(PartialEq, Debug, Clone)]
pub struct ScenarioSummary {
    /// The scenario
    pub scenario_id: ScenarioID,
    /// Floor area of all buildings in the scenario (m²)
    pub total_building_area: f64,
    /// Annual heating need of all buildings in the scenario (kWh/a)
    pub total_heating_need: f64,
    /// Indicators per m² of floor area
    pub specific: SpecificIndicators,
}

/// Fold the energy system and measure results of a scenario into its summary.
///
/// If the scenario has no floor area, all specific indicators are zero.
pub fn summarize_scenario(
    calculation_data: &CalculationData,
    scenario: &Scenario,
    systems: &SystemResultMap,
    measures: &MeasureTotalsMap,
) -> Result<ScenarioSummary, EngineError> {
    let mut total_building_area = 0.0;
    let mut total_heating_need = 0.0;
    for info in active_building_types(calculation_data, scenario) {
        let building_type = calculation_data
            .building_types
            .get(&info.building_type_id)
            .ok_or_else(|| EngineError::MissingBuildingType(info.building_type_id.clone()))?;
        total_building_area += building_type.floor_area * f64::from(info.building_count);
        total_heating_need += info.total_heating_need();
    }

    let specific = if total_building_area > 0.0 {
        specific_indicators(calculation_data, systems, measures, total_building_area)?
    } else {
        warn!(
            "Scenario {} has no floor area; specific indicators will be zero",
            scenario.id
        );
        SpecificIndicators::default()
    };

    Ok(ScenarioSummary {
        scenario_id: scenario.id.clone(),
        total_building_area,
        total_heating_need,
        specific,
    })
}

fn specific_indicators(
    calculation_data: &CalculationData,
    systems: &SystemResultMap,
    measures: &MeasureTotalsMap,
    area: f64,
) -> Result<SpecificIndicators, EngineError> {
    let mut specific = SpecificIndicators::default();

    for (category, category_totals) in measures {
        for (measure_id, totals) in category_totals {
            let measure = lookup_measure(calculation_data, measure_id, *category)?;
            specific.measure_annualized_cost += annualized_specific_cost(totals, measure, area)?;

            let embodied = specific_embodied_impact(totals, area);
            specific.embodied_emissions += embodied.emissions;
            specific.embodied_energy += embodied.energy;
        }
    }

    for result in systems.values() {
        let lifetime = f64::from(result.lifetime);
        specific.system_annualized_cost +=
            (result.investment.total() / lifetime + result.maintenance.total()) / area;
        specific.annual_energy_cost += result.lifetime_energy_cost / lifetime / area;
        specific.embodied_emissions += result.embodied.total() / area;
        specific.primary_energy += result.primary_energy.total / area;
        specific.emissions += result.emissions / area;
    }

    specific.total_annualized_cost = specific.measure_annualized_cost
        + specific.system_annualized_cost
        + specific.annual_energy_cost;

    Ok(specific)
}
