//! Sizing and costing of the energy systems assigned to building types in a scenario.
//!
//! Decentralised systems are sized per building from the heat-loss coefficient and the design
//! temperature difference. Centralised plants are sized from the sum of the decentralised sizes
//! of all buildings they serve, and additionally carry one substation per building. Costs,
//! maintenance and embodied emissions are read off each system's cost curves at these sizes.
use super::active_building_types;
use super::heat_loss::{HeatLossCalculator, TransmissionHeatLoss};
use super::measures::lookup_measure;
use crate::building::BuildingTypeID;
use crate::energy_carrier::EnergyCarrier;
use crate::energy_system::{
    CostCategory, CurveScale, EnergySystem, EnergySystemID, SystemCategory,
};
use crate::error::EngineError;
use crate::measure::MeasureCategory;
use crate::project::{CalculationData, Project};
use crate::scenario::{LifetimeEnergyCostMode, Scenario, ScenarioID, ScenarioInfo};
use indexmap::IndexMap;
use log::debug;
use strum::IntoEnumIterator;

/// Results for each energy system used in a scenario, keyed by system ID
pub type SystemResultMap = IndexMap<EnergySystemID, SystemResult>;

/// Heat demand of one building type served by an energy system
#[derive(PartialEq, Debug, Clone)]
pub struct HeatRecord {
    /// The building type
    pub building_type_id: BuildingTypeID,
    /// Annual heating need of all buildings of this type (kWh/a)
    pub heating_need: f64,
    /// Design indoor temperature (°C)
    pub indoor_temperature: f64,
    /// Design outdoor temperature (°C)
    pub outdoor_design_temperature: f64,
    /// Efficiency of heat distribution within the building
    pub decentralized_efficiency: f64,
    /// Heat-loss coefficient of one building (kW/K)
    pub heat_loss_coefficient: f64,
    /// Number of buildings of this type
    pub building_count: u32,
}

impl HeatRecord {
    /// Heating capacity needed in one building (kW)
    pub fn decentralized_size(&self) -> f64 {
        (self.indoor_temperature - self.outdoor_design_temperature) * self.heat_loss_coefficient
            / self.decentralized_efficiency
    }
}

/// The capacity needed in each building of one type
#[derive(PartialEq, Debug, Clone)]
pub struct DecentralizedSize {
    /// The building type
    pub building_type_id: BuildingTypeID,
    /// Number of buildings of this type
    pub building_count: u32,
    /// Capacity per building (kW)
    pub size: f64,
}

/// Amounts broken down by the part of the system they belong to
#[derive(PartialEq, Debug, Clone, Copy, Default)]
pub struct CostBuckets {
    /// Units in the buildings, summed over all buildings
    pub substation: f64,
    /// Central intake
    pub intake: f64,
    /// Central generation
    pub generation: f64,
    /// Distribution network
    pub circulation: f64,
}

impl CostBuckets {
    /// Sum of all parts
    pub fn total(&self) -> f64 {
        self.substation + self.intake + self.generation + self.circulation
    }

    fn bucket_mut(&mut self, scale: CurveScale) -> &mut f64 {
        match scale {
            CurveScale::Substation => &mut self.substation,
            CurveScale::Intake => &mut self.intake,
            CurveScale::Generation => &mut self.generation,
            CurveScale::Circulation => &mut self.circulation,
        }
    }
}

/// Primary energy use (kWh/a)
#[derive(PartialEq, Debug, Clone, Copy, Default)]
pub struct PrimaryEnergy {
    /// Renewable primary energy
    pub renewable: f64,
    /// Non-renewable primary energy
    pub non_renewable: f64,
    /// Total primary energy
    pub total: f64,
}

/// Sizes, costs and impacts of one energy system within a scenario
#[derive(PartialEq, Debug, Clone)]
pub struct SystemResult {
    /// The energy system
    pub system_id: EnergySystemID,
    /// How the system is arranged
    pub category: SystemCategory,
    /// Lifetime of the system in years
    pub lifetime: u32,
    /// Annual heating need of all buildings served (kWh/a)
    pub total_heating_need: f64,
    /// Capacity needed per building, for each building type served, ordered by building type
    pub decentralized_sizes: Vec<DecentralizedSize>,
    /// Capacity of the central plant (kW), zero unless the system is centralised
    pub centralized_size: f64,
    /// Investment cost
    pub investment: CostBuckets,
    /// Annual maintenance cost
    pub maintenance: CostBuckets,
    /// Embodied emissions (kg CO2-eq)
    pub embodied: CostBuckets,
    /// Annual primary energy use
    pub primary_energy: PrimaryEnergy,
    /// Annual emissions from energy use (kg CO2-eq/a)
    pub emissions: f64,
    /// Energy cost over the lifetime of the system
    pub lifetime_energy_cost: f64,
}

impl SystemResult {
    /// Get the breakdown for a kind of cost
    pub fn costs(&self, category: CostCategory) -> &CostBuckets {
        match category {
            CostCategory::Investment => &self.investment,
            CostCategory::Maintenance => &self.maintenance,
            CostCategory::Embodied => &self.embodied,
        }
    }

    fn costs_mut(&mut self, category: CostCategory) -> &mut CostBuckets {
        match category {
            CostCategory::Investment => &mut self.investment,
            CostCategory::Maintenance => &mut self.maintenance,
            CostCategory::Embodied => &mut self.embodied,
        }
    }
}

/// Size and cost the energy systems in every scenario of a project.
///
/// Heat-loss coefficients are calculated with [`TransmissionHeatLoss`].
pub fn size_and_cost_systems(
    project: &Project,
) -> Result<IndexMap<ScenarioID, SystemResultMap>, EngineError> {
    size_and_cost_systems_with(project, &TransmissionHeatLoss)
}

/// Size and cost the energy systems in every scenario of a project, with the given heat-loss
/// calculator.
pub fn size_and_cost_systems_with(
    project: &Project,
    heat_loss: &dyn HeatLossCalculator,
) -> Result<IndexMap<ScenarioID, SystemResultMap>, EngineError> {
    project
        .iter_scenarios()
        .map(|scenario| {
            let results =
                size_and_cost_scenario(&project.calculation_data, scenario, heat_loss)?;
            Ok((scenario.id.clone(), results))
        })
        .collect()
}

/// Size and cost the energy systems used in one scenario.
///
/// The results are ordered by system ID and do not depend on the order in which building types
/// appear in the scenario.
pub fn size_and_cost_scenario(
    calculation_data: &CalculationData,
    scenario: &Scenario,
    heat_loss: &dyn HeatLossCalculator,
) -> Result<SystemResultMap, EngineError> {
    let mut records_by_system: IndexMap<EnergySystemID, Vec<HeatRecord>> = IndexMap::new();
    for info in active_building_types(calculation_data, scenario) {
        let Some(system_id) = &info.energy_system_id else {
            continue;
        };
        if !calculation_data.energy_systems.contains_key(system_id) {
            return Err(EngineError::MissingEnergySystem(system_id.clone()));
        }

        let record = heat_record(calculation_data, info, heat_loss)?;
        records_by_system
            .entry(system_id.clone())
            .or_default()
            .push(record);
    }
    records_by_system.sort_keys();

    let mut results = SystemResultMap::new();
    for (system_id, records) in records_by_system {
        let system = &calculation_data.energy_systems[&system_id];
        debug!(
            "Sizing energy system {system_id} for {} building types in scenario {}",
            records.len(),
            scenario.id
        );
        let result = size_and_cost_system(
            calculation_data,
            system,
            records,
            scenario.energy_cost_mode,
        )?;
        results.insert(system_id, result);
    }

    Ok(results)
}

/// Collect the heat demand of one building type
fn heat_record(
    calculation_data: &CalculationData,
    info: &ScenarioInfo,
    heat_loss: &dyn HeatLossCalculator,
) -> Result<HeatRecord, EngineError> {
    let building_type = calculation_data
        .building_types
        .get(&info.building_type_id)
        .ok_or_else(|| EngineError::MissingBuildingType(info.building_type_id.clone()))?;
    let heat_loss_coefficient =
        heat_loss.heat_loss_coefficient(calculation_data, &info.building_type_id, info)?;

    Ok(HeatRecord {
        building_type_id: info.building_type_id.clone(),
        heating_need: info.total_heating_need(),
        indoor_temperature: building_type.indoor_temperature,
        outdoor_design_temperature: calculation_data.climate.outdoor_design_temperature,
        decentralized_efficiency: decentralized_efficiency(calculation_data, info)?,
        heat_loss_coefficient,
        building_count: info.building_count,
    })
}

/// Distribution efficiency from the applied HVAC measure, or 1 if there is none
fn decentralized_efficiency(
    calculation_data: &CalculationData,
    info: &ScenarioInfo,
) -> Result<f64, EngineError> {
    let Some(measure_id) = info.measure_id(MeasureCategory::Hvac) else {
        return Ok(1.0);
    };
    let measure = lookup_measure(calculation_data, measure_id, MeasureCategory::Hvac)?;

    Ok(measure.efficiency().unwrap_or(1.0))
}

/// Size and cost one energy system for the building types it serves
fn size_and_cost_system(
    calculation_data: &CalculationData,
    system: &EnergySystem,
    mut records: Vec<HeatRecord>,
    energy_cost_mode: LifetimeEnergyCostMode,
) -> Result<SystemResult, EngineError> {
    system.check_valid()?;
    let carrier = calculation_data
        .energy_carriers
        .get(&system.energy_carrier_id)
        .ok_or_else(|| EngineError::MissingEnergyCarrier {
            system_id: system.id.clone(),
            carrier_id: system.energy_carrier_id.clone(),
        })?;

    // Fix the summation order
    records.sort_by(|a, b| a.building_type_id.cmp(&b.building_type_id));

    let decentralized_sizes: Vec<_> = records
        .iter()
        .map(|record| DecentralizedSize {
            building_type_id: record.building_type_id.clone(),
            building_count: record.building_count,
            size: record.decentralized_size(),
        })
        .collect();
    let centralized_size = match system.category {
        SystemCategory::Centralized => {
            decentralized_sizes
                .iter()
                .map(|size| size.size * f64::from(size.building_count))
                .sum::<f64>()
                / system.efficiency
        }
        SystemCategory::Decentralized | SystemCategory::None => 0.0,
    };
    let total_heating_need: f64 = records.iter().map(|record| record.heating_need).sum();

    let mut result = SystemResult {
        system_id: system.id.clone(),
        category: system.category,
        lifetime: system.lifetime,
        total_heating_need,
        decentralized_sizes,
        centralized_size,
        investment: CostBuckets::default(),
        maintenance: CostBuckets::default(),
        embodied: CostBuckets::default(),
        primary_energy: PrimaryEnergy::default(),
        emissions: 0.0,
        lifetime_energy_cost: 0.0,
    };

    for category in CostCategory::iter() {
        let buckets = aggregate_costs(system, category, &result)?;
        *result.costs_mut(category) = buckets;
    }

    let final_energy = total_heating_need / system.efficiency;
    result.primary_energy = PrimaryEnergy {
        renewable: carrier.pe_factor_renewable * final_energy,
        non_renewable: carrier.pe_factor_non_renewable * final_energy,
        total: carrier.pe_factor_total * final_energy,
    };
    result.emissions = carrier.emission_factor * final_energy;
    result.lifetime_energy_cost = lifetime_energy_cost(
        result.primary_energy.total,
        carrier,
        system.lifetime,
        energy_cost_mode,
    );

    Ok(result)
}

/// Read one kind of cost off the system's curves at the sizes already calculated
fn aggregate_costs(
    system: &EnergySystem,
    category: CostCategory,
    sizes: &SystemResult,
) -> Result<CostBuckets, EngineError> {
    let scales: &[CurveScale] = match system.category {
        SystemCategory::None => return Ok(CostBuckets::default()),
        SystemCategory::Decentralized => &[CurveScale::Substation],
        SystemCategory::Centralized => &[
            CurveScale::Substation,
            CurveScale::Intake,
            CurveScale::Generation,
            CurveScale::Circulation,
        ],
    };

    let mut buckets = CostBuckets::default();
    for &scale in scales {
        let value = if scale.is_centralized() {
            curve_value(system, scale, category, sizes.centralized_size)?
        } else {
            let mut total = 0.0;
            for size in &sizes.decentralized_sizes {
                total += curve_value(system, scale, category, size.size)?
                    * f64::from(size.building_count);
            }
            total
        };
        *buckets.bucket_mut(scale) = value;
    }

    Ok(buckets)
}

/// Look up a cost curve at the given size. Missing curves have zero cost.
fn curve_value(
    system: &EnergySystem,
    scale: CurveScale,
    category: CostCategory,
    size: f64,
) -> Result<f64, EngineError> {
    let Some(curve) = system.cost_curve(scale, category) else {
        debug!(
            "No {scale} {category} curve for energy system {}; using zero",
            system.id
        );
        return Ok(0.0);
    };

    curve.value_at(size).map_err(|source| EngineError::Curve {
        system_id: system.id.clone(),
        scale,
        category,
        source,
    })
}

/// Total energy cost over `lifetime` years
fn lifetime_energy_cost(
    primary_energy: f64,
    carrier: &EnergyCarrier,
    lifetime: u32,
    mode: LifetimeEnergyCostMode,
) -> f64 {
    (0..lifetime)
        .map(|year| match mode {
            LifetimeEnergyCostMode::ProjectedPrice => primary_energy * carrier.projected_price,
            LifetimeEnergyCostMode::AnnualIncrease => {
                primary_energy
                    * carrier.current_price
                    * (1.0 + carrier.price_increase).powf(f64::from(year))
            }
        })
        .sum()
}
