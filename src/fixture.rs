//! Fixtures for tests

use crate::building::BuildingType;
use crate::curve::CostCurve;
use crate::energy_carrier::{EnergyCarrier, EnergyCarrierMap};
use crate::energy_system::{CostCategory, CostCurveMap, CurveScale, EnergySystem, SystemCategory};
use crate::measure::{BuildingMeasure, EnvelopeSurface, MeasureCategory, MeasureKind};
use crate::project::{
    CalculationData, DistrictClimate, MeasureAggregation, Project, ProjectParameters,
    ValidationConfig,
};
use crate::scenario::{LifetimeEnergyCostMode, Scenario, ScenarioInfo};
use indexmap::indexmap;
use rstest::fixture;
use std::path::PathBuf;

/// Assert that an error with the given message occurs
macro_rules! assert_error {
    ($result:expr, $msg:expr) => {
        assert_eq!(
            $result.unwrap_err().chain().next().unwrap().to_string(),
            $msg
        );
    };
}
pub(crate) use assert_error;

#[fixture]
pub fn building_type() -> BuildingType {
    BuildingType {
        id: "SFH".into(),
        name: "Single-family house".into(),
        deleted: false,
        floor_area: 150.0,
        facade_area: 180.0,
        window_area: 30.0,
        roof_area: 90.0,
        basement_area: 80.0,
        floor_count: 2,
        perimeter: 40.0,
        u_facade: 1.2,
        u_window: 2.8,
        u_roof: 0.9,
        u_basement: 1.0,
        indoor_temperature: 20.0,
    }
}

#[fixture]
pub fn energy_carrier() -> EnergyCarrier {
    EnergyCarrier {
        id: "GAS".into(),
        name: "Natural gas".into(),
        pe_factor_renewable: 0.0,
        pe_factor_non_renewable: 1.1,
        pe_factor_total: 1.1,
        emission_factor: 0.24,
        current_price: 0.10,
        projected_price: 0.12,
        price_increase: 0.02,
    }
}

#[fixture]
pub fn energy_carriers(energy_carrier: EnergyCarrier) -> EnergyCarrierMap {
    indexmap! {energy_carrier.id.clone() => energy_carrier}
}

#[fixture]
pub fn decentralized_system() -> EnergySystem {
    let curve = |low, high| CostCurve::new(vec![0.0, 20.0], vec![low, high]).unwrap();
    let cost_curves: CostCurveMap = indexmap! {
        (CurveScale::Substation, CostCategory::Investment) => curve(3000.0, 7000.0),
        (CurveScale::Substation, CostCategory::Maintenance) => curve(100.0, 300.0),
        (CurveScale::Substation, CostCategory::Embodied) => curve(500.0, 1500.0),
    };

    EnergySystem {
        id: "GAS_BOILER".into(),
        name: "Gas condensing boiler".into(),
        category: SystemCategory::Decentralized,
        efficiency: 0.95,
        cop: 1.0,
        lifetime: 20,
        energy_carrier_id: "GAS".into(),
        cost_curves,
    }
}

#[fixture]
pub fn roof_measure() -> BuildingMeasure {
    BuildingMeasure {
        id: "ROOF_INS".into(),
        name: "Roof insulation".into(),
        cost: 12000.0,
        lifetime: 40,
        embodied_energy: 3000.0,
        embodied_emissions: 800.0,
        kind: MeasureKind::Envelope {
            surface: EnvelopeSurface::Roof,
            u_value: 0.2,
            insulation_thickness: Some(0.2),
        },
    }
}

#[fixture]
pub fn hvac_measure() -> BuildingMeasure {
    BuildingMeasure {
        id: "HVAC_STD".into(),
        name: "Hydraulic balancing and new radiators".into(),
        cost: 5000.0,
        lifetime: 20,
        embodied_energy: 1000.0,
        embodied_emissions: 300.0,
        kind: MeasureKind::Hvac { efficiency: 0.9 },
    }
}

#[fixture]
pub fn scenario_info() -> ScenarioInfo {
    ScenarioInfo {
        building_type_id: "SFH".into(),
        building_count: 3,
        heating_need: 20000.0,
        energy_system_id: Some("GAS_BOILER".into()),
        measures: indexmap! {MeasureCategory::Hvac => "HVAC_STD".into()},
    }
}

#[fixture]
pub fn scenario(scenario_info: ScenarioInfo) -> Scenario {
    Scenario {
        id: "RENO".into(),
        name: "Renovation".into(),
        description: "New radiators in every house".into(),
        energy_cost_mode: LifetimeEnergyCostMode::ProjectedPrice,
        building_types: indexmap! {scenario_info.building_type_id.clone() => scenario_info},
    }
}

#[fixture]
pub fn project_parameters() -> ProjectParameters {
    ProjectParameters {
        name: "Test project".into(),
        format_version: "1".into(),
        outdoor_design_temperature: -10.0,
        lifetime_energy_cost_mode: LifetimeEnergyCostMode::ProjectedPrice,
        measure_aggregation: MeasureAggregation::PerMeasure,
        validation: ValidationConfig::default(),
    }
}

#[fixture]
pub fn calculation_data(
    building_type: BuildingType,
    energy_carriers: EnergyCarrierMap,
    decentralized_system: EnergySystem,
    roof_measure: BuildingMeasure,
    hvac_measure: BuildingMeasure,
    project_parameters: ProjectParameters,
) -> CalculationData {
    CalculationData {
        building_types: indexmap! {building_type.id.clone() => building_type},
        energy_systems: indexmap! {decentralized_system.id.clone() => decentralized_system},
        energy_carriers,
        building_measures: indexmap! {
            roof_measure.id.clone() => roof_measure,
            hvac_measure.id.clone() => hvac_measure,
        },
        climate: DistrictClimate {
            outdoor_design_temperature: project_parameters.outdoor_design_temperature,
        },
    }
}

#[fixture]
pub fn project(
    project_parameters: ProjectParameters,
    calculation_data: CalculationData,
    scenario: Scenario,
) -> Project {
    Project {
        project_path: PathBuf::from("test_project"),
        parameters: project_parameters,
        calculation_data,
        scenarios: indexmap! {scenario.id.clone() => scenario},
    }
}
