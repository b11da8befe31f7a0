//! Heat-loss coefficients of renovated building types.
use super::measures::lookup_measure;
use crate::building::{BuildingType, BuildingTypeID};
use crate::error::EngineError;
use crate::measure::MeasureCategory;
use crate::project::CalculationData;
use crate::scenario::ScenarioInfo;

/// Share of the basement heat loss which reaches the ground
const GROUND_REDUCTION_FACTOR: f64 = 0.5;

/// Linear thermal bridge coefficient along the perimeter of each storey (W/(m·K))
const THERMAL_BRIDGE_COEFFICIENT: f64 = 0.05;

/// Calculates how much heat a building loses per degree of temperature difference
pub trait HeatLossCalculator {
    /// Heat-loss coefficient (kW/K) of one building of the given type, with the measures the
    /// scenario applies to it
    fn heat_loss_coefficient(
        &self,
        calculation_data: &CalculationData,
        building_type_id: &BuildingTypeID,
        scenario_info: &ScenarioInfo,
    ) -> Result<f64, EngineError>;
}

/// Heat loss through the building envelope, with a flat allowance for thermal bridges
#[derive(Debug, Clone, Copy, Default)]
pub struct TransmissionHeatLoss;

impl HeatLossCalculator for TransmissionHeatLoss {
    fn heat_loss_coefficient(
        &self,
        calculation_data: &CalculationData,
        building_type_id: &BuildingTypeID,
        scenario_info: &ScenarioInfo,
    ) -> Result<f64, EngineError> {
        let building_type = calculation_data
            .building_types
            .get(building_type_id)
            .ok_or_else(|| EngineError::MissingBuildingType(building_type_id.clone()))?;

        // U-value after renovation, or the original one if no measure is applied
        let u_value = |category: MeasureCategory, original: f64| -> Result<f64, EngineError> {
            let Some(measure_id) = scenario_info.measure_id(category) else {
                return Ok(original);
            };
            let measure = lookup_measure(calculation_data, measure_id, category)?;
            Ok(measure.u_value().unwrap_or(original))
        };

        let u_facade = u_value(MeasureCategory::Facade, building_type.u_facade)?;
        let u_window = u_value(MeasureCategory::Windows, building_type.u_window)?;
        let u_roof = u_value(MeasureCategory::Roof, building_type.u_roof)?;
        let u_basement = u_value(MeasureCategory::Foundation, building_type.u_basement)?;

        Ok(transmission_loss(
            building_type,
            u_facade,
            u_window,
            u_roof,
            u_basement,
        ))
    }
}

/// Transmission heat loss (kW/K) of a building with the given U-values
fn transmission_loss(
    building_type: &BuildingType,
    u_facade: f64,
    u_window: f64,
    u_roof: f64,
    u_basement: f64,
) -> f64 {
    let watts_per_kelvin = building_type.facade_area * u_facade
        + building_type.window_area * u_window
        + building_type.roof_area * u_roof
        + GROUND_REDUCTION_FACTOR * building_type.basement_area * u_basement
        + THERMAL_BRIDGE_COEFFICIENT
            * building_type.perimeter
            * f64::from(building_type.floor_count);

    watts_per_kelvin / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::building::BuildingType;
    use crate::fixture::{building_type, roof_measure, scenario_info};
    use crate::measure::BuildingMeasure;
    use float_cmp::assert_approx_eq;
    use indexmap::IndexMap;
    use rstest::{fixture, rstest};

    #[fixture]
    fn calculation_data(building_type: BuildingType, roof_measure: BuildingMeasure) -> CalculationData {
        CalculationData {
            building_types: [(building_type.id.clone(), building_type)].into_iter().collect(),
            building_measures: [(roof_measure.id.clone(), roof_measure)]
                .into_iter()
                .collect(),
            ..CalculationData::default()
        }
    }

    fn unrenovated(scenario_info: ScenarioInfo) -> ScenarioInfo {
        ScenarioInfo {
            measures: IndexMap::new(),
            ..scenario_info
        }
    }

    #[rstest]
    fn heat_loss_unrenovated(
        calculation_data: CalculationData,
        building_type: BuildingType,
        scenario_info: ScenarioInfo,
    ) {
        let expected = transmission_loss(
            &building_type,
            building_type.u_facade,
            building_type.u_window,
            building_type.u_roof,
            building_type.u_basement,
        );
        let actual = TransmissionHeatLoss
            .heat_loss_coefficient(
                &calculation_data,
                &building_type.id,
                &unrenovated(scenario_info),
            )
            .unwrap();
        assert_approx_eq!(f64, actual, expected);
    }

    #[rstest]
    fn heat_loss_with_roof_measure(
        calculation_data: CalculationData,
        building_type: BuildingType,
        scenario_info: ScenarioInfo,
    ) {
        let mut info = unrenovated(scenario_info);
        let before = TransmissionHeatLoss
            .heat_loss_coefficient(&calculation_data, &building_type.id, &info)
            .unwrap();
        info.measures.insert(MeasureCategory::Roof, "ROOF_INS".into());
        let after = TransmissionHeatLoss
            .heat_loss_coefficient(&calculation_data, &building_type.id, &info)
            .unwrap();

        let saved = building_type.roof_area * (building_type.u_roof - 0.2) / 1000.0;
        assert_approx_eq!(f64, before - after, saved, epsilon = 1e-12);
    }

    #[test]
    fn transmission_loss_formula() {
        let building_type = BuildingType {
            facade_area: 100.0,
            window_area: 20.0,
            roof_area: 50.0,
            basement_area: 40.0,
            perimeter: 30.0,
            floor_count: 2,
            ..crate::fixture::building_type()
        };
        // 100 + 40 + 25 + 0.5 * 40 * 0.5 + 0.05 * 30 * 2
        let h = transmission_loss(&building_type, 1.0, 2.0, 0.5, 0.5);
        assert_approx_eq!(f64, h, (100.0 + 40.0 + 25.0 + 10.0 + 3.0) / 1000.0);
    }

    #[rstest]
    fn heat_loss_missing_building_type(calculation_data: CalculationData, scenario_info: ScenarioInfo) {
        assert_eq!(
            TransmissionHeatLoss
                .heat_loss_coefficient(&calculation_data, &"NOPE".into(), &scenario_info)
                .unwrap_err(),
            EngineError::MissingBuildingType("NOPE".into())
        );
    }

    #[rstest]
    fn heat_loss_missing_measure(
        calculation_data: CalculationData,
        building_type: BuildingType,
        scenario_info: ScenarioInfo,
    ) {
        let mut info = unrenovated(scenario_info);
        info.measures.insert(MeasureCategory::Facade, "NOPE".into());
        assert_eq!(
            TransmissionHeatLoss
                .heat_loss_coefficient(&calculation_data, &building_type.id, &info)
                .unwrap_err(),
            EngineError::MissingBuildingMeasure("NOPE".into())
        );
    }

    #[rstest]
    fn heat_loss_measure_in_wrong_slot(
        calculation_data: CalculationData,
        building_type: BuildingType,
        scenario_info: ScenarioInfo,
    ) {
        let mut info = unrenovated(scenario_info);
        info.measures.insert(MeasureCategory::Facade, "ROOF_INS".into());
        assert_eq!(
            TransmissionHeatLoss
                .heat_loss_coefficient(&calculation_data, &building_type.id, &info)
                .unwrap_err(),
            EngineError::MeasureCategoryMismatch {
                measure_id: "ROOF_INS".into(),
                expected: MeasureCategory::Facade,
                actual: MeasureCategory::Roof,
            }
        );
    }
}
