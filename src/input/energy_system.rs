//! Code for reading energy systems from CSV files.
use super::{check_positive, collect_id_map, input_err_msg, read_csv};
use crate::energy_carrier::EnergyCarrierMap;
use crate::energy_system::{
    CostCategory, CostCurveMap, CurveScale, EnergySystem, EnergySystemID, EnergySystemMap,
    SystemCategory,
};
use crate::id::IDCollection;
use crate::project::ValidationConfig;
use anyhow::{Context, Result, ensure};
use itertools::Itertools;
use log::warn;
use serde::Deserialize;
use std::path::Path;
use strum::IntoEnumIterator;

mod cost_curve;
use cost_curve::read_cost_curves;

const ENERGY_SYSTEMS_FILE_NAME: &str = "energy_systems.csv";

fn default_cop() -> f64 {
    1.0
}

#[derive(PartialEq, Debug, Clone, Deserialize)]
struct EnergySystemRaw {
    id: String,
    name: String,
    category: String,
    efficiency: f64,
    #[serde(default = "default_cop")]
    cop: f64,
    lifetime: u32,
    energy_carrier_id: String,
}

/// Read energy systems and their cost curves from the specified project directory.
///
/// # Arguments
///
/// * `project_dir` - Folder containing project input files
/// * `energy_carriers` - All known energy carriers
/// * `limits` - Limits for validating input data
///
/// # Returns
///
/// A map of energy systems, keyed by ID, or an error.
pub fn read_energy_systems(
    project_dir: &Path,
    energy_carriers: &EnergyCarrierMap,
    limits: &ValidationConfig,
) -> Result<EnergySystemMap> {
    let file_path = project_dir.join(ENERGY_SYSTEMS_FILE_NAME);
    let systems_csv = read_csv(&file_path)?;
    let mut systems = read_energy_systems_from_iter(systems_csv, energy_carriers, limits)
        .with_context(|| input_err_msg(&file_path))?;

    let system_ids = systems.keys().cloned().collect();
    let mut curves = read_cost_curves(project_dir, &system_ids)?;
    for system in systems.values_mut() {
        if let Some(system_curves) = curves.remove(&system.id) {
            system.cost_curves = system_curves;
        }
        warn_missing_curves(system);
    }

    Ok(systems)
}

fn read_energy_systems_from_iter<I>(
    iter: I,
    energy_carriers: &EnergyCarrierMap,
    limits: &ValidationConfig,
) -> Result<EnergySystemMap>
where
    I: Iterator<Item = EnergySystemRaw>,
{
    let systems: Vec<_> = iter
        .map(|raw| energy_system_from_raw(raw, energy_carriers))
        .try_collect()?;
    let systems = collect_id_map(systems.into_iter())?;

    limits.check_count(
        "energy systems",
        systems.len(),
        limits.max_energy_systems,
    )?;

    Ok(systems)
}

fn energy_system_from_raw(
    raw: EnergySystemRaw,
    energy_carriers: &EnergyCarrierMap,
) -> Result<EnergySystem> {
    let context = || format!("Invalid energy system {}", raw.id);
    let category: SystemCategory = raw.category.parse().with_context(context)?;
    check_positive("efficiency", raw.efficiency).with_context(context)?;
    check_positive("cop", raw.cop).with_context(context)?;
    ensure!(
        raw.lifetime > 0,
        "Invalid energy system {}: lifetime must be greater than zero",
        raw.id
    );
    let energy_carrier_id = energy_carriers
        .get_id(&raw.energy_carrier_id)
        .with_context(context)?
        .clone();

    Ok(EnergySystem {
        id: EnergySystemID::from(raw.id),
        name: raw.name,
        category,
        efficiency: raw.efficiency,
        cop: raw.cop,
        lifetime: raw.lifetime,
        energy_carrier_id,
        cost_curves: CostCurveMap::new(),
    })
}

/// Warn about cost curves which the system's category needs but which were not provided.
///
/// Missing curves are treated as zero cost, which is occasionally intended (e.g. a system without
/// a separate intake) but more often an omission.
fn warn_missing_curves(system: &EnergySystem) {
    let scales: &[CurveScale] = match system.category {
        SystemCategory::Centralized => &[
            CurveScale::Substation,
            CurveScale::Intake,
            CurveScale::Generation,
            CurveScale::Circulation,
        ],
        SystemCategory::Decentralized => &[CurveScale::Substation],
        SystemCategory::None => {
            if !system.cost_curves.is_empty() {
                warn!(
                    "Cost curves for energy system {} will be ignored as its category is none",
                    system.id
                );
            }
            return;
        }
    };

    for &scale in scales {
        let missing = CostCategory::iter()
            .filter(|&category| system.cost_curve(scale, category).is_none())
            .join(", ");
        if !missing.is_empty() {
            warn!(
                "Energy system {} has no {scale} curves for: {missing}. These costs will be zero.",
                system.id
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::energy_carriers;
    use rstest::{fixture, rstest};
    use std::iter;

    #[fixture]
    fn raw_system() -> EnergySystemRaw {
        EnergySystemRaw {
            id: "GAS_BOILER".into(),
            name: "Gas boiler".into(),
            category: "decentralized".into(),
            efficiency: 0.95,
            cop: 1.0,
            lifetime: 20,
            energy_carrier_id: "GAS".into(),
        }
    }

    #[rstest]
    fn read_energy_systems_from_iter_valid(
        raw_system: EnergySystemRaw,
        energy_carriers: EnergyCarrierMap,
    ) {
        let systems = read_energy_systems_from_iter(
            iter::once(raw_system),
            &energy_carriers,
            &ValidationConfig::default(),
        )
        .unwrap();
        let system = &systems["GAS_BOILER"];
        assert_eq!(system.category, SystemCategory::Decentralized);
        assert_eq!(system.energy_carrier_id, "GAS".into());
        assert!(system.cost_curves.is_empty());
    }

    #[rstest]
    #[case::bad_category(|s: &mut EnergySystemRaw| s.category = "district".into())]
    #[case::zero_efficiency(|s: &mut EnergySystemRaw| s.efficiency = 0.0)]
    #[case::negative_cop(|s: &mut EnergySystemRaw| s.cop = -1.0)]
    #[case::zero_lifetime(|s: &mut EnergySystemRaw| s.lifetime = 0)]
    #[case::unknown_carrier(|s: &mut EnergySystemRaw| s.energy_carrier_id = "COAL".into())]
    #[case::empty_carrier(|s: &mut EnergySystemRaw| s.energy_carrier_id = "".into())]
    fn read_energy_systems_from_iter_invalid(
        mut raw_system: EnergySystemRaw,
        energy_carriers: EnergyCarrierMap,
        #[case] modify: fn(&mut EnergySystemRaw),
    ) {
        modify(&mut raw_system);
        assert!(
            read_energy_systems_from_iter(
                iter::once(raw_system),
                &energy_carriers,
                &ValidationConfig::default(),
            )
            .is_err()
        );
    }

    #[rstest]
    fn read_energy_systems_from_iter_unknown_category_error(
        mut raw_system: EnergySystemRaw,
        energy_carriers: EnergyCarrierMap,
    ) {
        raw_system.category = "district".into();
        let err = read_energy_systems_from_iter(
            iter::once(raw_system),
            &energy_carriers,
            &ValidationConfig::default(),
        )
        .unwrap_err();
        assert_eq!(
            err.root_cause().to_string(),
            "Unknown energy system category 'district'"
        );
    }

    #[rstest]
    fn read_energy_systems_from_iter_duplicate(
        raw_system: EnergySystemRaw,
        energy_carriers: EnergyCarrierMap,
    ) {
        let duplicate = EnergySystemRaw {
            name: "Another boiler".into(),
            ..raw_system.clone()
        };
        let systems = [raw_system, duplicate];
        assert!(
            read_energy_systems_from_iter(
                systems.into_iter(),
                &energy_carriers,
                &ValidationConfig::default(),
            )
            .is_err()
        );
    }
}
