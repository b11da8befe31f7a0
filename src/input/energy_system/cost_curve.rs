//! Code for reading energy system cost curves from a CSV file.
use super::super::{input_err_msg, read_csv_optional};
use crate::curve::CostCurve;
use crate::energy_system::{CostCategory, CostCurveMap, CurveScale, EnergySystemID};
use crate::id::IDCollection;
use anyhow::{Context, Result};
use indexmap::{IndexMap, IndexSet};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

const COST_CURVES_FILE_NAME: &str = "energy_system_cost_curves.csv";

/// One sample of a cost curve
#[derive(PartialEq, Debug, Deserialize)]
struct CostCurvePointRaw {
    system_id: String,
    scale: CurveScale,
    category: CostCategory,
    size: f64,
    value: f64,
}

/// Read cost curves for energy systems from the specified project directory.
///
/// Points for each curve are taken in the order they appear in the file. The file is optional;
/// systems without curves have zero costs.
///
/// # Arguments
///
/// * `project_dir` - Folder containing project input files
/// * `system_ids` - All known energy system IDs
///
/// # Returns
///
/// A map of cost curves for each system which has any, or an error.
pub fn read_cost_curves(
    project_dir: &Path,
    system_ids: &IndexSet<EnergySystemID>,
) -> Result<HashMap<EnergySystemID, CostCurveMap>> {
    let file_path = project_dir.join(COST_CURVES_FILE_NAME);
    let points = read_csv_optional(&file_path)?;
    read_cost_curves_from_iter(points, system_ids).with_context(|| input_err_msg(&file_path))
}

fn read_cost_curves_from_iter<I>(
    iter: I,
    system_ids: &IndexSet<EnergySystemID>,
) -> Result<HashMap<EnergySystemID, CostCurveMap>>
where
    I: Iterator<Item = CostCurvePointRaw>,
{
    // Gather the points for each curve, preserving order
    let mut points: IndexMap<(EnergySystemID, CurveScale, CostCategory), (Vec<f64>, Vec<f64>)> =
        IndexMap::new();
    for point in iter {
        let system_id = system_ids.get_id(&point.system_id)?;
        let (sizes, values) = points
            .entry((system_id.clone(), point.scale, point.category))
            .or_default();
        sizes.push(point.size);
        values.push(point.value);
    }

    let mut curves: HashMap<EnergySystemID, CostCurveMap> = HashMap::new();
    for ((system_id, scale, category), (sizes, values)) in points {
        let curve = CostCurve::new(sizes, values).with_context(|| {
            format!("Invalid {scale} {category} cost curve for energy system {system_id}")
        })?;
        curves
            .entry(system_id)
            .or_default()
            .insert((scale, category), curve);
    }

    Ok(curves)
}
