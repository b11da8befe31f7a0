//! Code for reading building types from a CSV file.
use super::{check_non_negative, check_positive, input_err_msg, read_csv_id_file};
use crate::building::{BuildingType, BuildingTypeID, BuildingTypeMap};
use crate::project::ValidationConfig;
use anyhow::{Context, Result, ensure};
use std::path::Path;

const BUILDING_TYPES_FILE_NAME: &str = "building_types.csv";

/// Read building types from the specified project directory.
///
/// # Arguments
///
/// * `project_dir` - Folder containing project input files
/// * `limits` - Limits for validating input data
///
/// # Returns
///
/// A map of building types, keyed by ID, or an error.
pub fn read_building_types(
    project_dir: &Path,
    limits: &ValidationConfig,
) -> Result<BuildingTypeMap> {
    let file_path = project_dir.join(BUILDING_TYPES_FILE_NAME);
    let building_types = read_csv_id_file::<BuildingType, BuildingTypeID>(&file_path)?;
    validate_building_types(&building_types, limits).with_context(|| input_err_msg(&file_path))?;

    Ok(building_types)
}

fn validate_building_types(
    building_types: &BuildingTypeMap,
    limits: &ValidationConfig,
) -> Result<()> {
    limits.check_count(
        "building types",
        building_types.len(),
        limits.max_building_types,
    )?;

    for building_type in building_types.values() {
        validate_building_type(building_type)
            .with_context(|| format!("Invalid building type {}", building_type.id))?;
    }

    Ok(())
}

fn validate_building_type(building_type: &BuildingType) -> Result<()> {
    for (name, value) in building_type.iter_quantities() {
        check_non_negative(name, value)?;
    }
    check_positive("floor_area", building_type.floor_area)?;
    ensure!(building_type.floor_count > 0, "floor_count cannot be zero");
    ensure!(
        building_type.indoor_temperature.is_finite(),
        "indoor_temperature must be a finite number"
    );

    Ok(())
}
