//! Common routines for handling input data.
use crate::id::{HasID, IDLike};
use crate::project::{CalculationData, DistrictClimate, Project, ProjectParameters};
use anyhow::{Context, Result, bail, ensure};
use indexmap::IndexMap;
use itertools::Itertools;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

mod building_type;
use building_type::read_building_types;
mod energy_carrier;
use energy_carrier::read_energy_carriers;
mod energy_system;
use energy_system::read_energy_systems;
mod measure;
use measure::read_building_measures;
mod scenario;
use scenario::read_scenarios;

/// Read a series of type `T`s from a CSV file.
///
/// Will raise an error if the file is empty.
///
/// # Arguments
///
/// * `file_path` - Path to the CSV file
pub fn read_csv<'a, T: DeserializeOwned + 'a>(
    file_path: &'a Path,
) -> Result<impl Iterator<Item = T> + 'a> {
    let vec = read_csv_internal(file_path)?;
    if vec.is_empty() {
        bail!("CSV file {} cannot be empty", file_path.display());
    }
    Ok(vec.into_iter())
}

/// Read a series of type `T`s from a CSV file.
///
/// The file may be empty or missing, in which case an empty iterator is returned.
///
/// # Arguments
///
/// * `file_path` - Path to the CSV file
pub fn read_csv_optional<'a, T: DeserializeOwned + 'a>(
    file_path: &'a Path,
) -> Result<impl Iterator<Item = T> + 'a> {
    if !file_path.exists() {
        return Ok(Vec::new().into_iter());
    }

    let vec = read_csv_internal(file_path)?;
    Ok(vec.into_iter())
}

fn read_csv_internal<T: DeserializeOwned>(file_path: &Path) -> Result<Vec<T>> {
    let vec = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(file_path)
        .with_context(|| input_err_msg(file_path))?
        .into_deserialize()
        .process_results(|iter| iter.collect_vec())
        .with_context(|| input_err_msg(file_path))?;

    Ok(vec)
}

/// Parse a TOML file at the specified path.
///
/// # Arguments
///
/// * `file_path` - Path to the TOML file
///
/// # Returns
///
/// * The deserialised TOML data or an error if the file could not be read or parsed.
pub fn read_toml<T: DeserializeOwned>(file_path: &Path) -> Result<T> {
    let toml_str = fs::read_to_string(file_path).with_context(|| input_err_msg(file_path))?;
    let toml_data = toml::from_str(&toml_str).with_context(|| input_err_msg(file_path))?;
    Ok(toml_data)
}

/// Format an error message to include the file path. To be used with `anyhow::Context`.
pub fn input_err_msg<P: AsRef<Path>>(file_path: P) -> String {
    format!("Error reading {}", file_path.as_ref().display())
}

/// Read a CSV file of items with IDs.
///
/// As this function is only ever used for top-level CSV files (i.e. the ones which actually define
/// the IDs for a given type), we use an ordered map to maintain the order in the input files.
fn read_csv_id_file<T, ID: IDLike>(file_path: &Path) -> Result<IndexMap<ID, T>>
where
    T: HasID<ID> + DeserializeOwned,
{
    fn fill_and_validate_map<T, ID: IDLike>(file_path: &Path) -> Result<IndexMap<ID, T>>
    where
        T: HasID<ID> + DeserializeOwned,
    {
        collect_id_map(read_csv::<T>(file_path)?)
    }

    fill_and_validate_map(file_path).with_context(|| input_err_msg(file_path))
}

/// Collect items with IDs into a map, checking that IDs are non-empty and unique
fn collect_id_map<T, ID: IDLike, I>(iter: I) -> Result<IndexMap<ID, T>>
where
    T: HasID<ID>,
    I: Iterator<Item = T>,
{
    let mut map = IndexMap::new();
    for record in iter {
        let id = record.get_id().clone();
        ensure!(!id.to_string().trim().is_empty(), "Empty ID found");

        let existing = map.insert(id.clone(), record).is_some();
        ensure!(!existing, "Duplicate ID found: {id}");
    }

    Ok(map)
}

/// Check that a quantity is a finite number greater than or equal to zero
pub fn check_non_negative(name: &str, value: f64) -> Result<()> {
    ensure!(
        value.is_finite() && value >= 0.0,
        "{name} must be a finite number greater than or equal to zero (got {value})"
    );

    Ok(())
}

/// Check that a quantity is a finite number greater than zero
pub fn check_positive(name: &str, value: f64) -> Result<()> {
    ensure!(
        value.is_finite() && value > 0.0,
        "{name} must be a finite number greater than zero (got {value})"
    );

    Ok(())
}

/// Read a project from the specified directory.
///
/// # Arguments
///
/// * `project_dir` - Folder containing project input files
///
/// # Returns
///
/// The static project data or an error.
pub fn load_project<P: AsRef<Path>>(project_dir: P) -> Result<Project> {
    let project_dir = project_dir.as_ref();
    let parameters = ProjectParameters::from_path(project_dir)?;
    let limits = &parameters.validation;

    let building_types = read_building_types(project_dir, limits)?;
    let energy_carriers = read_energy_carriers(project_dir)?;
    let energy_systems = read_energy_systems(project_dir, &energy_carriers, limits)?;
    let building_measures = read_building_measures(project_dir, limits)?;
    let scenarios = read_scenarios(
        project_dir,
        &parameters,
        &building_types,
        &energy_systems,
        &building_measures,
    )?;

    let calculation_data = CalculationData {
        building_types,
        energy_systems,
        energy_carriers,
        building_measures,
        climate: DistrictClimate {
            outdoor_design_temperature: parameters.outdoor_design_temperature,
        },
    };

    Ok(Project {
        project_path: project_dir.to_path_buf(),
        parameters,
        calculation_data,
        scenarios,
    })
}
