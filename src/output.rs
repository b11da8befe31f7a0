//! The module responsible for writing output data to disk.
use crate::building::BuildingTypeID;
use crate::calculation::{ResultStore, ScenarioResults};
use crate::energy_system::{CostCategory, EnergySystemID};
use crate::measure::MeasureID;
use crate::project::Project;
use crate::scenario::ScenarioID;
use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};
use std::fs;
use std::fs::File;
use std::path::{Path, PathBuf};
use strum::IntoEnumIterator;

pub mod metadata;
use metadata::write_metadata;

/// The output file name for energy system results
const ENERGY_SYSTEMS_FILE_NAME: &str = "energy_systems.csv";

/// The output file name for energy system cost breakdowns
const SYSTEM_COSTS_FILE_NAME: &str = "system_costs.csv";

/// The output file name for decentralised system sizes
const DECENTRALIZED_SIZES_FILE_NAME: &str = "decentralized_sizes.csv";

/// The output file name for building measure totals
const BUILDING_MEASURES_FILE_NAME: &str = "building_measures.csv";

/// The output file name for scenario summaries
const SCENARIO_SUMMARY_FILE_NAME: &str = "scenario_summary.csv";

/// Get the default output directory for the project at the specified path
pub fn get_output_dir(project_dir: &Path, results_root: &Path) -> Result<PathBuf> {
    // Get the project name from the dir path. This ends up being convoluted because we need to
    // check for all possible errors. Ugh.
    let project_dir = project_dir
        .canonicalize() // canonicalise in case the user has specified "."
        .context("Could not resolve path to project")?;

    let project_name = project_dir
        .file_name()
        .context("Project cannot be in root folder")?
        .to_str()
        .context("Invalid chars in project dir name")?;

    Ok([results_root, Path::new(project_name)].iter().collect())
}

/// Create a new output directory for the project, optionally overwriting existing data.
///
/// # Arguments
///
/// * `output_dir` - The output directory to create/overwrite
/// * `allow_overwrite` - Whether to delete and recreate the folder if it is non-empty
///
/// # Returns
///
/// `true` if the output dir contained existing data that was deleted, `false` if not, or an error.
pub fn create_output_directory(output_dir: &Path, allow_overwrite: bool) -> Result<bool> {
    // If the folder already exists, then delete it
    let overwrite = if let Ok(mut it) = fs::read_dir(output_dir) {
        if it.next().is_none() {
            // Folder exists and is empty: nothing to do
            return Ok(false);
        }

        ensure!(
            allow_overwrite,
            "Output folder already exists and is not empty. \
            Please delete the folder or pass the --overwrite command-line option."
        );

        fs::remove_dir_all(output_dir).context("Could not delete folder")?;
        true
    } else {
        false
    };

    // Try to create the directory, with parents
    fs::create_dir_all(output_dir)?;

    Ok(overwrite)
}

/// Represents a row in the energy systems output CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct EnergySystemRow {
    scenario_id: ScenarioID,
    system_id: EnergySystemID,
    category: String,
    lifetime: u32,
    total_heating_need: f64,
    centralized_size: f64,
    primary_energy_renewable: f64,
    primary_energy_non_renewable: f64,
    primary_energy_total: f64,
    emissions: f64,
    lifetime_energy_cost: f64,
}

/// Represents a row in the system costs output CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct SystemCostRow {
    scenario_id: ScenarioID,
    system_id: EnergySystemID,
    cost_category: String,
    substation: f64,
    intake: f64,
    generation: f64,
    circulation: f64,
    total: f64,
}

/// Represents a row in the decentralised sizes output CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct DecentralizedSizeRow {
    scenario_id: ScenarioID,
    system_id: EnergySystemID,
    building_type_id: BuildingTypeID,
    building_count: u32,
    size: f64,
}

/// Represents a row in the building measures output CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct BuildingMeasureRow {
    scenario_id: ScenarioID,
    category: String,
    measure_id: MeasureID,
    occurrences: u32,
    building_count: u32,
    cost: f64,
    embodied_energy: f64,
    embodied_emissions: f64,
}

/// Represents a row in the scenario summary output CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct ScenarioSummaryRow {
    scenario_id: ScenarioID,
    total_building_area: f64,
    total_heating_need: f64,
    measure_annualized_cost: f64,
    system_annualized_cost: f64,
    annual_energy_cost: f64,
    total_annualized_cost: f64,
    embodied_emissions: f64,
    embodied_energy: f64,
    primary_energy: f64,
    emissions: f64,
}

/// An object for writing calculation results to file
struct DataWriter {
    energy_systems_writer: csv::Writer<File>,
    system_costs_writer: csv::Writer<File>,
    decentralized_sizes_writer: csv::Writer<File>,
    building_measures_writer: csv::Writer<File>,
    scenario_summary_writer: csv::Writer<File>,
}

impl DataWriter {
    /// Open CSV files to write output data to
    ///
    /// # Arguments
    ///
    /// * `output_path` - Folder where files will be saved
    fn create(output_path: &Path) -> Result<Self> {
        let new_writer = |file_name: &str| {
            let file_path = output_path.join(file_name);
            csv::Writer::from_path(&file_path)
                .with_context(|| format!("Could not create {}", file_path.display()))
        };

        Ok(Self {
            energy_systems_writer: new_writer(ENERGY_SYSTEMS_FILE_NAME)?,
            system_costs_writer: new_writer(SYSTEM_COSTS_FILE_NAME)?,
            decentralized_sizes_writer: new_writer(DECENTRALIZED_SIZES_FILE_NAME)?,
            building_measures_writer: new_writer(BUILDING_MEASURES_FILE_NAME)?,
            scenario_summary_writer: new_writer(SCENARIO_SUMMARY_FILE_NAME)?,
        })
    }

    /// Write all results for a scenario
    fn write_scenario(&mut self, scenario_id: &ScenarioID, results: &ScenarioResults) -> Result<()> {
        for result in results.systems.values() {
            self.energy_systems_writer.serialize(EnergySystemRow {
                scenario_id: scenario_id.clone(),
                system_id: result.system_id.clone(),
                category: result.category.to_string(),
                lifetime: result.lifetime,
                total_heating_need: result.total_heating_need,
                centralized_size: result.centralized_size,
                primary_energy_renewable: result.primary_energy.renewable,
                primary_energy_non_renewable: result.primary_energy.non_renewable,
                primary_energy_total: result.primary_energy.total,
                emissions: result.emissions,
                lifetime_energy_cost: result.lifetime_energy_cost,
            })?;

            for cost_category in CostCategory::iter() {
                let costs = result.costs(cost_category);
                self.system_costs_writer.serialize(SystemCostRow {
                    scenario_id: scenario_id.clone(),
                    system_id: result.system_id.clone(),
                    cost_category: cost_category.to_string(),
                    substation: costs.substation,
                    intake: costs.intake,
                    generation: costs.generation,
                    circulation: costs.circulation,
                    total: costs.total(),
                })?;
            }

            for size in &result.decentralized_sizes {
                self.decentralized_sizes_writer
                    .serialize(DecentralizedSizeRow {
                        scenario_id: scenario_id.clone(),
                        system_id: result.system_id.clone(),
                        building_type_id: size.building_type_id.clone(),
                        building_count: size.building_count,
                        size: size.size,
                    })?;
            }
        }

        for (category, measures) in &results.measures {
            for (measure_id, totals) in measures {
                self.building_measures_writer
                    .serialize(BuildingMeasureRow {
                        scenario_id: scenario_id.clone(),
                        category: category.to_string(),
                        measure_id: measure_id.clone(),
                        occurrences: totals.occurrences,
                        building_count: totals.building_count,
                        cost: totals.cost,
                        embodied_energy: totals.embodied_energy,
                        embodied_emissions: totals.embodied_emissions,
                    })?;
            }
        }

        let summary = &results.summary;
        let specific = &summary.specific;
        self.scenario_summary_writer.serialize(ScenarioSummaryRow {
            scenario_id: scenario_id.clone(),
            total_building_area: summary.total_building_area,
            total_heating_need: summary.total_heating_need,
            measure_annualized_cost: specific.measure_annualized_cost,
            system_annualized_cost: specific.system_annualized_cost,
            annual_energy_cost: specific.annual_energy_cost,
            total_annualized_cost: specific.total_annualized_cost,
            embodied_emissions: specific.embodied_emissions,
            embodied_energy: specific.embodied_energy,
            primary_energy: specific.primary_energy,
            emissions: specific.emissions,
        })?;

        Ok(())
    }

    /// Flush the underlying streams
    fn flush(&mut self) -> Result<()> {
        self.energy_systems_writer.flush()?;
        self.system_costs_writer.flush()?;
        self.decentralized_sizes_writer.flush()?;
        self.building_measures_writer.flush()?;
        self.scenario_summary_writer.flush()?;

        Ok(())
    }
}

/// Write the results of every successfully calculated scenario, plus run metadata.
///
/// # Arguments
///
/// * `output_path` - Folder where files will be saved
/// * `project` - The project the results were calculated for
/// * `store` - The calculated results
pub fn write_results(output_path: &Path, project: &Project, store: &ResultStore) -> Result<()> {
    write_metadata(output_path, &project.project_path).context("Failed to save metadata")?;

    let mut writer = DataWriter::create(output_path)?;
    for (scenario_id, results) in store.iter() {
        writer
            .write_scenario(scenario_id, results)
            .with_context(|| format!("Failed to write results for scenario {scenario_id}"))?;
    }
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::project;
    use crate::measure::MeasureCategory;
    use itertools::Itertools;
    use rstest::rstest;
    use serde::de::DeserializeOwned;
    use tempfile::tempdir;

    fn read_rows<T: DeserializeOwned>(file_path: &Path) -> Vec<T> {
        csv::Reader::from_path(file_path)
            .unwrap()
            .into_deserialize()
            .try_collect()
            .unwrap()
    }

    #[rstest]
    fn write_results_works(project: Project) {
        let dir = tempdir().unwrap();
        let mut store = ResultStore::new();
        assert!(store.recalculate(&project).is_empty());
        write_results(dir.path(), &project, &store).unwrap();

        let results = store.get(&"RENO".into()).unwrap();
        let system = &results.systems["GAS_BOILER"];

        let rows: Vec<EnergySystemRow> = read_rows(&dir.path().join(ENERGY_SYSTEMS_FILE_NAME));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].category, "decentralized");
        assert_eq!(rows[0].lifetime_energy_cost, system.lifetime_energy_cost);

        let rows: Vec<SystemCostRow> = read_rows(&dir.path().join(SYSTEM_COSTS_FILE_NAME));
        assert_eq!(
            rows.iter().map(|row| row.cost_category.as_str()).collect_vec(),
            ["investment", "maintenance", "embodied"]
        );
        assert_eq!(rows[0].total, system.investment.total());

        let rows: Vec<DecentralizedSizeRow> =
            read_rows(&dir.path().join(DECENTRALIZED_SIZES_FILE_NAME));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].building_type_id, "SFH".into());
        assert_eq!(rows[0].size, system.decentralized_sizes[0].size);

        let rows: Vec<BuildingMeasureRow> =
            read_rows(&dir.path().join(BUILDING_MEASURES_FILE_NAME));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].category, MeasureCategory::Hvac.to_string());
        assert_eq!(rows[0].measure_id, "HVAC_STD".into());

        let rows: Vec<ScenarioSummaryRow> =
            read_rows(&dir.path().join(SCENARIO_SUMMARY_FILE_NAME));
        assert_eq!(rows.len(), 1);
        assert_eq!(
            rows[0].total_building_area,
            results.summary.total_building_area
        );

        assert!(dir.path().join("metadata.toml").is_file());
    }

    #[test]
    fn create_output_directory_new_directory() {
        let temp_dir = tempdir().unwrap();
        let output_dir = temp_dir.path().join("new_output");

        // Create a new directory should succeed and return false (no overwrite)
        let result = create_output_directory(&output_dir, false).unwrap();
        assert!(!result);
        assert!(output_dir.exists());
        assert!(output_dir.is_dir());
    }

    #[test]
    fn create_output_directory_existing_empty_directory() {
        let temp_dir = tempdir().unwrap();
        let output_dir = temp_dir.path().join("empty_output");
        fs::create_dir(&output_dir).unwrap();

        let result = create_output_directory(&output_dir, false).unwrap();
        assert!(!result);
        assert!(output_dir.is_dir());
    }

    #[rstest]
    #[case(false)]
    #[case(true)]
    fn create_output_directory_existing_with_files(#[case] allow_overwrite: bool) {
        let temp_dir = tempdir().unwrap();
        let output_dir = temp_dir.path().join("output_with_files");
        fs::create_dir(&output_dir).unwrap();
        fs::write(output_dir.join("existing_file.txt"), "some content").unwrap();

        let result = create_output_directory(&output_dir, allow_overwrite);
        if allow_overwrite {
            assert!(result.unwrap());
            assert!(!output_dir.join("existing_file.txt").exists());
        } else {
            assert!(result.is_err());
            assert!(output_dir.join("existing_file.txt").exists());
        }
    }

    #[test]
    fn get_output_dir_uses_project_dir_name() {
        let temp_dir = tempdir().unwrap();
        let project_dir = temp_dir.path().join("my_project");
        fs::create_dir(&project_dir).unwrap();

        let output_dir = get_output_dir(&project_dir, Path::new("results")).unwrap();
        assert_eq!(output_dir, Path::new("results").join("my_project"));
    }
}
