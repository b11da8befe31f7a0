//! Read and validate project parameters from `project.toml`.
//!
//! Besides the district climate and economic defaults, the file carries the limits used when
//! validating the rest of the project's input data.
use crate::input::{input_err_msg, read_toml};
use crate::scenario::LifetimeEnergyCostMode;
use anyhow::{Context, Result, ensure};
use serde::Deserialize;
use serde_string_enum::DeserializeLabeledStringEnum;
use std::path::Path;
use strum::Display;

const PROJECT_PARAMETERS_FILE_NAME: &str = "project.toml";

/// The input format versions this version of the program can read
pub const SUPPORTED_FORMAT_VERSIONS: [&str; 1] = ["1"];

macro_rules! define_param_default {
    ($name:ident, $type: ty, $value: expr) => {
        fn $name() -> $type {
            $value
        }
    };
}

define_param_default!(default_max_building_types, usize, 500);
define_param_default!(default_max_scenarios, usize, 50);
define_param_default!(default_max_energy_systems, usize, 200);
define_param_default!(default_max_building_measures, usize, 1000);
define_param_default!(
    default_supported_format_versions,
    Vec<String>,
    SUPPORTED_FORMAT_VERSIONS.map(String::from).to_vec()
);

/// How the costs and embodied impacts of measures are added up within a scenario
#[derive(PartialEq, Eq, Debug, Clone, Copy, Default, DeserializeLabeledStringEnum, Display)]
#[strum(serialize_all = "snake_case")]
pub enum MeasureAggregation {
    /// Each distinct measure is counted once, however many building types use it
    #[default]
    #[string = "per_measure"]
    PerMeasure,
    /// Each building a measure is applied to counts once
    #[string = "per_building"]
    PerBuilding,
}

/// Limits applied when validating input data
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct ValidationConfig {
    /// The maximum number of building types in a project
    #[serde(default = "default_max_building_types")]
    pub max_building_types: usize,
    /// The maximum number of scenarios in a project
    #[serde(default = "default_max_scenarios")]
    pub max_scenarios: usize,
    /// The maximum number of energy systems in a project
    #[serde(default = "default_max_energy_systems")]
    pub max_energy_systems: usize,
    /// The maximum number of building measures in a project
    #[serde(default = "default_max_building_measures")]
    pub max_building_measures: usize,
    /// Input format versions which are accepted
    #[serde(default = "default_supported_format_versions")]
    pub supported_format_versions: Vec<String>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_building_types: default_max_building_types(),
            max_scenarios: default_max_scenarios(),
            max_energy_systems: default_max_energy_systems(),
            max_building_measures: default_max_building_measures(),
            supported_format_versions: default_supported_format_versions(),
        }
    }
}

impl ValidationConfig {
    /// Check that a collection of the given kind does not exceed its limit
    pub fn check_count(&self, kind: &str, count: usize, max: usize) -> Result<()> {
        ensure!(
            count <= max,
            "Too many {kind}: {count} given, but the maximum is {max}"
        );

        Ok(())
    }

    /// Check that the limits themselves are usable
    fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("max_building_types", self.max_building_types),
            ("max_scenarios", self.max_scenarios),
            ("max_energy_systems", self.max_energy_systems),
            ("max_building_measures", self.max_building_measures),
        ] {
            ensure!(value > 0, "{name} cannot be zero");
        }
        ensure!(
            !self.supported_format_versions.is_empty(),
            "supported_format_versions is empty"
        );

        Ok(())
    }
}

/// Project parameters as defined in the `project.toml` file.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct ProjectParameters {
    /// Name of the project
    pub name: String,
    /// Version of the input format the project is written in
    pub format_version: String,
    /// Outdoor temperature used for sizing heating systems (°C)
    pub outdoor_design_temperature: f64,
    /// How lifetime energy costs are calculated, unless a scenario says otherwise
    #[serde(default)]
    pub lifetime_energy_cost_mode: LifetimeEnergyCostMode,
    /// How measure costs and embodied impacts are added up within a scenario
    #[serde(default)]
    pub measure_aggregation: MeasureAggregation,
    /// Limits for validating the other input files
    #[serde(default)]
    pub validation: ValidationConfig,
}

/// Check that the `format_version` parameter is one we can read
fn check_format_version(version: &str, supported: &[String]) -> Result<()> {
    ensure!(
        supported.iter().any(|v| v == version),
        "Unsupported format_version '{version}'. Supported versions: {}",
        supported.join(", ")
    );

    Ok(())
}

/// Check that the `outdoor_design_temperature` parameter is valid
fn check_outdoor_design_temperature(value: f64) -> Result<()> {
    ensure!(
        value.is_finite(),
        "outdoor_design_temperature must be a finite number"
    );

    Ok(())
}

impl ProjectParameters {
    /// Read a project file from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `project_dir` - Folder containing project input files
    ///
    /// # Returns
    ///
    /// The file contents as a [`ProjectParameters`] struct or an error if the file is invalid
    pub fn from_path<P: AsRef<Path>>(project_dir: P) -> Result<ProjectParameters> {
        let file_path = project_dir.as_ref().join(PROJECT_PARAMETERS_FILE_NAME);
        let params: ProjectParameters = read_toml(&file_path)?;

        params
            .validate()
            .with_context(|| input_err_msg(file_path))?;

        Ok(params)
    }

    /// Validate parameters after reading in file
    fn validate(&self) -> Result<()> {
        ensure!(!self.name.trim().is_empty(), "Project name is empty");

        self.validation
            .validate()
            .context("Invalid validation limits")?;

        check_format_version(
            &self.format_version,
            &self.validation.supported_format_versions,
        )?;

        check_outdoor_design_temperature(self.outdoor_design_temperature)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn project_params_from_path() {
        let dir = tempdir().unwrap();
        {
            let mut file = File::create(dir.path().join(PROJECT_PARAMETERS_FILE_NAME)).unwrap();
            writeln!(
                file,
                "name = \"Test\"\nformat_version = \"1\"\noutdoor_design_temperature = -12.0"
            )
            .unwrap();
        }

        let params = ProjectParameters::from_path(dir.path()).unwrap();
        assert_eq!(params.outdoor_design_temperature, -12.0);
        assert_eq!(
            params.lifetime_energy_cost_mode,
            LifetimeEnergyCostMode::ProjectedPrice
        );
        assert_eq!(params.measure_aggregation, MeasureAggregation::PerMeasure);
        assert_eq!(params.validation, ValidationConfig::default());
    }

    #[test]
    fn project_params_from_path_with_options() {
        let dir = tempdir().unwrap();
        {
            let mut file = File::create(dir.path().join(PROJECT_PARAMETERS_FILE_NAME)).unwrap();
            writeln!(
                file,
                "name = \"Test\"
format_version = \"2\"
outdoor_design_temperature = -12.0
lifetime_energy_cost_mode = \"annual_increase\"
measure_aggregation = \"per_building\"

[validation]
max_scenarios = 3
supported_format_versions = [\"1\", \"2\"]"
            )
            .unwrap();
        }

        let params = ProjectParameters::from_path(dir.path()).unwrap();
        assert_eq!(
            params.lifetime_energy_cost_mode,
            LifetimeEnergyCostMode::AnnualIncrease
        );
        assert_eq!(params.measure_aggregation, MeasureAggregation::PerBuilding);
        assert_eq!(params.validation.max_scenarios, 3);
        assert_eq!(
            params.validation.max_building_types,
            default_max_building_types()
        );
    }

    #[rstest]
    #[case("1", true)]
    #[case("2", false)]
    #[case("", false)]
    fn check_format_version_works(#[case] version: &str, #[case] expected_valid: bool) {
        let supported = default_supported_format_versions();
        assert_eq!(
            check_format_version(version, &supported).is_ok(),
            expected_valid
        );
    }

    #[rstest]
    #[case(-10.0, true)]
    #[case(0.0, true)]
    #[case(f64::NAN, false)]
    #[case(f64::NEG_INFINITY, false)]
    fn check_outdoor_design_temperature_works(#[case] value: f64, #[case] expected_valid: bool) {
        assert_eq!(
            check_outdoor_design_temperature(value).is_ok(),
            expected_valid
        );
    }

    #[test]
    fn validation_config_check_count() {
        let config = ValidationConfig::default();
        config
            .check_count("scenarios", 2, config.max_scenarios)
            .unwrap();
        assert!(config.check_count("scenarios", 51, config.max_scenarios).is_err());
    }

    #[test]
    fn validation_config_zero_limit() {
        let config = ValidationConfig {
            max_scenarios: 0,
            ..ValidationConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
