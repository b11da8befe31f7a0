//! Code for reading building measures from a CSV file.
use super::{check_non_negative, check_positive, collect_id_map, input_err_msg, read_csv};
use crate::measure::{
    BuildingMeasure, BuildingMeasureMap, EnvelopeSurface, MeasureCategory, MeasureID, MeasureKind,
};
use crate::project::ValidationConfig;
use anyhow::{Context, Result, ensure};
use itertools::Itertools;
use log::warn;
use serde::Deserialize;
use std::path::Path;

const BUILDING_MEASURES_FILE_NAME: &str = "building_measures.csv";

#[derive(PartialEq, Debug, Clone, Deserialize)]
struct BuildingMeasureRaw {
    id: String,
    name: String,
    category: MeasureCategory,
    cost: f64,
    lifetime: u32,
    #[serde(default)]
    embodied_energy: f64,
    #[serde(default)]
    embodied_emissions: f64,
    #[serde(default)]
    u_value: Option<f64>,
    #[serde(default)]
    g_value: Option<f64>,
    #[serde(default)]
    efficiency: Option<f64>,
    #[serde(default)]
    insulation_thickness: Option<f64>,
}

impl BuildingMeasureRaw {
    fn validate(&self) -> Result<()> {
        check_non_negative("cost", self.cost)?;
        check_non_negative("embodied_energy", self.embodied_energy)?;
        check_non_negative("embodied_emissions", self.embodied_emissions)?;
        ensure!(self.lifetime > 0, "lifetime must be greater than zero");

        Ok(())
    }

    fn u_value(&self) -> Result<f64> {
        let u_value = self
            .u_value
            .with_context(|| format!("u_value is required for {} measures", self.category))?;
        check_positive("u_value", u_value)?;
        Ok(u_value)
    }

    fn insulation_thickness(&self) -> Result<Option<f64>> {
        if let Some(thickness) = self.insulation_thickness {
            check_non_negative("insulation_thickness", thickness)?;
        }
        Ok(self.insulation_thickness)
    }

    /// Build the category-specific part of the measure
    fn kind(&self) -> Result<MeasureKind> {
        let kind = match self.category {
            MeasureCategory::Roof | MeasureCategory::Facade => MeasureKind::Envelope {
                surface: if self.category == MeasureCategory::Roof {
                    EnvelopeSurface::Roof
                } else {
                    EnvelopeSurface::Facade
                },
                u_value: self.u_value()?,
                insulation_thickness: self.insulation_thickness()?,
            },
            MeasureCategory::Foundation => MeasureKind::Foundation {
                u_value: self.u_value()?,
                insulation_thickness: self.insulation_thickness()?,
            },
            MeasureCategory::Windows => {
                let g_value = self
                    .g_value
                    .context("g_value is required for windows measures")?;
                ensure!(
                    (0.0..=1.0).contains(&g_value),
                    "g_value must be between 0 and 1 (got {g_value})"
                );
                MeasureKind::Window {
                    u_value: self.u_value()?,
                    g_value,
                }
            }
            MeasureCategory::Hvac => {
                let efficiency = self
                    .efficiency
                    .context("efficiency is required for hvac measures")?;
                check_positive("efficiency", efficiency)?;
                MeasureKind::Hvac { efficiency }
            }
        };

        Ok(kind)
    }

    /// Names of the given fields which do not apply to this measure's category
    fn unused_fields(&self) -> Vec<&'static str> {
        let applicable: &[&str] = match self.category {
            MeasureCategory::Roof | MeasureCategory::Facade | MeasureCategory::Foundation => {
                &["u_value", "insulation_thickness"]
            }
            MeasureCategory::Windows => &["u_value", "g_value"],
            MeasureCategory::Hvac => &["efficiency"],
        };

        [
            ("u_value", self.u_value.is_some()),
            ("g_value", self.g_value.is_some()),
            ("efficiency", self.efficiency.is_some()),
            ("insulation_thickness", self.insulation_thickness.is_some()),
        ]
        .into_iter()
        .filter(|(name, given)| *given && !applicable.contains(name))
        .map(|(name, _)| name)
        .collect()
    }
}

/// Read building measures from the specified project directory.
///
/// # Arguments
///
/// * `project_dir` - Folder containing project input files
/// * `limits` - Limits for validating input data
///
/// # Returns
///
/// A map of building measures, keyed by ID, or an error.
pub fn read_building_measures(
    project_dir: &Path,
    limits: &ValidationConfig,
) -> Result<BuildingMeasureMap> {
    let file_path = project_dir.join(BUILDING_MEASURES_FILE_NAME);
    let measures_csv = read_csv(&file_path)?;
    read_building_measures_from_iter(measures_csv, limits)
        .with_context(|| input_err_msg(&file_path))
}

fn read_building_measures_from_iter<I>(
    iter: I,
    limits: &ValidationConfig,
) -> Result<BuildingMeasureMap>
where
    I: Iterator<Item = BuildingMeasureRaw>,
{
    let measures: Vec<_> = iter
        .map(|raw| {
            building_measure_from_raw(&raw)
                .with_context(|| format!("Invalid building measure {}", raw.id))
        })
        .try_collect()?;
    let measures = collect_id_map(measures.into_iter())?;

    limits.check_count(
        "building measures",
        measures.len(),
        limits.max_building_measures,
    )?;

    Ok(measures)
}

fn building_measure_from_raw(raw: &BuildingMeasureRaw) -> Result<BuildingMeasure> {
    raw.validate()?;
    let kind = raw.kind()?;

    let unused = raw.unused_fields();
    if !unused.is_empty() {
        warn!(
            "Ignoring fields which do not apply to {} measure {}: {}",
            raw.category,
            raw.id,
            unused.join(", ")
        );
    }

    Ok(BuildingMeasure {
        id: MeasureID::from(raw.id.as_str()),
        name: raw.name.clone(),
        cost: raw.cost,
        lifetime: raw.lifetime,
        embodied_energy: raw.embodied_energy,
        embodied_emissions: raw.embodied_emissions,
        kind,
    })
}
