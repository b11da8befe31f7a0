//! Renovation measures which can be applied to building types.
use crate::error::EngineError;
use crate::id::{define_id_getter, define_id_type};
use indexmap::IndexMap;
use serde_string_enum::DeserializeLabeledStringEnum;
use strum::{Display, EnumIter};

define_id_type! {MeasureID}

/// A map of [`BuildingMeasure`]s, keyed by measure ID
pub type BuildingMeasureMap = IndexMap<MeasureID, BuildingMeasure>;

/// The part of a building a measure applies to
#[derive(
    PartialEq,
    Eq,
    Debug,
    Clone,
    Copy,
    Hash,
    PartialOrd,
    Ord,
    DeserializeLabeledStringEnum,
    Display,
    EnumIter,
)]
#[strum(serialize_all = "snake_case")]
pub enum MeasureCategory {
    /// Roof insulation
    #[string = "roof"]
    Roof,
    /// Facade insulation
    #[string = "facade"]
    Facade,
    /// Insulation of the floor slab or basement ceiling
    #[string = "foundation"]
    Foundation,
    /// Heat distribution and emission within the building
    #[string = "hvac"]
    Hvac,
    /// Window replacement
    #[string = "windows"]
    Windows,
}

/// The insulated envelope surfaces
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum EnvelopeSurface {
    /// The roof
    Roof,
    /// The facade
    Facade,
}

/// The category-specific properties of a measure
#[derive(PartialEq, Debug, Clone)]
pub enum MeasureKind {
    /// Insulation of the roof or facade
    Envelope {
        /// Which surface is insulated
        surface: EnvelopeSurface,
        /// U-value of the surface after renovation (W/(m²·K))
        u_value: f64,
        /// Thickness of the added insulation (m)
        insulation_thickness: Option<f64>,
    },
    /// New windows
    Window {
        /// U-value of the new windows (W/(m²·K))
        u_value: f64,
        /// Solar energy transmittance of the glazing
        g_value: f64,
    },
    /// New heat distribution and emission
    Hvac {
        /// Efficiency of distribution and emission within the building
        efficiency: f64,
    },
    /// Insulation of the floor slab or basement ceiling
    Foundation {
        /// U-value of the floor after renovation (W/(m²·K))
        u_value: f64,
        /// Thickness of the added insulation (m)
        insulation_thickness: Option<f64>,
    },
}

/// A renovation measure
#[derive(PartialEq, Debug, Clone)]
pub struct BuildingMeasure {
    /// Unique identifier for the measure (e.g. "ROOF_20CM")
    pub id: MeasureID,
    /// Human-readable name
    pub name: String,
    /// Renovation cost
    pub cost: f64,
    /// Service lifetime in years
    pub lifetime: u32,
    /// Embodied energy (kWh)
    pub embodied_energy: f64,
    /// Embodied emissions (kg CO2-eq)
    pub embodied_emissions: f64,
    /// Category-specific properties
    pub kind: MeasureKind,
}
define_id_getter! {BuildingMeasure, MeasureID}

impl BuildingMeasure {
    /// The category the measure belongs to
    pub fn category(&self) -> MeasureCategory {
        match self.kind {
            MeasureKind::Envelope {
                surface: EnvelopeSurface::Roof,
                ..
            } => MeasureCategory::Roof,
            MeasureKind::Envelope {
                surface: EnvelopeSurface::Facade,
                ..
            } => MeasureCategory::Facade,
            MeasureKind::Window { .. } => MeasureCategory::Windows,
            MeasureKind::Hvac { .. } => MeasureCategory::Hvac,
            MeasureKind::Foundation { .. } => MeasureCategory::Foundation,
        }
    }

    /// Check that the measure can be annualised over its lifetime
    pub fn check_valid(&self) -> Result<(), EngineError> {
        if self.lifetime == 0 {
            return Err(EngineError::InvalidBuildingMeasure {
                measure_id: self.id.clone(),
                reason: "lifetime must be greater than zero".to_string(),
            });
        }

        Ok(())
    }

    /// The U-value after renovation, for measures which change one
    pub fn u_value(&self) -> Option<f64> {
        match self.kind {
            MeasureKind::Envelope { u_value, .. }
            | MeasureKind::Window { u_value, .. }
            | MeasureKind::Foundation { u_value, .. } => Some(u_value),
            MeasureKind::Hvac { .. } => None,
        }
    }

    /// The distribution efficiency, for HVAC measures
    pub fn efficiency(&self) -> Option<f64> {
        match self.kind {
            MeasureKind::Hvac { efficiency } => Some(efficiency),
            _ => None,
        }
    }
}
