//! Building types are archetypes shared by one or more real buildings in a scenario.
use crate::id::{define_id_getter, define_id_type};
use indexmap::IndexMap;
use serde::Deserialize;

define_id_type! {BuildingTypeID}

/// A map of [`BuildingType`]s, keyed by building type ID
pub type BuildingTypeMap = IndexMap<BuildingTypeID, BuildingType>;

/// A reusable building archetype with its geometry and thermal properties.
///
/// Areas are in m², U-values in W/(m²·K) and temperatures in °C.
#[derive(PartialEq, Debug, Deserialize, Clone)]
pub struct BuildingType {
    /// Unique identifier for the building type (e.g. "SFH_1960")
    pub id: BuildingTypeID,
    /// Human-readable name
    pub name: String,
    /// Whether the building type has been removed by the user.
    ///
    /// Building types are never removed from a project, only flagged as deleted.
    #[serde(default)]
    pub deleted: bool,
    /// Heated floor area of one building
    pub floor_area: f64,
    /// Opaque facade area
    pub facade_area: f64,
    /// Window area
    pub window_area: f64,
    /// Roof area
    pub roof_area: f64,
    /// Area of the floor slab or basement ceiling
    pub basement_area: f64,
    /// Number of storeys
    pub floor_count: u32,
    /// Perimeter of the building footprint (m)
    pub perimeter: f64,
    /// U-value of the facade
    pub u_facade: f64,
    /// U-value of the windows
    pub u_window: f64,
    /// U-value of the roof
    pub u_roof: f64,
    /// U-value of the floor slab or basement ceiling
    pub u_basement: f64,
    /// Design indoor temperature
    pub indoor_temperature: f64,
}
define_id_getter! {BuildingType, BuildingTypeID}

impl BuildingType {
    /// Iterate over the numeric properties with their names, for validation
    pub fn iter_quantities(&self) -> impl Iterator<Item = (&'static str, f64)> {
        [
            ("floor_area", self.floor_area),
            ("facade_area", self.facade_area),
            ("window_area", self.window_area),
            ("roof_area", self.roof_area),
            ("basement_area", self.basement_area),
            ("perimeter", self.perimeter),
            ("u_facade", self.u_facade),
            ("u_window", self.u_window),
            ("u_roof", self.u_roof),
            ("u_basement", self.u_basement),
        ]
        .into_iter()
    }
}
