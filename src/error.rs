//! Errors raised by the calculation engine.
//!
//! All of these stem from invalid input data, so none of them are worth retrying.
use crate::building::BuildingTypeID;
use crate::curve::CurveError;
use crate::energy_carrier::EnergyCarrierID;
use crate::energy_system::{CostCategory, CurveScale, EnergySystemID};
use crate::measure::{MeasureCategory, MeasureID};
use thiserror::Error;

/// An error which stops the calculation for a scenario
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// A cost curve could not be interpolated
    #[error("Invalid {scale} {category} curve for energy system {system_id}")]
    Curve {
        /// The system owning the curve
        system_id: EnergySystemID,
        /// Which part of the system the curve is for
        scale: CurveScale,
        /// Which cost the curve describes
        category: CostCategory,
        /// What is wrong with the curve
        #[source]
        source: CurveError,
    },
    /// A scenario refers to an energy system which is not in the project
    #[error("Energy system {0} not found")]
    MissingEnergySystem(EnergySystemID),
    /// A scenario refers to a building measure which is not in the project
    #[error("Building measure {0} not found")]
    MissingBuildingMeasure(MeasureID),
    /// A scenario refers to a building type which is not in the project
    #[error("Building type {0} not found")]
    MissingBuildingType(BuildingTypeID),
    /// An energy system refers to an energy carrier which is not in the project
    #[error("Energy carrier {carrier_id} for energy system {system_id} not found")]
    MissingEnergyCarrier {
        /// The system referring to the carrier
        system_id: EnergySystemID,
        /// The unknown carrier
        carrier_id: EnergyCarrierID,
    },
    /// An energy system cannot be sized with its current parameters
    #[error("Invalid energy system {system_id}: {reason}")]
    InvalidEnergySystem {
        /// The offending system
        system_id: EnergySystemID,
        /// What is wrong with it
        reason: String,
    },
    /// A building measure cannot be applied with its current parameters
    #[error("Invalid building measure {measure_id}: {reason}")]
    InvalidBuildingMeasure {
        /// The offending measure
        measure_id: MeasureID,
        /// What is wrong with it
        reason: String,
    },
    /// A system category outside of centralized, decentralized and none
    #[error("Unknown energy system category '{0}'")]
    UnknownSystemCategory(String),
    /// A measure was selected for a category it does not belong to
    #[error("Building measure {measure_id} is a {actual} measure but was selected as {expected}")]
    MeasureCategoryMismatch {
        /// The measure selected
        measure_id: MeasureID,
        /// The category it was selected for
        expected: MeasureCategory,
        /// The measure's own category
        actual: MeasureCategory,
    },
}
