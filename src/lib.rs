//! Calculation engine for comparing energy renovation scenarios across a building stock.
//!
//! A project describes building types, renovation measures and heat-supply systems. These are
//! grouped into scenarios, for which the engine sizes the energy systems, aggregates costs and
//! embodied impacts and derives primary energy, emissions and lifetime energy cost.
#![warn(missing_docs)]
use std::path::PathBuf;

pub mod building;
pub mod calculation;
pub mod cli;
pub mod curve;
pub mod energy_carrier;
pub mod energy_system;
pub mod error;
pub mod id;
pub mod input;
pub mod log;
pub mod measure;
pub mod output;
pub mod project;
pub mod scenario;
pub mod settings;

#[cfg(test)]
mod fixture;

/// Get the directory in which program-wide config files are stored
pub fn get_retrofit_config_dir() -> PathBuf {
    let Some(mut config_dir) = dirs::config_dir() else {
        // No sensible place to put config files, so use the working directory
        return PathBuf::from(".");
    };

    config_dir.push("retrofit");
    config_dir
}
