//! Energy carriers are the fuels or networks (gas, electricity, district heat etc.) consumed by
//! energy systems.
use crate::id::{define_id_getter, define_id_type};
use indexmap::IndexMap;
use serde::Deserialize;

define_id_type! {EnergyCarrierID}

/// A map of [`EnergyCarrier`]s, keyed by energy carrier ID
pub type EnergyCarrierMap = IndexMap<EnergyCarrierID, EnergyCarrier>;

/// An energy carrier with its primary energy and emission factors and prices
#[derive(PartialEq, Debug, Deserialize, Clone)]
pub struct EnergyCarrier {
    /// Unique identifier for the energy carrier (e.g. "GAS")
    pub id: EnergyCarrierID,
    /// Human-readable name
    pub name: String,
    /// Renewable primary energy factor
    pub pe_factor_renewable: f64,
    /// Non-renewable primary energy factor
    pub pe_factor_non_renewable: f64,
    /// Total primary energy factor
    pub pe_factor_total: f64,
    /// Emissions per unit of final energy (kg CO2-eq/kWh)
    pub emission_factor: f64,
    /// Current price per kWh
    pub current_price: f64,
    /// Average price per kWh expected over the system lifetime
    pub projected_price: f64,
    /// Annual relative price increase (e.g. 0.03 for 3%)
    #[serde(default)]
    pub price_increase: f64,
}
define_id_getter! {EnergyCarrier, EnergyCarrierID}
