//! Code for reading energy carriers from a CSV file.
use super::{check_non_negative, input_err_msg, read_csv_id_file};
use crate::energy_carrier::{EnergyCarrier, EnergyCarrierID, EnergyCarrierMap};
use anyhow::{Context, Result, ensure};
use std::path::Path;

const ENERGY_CARRIERS_FILE_NAME: &str = "energy_carriers.csv";

/// Read energy carriers from the specified project directory.
///
/// # Arguments
///
/// * `project_dir` - Folder containing project input files
///
/// # Returns
///
/// A map of energy carriers, keyed by ID, or an error.
pub fn read_energy_carriers(project_dir: &Path) -> Result<EnergyCarrierMap> {
    let file_path = project_dir.join(ENERGY_CARRIERS_FILE_NAME);
    let carriers = read_csv_id_file::<EnergyCarrier, EnergyCarrierID>(&file_path)?;
    for carrier in carriers.values() {
        validate_energy_carrier(carrier)
            .with_context(|| format!("Invalid energy carrier {}", carrier.id))
            .with_context(|| input_err_msg(&file_path))?;
    }

    Ok(carriers)
}

fn validate_energy_carrier(carrier: &EnergyCarrier) -> Result<()> {
    for (name, value) in [
        ("pe_factor_renewable", carrier.pe_factor_renewable),
        ("pe_factor_non_renewable", carrier.pe_factor_non_renewable),
        ("pe_factor_total", carrier.pe_factor_total),
        ("emission_factor", carrier.emission_factor),
        ("current_price", carrier.current_price),
        ("projected_price", carrier.projected_price),
    ] {
        check_non_negative(name, value)?;
    }

    // Prices may fall, but not by more than 100% a year
    ensure!(
        carrier.price_increase.is_finite() && carrier.price_increase > -1.0,
        "price_increase must be a finite number greater than -1"
    );

    Ok(())
}
