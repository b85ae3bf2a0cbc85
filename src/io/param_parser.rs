use std::fs;

use serde::Deserialize;

use crate::{
    error::AdiError,
    solver::{AdiParameters, RunParameters},
};

/// Uniform grid in code units.
#[derive(Deserialize, Debug, Clone)]
pub struct GridParams {
    pub nr: usize,
    pub nz: usize,
    pub r_max: f64,
    pub z_max: f64,
    #[serde(default = "default_nghost")]
    pub nghost: usize,
}
fn default_nghost() -> usize {
    2
}

/// Uniform initial state in code units.
#[derive(Deserialize, Debug, Clone)]
pub struct InitialParams {
    pub density: f64,
    pub temperature: f64,
    #[serde(default)]
    pub magnetic_field: f64,
}

#[derive(Deserialize, Debug, Clone)]
pub struct GasParams {
    pub gamma: f64,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransportParams {
    Constant {
        conductivity: f64,
        resistivity: f64,
    },
    /// JSON tables in cgs; a missing table disables that coefficient.
    Tabulated {
        conductivity_table: Option<String>,
        resistivity_table: Option<String>,
    },
}

#[derive(Deserialize, Debug, Clone)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CurrentParams {
    Constant { amperes: f64 },
    /// CSV file with `time_s,current_a` columns.
    Table { path: String },
}

#[derive(Deserialize, Debug, Clone)]
pub struct RunParamParser {
    pub grid: GridParams,
    pub run: RunParameters,
    pub initial: InitialParams,
    pub gas: GasParams,
    pub transport: TransportParams,
    pub current: CurrentParams,
    #[serde(default)]
    pub adi: AdiParameters,
}
impl RunParamParser {
    pub fn parse(file_path: &str) -> Result<Self, AdiError> {
        let file_content = fs::read_to_string(file_path)?;
        Self::from_json(&file_content)
    }
    pub fn from_json(content: &str) -> Result<Self, AdiError> {
        Ok(serde_json::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disc::{boundary::BoundaryKind, physics::EnergyUpdate};

    const PARAMS: &str = r#"{
        "grid": { "nr": 40, "nz": 120, "r_max": 1.0, "z_max": 3.0 },
        "run": { "dt": 1e-3, "final_time": 0.1, "final_step": 1000, "output_every": 10 },
        "initial": { "density": 1.0, "temperature": 0.5 },
        "gas": { "gamma": 1.6666666667 },
        "transport": { "kind": "constant", "conductivity": 0.01, "resistivity": 0.002 },
        "current": { "kind": "table", "path": "inputs/current.csv" },
        "adi": {
            "capillary_radius": 0.05,
            "energy_update": "heat_capacity",
            "outer_thermal_boundary": "zero_flux",
            "units": { "length": 0.1, "density": 1e-7, "velocity": 1e6 }
        }
    }"#;

    #[test]
    fn test_parse_run_params() {
        let params = RunParamParser::from_json(PARAMS).unwrap();
        assert_eq!(params.grid.nghost, 2);
        assert_eq!(params.run.output_name, "capillary");
        assert!(matches!(
            params.current,
            CurrentParams::Table { ref path } if path == "inputs/current.csv"
        ));
        let adi = &params.adi;
        assert_eq!(adi.energy_update, EnergyUpdate::HeatCapacity);
        assert_eq!(adi.outer_thermal_boundary, BoundaryKind::ZeroFlux);
        assert_eq!(adi.wall_thermal_boundary, BoundaryKind::FixedValue);
        assert!(adi.thermal_conduction && adi.resistive_diffusion);
        assert_eq!(adi.units.length, 0.1);
    }

    #[test]
    fn test_unknown_boundary_kind_rejected() {
        let params = PARAMS.replace("\"zero_flux\"", "\"periodic\"");
        assert!(matches!(
            RunParamParser::from_json(&params),
            Err(AdiError::Parse(_))
        ));
    }
}
