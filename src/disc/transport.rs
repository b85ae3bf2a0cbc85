use std::fs;

use ndarray::Array2;
use serde::Deserialize;

use crate::{
    disc::{
        eos::EquationOfState,
        state::{NVAR, RHO},
        units::UnitSystem,
    },
    error::AdiError,
};

/// Thermal conductivity along and across the magnetic field, plus the
/// field angle. Only `normal` enters the ADI conduction operator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Conductivity {
    pub parallel: f64,
    pub normal: f64,
    pub phi: f64,
}

/// Transport closures evaluated at a face with the face-averaged primitive
/// state `v`. All values in code units.
pub trait TransportModel {
    fn thermal_conductivity(&self, v: &[f64; NVAR], r: f64, z: f64)
    -> Result<Conductivity, AdiError>;
    /// Magnetic diffusivity components (r, z, phi).
    fn resistivity(&self, v: &[f64; NVAR], r: f64, z: f64) -> Result<[f64; 3], AdiError>;
}

#[derive(Clone, Copy, Debug, Deserialize)]
pub struct ConstantTransport {
    pub conductivity: f64,
    pub resistivity: f64,
}
impl TransportModel for ConstantTransport {
    fn thermal_conductivity(
        &self,
        _v: &[f64; NVAR],
        _r: f64,
        _z: f64,
    ) -> Result<Conductivity, AdiError> {
        Ok(Conductivity {
            parallel: self.conductivity,
            normal: self.conductivity,
            phi: 0.0,
        })
    }
    fn resistivity(&self, _v: &[f64; NVAR], _r: f64, _z: f64) -> Result<[f64; 3], AdiError> {
        Ok([self.resistivity; 3])
    }
}

#[derive(Deserialize)]
struct Table2dFile {
    t_min: f64,
    t_max: f64,
    rho_min: f64,
    rho_max: f64,
    /// One row per density node, one column per temperature node.
    values: Vec<Vec<f64>>,
}

/// Table on nodes equally spaced in `log10(T)` and `log10(rho)`, interpolated
/// bilinearly in the log coordinates. Temperature in kelvin, density in g/cm^3.
#[derive(Clone, Debug)]
pub struct Table2d {
    pub log_t_min: f64,
    pub log_t_max: f64,
    pub log_rho_min: f64,
    pub log_rho_max: f64,
    /// Shape `(n_rho, n_t)`.
    pub values: Array2<f64>,
}
impl Table2d {
    pub fn new(
        t_min: f64,
        t_max: f64,
        rho_min: f64,
        rho_max: f64,
        values: Array2<f64>,
    ) -> Result<Self, AdiError> {
        let (n_rho, n_t) = values.dim();
        if n_rho < 2 || n_t < 2 {
            return Err(AdiError::unsupported(format!(
                "transport table needs at least 2x2 nodes, got {n_rho}x{n_t}"
            )));
        }
        if !(t_min > 0.0 && t_max > t_min && rho_min > 0.0 && rho_max > rho_min) {
            return Err(AdiError::unsupported(format!(
                "transport table bounds T=[{t_min}, {t_max}], \
                 rho=[{rho_min}, {rho_max}] are invalid"
            )));
        }
        Ok(Self {
            log_t_min: t_min.log10(),
            log_t_max: t_max.log10(),
            log_rho_min: rho_min.log10(),
            log_rho_max: rho_max.log10(),
            values,
        })
    }
    pub fn from_json(content: &str) -> Result<Self, AdiError> {
        let file: Table2dFile = serde_json::from_str(content)?;
        let n_rho = file.values.len();
        let n_t = file.values.first().map_or(0, |row| row.len());
        if file.values.iter().any(|row| row.len() != n_t) {
            return Err(AdiError::unsupported("transport table rows differ in length"));
        }
        let flat: Vec<f64> = file.values.into_iter().flatten().collect();
        let values = Array2::from_shape_vec((n_rho, n_t), flat)
            .map_err(|e| AdiError::unsupported(format!("transport table shape: {e}")))?;
        Self::new(file.t_min, file.t_max, file.rho_min, file.rho_max, values)
    }
    pub fn load(file_path: &str) -> Result<Self, AdiError> {
        let file_content = fs::read_to_string(file_path)?;
        Self::from_json(&file_content)
    }
    pub fn interpolate(&self, temperature: f64, density: f64) -> Result<f64, AdiError> {
        let out_of_range = AdiError::TableOutOfRange {
            temperature,
            density,
        };
        if !(temperature > 0.0 && density > 0.0) {
            return Err(out_of_range);
        }
        let (n_rho, n_t) = self.values.dim();
        let x = (temperature.log10() - self.log_t_min) / (self.log_t_max - self.log_t_min)
            * (n_t - 1) as f64;
        let y = (density.log10() - self.log_rho_min) / (self.log_rho_max - self.log_rho_min)
            * (n_rho - 1) as f64;
        // small tolerance so that the end nodes themselves are inside
        let eps = 1e-9;
        if x < -eps || y < -eps || x > (n_t - 1) as f64 + eps || y > (n_rho - 1) as f64 + eps {
            return Err(out_of_range);
        }
        let x = x.clamp(0.0, (n_t - 1) as f64);
        let y = y.clamp(0.0, (n_rho - 1) as f64);
        let i = (x.floor() as usize).min(n_t - 2);
        let j = (y.floor() as usize).min(n_rho - 2);
        let (wx, wy) = (x - i as f64, y - j as f64);
        let f = &self.values;
        Ok((1.0 - wy) * ((1.0 - wx) * f[[j, i]] + wx * f[[j, i + 1]])
            + wy * ((1.0 - wx) * f[[j + 1, i]] + wx * f[[j + 1, i + 1]]))
    }
}

/// Transport coefficients from cgs tables, looked up with the temperature
/// given by the equation of state.
pub struct TabulatedTransport<E: EquationOfState> {
    pub eos: E,
    pub units: UnitSystem,
    pub conductivity: Option<Table2d>,
    pub resistivity: Option<Table2d>,
}
impl<E: EquationOfState> TabulatedTransport<E> {
    fn lookup(&self, table: &Table2d, v: &[f64; NVAR]) -> Result<f64, AdiError> {
        let t_kelvin = self.eos.temperature(v)? * self.units.temperature();
        let rho_cgs = v[RHO] * self.units.density;
        table.interpolate(t_kelvin, rho_cgs)
    }
}
impl<E: EquationOfState> TransportModel for TabulatedTransport<E> {
    fn thermal_conductivity(
        &self,
        v: &[f64; NVAR],
        _r: f64,
        _z: f64,
    ) -> Result<Conductivity, AdiError> {
        let table = self
            .conductivity
            .as_ref()
            .ok_or_else(|| AdiError::unsupported("no thermal conductivity table loaded"))?;
        let kappa = self.lookup(table, v)? / self.units.thermal_conductivity();
        Ok(Conductivity {
            parallel: kappa,
            normal: kappa,
            phi: 0.0,
        })
    }
    fn resistivity(&self, v: &[f64; NVAR], _r: f64, _z: f64) -> Result<[f64; 3], AdiError> {
        let table = self
            .resistivity
            .as_ref()
            .ok_or_else(|| AdiError::unsupported("no resistivity table loaded"))?;
        let eta = self.lookup(table, v)? / self.units.diffusivity();
        Ok([eta; 3])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disc::{eos::IdealGas, state::PRS};
    use ndarray::array;

    const TABLE: &str = r#"{
        "t_min": 1.0e3, "t_max": 1.0e5,
        "rho_min": 1.0e-8, "rho_max": 1.0e-6,
        "values": [[1.0, 2.0, 3.0],
                   [4.0, 5.0, 6.0],
                   [7.0, 8.0, 9.0]]
    }"#;

    #[test]
    fn test_table_nodes_and_midpoints() {
        let table = Table2d::from_json(TABLE).unwrap();
        assert!((table.interpolate(1.0e3, 1.0e-8).unwrap() - 1.0).abs() < 1e-12);
        assert!((table.interpolate(1.0e5, 1.0e-6).unwrap() - 9.0).abs() < 1e-12);
        assert!((table.interpolate(1.0e4, 1.0e-7).unwrap() - 5.0).abs() < 1e-12);
        // halfway in log T between the first two nodes, on the middle density row
        let t = 10f64.powf(3.5);
        assert!((table.interpolate(t, 1.0e-7).unwrap() - 4.5).abs() < 1e-12);
    }

    #[test]
    fn test_table_out_of_range() {
        let table = Table2d::from_json(TABLE).unwrap();
        assert!(matches!(
            table.interpolate(1.0e6, 1.0e-7),
            Err(AdiError::TableOutOfRange { .. })
        ));
        assert!(table.interpolate(1.0e4, 1.0e-9).is_err());
        assert!(Table2d::new(1.0, 2.0, 1.0, 2.0, array![[1.0, 2.0]]).is_err());
    }

    #[test]
    fn test_tabulated_transport_units() {
        let units = UnitSystem {
            length: 1.0,
            density: 1.0e-7,
            velocity: 1.0e5,
        };
        let table = Table2d::from_json(TABLE).unwrap();
        let transport = TabulatedTransport {
            eos: IdealGas { gamma: 5.0 / 3.0 },
            units,
            conductivity: None,
            resistivity: Some(table),
        };
        let mut v = [0.0; NVAR];
        v[RHO] = 1.0;
        // T = 1e4 K in code units
        v[PRS] = 1.0e4 / units.temperature();
        let eta = transport.resistivity(&v, 0.1, 0.2).unwrap();
        assert!((eta[0] * units.diffusivity() - 5.0).abs() < 1e-9);
        assert_eq!(eta[0], eta[2]);
        assert!(transport.thermal_conductivity(&v, 0.1, 0.2).is_err());
    }
}
