use crate::{
    disc::state::{NVAR, PRS, RHO},
    error::AdiError,
};

/// Thermodynamic closure of the fluid, in code units.
///
/// `v` is a primitive state vector laid out as in [`crate::disc::state`].
pub trait EquationOfState {
    fn temperature(&self, v: &[f64; NVAR]) -> Result<f64, AdiError>;
    /// Internal energy per unit volume at density `v[RHO]` and `temperature`.
    fn internal_energy(&self, v: &[f64; NVAR], temperature: f64) -> f64;
    /// dE/dT at fixed density.
    fn heat_capacity(&self, v: &[f64; NVAR], temperature: f64) -> f64 {
        let h = 1e-6 * temperature.abs().max(1e-12);
        (self.internal_energy(v, temperature + h) - self.internal_energy(v, temperature - h))
            / (2.0 * h)
    }
    fn pressure(&self, rho: f64, rhoe: f64) -> f64;
    fn internal_energy_density(&self, rho: f64, prs: f64) -> f64;
}

#[derive(Clone, Copy, Debug)]
pub struct IdealGas {
    pub gamma: f64,
}
impl EquationOfState for IdealGas {
    fn temperature(&self, v: &[f64; NVAR]) -> Result<f64, AdiError> {
        let (rho, prs) = (v[RHO], v[PRS]);
        if rho.is_nan() || rho <= 0.0 || !prs.is_finite() {
            return Err(AdiError::Temperature { rho, prs });
        }
        Ok(prs / rho)
    }
    fn internal_energy(&self, v: &[f64; NVAR], temperature: f64) -> f64 {
        v[RHO] * temperature / (self.gamma - 1.0)
    }
    fn heat_capacity(&self, v: &[f64; NVAR], _temperature: f64) -> f64 {
        v[RHO] / (self.gamma - 1.0)
    }
    fn pressure(&self, _rho: f64, rhoe: f64) -> f64 {
        (self.gamma - 1.0) * rhoe
    }
    fn internal_energy_density(&self, _rho: f64, prs: f64) -> f64 {
        prs / (self.gamma - 1.0)
    }
}
