use serde::Deserialize;

pub const CONST_PI: f64 = std::f64::consts::PI;
/// Proton mass [g].
pub const CONST_MP: f64 = 1.67262171e-24;
/// Boltzmann constant [erg/K].
pub const CONST_KB: f64 = 1.3806505e-16;

/// Reference scales of the code units, all cgs.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct UnitSystem {
    /// [cm]
    pub length: f64,
    /// [g/cm^3]
    pub density: f64,
    /// [cm/s]
    pub velocity: f64,
}
impl Default for UnitSystem {
    fn default() -> Self {
        Self {
            length: 0.1,
            density: 1.0e-7,
            velocity: 1.0e6,
        }
    }
}
impl UnitSystem {
    pub fn time(&self) -> f64 {
        self.length / self.velocity
    }
    /// Kelvin per code temperature unit.
    pub fn temperature(&self) -> f64 {
        self.velocity * self.velocity * CONST_MP / CONST_KB
    }
    /// Gauss per code magnetic field unit.
    pub fn magnetic_field(&self) -> f64 {
        (4.0 * CONST_PI * self.density).sqrt() * self.velocity
    }
    /// Magnetic diffusivity [cm^2/s] per code unit.
    pub fn diffusivity(&self) -> f64 {
        self.length * self.velocity
    }
    /// Thermal conductivity [erg/(s cm K)] per code unit.
    pub fn thermal_conductivity(&self) -> f64 {
        self.density * self.velocity * self.length * CONST_KB / CONST_MP
    }
    pub fn seconds(&self, t: f64) -> f64 {
        t * self.time()
    }
    pub fn kelvin_to_code(&self, t_kelvin: f64) -> f64 {
        t_kelvin / self.temperature()
    }
    /// Biot-Savart field at the wall of a wire of radius `radius_cm` carrying
    /// `current_a` amperes, in code units.
    pub fn wall_field(&self, current_a: f64, radius_cm: f64) -> f64 {
        0.2 * current_a / radius_cm / self.magnetic_field()
    }
}
