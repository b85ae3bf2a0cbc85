use ndarray::Array2;

use super::{AxisKind, mesh1d::AxisGrid};

/// Axisymmetric structured grid in (r, z). Degenerate in the azimuthal direction.
#[derive(Clone, Debug)]
pub struct CylindricalGrid {
    pub radial: AxisGrid,
    pub axial: AxisGrid,
}
impl CylindricalGrid {
    pub fn uniform(nr: usize, nz: usize, r_max: f64, z_max: f64, nghost: usize) -> Self {
        Self {
            radial: AxisGrid::uniform(AxisKind::Radial, nr, nghost, 0.0, r_max),
            axial: AxisGrid::uniform(AxisKind::Cartesian, nz, nghost, 0.0, z_max),
        }
    }
    /// Shape of every 2D field: `(nz_tot, nr_tot)`, indexed `[[j, i]]`.
    pub fn shape(&self) -> (usize, usize) {
        (self.axial.n_tot, self.radial.n_tot)
    }
    pub fn zeros(&self) -> Array2<f64> {
        Array2::zeros(self.shape())
    }
    pub fn cell_volume(&self, j: usize, i: usize) -> f64 {
        self.radial.dv[i] * self.axial.dv[j]
    }
}
