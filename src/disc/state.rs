use ndarray::Array3;

use crate::{
    disc::{eos::EquationOfState, lines::Lines, mesh::mesh2d::CylindricalGrid},
    error::AdiError,
};

pub const NVAR: usize = 5;

pub const RHO: usize = 0;
pub const VX1: usize = 1;
pub const VX2: usize = 2;
pub const BX3: usize = 3;
pub const PRS: usize = 4;

pub const MX1: usize = VX1;
pub const MX2: usize = VX2;
pub const ENG: usize = PRS;

/// Primitive and conserved variables, each `Array3` indexed `[[var, j, i]]`.
///
/// Primitive: `RHO, VX1, VX2, BX3, PRS`. Conserved: `RHO, MX1, MX2, BX3, ENG`
/// with `E = rho e + rho v^2 / 2 + B^2 / 2`.
#[derive(Clone, Debug)]
pub struct FluidState {
    pub prim: Array3<f64>,
    pub cons: Array3<f64>,
}
impl FluidState {
    pub fn new(grid: &CylindricalGrid) -> Self {
        let (nz_tot, nr_tot) = grid.shape();
        Self {
            prim: Array3::zeros((NVAR, nz_tot, nr_tot)),
            cons: Array3::zeros((NVAR, nz_tot, nr_tot)),
        }
    }
    pub fn primitive(&self, j: usize, i: usize) -> [f64; NVAR] {
        std::array::from_fn(|nv| self.prim[[nv, j, i]])
    }
    /// Average of the primitive states of two neighbouring cells.
    pub fn face_average(&self, a: (usize, usize), b: (usize, usize)) -> [f64; NVAR] {
        std::array::from_fn(|nv| 0.5 * (self.prim[[nv, a.0, a.1]] + self.prim[[nv, b.0, b.1]]))
    }
    pub fn prim_to_cons_cell(&mut self, eos: &dyn EquationOfState, j: usize, i: usize) {
        let v = self.primitive(j, i);
        let rho = v[RHO];
        let kinetic = 0.5 * rho * (v[VX1] * v[VX1] + v[VX2] * v[VX2]);
        let magnetic = 0.5 * v[BX3] * v[BX3];
        self.cons[[RHO, j, i]] = rho;
        self.cons[[MX1, j, i]] = rho * v[VX1];
        self.cons[[MX2, j, i]] = rho * v[VX2];
        self.cons[[BX3, j, i]] = v[BX3];
        self.cons[[ENG, j, i]] = eos.internal_energy_density(rho, v[PRS]) + kinetic + magnetic;
    }
    pub fn cons_to_prim_cell(
        &mut self,
        eos: &dyn EquationOfState,
        j: usize,
        i: usize,
    ) -> Result<(), AdiError> {
        let rho = self.cons[[RHO, j, i]];
        if rho.is_nan() || rho <= 0.0 {
            return Err(AdiError::Temperature {
                rho,
                prs: self.prim[[PRS, j, i]],
            });
        }
        let vx1 = self.cons[[MX1, j, i]] / rho;
        let vx2 = self.cons[[MX2, j, i]] / rho;
        let b = self.cons[[BX3, j, i]];
        let rhoe = self.cons[[ENG, j, i]] - 0.5 * rho * (vx1 * vx1 + vx2 * vx2) - 0.5 * b * b;
        self.prim[[RHO, j, i]] = rho;
        self.prim[[VX1, j, i]] = vx1;
        self.prim[[VX2, j, i]] = vx2;
        self.prim[[BX3, j, i]] = b;
        self.prim[[PRS, j, i]] = eos.pressure(rho, rhoe);
        Ok(())
    }
    /// Conserved variables on every cell covered by `lines`.
    pub fn prim_to_cons_lines(&mut self, eos: &dyn EquationOfState, lines: &Lines) {
        for (j, i) in lines.cells() {
            self.prim_to_cons_cell(eos, j, i);
        }
    }
    pub fn cons_to_prim_lines(
        &mut self,
        eos: &dyn EquationOfState,
        lines: &Lines,
    ) -> Result<(), AdiError> {
        for (j, i) in lines.cells() {
            self.cons_to_prim_cell(eos, j, i)?;
        }
        Ok(())
    }
    /// Copies the outermost interior primitive values into the ghost cells.
    pub fn fill_ghosts_zero_gradient(&mut self, grid: &CylindricalGrid) {
        let (r, z) = (&grid.radial, &grid.axial);
        for nv in 0..NVAR {
            for j in 0..z.n_tot {
                let jc = j.clamp(z.beg(), z.end());
                for i in 0..r.n_tot {
                    let ic = i.clamp(r.beg(), r.end());
                    if (jc, ic) != (j, i) {
                        self.prim[[nv, j, i]] = self.prim[[nv, jc, ic]];
                    }
                }
            }
        }
    }
    /// Sum of `E dV` over the cells covered by `lines`.
    pub fn total_energy(&self, grid: &CylindricalGrid, lines: &Lines) -> f64 {
        lines
            .cells()
            .map(|(j, i)| self.cons[[ENG, j, i]] * grid.cell_volume(j, i))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disc::{eos::IdealGas, geometry::CapillaryGeometry, lines::LineSet};

    #[test]
    fn test_prim_cons_round_trip() {
        let grid = CylindricalGrid::uniform(4, 6, 1.0, 1.0, 2);
        let geometry = CapillaryGeometry::locate(&grid, 0.5, 0.5, 0.25).unwrap();
        let lines = LineSet::build(&grid, &geometry).unwrap();
        let eos = IdealGas { gamma: 1.4 };
        let mut state = FluidState::new(&grid);
        for (j, i) in lines.radial.cells() {
            state.prim[[RHO, j, i]] = 1.0 + 0.1 * i as f64;
            state.prim[[VX1, j, i]] = 0.2;
            state.prim[[VX2, j, i]] = -0.3 * j as f64;
            state.prim[[BX3, j, i]] = 0.5;
            state.prim[[PRS, j, i]] = 2.0 + 0.01 * j as f64;
        }
        let original = state.prim.clone();
        state.prim_to_cons_lines(&eos, &lines.radial);
        let (j, i) = (3, 2);
        // rho = 1.2, v = (0.2, -0.9), B = 0.5, p = 2.03
        let expected = 2.03 / 0.4 + 0.5 * 1.2 * (0.04 + 0.81) + 0.125;
        assert!((state.cons[[ENG, j, i]] - expected).abs() < 1e-12);
        state.prim.fill(0.0);
        state.cons_to_prim_lines(&eos, &lines.axial).unwrap();
        for (j, i) in lines.axial.cells() {
            for nv in 0..NVAR {
                assert!((state.prim[[nv, j, i]] - original[[nv, j, i]]).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_zero_gradient_ghosts() {
        let grid = CylindricalGrid::uniform(3, 3, 1.0, 1.0, 1);
        let mut state = FluidState::new(&grid);
        for j in grid.axial.interior() {
            for i in grid.radial.interior() {
                state.prim[[RHO, j, i]] = (10 * j + i) as f64;
            }
        }
        state.fill_ghosts_zero_gradient(&grid);
        assert_eq!(state.prim[[RHO, 0, 0]], 11.0);
        assert_eq!(state.prim[[RHO, 2, 4]], 23.0);
        assert_eq!(state.prim[[RHO, 4, 2]], 32.0);
    }
}
