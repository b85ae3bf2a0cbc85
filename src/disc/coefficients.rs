use ndarray::Array2;

use crate::{
    disc::{
        eos::EquationOfState,
        lines::{Direction, Lines},
        mesh::mesh2d::CylindricalGrid,
        state::{FluidState, NVAR},
        transport::TransportModel,
    },
    error::AdiError,
};

/// Face conductances and capacities of one diffusion problem.
///
/// `ip`/`im` couple cell `(j, i)` to `(j, i + 1)`/`(j, i - 1)`, `jp`/`jm`
/// to `(j + 1, i)`/`(j - 1, i)`. `ci` and `cj` are the capacities used by
/// the radial and axial sweeps.
#[derive(Clone, Debug)]
pub struct Coefficients {
    pub ip: Array2<f64>,
    pub im: Array2<f64>,
    pub jp: Array2<f64>,
    pub jm: Array2<f64>,
    pub ci: Array2<f64>,
    pub cj: Array2<f64>,
    /// dE/dT per cell, conduction only.
    pub de_dt: Array2<f64>,
}

/// Borrowed conductances and capacity of one sweep direction.
pub struct SweepCoefficients<'a> {
    pub hp: &'a Array2<f64>,
    pub hm: &'a Array2<f64>,
    pub c: &'a Array2<f64>,
}

impl Coefficients {
    pub fn zeros(grid: &CylindricalGrid) -> Self {
        Self {
            ip: grid.zeros(),
            im: grid.zeros(),
            jp: grid.zeros(),
            jm: grid.zeros(),
            ci: grid.zeros(),
            cj: grid.zeros(),
            de_dt: grid.zeros(),
        }
    }
    pub fn sweep(&self, direction: Direction) -> SweepCoefficients<'_> {
        match direction {
            Direction::Radial => SweepCoefficients {
                hp: &self.ip,
                hm: &self.im,
                c: &self.ci,
            },
            Direction::Axial => SweepCoefficients {
                hp: &self.jp,
                hm: &self.jm,
                c: &self.cj,
            },
        }
    }
    fn clear(&mut self) {
        for a in [
            &mut self.ip,
            &mut self.im,
            &mut self.jp,
            &mut self.jm,
            &mut self.ci,
            &mut self.cj,
            &mut self.de_dt,
        ] {
            a.fill(0.0);
        }
    }
    /// Thermal conduction coefficients on every cell of `lines`.
    pub fn assemble_conduction(
        &mut self,
        grid: &CylindricalGrid,
        lines: &Lines,
        state: &FluidState,
        eos: &dyn EquationOfState,
        transport: &dyn TransportModel,
    ) -> Result<(), AdiError> {
        self.clear();
        let (r, z) = (&grid.radial, &grid.axial);
        for (j, i) in lines.cells() {
            let kappa = |v: [f64; NVAR], rf: f64, zf: f64| {
                transport.thermal_conductivity(&v, rf, zf).map(|k| k.normal)
            };
            let k = kappa(state.face_average((j, i), (j, i + 1)), r.xr[i], z.x[j])?;
            self.ip[[j, i]] = k * r.area_r[i] * r.inv_dxi[i];
            let k = kappa(state.face_average((j, i), (j, i - 1)), r.xl[i], z.x[j])?;
            self.im[[j, i]] = k * r.area_l[i] * r.inv_dxi[i - 1];
            let k = kappa(state.face_average((j, i), (j + 1, i)), r.x[i], z.xr[j])?;
            self.jp[[j, i]] = k * z.inv_dxi[j];
            let k = kappa(state.face_average((j, i), (j - 1, i)), r.x[i], z.xl[j])?;
            self.jm[[j, i]] = k * z.inv_dxi[j - 1];

            let v = state.primitive(j, i);
            let temperature = eos.temperature(&v)?;
            let de_dt = eos.heat_capacity(&v, temperature);
            self.de_dt[[j, i]] = de_dt;
            self.ci[[j, i]] = de_dt * r.dv[i];
            self.cj[[j, i]] = de_dt * z.dv[j];
        }
        Ok(())
    }
    /// Resistive diffusion coefficients for `psi = r B_phi` on every cell of `lines`.
    pub fn assemble_resistive(
        &mut self,
        grid: &CylindricalGrid,
        lines: &Lines,
        state: &FluidState,
        transport: &dyn TransportModel,
    ) -> Result<(), AdiError> {
        self.clear();
        let (r, z) = (&grid.radial, &grid.axial);
        for (j, i) in lines.cells() {
            let eta = |v: [f64; NVAR], rf: f64, zf: f64| isotropic_eta(transport, &v, rf, zf);
            let e = eta(state.face_average((j, i), (j, i + 1)), r.xr[i], z.x[j])?;
            self.ip[[j, i]] = e * r.inv_dx[i] * r.inv_dxi[i] / r.xr[i];
            let e = eta(state.face_average((j, i), (j, i - 1)), r.xl[i], z.x[j])?;
            self.im[[j, i]] = if r.xl[i] != 0.0 {
                e * r.inv_dxi[i - 1] * r.inv_dx[i] / r.xl[i]
            } else {
                e / (r.x[i] * r.x[i]) / r.xr[i]
            };
            let e = eta(state.face_average((j, i), (j + 1, i)), r.x[i], z.xr[j])?;
            self.jp[[j, i]] = e * z.inv_dx[j] * z.inv_dxi[j];
            let e = eta(state.face_average((j, i), (j - 1, i)), r.x[i], z.xl[j])?;
            self.jm[[j, i]] = e * z.inv_dx[j] * z.inv_dxi[j - 1];

            self.ci[[j, i]] = r.inv_x[i];
            self.cj[[j, i]] = 1.0;
        }
        Ok(())
    }
    /// Largest step for which a forward Euler sweep along `direction` stays
    /// stable: `min C / (Hp + Hm)` over the cells of `lines`.
    pub fn explicit_time_limit(&self, lines: &Lines, direction: Direction) -> f64 {
        let sweep = self.sweep(direction);
        lines
            .cells()
            .map(|(j, i)| {
                let h = sweep.hp[[j, i]] + sweep.hm[[j, i]];
                if h > 0.0 { sweep.c[[j, i]] / h } else { f64::INFINITY }
            })
            .fold(f64::INFINITY, f64::min)
    }
}

fn isotropic_eta(
    transport: &dyn TransportModel,
    v: &[f64; NVAR],
    r: f64,
    z: f64,
) -> Result<f64, AdiError> {
    let eta = transport.resistivity(v, r, z)?;
    if eta[0] != eta[1] || eta[1] != eta[2] {
        return Err(AdiError::AnisotropicResistivity { eta, r, z });
    }
    Ok(eta[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disc::{
        eos::IdealGas,
        geometry::CapillaryGeometry,
        lines::LineSet,
        state::{PRS, RHO},
        transport::{Conductivity, ConstantTransport},
    };

    fn uniform_state(grid: &CylindricalGrid, rho: f64, prs: f64) -> FluidState {
        let mut state = FluidState::new(grid);
        state.prim.index_axis_mut(ndarray::Axis(0), RHO).fill(rho);
        state.prim.index_axis_mut(ndarray::Axis(0), PRS).fill(prs);
        state
    }

    fn setup() -> (CylindricalGrid, LineSet) {
        let grid = CylindricalGrid::uniform(10, 20, 1.0, 2.0, 2);
        let geometry = CapillaryGeometry::locate(&grid, 0.42, 1.0, 0.3).unwrap();
        let lines = LineSet::build(&grid, &geometry).unwrap();
        (grid, lines)
    }

    fn assert_face_continuity(coefficients: &Coefficients, lines: &LineSet) {
        for line in lines.radial.iter() {
            for i in line.lidx..line.ridx {
                let j = line.index;
                let (a, b) = (coefficients.ip[[j, i]], coefficients.im[[j, i + 1]]);
                assert!((a - b).abs() <= 1e-12 * a.abs(), "radial face ({j}, {i}): {a} vs {b}");
            }
        }
        for line in lines.axial.iter() {
            for j in line.lidx..line.ridx {
                let i = line.index;
                let (a, b) = (coefficients.jp[[j, i]], coefficients.jm[[j + 1, i]]);
                assert!((a - b).abs() <= 1e-12 * a.abs(), "axial face ({j}, {i}): {a} vs {b}");
            }
        }
    }

    #[test]
    fn test_conduction_face_continuity() {
        let (grid, lines) = setup();
        let state = uniform_state(&grid, 2.0, 1.0);
        let eos = IdealGas { gamma: 5.0 / 3.0 };
        let transport = ConstantTransport {
            conductivity: 0.7,
            resistivity: 0.0,
        };
        let mut coefficients = Coefficients::zeros(&grid);
        coefficients
            .assemble_conduction(&grid, &lines.radial, &state, &eos, &transport)
            .unwrap();
        assert_face_continuity(&coefficients, &lines);
        let (j, i) = (5, 4);
        assert!((coefficients.de_dt[[j, i]] - 3.0).abs() < 1e-12);
        assert!((coefficients.ci[[j, i]] - 3.0 * grid.radial.dv[i]).abs() < 1e-12);
        assert!((coefficients.cj[[j, i]] - 3.0 * 0.1).abs() < 1e-12);
        // axis face has zero area
        assert_eq!(coefficients.im[[j, grid.radial.beg()]], 0.0);
    }

    #[test]
    fn test_resistive_face_continuity_and_axis() {
        let (grid, lines) = setup();
        let state = uniform_state(&grid, 1.0, 1.0);
        let transport = ConstantTransport {
            conductivity: 0.0,
            resistivity: 0.05,
        };
        let mut coefficients = Coefficients::zeros(&grid);
        coefficients
            .assemble_resistive(&grid, &lines.radial, &state, &transport)
            .unwrap();
        assert_face_continuity(&coefficients, &lines);
        let r = &grid.radial;
        let (j, i) = (3, r.beg());
        let expected = 0.05 / (r.x[i] * r.x[i]) / r.xr[i];
        assert!((coefficients.im[[j, i]] - expected).abs() < 1e-12 * expected);
        assert!((coefficients.ci[[j, i]] * r.x[i] - 1.0).abs() < 1e-12);
        assert_eq!(coefficients.cj[[j, i]], 1.0);
    }

    struct Anisotropic;
    impl TransportModel for Anisotropic {
        fn thermal_conductivity(
            &self,
            _v: &[f64; NVAR],
            _r: f64,
            _z: f64,
        ) -> Result<Conductivity, AdiError> {
            Ok(Conductivity {
                parallel: 1.0,
                normal: 1.0,
                phi: 0.0,
            })
        }
        fn resistivity(&self, _v: &[f64; NVAR], _r: f64, _z: f64) -> Result<[f64; 3], AdiError> {
            Ok([1.0, 2.0, 1.0])
        }
    }

    #[test]
    fn test_anisotropic_resistivity_rejected() {
        let (grid, lines) = setup();
        let state = uniform_state(&grid, 1.0, 1.0);
        let mut coefficients = Coefficients::zeros(&grid);
        let result = coefficients.assemble_resistive(&grid, &lines.radial, &state, &Anisotropic);
        assert!(matches!(result, Err(AdiError::AnisotropicResistivity { .. })));
    }

    #[test]
    fn test_explicit_time_limit() {
        let (grid, lines) = setup();
        let state = uniform_state(&grid, 1.0, 1.0);
        let transport = ConstantTransport {
            conductivity: 0.0,
            resistivity: 0.01,
        };
        let mut coefficients = Coefficients::zeros(&grid);
        coefficients
            .assemble_resistive(&grid, &lines.radial, &state, &transport)
            .unwrap();
        // uniform axial spacing 0.1: C / (Jp + Jm) = 0.01 / (2 * 0.01)
        let limit = coefficients.explicit_time_limit(&lines.axial, Direction::Axial);
        assert!((limit - 0.5).abs() < 1e-9);
        assert!(coefficients.explicit_time_limit(&lines.radial, Direction::Radial) < limit);
    }
}
