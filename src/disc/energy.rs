use ndarray::Array2;

use crate::disc::{
    boundary::{BoundaryCondition, BoundaryKind, LineBoundaries, with_boundaries},
    coefficients::SweepCoefficients,
    lines::{Direction, Lines},
    mesh::mesh2d::CylindricalGrid,
};

/// Energy deposited in each cell by resistive diffusion of `psi` over one
/// half step of length `dt` along `lines`.
///
/// The face power flux is `-H (psi_+ - psi) dx <psi / r>` and the source is
/// its discrete divergence, so the deposit mirrors the field update.
pub fn resistive_energy_source(
    du: &mut Array2<f64>,
    psi: &Array2<f64>,
    sweep: &SweepCoefficients,
    grid: &CylindricalGrid,
    lines: &Lines,
    boundaries: &LineBoundaries,
    dt: f64,
) {
    du.fill(0.0);
    match lines.direction {
        Direction::Radial => radial_source(du, psi, sweep, grid, lines, boundaries, dt),
        Direction::Axial => axial_source(du, psi, sweep, grid, lines, boundaries, dt),
    }
}

fn radial_source(
    du: &mut Array2<f64>,
    psi: &Array2<f64>,
    sweep: &SweepCoefficients,
    grid: &CylindricalGrid,
    lines: &Lines,
    boundaries: &LineBoundaries,
    dt: f64,
) {
    let r = &grid.radial;
    let face_flux = |h: f64, k: usize, psi_l: f64, r_l: f64, psi_r: f64, r_r: f64| {
        -h * (psi_r - psi_l) * r.dx[k] * 0.5 * (psi_r / r_r + psi_l / r_l)
    };
    for (line, left, right) in with_boundaries(lines, boundaries) {
        let j = line.index;
        let (lidx, ridx) = (line.lidx, line.ridx);
        // flux[m] crosses the right face of cell lidx + m - 1
        let mut flux = vec![0.0; line.len() + 1];
        for i in lidx..ridx {
            flux[i - lidx + 1] =
                face_flux(sweep.hp[[j, i]], i, psi[[j, i]], r.x[i], psi[[j, i + 1]], r.x[i + 1]);
        }
        if let Some(v) = fixed_value(left) {
            if r.xl[lidx] != 0.0 {
                let ghost = r.x[lidx - 1] * (2.0 * v / r.xl[lidx] - psi[[j, lidx]] / r.x[lidx]);
                flux[0] = face_flux(
                    sweep.hm[[j, lidx]],
                    lidx,
                    ghost,
                    r.x[lidx - 1],
                    psi[[j, lidx]],
                    r.x[lidx],
                );
            }
        }
        if let Some(v) = fixed_value(right) {
            let ghost = r.x[ridx + 1] * (2.0 * v / r.xr[ridx] - psi[[j, ridx]] / r.x[ridx]);
            flux[line.len()] = face_flux(
                sweep.hp[[j, ridx]],
                ridx,
                psi[[j, ridx]],
                r.x[ridx],
                ghost,
                r.x[ridx + 1],
            );
        }
        for i in lidx..=ridx {
            let m = i - lidx;
            du[[j, i]] = -(r.xr[i] * flux[m + 1] - r.xl[i] * flux[m]) * dt / r.dv[i];
        }
    }
}

fn axial_source(
    du: &mut Array2<f64>,
    psi: &Array2<f64>,
    sweep: &SweepCoefficients,
    grid: &CylindricalGrid,
    lines: &Lines,
    boundaries: &LineBoundaries,
    dt: f64,
) {
    let (r, z) = (&grid.radial, &grid.axial);
    for (line, left, right) in with_boundaries(lines, boundaries) {
        let i = line.index;
        let (lidx, ridx) = (line.lidx, line.ridx);
        let inv_r2 = r.inv_x[i] * r.inv_x[i];
        let face_flux = |h: f64, k: usize, psi_l: f64, psi_r: f64| {
            -h * (psi_r - psi_l) * z.dx[k] * inv_r2 * 0.5 * (psi_r + psi_l)
        };
        let mut flux = vec![0.0; line.len() + 1];
        for j in lidx..ridx {
            flux[j - lidx + 1] = face_flux(sweep.hp[[j, i]], j, psi[[j, i]], psi[[j + 1, i]]);
        }
        if let Some(v) = fixed_value(left) {
            let ghost = 2.0 * v - psi[[lidx, i]];
            flux[0] = face_flux(sweep.hm[[lidx, i]], lidx, ghost, psi[[lidx, i]]);
        }
        if let Some(v) = fixed_value(right) {
            let ghost = 2.0 * v - psi[[ridx, i]];
            flux[line.len()] = face_flux(sweep.hp[[ridx, i]], ridx, psi[[ridx, i]], ghost);
        }
        for j in lidx..=ridx {
            let m = j - lidx;
            du[[j, i]] = -(flux[m + 1] - flux[m]) * dt * z.inv_dx[j];
        }
    }
}

fn fixed_value(bc: BoundaryCondition) -> Option<f64> {
    match bc.kind {
        BoundaryKind::FixedValue => Some(bc.value),
        BoundaryKind::ZeroFlux => None,
    }
}
