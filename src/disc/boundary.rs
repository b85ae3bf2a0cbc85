use serde::Deserialize;

use crate::disc::{
    geometry::CapillaryGeometry,
    lines::{Direction, Line, LineSet, Lines},
    mesh::mesh2d::CylindricalGrid,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryKind {
    /// Dirichlet: the diffused quantity is pinned to `value` on the face.
    FixedValue,
    /// Homogeneous Neumann: no flux through the face.
    ZeroFlux,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundaryCondition {
    pub kind: BoundaryKind,
    pub value: f64,
}
impl BoundaryCondition {
    pub fn fixed(value: f64) -> Self {
        Self {
            kind: BoundaryKind::FixedValue,
            value,
        }
    }
    pub fn zero_flux() -> Self {
        Self {
            kind: BoundaryKind::ZeroFlux,
            value: 0.0,
        }
    }
    /// Condition of the given kind; `value` is dropped for zero flux.
    pub fn of_kind(kind: BoundaryKind, value: f64) -> Self {
        match kind {
            BoundaryKind::FixedValue => Self::fixed(value),
            BoundaryKind::ZeroFlux => Self::zero_flux(),
        }
    }
}

/// Conditions at both ends of every line of one sweep direction, in line order.
#[derive(Clone, Debug)]
pub struct LineBoundaries {
    pub left: Vec<BoundaryCondition>,
    pub right: Vec<BoundaryCondition>,
}
impl LineBoundaries {
    fn zero_flux(n: usize) -> Self {
        Self {
            left: vec![BoundaryCondition::zero_flux(); n],
            right: vec![BoundaryCondition::zero_flux(); n],
        }
    }
}

#[derive(Clone, Debug)]
pub struct BoundarySet {
    pub radial: LineBoundaries,
    pub axial: LineBoundaries,
}
impl BoundarySet {
    /// Zero flux everywhere; overwritten by the first classification.
    pub fn closed(lines: &LineSet) -> Self {
        Self {
            radial: LineBoundaries::zero_flux(lines.radial.len()),
            axial: LineBoundaries::zero_flux(lines.axial.len()),
        }
    }
    pub fn get(&self, direction: Direction) -> &LineBoundaries {
        match direction {
            Direction::Radial => &self.radial,
            Direction::Axial => &self.axial,
        }
    }
}

/// Thermal wall setup, temperatures in code units.
#[derive(Clone, Copy, Debug)]
pub struct ThermalWalls {
    pub wall_temperature: f64,
    pub wall_kind: BoundaryKind,
    pub outer_kind: BoundaryKind,
}

/// Temperature boundaries.
///
/// The axis and the capillary symmetry plane are always zero flux; the wall
/// and the outer domain edge use the configured kinds with the wall
/// temperature as value.
pub fn classify_thermal(
    lines: &LineSet,
    geometry: &CapillaryGeometry,
    walls: &ThermalWalls,
    boundaries: &mut BoundarySet,
) {
    let wall = BoundaryCondition::of_kind(walls.wall_kind, walls.wall_temperature);
    let outer = BoundaryCondition::of_kind(walls.outer_kind, walls.wall_temperature);

    for (l, line) in lines.radial.iter().enumerate() {
        boundaries.radial.left[l] = BoundaryCondition::zero_flux();
        boundaries.radial.right[l] = if geometry.inside_capillary_length(line.index) {
            wall
        } else {
            outer
        };
    }
    for (l, line) in lines.axial.iter().enumerate() {
        boundaries.axial.left[l] = if geometry.inside_capillary_radius(line.index) {
            BoundaryCondition::zero_flux()
        } else {
            wall
        };
        boundaries.axial.right[l] = outer;
    }
}

/// Boundaries of `psi = r * B_phi` for a wall field `b_wall` (code units).
///
/// The wall value is tapered linearly to zero across the electrode.
pub fn classify_magnetic(
    grid: &CylindricalGrid,
    lines: &LineSet,
    geometry: &CapillaryGeometry,
    b_wall: f64,
    boundaries: &mut BoundarySet,
) {
    let z = &grid.axial.x;
    let psi_wall = b_wall * geometry.rcap_real;
    for (l, line) in lines.radial.iter().enumerate() {
        let j = line.index;
        boundaries.radial.left[l] = BoundaryCondition::fixed(0.0);
        boundaries.radial.right[l] = if j < geometry.j_elec_start {
            BoundaryCondition::fixed(psi_wall)
        } else if geometry.on_electrode(j) {
            let taper = 1.0 - (z[j] - geometry.electrode_start()) / geometry.dzcap_real;
            BoundaryCondition::fixed(psi_wall * taper)
        } else {
            BoundaryCondition::fixed(0.0)
        };
    }
    for (l, line) in lines.axial.iter().enumerate() {
        boundaries.axial.left[l] = if geometry.inside_capillary_radius(line.index) {
            BoundaryCondition::zero_flux()
        } else {
            BoundaryCondition::fixed(0.0)
        };
        boundaries.axial.right[l] = BoundaryCondition::fixed(0.0);
    }
}

/// Iterator over `(line, left, right)` of one direction.
pub fn with_boundaries<'a>(
    lines: &'a Lines,
    boundaries: &'a LineBoundaries,
) -> impl Iterator<Item = (&'a Line, BoundaryCondition, BoundaryCondition)> + 'a {
    lines
        .iter()
        .zip(boundaries.left.iter().zip(boundaries.right.iter()))
        .map(|(line, (left, right))| (line, *left, *right))
}
