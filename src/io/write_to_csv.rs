use csv::Writer;
use serde::Serialize;

use crate::{
    disc::{
        eos::EquationOfState,
        lines::{Direction, Line},
        mesh::mesh2d::CylindricalGrid,
        state::{BX3, FluidState},
    },
    error::AdiError,
    io::output_path,
};

#[derive(Serialize)]
struct ProfilePoint {
    x: f64,
    temperature: f64,
    b_phi: f64,
}

/// Temperature and azimuthal field along one line, one row per cell.
pub fn write_line_profile(
    name: &str,
    grid: &CylindricalGrid,
    line: &Line,
    state: &FluidState,
    eos: &dyn EquationOfState,
    current_step: usize,
) -> Result<(), AdiError> {
    let filename = output_path(&format!("{name}_{current_step}.csv"))?;
    write_profile_to(&filename, grid, line, state, eos)
}

pub(crate) fn write_profile_to(
    filename: &str,
    grid: &CylindricalGrid,
    line: &Line,
    state: &FluidState,
    eos: &dyn EquationOfState,
) -> Result<(), AdiError> {
    let mut writer = Writer::from_path(filename)?;
    for (j, i) in line.cells() {
        let x = match line.direction {
            Direction::Radial => grid.radial.x[i],
            Direction::Axial => grid.axial.x[j],
        };
        writer.serialize(ProfilePoint {
            x,
            temperature: eos.temperature(&state.primitive(j, i))?,
            b_phi: state.prim[[BX3, j, i]],
        })?;
    }
    writer.flush()?;
    Ok(())
}
