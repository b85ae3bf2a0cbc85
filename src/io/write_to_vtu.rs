use vtkio::{
    Vtk,
    model::{
        Attribute, Attributes, ByteOrder, CellType, Cells, DataArray, DataSet, ElementType,
        IOBuffer, UnstructuredGridPiece, Version, VertexNumbers,
    },
};

use crate::{
    disc::{
        eos::EquationOfState,
        lines::LineSet,
        mesh::mesh2d::CylindricalGrid,
        state::{BX3, FluidState, PRS, RHO},
    },
    error::AdiError,
    io::output_path,
};

fn scalars(name: &str, data: Vec<f64>) -> Attribute {
    Attribute::DataArray(DataArray {
        name: name.to_string(),
        elem: ElementType::Scalars {
            num_comp: 1,
            lookup_table: None,
        },
        data: IOBuffer::F64(data),
    })
}

/// Builds the fluid cells as quads in the (r, z) plane with cell data.
pub(crate) fn fluid_cells_vtk(
    grid: &CylindricalGrid,
    lines: &LineSet,
    state: &FluidState,
    eos: &dyn EquationOfState,
) -> Result<Vtk, AdiError> {
    let (r, z) = (&grid.radial, &grid.axial);
    let mut vtk_points = Vec::new();
    let mut connectivity = Vec::new();
    let mut density = Vec::new();
    let mut pressure = Vec::new();
    let mut temperature = Vec::new();
    let mut b_phi = Vec::new();
    let mut num_cells = 0_u64;

    for (j, i) in lines.radial.cells() {
        for (x, y) in [
            (r.xl[i], z.xl[j]),
            (r.xr[i], z.xl[j]),
            (r.xr[i], z.xr[j]),
            (r.xl[i], z.xr[j]),
        ] {
            vtk_points.extend([x, y, 0.0]);
        }
        connectivity.extend((0..4).map(|k| 4 * num_cells + k));
        num_cells += 1;

        density.push(state.prim[[RHO, j, i]]);
        pressure.push(state.prim[[PRS, j, i]]);
        temperature.push(eos.temperature(&state.primitive(j, i))?);
        b_phi.push(state.prim[[BX3, j, i]]);
    }

    Ok(Vtk {
        version: Version::XML { major: 1, minor: 0 },
        title: "capillary".into(),
        byte_order: ByteOrder::native(),
        data: DataSet::inline(UnstructuredGridPiece {
            points: IOBuffer::F64(vtk_points),
            cells: Cells {
                cell_verts: VertexNumbers::XML {
                    connectivity,
                    offsets: (1..=num_cells).map(|n| 4 * n).collect(),
                },
                types: vec![CellType::Quad; num_cells as usize],
            },
            data: Attributes {
                point: vec![],
                cell: vec![
                    scalars("density", density),
                    scalars("pressure", pressure),
                    scalars("temperature", temperature),
                    scalars("b_phi", b_phi),
                ],
            },
        }),
        file_path: None,
    })
}

pub fn write_cells(
    name: &str,
    grid: &CylindricalGrid,
    lines: &LineSet,
    state: &FluidState,
    eos: &dyn EquationOfState,
    current_step: usize,
) -> Result<(), AdiError> {
    let filename = output_path(&format!("{name}_{current_step}.vtu"))?;
    fluid_cells_vtk(grid, lines, state, eos)?
        .export(&filename)
        .map_err(|e| AdiError::Vtk(format!("{e:?}")))
}
