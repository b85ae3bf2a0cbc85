use crate::{
    disc::{
        current::{ConstantCurrent, CurrentTable, DrivingCurrent},
        eos::{EquationOfState, IdealGas},
        mesh::mesh2d::CylindricalGrid,
        state::{BX3, FluidState, PRS, RHO},
        transport::{ConstantTransport, Table2d, TabulatedTransport, TransportModel},
    },
    error::AdiError,
    io::param_parser::{CurrentParams, RunParamParser, TransportParams},
    solver::{AdiIntegrator, Simulation},
};

pub fn initialize_params_by_file(file_path: &str) -> Result<RunParamParser, AdiError> {
    log::info!("reading parameters from {file_path}");
    RunParamParser::parse(file_path)
}

fn initialize_transport(
    params: &RunParamParser,
    eos: IdealGas,
) -> Result<Box<dyn TransportModel>, AdiError> {
    Ok(match &params.transport {
        TransportParams::Constant {
            conductivity,
            resistivity,
        } => Box::new(ConstantTransport {
            conductivity: *conductivity,
            resistivity: *resistivity,
        }),
        TransportParams::Tabulated {
            conductivity_table,
            resistivity_table,
        } => {
            let load = |path: &Option<String>| path.as_deref().map(Table2d::load).transpose();
            Box::new(TabulatedTransport {
                eos,
                units: params.adi.units,
                conductivity: load(conductivity_table)?,
                resistivity: load(resistivity_table)?,
            })
        }
    })
}

fn initialize_current(params: &RunParamParser) -> Result<Box<dyn DrivingCurrent>, AdiError> {
    Ok(match &params.current {
        CurrentParams::Constant { amperes } => Box::new(ConstantCurrent { amperes: *amperes }),
        CurrentParams::Table { path } => Box::new(CurrentTable::load(path)?),
    })
}

/// Grid, uniform initial state, closures and integrator from the run parameters.
pub fn initialize_simulation(params: &RunParamParser) -> Result<Simulation, AdiError> {
    let g = &params.grid;
    let grid = CylindricalGrid::uniform(g.nr, g.nz, g.r_max, g.z_max, g.nghost);
    let eos = IdealGas {
        gamma: params.gas.gamma,
    };
    let transport = initialize_transport(params, eos)?;
    let current = initialize_current(params)?;
    let integrator = AdiIntegrator::new(&grid, &params.adi)?;

    let mut state = FluidState::new(&grid);
    let init = &params.initial;
    for j in 0..grid.axial.n_tot {
        for i in 0..grid.radial.n_tot {
            state.prim[[RHO, j, i]] = init.density;
            state.prim[[PRS, j, i]] = init.density * init.temperature;
            state.prim[[BX3, j, i]] = init.magnetic_field;
        }
    }
    state.prim_to_cons_lines(&eos, &integrator.lines.radial);
    log::info!(
        "grid {} x {} (r x z), {} radial and {} axial lines",
        g.nr,
        g.nz,
        integrator.lines.radial.len(),
        integrator.lines.axial.len()
    );

    Ok(Simulation {
        grid,
        state,
        integrator,
        eos: Box::new(eos) as Box<dyn EquationOfState>,
        transport,
        current,
        run_params: params.run.clone(),
        time: 0.0,
        step: 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initialize_simulation() {
        let params = RunParamParser::from_json(
            r#"{
            "grid": { "nr": 10, "nz": 20, "r_max": 1.0, "z_max": 2.0 },
            "run": { "dt": 0.01, "final_time": 0.03, "final_step": 10 },
            "initial": { "density": 2.0, "temperature": 0.5 },
            "gas": { "gamma": 1.4 },
            "transport": { "kind": "constant", "conductivity": 0.01, "resistivity": 0.01 },
            "current": { "kind": "constant", "amperes": 0.0 },
            "adi": {
                "capillary_radius": 0.042,
                "capillary_half_length": 0.1,
                "electrode_length": 0.03,
                "wall_temperature": 0.0
            }
        }"#,
        )
        .unwrap();
        let mut simulation = initialize_simulation(&params).unwrap();
        let (j, i) = (simulation.grid.axial.beg(), simulation.grid.radial.beg());
        assert_eq!(simulation.state.prim[[PRS, j, i]], 1.0);
        assert!((simulation.state.cons[[crate::disc::state::ENG, j, i]] - 2.5).abs() < 1e-12);
        for _ in 0..3 {
            simulation.step().unwrap();
        }
        assert_eq!(simulation.step, 3);
        assert!((simulation.time - 0.03).abs() < 1e-12);
        // the cold wall draws heat out of the gas
        let i_wall = simulation.integrator.geometry.i_cap_inter_end;
        assert!(simulation.state.prim[[PRS, j, i_wall]] < 1.0);
    }
}
