use ndarray::{Axis, s};
use ndarray_stats::QuantileExt;
use serde::Deserialize;

use crate::{
    disc::{
        boundary::{BoundaryKind, ThermalWalls},
        current::DrivingCurrent,
        eos::EquationOfState,
        geometry::CapillaryGeometry,
        lines::LineSet,
        mesh::mesh2d::CylindricalGrid,
        physics::{
            AdiContext, DiffusionPhysics, EnergyUpdate, Models, ResistiveDiffusion, Stage,
            ThermalConduction,
        },
        state::{BX3, FluidState, PRS},
        transport::TransportModel,
        units::UnitSystem,
    },
    error::AdiError,
    io::{write_to_csv::write_line_profile, write_to_vtu::write_cells},
};

/// Engine configuration. Capillary lengths in cm, wall temperature in K.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct AdiParameters {
    pub wall_temperature: f64,
    pub capillary_radius: f64,
    pub capillary_half_length: f64,
    pub electrode_length: f64,
    pub thermal_conduction: bool,
    pub resistive_diffusion: bool,
    pub energy_tracking: bool,
    pub energy_update: EnergyUpdate,
    pub wall_thermal_boundary: BoundaryKind,
    pub outer_thermal_boundary: BoundaryKind,
    pub units: UnitSystem,
}
impl Default for AdiParameters {
    fn default() -> Self {
        Self {
            wall_temperature: 3000.0,
            capillary_radius: 0.04,
            capillary_half_length: 1.5,
            electrode_length: 0.1,
            thermal_conduction: true,
            resistive_diffusion: true,
            energy_tracking: true,
            energy_update: EnergyUpdate::default(),
            wall_thermal_boundary: BoundaryKind::FixedValue,
            outer_thermal_boundary: BoundaryKind::ZeroFlux,
            units: UnitSystem::default(),
        }
    }
}

/// Workspace of the ADI engine: capillary geometry, lines and the active
/// physics modules with their buffers.
pub struct AdiIntegrator {
    pub geometry: CapillaryGeometry,
    pub lines: LineSet,
    modules: Vec<Box<dyn DiffusionPhysics>>,
}
impl AdiIntegrator {
    pub fn new(grid: &CylindricalGrid, params: &AdiParameters) -> Result<Self, AdiError> {
        grid.radial.check_padding("r")?;
        grid.axial.check_padding("z")?;
        let units = params.units;
        let geometry = CapillaryGeometry::locate(
            grid,
            params.capillary_radius / units.length,
            params.capillary_half_length / units.length,
            params.electrode_length / units.length,
        )?;
        log::info!(
            "capillary radius {:.4e} cm (set {:.4e}), half length {:.4e} cm (set {:.4e}), \
             electrode {:.4e} cm (set {:.4e})",
            geometry.rcap_real * units.length,
            params.capillary_radius,
            geometry.zcap_real * units.length,
            params.capillary_half_length,
            geometry.dzcap_real * units.length,
            params.electrode_length,
        );
        let lines = LineSet::build(grid, &geometry)?;

        let mut modules: Vec<Box<dyn DiffusionPhysics>> = Vec::new();
        if params.thermal_conduction {
            let walls = ThermalWalls {
                wall_temperature: units.kelvin_to_code(params.wall_temperature),
                wall_kind: params.wall_thermal_boundary,
                outer_kind: params.outer_thermal_boundary,
            };
            modules.push(Box::new(ThermalConduction::new(
                grid,
                &lines,
                walls,
                params.energy_update,
            )));
        }
        if params.resistive_diffusion {
            modules.push(Box::new(ResistiveDiffusion::new(
                grid,
                &lines,
                units,
                params.capillary_radius,
                params.energy_tracking,
            )));
        }
        if modules.is_empty() {
            log::warn!("no diffusion physics enabled, the integrator is a no-op");
        }
        Ok(Self {
            geometry,
            lines,
            modules,
        })
    }
    pub fn modules(&self) -> &[Box<dyn DiffusionPhysics>] {
        &self.modules
    }
    /// Advances every active module by one ADI double sweep of length `dt`
    /// starting at time `t`, then folds the results into `state`.
    pub fn advance(
        &mut self,
        grid: &CylindricalGrid,
        state: &mut FluidState,
        models: Models,
        t: f64,
        dt: f64,
    ) -> Result<(), AdiError> {
        state.prim_to_cons_lines(models.eos, &self.lines.radial);
        let ctx = AdiContext {
            grid,
            geometry: &self.geometry,
            lines: &self.lines,
            models,
        };
        let half = 0.5 * dt;
        for module in self.modules.iter_mut() {
            module.build_coefficients(&ctx, state)?;
            module.classify_boundaries(&ctx, t);
            module.explicit_half_step(&ctx, Stage::A1, half);
            module.classify_boundaries(&ctx, t + half);
            module.implicit_half_step(&ctx, Stage::A2, half);
            module.explicit_half_step(&ctx, Stage::B1, half);
            module.classify_boundaries(&ctx, t + dt);
            module.implicit_half_step(&ctx, Stage::B2, half);
        }
        for module in self.modules.iter() {
            module.fold_into(&ctx, state)?;
        }
        state.cons_to_prim_lines(models.eos, &self.lines.radial)
    }
    /// Re-classifies the boundaries of every module at time `t`.
    pub fn refresh_boundaries(&mut self, grid: &CylindricalGrid, models: Models, t: f64) {
        let ctx = AdiContext {
            grid,
            geometry: &self.geometry,
            lines: &self.lines,
            models,
        };
        for module in self.modules.iter_mut() {
            module.classify_boundaries(&ctx, t);
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct RunParameters {
    pub dt: f64,
    pub final_time: f64,
    pub final_step: usize,
    #[serde(default)]
    pub output_every: usize,
    #[serde(default = "default_output_name")]
    pub output_name: String,
}
fn default_output_name() -> String {
    "capillary".to_string()
}

pub struct Simulation {
    pub grid: CylindricalGrid,
    pub state: FluidState,
    pub integrator: AdiIntegrator,
    pub eos: Box<dyn EquationOfState>,
    pub transport: Box<dyn TransportModel>,
    pub current: Box<dyn DrivingCurrent>,
    pub run_params: RunParameters,
    pub time: f64,
    pub step: usize,
}
impl Simulation {
    pub fn step(&mut self) -> Result<(), AdiError> {
        let dt = self.run_params.dt.min(self.run_params.final_time - self.time);
        let models = Models {
            eos: self.eos.as_ref(),
            transport: self.transport.as_ref(),
            current: self.current.as_ref(),
        };
        self.integrator
            .advance(&self.grid, &mut self.state, models, self.time, dt)?;
        self.state.fill_ghosts_zero_gradient(&self.grid);
        self.time += dt;
        self.step += 1;
        self.log_extrema();
        Ok(())
    }
    pub fn run(&mut self) -> Result<(), AdiError> {
        let run = self.run_params.clone();
        log::info!(
            "running to t = {:.4e} (at most {} steps, dt = {:.4e})",
            run.final_time,
            run.final_step,
            run.dt
        );
        self.write_outputs()?;
        while self.time < run.final_time * (1.0 - 1e-12) && self.step < run.final_step {
            self.step()?;
            if run.output_every > 0 && self.step % run.output_every == 0 {
                self.write_outputs()?;
            }
        }
        log::info!("finished at t = {:.4e} after {} steps", self.time, self.step);
        Ok(())
    }
    fn log_extrema(&self) {
        if !log::log_enabled!(log::Level::Debug) {
            return;
        }
        let (r, z) = (&self.grid.radial, &self.grid.axial);
        for (name, nv) in [("prs", PRS), ("b_phi", BX3)] {
            let field = self.state.prim.index_axis(Axis(0), nv);
            let interior = field.slice(s![z.interior(), r.interior()]);
            if let (Ok(min), Ok(max)) = (interior.min(), interior.max()) {
                log::debug!(
                    "step {} t={:.4e}: {name} in [{min:.4e}, {max:.4e}]",
                    self.step,
                    self.time
                );
            }
        }
    }
    /// Cell data of the fluid region and the radial profile at the capillary
    /// midplane.
    pub fn write_outputs(&self) -> Result<(), AdiError> {
        let name = &self.run_params.output_name;
        let lines = &self.integrator.lines;
        write_cells(name, &self.grid, lines, &self.state, self.eos.as_ref(), self.step)?;
        if let Some(line) = lines.radial.iter().next() {
            write_line_profile(
                &format!("{name}_radial"),
                &self.grid,
                line,
                &self.state,
                self.eos.as_ref(),
                self.step,
            )?;
        }
        Ok(())
    }
}
