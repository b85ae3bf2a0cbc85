use ndarray::Array2;
use serde::Deserialize;

use crate::{
    disc::{
        boundary::{self, BoundarySet, ThermalWalls},
        coefficients::Coefficients,
        current::DrivingCurrent,
        diffusion::{explicit_update, implicit_update},
        energy::resistive_energy_source,
        eos::EquationOfState,
        geometry::CapillaryGeometry,
        lines::{Direction, LineSet},
        mesh::mesh2d::CylindricalGrid,
        state::{BX3, ENG, FluidState},
        transport::TransportModel,
        units::UnitSystem,
    },
    error::AdiError,
};

/// Closures supplied by the host for one call.
#[derive(Clone, Copy)]
pub struct Models<'a> {
    pub eos: &'a dyn EquationOfState,
    pub transport: &'a dyn TransportModel,
    pub current: &'a dyn DrivingCurrent,
}

/// Read-only view of the workspace handed to the physics modules.
pub struct AdiContext<'a> {
    pub grid: &'a CylindricalGrid,
    pub geometry: &'a CapillaryGeometry,
    pub lines: &'a LineSet,
    pub models: Models<'a>,
}

/// The four half steps of one ADI double sweep.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    /// Explicit radial, boundaries at t.
    A1,
    /// Implicit axial, boundaries at t + dt/2.
    A2,
    /// Explicit axial, boundaries at t + dt/2.
    B1,
    /// Implicit radial, boundaries at t + dt.
    B2,
}
impl Stage {
    pub const ALL: [Stage; 4] = [Stage::A1, Stage::A2, Stage::B1, Stage::B2];

    pub fn direction(self) -> Direction {
        match self {
            Stage::A1 | Stage::B2 => Direction::Radial,
            Stage::A2 | Stage::B1 => Direction::Axial,
        }
    }
    pub fn is_explicit(self) -> bool {
        matches!(self, Stage::A1 | Stage::B1)
    }
}

/// The diffused field at the start of the step and after each half step.
#[derive(Clone, Debug)]
pub struct StageFields {
    pub initial: Array2<f64>,
    pub a1: Array2<f64>,
    pub a2: Array2<f64>,
    pub b1: Array2<f64>,
    pub b2: Array2<f64>,
}
impl StageFields {
    pub fn zeros(grid: &CylindricalGrid) -> Self {
        Self {
            initial: grid.zeros(),
            a1: grid.zeros(),
            a2: grid.zeros(),
            b1: grid.zeros(),
            b2: grid.zeros(),
        }
    }
    pub fn input(&self, stage: Stage) -> &Array2<f64> {
        match stage {
            Stage::A1 => &self.initial,
            Stage::A2 => &self.a1,
            Stage::B1 => &self.a2,
            Stage::B2 => &self.b1,
        }
    }
    pub fn output(&self, stage: Stage) -> &Array2<f64> {
        match stage {
            Stage::A1 => &self.a1,
            Stage::A2 => &self.a2,
            Stage::B1 => &self.b1,
            Stage::B2 => &self.b2,
        }
    }
    fn split(&mut self, stage: Stage) -> (&Array2<f64>, &mut Array2<f64>) {
        match stage {
            Stage::A1 => (&self.initial, &mut self.a1),
            Stage::A2 => (&self.a1, &mut self.a2),
            Stage::B1 => (&self.a2, &mut self.b1),
            Stage::B2 => (&self.b1, &mut self.b2),
        }
    }
    /// Field at the end of the full step.
    pub fn result(&self) -> &Array2<f64> {
        &self.b2
    }
}

/// Coefficients, stage fields and boundary data of one diffused quantity.
#[derive(Clone, Debug)]
pub struct DiffusionProblem {
    pub coefficients: Coefficients,
    pub fields: StageFields,
    pub boundaries: BoundarySet,
}
impl DiffusionProblem {
    pub fn new(grid: &CylindricalGrid, lines: &LineSet) -> Self {
        Self {
            coefficients: Coefficients::zeros(grid),
            fields: StageFields::zeros(grid),
            boundaries: BoundarySet::closed(lines),
        }
    }
    pub fn explicit(&mut self, name: &str, lines: &LineSet, stage: Stage, dt: f64) {
        let direction = stage.direction();
        let limit = self
            .coefficients
            .explicit_time_limit(lines.get(direction), direction);
        if dt > limit {
            log::warn!(
                "{name}: explicit {} half step {dt:.3e} exceeds the stability limit {limit:.3e}",
                direction.name()
            );
        }
        let (input, output) = self.fields.split(stage);
        explicit_update(
            output,
            input,
            None,
            &self.coefficients.sweep(direction),
            lines.get(direction),
            self.boundaries.get(direction),
            dt,
        );
    }
    pub fn implicit(&mut self, lines: &LineSet, stage: Stage, dt: f64) {
        let direction = stage.direction();
        let (input, output) = self.fields.split(stage);
        implicit_update(
            output,
            input,
            None,
            &self.coefficients.sweep(direction),
            lines.get(direction),
            self.boundaries.get(direction),
            dt,
        );
    }
}

/// How the temperature change is turned into an internal energy change.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnergyUpdate {
    /// `dE = dE/dT (T_new - T_old)`, with the dE/dT used by the capacities.
    HeatCapacity,
    /// `dE = e(T_new) - e(T_old)` evaluated by the equation of state.
    #[default]
    InternalEnergy,
}

/// One diffusion physics advanced by the ADI driver.
pub trait DiffusionPhysics {
    fn name(&self) -> &'static str;
    fn problem(&self) -> &DiffusionProblem;
    /// Loads the diffused field and rebuilds every coefficient from `state`.
    fn build_coefficients(&mut self, ctx: &AdiContext, state: &FluidState)
    -> Result<(), AdiError>;
    fn classify_boundaries(&mut self, ctx: &AdiContext, t: f64);
    fn explicit_half_step(&mut self, ctx: &AdiContext, stage: Stage, dt: f64);
    fn implicit_half_step(&mut self, ctx: &AdiContext, stage: Stage, dt: f64);
    /// Writes the step result into the conserved variables.
    fn fold_into(&self, ctx: &AdiContext, state: &mut FluidState) -> Result<(), AdiError>;
}

pub struct ThermalConduction {
    pub walls: ThermalWalls,
    pub energy_update: EnergyUpdate,
    problem: DiffusionProblem,
}
impl ThermalConduction {
    pub fn new(
        grid: &CylindricalGrid,
        lines: &LineSet,
        walls: ThermalWalls,
        energy_update: EnergyUpdate,
    ) -> Self {
        Self {
            walls,
            energy_update,
            problem: DiffusionProblem::new(grid, lines),
        }
    }
}
impl DiffusionPhysics for ThermalConduction {
    fn name(&self) -> &'static str {
        "thermal conduction"
    }
    fn problem(&self) -> &DiffusionProblem {
        &self.problem
    }
    fn build_coefficients(
        &mut self,
        ctx: &AdiContext,
        state: &FluidState,
    ) -> Result<(), AdiError> {
        let eos = ctx.models.eos;
        for (j, i) in ctx.lines.radial.cells() {
            self.problem.fields.initial[[j, i]] = eos.temperature(&state.primitive(j, i))?;
        }
        self.problem.coefficients.assemble_conduction(
            ctx.grid,
            &ctx.lines.radial,
            state,
            eos,
            ctx.models.transport,
        )
    }
    fn classify_boundaries(&mut self, ctx: &AdiContext, _t: f64) {
        boundary::classify_thermal(
            ctx.lines,
            ctx.geometry,
            &self.walls,
            &mut self.problem.boundaries,
        );
    }
    fn explicit_half_step(&mut self, ctx: &AdiContext, stage: Stage, dt: f64) {
        let name = self.name();
        self.problem.explicit(name, ctx.lines, stage, dt);
    }
    fn implicit_half_step(&mut self, ctx: &AdiContext, stage: Stage, dt: f64) {
        self.problem.implicit(ctx.lines, stage, dt);
    }
    fn fold_into(&self, ctx: &AdiContext, state: &mut FluidState) -> Result<(), AdiError> {
        let fields = &self.problem.fields;
        for (j, i) in ctx.lines.radial.cells() {
            let (t_old, t_new) = (fields.initial[[j, i]], fields.result()[[j, i]]);
            let de = match self.energy_update {
                EnergyUpdate::HeatCapacity => {
                    self.problem.coefficients.de_dt[[j, i]] * (t_new - t_old)
                }
                EnergyUpdate::InternalEnergy => {
                    let v = state.primitive(j, i);
                    ctx.models.eos.internal_energy(&v, t_new)
                        - ctx.models.eos.internal_energy(&v, t_old)
                }
            };
            state.cons[[ENG, j, i]] += de;
        }
        Ok(())
    }
}

/// Per-stage resistive energy deposits.
#[derive(Clone, Debug)]
pub struct EnergySources {
    pub a1: Array2<f64>,
    pub a2: Array2<f64>,
    pub b1: Array2<f64>,
    pub b2: Array2<f64>,
}
impl EnergySources {
    fn zeros(grid: &CylindricalGrid) -> Self {
        Self {
            a1: grid.zeros(),
            a2: grid.zeros(),
            b1: grid.zeros(),
            b2: grid.zeros(),
        }
    }
    fn get_mut(&mut self, stage: Stage) -> &mut Array2<f64> {
        match stage {
            Stage::A1 => &mut self.a1,
            Stage::A2 => &mut self.a2,
            Stage::B1 => &mut self.b1,
            Stage::B2 => &mut self.b2,
        }
    }
    pub fn total(&self, j: usize, i: usize) -> f64 {
        self.a1[[j, i]] + self.a2[[j, i]] + self.b1[[j, i]] + self.b2[[j, i]]
    }
}

/// Diffusion of `psi = r B_phi` driven by the discharge current at the wall.
pub struct ResistiveDiffusion {
    pub units: UnitSystem,
    /// Capillary radius in cm, for the wall field.
    pub capillary_radius_cm: f64,
    pub energy_tracking: bool,
    problem: DiffusionProblem,
    energy: EnergySources,
}
impl ResistiveDiffusion {
    pub fn new(
        grid: &CylindricalGrid,
        lines: &LineSet,
        units: UnitSystem,
        capillary_radius_cm: f64,
        energy_tracking: bool,
    ) -> Self {
        Self {
            units,
            capillary_radius_cm,
            energy_tracking,
            problem: DiffusionProblem::new(grid, lines),
            energy: EnergySources::zeros(grid),
        }
    }
    pub fn energy_sources(&self) -> &EnergySources {
        &self.energy
    }
    /// Wall field in code units at code time `t`.
    pub fn wall_field(&self, current: &dyn DrivingCurrent, t: f64) -> f64 {
        let amperes = current.current(self.units.seconds(t));
        self.units.wall_field(amperes, self.capillary_radius_cm)
    }
    /// Stages a1 and b1 account with the field entering the half step,
    /// a2 and b2 with the field leaving it.
    fn account_energy(&mut self, ctx: &AdiContext, stage: Stage, dt: f64) {
        if !self.energy_tracking {
            return;
        }
        let direction = stage.direction();
        let psi = if stage.is_explicit() {
            self.problem.fields.input(stage)
        } else {
            self.problem.fields.output(stage)
        };
        resistive_energy_source(
            self.energy.get_mut(stage),
            psi,
            &self.problem.coefficients.sweep(direction),
            ctx.grid,
            ctx.lines.get(direction),
            self.problem.boundaries.get(direction),
            dt,
        );
    }
}
impl DiffusionPhysics for ResistiveDiffusion {
    fn name(&self) -> &'static str {
        "resistive diffusion"
    }
    fn problem(&self) -> &DiffusionProblem {
        &self.problem
    }
    fn build_coefficients(
        &mut self,
        ctx: &AdiContext,
        state: &FluidState,
    ) -> Result<(), AdiError> {
        let r = &ctx.grid.radial.x;
        for (j, i) in ctx.lines.radial.cells() {
            self.problem.fields.initial[[j, i]] = r[i] * state.cons[[BX3, j, i]];
        }
        self.problem.coefficients.assemble_resistive(
            ctx.grid,
            &ctx.lines.radial,
            state,
            ctx.models.transport,
        )
    }
    fn classify_boundaries(&mut self, ctx: &AdiContext, t: f64) {
        let b_wall = self.wall_field(ctx.models.current, t);
        boundary::classify_magnetic(
            ctx.grid,
            ctx.lines,
            ctx.geometry,
            b_wall,
            &mut self.problem.boundaries,
        );
    }
    fn explicit_half_step(&mut self, ctx: &AdiContext, stage: Stage, dt: f64) {
        let name = self.name();
        self.problem.explicit(name, ctx.lines, stage, dt);
        self.account_energy(ctx, stage, dt);
    }
    fn implicit_half_step(&mut self, ctx: &AdiContext, stage: Stage, dt: f64) {
        self.problem.implicit(ctx.lines, stage, dt);
        self.account_energy(ctx, stage, dt);
    }
    fn fold_into(&self, ctx: &AdiContext, state: &mut FluidState) -> Result<(), AdiError> {
        let inv_r = &ctx.grid.radial.inv_x;
        let psi = self.problem.fields.result();
        for (j, i) in ctx.lines.radial.cells() {
            state.cons[[BX3, j, i]] = psi[[j, i]] * inv_r[i];
            if self.energy_tracking {
                state.cons[[ENG, j, i]] += self.energy.total(j, i);
            }
        }
        Ok(())
    }
}
