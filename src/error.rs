use thiserror::Error;

/// Errors raised while setting up or advancing the ADI engine.
///
/// None of these are transient: each one means the simulation setup is
/// invalid, and the host is expected to stop.
#[derive(Error, Debug)]
pub enum AdiError {
    #[error("ghost padding of the {axis} axis is inconsistent: 2*{nghost}+{n} != {n_tot}")]
    GridMismatch {
        axis: &'static str,
        nghost: usize,
        n: usize,
        n_tot: usize,
    },

    #[error("the {axis} axis has no ghost cells; every line needs a neighbour on both sides")]
    MissingGhostCells { axis: &'static str },

    #[error("{direction} line at index {index} is empty (lidx {lidx} > ridx {ridx})")]
    EmptyLine {
        direction: &'static str,
        index: usize,
        lidx: usize,
        ridx: usize,
    },

    #[error("electrode starts at j={j_elec_start}, after the capillary end j={j_cap_inter_end}")]
    ElectrodeAfterCapillaryEnd {
        j_elec_start: usize,
        j_cap_inter_end: usize,
    },

    #[error("anisotropic resistivity {eta:?} at (r={r}, z={z}) is not supported by ADI")]
    AnisotropicResistivity { eta: [f64; 3], r: f64, z: f64 },

    #[error("cannot compute temperature at rho={rho}, prs={prs}")]
    Temperature { rho: f64, prs: f64 },

    #[error("table lookup out of range: T={temperature}, rho={density}")]
    TableOutOfRange { temperature: f64, density: f64 },

    #[error("unsupported configuration: {0}")]
    UnsupportedConfiguration(String),

    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse parameters: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("csv failure: {0}")]
    Csv(#[from] csv::Error),

    #[error("vtk export failed: {0}")]
    Vtk(String),
}

impl AdiError {
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::UnsupportedConfiguration(message.into())
    }
}
