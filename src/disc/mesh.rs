pub mod mesh1d;
pub mod mesh2d;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AxisKind {
    /// Cylindrical radius: face areas and volumes carry the r metric.
    Radial,
    Cartesian,
}
