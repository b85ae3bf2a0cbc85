pub mod boundary;
pub mod coefficients;
pub mod current;
pub mod diffusion;
pub mod energy;
pub mod eos;
pub mod geometry;
pub mod lines;
pub mod mesh;
pub mod physics;
pub mod state;
pub mod transport;
pub mod tridiagonal;
pub mod units;
