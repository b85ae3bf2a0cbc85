use ndarray::{Array1, Array2, ArrayView1};

use crate::disc::{
    boundary::{BoundaryCondition, BoundaryKind, LineBoundaries, with_boundaries},
    coefficients::SweepCoefficients,
    lines::{Line, Lines},
    tridiagonal::TridiagonalSystem,
};

/// Conductances and capacity along one line.
#[derive(Clone, Copy)]
pub struct LineCoefficients<'a> {
    pub hp: ArrayView1<'a, f64>,
    pub hm: ArrayView1<'a, f64>,
    pub c: ArrayView1<'a, f64>,
}
impl<'a> LineCoefficients<'a> {
    pub fn on_line(sweep: &SweepCoefficients<'a>, line: &Line) -> Self {
        Self {
            hp: line.lane(sweep.hp),
            hm: line.lane(sweep.hm),
            c: line.lane(sweep.c),
        }
    }
}

/// Weight of the conductance toward a line end in the diagonal: the ghost
/// reflection of a fixed value doubles it, a zero-flux end drops it.
fn end_weight(bc: BoundaryCondition) -> f64 {
    match bc.kind {
        BoundaryKind::FixedValue => 2.0,
        BoundaryKind::ZeroFlux => 0.0,
    }
}

/// Backward Euler system of one line.
pub fn assemble_implicit_line(
    b: ArrayView1<f64>,
    source: Option<ArrayView1<f64>>,
    coefficients: LineCoefficients,
    left: BoundaryCondition,
    right: BoundaryCondition,
    dt: f64,
) -> TridiagonalSystem {
    let LineCoefficients { hp, hm, c } = coefficients;
    let n = b.len();
    let mut system = TridiagonalSystem::zeros(n);
    for k in 0..n {
        let a = dt / c[k];
        let wm = if k == 0 { end_weight(left) } else { 1.0 };
        let wp = if k + 1 == n { end_weight(right) } else { 1.0 };
        system.diagonal[k] = 1.0 + a * (wp * hp[k] + wm * hm[k]);
        system.upper[k] = -a * hp[k];
        system.lower[k] = -a * hm[k];
        system.rhs[k] = b[k] + source.map_or(0.0, |s| s[k] * dt);
    }
    if left.kind == BoundaryKind::FixedValue {
        system.rhs[0] += 2.0 * left.value * hm[0] * dt / c[0];
    }
    if right.kind == BoundaryKind::FixedValue {
        system.rhs[n - 1] += 2.0 * right.value * hp[n - 1] * dt / c[n - 1];
    }
    system
}

pub fn implicit_line(
    b: ArrayView1<f64>,
    source: Option<ArrayView1<f64>>,
    coefficients: LineCoefficients,
    left: BoundaryCondition,
    right: BoundaryCondition,
    dt: f64,
) -> Array1<f64> {
    assemble_implicit_line(b, source, coefficients, left, right, dt).solve()
}

/// Forward Euler update of one line.
pub fn explicit_line(
    b: ArrayView1<f64>,
    source: Option<ArrayView1<f64>>,
    coefficients: LineCoefficients,
    left: BoundaryCondition,
    right: BoundaryCondition,
    dt: f64,
) -> Array1<f64> {
    let LineCoefficients { hp, hm, c } = coefficients;
    let n = b.len();
    Array1::from_shape_fn(n, |k| {
        let plus = if k + 1 < n {
            hp[k] * (b[k + 1] - b[k])
        } else {
            match right.kind {
                BoundaryKind::FixedValue => hp[k] * (2.0 * right.value - 2.0 * b[k]),
                BoundaryKind::ZeroFlux => 0.0,
            }
        };
        let minus = if k > 0 {
            hm[k] * (b[k - 1] - b[k])
        } else {
            match left.kind {
                BoundaryKind::FixedValue => hm[k] * (2.0 * left.value - 2.0 * b[k]),
                BoundaryKind::ZeroFlux => 0.0,
            }
        };
        b[k] + source.map_or(0.0, |s| s[k] * dt) + dt / c[k] * (plus + minus)
    })
}

/// Implicit half step over every line of one direction, from `input` into `output`.
pub fn implicit_update(
    output: &mut Array2<f64>,
    input: &Array2<f64>,
    source: Option<&Array2<f64>>,
    sweep: &SweepCoefficients,
    lines: &Lines,
    boundaries: &LineBoundaries,
    dt: f64,
) {
    for (line, left, right) in with_boundaries(lines, boundaries) {
        let x = implicit_line(
            line.lane(input),
            source.map(|s| line.lane(s)),
            LineCoefficients::on_line(sweep, line),
            left,
            right,
            dt,
        );
        line.lane_mut(output).assign(&x);
    }
}

/// Explicit half step over every line of one direction, from `input` into `output`.
pub fn explicit_update(
    output: &mut Array2<f64>,
    input: &Array2<f64>,
    source: Option<&Array2<f64>>,
    sweep: &SweepCoefficients,
    lines: &Lines,
    boundaries: &LineBoundaries,
    dt: f64,
) {
    for (line, left, right) in with_boundaries(lines, boundaries) {
        let x = explicit_line(
            line.lane(input),
            source.map(|s| line.lane(s)),
            LineCoefficients::on_line(sweep, line),
            left,
            right,
            dt,
        );
        line.lane_mut(output).assign(&x);
    }
}
