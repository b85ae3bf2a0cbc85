use ndarray::{Array1, ArrayView1};

/// Tridiagonal system `lower[k] x[k-1] + diagonal[k] x[k] + upper[k] x[k+1] = rhs[k]`.
///
/// `lower[0]` and `upper[n-1]` are never read.
#[derive(Clone, Debug)]
pub struct TridiagonalSystem {
    pub lower: Array1<f64>,
    pub diagonal: Array1<f64>,
    pub upper: Array1<f64>,
    pub rhs: Array1<f64>,
}
impl TridiagonalSystem {
    pub fn zeros(n: usize) -> Self {
        Self {
            lower: Array1::zeros(n),
            diagonal: Array1::zeros(n),
            upper: Array1::zeros(n),
            rhs: Array1::zeros(n),
        }
    }
    pub fn len(&self) -> usize {
        self.diagonal.len()
    }
    pub fn is_empty(&self) -> bool {
        self.diagonal.is_empty()
    }
    /// Thomas algorithm. Pivots are not checked: the diffusion coefficients
    /// are positive, so the matrices assembled here are diagonally dominant.
    pub fn solve(&self) -> Array1<f64> {
        thomas_solve(
            self.lower.view(),
            self.diagonal.view(),
            self.upper.view(),
            self.rhs.view(),
        )
    }
    /// Matrix-vector product with the assembled matrix.
    pub fn apply(&self, x: ArrayView1<f64>) -> Array1<f64> {
        let n = self.len();
        Array1::from_shape_fn(n, |k| {
            let mut y = self.diagonal[k] * x[k];
            if k > 0 {
                y += self.lower[k] * x[k - 1];
            }
            if k + 1 < n {
                y += self.upper[k] * x[k + 1];
            }
            y
        })
    }
}

pub fn thomas_solve(
    lower: ArrayView1<f64>,
    diagonal: ArrayView1<f64>,
    upper: ArrayView1<f64>,
    rhs: ArrayView1<f64>,
) -> Array1<f64> {
    let n = diagonal.len();
    let mut x = Array1::zeros(n);
    if n == 0 {
        return x;
    }
    let mut up = Array1::<f64>::zeros(n);
    let mut d = Array1::<f64>::zeros(n);

    up[0] = upper[0] / diagonal[0];
    d[0] = rhs[0] / diagonal[0];
    for k in 1..n {
        let pivot = diagonal[k] - lower[k] * up[k - 1];
        if k + 1 < n {
            up[k] = upper[k] / pivot;
        }
        d[k] = (rhs[k] - lower[k] * d[k - 1]) / pivot;
    }

    x[n - 1] = d[n - 1];
    for k in (0..n - 1).rev() {
        x[k] = d[k] - up[k] * x[k + 1];
    }
    x
}
