use std::ops::RangeInclusive;

use ndarray::Array1;

use super::AxisKind;
use crate::error::AdiError;

/// Cell metrics along one axis, ghost cells included.
///
/// Index `k` runs over `0..n_tot`; the interior cells are
/// `nghost..=nghost + n - 1`.
#[derive(Clone, Debug)]
pub struct AxisGrid {
    pub kind: AxisKind,
    /// Cell centers.
    pub x: Array1<f64>,
    pub xl: Array1<f64>,
    pub xr: Array1<f64>,
    pub dx: Array1<f64>,
    pub inv_dx: Array1<f64>,
    /// Inverse distance between the centers of cells `k` and `k + 1`.
    pub inv_dxi: Array1<f64>,
    /// Area of the left and right faces of each cell (per radian / unit length).
    pub area_l: Array1<f64>,
    pub area_r: Array1<f64>,
    /// Cell volume metric: `(xr^2 - xl^2) / 2` on a radial axis, `dx` otherwise.
    pub dv: Array1<f64>,
    /// `1 / x`, only meaningful on a radial axis.
    pub inv_x: Array1<f64>,
    pub nghost: usize,
    pub n: usize,
    pub n_tot: usize,
}
impl AxisGrid {
    pub fn uniform(kind: AxisKind, n: usize, nghost: usize, x_min: f64, x_max: f64) -> Self {
        let n_tot = n + 2 * nghost;
        let h = (x_max - x_min) / n as f64;
        let xl = Array1::from_shape_fn(n_tot, |k| x_min + (k as f64 - nghost as f64) * h);
        let xr = xl.mapv(|x| x + h);
        Self::from_faces(kind, xl, xr, nghost, n)
    }
    /// Builds the metrics from face positions; used for stretched grids too.
    pub fn from_faces(
        kind: AxisKind,
        xl: Array1<f64>,
        xr: Array1<f64>,
        nghost: usize,
        n: usize,
    ) -> Self {
        let n_tot = xl.len();
        let x = (&xl + &xr) * 0.5;
        let dx = &xr - &xl;
        let inv_dx = dx.mapv(|d| 1.0 / d);
        let inv_dxi = Array1::from_shape_fn(n_tot, |k| {
            if k + 1 < n_tot {
                1.0 / (x[k + 1] - x[k])
            } else {
                inv_dx[k]
            }
        });
        let (area_l, area_r, dv) = match kind {
            AxisKind::Radial => (
                xl.mapv(f64::abs),
                xr.mapv(f64::abs),
                Array1::from_shape_fn(n_tot, |k| 0.5 * (xr[k] * xr[k] - xl[k] * xl[k]).abs()),
            ),
            AxisKind::Cartesian => (Array1::ones(n_tot), Array1::ones(n_tot), dx.clone()),
        };
        let inv_x = x.mapv(|c| 1.0 / c);
        Self {
            kind,
            x,
            xl,
            xr,
            dx,
            inv_dx,
            inv_dxi,
            area_l,
            area_r,
            dv,
            inv_x,
            nghost,
            n,
            n_tot,
        }
    }
    pub fn beg(&self) -> usize {
        self.nghost
    }
    pub fn end(&self) -> usize {
        self.nghost + self.n - 1
    }
    pub fn interior(&self) -> RangeInclusive<usize> {
        self.beg()..=self.end()
    }
    pub fn check_padding(&self, axis: &'static str) -> Result<(), AdiError> {
        if self.nghost == 0 {
            return Err(AdiError::MissingGhostCells { axis });
        }
        if 2 * self.nghost + self.n != self.n_tot || self.x.len() != self.n_tot {
            return Err(AdiError::GridMismatch {
                axis,
                nghost: self.nghost,
                n: self.n,
                n_tot: self.n_tot,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radial_metrics() {
        let r = AxisGrid::uniform(AxisKind::Radial, 8, 2, 0.0, 2.0);
        assert_eq!(r.n_tot, 12);
        assert_eq!(r.beg(), 2);
        assert_eq!(r.end(), 9);
        assert!(r.xl[r.beg()].abs() < 1e-14);
        assert!((r.xr[r.end()] - 2.0).abs() < 1e-12);
        // sum of r dr over the interior is R^2 / 2
        let vol: f64 = r.interior().map(|i| r.dv[i]).sum();
        assert!((vol - 2.0).abs() < 1e-12);
        for i in r.interior() {
            assert!((r.area_r[i] - r.area_l[i + 1]).abs() < 1e-14);
            assert!((r.inv_dxi[i] - 4.0).abs() < 1e-10);
        }
    }

    #[test]
    fn test_padding_check() {
        let mut z = AxisGrid::uniform(AxisKind::Cartesian, 6, 2, 0.0, 1.0);
        assert!(z.check_padding("z").is_ok());
        z.nghost = 3;
        assert!(matches!(
            z.check_padding("z"),
            Err(AdiError::GridMismatch { axis: "z", .. })
        ));
        let unpadded = AxisGrid::uniform(AxisKind::Radial, 6, 0, 0.0, 1.0);
        assert!(matches!(
            unpadded.check_padding("r"),
            Err(AdiError::MissingGhostCells { axis: "r" })
        ));
    }
}
