use ndarray::ArrayView1;

use crate::{disc::mesh::mesh2d::CylindricalGrid, error::AdiError};

/// Grid indices where the embedded capillary wall and the electrode sit.
///
/// ```text
///              r                      j_elec_start
///              ^    |                 :      j_cap_inter_end
///              |    |      wall       v      |
/// i_cap + 1         |*****************o******|
/// i_cap             |   capillary interior   |   outer domain
///                   |                        |
///              0    o--------------------------------> z
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct CapillaryGeometry {
    /// Last radial cell inside the capillary.
    pub i_cap_inter_end: usize,
    /// Last axial cell inside the capillary.
    pub j_cap_inter_end: usize,
    /// First axial cell bordering the electrode.
    pub j_elec_start: usize,
    pub rcap_real: f64,
    pub zcap_real: f64,
    pub dzcap_real: f64,
}
impl CapillaryGeometry {
    /// Snaps the capillary radius, half length and electrode length (code
    /// units) to the nearest cell faces.
    pub fn locate(
        grid: &CylindricalGrid,
        rcap: f64,
        zcap: f64,
        dzcap: f64,
    ) -> Result<Self, AdiError> {
        let r = &grid.radial;
        let z = &grid.axial;
        let i_cap_inter_end =
            r.beg() + find_idx_closest(r.xr.slice(ndarray::s![r.interior()]), rcap);
        let j_cap_inter_end =
            z.beg() + find_idx_closest(z.xr.slice(ndarray::s![z.interior()]), zcap);
        let j_elec_start =
            z.beg() + find_idx_closest(z.xl.slice(ndarray::s![z.interior()]), zcap - dzcap);
        if j_elec_start > j_cap_inter_end {
            return Err(AdiError::ElectrodeAfterCapillaryEnd {
                j_elec_start,
                j_cap_inter_end,
            });
        }
        let geometry = Self {
            i_cap_inter_end,
            j_cap_inter_end,
            j_elec_start,
            rcap_real: r.xr[i_cap_inter_end],
            zcap_real: z.xr[j_cap_inter_end],
            dzcap_real: z.xr[j_cap_inter_end] - z.xl[j_elec_start],
        };
        log::info!(
            "capillary markers: i_cap_inter_end={}, j_cap_inter_end={}, j_elec_start={}",
            geometry.i_cap_inter_end,
            geometry.j_cap_inter_end,
            geometry.j_elec_start
        );
        Ok(geometry)
    }
    pub fn inside_capillary_radius(&self, i: usize) -> bool {
        i <= self.i_cap_inter_end
    }
    pub fn inside_capillary_length(&self, j: usize) -> bool {
        j <= self.j_cap_inter_end
    }
    pub fn on_electrode(&self, j: usize) -> bool {
        j >= self.j_elec_start && j <= self.j_cap_inter_end
    }
    /// Axial coordinate where the electrode begins.
    pub fn electrode_start(&self) -> f64 {
        self.zcap_real - self.dzcap_real
    }
}

/// Index of the entry of `values` closest to `target` (first one on ties).
pub fn find_idx_closest(values: ArrayView1<f64>, target: f64) -> usize {
    let mut best = 0;
    let mut best_diff = f64::INFINITY;
    for (k, &v) in values.iter().enumerate() {
        let diff = (v - target).abs();
        if diff < best_diff {
            best_diff = diff;
            best = k;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_find_idx_closest() {
        let v = array![0.0, 0.5, 1.0, 1.5];
        assert_eq!(find_idx_closest(v.view(), -3.0), 0);
        assert_eq!(find_idx_closest(v.view(), 0.1), 0);
        assert_eq!(find_idx_closest(v.view(), 1.1), 2);
        assert_eq!(find_idx_closest(v.view(), 9.0), 3);
    }

    #[test]
    fn test_locate_markers() {
        // dr = 0.1, dz = 0.1, two ghosts
        let grid = CylindricalGrid::uniform(10, 20, 1.0, 2.0, 2);
        let geometry = CapillaryGeometry::locate(&grid, 0.42, 1.0, 0.3).unwrap();
        // xr of radial cell i is (i - 1) * 0.1
        assert_eq!(geometry.i_cap_inter_end, 5);
        assert_eq!(geometry.j_cap_inter_end, 11);
        assert_eq!(geometry.j_elec_start, 9);
        assert!((geometry.rcap_real - 0.4).abs() < 1e-12);
        assert!((geometry.zcap_real - 1.0).abs() < 1e-12);
        assert!((geometry.dzcap_real - 0.3).abs() < 1e-12);
        assert!((geometry.electrode_start() - 0.7).abs() < 1e-12);
        assert!(geometry.on_electrode(10));
        assert!(!geometry.on_electrode(12));
    }

    #[test]
    fn test_electrode_after_capillary_end() {
        let grid = CylindricalGrid::uniform(10, 20, 1.0, 2.0, 2);
        let result = CapillaryGeometry::locate(&grid, 0.4, 1.0, -0.5);
        assert!(matches!(
            result,
            Err(AdiError::ElectrodeAfterCapillaryEnd { .. })
        ));
    }
}
