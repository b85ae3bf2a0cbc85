use ndarray::{Array2, ArrayView1, ArrayViewMut1, s};

use crate::{
    disc::{geometry::CapillaryGeometry, mesh::mesh2d::CylindricalGrid},
    error::AdiError,
};

/// Sweep direction of an ADI half step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Along r (index i) at fixed j.
    Radial,
    /// Along z (index j) at fixed i.
    Axial,
}
impl Direction {
    pub fn name(self) -> &'static str {
        match self {
            Direction::Radial => "radial",
            Direction::Axial => "axial",
        }
    }
}

/// Contiguous run of fluid cells along one direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Line {
    pub direction: Direction,
    /// Index on the orthogonal axis (j for radial lines, i for axial lines).
    pub index: usize,
    pub lidx: usize,
    pub ridx: usize,
}
impl Line {
    pub fn len(&self) -> usize {
        self.ridx - self.lidx + 1
    }
    pub fn is_empty(&self) -> bool {
        self.ridx < self.lidx
    }
    /// `(j, i)` of the cell at sweep index `k`.
    pub fn cell(&self, k: usize) -> (usize, usize) {
        match self.direction {
            Direction::Radial => (self.index, k),
            Direction::Axial => (k, self.index),
        }
    }
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (self.lidx..=self.ridx).map(|k| self.cell(k))
    }
    /// 1D view of `field` over the line's interior cells.
    pub fn lane<'a>(&self, field: &'a Array2<f64>) -> ArrayView1<'a, f64> {
        match self.direction {
            Direction::Radial => field.slice(s![self.index, self.lidx..=self.ridx]),
            Direction::Axial => field.slice(s![self.lidx..=self.ridx, self.index]),
        }
    }
    pub fn lane_mut<'a>(&self, field: &'a mut Array2<f64>) -> ArrayViewMut1<'a, f64> {
        match self.direction {
            Direction::Radial => field.slice_mut(s![self.index, self.lidx..=self.ridx]),
            Direction::Axial => field.slice_mut(s![self.lidx..=self.ridx, self.index]),
        }
    }
}

/// All lines sweeping one direction.
#[derive(Clone, Debug)]
pub struct Lines {
    pub direction: Direction,
    pub lines: Vec<Line>,
}
impl Lines {
    pub fn len(&self) -> usize {
        self.lines.len()
    }
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
    pub fn iter(&self) -> std::slice::Iter<'_, Line> {
        self.lines.iter()
    }
    /// Every `(j, i)` covered by these lines.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.lines.iter().flat_map(|line| line.cells())
    }
}

#[derive(Clone, Debug)]
pub struct LineSet {
    pub radial: Lines,
    pub axial: Lines,
}
impl LineSet {
    /// Splits the fluid region into radial and axial lines, shortened where
    /// they hit the capillary wall.
    pub fn build(grid: &CylindricalGrid, geometry: &CapillaryGeometry) -> Result<Self, AdiError> {
        let r = &grid.radial;
        let z = &grid.axial;
        r.check_padding("radial")?;
        z.check_padding("axial")?;

        let radial = z
            .interior()
            .map(|j| Line {
                direction: Direction::Radial,
                index: j,
                lidx: r.beg(),
                ridx: if geometry.inside_capillary_length(j) {
                    geometry.i_cap_inter_end
                } else {
                    r.end()
                },
            })
            .collect();
        let axial = r
            .interior()
            .map(|i| Line {
                direction: Direction::Axial,
                index: i,
                lidx: if geometry.inside_capillary_radius(i) {
                    z.beg()
                } else {
                    geometry.j_cap_inter_end + 1
                },
                ridx: z.end(),
            })
            .collect();
        let set = Self {
            radial: Lines {
                direction: Direction::Radial,
                lines: radial,
            },
            axial: Lines {
                direction: Direction::Axial,
                lines: axial,
            },
        };
        for line in set.radial.iter().chain(set.axial.iter()) {
            if line.is_empty() {
                return Err(AdiError::EmptyLine {
                    direction: line.direction.name(),
                    index: line.index,
                    lidx: line.lidx,
                    ridx: line.ridx,
                });
            }
        }
        Ok(set)
    }
    pub fn get(&self, direction: Direction) -> &Lines {
        match direction {
            Direction::Radial => &self.radial,
            Direction::Axial => &self.axial,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn covered(grid: &CylindricalGrid, geometry: &CapillaryGeometry) {
        let lines = LineSet::build(grid, geometry).unwrap();
        for (lines, orth, sweep) in [
            (&lines.radial, &grid.axial, &grid.radial),
            (&lines.axial, &grid.radial, &grid.axial),
        ] {
            let indices: Vec<usize> = lines.iter().map(|l| l.index).collect();
            let expected: Vec<usize> = orth.interior().collect();
            assert_eq!(indices, expected);
            for line in lines.iter() {
                assert!(line.lidx >= sweep.beg() && line.ridx <= sweep.end());
                assert!(line.lidx <= line.ridx);
            }
        }
        // both sweeps see the same fluid cells, each exactly once
        let radial_cells: Vec<(usize, usize)> = lines.radial.cells().collect();
        let axial_cells: Vec<(usize, usize)> = lines.axial.cells().collect();
        let radial_set: BTreeSet<_> = radial_cells.iter().copied().collect();
        let axial_set: BTreeSet<_> = axial_cells.iter().copied().collect();
        assert_eq!(radial_set.len(), radial_cells.len());
        assert_eq!(axial_set.len(), axial_cells.len());
        assert_eq!(radial_set, axial_set);
        for &(j, i) in radial_set.iter() {
            let in_wall = j <= geometry.j_cap_inter_end && i > geometry.i_cap_inter_end;
            assert!(!in_wall);
        }
    }

    #[test]
    fn test_line_coverage() {
        let grid = CylindricalGrid::uniform(10, 20, 1.0, 2.0, 2);
        let configs = [
            (0.4, 1.0, 0.3),
            (0.1, 0.1, 0.1),
            (0.9, 1.8, 1.0),
            (0.5, 0.3, 0.1),
        ];
        for (rcap, zcap, dzcap) in configs {
            let geometry = CapillaryGeometry::locate(&grid, rcap, zcap, dzcap).unwrap();
            covered(&grid, &geometry);
        }
    }

    #[test]
    fn test_lines_truncated_by_wall() {
        let grid = CylindricalGrid::uniform(10, 20, 1.0, 2.0, 2);
        let geometry = CapillaryGeometry::locate(&grid, 0.4, 1.0, 0.3).unwrap();
        let lines = LineSet::build(&grid, &geometry).unwrap();
        let inside = lines.radial.lines[0];
        assert_eq!((inside.lidx, inside.ridx), (2, geometry.i_cap_inter_end));
        let outside = lines.radial.lines.last().unwrap();
        assert_eq!((outside.lidx, outside.ridx), (2, 11));
        let beyond_wall = lines.axial.lines.last().unwrap();
        assert_eq!(beyond_wall.lidx, geometry.j_cap_inter_end + 1);
        assert_eq!(beyond_wall.ridx, 21);
    }

    #[test]
    fn test_lane_views() {
        let grid = CylindricalGrid::uniform(4, 3, 1.0, 1.0, 1);
        let mut field = Array2::from_shape_fn(grid.shape(), |(j, i)| (10 * j + i) as f64);
        let radial = Line {
            direction: Direction::Radial,
            index: 2,
            lidx: 1,
            ridx: 3,
        };
        let axial = Line {
            direction: Direction::Axial,
            index: 4,
            lidx: 1,
            ridx: 3,
        };
        assert_eq!(radial.lane(&field).to_vec(), vec![21.0, 22.0, 23.0]);
        assert_eq!(axial.lane(&field).to_vec(), vec![14.0, 24.0, 34.0]);
        axial.lane_mut(&mut field).fill(0.0);
        assert_eq!(field[[2, 4]], 0.0);
        assert_eq!(field[[2, 3]], 23.0);
    }

    #[test]
    fn test_empty_line_rejected() {
        let grid = CylindricalGrid::uniform(10, 20, 1.0, 2.0, 2);
        // capillary reaching the far axial edge leaves nothing for outer axial lines
        let geometry = CapillaryGeometry::locate(&grid, 0.4, 2.0, 0.3).unwrap();
        assert!(matches!(
            LineSet::build(&grid, &geometry),
            Err(AdiError::EmptyLine { direction: "axial", .. })
        ));
    }
}
