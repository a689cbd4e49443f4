//! Uniform hash grid for short-range neighbour queries.

use bevy::math::Vec2;
use std::collections::HashMap;

/// Buckets point indices by square cell. A query around a point visits the
/// 3x3 block of cells around it, so every neighbour within `cell_size` is
/// returned (plus some farther ones the caller must filter).
#[derive(Debug, Default)]
pub struct CellGrid {
    cell_size: f32,
    cells: HashMap<(i32, i32), Vec<usize>>,
}

impl CellGrid {
    pub fn build(points: impl IntoIterator<Item = Vec2>, cell_size: f32) -> Self {
        let mut grid = Self {
            cell_size: cell_size.max(f32::EPSILON),
            cells: HashMap::new(),
        };
        for (i, p) in points.into_iter().enumerate() {
            let cell = grid.cell_of(p);
            grid.cells.entry(cell).or_default().push(i);
        }
        grid
    }

    pub fn cell_of(&self, p: Vec2) -> (i32, i32) {
        (
            (p.x / self.cell_size).floor() as i32,
            (p.y / self.cell_size).floor() as i32,
        )
    }

    /// Indices in the cells surrounding `p`.
    pub fn around(&self, p: Vec2) -> impl Iterator<Item = usize> + '_ {
        let (cx, cy) = self.cell_of(p);
        (cx.saturating_sub(1)..=cx.saturating_add(1))
            .flat_map(move |x| {
                (cy.saturating_sub(1)..=cy.saturating_add(1)).map(move |y| (x, y))
            })
            .filter_map(move |cell| self.cells.get(&cell))
            .flat_map(|indices| indices.iter().copied())
    }

    pub fn len(&self) -> usize {
        self.cells.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_of_floors_negative_coordinates() {
        let grid = CellGrid::build(std::iter::empty(), 10.0);
        assert_eq!(grid.cell_of(Vec2::ZERO), (0, 0));
        assert_eq!(grid.cell_of(Vec2::new(15.0, -5.0)), (1, -1));
        assert_eq!(grid.cell_of(Vec2::new(-10.0, 9.99)), (-1, 0));
    }

    #[test]
    fn around_finds_neighbours_across_cell_borders() {
        let points = [
            Vec2::new(9.0, 9.0),
            Vec2::new(11.0, 11.0),
            Vec2::new(100.0, 100.0),
        ];
        let grid = CellGrid::build(points, 10.0);
        assert_eq!(grid.len(), 3);
        let mut near: Vec<usize> = grid.around(points[0]).collect();
        near.sort();
        assert_eq!(near, vec![0, 1]);
    }

    #[test]
    fn every_point_within_cell_size_is_visited() {
        let points: Vec<Vec2> = (0..50)
            .map(|i| Vec2::new((i * 7 % 31) as f32, (i * 13 % 29) as f32))
            .collect();
        let grid = CellGrid::build(points.iter().copied(), 6.0);
        for (i, p) in points.iter().enumerate() {
            let near: Vec<usize> = grid.around(*p).collect();
            for (j, q) in points.iter().enumerate() {
                if p.distance(*q) <= 6.0 {
                    assert!(near.contains(&j), "{i} should see {j}");
                }
            }
        }
    }

    #[test]
    fn far_points_in_a_degenerate_grid_saturate() {
        let points = [Vec2::new(500.0, 300.0), Vec2::new(510.0, 300.0)];
        let grid = CellGrid::build(points, 0.0);
        assert_eq!(grid.cell_of(points[0]), (i32::MAX, i32::MAX));
        let near: Vec<usize> = grid.around(points[0]).collect();
        assert_eq!(near.len(), 2);
    }

    #[test]
    fn empty_grid() {
        let grid = CellGrid::build(std::iter::empty(), 1.0);
        assert!(grid.is_empty());
        assert_eq!(grid.around(Vec2::ZERO).count(), 0);
    }
}
