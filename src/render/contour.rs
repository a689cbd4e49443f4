//! Point-density contours: points are splatted onto a grid, blurred with a
//! Gaussian kernel, and traced at evenly spaced thresholds with marching
//! squares.

use bevy::math::Vec2;
use std::collections::HashMap;

use crate::core::config::LayoutConfig;
use crate::core::scale::extent;

/// Largest grid the estimator will allocate; coarser cells are used beyond it.
const MAX_CELLS: usize = 512 * 512;

/// Closed regions where the estimated density is at least `value`.
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    /// Points per square screen unit.
    pub value: f32,
    /// Closed rings; the first point is repeated at the end.
    pub rings: Vec<Vec<Vec2>>,
}

/// Turns a point set into density contours.
pub trait DensityEstimator: Send + Sync {
    fn estimate(&self, points: &[Vec2]) -> Vec<Contour>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridDensity {
    pub cell_size: f32,
    pub bandwidth: f32,
    pub thresholds: usize,
}

impl Default for GridDensity {
    fn default() -> Self {
        Self::from_config(&LayoutConfig::default())
    }
}

impl GridDensity {
    pub fn from_config(config: &LayoutConfig) -> Self {
        Self {
            cell_size: config.contour_cell_size.max(0.5),
            bandwidth: config.contour_bandwidth.max(0.0),
            thresholds: config.contour_thresholds,
        }
    }
}

/// Scalar field sampled at integer grid points; zero outside.
struct Field {
    width: usize,
    height: usize,
    values: Vec<f32>,
}

impl Field {
    fn get(&self, i: i32, j: i32) -> f32 {
        if i < 0 || j < 0 || i as usize >= self.width || j as usize >= self.height {
            return 0.0;
        }
        self.values[j as usize * self.width + i as usize]
    }

    fn blur(&mut self, sigma: f32) {
        if sigma <= 0.0 {
            return;
        }
        let radius = (sigma * 3.0).ceil() as i32;
        let mut kernel: Vec<f32> = (-radius..=radius)
            .map(|k| (-(k * k) as f32 / (2.0 * sigma * sigma)).exp())
            .collect();
        let total: f32 = kernel.iter().sum();
        kernel.iter_mut().for_each(|k| *k /= total);

        let (w, h) = (self.width as i32, self.height as i32);
        let mut pass = vec![0.0f32; self.values.len()];
        for j in 0..h {
            for i in 0..w {
                pass[(j * w + i) as usize] = kernel
                    .iter()
                    .enumerate()
                    .map(|(k, weight)| weight * self.get(i + k as i32 - radius, j))
                    .sum();
            }
        }
        self.values = pass;

        let mut pass = vec![0.0f32; self.values.len()];
        for j in 0..h {
            for i in 0..w {
                pass[(j * w + i) as usize] = kernel
                    .iter()
                    .enumerate()
                    .map(|(k, weight)| weight * self.get(i, j + k as i32 - radius))
                    .sum();
            }
        }
        self.values = pass;
    }
}

/// A grid edge that an isoline can cross: horizontal edges join (i, j) and
/// (i + 1, j); vertical edges join (i, j) and (i, j + 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct GridEdge {
    horizontal: bool,
    i: i32,
    j: i32,
}

impl GridEdge {
    fn h(i: i32, j: i32) -> Self {
        Self { horizontal: true, i, j }
    }

    fn v(i: i32, j: i32) -> Self {
        Self { horizontal: false, i, j }
    }

    /// Where the isoline at `t` crosses this edge, in grid units.
    fn crossing(self, field: &Field, t: f32) -> Vec2 {
        let a = field.get(self.i, self.j);
        let (b, step) = if self.horizontal {
            (field.get(self.i + 1, self.j), Vec2::X)
        } else {
            (field.get(self.i, self.j + 1), Vec2::Y)
        };
        let f = if b == a { 0.5 } else { ((t - a) / (b - a)).clamp(0.0, 1.0) };
        Vec2::new(self.i as f32, self.j as f32) + step * f
    }
}

/// Closed isolines of `field` at threshold `t`, in grid units.
fn isolines(field: &Field, t: f32) -> Vec<Vec<Vec2>> {
    let inside = |i: i32, j: i32| field.get(i, j) >= t;

    let mut segments: Vec<(GridEdge, GridEdge)> = Vec::new();
    for j in -1..field.height as i32 {
        for i in -1..field.width as i32 {
            let (tl, tr, br, bl) = (inside(i, j), inside(i + 1, j), inside(i + 1, j + 1), inside(i, j + 1));
            let top = (tl != tr).then(|| GridEdge::h(i, j));
            let right = (tr != br).then(|| GridEdge::v(i + 1, j));
            let bottom = (bl != br).then(|| GridEdge::h(i, j + 1));
            let left = (tl != bl).then(|| GridEdge::v(i, j));

            match (top, right, bottom, left) {
                (Some(up), Some(r), Some(b), Some(l)) => {
                    let center = (field.get(i, j)
                        + field.get(i + 1, j)
                        + field.get(i + 1, j + 1)
                        + field.get(i, j + 1))
                        / 4.0;
                    if (center >= t) == tl {
                        segments.push((up, r));
                        segments.push((b, l));
                    } else {
                        segments.push((up, l));
                        segments.push((r, b));
                    }
                }
                _ => {
                    let crossed: Vec<GridEdge> =
                        [top, right, bottom, left].into_iter().flatten().collect();
                    if let &[a, b] = crossed.as_slice() {
                        segments.push((a, b));
                    }
                }
            }
        }
    }

    let mut adjacent: HashMap<GridEdge, Vec<usize>> = HashMap::new();
    for (k, (a, b)) in segments.iter().enumerate() {
        adjacent.entry(*a).or_default().push(k);
        adjacent.entry(*b).or_default().push(k);
    }

    let mut visited = vec![false; segments.len()];
    let mut rings = Vec::new();
    for start in 0..segments.len() {
        if visited[start] {
            continue;
        }
        visited[start] = true;
        let (first, second) = segments[start];
        let mut ring = vec![first.crossing(field, t)];
        let mut prev = start;
        let mut cur = second;
        loop {
            ring.push(cur.crossing(field, t));
            if cur == first {
                break;
            }
            let next = adjacent
                .get(&cur)
                .and_then(|segs| segs.iter().copied().find(|&k| k != prev && !visited[k]));
            let Some(next) = next else {
                break;
            };
            visited[next] = true;
            let (a, b) = segments[next];
            cur = if a == cur { b } else { a };
            prev = next;
        }
        rings.push(ring);
    }
    rings
}

impl DensityEstimator for GridDensity {
    fn estimate(&self, points: &[Vec2]) -> Vec<Contour> {
        let (Some([x0, x1]), Some([y0, y1])) = (
            extent(points.iter().map(|p| p.x)),
            extent(points.iter().map(|p| p.y)),
        ) else {
            return Vec::new();
        };

        let pad = self.bandwidth * 3.0 + self.cell_size;
        let origin = Vec2::new(x0 - pad, y0 - pad);
        let span = Vec2::new(x1 - x0 + pad * 2.0, y1 - y0 + pad * 2.0);
        let mut cell = self.cell_size;
        let cells = (span.x / cell).ceil() * (span.y / cell).ceil();
        if cells > MAX_CELLS as f32 {
            cell *= (cells / MAX_CELLS as f32).sqrt();
        }
        let width = (span.x / cell).ceil() as usize + 1;
        let height = (span.y / cell).ceil() as usize + 1;

        let mut field = Field {
            width,
            height,
            values: vec![0.0; width * height],
        };
        for p in points {
            let g = ((*p - origin) / cell).round();
            let (i, j) = (g.x as usize, g.y as usize);
            if i < width && j < height {
                field.values[j * width + i] += 1.0;
            }
        }
        field.blur(self.bandwidth / cell);
        let area = cell * cell;
        field.values.iter_mut().for_each(|v| *v /= area);

        let max = field.values.iter().copied().fold(0.0f32, f32::max);
        if max <= 0.0 || self.thresholds == 0 {
            return Vec::new();
        }

        (1..=self.thresholds)
            .map(|k| max * k as f32 / (self.thresholds + 1) as f32)
            .filter_map(|value| {
                let rings: Vec<Vec<Vec2>> = isolines(&field, value)
                    .into_iter()
                    .map(|ring| ring.into_iter().map(|g| origin + g * cell).collect())
                    .collect();
                (!rings.is_empty()).then_some(Contour { value, rings })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn estimator() -> GridDensity {
        GridDensity {
            cell_size: 2.0,
            bandwidth: 6.0,
            thresholds: 5,
        }
    }

    #[test]
    fn empty_input_has_no_contours() {
        assert!(estimator().estimate(&[]).is_empty());
    }

    #[test]
    fn rings_are_closed_and_finite() {
        let points = [Vec2::new(50.0, 50.0), Vec2::new(55.0, 52.0), Vec2::new(48.0, 58.0)];
        let contours = estimator().estimate(&points);
        assert!(!contours.is_empty());
        for c in &contours {
            for ring in &c.rings {
                assert!(ring.len() >= 4);
                assert_eq!(ring.first(), ring.last());
                assert!(ring.iter().all(|p| p.is_finite()));
            }
        }
    }

    #[test]
    fn values_increase_and_rings_enclose_the_cluster() {
        let points = [Vec2::new(100.0, 100.0); 4];
        let contours = estimator().estimate(&points);
        assert_eq!(contours.len(), 5);
        assert!(contours.windows(2).all(|w| w[0].value < w[1].value));
        for c in &contours {
            assert_eq!(c.rings.len(), 1);
            let ring = &c.rings[0];
            let [lo, hi] = extent(ring.iter().map(|p| p.x)).unwrap();
            assert!(lo < 100.0 && hi > 100.0);
            let [lo, hi] = extent(ring.iter().map(|p| p.y)).unwrap();
            assert!(lo < 100.0 && hi > 100.0);
        }
    }

    #[test]
    fn separate_clusters_give_separate_rings() {
        let mut points = vec![Vec2::new(0.0, 0.0); 3];
        points.extend(vec![Vec2::new(200.0, 0.0); 3]);
        let contours = estimator().estimate(&points);
        let top = contours.last().unwrap();
        assert_eq!(top.rings.len(), 2);
    }

    #[test]
    fn saddle_cells_are_resolved() {
        let field = Field {
            width: 2,
            height: 2,
            values: vec![1.0, 0.0, 0.0, 1.0],
        };
        let rings = isolines(&field, 0.5);
        assert!(!rings.is_empty());
        for ring in rings {
            assert_eq!(ring.first(), ring.last());
        }
    }
}
