//! Curve smoothing for bundled paths: control points are straightened toward
//! the chord by `beta`, then traced with a uniform cubic B-spline that starts
//! and ends on the first and last points.

use bevy::math::Vec2;

/// Flatten a bundled path into a polyline with `samples` points per spline
/// piece. `beta = 1` follows the control polygon's spline exactly, `beta = 0`
/// collapses to the straight chord.
pub fn bundle_curve(points: &[Vec2], beta: f32, samples: usize) -> Vec<Vec2> {
    if points.len() < 2 {
        return points.to_vec();
    }
    let n = points.len() - 1;
    let first = points[0];
    let chord = points[n] - first;
    let straightened: Vec<Vec2> = points
        .iter()
        .enumerate()
        .map(|(i, &p)| {
            let t = i as f32 / n as f32;
            p * beta + (first + chord * t) * (1.0 - beta)
        })
        .collect();
    basis_curve(&straightened, samples)
}

/// Cubic B-spline through `points` with clamped ends.
pub fn basis_curve(points: &[Vec2], samples: usize) -> Vec<Vec2> {
    if points.len() < 3 {
        return points.to_vec();
    }
    let samples = samples.max(1);
    let mut out = vec![points[0]];

    // Lead-in line from the first point to the start of the first piece.
    let (p0, p1) = (points[0], points[1]);
    let mut pen = (p0 * 5.0 + p1) / 6.0;
    out.push(pen);

    let emit = |a: Vec2, b: Vec2, c: Vec2, pen: &mut Vec2, out: &mut Vec<Vec2>| {
        let c1 = (a * 2.0 + b) / 3.0;
        let c2 = (a + b * 2.0) / 3.0;
        let end = (a + b * 4.0 + c) / 6.0;
        for s in 1..=samples {
            let t = s as f32 / samples as f32;
            out.push(cubic(*pen, c1, c2, end, t));
        }
        *pen = end;
    };

    for w in points.windows(3) {
        emit(w[0], w[1], w[2], &mut pen, &mut out);
    }
    let last = points[points.len() - 1];
    let before = points[points.len() - 2];
    emit(before, last, last, &mut pen, &mut out);
    out.push(last);
    out
}

fn cubic(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2, t: f32) -> Vec2 {
    let u = 1.0 - t;
    p0 * (u * u * u) + p1 * (3.0 * u * u * t) + p2 * (3.0 * u * t * t) + p3 * (t * t * t)
}
