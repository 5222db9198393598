//! Parametric path generation for NPCs
//!
//! Each NPC walks a cubic curve sampled into a fixed number of points.
//! Curves always run from the top of the track (y = 1) to the bottom
//! (y = -1). The cubic is evaluated as `G * M * T(t)` where `G` holds the
//! four control vectors as columns, `M` is the Hermite or Bézier basis and
//! `T(t) = (1, t, t², t³)`.

use glam::{Mat4, Vec3, Vec4};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Which cubic basis a path uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CurveKind {
    Hermite,
    Bezier,
}

impl CurveKind {
    /// Pick a curve kind uniformly at random
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.random_bool(0.5) {
            CurveKind::Bezier
        } else {
            CurveKind::Hermite
        }
    }

    /// Basis matrix. Written row-major, then transposed into glam's
    /// column-major storage.
    fn basis(self) -> Mat4 {
        let rows = match self {
            CurveKind::Hermite => [
                [1.0, 0.0, -3.0, 2.0],
                [0.0, 0.0, 3.0, -2.0],
                [0.0, 1.0, -2.0, 1.0],
                [0.0, 0.0, -1.0, 1.0],
            ],
            CurveKind::Bezier => [
                [1.0, -3.0, 3.0, -1.0],
                [0.0, 3.0, -6.0, 3.0],
                [0.0, 0.0, 3.0, -3.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        };
        Mat4::from_cols_array_2d(&rows).transpose()
    }
}

/// The four control vectors of a cubic
///
/// Hermite: `[P0, P1, T0, T1]` (endpoints then tangents).
/// Bézier: `[P0, P1, P2, P3]` (endpoints are the first and last).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlPoints {
    pub kind: CurveKind,
    pub points: [Vec3; 4],
}

impl ControlPoints {
    /// Sample control points for the given kind
    pub fn sample<R: Rng + ?Sized>(kind: CurveKind, rng: &mut R) -> Self {
        let start_x = rng.random_range(-0.5..=0.5);
        let end_x = rng.random_range(-0.5..=0.5);
        let x1 = rng.random_range(-0.5..=0.5);
        let x2 = rng.random_range(-0.5..=0.5);

        let points = match kind {
            CurveKind::Hermite => {
                // Tangents lean downward so the walk keeps heading to the bottom
                let y1 = rng.random_range(-2.0..=-1.0);
                let y2 = rng.random_range(-2.0..=-1.0);
                [
                    Vec3::new(start_x, 1.0, 0.0),
                    Vec3::new(end_x, -1.0, 0.0),
                    Vec3::new(x1, y1, 0.0),
                    Vec3::new(x2, y2, 0.0),
                ]
            }
            CurveKind::Bezier => {
                let y1 = rng.random_range(-1.0..=1.0);
                let y2 = rng.random_range(-1.0..=1.0);
                [
                    Vec3::new(start_x, 1.0, 0.0),
                    Vec3::new(x1, y1, 0.0),
                    Vec3::new(x2, y2, 0.0),
                    Vec3::new(end_x, -1.0, 0.0),
                ]
            }
        };

        Self { kind, points }
    }

    /// Combined `G * M` matrix
    fn curve_matrix(&self) -> Mat4 {
        let [a, b, c, d] = self.points;
        let geometry = Mat4::from_cols(a.extend(0.0), b.extend(0.0), c.extend(0.0), d.extend(0.0));
        geometry * self.kind.basis()
    }

    /// Evaluate the curve at a single parameter value
    pub fn evaluate(&self, t: f32) -> Vec3 {
        let m = self.curve_matrix();
        (m * Vec4::new(1.0, t, t * t, t * t * t)).truncate()
    }

    /// Evaluate at `num_points` parameters evenly spaced over [0, 1]
    pub fn sample_points(&self, num_points: usize) -> Path {
        let m = self.curve_matrix();
        let points = linspace(num_points)
            .map(|t| (m * Vec4::new(1.0, t, t * t, t * t * t)).truncate())
            .collect();
        Path { points }
    }
}

/// `num_points` values from 0 to 1 inclusive (a single sample is t = 0)
fn linspace(num_points: usize) -> impl Iterator<Item = f32> {
    let step = if num_points > 1 {
        1.0 / (num_points - 1) as f32
    } else {
        0.0
    };
    (0..num_points).map(move |i| i as f32 * step)
}

/// Immutable sampled trajectory (z is always 0)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Path {
    points: Vec<Vec3>,
}

impl Path {
    pub fn from_points(points: Vec<Vec3>) -> Self {
        Self { points }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<Vec3> {
        self.points.get(index).copied()
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }
}

/// Sample fresh control points of `kind` and evaluate them
pub fn generate_curve<R: Rng + ?Sized>(kind: CurveKind, num_points: usize, rng: &mut R) -> Path {
    ControlPoints::sample(kind, rng).sample_points(num_points)
}

/// Hermite or Bézier with equal odds
pub fn random_curve<R: Rng + ?Sized>(num_points: usize, rng: &mut R) -> Path {
    let kind = CurveKind::random(rng);
    generate_curve(kind, num_points, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn test_hermite_hits_endpoints_and_tangent() {
        let cp = ControlPoints {
            kind: CurveKind::Hermite,
            points: [
                Vec3::new(-0.2, 1.0, 0.0),
                Vec3::new(0.3, -1.0, 0.0),
                Vec3::new(0.1, -1.5, 0.0),
                Vec3::new(-0.4, -1.2, 0.0),
            ],
        };
        assert!(approx(cp.evaluate(0.0), Vec3::new(-0.2, 1.0, 0.0)));
        assert!(approx(cp.evaluate(1.0), Vec3::new(0.3, -1.0, 0.0)));

        // Finite difference at t=0 approximates T0
        let h = 1e-3;
        let slope = (cp.evaluate(h) - cp.evaluate(0.0)) / h;
        assert!((slope - Vec3::new(0.1, -1.5, 0.0)).length() < 1e-2);
    }

    #[test]
    fn test_bezier_midpoint() {
        let cp = ControlPoints {
            kind: CurveKind::Bezier,
            points: [
                Vec3::new(0.0, 1.0, 0.0),
                Vec3::new(0.0, 0.5, 0.0),
                Vec3::new(0.0, -0.5, 0.0),
                Vec3::new(0.0, -1.0, 0.0),
            ],
        };
        // Evenly spaced collinear control points give the midpoint at t=0.5
        assert!(approx(cp.evaluate(0.5), Vec3::ZERO));
        assert!(approx(cp.evaluate(0.0), Vec3::new(0.0, 1.0, 0.0)));
        assert!(approx(cp.evaluate(1.0), Vec3::new(0.0, -1.0, 0.0)));
    }

    #[test]
    fn test_sample_count_and_z() {
        let mut rng = Pcg32::seed_from_u64(7);
        let path = random_curve(3000, &mut rng);
        assert_eq!(path.len(), 3000);
        assert!(path.points().iter().all(|p| p.z == 0.0));
    }

    #[test]
    fn test_degenerate_sample_counts() {
        let mut rng = Pcg32::seed_from_u64(7);
        assert!(generate_curve(CurveKind::Bezier, 0, &mut rng).is_empty());

        let single = generate_curve(CurveKind::Hermite, 1, &mut rng);
        assert_eq!(single.len(), 1);
        assert_eq!(single.get(0).map(|p| p.y), Some(1.0));
    }

    #[test]
    fn test_same_seed_same_path() {
        let a = random_curve(500, &mut Pcg32::seed_from_u64(42));
        let b = random_curve(500, &mut Pcg32::seed_from_u64(42));
        assert_eq!(a, b);
    }

    proptest! {
        #[test]
        fn prop_paths_run_top_to_bottom(seed in any::<u64>(), n in 2usize..400) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let path = random_curve(n, &mut rng);
            let first = path.get(0).unwrap();
            let last = path.get(n - 1).unwrap();
            prop_assert!((first.y - 1.0).abs() < 1e-5);
            prop_assert!((last.y + 1.0).abs() < 1e-5);
            prop_assert!(first.x.abs() <= 0.5 + 1e-5);
            prop_assert!(last.x.abs() <= 0.5 + 1e-5);
        }

        #[test]
        fn prop_control_points_in_range(seed in any::<u64>()) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let h = ControlPoints::sample(CurveKind::Hermite, &mut rng);
            for t in &h.points[2..] {
                prop_assert!(t.x >= -0.5 && t.x <= 0.5);
                prop_assert!(t.y >= -2.0 && t.y <= -1.0);
            }
            let b = ControlPoints::sample(CurveKind::Bezier, &mut rng);
            for p in &b.points[1..3] {
                prop_assert!(p.x >= -0.5 && p.x <= 0.5);
                prop_assert!(p.y >= -1.0 && p.y <= 1.0);
            }
        }
    }
}
