use glam::Vec3;

/// Minimum number of control points that can form a closed loop.
pub const MIN_CONTROL_POINTS: usize = 2;

/// Resolution of the cumulative arc-length table built at construction.
const ARC_LENGTH_DIVISIONS: usize = 512;

/// Error types for path construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveError {
    TooFewPoints { got: usize },
    NonFinitePoint { index: usize },
}

impl std::fmt::Display for CurveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CurveError::TooFewPoints { got } => write!(
                f,
                "curve needs at least {} control points, got {}",
                MIN_CONTROL_POINTS, got
            ),
            CurveError::NonFinitePoint { index } => {
                write!(f, "control point {} has a non-finite coordinate", index)
            }
        }
    }
}

impl std::error::Error for CurveError {}

/// Closed Catmull-Rom curve with arc-length parameterization.
///
/// Positions along the path are addressed by a normalized parameter that
/// wraps modulo 1, where equal parameter increments correspond to roughly
/// equal travel distance regardless of how the control points are spaced.
/// Immutable once constructed.
#[derive(Debug)]
pub struct CurvePath {
    points: Vec<Vec3>,
    /// Cumulative chord length at each table sample; `lengths[0] == 0`.
    lengths: Vec<f32>,
    total_length: f32,
}

impl CurvePath {
    /// Builds the closed path and its arc-length table.
    ///
    /// Fails fast on malformed input; sampling afterwards cannot fail.
    pub fn new(points: Vec<Vec3>) -> Result<Self, CurveError> {
        if points.len() < MIN_CONTROL_POINTS {
            return Err(CurveError::TooFewPoints { got: points.len() });
        }
        for (index, point) in points.iter().enumerate() {
            if !point.is_finite() {
                return Err(CurveError::NonFinitePoint { index });
            }
        }

        let mut lengths = Vec::with_capacity(ARC_LENGTH_DIVISIONS + 1);
        lengths.push(0.0);
        let mut total_length = 0.0;
        let mut prev = catmull_rom_closed(&points, 0.0);
        for i in 1..=ARC_LENGTH_DIVISIONS {
            let t = i as f32 / ARC_LENGTH_DIVISIONS as f32;
            let point = catmull_rom_closed(&points, t);
            total_length += prev.distance(point);
            lengths.push(total_length);
            prev = point;
        }

        Ok(Self {
            points,
            lengths,
            total_length,
        })
    }

    /// Point on the curve at normalized position `p`, wrapped modulo 1.
    ///
    /// Any real input is valid; `p` and `p + 1.0` address the same point,
    /// so the curve is continuous across the 1 -> 0 seam.
    pub fn point_at(&self, p: f32) -> Vec3 {
        catmull_rom_closed(&self.points, self.to_raw_t(p))
    }

    /// Normalized direction of travel at `p`.
    pub fn tangent_at(&self, p: f32) -> Vec3 {
        catmull_rom_closed_derivative(&self.points, self.to_raw_t(p)).normalize_or_zero()
    }

    /// Approximate length of one full loop, in world units.
    pub fn total_length(&self) -> f32 {
        self.total_length
    }

    pub fn control_point_count(&self) -> usize {
        self.points.len()
    }

    /// Maps an arc-length fraction to the raw curve parameter via the table.
    fn to_raw_t(&self, p: f32) -> f32 {
        let target = p.rem_euclid(1.0) * self.total_length;
        let i = self.lengths.partition_point(|&len| len < target);
        if i == 0 {
            return 0.0;
        }
        let i = i.min(ARC_LENGTH_DIVISIONS);
        let below = self.lengths[i - 1];
        let above = self.lengths[i];
        let span = above - below;
        let frac = if span > 0.0 {
            (target - below) / span
        } else {
            0.0
        };
        ((i - 1) as f32 + frac) / ARC_LENGTH_DIVISIONS as f32
    }
}

/// Catmull-Rom evaluation over the whole closed loop, `t` in [0, 1).
///
/// Segment `i` runs from `points[i]` to `points[i+1]` with its outer
/// neighbors as tangent supports; all indices wrap modulo the point count.
fn catmull_rom_closed(points: &[Vec3], t: f32) -> Vec3 {
    let n = points.len();
    let s = t.rem_euclid(1.0) * n as f32;
    let segment = (s.floor() as usize).min(n - 1);
    let local = s - segment as f32;

    let p0 = points[(segment + n - 1) % n];
    let p1 = points[segment];
    let p2 = points[(segment + 1) % n];
    let p3 = points[(segment + 2) % n];

    let t2 = local * local;
    let t3 = t2 * local;
    0.5 * ((2.0 * p1)
        + (-p0 + p2) * local
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
        + (-p0 + 3.0 * p1 - 3.0 * p2 + p3) * t3)
}

/// Derivative of [`catmull_rom_closed`] with respect to the local segment
/// parameter. Only the direction is meaningful to callers.
fn catmull_rom_closed_derivative(points: &[Vec3], t: f32) -> Vec3 {
    let n = points.len();
    let s = t.rem_euclid(1.0) * n as f32;
    let segment = (s.floor() as usize).min(n - 1);
    let local = s - segment as f32;

    let p0 = points[(segment + n - 1) % n];
    let p1 = points[segment];
    let p2 = points[(segment + 1) % n];
    let p3 = points[(segment + 2) % n];

    0.5 * ((-p0 + p2)
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * (2.0 * local)
        + (-p0 + 3.0 * p1 - 3.0 * p2 + p3) * (3.0 * local * local))
}

/// Control points of the bundled tunnel loop: a wavy ring, roughly 12 units
/// across, that climbs and dips so the flight path keeps turning.
pub fn tunnel_control_points() -> Vec<Vec3> {
    vec![
        Vec3::new(10.0, -1.4, 10.4),
        Vec3::new(9.1, -1.4, 8.6),
        Vec3::new(6.8, -1.0, 7.9),
        Vec3::new(4.4, -0.3, 7.4),
        Vec3::new(2.2, 0.2, 8.6),
        Vec3::new(0.0, 0.9, 9.6),
        Vec3::new(-2.3, 1.2, 8.8),
        Vec3::new(-4.6, 1.0, 7.6),
        Vec3::new(-7.1, 0.6, 6.4),
        Vec3::new(-9.0, 0.0, 4.4),
        Vec3::new(-10.2, -0.6, 1.9),
        Vec3::new(-10.4, -1.2, -0.9),
        Vec3::new(-9.5, -1.6, -3.5),
        Vec3::new(-7.8, -1.8, -5.8),
        Vec3::new(-5.5, -1.6, -7.6),
        Vec3::new(-2.9, -1.1, -8.8),
        Vec3::new(-0.1, -0.5, -9.2),
        Vec3::new(2.7, 0.1, -8.8),
        Vec3::new(5.3, 0.7, -7.7),
        Vec3::new(7.5, 1.1, -5.9),
        Vec3::new(9.2, 1.2, -3.6),
        Vec3::new(10.2, 0.9, -1.0),
        Vec3::new(10.5, 0.3, 1.7),
        Vec3::new(10.6, -0.5, 4.4),
        Vec3::new(10.5, -1.1, 7.1),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_loop() -> Vec<Vec3> {
        vec![
            Vec3::new(-1.0, 0.0, -1.0),
            Vec3::new(1.0, 0.0, -1.0),
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(-1.0, 0.0, 1.0),
        ]
    }

    #[test]
    fn rejects_empty_input() {
        let err = CurvePath::new(vec![]).unwrap_err();
        assert_eq!(err, CurveError::TooFewPoints { got: 0 });
    }

    #[test]
    fn rejects_single_point() {
        let err = CurvePath::new(vec![Vec3::ZERO]).unwrap_err();
        assert_eq!(err, CurveError::TooFewPoints { got: 1 });
    }

    #[test]
    fn rejects_non_finite_point() {
        let points = vec![Vec3::ZERO, Vec3::new(1.0, f32::NAN, 0.0)];
        let err = CurvePath::new(points).unwrap_err();
        assert_eq!(err, CurveError::NonFinitePoint { index: 1 });
    }

    #[test]
    fn passes_through_neighborhood_of_control_points() {
        let path = CurvePath::new(square_loop()).unwrap();
        // t=0 of the raw curve is exactly the first control point.
        let start = path.point_at(0.0);
        assert!(start.distance(Vec3::new(-1.0, 0.0, -1.0)) < 1e-5);
    }

    #[test]
    fn wraps_modulo_one() {
        let path = CurvePath::new(square_loop()).unwrap();
        for &p in &[0.0, 0.125, 0.25, 0.3, 0.77, 0.999] {
            let here = path.point_at(p);
            assert!(here.distance(path.point_at(p + 1.0)) < 1e-5, "p = {}", p);
            assert!(here.distance(path.point_at(p - 1.0)) < 1e-5, "p = {}", p);
            assert!(here.distance(path.point_at(p + 3.0)) < 1e-5, "p = {}", p);
        }
    }

    #[test]
    fn dyadic_positions_wrap_exactly() {
        // p + 1.0 is exactly representable for these, so the wrap is bit-exact.
        let path = CurvePath::new(square_loop()).unwrap();
        for &p in &[0.0, 0.25, 0.5, 0.75] {
            assert_eq!(path.point_at(p), path.point_at(p + 1.0));
        }
    }

    #[test]
    fn negative_positions_are_valid() {
        let path = CurvePath::new(square_loop()).unwrap();
        let a = path.point_at(-0.25);
        let b = path.point_at(0.75);
        assert!(a.distance(b) < 1e-5);
    }

    #[test]
    fn arc_length_steps_travel_equal_distances() {
        // Deliberately lopsided control spacing: raw parameterization would
        // move much faster through the long edge than the short ones.
        let points = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(20.0, 0.0, 0.0),
            Vec3::new(21.0, 0.0, 1.0),
            Vec3::new(20.0, 0.0, 2.0),
            Vec3::new(0.0, 0.0, 2.0),
            Vec3::new(-1.0, 0.0, 1.0),
        ];
        let path = CurvePath::new(points).unwrap();

        let steps = 200;
        let mut min_step = f32::MAX;
        let mut max_step: f32 = 0.0;
        let mut prev = path.point_at(0.0);
        for i in 1..=steps {
            let point = path.point_at(i as f32 / steps as f32);
            let d = prev.distance(point);
            min_step = min_step.min(d);
            max_step = max_step.max(d);
            prev = point;
        }
        assert!(
            max_step / min_step < 1.3,
            "steps uneven: min {} max {}",
            min_step,
            max_step
        );
    }

    #[test]
    fn seam_is_continuous() {
        let path = CurvePath::new(square_loop()).unwrap();
        let before = path.point_at(0.9999);
        let after = path.point_at(0.0001);
        assert!(before.distance(after) < 0.05);
    }

    #[test]
    fn total_length_is_plausible() {
        // A unit square loop's spline is a rounded square: longer than the
        // inscribed circle, shorter than a generous outer bound.
        let path = CurvePath::new(square_loop()).unwrap();
        assert!(path.total_length() > 6.0);
        assert!(path.total_length() < 12.0);
    }

    #[test]
    fn tangent_is_unit_length_and_follows_travel() {
        let path = CurvePath::new(square_loop()).unwrap();
        for &p in &[0.1, 0.4, 0.6, 0.9] {
            let tangent = path.tangent_at(p);
            assert!((tangent.length() - 1.0).abs() < 1e-4);
            let chord = (path.point_at(p + 0.002) - path.point_at(p - 0.002)).normalize();
            assert!(tangent.dot(chord) > 0.99, "p = {}", p);
        }
    }

    #[test]
    fn two_point_loop_is_degenerate_but_valid() {
        let path = CurvePath::new(vec![Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0)]).unwrap();
        let point = path.point_at(0.3);
        assert!(point.is_finite());
    }

    #[test]
    fn bundled_loop_is_valid() {
        let path = CurvePath::new(tunnel_control_points()).unwrap();
        assert_eq!(path.control_point_count(), 25);
        assert!(path.total_length() > 30.0);
    }
}
