//! Piecewise-linear brightness curves.
//!
//! A curve lives in "editor space": x runs from 0 to the curve width and y
//! runs from 0 (top) to the curve height (bottom), like a canvas. Brightness
//! grows upward, so mapped values are flipped on the way out.

use serde::{Deserialize, Serialize};

/// Default editor-space height used when none is configured.
pub const DEFAULT_CURVE_HEIGHT: f64 = 200.0;

/// Default editor-space width used when none is configured.
pub const DEFAULT_CURVE_WIDTH: f64 = 300.0;

/// A control point in curve-editor space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl std::str::FromStr for Point {
    type Err = CurveError;

    /// Parse an `X,Y` pair.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (x, y) = s
            .split_once(',')
            .ok_or_else(|| CurveError::InvalidPoint(s.to_string()))?;
        let x: f64 = x
            .trim()
            .parse()
            .map_err(|_| CurveError::InvalidPoint(s.to_string()))?;
        let y: f64 = y
            .trim()
            .parse()
            .map_err(|_| CurveError::InvalidPoint(s.to_string()))?;
        if !x.is_finite() || !y.is_finite() {
            return Err(CurveError::InvalidPoint(s.to_string()));
        }
        Ok(Point { x, y })
    }
}

/// Errors raised while editing or parsing a curve.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CurveError {
    #[error("invalid curve point '{0}', expected X,Y")]
    InvalidPoint(String),

    #[error("point x={x} lies outside the curve anchors [{min}, {max}]")]
    OutOfRange { x: f64, min: f64, max: f64 },

    #[error("curve anchors cannot be removed")]
    AnchorRemoval,

    #[error("point index {0} out of bounds")]
    IndexOutOfBounds(usize),

    #[error("curve height must be a positive number, got {0}")]
    InvalidHeight(f64),
}

/// A user-defined tone curve.
///
/// Fewer than two points means "no curve": brightness passes through
/// unchanged. With two or more points the lowest-x and highest-x points are
/// the anchors; intermediate points can be added and removed freely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Curve {
    points: Vec<Point>,
    height: f64,
}

impl Default for Curve {
    fn default() -> Self {
        Self::identity()
    }
}

impl Curve {
    /// A curve with no points, which maps brightness unchanged.
    pub fn identity() -> Self {
        Self {
            points: Vec::new(),
            height: DEFAULT_CURVE_HEIGHT,
        }
    }

    /// The explicit straight-line curve `[(0, height), (width, 0)]`.
    ///
    /// Produces the same mapping as [`Curve::identity`].
    pub fn linear(width: f64, height: f64) -> Self {
        Self {
            points: vec![Point::new(0.0, height), Point::new(width, 0.0)],
            height,
        }
    }

    /// Build a curve from arbitrary points. Points are kept sorted by x.
    ///
    /// `height` must be finite and positive.
    pub fn from_points(points: Vec<Point>, height: f64) -> Result<Self, CurveError> {
        if !height.is_finite() || height <= 0.0 {
            return Err(CurveError::InvalidHeight(height));
        }
        let mut points = points;
        points.sort_by(|a, b| a.x.total_cmp(&b.x));
        Ok(Self { points, height })
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// True when the curve has fewer than two points.
    pub fn is_identity(&self) -> bool {
        self.points.len() < 2
    }

    /// Insert an intermediate point between the anchors.
    pub fn insert_point(&mut self, point: Point) -> Result<usize, CurveError> {
        if let (Some(first), Some(last)) = (self.points.first(), self.points.last()) {
            if self.points.len() >= 2 && (point.x < first.x || point.x > last.x) {
                return Err(CurveError::OutOfRange {
                    x: point.x,
                    min: first.x,
                    max: last.x,
                });
            }
        }
        let index = self.points.partition_point(|p| p.x <= point.x);
        self.points.insert(index, point);
        Ok(index)
    }

    /// Remove an intermediate point. Anchors stay put.
    pub fn remove_point(&mut self, index: usize) -> Result<Point, CurveError> {
        if index >= self.points.len() {
            return Err(CurveError::IndexOutOfBounds(index));
        }
        if index == 0 || index == self.points.len() - 1 {
            return Err(CurveError::AnchorRemoval);
        }
        Ok(self.points.remove(index))
    }

    /// Drop intermediate points, keeping only the straight line between the
    /// anchors' extremes.
    pub fn reset(&mut self) {
        let width = self.points.last().map(|p| p.x).unwrap_or(DEFAULT_CURVE_WIDTH);
        *self = Curve::linear(width, self.height);
    }

    /// Map a raw brightness sample (0-255) to normalized brightness.
    ///
    /// Identity curves return `raw / 255`.
    pub fn apply(&self, raw: f64) -> f64 {
        if self.is_identity() {
            raw / 255.0
        } else {
            map_brightness(raw, &self.points, self.height)
        }
    }
}

/// Map a raw brightness (0-255) through the curve `points`.
///
/// `curve_height` is the editor-space height; the result is
/// `1 - y / curve_height`, so it is normally in 0.0..=1.0. Points need not
/// be sorted. Requires at least two points; callers with fewer should use
/// `raw / 255` directly (see [`Curve::apply`]).
pub fn map_brightness(raw: f64, points: &[Point], curve_height: f64) -> f64 {
    let b = raw / 255.0;
    if points.len() < 2 {
        return b;
    }

    // sort_by is stable, so points sharing an x keep their relative order
    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| a.x.total_cmp(&b.x));

    let x_max = sorted[sorted.len() - 1].x;
    let target = b * x_max;

    let mut p1 = sorted[0];
    let mut p2 = sorted[sorted.len() - 1];
    for pair in sorted.windows(2) {
        if target >= pair[0].x && target <= pair[1].x {
            p1 = pair[0];
            p2 = pair[1];
            break;
        }
    }

    let span = p2.x - p1.x;
    let denominator = if span == 0.0 { 1.0 } else { span };
    let t = (target - p1.x) / denominator;
    let mapped_y = p1.y + t * (p2.y - p1.y);

    1.0 - mapped_y / curve_height
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_linear_curve_is_identity() {
        let curve = Curve::linear(300.0, 200.0);
        for raw in [0.0, 12.0, 64.0, 128.0, 200.0, 255.0] {
            assert!(approx(curve.apply(raw), raw / 255.0), "raw={}", raw);
        }
    }

    #[test]
    fn test_empty_and_single_point_curves_bypass_mapping() {
        let empty = Curve::identity();
        assert_eq!(empty.apply(51.0), 51.0 / 255.0);

        let single = Curve::from_points(vec![Point::new(10.0, 10.0)], 200.0).unwrap();
        assert!(single.is_identity());
        assert_eq!(single.apply(102.0), 102.0 / 255.0);
    }

    #[test]
    fn test_flat_curve_maps_everything_to_same_level() {
        // Horizontal line at half height -> every input maps to 0.5
        let points = vec![Point::new(0.0, 100.0), Point::new(300.0, 100.0)];
        for raw in [0.0, 100.0, 255.0] {
            assert!(approx(map_brightness(raw, &points, 200.0), 0.5));
        }
    }

    #[test]
    fn test_unsorted_points_are_sorted_before_lookup() {
        let points = vec![
            Point::new(300.0, 0.0),
            Point::new(0.0, 200.0),
            Point::new(150.0, 50.0),
        ];
        // Midpoint input hits the middle control point exactly
        let mid = map_brightness(127.5, &points, 200.0);
        assert!(approx(mid, 0.75));
    }

    #[test]
    fn test_vertical_segment_does_not_divide_by_zero() {
        let points = vec![
            Point::new(0.0, 200.0),
            Point::new(150.0, 200.0),
            Point::new(150.0, 0.0),
            Point::new(300.0, 0.0),
        ];
        let value = map_brightness(127.5, &points, 200.0);
        assert!(value.is_finite());
        // First matching pair is (0,200)-(150,200): snaps to y=200
        assert!(approx(value, 0.0));
    }

    #[test]
    fn test_extremes_hit_anchors() {
        let points = vec![Point::new(0.0, 180.0), Point::new(300.0, 20.0)];
        assert!(approx(map_brightness(0.0, &points, 200.0), 0.1));
        assert!(approx(map_brightness(255.0, &points, 200.0), 0.9));
    }

    #[test]
    fn test_insert_point_keeps_order() {
        let mut curve = Curve::linear(300.0, 200.0);
        let idx = curve.insert_point(Point::new(100.0, 150.0)).unwrap();
        assert_eq!(idx, 1);
        let idx = curve.insert_point(Point::new(50.0, 190.0)).unwrap();
        assert_eq!(idx, 1);
        let xs: Vec<f64> = curve.points().iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.0, 50.0, 100.0, 300.0]);
    }

    #[test]
    fn test_insert_point_outside_anchors_rejected() {
        let mut curve = Curve::linear(300.0, 200.0);
        let err = curve.insert_point(Point::new(301.0, 0.0)).unwrap_err();
        assert!(matches!(err, CurveError::OutOfRange { .. }));
    }

    #[test]
    fn test_anchors_cannot_be_removed() {
        let mut curve = Curve::linear(300.0, 200.0);
        curve.insert_point(Point::new(100.0, 100.0)).unwrap();
        assert_eq!(curve.remove_point(0), Err(CurveError::AnchorRemoval));
        assert_eq!(curve.remove_point(2), Err(CurveError::AnchorRemoval));
        assert_eq!(curve.remove_point(1), Ok(Point::new(100.0, 100.0)));
        assert_eq!(curve.remove_point(5), Err(CurveError::IndexOutOfBounds(5)));
    }

    #[test]
    fn test_reset_restores_linear() {
        let mut curve = Curve::linear(300.0, 200.0);
        curve.insert_point(Point::new(100.0, 20.0)).unwrap();
        curve.reset();
        assert_eq!(curve, Curve::linear(300.0, 200.0));
    }

    #[test]
    fn test_point_parsing() {
        assert_eq!("10,20".parse::<Point>(), Ok(Point::new(10.0, 20.0)));
        assert_eq!(" 1.5 , 2 ".parse::<Point>(), Ok(Point::new(1.5, 2.0)));
        assert!("10".parse::<Point>().is_err());
        assert!("a,b".parse::<Point>().is_err());
        assert!("NaN,1".parse::<Point>().is_err());
    }

    #[test]
    fn test_non_positive_height_rejected() {
        let points = vec![Point::new(0.0, 0.0), Point::new(300.0, 0.0)];
        for height in [0.0, -1.0, f64::INFINITY] {
            assert!(matches!(
                Curve::from_points(points.clone(), height),
                Err(CurveError::InvalidHeight(_))
            ));
        }
    }
}
