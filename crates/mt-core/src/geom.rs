use core::ops::{Add, Mul, Neg, Sub};

/// A position in pixel-center coordinates: `(x, y)` is the center of pixel
/// column `x`, row `y`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point2f {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2f {
    pub x: f32,
    pub y: f32,
}

impl Point2f {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Self) -> f32 {
        (self - other).norm()
    }

    pub fn lerp(self, other: Self, t: f32) -> Self {
        self + (other - self) * t
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Vec2f {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn dot(self, rhs: Self) -> f32 {
        self.x * rhs.x + self.y * rhs.y
    }

    /// z-component of the 3D cross product.
    pub fn cross(self, rhs: Self) -> f32 {
        self.x * rhs.y - self.y * rhs.x
    }

    pub fn norm(self) -> f32 {
        self.dot(self).sqrt()
    }

    pub fn normalize(self) -> Self {
        let n = self.norm();
        if n == 0.0 {
            Self::default()
        } else {
            self * (1.0 / n)
        }
    }

    /// Rotates by +90 degrees: `(x, y) -> (-y, x)`.
    pub fn perp(self) -> Self {
        Self {
            x: -self.y,
            y: self.x,
        }
    }

    pub fn angle(self) -> f32 {
        self.y.atan2(self.x)
    }
}

impl Add<Vec2f> for Point2f {
    type Output = Point2f;

    fn add(self, rhs: Vec2f) -> Self::Output {
        Point2f {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl Sub<Vec2f> for Point2f {
    type Output = Point2f;

    fn sub(self, rhs: Vec2f) -> Self::Output {
        Point2f {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl Sub<Point2f> for Point2f {
    type Output = Vec2f;

    fn sub(self, rhs: Point2f) -> Self::Output {
        Vec2f {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl Add for Vec2f {
    type Output = Vec2f;

    fn add(self, rhs: Vec2f) -> Self::Output {
        Vec2f {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl Sub for Vec2f {
    type Output = Vec2f;

    fn sub(self, rhs: Vec2f) -> Self::Output {
        Vec2f {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl Mul<f32> for Vec2f {
    type Output = Vec2f;

    fn mul(self, rhs: f32) -> Self::Output {
        Vec2f {
            x: self.x * rhs,
            y: self.y * rhs,
        }
    }
}

impl Mul<Vec2f> for f32 {
    type Output = Vec2f;

    fn mul(self, rhs: Vec2f) -> Self::Output {
        rhs * self
    }
}

impl Neg for Vec2f {
    type Output = Vec2f;

    fn neg(self) -> Self::Output {
        Vec2f {
            x: -self.x,
            y: -self.y,
        }
    }
}

/// Projects `p` onto segment `ab`.
///
/// Returns the clamped segment parameter `t` in `[0, 1]` and the distance from
/// `p` to the projected point.
pub fn project_on_segment(p: Point2f, a: Point2f, b: Point2f) -> (f32, f32) {
    let ab = b - a;
    let len2 = ab.dot(ab);
    let t = if len2 <= f32::EPSILON {
        0.0
    } else {
        ((p - a).dot(ab) / len2).clamp(0.0, 1.0)
    };
    (t, p.distance(a + ab * t))
}

/// Proper crossing of segments `ab` and `cd`; touching endpoints and
/// collinear overlaps do not count.
pub fn segment_intersection(a: Point2f, b: Point2f, c: Point2f, d: Point2f) -> Option<Point2f> {
    let r = b - a;
    let s = d - c;
    let denom = r.cross(s);
    if denom.abs() <= f32::EPSILON {
        return None;
    }

    let t = (c - a).cross(s) / denom;
    let u = (c - a).cross(r) / denom;
    if t > 0.0 && t < 1.0 && u > 0.0 && u < 1.0 {
        Some(a + r * t)
    } else {
        None
    }
}

/// A sequence of points. Closed-polygon helpers treat the last point as
/// connected back to the first.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polyline2f {
    pub points: Vec<Point2f>,
}

impl Polyline2f {
    pub fn new(points: Vec<Point2f>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn open_length(&self) -> f32 {
        self.points.windows(2).map(|w| w[0].distance(w[1])).sum()
    }

    pub fn closed_length(&self) -> f32 {
        match (self.points.first(), self.points.last()) {
            (Some(&first), Some(&last)) if self.points.len() > 1 => {
                self.open_length() + last.distance(first)
            }
            _ => 0.0,
        }
    }

    /// Shoelace area. Positive when the loop turns from +x towards +y.
    pub fn signed_area(&self) -> f32 {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }

        let mut acc = 0.0_f64;
        for i in 0..n {
            let p = self.points[i];
            let q = self.points[(i + 1) % n];
            acc += p.x as f64 * q.y as f64 - q.x as f64 * p.y as f64;
        }
        (acc * 0.5) as f32
    }

    /// First proper crossing between two non-adjacent edges of the closed
    /// polygon, as `(i, j, point)` with edge `i` running `points[i] -> points[i + 1]`
    /// and `i < j`.
    pub fn first_self_intersection(&self) -> Option<(usize, usize, Point2f)> {
        let n = self.points.len();
        if n < 4 {
            return None;
        }

        for i in 0..n {
            let a = self.points[i];
            let b = self.points[(i + 1) % n];
            for j in (i + 2)..n {
                if i == 0 && j == n - 1 {
                    continue;
                }
                let c = self.points[j];
                let d = self.points[(j + 1) % n];
                if let Some(x) = segment_intersection(a, b, c, d) {
                    return Some((i, j, x));
                }
            }
        }

        None
    }

    /// Distance from `p` to the closed polygon outline.
    pub fn closed_distance(&self, p: Point2f) -> f32 {
        let n = self.points.len();
        match n {
            0 => f32::INFINITY,
            1 => p.distance(self.points[0]),
            _ => (0..n)
                .map(|i| project_on_segment(p, self.points[i], self.points[(i + 1) % n]).1)
                .fold(f32::INFINITY, f32::min),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Point2f, Polyline2f, Vec2f, project_on_segment, segment_intersection};

    #[test]
    fn vec_ops_and_normalize() {
        let a = Vec2f::new(3.0, 4.0);
        let b = Vec2f::new(1.0, -2.0);

        assert_eq!(a + b, Vec2f::new(4.0, 2.0));
        assert_eq!(a - b, Vec2f::new(2.0, 6.0));
        assert!((a.dot(b) + 5.0).abs() < 1e-6);
        assert!((a.cross(b) + 10.0).abs() < 1e-6);
        assert!((a.normalize().norm() - 1.0).abs() < 1e-6);
        assert_eq!(Vec2f::default().normalize(), Vec2f::default());
        assert_eq!(Vec2f::new(1.0, 0.0).perp(), Vec2f::new(-0.0, 1.0));
    }

    #[test]
    fn segment_projection_clamps() {
        let a = Point2f::new(0.0, 0.0);
        let b = Point2f::new(10.0, 0.0);

        let (t, d) = project_on_segment(Point2f::new(4.0, 3.0), a, b);
        assert!((t - 0.4).abs() < 1e-6);
        assert!((d - 3.0).abs() < 1e-6);

        let (t, d) = project_on_segment(Point2f::new(-3.0, 4.0), a, b);
        assert_eq!(t, 0.0);
        assert!((d - 5.0).abs() < 1e-6);
    }

    #[test]
    fn crossing_excludes_shared_endpoints() {
        let x = segment_intersection(
            Point2f::new(0.0, 0.0),
            Point2f::new(2.0, 2.0),
            Point2f::new(0.0, 2.0),
            Point2f::new(2.0, 0.0),
        )
        .expect("diagonals cross");
        assert!((x.x - 1.0).abs() < 1e-6 && (x.y - 1.0).abs() < 1e-6);

        let touching = segment_intersection(
            Point2f::new(0.0, 0.0),
            Point2f::new(1.0, 0.0),
            Point2f::new(1.0, 0.0),
            Point2f::new(1.0, 1.0),
        );
        assert!(touching.is_none());
    }

    #[test]
    fn square_area_length_and_bowtie() {
        let square = Polyline2f::new(vec![
            Point2f::new(0.0, 0.0),
            Point2f::new(4.0, 0.0),
            Point2f::new(4.0, 4.0),
            Point2f::new(0.0, 4.0),
        ]);
        assert!((square.signed_area() - 16.0).abs() < 1e-4);
        assert!((square.closed_length() - 16.0).abs() < 1e-4);
        assert!(square.first_self_intersection().is_none());
        assert!((square.closed_distance(Point2f::new(2.0, 1.0)) - 1.0).abs() < 1e-6);

        let bowtie = Polyline2f::new(vec![
            Point2f::new(0.0, 0.0),
            Point2f::new(4.0, 4.0),
            Point2f::new(4.0, 0.0),
            Point2f::new(0.0, 4.0),
        ]);
        let (i, j, x) = bowtie.first_self_intersection().expect("bowtie crosses");
        assert_eq!((i, j), (0, 2));
        assert!((x.x - 2.0).abs() < 1e-5 && (x.y - 2.0).abs() < 1e-5);
    }
}
