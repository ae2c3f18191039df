//! Geometric primitives for the lens half-plane
//!
//! Coordinates are (z, r) in millimeters: z runs along the optical axis,
//! r is the radial distance from it. Angles are degrees measured from the
//! +z axis, positive toward +r.

use nalgebra::Vector2;

/// A point in the axial/radial half-plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub z: f64,
    pub r: f64,
}

impl Point {
    pub fn new(z: f64, r: f64) -> Self {
        Self { z, r }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(self, other: Point) -> f64 {
        (other.to_vector() - self.to_vector()).norm()
    }

    /// Travel direction toward `other`, in degrees.
    pub fn direction_to(self, other: Point) -> f64 {
        (other.r - self.r).atan2(other.z - self.z).to_degrees()
    }

    pub fn translate(self, offset: Vector2<f64>) -> Self {
        Self {
            z: self.z + offset.x,
            r: self.r + offset.y,
        }
    }

    pub fn to_vector(self) -> Vector2<f64> {
        Vector2::new(self.z, self.r)
    }
}

/// Unit vector pointing along `direction_deg`.
pub fn unit_vector(direction_deg: f64) -> Vector2<f64> {
    let rad = direction_deg.to_radians();
    Vector2::new(rad.cos(), rad.sin())
}

/// Round to 1e-8 mm. Arc end points are snapped to this grid so that chained
/// pieces land on identical coordinates.
pub fn round8(value: f64) -> f64 {
    (value * 1e8).round() / 1e8
}

/// Solver type tags for the two supported primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PieceKind {
    Line,
    Arc,
}

impl PieceKind {
    /// Numeric tag in the solver tables: 1 = line, 2 = arc.
    pub fn tag(self) -> u8 {
        match self {
            PieceKind::Line => 1,
            PieceKind::Arc => 2,
        }
    }
}

/// One piece of an electrode or ring boundary.
///
/// Arc angles are measured from the arc center, in degrees; `clockwise`
/// records the rotation sense the piece was drawn with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Piece {
    Line {
        start: Point,
        end: Point,
        voltage: i32,
        point_count: u32,
    },
    Arc {
        start_angle: f64,
        end_angle: f64,
        center: Point,
        radius: f64,
        voltage: i32,
        point_count: u32,
        clockwise: bool,
    },
}

impl Piece {
    pub fn kind(&self) -> PieceKind {
        match self {
            Piece::Line { .. } => PieceKind::Line,
            Piece::Arc { .. } => PieceKind::Arc,
        }
    }

    pub fn voltage(&self) -> i32 {
        match self {
            Piece::Line { voltage, .. } | Piece::Arc { voltage, .. } => *voltage,
        }
    }

    pub fn point_count(&self) -> u32 {
        match self {
            Piece::Line { point_count, .. } | Piece::Arc { point_count, .. } => *point_count,
        }
    }

    /// The seven value columns of a solver table row.
    ///
    /// Line: `(z_start, r_start, z_end, r_end, 0, 0, 0)`.
    /// Arc: `(start_angle, 0, end_angle, 0, radius, center_z, center_r)`.
    pub fn coef_row(&self) -> [f64; 7] {
        match *self {
            Piece::Line { start, end, .. } => [start.z, start.r, end.z, end.r, 0.0, 0.0, 0.0],
            Piece::Arc {
                start_angle,
                end_angle,
                center,
                radius,
                ..
            } => [start_angle, 0.0, end_angle, 0.0, radius, center.z, center.r],
        }
    }
}

/// Reflect an angle for a mirror about an axial plane: flipping z maps a
/// direction `a` to `180 - a` on the upper branch and `-180 - a` on the lower.
pub fn mirror_angle(angle: f64) -> f64 {
    if angle < 0.0 {
        -180.0 - angle
    } else {
        180.0 - angle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_and_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert!((a.distance_to(b) - 5.0).abs() < 1e-12);
        assert!((a.direction_to(Point::new(0.0, 1.0)) - 90.0).abs() < 1e-12);
        assert!((a.direction_to(Point::new(-1.0, 0.0)) - 180.0).abs() < 1e-12);
    }

    #[test]
    fn test_mirror_angle_branches() {
        assert_eq!(mirror_angle(0.0), 180.0);
        assert_eq!(mirror_angle(90.0), 90.0);
        assert_eq!(mirror_angle(-90.0), -90.0);
        assert_eq!(mirror_angle(180.0), 0.0);
        assert_eq!(mirror_angle(-30.0), -150.0);
    }

    #[test]
    fn test_coef_row_layout() {
        let line = Piece::Line {
            start: Point::new(1.0, 2.0),
            end: Point::new(3.0, 4.0),
            voltage: 2,
            point_count: 5,
        };
        assert_eq!(line.kind().tag(), 1);
        assert_eq!(line.coef_row(), [1.0, 2.0, 3.0, 4.0, 0.0, 0.0, 0.0]);

        let arc = Piece::Arc {
            start_angle: 90.0,
            end_angle: 0.0,
            center: Point::new(5.0, 6.0),
            radius: 2.5,
            voltage: 1,
            point_count: 8,
            clockwise: true,
        };
        assert_eq!(arc.kind().tag(), 2);
        assert_eq!(arc.coef_row(), [90.0, 0.0, 0.0, 0.0, 2.5, 5.0, 6.0]);
    }

    #[test]
    fn test_round8_snaps_to_grid() {
        assert_eq!(round8(1.000000004), 1.0);
        assert_eq!(round8(1.000000006), 1.00000001);
    }
}
