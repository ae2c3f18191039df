//! Ring offset engine
//!
//! Every electrode piece gets a "ring" counterpart a fixed perpendicular
//! distance away, tracing the grounded structural ring the solver meshes
//! next to the electrode. The offset is perpendicular rather than radial so
//! the mesh spacing beside the boundary stays uniform under curvature.

use nalgebra::Vector2;

use crate::error::LensError;
use crate::geometry::Point;

/// Corners whose half-angle magnitude reaches this bound have a miter length
/// the mesh generator cannot use (it grows as tan of the half-angle); the
/// draw call fails instead of emitting it.
pub const MITER_HALF_ANGLE_LIMIT_DEG: f64 = 89.0;

/// Offset a line segment by `spacing` along its left-of-travel normal.
///
/// The normal is computed from the segment delta itself, so axis-aligned
/// segments offset exactly.
pub fn offset_line(start: Point, end: Point, spacing: f64) -> (Point, Point) {
    let delta = end.to_vector() - start.to_vector();
    let normal = Vector2::new(-delta.y, delta.x) / delta.norm();
    (
        start.translate(normal * spacing),
        end.translate(normal * spacing),
    )
}

/// Ring radius for an arc drawn with the given rotation sense: the ring sits
/// `spacing` outside a clockwise arc and `spacing` inside a counter-clockwise
/// one, which is the same perpendicular side in both cases.
pub fn ring_radius(radius: f64, spacing: f64, clockwise: bool) -> f64 {
    if clockwise {
        radius + spacing
    } else {
        radius - spacing
    }
}

/// Miter length for the joint between two consecutive ring lines.
///
/// `l = spacing * tan((prev - curr) / 2)`: the previous ring end moves `+l`
/// along the outgoing direction and the current ring start `-l` along the
/// incoming one, meeting on the angle bisector at perpendicular distance
/// `spacing` from both electrode lines. The half-angle is wrapped into
/// (-90, 90] (tan is 180-degree periodic, so the wrap is exact); at
/// [`MITER_HALF_ANGLE_LIMIT_DEG`] the joint is rejected.
pub fn miter_length(
    prev_direction_deg: f64,
    curr_direction_deg: f64,
    spacing: f64,
) -> Result<f64, LensError> {
    let half_angle = wrap_half_angle((prev_direction_deg - curr_direction_deg) / 2.0);
    if half_angle.abs() >= MITER_HALF_ANGLE_LIMIT_DEG {
        return Err(LensError::InvalidGeometry(format!(
            "corner from {prev_direction_deg} deg to {curr_direction_deg} deg is too sharp \
             (half-angle {half_angle} deg, limit {MITER_HALF_ANGLE_LIMIT_DEG} deg)"
        )));
    }
    Ok(round15(spacing * half_angle.to_radians().tan()))
}

/// Wrap an angle into (-90, 90].
fn wrap_half_angle(angle_deg: f64) -> f64 {
    let mut wrapped = angle_deg % 180.0;
    if wrapped > 90.0 {
        wrapped -= 180.0;
    } else if wrapped <= -90.0 {
        wrapped += 180.0;
    }
    wrapped
}

/// Snap to 15 decimal places, so a 45-degree miter of unit spacing comes out
/// exactly 1 despite `tan(pi/4)` falling one ulp short.
fn round15(value: f64) -> f64 {
    (value * 1e15).round() / 1e15
}
