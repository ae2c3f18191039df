//! Lens document builder
//!
//! A [`LensDocument`] is grown by a sequence of drawing calls: `start` places
//! the cursor at the beginning of an electrode, then `line`/`arc` calls trace
//! its boundary. Every drawing call appends exactly one electrode piece and
//! its offset ring counterpart, in lockstep, so the two boundary descriptions
//! can never fall out of step structurally.

use nalgebra::Vector2;
use tracing::{debug, warn};

use crate::error::LensError;
use crate::geometry::{round8, unit_vector, Piece, Point};
use crate::offset;
use crate::LensConfig;

/// What the previous drawing call appended. Corner correction only applies
/// between two consecutive lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PrevPiece {
    None,
    Line,
    Arc,
}

/// Transient drawing state: where the pen is, which way it last travelled,
/// and which voltage group new pieces belong to.
#[derive(Debug, Clone, Copy)]
struct Cursor {
    position: Point,
    direction: Option<f64>,
    voltage_group: i32,
    prev: PrevPiece,
}

/// A lens geometry document: two lockstep piece sequences (electrode and
/// ring) plus the drawing cursor and diagnostic tallies.
#[derive(Debug, Clone)]
pub struct LensDocument {
    point_spacing: f64,
    ring_spacing: f64,
    z_offset: f64,
    cursor: Cursor,
    electrode: Vec<Piece>,
    ring: Vec<Piece>,
    tallies: Vec<(String, usize)>,
}

impl LensDocument {
    pub fn new(config: LensConfig) -> Self {
        Self {
            point_spacing: config.point_spacing,
            ring_spacing: config.effective_ring_spacing(),
            z_offset: config.z_offset,
            cursor: Cursor {
                position: Point::new(0.0, 0.0),
                direction: None,
                // the first `start` without an explicit group lands on 0
                voltage_group: -1,
                prev: PrevPiece::None,
            },
            electrode: Vec::new(),
            ring: Vec::new(),
            tallies: Vec::new(),
        }
    }

    /// Begin a new electrode at `(z, r)`.
    ///
    /// Sets the active voltage group (auto-incrementing from the previous one
    /// when `None`) and clears the stored travel direction. No piece is
    /// created.
    pub fn start(&mut self, z: f64, r: f64, voltage_group: Option<i32>) -> &mut Self {
        self.cursor.voltage_group = voltage_group.unwrap_or(self.cursor.voltage_group + 1);
        self.cursor.position = Point::new(z, r);
        self.cursor.direction = None;
        self.cursor.prev = PrevPiece::None;
        self
    }

    /// Draw a straight segment from the cursor to `(z_end, r_end)`.
    pub fn line(&mut self, z_end: f64, r_end: f64) -> Result<&mut Self, LensError> {
        let start = self.cursor.position;
        let end = Point::new(z_end, r_end);
        if end == start {
            return Err(LensError::InvalidGeometry(format!(
                "line from ({}, {}) has zero length",
                start.z, start.r
            )));
        }

        let length = start.distance_to(end);
        let point_count = (length / self.point_spacing).ceil() as u32;
        let direction = start.direction_to(end);

        // resolve the previous corner before touching the document, so a
        // rejected miter leaves it unmodified
        let corner = match (self.cursor.prev, self.cursor.direction) {
            (PrevPiece::Line, Some(prev_direction)) => Some((
                prev_direction,
                offset::miter_length(prev_direction, direction, self.ring_spacing)?,
            )),
            _ => None,
        };

        let (ring_start, ring_end) = offset::offset_line(start, end, self.ring_spacing);
        let voltage = self.cursor.voltage_group;
        let electrode = Piece::Line {
            start: self.place(start),
            end: self.place(end),
            voltage,
            point_count,
        };
        let ring = Piece::Line {
            start: self.place(ring_start),
            end: self.place(ring_end),
            voltage: 0,
            point_count,
        };
        self.push_pair(electrode, ring);

        if let Some((prev_direction, miter)) = corner {
            self.correct_ring_corner(miter, prev_direction, direction);
        }

        self.cursor.position = end;
        self.cursor.direction = Some(direction);
        self.cursor.prev = PrevPiece::Line;
        Ok(self)
    }

    /// Draw a line parallel to the axis, ending at `z_end`.
    pub fn horizontal(&mut self, z_end: f64) -> Result<&mut Self, LensError> {
        if z_end == self.cursor.position.z {
            return Err(LensError::InvalidGeometry(format!(
                "horizontal to z = {z_end} does not move the cursor"
            )));
        }
        let r = self.cursor.position.r;
        self.line(z_end, r)
    }

    /// Draw a line perpendicular to the axis, ending at `r_end`.
    pub fn vertical(&mut self, r_end: f64) -> Result<&mut Self, LensError> {
        if r_end == self.cursor.position.r {
            return Err(LensError::InvalidGeometry(format!(
                "vertical to r = {r_end} does not move the cursor"
            )));
        }
        let z = self.cursor.position.z;
        self.line(z, r_end)
    }

    /// Draw a circular arc from the stored travel direction to
    /// `end_direction` (degrees), turning whichever way is shorter.
    ///
    /// The rotation sense picks the strictly smaller angular distance; an
    /// exact 180/180 split resolves counter-clockwise (fixed policy). Both
    /// candidate distances live in (0, 360], so coincident directions read as
    /// a full turn and are rejected.
    pub fn arc(&mut self, end_direction: f64, radius: f64) -> Result<&mut Self, LensError> {
        let mut stored = self.cursor.direction.ok_or_else(|| {
            LensError::InvalidGeometry(
                "an arc cannot be the first piece after start; draw a line first to \
                 establish a travel direction"
                    .to_string(),
            )
        })?;
        if radius <= 0.0 {
            return Err(LensError::InvalidGeometry(format!(
                "arc radius must be positive, got {radius}"
            )));
        }

        // the +-180 seam: when either direction sits exactly on it, match its
        // sign to the other so the span is measured on one branch
        let mut end_direction = end_direction;
        if stored.abs() == 180.0 {
            stored = if end_direction < 0.0 { -180.0 } else { 180.0 };
        } else if end_direction.abs() == 180.0 {
            end_direction = if stored < 0.0 { -180.0 } else { 180.0 };
        }

        let cw_span = wrap_span(stored - end_direction);
        let ccw_span = wrap_span(end_direction - stored);
        let clockwise = cw_span < ccw_span;
        let span = cw_span.min(ccw_span);
        if span >= 360.0 {
            return Err(LensError::UnsupportedArc(format!(
                "turning from {stored} deg to {end_direction} deg spans {span} deg"
            )));
        }

        let arc_length = radius * span.to_radians();
        let point_count = (arc_length / self.point_spacing).ceil() as u32;

        let position = self.cursor.position;
        let direction_rad = stored.to_radians();
        let (sin_dir, cos_dir) = direction_rad.sin_cos();
        let (center, start_angle, end_angle) = if clockwise {
            (
                Point::new(
                    position.z + radius * sin_dir,
                    position.r - radius * cos_dir,
                ),
                stored + 90.0,
                end_direction + 90.0,
            )
        } else {
            (
                Point::new(
                    position.z - radius * sin_dir,
                    position.r + radius * cos_dir,
                ),
                stored - 90.0,
                end_direction - 90.0,
            )
        };

        let end_angle_rad = end_angle.to_radians();
        let end_position = Point::new(
            round8(center.z + radius * end_angle_rad.cos()),
            round8(center.r + radius * end_angle_rad.sin()),
        );

        let ring_radius = offset::ring_radius(radius, self.ring_spacing, clockwise);
        if ring_radius <= 0.0 {
            warn!(
                radius,
                ring_radius, "ring arc collapsed through the center; the solver will reject it"
            );
        }

        let voltage = self.cursor.voltage_group;
        let placed_center = self.place(center);
        self.push_pair(
            Piece::Arc {
                start_angle,
                end_angle,
                center: placed_center,
                radius,
                voltage,
                point_count,
                clockwise,
            },
            Piece::Arc {
                start_angle,
                end_angle,
                center: placed_center,
                radius: ring_radius,
                voltage: 0,
                point_count,
                clockwise,
            },
        );

        self.cursor.position = end_position;
        self.cursor.direction = Some(end_direction);
        self.cursor.prev = PrevPiece::Arc;
        Ok(self)
    }

    /// Record how many pieces were appended since the previous tally.
    pub fn count_pieces(&mut self, name: impl Into<String>) -> &mut Self {
        let name = name.into();
        let already_tallied: usize = self.tallies.iter().map(|(_, count)| count).sum();
        let count = self.electrode.len() - already_tallied;
        debug!(group = %name, pieces = count, "tallied electrode group");
        self.tallies.push((name, count));
        self
    }

    /// Check that the electrode and ring point streams align one-to-one.
    /// Returns the shared total point count.
    pub fn validate(&self) -> Result<u64, LensError> {
        let electrode_total: u64 = self.electrode.iter().map(|p| u64::from(p.point_count())).sum();
        let ring_total: u64 = self.ring.iter().map(|p| u64::from(p.point_count())).sum();
        if electrode_total != ring_total {
            return Err(LensError::GeometryInconsistency(format!(
                "electrode pieces discretize to {electrode_total} points but ring pieces \
                 to {ring_total}"
            )));
        }
        Ok(ring_total)
    }

    pub fn electrode_pieces(&self) -> &[Piece] {
        &self.electrode
    }

    pub fn ring_pieces(&self) -> &[Piece] {
        &self.ring
    }

    pub fn piece_count(&self) -> usize {
        self.electrode.len()
    }

    pub fn tallies(&self) -> &[(String, usize)] {
        &self.tallies
    }

    /// Current cursor position, in local (un-shifted) coordinates.
    pub fn position(&self) -> (f64, f64) {
        (self.cursor.position.z, self.cursor.position.r)
    }

    /// Travel direction of the last piece, if any, in degrees.
    pub fn direction(&self) -> Option<f64> {
        self.cursor.direction
    }

    pub fn active_voltage_group(&self) -> i32 {
        self.cursor.voltage_group
    }

    /// Apply the document's axial shift to a point about to be stored.
    fn place(&self, point: Point) -> Point {
        Point::new(point.z + self.z_offset, point.r)
    }

    pub(crate) fn push_pair(&mut self, electrode: Piece, ring: Piece) {
        self.electrode.push(electrode);
        self.ring.push(ring);
    }

    #[cfg(test)]
    pub(crate) fn force_ring_point_count(&mut self, index: usize, point_count: u32) {
        if let Some(
            Piece::Line {
                point_count: count, ..
            }
            | Piece::Arc {
                point_count: count, ..
            },
        ) = self.ring.get_mut(index)
        {
            *count = point_count;
        }
    }

    pub(crate) fn piece_pair(&self, index: usize) -> Result<(Piece, Piece), LensError> {
        match (self.electrode.get(index), self.ring.get(index)) {
            (Some(&electrode), Some(&ring)) => Ok((electrode, ring)),
            _ => Err(LensError::InvalidGeometry(format!(
                "piece index {index} is out of range ({} pieces)",
                self.electrode.len()
            ))),
        }
    }

    /// Miter the joint between the two most recent ring lines: the previous
    /// end moves `+l` along the outgoing direction, the current start `-l`
    /// along the incoming one.
    fn correct_ring_corner(&mut self, miter: f64, prev_direction: f64, curr_direction: f64) {
        let joint = self.ring.len() - 2;
        if let Some(Piece::Line { end, .. }) = self.ring.get_mut(joint) {
            *end = end.translate(shift(prev_direction, miter));
        }
        if let Some(Piece::Line { start, .. }) = self.ring.get_mut(joint + 1) {
            *start = start.translate(shift(curr_direction, -miter));
        }
    }
}

/// Displacement of length `distance` along `direction_deg`.
fn shift(direction_deg: f64, distance: f64) -> Vector2<f64> {
    unit_vector(direction_deg) * distance
}

/// Rotational distance normalized into (0, 360].
fn wrap_span(angle_deg: f64) -> f64 {
    let wrapped = angle_deg.rem_euclid(360.0);
    if wrapped == 0.0 {
        360.0
    } else {
        wrapped
    }
}
