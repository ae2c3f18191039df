//! Mirror transform
//!
//! Einzel-lens half-cells are built by drawing one half and reflecting it
//! about an axial plane. Mirrored pairs are appended to the document, never
//! replacing the originals, so the full provenance of drawing calls stays
//! intact. Voltage is negated by default, matching the antisymmetric
//! electrode pairing of a half-cell.

use crate::builder::LensDocument;
use crate::error::LensError;
use crate::geometry::{mirror_angle, Piece, Point};

impl LensDocument {
    /// Reflect the selected electrode+ring pairs about the plane
    /// `z = mirror_z` and append the results.
    ///
    /// Electrode voltages are negated unless `voltage_group` supplies a
    /// replacement; ring pieces stay grounded.
    pub fn mirror(
        &mut self,
        piece_indices: &[usize],
        mirror_z: f64,
        voltage_group: Option<i32>,
    ) -> Result<&mut Self, LensError> {
        for &index in piece_indices {
            let (electrode, ring) = self.piece_pair(index)?;
            let voltage = voltage_group.unwrap_or(-electrode.voltage());
            self.push_pair(
                mirror_piece(electrode, mirror_z, voltage),
                mirror_piece(ring, mirror_z, 0),
            );
        }
        Ok(self)
    }

    /// Mirror every piece tagged with the cursor's active voltage group,
    /// with the default voltage negation.
    pub fn mirror_voltage_group(&mut self, mirror_z: f64) -> Result<&mut Self, LensError> {
        let group = self.active_voltage_group();
        let indices: Vec<usize> = self
            .electrode_pieces()
            .iter()
            .enumerate()
            .filter(|(_, piece)| piece.voltage() == group)
            .map(|(index, _)| index)
            .collect();
        self.mirror(&indices, mirror_z, None)
    }
}

fn mirror_piece(piece: Piece, mirror_z: f64, voltage: i32) -> Piece {
    match piece {
        Piece::Line {
            start,
            end,
            point_count,
            ..
        } => Piece::Line {
            start: Point::new(mirror_coord(start.z, mirror_z), start.r),
            end: Point::new(mirror_coord(end.z, mirror_z), end.r),
            voltage,
            point_count,
        },
        Piece::Arc {
            start_angle,
            end_angle,
            center,
            radius,
            point_count,
            clockwise,
            ..
        } => {
            let (start_angle, end_angle) = mirror_arc_angles(start_angle, end_angle);
            Piece::Arc {
                start_angle,
                end_angle,
                center: Point::new(mirror_coord(center.z, mirror_z), center.r),
                radius,
                voltage,
                point_count,
                clockwise: !clockwise,
            }
        }
    }
}

fn mirror_coord(z: f64, mirror_z: f64) -> f64 {
    2.0 * mirror_z - z
}

/// Reflect both arc angles, then re-snap the +-180 seam when the reflected
/// pair lands on inconsistent branches.
fn mirror_arc_angles(start_angle: f64, end_angle: f64) -> (f64, f64) {
    let mut start = mirror_angle(start_angle);
    let mut end = mirror_angle(end_angle);
    if start == 180.0 && end < 0.0 {
        start = -180.0;
    } else if end == 180.0 && start < 0.0 {
        end = -180.0;
    }
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LensConfig;

    fn unit_document() -> LensDocument {
        LensDocument::new(LensConfig {
            point_spacing: 1.0,
            ring_spacing: Some(1.0),
            z_offset: 0.0,
        })
    }

    #[test]
    fn test_mirror_line_reflects_z_only() {
        let mut doc = unit_document();
        doc.start(0.0, 0.0, None)
            .line(10.0, 0.0)
            .unwrap()
            .line(10.0, 10.0)
            .unwrap();
        doc.mirror(&[0, 1], 0.0, None).unwrap();

        assert_eq!(doc.piece_count(), 4);
        assert_eq!(
            doc.electrode_pieces()[2],
            Piece::Line {
                start: Point::new(0.0, 0.0),
                end: Point::new(-10.0, 0.0),
                voltage: 0,
                point_count: 10,
            }
        );
        assert_eq!(
            doc.electrode_pieces()[3],
            Piece::Line {
                start: Point::new(-10.0, 0.0),
                end: Point::new(-10.0, 10.0),
                voltage: 0,
                point_count: 10,
            }
        );
        // the mirrored ring keeps the mitered corner
        assert_eq!(
            doc.ring_pieces()[2],
            Piece::Line {
                start: Point::new(0.0, 1.0),
                end: Point::new(-9.0, 1.0),
                voltage: 0,
                point_count: 10,
            }
        );
    }

    #[test]
    fn test_mirror_negates_voltage_by_default() {
        let mut doc = unit_document();
        doc.start(0.0, 0.0, Some(3)).line(10.0, 0.0).unwrap();
        doc.mirror(&[0], 5.0, None).unwrap();
        assert_eq!(doc.electrode_pieces()[1].voltage(), -3);
        assert_eq!(doc.ring_pieces()[1].voltage(), 0);

        doc.mirror(&[0], 5.0, Some(9)).unwrap();
        assert_eq!(doc.electrode_pieces()[2].voltage(), 9);
    }

    #[test]
    fn test_mirror_twice_is_identity() {
        let mut doc = unit_document();
        doc.start(0.0, 0.0, Some(1))
            .line(10.0, 0.0)
            .unwrap()
            .line(10.0, 10.0)
            .unwrap();
        doc.arc(180.0, 2.0).unwrap();
        let originals: Vec<Piece> = doc.electrode_pieces().to_vec();
        let original_rings: Vec<Piece> = doc.ring_pieces().to_vec();

        doc.mirror(&[0, 1, 2], 0.0, None).unwrap();
        doc.mirror(&[3, 4, 5], 0.0, None).unwrap();

        assert_eq!(&doc.electrode_pieces()[6..9], &originals[..]);
        assert_eq!(&doc.ring_pieces()[6..9], &original_rings[..]);
    }

    #[test]
    fn test_mirror_arc_angles_seam_resnap() {
        // 0/-90 reflects to 180/-90, which straddles the seam: start snaps
        assert_eq!(mirror_arc_angles(0.0, -90.0), (-180.0, -90.0));
        assert_eq!(mirror_arc_angles(-90.0, 0.0), (-90.0, -180.0));
        // no snap needed when both stay on one branch
        assert_eq!(mirror_arc_angles(30.0, 60.0), (150.0, 120.0));
    }

    #[test]
    fn test_mirror_arc_reflects_center_and_sense() {
        let mut doc = unit_document();
        doc.start(0.0, 5.0, Some(2)).vertical(10.0).unwrap();
        doc.arc(0.0, 2.0).unwrap();
        doc.mirror(&[1], 0.0, None).unwrap();

        match doc.electrode_pieces()[2] {
            Piece::Arc {
                center,
                clockwise,
                radius,
                voltage,
                ..
            } => {
                assert_eq!(center, Point::new(-2.0, 10.0));
                assert!(!clockwise);
                assert_eq!(radius, 2.0);
                assert_eq!(voltage, -2);
            }
            _ => panic!("expected an arc"),
        }
    }

    #[test]
    fn test_mirror_index_out_of_range() {
        let mut doc = unit_document();
        doc.start(0.0, 0.0, None).line(10.0, 0.0).unwrap();
        let err = doc.mirror(&[5], 0.0, None).unwrap_err();
        assert!(matches!(err, LensError::InvalidGeometry(_)));
    }

    #[test]
    fn test_mirror_voltage_group_selects_active_group() {
        let mut doc = unit_document();
        doc.start(0.0, 0.0, Some(1)).line(5.0, 0.0).unwrap();
        doc.start(10.0, 0.0, Some(2))
            .line(15.0, 0.0)
            .unwrap()
            .line(15.0, 5.0)
            .unwrap();
        doc.mirror_voltage_group(20.0).unwrap();

        // only the two group-2 pieces were mirrored
        assert_eq!(doc.piece_count(), 5);
        assert_eq!(doc.electrode_pieces()[3].voltage(), -2);
        assert_eq!(doc.electrode_pieces()[4].voltage(), -2);
        match doc.electrode_pieces()[3] {
            Piece::Line { start, end, .. } => {
                assert_eq!(start, Point::new(30.0, 0.0));
                assert_eq!(end, Point::new(25.0, 0.0));
            }
            _ => panic!("expected a line"),
        }
    }
}
