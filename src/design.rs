//! Serialized lens designs
//!
//! A design file is the drawing session written down: spacing configuration
//! plus the ordered list of drawing commands, replayed through the builder.
//! Optimizer and orchestration tooling emit these files; the engine only
//! consumes them.

use serde::{Deserialize, Serialize};

use crate::builder::LensDocument;
use crate::error::LensError;
use crate::LensConfig;

/// A complete lens design: spacing configuration and drawing commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LensDesign {
    /// Spacing between mesh points along each piece, in mm
    #[serde(default = "default_point_spacing")]
    pub point_spacing: f64,
    /// Electrode-to-ring clearance in mm; defaults to the point spacing
    #[serde(default)]
    pub ring_spacing: Option<f64>,
    /// Axial shift applied to every stored z coordinate, in mm
    #[serde(default)]
    pub z_offset: f64,
    /// Drawing commands, executed in order
    pub commands: Vec<DrawCommand>,
}

fn default_point_spacing() -> f64 {
    0.1
}

/// One drawing command. The `op` tag selects the operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    Start {
        z: f64,
        r: f64,
        #[serde(default)]
        voltage_group: Option<i32>,
    },
    Line {
        z: f64,
        r: f64,
    },
    Horizontal {
        z: f64,
    },
    Vertical {
        r: f64,
    },
    Arc {
        end_direction: f64,
        radius: f64,
    },
    CountPieces {
        name: String,
    },
    Mirror {
        pieces: Vec<usize>,
        #[serde(default)]
        mirror_z: f64,
        #[serde(default)]
        voltage_group: Option<i32>,
    },
    MirrorVoltageGroup {
        mirror_z: f64,
    },
}

impl LensDesign {
    pub fn config(&self) -> LensConfig {
        LensConfig {
            point_spacing: self.point_spacing,
            ring_spacing: self.ring_spacing,
            z_offset: self.z_offset,
        }
    }

    /// Replay the command list through a fresh document. Construction stops
    /// at the first failing command.
    pub fn build(&self) -> Result<LensDocument, LensError> {
        let mut document = LensDocument::new(self.config());
        for command in &self.commands {
            match command {
                DrawCommand::Start {
                    z,
                    r,
                    voltage_group,
                } => {
                    document.start(*z, *r, *voltage_group);
                }
                DrawCommand::Line { z, r } => {
                    document.line(*z, *r)?;
                }
                DrawCommand::Horizontal { z } => {
                    document.horizontal(*z)?;
                }
                DrawCommand::Vertical { r } => {
                    document.vertical(*r)?;
                }
                DrawCommand::Arc {
                    end_direction,
                    radius,
                } => {
                    document.arc(*end_direction, *radius)?;
                }
                DrawCommand::CountPieces { name } => {
                    document.count_pieces(name.clone());
                }
                DrawCommand::Mirror {
                    pieces,
                    mirror_z,
                    voltage_group,
                } => {
                    document.mirror(pieces, *mirror_z, *voltage_group)?;
                }
                DrawCommand::MirrorVoltageGroup { mirror_z } => {
                    document.mirror_voltage_group(*mirror_z)?;
                }
            }
        }
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_build_design() {
        let json = r#"{
            "point_spacing": 1.0,
            "ring_spacing": 1.0,
            "commands": [
                { "op": "start", "z": 0.0, "r": 2.0, "voltage_group": 1 },
                { "op": "horizontal", "z": 10.0 },
                { "op": "vertical", "r": 6.0 },
                { "op": "count_pieces", "name": "entry" },
                { "op": "mirror_voltage_group", "mirror_z": 12.0 }
            ]
        }"#;

        let design: LensDesign = serde_json::from_str(json).unwrap();
        assert_eq!(design.commands.len(), 5);

        let document = design.build().unwrap();
        assert_eq!(document.piece_count(), 4);
        assert_eq!(document.tallies(), &[("entry".to_string(), 2)]);
        assert_eq!(document.electrode_pieces()[2].voltage(), -1);
        document.validate().unwrap();
    }

    #[test]
    fn test_defaults_applied() {
        let json = r#"{ "commands": [] }"#;
        let design: LensDesign = serde_json::from_str(json).unwrap();
        assert_eq!(design.point_spacing, 0.1);
        assert_eq!(design.ring_spacing, None);
        assert_eq!(design.z_offset, 0.0);
    }

    #[test]
    fn test_unknown_op_rejected() {
        let json = r#"{ "commands": [ { "op": "spline", "z": 0.0 } ] }"#;
        assert!(serde_json::from_str::<LensDesign>(json).is_err());
    }

    #[test]
    fn test_build_stops_at_first_error() {
        let json = r#"{
            "point_spacing": 1.0,
            "commands": [
                { "op": "start", "z": 0.0, "r": 0.0 },
                { "op": "arc", "end_direction": 90.0, "radius": 5.0 }
            ]
        }"#;
        let design: LensDesign = serde_json::from_str(json).unwrap();
        assert!(matches!(
            design.build(),
            Err(LensError::InvalidGeometry(_))
        ));
    }

    #[test]
    fn test_explicit_mirror_roundtrips() {
        let json = r#"{
            "point_spacing": 1.0,
            "commands": [
                { "op": "start", "z": 0.0, "r": 0.0, "voltage_group": 2 },
                { "op": "line", "z": 5.0, "r": 0.0 },
                { "op": "mirror", "pieces": [0], "mirror_z": 10.0 }
            ]
        }"#;
        let design: LensDesign = serde_json::from_str(json).unwrap();
        let document = design.build().unwrap();
        assert_eq!(document.piece_count(), 2);
        assert_eq!(document.electrode_pieces()[1].voltage(), -2);
    }
}
