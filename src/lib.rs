//! cosy-export: Generate electrostatic lens geometry for COSY Infinity
//!
//! This crate provides:
//! - A stateful drawing builder for electrode boundaries (lines and arcs in
//!   the axial/radial half-plane)
//! - A ring offset engine that places the grounded structural boundary a
//!   fixed perpendicular distance from every electrode piece
//! - Mirror transforms for symmetric einzel-lens half-cells
//! - Bit-exact export of the solver's fixed-width mesh tables
//!
//! All coordinates are millimeters; angles are degrees from the +z axis.

pub mod builder;
pub mod design;
pub mod error;
pub mod export;
pub mod geometry;
pub mod mirror;
pub mod offset;

pub use builder::LensDocument;
pub use design::{DrawCommand, LensDesign};
pub use error::LensError;
pub use geometry::{Piece, PieceKind, Point};

use anyhow::Result;

/// Main entry point: parse a lens design and render both solver tables,
/// returned as `(ring_table, electrode_table)`.
pub fn translate(json: &str) -> Result<(String, String)> {
    let design: LensDesign = serde_json::from_str(json)?;
    let document = design.build()?;
    let ring_table = document.render_ring_table()?;
    let electrode_table = document.render_electrode_table()?;
    Ok((ring_table, electrode_table))
}

/// Configuration for geometry synthesis
#[derive(Debug, Clone, Copy)]
pub struct LensConfig {
    /// Spacing between mesh points along each piece, in mm
    pub point_spacing: f64,
    /// Electrode-to-ring clearance in mm; `None` falls back to the point
    /// spacing, which keeps the first mesh row next to each electrode square
    pub ring_spacing: Option<f64>,
    /// Axial shift applied to every stored z coordinate, in mm
    pub z_offset: f64,
}

impl Default for LensConfig {
    fn default() -> Self {
        Self {
            point_spacing: 0.1,
            ring_spacing: None,
            z_offset: 0.0,
        }
    }
}

impl LensConfig {
    pub fn effective_ring_spacing(&self) -> f64 {
        self.ring_spacing.unwrap_or(self.point_spacing)
    }
}
