//! Fixed-width solver table export
//!
//! The external field solver's mesh generator reads two text tables:
//! `coefR.txt` (ring pieces, 15 fractional digits) and `coefE.txt`
//! (electrode pieces, 14 fractional digits). The format is bit-exact; any
//! drift in field widths or exponent padding breaks the solver's parser.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use crate::builder::LensDocument;
use crate::error::LensError;
use crate::geometry::Piece;

impl LensDocument {
    /// Render the ring table: piece count, total point count, then one row
    /// per piece with single-space separators.
    pub fn render_ring_table(&self) -> Result<String, LensError> {
        let total = self.validate()?;
        let mut table = format!("{}\n{}\n", self.ring_pieces().len(), total);
        for piece in self.ring_pieces() {
            table.push_str(&ring_row(piece));
        }
        Ok(table)
    }

    /// Render the electrode table: piece count, then one row per piece with
    /// double-space separators and a 6-wide voltage column.
    pub fn render_electrode_table(&self) -> Result<String, LensError> {
        self.validate()?;
        let mut table = format!("{}\n", self.electrode_pieces().len());
        for piece in self.electrode_pieces() {
            table.push_str(&electrode_row(piece));
        }
        Ok(table)
    }

    /// Validate, then write `coefR.txt` and `coefE.txt` into `dir`.
    ///
    /// Any failure aborts the whole export; partially written output must be
    /// treated as invalid.
    pub fn export(&self, dir: &Path) -> Result<()> {
        let ring_table = self.render_ring_table()?;
        let electrode_table = self.render_electrode_table()?;

        let ring_path = dir.join("coefR.txt");
        fs::write(&ring_path, ring_table)
            .with_context(|| format!("Failed to write ring table: {:?}", ring_path))?;

        let electrode_path = dir.join("coefE.txt");
        fs::write(&electrode_path, electrode_table)
            .with_context(|| format!("Failed to write electrode table: {:?}", electrode_path))?;

        debug!(
            pieces = self.piece_count(),
            dir = %dir.display(),
            "exported solver tables"
        );
        Ok(())
    }
}

fn ring_row(piece: &Piece) -> String {
    let mut row = format!(
        "{:3} {} {}",
        piece.point_count(),
        piece.kind().tag(),
        piece.voltage()
    );
    for value in piece.coef_row() {
        row.push(' ');
        row.push_str(&fmt_sci(value, 15));
    }
    row.push('\n');
    row
}

fn electrode_row(piece: &Piece) -> String {
    let mut row = format!(
        "{:3} {}  {:6}",
        piece.point_count(),
        piece.kind().tag(),
        piece.voltage()
    );
    for value in piece.coef_row() {
        row.push_str("  ");
        row.push_str(&fmt_sci(value, 14));
    }
    row.push('\n');
    row
}

/// Scientific notation with an explicitly signed, zero-padded two-digit
/// exponent (`+1.500000000000000e+01`). Rust's `{:e}` leaves the exponent
/// bare, which the solver's fixed-width parser cannot read.
fn fmt_sci(value: f64, precision: usize) -> String {
    let formatted = format!("{:+.*e}", precision, value);
    match formatted.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => formatted,
    }
}
