// toner-stock-cli/src/inventory.rs
// ============================================================================
// Module: Inventory Presentation
// Description: Record drafting and stock table rendering for the CLI.
// Purpose: Turn command arguments into records and records into a table.
// Dependencies: toner-stock-core, thiserror
// ============================================================================

//! ## Overview
//! Drafts are built from command-line arguments. Identifiers (including the
//! alternatives) are trimmed and upper-cased so the path and body ids agree
//! when the record is submitted. The stock table shows requested units as 0
//! since reservations are not tracked.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;
use toner_stock_core::TonerId;
use toner_stock_core::TonerRecord;

// ============================================================================
// SECTION: Drafts
// ============================================================================

/// Record fields as entered on the command line.
#[derive(Debug, Clone, Default)]
pub struct TonerDraft {
    /// Cartridge identifier (any case).
    pub id: String,
    /// Units in stock.
    pub quantity: u32,
    /// Color cartridge flag.
    pub is_color: bool,
    /// Generic (non-OEM) flag.
    pub is_generic: bool,
    /// High-capacity flag.
    pub is_high_capacity: bool,
    /// Compatible substitute identifiers.
    pub alternatives: Vec<String>,
}

/// Draft rejected before any request is sent.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DraftError {
    /// Identifier is empty after trimming.
    #[error("toner id must be non-empty")]
    EmptyId,
    /// An alternative identifier is empty after trimming.
    #[error("alternative #{index} must be non-empty")]
    EmptyAlternative {
        /// One-based position of the alternative.
        index: usize,
    },
}

impl TonerDraft {
    /// Validates the draft and produces a normalized record.
    ///
    /// # Errors
    ///
    /// Returns [`DraftError`] when the id or an alternative is blank.
    pub fn into_record(self) -> Result<TonerRecord, DraftError> {
        let id = TonerId::normalized(&self.id);
        if id.as_str().is_empty() {
            return Err(DraftError::EmptyId);
        }
        let alternatives = self
            .alternatives
            .iter()
            .enumerate()
            .map(|(index, alternative)| {
                let normalized = TonerId::normalized(alternative);
                if normalized.as_str().is_empty() {
                    Err(DraftError::EmptyAlternative {
                        index: index + 1,
                    })
                } else {
                    Ok(normalized)
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(TonerRecord {
            id,
            quantity: self.quantity,
            is_color: self.is_color,
            is_high_capacity: self.is_high_capacity,
            is_generic: self.is_generic,
            alternatives,
        })
    }
}

// ============================================================================
// SECTION: Table
// ============================================================================

/// Column headers for the stock table.
const HEADERS: [&str; 8] =
    ["Toner", "Color", "Generic", "High yield", "Stock", "Requested", "Available", "Alternatives"];

/// Renders records as a fixed-width stock table, one line per record.
#[must_use]
pub fn render_stock_table(records: &[TonerRecord]) -> String {
    let rows: Vec<[String; 8]> = records.iter().map(stock_row).collect();
    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }
    let mut output = String::new();
    push_line(&mut output, &HEADERS.map(str::to_string), &widths);
    push_line(&mut output, &widths.map(|width| "-".repeat(width)), &widths);
    for row in &rows {
        push_line(&mut output, row, &widths);
    }
    output
}

/// Builds the table cells for one record.
fn stock_row(record: &TonerRecord) -> [String; 8] {
    let alternatives = if record.alternatives.is_empty() {
        "-".to_string()
    } else {
        record.alternatives.iter().map(TonerId::as_str).collect::<Vec<_>>().join(", ")
    };
    [
        record.id.to_string(),
        yes_no(record.is_color),
        yes_no(record.is_generic),
        yes_no(record.is_high_capacity),
        record.quantity.to_string(),
        "0".to_string(),
        record.quantity.to_string(),
        alternatives,
    ]
}

/// Formats a flag as `Y` or `N`.
fn yes_no(flag: bool) -> String {
    String::from(if flag { "Y" } else { "N" })
}

/// Appends one padded line.
fn push_line(output: &mut String, cells: &[String; 8], widths: &[usize; 8]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    output.push_str(line.trim_end());
    output.push('\n');
}

// ============================================================================
// SECTION: Tests
// ============================================================================
