//! Report document model shared by the PDF, XLSX, and CSV renderers
//!
//! A [`ReportTable`] is an ordered grid of display strings plus titles,
//! alignment, and an optional totals row. Services build tables; renderers
//! only lay them out and style them.

pub mod branding;
pub mod csv;
pub mod layout;
pub mod pdf;
pub mod xlsx;

use thiserror::Error;

/// Message rendered in place of the data table when a query matches nothing
pub const NO_RESULTS_MESSAGE: &str = "No se encontraron registros";

/// Horizontal alignment of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellAlign {
    Left,
    Right,
}

/// Page orientation for the PDF renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

/// A fully assembled report: titles, header row, data rows, totals
#[derive(Debug, Clone)]
pub struct ReportTable {
    pub title: String,
    pub subtitle: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Per-column alignment; columns beyond the vector default to left
    pub align: Vec<CellAlign>,
    /// Totals row computed by the caller; rendered emphasized, never striped
    pub totals: Option<Vec<String>>,
    /// Relative column width weights; `None` = uniform
    pub widths: Option<Vec<f32>>,
}

/// Rendering options with defaults: portrait, no logo, zebra striping on
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub orientation: Orientation,
    /// Raw logo image bytes (PNG or JPEG); `None` renders without branding art
    pub logo: Option<Vec<u8>>,
    pub zebra: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            orientation: Orientation::Portrait,
            logo: None,
            zebra: true,
        }
    }
}

/// Errors that can occur while rendering a report
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("PDF rendering failed: {0}")]
    Pdf(String),

    #[error("Spreadsheet rendering failed: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("CSV export failed: {0}")]
    Csv(#[from] ::csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Build a `Content-Disposition` attachment filename for a report
///
/// Embeds the date range and, when present, the payer filter uppercased with
/// spaces replaced by underscores. No filter, no segment.
pub fn attachment_filename(
    prefix: &str,
    desde: &str,
    hasta: &str,
    filtro: Option<&str>,
    extension: &str,
) -> String {
    match filtro.map(str::trim) {
        Some(f) if !f.is_empty() => format!(
            "{prefix}_{desde}_{hasta}_{}.{extension}",
            sanitize_segment(f)
        ),
        _ => format!("{prefix}_{desde}_{hasta}.{extension}"),
    }
}

fn sanitize_segment(filtro: &str) -> String {
    filtro.to_uppercase().replace(' ', "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filename_with_filter() {
        assert_eq!(
            attachment_filename("recibos", "250101", "250131", Some("Juan Pérez"), "pdf"),
            "recibos_250101_250131_JUAN_PÉREZ.pdf"
        );
    }

    #[test]
    fn test_filename_without_filter() {
        assert_eq!(
            attachment_filename("recibos", "250101", "250131", None, "xlsx"),
            "recibos_250101_250131.xlsx"
        );
        assert_eq!(
            attachment_filename("recibos", "250101", "250131", Some("   "), "csv"),
            "recibos_250101_250131.csv"
        );
    }
}
