//! CSV report export
//!
//! Plain header + rows + optional totals row; the title/subtitle block and
//! styling only exist in the PDF/XLSX renderers.

use csv::Writer;

use super::{ReportError, ReportTable};

/// Render a report table as UTF-8 CSV bytes
pub fn render_csv(table: &ReportTable) -> Result<Vec<u8>, ReportError> {
    let mut writer = Writer::from_writer(Vec::new());

    writer.write_record(&table.headers)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }
    if let Some(totals) = &table.totals {
        writer.write_record(totals)?;
    }

    writer.flush()?;
    writer
        .into_inner()
        .map_err(|e| ReportError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::CellAlign;

    fn sample_table() -> ReportTable {
        ReportTable {
            title: "Recibos de caja".to_string(),
            subtitle: "Del 01-01-2025 al 31-01-2025".to_string(),
            headers: vec!["Recibo".to_string(), "Neto".to_string()],
            rows: vec![
                vec!["1".to_string(), "$1,000.50".to_string()],
                vec!["2".to_string(), "$250.00".to_string()],
            ],
            align: vec![CellAlign::Right, CellAlign::Right],
            totals: Some(vec!["Totales".to_string(), "$1,250.50".to_string()]),
            widths: None,
        }
    }

    #[test]
    fn test_render_csv_includes_totals() {
        let bytes = render_csv(&sample_table()).expect("csv renders");
        let text = String::from_utf8(bytes).expect("utf-8");
        assert!(text.starts_with("Recibo,Neto"));
        assert!(text.contains("\"$1,000.50\""));
        assert!(text.contains("Totales"));
        assert!(text.contains("\"$1,250.50\""));
    }

    #[test]
    fn test_render_csv_empty_rows() {
        let mut table = sample_table();
        table.rows.clear();
        table.totals = None;
        let bytes = render_csv(&table).expect("csv renders");
        let text = String::from_utf8(bytes).expect("utf-8");
        assert_eq!(text.trim(), "Recibo,Neto");
    }
}
