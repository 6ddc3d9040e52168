//! XLSX report renderer
//!
//! Same table model as the PDF renderer: title/subtitle block, styled header
//! row, zebra-striped data rows, emphasized totals row. Currency cells are
//! written as real numbers with a currency format so spreadsheets can sum
//! them.

use rust_xlsxwriter::{Color, Format, FormatAlign, Workbook};

use super::{branding, CellAlign, ReportError, ReportTable, NO_RESULTS_MESSAGE};

const MONEY_FORMAT: &str = "$#,##0.00";

/// Render a report table as XLSX bytes
pub fn render_xlsx(table: &ReportTable) -> Result<Vec<u8>, ReportError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    let sheet_name: String = table.title.chars().take(31).collect();
    sheet.set_name(sheet_name)?;

    let columns = table.headers.len() as u16;

    let title_format = Format::new()
        .set_bold()
        .set_font_size(14)
        .set_font_color(Color::RGB(branding::GUINDA_HEX));
    let subtitle_format = Format::new().set_font_size(10);
    let header_format = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(branding::GUINDA_HEX))
        .set_font_color(Color::White);

    if columns > 1 {
        sheet.merge_range(0, 0, 0, columns - 1, &table.title, &title_format)?;
        sheet.merge_range(1, 0, 1, columns - 1, &table.subtitle, &subtitle_format)?;
    } else {
        sheet.write_string_with_format(0, 0, table.title.as_str(), &title_format)?;
        sheet.write_string_with_format(1, 0, table.subtitle.as_str(), &subtitle_format)?;
    }

    if table.rows.is_empty() {
        sheet.write_string(3, 0, NO_RESULTS_MESSAGE)?;
        return Ok(workbook.save_to_buffer()?);
    }

    for (column, header) in table.headers.iter().enumerate() {
        sheet.write_string_with_format(3, column as u16, header.as_str(), &header_format)?;
    }

    let text_format = Format::new();
    let text_zebra = Format::new().set_background_color(Color::RGB(branding::ZEBRA_HEX));
    let money_format = Format::new().set_num_format(MONEY_FORMAT);
    let money_zebra = Format::new()
        .set_num_format(MONEY_FORMAT)
        .set_background_color(Color::RGB(branding::ZEBRA_HEX));
    let right_format = Format::new().set_align(FormatAlign::Right);
    let right_zebra = Format::new()
        .set_align(FormatAlign::Right)
        .set_background_color(Color::RGB(branding::ZEBRA_HEX));

    let mut row_index: u32 = 4;
    for (index, row) in table.rows.iter().enumerate() {
        let striped = index % 2 == 1;
        for (column, cell) in row.iter().enumerate() {
            write_cell(
                sheet,
                row_index,
                column as u16,
                cell,
                table.align.get(column).copied(),
                striped,
                (&text_format, &text_zebra, &money_format, &money_zebra, &right_format, &right_zebra),
            )?;
        }
        row_index += 1;
    }

    if let Some(totals) = &table.totals {
        let totals_text = Format::new()
            .set_bold()
            .set_background_color(Color::RGB(branding::GUINDA_HEX))
            .set_font_color(Color::White);
        let totals_money = Format::new()
            .set_bold()
            .set_num_format(MONEY_FORMAT)
            .set_background_color(Color::RGB(branding::GUINDA_HEX))
            .set_font_color(Color::White);
        for (column, cell) in totals.iter().enumerate() {
            match parse_money(cell) {
                Some(value) => {
                    sheet.write_number_with_format(row_index, column as u16, value, &totals_money)?
                }
                None => {
                    sheet.write_string_with_format(row_index, column as u16, cell.as_str(), &totals_text)?
                }
            };
        }
    }

    let widths = super::layout::resolve_widths(table.widths.as_deref(), table.headers.len(), 120.0);
    for (column, width) in widths.iter().enumerate() {
        sheet.set_column_width(column as u16, f64::from(*width))?;
    }

    Ok(workbook.save_to_buffer()?)
}

type CellFormats<'a> = (&'a Format, &'a Format, &'a Format, &'a Format, &'a Format, &'a Format);

fn write_cell(
    sheet: &mut rust_xlsxwriter::Worksheet,
    row: u32,
    column: u16,
    cell: &str,
    align: Option<CellAlign>,
    striped: bool,
    (text, text_zebra, money, money_zebra, right, right_zebra): CellFormats,
) -> Result<(), ReportError> {
    if let Some(value) = parse_money(cell) {
        let format = if striped { money_zebra } else { money };
        sheet.write_number_with_format(row, column, value, format)?;
        return Ok(());
    }
    let format = match (align, striped) {
        (Some(CellAlign::Right), true) => right_zebra,
        (Some(CellAlign::Right), false) => right,
        (_, true) => text_zebra,
        (_, false) => text,
    };
    sheet.write_string_with_format(row, column, cell, format)?;
    Ok(())
}

/// Parse a formatted currency cell (`$1,250.50` / `-$99.00`) back to a number
fn parse_money(cell: &str) -> Option<f64> {
    let (negative, rest) = match cell.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, cell),
    };
    let digits = rest.strip_prefix('$')?.replace(',', "");
    let value: f64 = digits.parse().ok()?;
    Some(if negative { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_money() {
        assert_eq!(parse_money("$1,250.50"), Some(1250.5));
        assert_eq!(parse_money("-$99.00"), Some(-99.0));
        assert_eq!(parse_money("$0.00"), Some(0.0));
        assert_eq!(parse_money("Totales"), None);
        assert_eq!(parse_money("15-01-2025"), None);
        assert_eq!(parse_money(""), None);
    }
}
