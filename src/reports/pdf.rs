//! PDF report renderer
//!
//! Lays a [`ReportTable`] onto Letter pages: branded first-page header,
//! column headers repeated on every page, zebra-striped body rows with
//! wrapped cell text, and an emphasized totals row.

use chrono::Local;
use printpdf::path::PaintMode;
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point, Rect, Rgb,
};
use std::io::BufWriter;

use super::layout;
use super::{branding, CellAlign, Orientation, RenderOptions, ReportError, ReportTable, NO_RESULTS_MESSAGE};

const MARGIN_LEFT: f32 = 12.0;
const MARGIN_RIGHT: f32 = 12.0;
const MARGIN_TOP: f32 = 14.0;
const MARGIN_BOTTOM: f32 = 16.0;

const LINE_HEIGHT: f32 = 3.9;
const CELL_PADDING: f32 = 1.4;
const HEADER_FONT_SIZE: f32 = 8.5;
const BODY_FONT_SIZE: f32 = 8.0;

/// Letter page dimensions in millimeters for the given orientation
fn page_size(orientation: Orientation) -> (f32, f32) {
    match orientation {
        Orientation::Portrait => (215.9, 279.4),
        Orientation::Landscape => (279.4, 215.9),
    }
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

/// Render a report table as PDF bytes
pub fn render_pdf(table: &ReportTable, opts: &RenderOptions) -> Result<Vec<u8>, ReportError> {
    let (page_w, page_h) = page_size(opts.orientation);

    let (doc, first_page, first_layer) =
        PdfDocument::new(table.title.as_str(), Mm(page_w), Mm(page_h), "Capa 1");
    let fonts = Fonts {
        regular: doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ReportError::Pdf(e.to_string()))?,
        bold: doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| ReportError::Pdf(e.to_string()))?,
    };

    let mut layer = doc.get_page(first_page).get_layer(first_layer);
    let mut y = draw_page_header(&layer, &fonts, table, opts, page_w);

    if table.rows.is_empty() {
        layer.set_fill_color(rgb((0.2, 0.2, 0.2)));
        layer.use_text(NO_RESULTS_MESSAGE, 11.0, Mm(MARGIN_LEFT), Mm(y - 8.0), &fonts.regular);
        return save(doc);
    }

    let available = page_w - MARGIN_LEFT - MARGIN_RIGHT;
    let widths = layout::resolve_widths(table.widths.as_deref(), table.headers.len(), available);

    y = draw_header_row(&layer, &fonts, table, &widths, y);

    for (index, row) in table.rows.iter().enumerate() {
        let (wrapped, row_h) = wrap_row(row, &widths);
        if y - row_h < MARGIN_BOTTOM {
            let (page, layer_index) = doc.add_page(Mm(page_w), Mm(page_h), "Capa 1");
            layer = doc.get_page(page).get_layer(layer_index);
            y = page_h - MARGIN_TOP;
            y = draw_header_row(&layer, &fonts, table, &widths, y);
        }
        if opts.zebra && index % 2 == 1 {
            fill_rect(&layer, MARGIN_LEFT, y - row_h, available, row_h, branding::ZEBRA);
        }
        draw_row(
            &layer,
            &fonts.regular,
            BODY_FONT_SIZE,
            rgb((0.1, 0.1, 0.1)),
            &wrapped,
            &table.align,
            &widths,
            y,
        );
        y -= row_h;
    }

    if let Some(totals) = &table.totals {
        let (wrapped, row_h) = wrap_row(totals, &widths);
        if y - row_h < MARGIN_BOTTOM {
            let (page, layer_index) = doc.add_page(Mm(page_w), Mm(page_h), "Capa 1");
            layer = doc.get_page(page).get_layer(layer_index);
            y = page_h - MARGIN_TOP;
            y = draw_header_row(&layer, &fonts, table, &widths, y);
        }
        fill_rect(&layer, MARGIN_LEFT, y - row_h, available, row_h, branding::GUINDA);
        draw_row(
            &layer,
            &fonts.bold,
            BODY_FONT_SIZE,
            rgb((1.0, 1.0, 1.0)),
            &wrapped,
            &table.align,
            &widths,
            y,
        );
        y -= row_h;
    }

    // closing rule under the table
    layer.set_outline_color(rgb(branding::GUINDA));
    layer.set_outline_thickness(0.75);
    layer.add_line(Line {
        points: vec![
            (Point::new(Mm(MARGIN_LEFT), Mm(y)), false),
            (Point::new(Mm(MARGIN_LEFT + available), Mm(y)), false),
        ],
        is_closed: false,
    });

    save(doc)
}

/// Wrap every cell of a row; returns the wrapped lines and the row height
fn wrap_row(row: &[String], widths: &[f32]) -> (Vec<Vec<String>>, f32) {
    let wrapped: Vec<Vec<String>> = row
        .iter()
        .zip(widths)
        .map(|(cell, w)| layout::wrap_cell(cell, w - 2.0 * CELL_PADDING, BODY_FONT_SIZE))
        .collect();
    let lines = wrapped.iter().map(Vec::len).max().unwrap_or(1);
    let row_h = lines as f32 * LINE_HEIGHT + CELL_PADDING;
    (wrapped, row_h)
}

/// First-page branding block: logo, title, subtitle, timestamp, divider bars
///
/// Returns the y coordinate where the table begins.
fn draw_page_header(
    layer: &PdfLayerReference,
    fonts: &Fonts,
    table: &ReportTable,
    opts: &RenderOptions,
    page_w: f32,
) -> f32 {
    let top = page_size(opts.orientation).1 - MARGIN_TOP;

    let mut text_x = MARGIN_LEFT;
    if let Some(bytes) = &opts.logo {
        if embed_logo(layer, bytes, MARGIN_LEFT, top - 16.0, 34.0, 16.0) {
            text_x = MARGIN_LEFT + 38.0;
        }
    }

    layer.set_fill_color(rgb(branding::GUINDA));
    layer.use_text(table.title.as_str(), 14.0, Mm(text_x), Mm(top - 5.0), &fonts.bold);

    layer.set_fill_color(rgb((0.2, 0.2, 0.2)));
    layer.use_text(table.subtitle.as_str(), 10.0, Mm(text_x), Mm(top - 11.0), &fonts.regular);

    let generado = format!("Generado: {}", Local::now().format("%d-%m-%Y %H:%M"));
    layer.set_fill_color(rgb((0.45, 0.45, 0.45)));
    layer.use_text(generado.as_str(), 8.0, Mm(text_x), Mm(top - 16.0), &fonts.regular);

    let available = page_w - MARGIN_LEFT - MARGIN_RIGHT;
    fill_rect(layer, MARGIN_LEFT, top - 20.5, available, 1.5, branding::GUINDA);
    fill_rect(layer, MARGIN_LEFT, top - 21.8, available, 0.7, branding::ARENA);

    top - 25.0
}

/// Column header row: accent fill, white bold text; repeated on every page
fn draw_header_row(
    layer: &PdfLayerReference,
    fonts: &Fonts,
    table: &ReportTable,
    widths: &[f32],
    y: f32,
) -> f32 {
    let available: f32 = widths.iter().sum();
    let row_h = LINE_HEIGHT + 2.0 * CELL_PADDING;
    fill_rect(layer, MARGIN_LEFT, y - row_h, available, row_h, branding::GUINDA);

    layer.set_fill_color(rgb((1.0, 1.0, 1.0)));
    let mut x = MARGIN_LEFT;
    for (column, (header, width)) in table.headers.iter().zip(widths).enumerate() {
        let text_x = match table.align.get(column) {
            Some(CellAlign::Right) => {
                x + width - CELL_PADDING - layout::approx_text_width(header, HEADER_FONT_SIZE)
            }
            _ => x + CELL_PADDING,
        };
        layer.use_text(
            header.as_str(),
            HEADER_FONT_SIZE,
            Mm(text_x),
            Mm(y - row_h + CELL_PADDING + 1.0),
            &fonts.bold,
        );
        x += width;
    }
    y - row_h
}

/// Draw one wrapped row of cells starting at the given top y
fn draw_row(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    font_size: f32,
    color: Color,
    wrapped: &[Vec<String>],
    align: &[CellAlign],
    widths: &[f32],
    y: f32,
) {
    layer.set_fill_color(color);
    let mut x = MARGIN_LEFT;
    for (column, (lines, width)) in wrapped.iter().zip(widths).enumerate() {
        for (line_index, line) in lines.iter().enumerate() {
            let baseline = y - CELL_PADDING - 2.4 - line_index as f32 * LINE_HEIGHT;
            let text_x = match align.get(column) {
                Some(CellAlign::Right) => {
                    x + width - CELL_PADDING - layout::approx_text_width(line, font_size)
                }
                _ => x + CELL_PADDING,
            };
            layer.use_text(line.as_str(), font_size, Mm(text_x), Mm(baseline), font);
        }
        x += width;
    }
}

/// Embed the logo scaled to fit the bounding box, preserving aspect ratio
///
/// Returns false (and renders nothing) when the bytes do not decode.
fn embed_logo(
    layer: &PdfLayerReference,
    bytes: &[u8],
    x: f32,
    y: f32,
    box_w: f32,
    box_h: f32,
) -> bool {
    use printpdf::image_crate::codecs::{jpeg::JpegDecoder, png::PngDecoder};
    use printpdf::{Image, ImageTransform};
    use std::io::Cursor;

    let image = if bytes.starts_with(&[0x89, b'P', b'N', b'G']) {
        PngDecoder::new(Cursor::new(bytes))
            .ok()
            .and_then(|d| Image::try_from(d).ok())
    } else if bytes.starts_with(&[0xFF, 0xD8]) {
        JpegDecoder::new(Cursor::new(bytes))
            .ok()
            .and_then(|d| Image::try_from(d).ok())
    } else {
        None
    };

    let Some(image) = image else {
        tracing::warn!("logo bytes did not decode as PNG or JPEG, omitting logo");
        return false;
    };

    const DPI: f32 = 300.0;
    let width_mm = image.image.width.0 as f32 * 25.4 / DPI;
    let height_mm = image.image.height.0 as f32 * 25.4 / DPI;
    if width_mm <= 0.0 || height_mm <= 0.0 {
        return false;
    }
    let scale = (box_w / width_mm).min(box_h / height_mm);

    image.add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(Mm(x)),
            translate_y: Some(Mm(y)),
            scale_x: Some(scale),
            scale_y: Some(scale),
            dpi: Some(DPI),
            ..Default::default()
        },
    );
    true
}

fn fill_rect(layer: &PdfLayerReference, x: f32, y: f32, w: f32, h: f32, color: (f32, f32, f32)) {
    layer.set_fill_color(rgb(color));
    layer.add_rect(Rect::new(Mm(x), Mm(y), Mm(x + w), Mm(y + h)).with_mode(PaintMode::Fill));
}

fn rgb((r, g, b): (f32, f32, f32)) -> Color {
    Color::Rgb(Rgb::new(r, g, b, None))
}

fn save(doc: PdfDocumentReference) -> Result<Vec<u8>, ReportError> {
    let mut writer = BufWriter::new(Vec::new());
    doc.save(&mut writer)
        .map_err(|e| ReportError::Pdf(e.to_string()))?;
    writer
        .into_inner()
        .map_err(|e| ReportError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))
}
