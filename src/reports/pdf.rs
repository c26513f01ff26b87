//! PDF report writer built on printpdf's builtin fonts

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference};

use crate::error::{AppError, AppResult};

use super::ReportTable;

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 15.0;
const TITLE_SIZE: f32 = 16.0;
const HEADER_SIZE: f32 = 10.0;
const BODY_SIZE: f32 = 9.0;
const ROW_HEIGHT: f32 = 7.0;
// Rough glyph width at body size, used to clip overlong cells
const CHAR_WIDTH: f32 = 1.8;

/// Render a report table as an A4 portrait PDF
pub fn render(table: &ReportTable) -> AppResult<Vec<u8>> {
    let (doc, page, layer) = PdfDocument::new(&table.title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");

    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| AppError::Internal(format!("Failed to load PDF font: {}", e)))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| AppError::Internal(format!("Failed to load PDF font: {}", e)))?;

    let columns = column_offsets(&table.widths);

    let mut current = doc.get_page(page).get_layer(layer);
    let mut y = PAGE_HEIGHT - MARGIN;

    current.use_text(&table.title, TITLE_SIZE, Mm(MARGIN), Mm(y - 6.0), &bold);
    y -= 16.0;

    write_header_row(&current, table, &columns, &bold, y);
    y -= ROW_HEIGHT;

    for row in &table.rows {
        if y < MARGIN + ROW_HEIGHT {
            let (next_page, next_layer) = new_page(&doc);
            current = doc.get_page(next_page).get_layer(next_layer);
            y = PAGE_HEIGHT - MARGIN;
            write_header_row(&current, table, &columns, &bold, y);
            y -= ROW_HEIGHT;
        }

        for (cell, (x, width)) in row.iter().zip(columns.iter()) {
            let clipped = clip(cell, *width);
            current.use_text(&clipped, BODY_SIZE, Mm(*x), Mm(y), &font);
        }
        y -= ROW_HEIGHT;
    }

    doc.save_to_bytes()
        .map_err(|e| AppError::Internal(format!("Failed to write PDF: {}", e)))
}

fn new_page(doc: &PdfDocumentReference) -> (printpdf::PdfPageIndex, printpdf::PdfLayerIndex) {
    doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1")
}

fn write_header_row(
    layer: &PdfLayerReference,
    table: &ReportTable,
    columns: &[(f32, f32)],
    bold: &IndirectFontRef,
    y: f32,
) {
    for (header, (x, width)) in table.headers.iter().zip(columns.iter()) {
        let clipped = clip(header, *width);
        layer.use_text(&clipped, HEADER_SIZE, Mm(*x), Mm(y), bold);
    }
}

/// (x offset, width) per column, from the relative widths
fn column_offsets(widths: &[f32]) -> Vec<(f32, f32)> {
    let usable = PAGE_WIDTH - 2.0 * MARGIN;
    let total: f32 = widths.iter().sum();
    let mut x = MARGIN;
    widths
        .iter()
        .map(|w| {
            let width = usable * w / total;
            let offset = x;
            x += width;
            (offset, width)
        })
        .collect()
}

fn clip(text: &str, width: f32) -> String {
    let max_chars = (width / CHAR_WIDTH).max(3.0) as usize;
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let mut clipped: String = text.chars().take(max_chars.saturating_sub(1)).collect();
        clipped.push('…');
        clipped
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::sample_table;
    use super::*;

    #[test]
    fn renders_a_pdf_document() {
        let bytes = render(&sample_table()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn paginates_long_tables() {
        let mut table = sample_table();
        for i in 0..200 {
            table.push_row(vec![
                i.to_string(),
                format!("Item {}", i),
                "owner".into(),
                "Others".into(),
                "1.00".into(),
                "Available".into(),
            ]);
        }
        let bytes = render(&table).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn column_offsets_cover_the_usable_width() {
        let columns = column_offsets(&[1.0, 1.0, 2.0]);
        assert_eq!(columns.len(), 3);
        assert!((columns[0].0 - MARGIN).abs() < f32::EPSILON);
        let end = columns[2].0 + columns[2].1;
        assert!((end - (PAGE_WIDTH - MARGIN)).abs() < 0.01);
    }

    #[test]
    fn clip_shortens_overlong_cells() {
        let clipped = clip("a very long cell value that cannot fit", 10.0);
        assert!(clipped.chars().count() <= 6);
        assert!(clipped.ends_with('…'));
    }
}
