//! Excel report writer built on rust_xlsxwriter

use rust_xlsxwriter::{Format, Workbook};

use crate::error::{AppError, AppResult};

use super::ReportTable;

// Excel caps worksheet names at 31 characters
const SHEET_NAME_MAX: usize = 31;

/// Render a report table as a single-worksheet XLSX file
pub fn render(table: &ReportTable) -> AppResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    let sheet_name: String = table.title.chars().take(SHEET_NAME_MAX).collect();
    worksheet
        .set_name(&sheet_name)
        .map_err(|e| AppError::Internal(format!("Failed to name worksheet: {}", e)))?;

    let bold = Format::new().set_bold();

    for (col, header) in table.headers.iter().enumerate() {
        worksheet
            .write_with_format(0, col as u16, *header, &bold)
            .map_err(|e| AppError::Internal(format!("Failed to write header: {}", e)))?;
    }

    for (row_idx, row) in table.rows.iter().enumerate() {
        for (col, cell) in row.iter().enumerate() {
            worksheet
                .write((row_idx + 1) as u32, col as u16, cell.as_str())
                .map_err(|e| AppError::Internal(format!("Failed to write cell: {}", e)))?;
        }
    }

    // Width in characters, scaled from the same relative widths the PDF uses
    let total: f32 = table.widths.iter().sum();
    for (col, width) in table.widths.iter().enumerate() {
        let chars = (90.0 * width / total).clamp(8.0, 40.0);
        worksheet
            .set_column_width(col as u16, chars as f64)
            .map_err(|e| AppError::Internal(format!("Failed to size column: {}", e)))?;
    }

    workbook
        .save_to_buffer()
        .map_err(|e| AppError::Internal(format!("Failed to write workbook: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::super::tests::sample_table;
    use super::*;

    #[test]
    fn renders_an_xlsx_archive() {
        let bytes = render(&sample_table()).unwrap();
        // XLSX is a zip container
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn long_titles_fit_the_sheet_name_limit() {
        let mut table = sample_table();
        table.title = "An extremely long report title that overflows the limit".to_string();
        let bytes = render(&table).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }
}
