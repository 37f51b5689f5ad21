//! Spreadsheet export of the measurement table.

use std::path::Path;

use rust_xlsxwriter::{Color, Format, FormatAlign, FormatPattern, Workbook, XlsxError};

use super::table::{TableRow, CORNER_HEADER, MEASUREMENT_HEADERS, POINT_HEADERS, VALUE_COLUMNS};
use crate::grid::Threshold;

pub const SHEET_NAME: &str = "Mediciones";

const RED: u32 = 0xFF0000;
const GREEN: u32 = 0x00B050;

/// The table is anchored at B2
const FIRST_ROW: u32 = 1;
const FIRST_COL: u16 = 1;

fn fill_format(threshold: Threshold) -> Format {
    let color = match threshold {
        Threshold::Below => RED,
        Threshold::AtOrAbove => GREEN,
    };
    Format::new()
        .set_pattern(FormatPattern::Solid)
        .set_background_color(Color::RGB(color))
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
}

/// Write the workbook for one inspection to `path`
pub fn write_workbook(path: &Path, rows: &[TableRow]) -> Result<(), XlsxError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    let header = Format::new().set_bold().set_align(FormatAlign::Center);

    // Merged measurement headers over four point columns each (C2:F2, G2:J2, K2:N2)
    let points_per_measurement = POINT_HEADERS.len() as u16;
    for (m, title) in MEASUREMENT_HEADERS.iter().enumerate() {
        let first_col = FIRST_COL + 1 + m as u16 * points_per_measurement;
        worksheet.merge_range(
            FIRST_ROW,
            first_col,
            FIRST_ROW,
            first_col + points_per_measurement - 1,
            *title,
            &header,
        )?;
    }

    worksheet.write_string_with_format(FIRST_ROW + 1, FIRST_COL, CORNER_HEADER, &header)?;
    for m in 0..MEASUREMENT_HEADERS.len() as u16 {
        for (p, title) in POINT_HEADERS.iter().enumerate() {
            let col = FIRST_COL + 1 + m * points_per_measurement + p as u16;
            worksheet.write_string_with_format(FIRST_ROW + 1, col, *title, &header)?;
        }
    }

    for (r, row) in rows.iter().enumerate() {
        let excel_row = FIRST_ROW + 2 + r as u32;
        worksheet.write_string(excel_row, FIRST_COL, row.label.as_str())?;
        for (c, value) in row.cells.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            let col = FIRST_COL + 1 + c as u16;
            match Threshold::classify(value) {
                Some(threshold) => {
                    worksheet.write_string_with_format(
                        excel_row,
                        col,
                        value.as_str(),
                        &fill_format(threshold),
                    )?;
                }
                None => {
                    worksheet.write_string(excel_row, col, value.as_str())?;
                }
            }
        }
    }

    worksheet.set_column_width(FIRST_COL, 12.0)?;
    for c in 0..VALUE_COLUMNS as u16 {
        worksheet.set_column_width(FIRST_COL + 1 + c, 14.0)?;
    }

    workbook.save(path)?;
    Ok(())
}
