//! PNG snapshot of the measurement table for sharing.
//!
//! Same layout as the workbook: a band of measurement headers, a band of
//! point headers under the `Medición` corner, then one `Manto n` row per
//! layer. Filled cells are tinted by their threshold classification. Text is
//! set in an embedded DejaVu Sans so rendering does not depend on system fonts.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use image::RgbImage;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{register_font, FontDesc, FontFamily, FontStyle};

use super::table::{TableRow, CORNER_HEADER, MEASUREMENT_HEADERS, POINT_HEADERS, VALUE_COLUMNS};
use crate::grid::Threshold;

type DrawResult<T> = std::result::Result<T, Box<dyn std::error::Error>>;

const FONT_REGULAR: &[u8] = include_bytes!("../../assets/DejaVuSans.ttf");
const FONT_BOLD: &[u8] = include_bytes!("../../assets/DejaVuSans-Bold.ttf");
const FONT_SIZE: f64 = 14.0;

const LABEL_W: i32 = 92;
const CELL_W: i32 = 64;
const ROW_H: i32 = 28;
const MARGIN: i32 = 8;
const HEADER_ROWS: i32 = 2;

const HEADER_BG: RGBColor = RGBColor(235, 235, 235);
const BELOW_BG: RGBColor = RGBColor(255, 199, 206);
const ABOVE_BG: RGBColor = RGBColor(198, 239, 206);

fn canvas_size(rows: usize) -> (u32, u32) {
    let width = 2 * MARGIN + LABEL_W + VALUE_COLUMNS as i32 * CELL_W;
    let height = 2 * MARGIN + (HEADER_ROWS + rows as i32) * ROW_H;
    (width as u32, height as u32)
}

fn cell_background(value: &str) -> RGBColor {
    match Threshold::classify(value) {
        Some(Threshold::Below) => BELOW_BG,
        Some(Threshold::AtOrAbove) => ABOVE_BG,
        None => WHITE,
    }
}

/// Draw one bordered cell of width `w` at (x, y) with `text` centered in it
fn draw_cell(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    (x, y, w): (i32, i32, i32),
    text: &str,
    fill: RGBColor,
    bold: bool,
) -> DrawResult<()> {
    let corners = [(x, y), (x + w, y + ROW_H)];
    area.draw(&Rectangle::new(corners, fill.filled()))?;
    area.draw(&Rectangle::new(corners, BLACK.stroke_width(1)))?;
    if text.is_empty() {
        return Ok(());
    }

    let weight = if bold { FontStyle::Bold } else { FontStyle::Normal };
    let style = FontDesc::new(FontFamily::SansSerif, FONT_SIZE, weight)
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Center));
    area.draw(&Text::new(text.to_string(), (x + w / 2, y + ROW_H / 2), style))?;
    Ok(())
}

fn draw_table(buffer: &mut [u8], size: (u32, u32), rows: &[TableRow]) -> DrawResult<()> {
    let family = FontFamily::SansSerif.as_str();
    register_font(family, FontStyle::Normal, FONT_REGULAR).map_err(|_| "invalid regular font")?;
    register_font(family, FontStyle::Bold, FONT_BOLD).map_err(|_| "invalid bold font")?;

    let root = BitMapBackend::with_buffer(buffer, size).into_drawing_area();
    root.fill(&WHITE)?;

    let left = MARGIN + LABEL_W;
    let band = POINT_HEADERS.len() as i32 * CELL_W;

    // Measurement band
    draw_cell(&root, (MARGIN, MARGIN, LABEL_W), "", HEADER_BG, true)?;
    for (m, header) in MEASUREMENT_HEADERS.iter().enumerate() {
        let x = left + m as i32 * band;
        draw_cell(&root, (x, MARGIN, band), header, HEADER_BG, true)?;
    }

    // Point band
    let y = MARGIN + ROW_H;
    draw_cell(&root, (MARGIN, y, LABEL_W), CORNER_HEADER, HEADER_BG, true)?;
    for (c, header) in POINT_HEADERS.iter().cycle().take(VALUE_COLUMNS).enumerate() {
        let x = left + c as i32 * CELL_W;
        draw_cell(&root, (x, y, CELL_W), header, HEADER_BG, true)?;
    }

    for (r, row) in rows.iter().enumerate() {
        let y = MARGIN + (HEADER_ROWS + r as i32) * ROW_H;
        draw_cell(&root, (MARGIN, y, LABEL_W), &row.label, WHITE, false)?;
        for (c, value) in row.cells.iter().enumerate() {
            let x = left + c as i32 * CELL_W;
            draw_cell(&root, (x, y, CELL_W), value, cell_background(value), false)?;
        }
    }

    root.present()?;
    Ok(())
}

/// Render the table to an image
pub fn render_table(rows: &[TableRow]) -> Result<RgbImage> {
    let (width, height) = canvas_size(rows.len());
    let mut buffer = vec![0u8; width as usize * height as usize * 3];
    draw_table(&mut buffer, (width, height), rows)
        .map_err(|e| anyhow!("Failed to draw snapshot: {e}"))?;
    RgbImage::from_raw(width, height, buffer).context("Snapshot buffer does not match its size")
}

/// Render and write the snapshot as PNG
pub fn save_snapshot(path: &Path, rows: &[TableRow]) -> Result<()> {
    render_table(rows)?
        .save(path)
        .with_context(|| format!("Failed to save snapshot: {path:?}"))
}
