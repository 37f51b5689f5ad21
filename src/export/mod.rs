//! Export of a completed inspection as a workbook plus an image snapshot.

mod snapshot;
mod table;
mod xlsx;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use thiserror::Error;

use crate::data::Storage;
use crate::grid::{AxisOrder, GridProgress};
use crate::search::fold_accents;

/// Reasons an export is refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExportError {
    #[error("Inspection {0} not found")]
    NotFound(i64),
    #[error("Inspection {number} is incomplete ({filled}/{total} points)")]
    Incomplete {
        number: i64,
        filled: usize,
        total: usize,
    },
}

/// Files written by a successful export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOutcome {
    pub workbook: PathBuf,
    pub image: PathBuf,
    pub export_count: i64,
}

/// File-name friendly form: accents folded, non-alphanumeric runs collapsed
/// to "-", lower-case, no leading or trailing dash
pub fn slugify(s: &str) -> String {
    let mut slug = String::with_capacity(s.len());
    let mut gap = false;
    for c in fold_accents(s) {
        if c.is_ascii_alphanumeric() {
            if gap && !slug.is_empty() {
                slug.push('-');
            }
            gap = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            gap = true;
        }
    }
    slug
}

/// Base file name for an inspection, e.g. `12-torre-b`
pub(crate) fn base_name(number: i64, name: &str) -> String {
    let slug = slugify(name);
    if slug.is_empty() {
        number.to_string()
    } else {
        format!("{number}-{slug}")
    }
}

/// Export inspection `id`: write the workbook to `excel_dir`, the snapshot to
/// `image_dir`, then bump the export counter and remember the image path.
/// Refuses incomplete inspections.
pub fn export_inspection(
    storage: &Storage,
    excel_dir: &Path,
    image_dir: &Path,
    id: i64,
) -> Result<ExportOutcome> {
    let inspection = storage
        .get_inspection(id)?
        .ok_or(ExportError::NotFound(id))?;
    let points = storage.points_map(id)?;

    let progress = GridProgress::compute(&points, inspection.has_fourth_layer, AxisOrder::default());
    if !progress.is_complete() {
        return Err(ExportError::Incomplete {
            number: inspection.number,
            filled: progress.filled,
            total: progress.total,
        }
        .into());
    }

    std::fs::create_dir_all(excel_dir)
        .with_context(|| format!("Failed to create directory: {excel_dir:?}"))?;
    std::fs::create_dir_all(image_dir)
        .with_context(|| format!("Failed to create directory: {image_dir:?}"))?;

    let rows = table::table_rows(&points, inspection.has_fourth_layer);
    let base = base_name(inspection.number, &inspection.name);

    let workbook = excel_dir.join(format!("{base}.xlsx"));
    xlsx::write_workbook(&workbook, &rows)
        .with_context(|| format!("Failed to write workbook: {workbook:?}"))?;

    let export_count = inspection.export_count + 1;
    let image = image_dir.join(format!("{base}-{export_count}.png"));
    snapshot::save_snapshot(&image, &rows)
        .with_context(|| format!("Failed to write image: {image:?}"))?;

    storage.record_export(id, export_count, &image.to_string_lossy(), Utc::now())?;
    tracing::info!(
        id,
        number = inspection.number,
        workbook = %workbook.display(),
        image = %image.display(),
        "inspection exported"
    );

    Ok(ExportOutcome {
        workbook,
        image,
        export_count,
    })
}
