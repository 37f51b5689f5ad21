//! SQLite storage for inspections, points and settings.
//!
//! Schema:
//! - `inspections`: id, number (unique), name, has_fourth_layer, export_count,
//!   last_image_path, last_exported_at, machine_room ('yes', 'no' or NULL)
//! - `points`: one row per (inspection, layer, measurement, point), cascading
//!   on inspection delete; `value` holds the canonical text or ''
//! - `settings`: key/value pairs

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::error::FormError;
use super::models::{Inspection, InspectionDraft, InspectionSummary, MachineRoom, PointsMap};
use crate::grid::{AxisOrder, Coordinate, AXIS_ORDER_KEY};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS inspections (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        number INTEGER NOT NULL UNIQUE,
        name TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS points (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        inspection_id INTEGER NOT NULL,
        layer INTEGER NOT NULL,
        measurement INTEGER NOT NULL,
        point INTEGER NOT NULL,
        value TEXT,
        UNIQUE(inspection_id, layer, measurement, point),
        FOREIGN KEY(inspection_id) REFERENCES inspections(id) ON DELETE CASCADE
    );

    CREATE TABLE IF NOT EXISTS settings (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );
";

/// Columns added after the first schema version, with their declarations
const ADDED_COLUMNS: [(&str, &str); 5] = [
    ("has_fourth_layer", "INTEGER NOT NULL DEFAULT 1"),
    ("export_count", "INTEGER NOT NULL DEFAULT 0"),
    ("last_image_path", "TEXT"),
    ("last_exported_at", "TEXT"),
    ("machine_room", "TEXT"),
];

const INSPECTION_COLUMNS: &str = "id, number, name, has_fourth_layer, export_count, \
     last_image_path, last_exported_at, machine_room";

/// Access to the measurement values of inspections
pub trait PointStore {
    fn get_point_value(&self, inspection_id: i64, coord: Coordinate) -> Result<Option<String>>;
    fn set_point_value(&self, inspection_id: i64, coord: Coordinate, value: &str) -> Result<()>;
    fn list_points(&self, inspection_id: i64) -> Result<Vec<(Coordinate, Option<String>)>>;
}

/// Process-wide key/value settings
pub trait SettingsStore {
    fn get_setting(&self, key: &str, default: &str) -> Result<String>;
    fn set_setting(&self, key: &str, value: &str) -> Result<()>;

    /// Configured axis order; read failures fall back to the default
    fn axis_order(&self) -> AxisOrder {
        let default = AxisOrder::default().to_setting();
        match self.get_setting(AXIS_ORDER_KEY, &default) {
            Ok(value) => AxisOrder::from_setting(&value),
            Err(e) => {
                tracing::warn!("failed to read axis order, using default: {e:#}");
                AxisOrder::default()
            }
        }
    }

    fn set_axis_order(&self, order: AxisOrder) -> Result<()> {
        self.set_setting(AXIS_ORDER_KEY, &order.to_setting())
    }
}

/// Parse a stored RFC 3339 timestamp
fn parse_timestamp(timestamp: Option<String>) -> Option<DateTime<Utc>> {
    timestamp.and_then(|t| {
        DateTime::parse_from_rfc3339(&t)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
    })
}

fn inspection_from_row(row: &Row) -> rusqlite::Result<Inspection> {
    Ok(Inspection {
        id: row.get(0)?,
        number: row.get(1)?,
        name: row.get(2)?,
        has_fourth_layer: row.get(3)?,
        export_count: row.get(4)?,
        last_image_path: row.get(5)?,
        last_exported_at: parse_timestamp(row.get(6)?),
        machine_room: MachineRoom::from_key(row.get::<_, Option<String>>(7)?.as_deref()),
    })
}

/// Map a raw (layer, measurement, point) triple, skipping rows outside the grid
fn coordinate_from_row(row: &Row, first: usize) -> rusqlite::Result<Option<Coordinate>> {
    let layer: u8 = row.get(first)?;
    let measurement: u8 = row.get(first + 1)?;
    let point: u8 = row.get(first + 2)?;
    Ok(Coordinate::new(layer, measurement, point))
}

/// SQLite-backed record and settings store
pub struct Storage {
    conn: Connection,
}

impl Storage {
    /// Open or create the database at `path`
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {parent:?}"))?;
        }
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {path:?}"))?;
        Self::init(conn)
    }

    /// Create an in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA).context("Failed to create schema")?;
        let storage = Storage { conn };
        storage.migrate()?;
        Ok(storage)
    }

    /// Add columns that older databases lack
    fn migrate(&self) -> Result<()> {
        let mut stmt = self.conn.prepare("PRAGMA table_info(inspections)")?;
        let existing = stmt
            .query_map([], |row| row.get::<_, String>(1))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        drop(stmt);

        for (column, decl) in ADDED_COLUMNS {
            if !existing.iter().any(|c| c == column) {
                tracing::info!(column, "adding missing inspections column");
                self.conn
                    .execute_batch(&format!(
                        "ALTER TABLE inspections ADD COLUMN {column} {decl};"
                    ))
                    .with_context(|| format!("Failed to add column {column}"))?;
            }
        }
        Ok(())
    }

    /// List inspections with their filled point counts, highest number first
    pub fn list_inspections(&self) -> Result<Vec<InspectionSummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT i.id, i.number, i.name, i.has_fourth_layer, i.export_count,
                    i.last_image_path, i.last_exported_at, i.machine_room,
                    COALESCE(SUM(
                        CASE
                            WHEN TRIM(COALESCE(p.value, '')) <> ''
                                 AND (p.layer < 4 OR i.has_fourth_layer = 1) THEN 1
                            ELSE 0
                        END
                    ), 0) AS filled
             FROM inspections i
             LEFT JOIN points p ON p.inspection_id = i.id
             GROUP BY i.id
             ORDER BY i.number DESC",
        )?;

        let rows = stmt.query_map([], |row| {
            let inspection = inspection_from_row(row)?;
            let filled: i64 = row.get(8)?;
            Ok(InspectionSummary {
                inspection,
                filled: usize::try_from(filled).unwrap_or(0),
            })
        })?;

        let summaries = rows
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("Failed to list inspections")?;
        Ok(summaries)
    }

    pub fn get_inspection(&self, id: i64) -> Result<Option<Inspection>> {
        self.conn
            .query_row(
                &format!("SELECT {INSPECTION_COLUMNS} FROM inspections WHERE id = ?1"),
                [id],
                inspection_from_row,
            )
            .optional()
            .with_context(|| format!("Failed to load inspection {id}"))
    }

    pub fn find_by_number(&self, number: i64) -> Result<Option<Inspection>> {
        self.conn
            .query_row(
                &format!("SELECT {INSPECTION_COLUMNS} FROM inspections WHERE number = ?1"),
                [number],
                inspection_from_row,
            )
            .optional()
            .with_context(|| format!("Failed to look up inspection number {number}"))
    }

    /// Suggested number for a new inspection: one past the highest, or 1
    pub fn next_number(&self) -> Result<i64> {
        let max: Option<i64> = self
            .conn
            .query_row("SELECT MAX(number) FROM inspections", [], |row| row.get(0))?;
        Ok(max.map_or(1, |n| n + 1))
    }

    /// Fail with [`FormError::DuplicateNumber`] if another inspection uses `number`
    fn check_unique_number(&self, number: i64, except_id: Option<i64>) -> Result<()> {
        let taken: Option<i64> = self
            .conn
            .query_row(
                "SELECT id FROM inspections WHERE number = ?1 AND id <> ?2",
                params![number, except_id.unwrap_or(-1)],
                |row| row.get(0),
            )
            .optional()?;
        if taken.is_some() {
            return Err(FormError::DuplicateNumber(number).into());
        }
        Ok(())
    }

    /// Create an inspection and its 48 empty points. Returns the new id.
    pub fn create_inspection(&mut self, draft: &InspectionDraft) -> Result<i64> {
        let name = draft.validate()?;
        self.check_unique_number(draft.number, None)?;

        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO inspections (number, name, has_fourth_layer, machine_room)
             VALUES (?1, ?2, ?3, ?4)",
            params![draft.number, name, draft.has_fourth_layer, draft.machine_room.key()],
        )?;
        let id = tx.last_insert_rowid();
        {
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO points (inspection_id, layer, measurement, point, value)
                 VALUES (?1, ?2, ?3, ?4, '')",
            )?;
            for c in Coordinate::all() {
                stmt.execute(params![id, c.layer, c.measurement, c.point])?;
            }
        }
        tx.commit().context("Failed to create inspection")?;

        tracing::info!(id, number = draft.number, "inspection created");
        Ok(id)
    }

    pub fn update_inspection(&self, id: i64, draft: &InspectionDraft) -> Result<()> {
        let name = draft.validate()?;
        self.check_unique_number(draft.number, Some(id))?;
        let changed = self.conn.execute(
            "UPDATE inspections
             SET number = ?1, name = ?2, has_fourth_layer = ?3, machine_room = ?4
             WHERE id = ?5",
            params![
                draft.number,
                name,
                draft.has_fourth_layer,
                draft.machine_room.key(),
                id
            ],
        )?;
        if changed == 0 {
            anyhow::bail!("Inspection {id} not found");
        }
        tracing::info!(id, number = draft.number, "inspection updated");
        Ok(())
    }

    /// Delete an inspection; its points go with it
    pub fn delete_inspection(&self, id: i64) -> Result<()> {
        self.conn
            .execute("DELETE FROM inspections WHERE id = ?1", [id])
            .with_context(|| format!("Failed to delete inspection {id}"))?;
        tracing::info!(id, "inspection deleted");
        Ok(())
    }

    /// Stored values of an inspection, unset points as empty strings
    pub fn points_map(&self, inspection_id: i64) -> Result<PointsMap> {
        Ok(self
            .list_points(inspection_id)?
            .into_iter()
            .map(|(c, v)| (c, v.unwrap_or_default()))
            .collect())
    }

    /// Record a finished export
    pub fn record_export(
        &self,
        id: i64,
        export_count: i64,
        image_path: &str,
        exported_at: DateTime<Utc>,
    ) -> Result<()> {
        self.conn
            .execute(
                "UPDATE inspections
                 SET export_count = ?1, last_image_path = ?2, last_exported_at = ?3
                 WHERE id = ?4",
                params![export_count, image_path, exported_at.to_rfc3339(), id],
            )
            .with_context(|| format!("Failed to record export of inspection {id}"))?;
        Ok(())
    }
}

impl PointStore for Storage {
    fn get_point_value(&self, inspection_id: i64, coord: Coordinate) -> Result<Option<String>> {
        let value: Option<Option<String>> = self
            .conn
            .query_row(
                "SELECT value FROM points
                 WHERE inspection_id = ?1 AND layer = ?2 AND measurement = ?3 AND point = ?4",
                params![inspection_id, coord.layer, coord.measurement, coord.point],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value.flatten())
    }

    fn set_point_value(&self, inspection_id: i64, coord: Coordinate, value: &str) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE points SET value = ?1
             WHERE inspection_id = ?2 AND layer = ?3 AND measurement = ?4 AND point = ?5",
            params![value, inspection_id, coord.layer, coord.measurement, coord.point],
        )?;
        if changed == 0 {
            anyhow::bail!("Point {coord} of inspection {inspection_id} not found");
        }
        Ok(())
    }

    fn list_points(&self, inspection_id: i64) -> Result<Vec<(Coordinate, Option<String>)>> {
        let mut stmt = self.conn.prepare(
            "SELECT layer, measurement, point, value FROM points
             WHERE inspection_id = ?1
             ORDER BY layer, measurement, point",
        )?;
        let rows = stmt.query_map([inspection_id], |row| {
            Ok((coordinate_from_row(row, 0)?, row.get::<_, Option<String>>(3)?))
        })?;

        let mut points = Vec::new();
        for row in rows {
            if let (Some(coord), value) = row? {
                points.push((coord, value));
            }
        }
        Ok(points)
    }
}

impl SettingsStore for Storage {
    fn get_setting(&self, key: &str, default: &str) -> Result<String> {
        let value: Option<String> = self
            .conn
            .query_row("SELECT value FROM settings WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()
            .with_context(|| format!("Failed to read setting {key}"))?;
        Ok(value.unwrap_or_else(|| default.to_string()))
    }

    fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO settings (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![key, value],
            )
            .with_context(|| format!("Failed to write setting {key}"))?;
        Ok(())
    }
}
