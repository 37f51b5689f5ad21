//! Photos on disk, one directory per inspection.
//!
//! Files are named `{item id}_{item slug}_{n}.jpg`. The next `n` for an item
//! is one past the highest index already present, so deleting a photo never
//! causes a later one to overwrite another.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::ImageFormat;

use super::checklist::{ChecklistItem, Section, ITEMS};
use crate::data::Inspection;
use crate::export::{base_name, slugify};

const EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Expected checklist items with at least one photo
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PhotoProgress {
    pub taken: usize,
    pub total: usize,
}

impl PhotoProgress {
    pub fn is_complete(&self) -> bool {
        self.taken >= self.total
    }
}

fn is_image_name(name: &str) -> bool {
    name.rsplit_once('.')
        .is_some_and(|(_, ext)| EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

fn parse_digits(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Item id in front of the first underscore
fn leading_item_id(name: &str) -> Option<u32> {
    let (id, _) = name.split_once('_')?;
    parse_digits(id)
}

/// `n` of a `..._{n}.{ext}` file name
fn photo_index(name: &str) -> Option<u32> {
    if !is_image_name(name) {
        return None;
    }
    let (stem, _) = name.rsplit_once('.')?;
    let (_, digits) = stem.rsplit_once('_')?;
    parse_digits(digits).filter(|n| *n > 0)
}

fn item_prefix(item: &ChecklistItem) -> String {
    format!("{}_{}_", item.id, slugify(item.name))
}

#[derive(Debug, Clone)]
pub struct PhotoStore {
    root: PathBuf,
}

impl PhotoStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        PhotoStore { root: root.into() }
    }

    /// `<root>/<number>-<slug>`
    pub fn inspection_dir(&self, inspection: &Inspection) -> PathBuf {
        self.root
            .join(base_name(inspection.number, &inspection.name))
    }

    /// Image file names in the inspection directory, sorted
    fn files(&self, inspection: &Inspection) -> Result<Vec<String>> {
        let dir = self.inspection_dir(inspection);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in fs::read_dir(&dir).with_context(|| format!("Failed to list {dir:?}"))? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if is_image_name(name) {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    pub fn photos_for_item(
        &self,
        inspection: &Inspection,
        item: &ChecklistItem,
    ) -> Result<Vec<String>> {
        let prefix = item_prefix(item);
        Ok(self
            .files(inspection)?
            .into_iter()
            .filter(|name| name.starts_with(&prefix))
            .collect())
    }

    /// Index the next photo of `item` gets
    pub fn next_index(&self, inspection: &Inspection, item: &ChecklistItem) -> Result<u32> {
        let highest = self
            .photos_for_item(inspection, item)?
            .iter()
            .filter_map(|name| photo_index(name))
            .max()
            .unwrap_or(0);
        Ok(highest + 1)
    }

    /// Photo count of every checklist item, from a single directory listing
    pub fn counts(&self, inspection: &Inspection) -> Result<HashMap<u32, usize>> {
        let files = self.files(inspection)?;
        Ok(ITEMS
            .iter()
            .map(|item| {
                let prefix = item_prefix(item);
                let count = files.iter().filter(|name| name.starts_with(&prefix)).count();
                (item.id, count)
            })
            .collect())
    }

    pub fn progress(
        &self,
        inspection: &Inspection,
        expected: &[&ChecklistItem],
    ) -> Result<PhotoProgress> {
        let taken_ids: HashSet<u32> = self
            .files(inspection)?
            .iter()
            .filter_map(|name| leading_item_id(name))
            .collect();
        Ok(PhotoProgress {
            taken: expected.iter().filter(|item| taken_ids.contains(&item.id)).count(),
            total: expected.len(),
        })
    }

    /// Copy `source` in as the next photo of `item`, re-encoded as JPEG
    pub fn attach(
        &self,
        inspection: &Inspection,
        item: &ChecklistItem,
        source: &Path,
    ) -> Result<PathBuf> {
        let image =
            image::open(source).with_context(|| format!("Failed to read image: {source:?}"))?;

        let dir = self.inspection_dir(inspection);
        fs::create_dir_all(&dir).with_context(|| format!("Failed to create directory: {dir:?}"))?;
        let index = self.next_index(inspection, item)?;
        let dest = dir.join(format!("{}{index}.jpg", item_prefix(item)));

        image
            .to_rgb8()
            .save_with_format(&dest, ImageFormat::Jpeg)
            .with_context(|| format!("Failed to write photo: {dest:?}"))?;
        tracing::info!(
            inspection = inspection.id,
            item = item.id,
            photo = %dest.display(),
            "photo attached"
        );
        Ok(dest)
    }

    /// Delete the photos of every item in `section`. A file that cannot be
    /// removed is logged and skipped. Returns how many were removed.
    pub fn delete_section(&self, inspection: &Inspection, section: Section) -> Result<usize> {
        let ids: HashSet<u32> = section.items().map(|item| item.id).collect();
        let dir = self.inspection_dir(inspection);
        let mut removed = 0;
        for name in self.files(inspection)? {
            if !leading_item_id(&name).is_some_and(|id| ids.contains(&id)) {
                continue;
            }
            match fs::remove_file(dir.join(&name)) {
                Ok(()) => removed += 1,
                Err(e) => tracing::warn!(file = %name, "failed to delete photo: {e}"),
            }
        }
        tracing::info!(
            inspection = inspection.id,
            section = section.title(),
            removed,
            "section photos deleted"
        );
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use image::RgbImage;
    use tempfile::TempDir;

    use super::*;
    use crate::data::MachineRoom;
    use crate::photos::checklist::{expected_items, find_item};

    fn inspection() -> Inspection {
        Inspection {
            id: 1,
            number: 12,
            name: "Torre Ñandú".to_string(),
            has_fourth_layer: false,
            machine_room: MachineRoom::Yes,
            export_count: 0,
            last_image_path: None,
            last_exported_at: None,
        }
    }

    fn item(id: u32) -> &'static ChecklistItem {
        find_item(id).unwrap()
    }

    fn source_png(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("capture.png");
        RgbImage::from_pixel(4, 3, image::Rgb([200, 10, 10]))
            .save(&path)
            .unwrap();
        path
    }

    #[test]
    fn test_file_name_parsing() {
        assert_eq!(leading_item_id("101_fotografia_3.jpg"), Some(101));
        assert_eq!(leading_item_id("x1_foo.jpg"), None);
        assert_eq!(photo_index("101_fotografia-general_3.JPG"), Some(3));
        assert_eq!(photo_index("101_fotografia-general_0.jpg"), None);
        assert_eq!(photo_index("101_fotografia-general_3.gif"), None);
        assert!(is_image_name("a.jpeg"));
        assert!(!is_image_name("notes.txt"));
    }

    #[test]
    fn test_attach_names_photos_in_sequence() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let store = PhotoStore::new(dir.path().join("photos"));
        let source = source_png(&dir);
        let inspection = inspection();

        let first = store.attach(&inspection, item(101), &source).unwrap();
        let second = store.attach(&inspection, item(101), &source).unwrap();
        let folder = dir.path().join("photos").join("12-torre-nandu");
        assert_eq!(
            first,
            folder.join("101_fotografia-general-de-los-ascensores_1.jpg")
        );
        assert_eq!(
            second,
            folder.join("101_fotografia-general-de-los-ascensores_2.jpg")
        );
        assert!(image::open(&first).is_ok());
        assert_eq!(store.photos_for_item(&inspection, item(101)).unwrap().len(), 2);
    }

    #[test]
    fn test_next_index_continues_after_highest() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let store = PhotoStore::new(dir.path());
        let inspection = inspection();
        assert_eq!(store.next_index(&inspection, item(202)).unwrap(), 1);

        let folder = store.inspection_dir(&inspection);
        fs::create_dir_all(&folder).unwrap();
        fs::write(folder.join("202_luz-emergencia_7.png"), b"").unwrap();
        fs::write(folder.join("202_luz-emergencia_2.jpg"), b"").unwrap();
        fs::write(folder.join("202_luz-emergencia_x.jpg"), b"").unwrap();
        assert_eq!(store.next_index(&inspection, item(202)).unwrap(), 8);
    }

    #[test]
    fn test_unreadable_source_writes_nothing() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let store = PhotoStore::new(dir.path().join("photos"));
        let bogus = dir.path().join("notes.jpg");
        fs::write(&bogus, b"not an image").unwrap();

        assert!(store.attach(&inspection(), item(101), &bogus).is_err());
        assert!(store.photos_for_item(&inspection(), item(101)).unwrap().is_empty());
    }

    #[test]
    fn test_counts_and_progress() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let store = PhotoStore::new(dir.path().join("photos"));
        let source = source_png(&dir);
        let inspection = inspection();
        let expected = expected_items(MachineRoom::Yes);

        let empty = store.progress(&inspection, &expected).unwrap();
        assert_eq!(empty, PhotoProgress { taken: 0, total: 35 });

        store.attach(&inspection, item(101), &source).unwrap();
        store.attach(&inspection, item(101), &source).unwrap();
        store.attach(&inspection, item(501), &source).unwrap();
        // Belongs to the section for sites without a machine room
        store.attach(&inspection, item(211), &source).unwrap();

        let counts = store.counts(&inspection).unwrap();
        assert_eq!(counts[&101], 2);
        assert_eq!(counts[&501], 1);
        assert_eq!(counts[&111], 0);

        let progress = store.progress(&inspection, &expected).unwrap();
        assert_eq!(progress, PhotoProgress { taken: 2, total: 35 });
        assert!(!progress.is_complete());
    }

    #[test]
    fn test_delete_section_keeps_other_sections() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let store = PhotoStore::new(dir.path().join("photos"));
        let source = source_png(&dir);
        let inspection = inspection();

        store.attach(&inspection, item(301), &source).unwrap();
        store.attach(&inspection, item(399), &source).unwrap();
        store.attach(&inspection, item(401), &source).unwrap();

        assert_eq!(store.delete_section(&inspection, Section::Cabin).unwrap(), 2);
        let counts = store.counts(&inspection).unwrap();
        assert_eq!(counts[&301], 0);
        assert_eq!(counts[&401], 1);
        assert_eq!(store.delete_section(&inspection, Section::Cabin).unwrap(), 0);
    }
}
