use std::path::{Path, PathBuf};

use anyhow::Context as _;
use lopdf::{Dictionary, Document, Object, ObjectId};

use crate::foundation::core::{CellAddr, Rect, Target};
use crate::foundation::error::{GlyphreelError, GlyphreelResult};
use crate::layout::grid::{GridGeometry, cell_address};
use crate::table::occurrences::OccurrenceTable;

/// Page attributes a page may inherit from its page-tree ancestors and that a copied page
/// needs to render on its own.
const INHERITED_KEYS: [&[u8]; 3] = [b"MediaBox", b"Resources", b"Rotate"];

/// Catalog entries that reference pages of the source page tree.
const PAGE_BOUND_CATALOG_KEYS: [&[u8]; 2] = [b"Outlines", b"StructTreeRoot"];

const MAX_TREE_DEPTH: usize = 64;

/// The worksheet PDF every crop is taken from.
#[derive(Clone, Debug)]
pub struct SourceDocument {
    doc: Document,
    page_ids: Vec<ObjectId>,
}

impl SourceDocument {
    #[tracing::instrument]
    pub fn load(path: &Path) -> GlyphreelResult<Self> {
        let doc = Document::load(path).map_err(|e| {
            GlyphreelError::document(format!("failed to load '{}': {e}", path.display()))
        })?;
        Ok(Self::from_document(doc))
    }

    pub fn from_document(doc: Document) -> Self {
        let page_ids = doc.get_pages().into_values().collect();
        Self { doc, page_ids }
    }

    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    fn page_id(&self, page: usize) -> GlyphreelResult<ObjectId> {
        self.page_ids.get(page).copied().ok_or_else(|| {
            GlyphreelError::validation(format!(
                "page {page} requested but the document has {} pages",
                self.page_count()
            ))
        })
    }

    /// Effective media box of `page`, following page-tree inheritance.
    pub fn media_box(&self, page: usize) -> GlyphreelResult<Rect> {
        let id = self.page_id(page)?;
        let obj = inherited_attr(&self.doc, id, b"MediaBox").ok_or_else(|| {
            GlyphreelError::document(format!("page {page} has no MediaBox"))
        })?;
        rect_from_object(&self.doc, obj)
    }

    /// Grid geometry derived from page 0.
    pub fn grid(
        &self,
        vertical_cells: u32,
        padding_fraction: f64,
    ) -> GlyphreelResult<GridGeometry> {
        GridGeometry::from_media_box(self.media_box(0)?, vertical_cells, padding_fraction)
    }

    /// Build the document holding one cropped copy of a source page per occurrence of
    /// `target`, in page order and then occurrence order.
    #[tracing::instrument(skip(self, table, grid))]
    pub fn build_target_document(
        &self,
        table: &OccurrenceTable,
        target: Target,
        grid: &GridGeometry,
    ) -> GlyphreelResult<TargetDocument> {
        let mut doc = self.doc.clone();
        let pages_root = pages_root_id(&doc)?;

        let mut crops = Vec::new();
        let mut new_pages = Vec::new();
        for occ in table.occurrences(target) {
            let cell = cell_address(target, occ.index, occ.page == table.last_page());
            let rect = grid.crop_rect(cell);
            tracing::debug!(page = occ.page, index = occ.index, ?cell, "crop");

            let page = cropped_page_copy(&doc, self.page_id(occ.page)?, pages_root, rect)?;
            new_pages.push(page);
            crops.push(CropPlacement {
                page: occ.page,
                occurrence: occ.index,
                cell,
                rect,
            });
        }

        let kids: Vec<Object> = new_pages
            .into_iter()
            .map(|page| Object::Reference(doc.add_object(page)))
            .collect();
        let count = kids.len() as i64;

        let root = doc.get_object_mut(pages_root)?.as_dict_mut()?;
        root.set("Kids", kids);
        root.set("Count", count);

        let catalog_id = doc.trailer.get(b"Root")?.as_reference()?;
        let catalog = doc.get_object_mut(catalog_id)?.as_dict_mut()?;
        for key in PAGE_BOUND_CATALOG_KEYS {
            catalog.remove(key);
        }
        doc.prune_objects();

        Ok(TargetDocument { target, doc, crops })
    }
}

/// Where one output page was cropped from.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct CropPlacement {
    pub page: usize,
    pub occurrence: u32,
    pub cell: CellAddr,
    pub rect: Rect,
}

/// Per-target output document, one page per occurrence.
#[derive(Debug)]
pub struct TargetDocument {
    pub target: Target,
    pub doc: Document,
    pub crops: Vec<CropPlacement>,
}

impl TargetDocument {
    pub fn page_count(&self) -> usize {
        self.crops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.crops.is_empty()
    }

    /// Conventional file name, `<target>.pdf`.
    pub fn file_name(&self) -> String {
        format!("{}.pdf", self.target.name())
    }

    pub fn save(&mut self, path: &Path) -> GlyphreelResult<PathBuf> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create output directory '{}'", parent.display())
            })?;
        }
        self.doc
            .save(path)
            .with_context(|| format!("write pdf '{}'", path.display()))?;
        tracing::info!(
            character = %self.target,
            pages = self.page_count(),
            path = %path.display(),
            "wrote pdf"
        );
        Ok(path.to_path_buf())
    }
}

fn pages_root_id(doc: &Document) -> GlyphreelResult<ObjectId> {
    let catalog_id = doc.trailer.get(b"Root")?.as_reference()?;
    Ok(doc.get_dictionary(catalog_id)?.get(b"Pages")?.as_reference()?)
}

fn cropped_page_copy(
    doc: &Document,
    page_id: ObjectId,
    parent: ObjectId,
    rect: Rect,
) -> GlyphreelResult<Dictionary> {
    let mut page = doc.get_dictionary(page_id)?.clone();
    for key in INHERITED_KEYS {
        if page.get(key).is_err()
            && let Some(value) = inherited_attr(doc, page_id, key)
        {
            page.set(key, value.clone());
        }
    }
    page.set("Parent", Object::Reference(parent));
    page.set("CropBox", rect_to_object(rect));
    page.set("TrimBox", rect_to_object(rect));
    Ok(page)
}

/// Look `key` up on a page, then on each page-tree ancestor.
fn inherited_attr<'a>(doc: &'a Document, page_id: ObjectId, key: &[u8]) -> Option<&'a Object> {
    let mut node = doc.get_dictionary(page_id).ok()?;
    for _ in 0..MAX_TREE_DEPTH {
        if let Ok(value) = node.get(key) {
            return Some(value);
        }
        let parent = node.get(b"Parent").and_then(Object::as_reference).ok()?;
        node = doc.get_dictionary(parent).ok()?;
    }
    None
}

fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> GlyphreelResult<&'a Object> {
    match obj {
        Object::Reference(id) => Ok(doc.get_object(*id)?),
        other => Ok(other),
    }
}

fn number(doc: &Document, obj: &Object) -> GlyphreelResult<f64> {
    match resolve(doc, obj)? {
        Object::Integer(i) => Ok(*i as f64),
        Object::Real(r) => Ok(f64::from(*r)),
        other => Err(GlyphreelError::document(format!(
            "expected a number in page box, got {other:?}"
        ))),
    }
}

fn rect_from_object(doc: &Document, obj: &Object) -> GlyphreelResult<Rect> {
    let items = resolve(doc, obj)?.as_array()?;
    let [x0, y0, x1, y1] = items.as_slice() else {
        return Err(GlyphreelError::document(format!(
            "page box must have 4 numbers, got {}",
            items.len()
        )));
    };
    Ok(Rect::new(
        number(doc, x0)?,
        number(doc, y0)?,
        number(doc, x1)?,
        number(doc, y1)?,
    ))
}

fn rect_to_object(rect: Rect) -> Object {
    Object::Array(vec![
        rect.x0.into(),
        rect.y0.into(),
        rect.x1.into(),
        rect.y1.into(),
    ])
}

#[cfg(test)]
#[path = "../../tests/unit/extract/pdf.rs"]
mod tests;
