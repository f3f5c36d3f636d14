use crate::foundation::core::{CellAddr, Rect, Target};
use crate::foundation::error::{GlyphreelError, GlyphreelResult};

/// Cells stacked along the page height of the worksheet.
pub const VERTICAL_CELLS: u32 = 18;
/// Crop margin around a cell, as a fraction of the cell size.
pub const PADDING_FRACTION: f64 = 0.1;

/// Square cell grid laid over every page, derived once from page 0.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct GridGeometry {
    pub page_width: f64,
    pub page_height: f64,
    pub vertical_cells: u32,
    pub cell_size: f64,
    pub padding: f64,
}

impl GridGeometry {
    pub fn new(
        page_width: f64,
        page_height: f64,
        vertical_cells: u32,
        padding_fraction: f64,
    ) -> GlyphreelResult<Self> {
        if !(page_width > 0.0 && page_height > 0.0) {
            return Err(GlyphreelError::validation(format!(
                "page size must be non-zero, got {page_width}x{page_height}"
            )));
        }
        if vertical_cells == 0 {
            return Err(GlyphreelError::validation(
                "grid must have at least one vertical cell",
            ));
        }
        let cell_size = page_height / f64::from(vertical_cells);
        Ok(Self {
            page_width,
            page_height,
            vertical_cells,
            cell_size,
            padding: cell_size * padding_fraction,
        })
    }

    /// Grid over a page's media box. The upper-right corner is taken as the page extent, so
    /// the box is assumed to start at the origin.
    pub fn from_media_box(
        media_box: Rect,
        vertical_cells: u32,
        padding_fraction: f64,
    ) -> GlyphreelResult<Self> {
        Self::new(media_box.x1, media_box.y1, vertical_cells, padding_fraction)
    }

    /// Cells across the page width; not necessarily integral.
    pub fn horizontal_cells(&self) -> f64 {
        self.page_width / self.cell_size
    }

    /// Crop/trim rectangle for `cell`: the cell grown by the padding on every side.
    pub fn crop_rect(&self, cell: CellAddr) -> Rect {
        let s = self.cell_size;
        let p = self.padding;
        let i = f64::from(cell.col);
        let j = f64::from(cell.row);
        Rect::new(i * s - p, j * s - p, (i + 1.0) * s + p, (j + 1.0) * s + p)
    }
}

/// Grid cell holding the `occurrence_index`-th instance of `target` on a page.
///
/// Each target owns one column (`2 + 2 * target`), filled top-down every other row from
/// row 16. The final worksheet page holds more "shi" than that column fits, so its
/// instances from index 8 on continue in column 6 from row 6 downwards.
pub fn cell_address(target: Target, occurrence_index: u32, is_last_page: bool) -> CellAddr {
    let idx = occurrence_index as i32;
    if is_last_page && target == Target::Shi && idx >= 8 {
        return CellAddr::new(6, 6 - 2 * (idx - 8));
    }
    CellAddr::new(2 + 2 * target.index() as i32, 16 - 2 * idx)
}

#[cfg(test)]
#[path = "../../tests/unit/layout/grid.rs"]
mod tests;
