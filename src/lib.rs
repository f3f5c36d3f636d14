//! glyphreel turns a gridded handwriting-practice worksheet into one progress video per
//! practised character.
//!
//! # Pipeline overview
//!
//! 1. **Count**: a hand-authored [`OccurrenceTable`] says how many cells on each page hold
//!    each [`Target`] character.
//! 2. **Extract**: every occurrence becomes a copy of its source page whose crop and trim
//!    boxes are narrowed to one [`GridGeometry`] cell plus padding; copies are collected
//!    into `<target>.pdf`.
//! 3. **Rasterize**: each per-target PDF is rendered at 500 dpi through the crop box
//!    (system `pdftoppm`).
//! 4. **Overlay + encode**: frames get a red-to-green progress bar, are saved as numbered
//!    PNGs and joined into `<target>.mp4` by the system `ffmpeg`.
//!
//! Any failure aborts the run; partially written artifacts are left in place.
#![forbid(unsafe_code)]

pub mod encode;
pub mod extract;
pub mod foundation;
pub mod layout;
pub mod overlay;
pub mod pipeline;
pub mod raster;
pub mod table;

#[cfg(test)]
#[path = "../tests/unit/support.rs"]
pub(crate) mod test_support;

pub use encode::ffmpeg::{
    EncodeConfig, default_mp4_config, encode_image_sequence, ensure_parent_dir,
    is_ffmpeg_on_path,
};
pub use extract::pdf::{CropPlacement, SourceDocument, TargetDocument};
pub use foundation::core::{CellAddr, Rect, Rgb, TARGET_COUNT, Target};
pub use foundation::error::{GlyphreelError, GlyphreelResult};
pub use layout::grid::{GridGeometry, PADDING_FRACTION, VERTICAL_CELLS, cell_address};
pub use overlay::progress::{
    BAR_THICKNESS, Gradient, annotate_sequence, bar_length, draw_progress_bar, frame_digits,
    frame_file_name, frame_pattern, progress_fraction, save_frames,
};
pub use pipeline::{
    DEFAULT_INPUT, PipelineConfig, RunSummary, Stage, TargetSummary, process_target, run,
    run_loaded,
};
pub use raster::pdftoppm::{DEFAULT_DPI, RasterOpts, is_pdftoppm_on_path, rasterize_pdf};
pub use table::occurrences::{Occurrence, OccurrenceTable, OccurrenceTotals, WORKSHEET_COUNTS};
