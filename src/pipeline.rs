use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::encode::ffmpeg::{DEFAULT_CODEC, DEFAULT_FPS, EncodeConfig, encode_image_sequence};
use crate::extract::pdf::SourceDocument;
use crate::foundation::core::Target;
use crate::foundation::error::{GlyphreelError, GlyphreelResult};
use crate::layout::grid::{GridGeometry, PADDING_FRACTION, VERTICAL_CELLS};
use crate::overlay::progress::{
    BAR_THICKNESS, annotate_sequence, frame_digits, frame_pattern, save_frames,
};
use crate::raster::pdftoppm::{DEFAULT_DPI, RasterOpts, rasterize_pdf};
use crate::table::occurrences::{OccurrenceTable, OccurrenceTotals};

/// Worksheet every run reads unless told otherwise.
pub const DEFAULT_INPUT: &str = "counting-wo-shi-hen-ni.pdf";

/// Everything a run needs. `Default` reproduces the worksheet constants.
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    pub input: PathBuf,
    /// Directory receiving every PDF, PNG and MP4.
    pub out_dir: PathBuf,
    pub vertical_cells: u32,
    pub padding_fraction: f64,
    pub dpi: u32,
    pub fps: u32,
    pub codec: String,
    pub bar_thickness: u32,
    pub overwrite: bool,
    /// Process the targets concurrently instead of one after another.
    pub parallel: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            out_dir: PathBuf::from("."),
            vertical_cells: VERTICAL_CELLS,
            padding_fraction: PADDING_FRACTION,
            dpi: DEFAULT_DPI,
            fps: DEFAULT_FPS,
            codec: DEFAULT_CODEC.to_owned(),
            bar_thickness: BAR_THICKNESS,
            overwrite: true,
            parallel: false,
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> GlyphreelResult<()> {
        if self.vertical_cells == 0 {
            return Err(GlyphreelError::validation(
                "vertical cell count must be non-zero",
            ));
        }
        if !(0.0..0.5).contains(&self.padding_fraction) {
            return Err(GlyphreelError::validation(format!(
                "padding fraction must be in [0, 0.5), got {}",
                self.padding_fraction
            )));
        }
        if self.dpi == 0 {
            return Err(GlyphreelError::validation("dpi must be non-zero"));
        }
        if self.fps == 0 {
            return Err(GlyphreelError::validation("fps must be non-zero"));
        }
        Ok(())
    }

    fn raster_opts(&self) -> RasterOpts {
        RasterOpts {
            dpi: self.dpi,
            use_cropbox: true,
        }
    }

    fn encode_config(&self, target: Target, frames: usize) -> EncodeConfig {
        EncodeConfig {
            input_pattern: self
                .out_dir
                .join(frame_pattern(target, frame_digits(frames))),
            start_number: 0,
            fps: self.fps,
            codec: self.codec.clone(),
            out_path: self.out_dir.join(format!("{}.mp4", target.name())),
            overwrite: self.overwrite,
        }
    }
}

/// How far a run should take each target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    /// Stop after writing `<target>.pdf`.
    Extract,
    /// Extract, rasterize, overlay, and encode.
    Video,
}

/// Outcome for one target.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TargetSummary {
    pub target: Target,
    pub occurrences: u32,
    pub pages_written: usize,
    pub images_rendered: usize,
    pub pdf_path: Option<PathBuf>,
    pub video_path: Option<PathBuf>,
    /// No occurrences, so no artifacts were produced.
    pub skipped: bool,
}

/// Outcome of a whole run.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct RunSummary {
    pub source_pages: usize,
    pub vertical_cells: u32,
    pub horizontal_cells: f64,
    pub totals: OccurrenceTotals,
    pub targets: Vec<TargetSummary>,
}

/// Load the source named by `cfg` and take every target through `stage`.
pub fn run(
    cfg: &PipelineConfig,
    table: &OccurrenceTable,
    stage: Stage,
) -> GlyphreelResult<RunSummary> {
    cfg.validate()?;
    let source = SourceDocument::load(&cfg.input)?;
    let grid = source.grid(cfg.vertical_cells, cfg.padding_fraction)?;
    run_loaded(cfg, table, &source, &grid, stage)
}

/// Like [`run`], for an already loaded source and grid.
#[tracing::instrument(skip_all, fields(stage = ?stage, parallel = cfg.parallel))]
pub fn run_loaded(
    cfg: &PipelineConfig,
    table: &OccurrenceTable,
    source: &SourceDocument,
    grid: &GridGeometry,
    stage: Stage,
) -> GlyphreelResult<RunSummary> {
    cfg.validate()?;
    if table.page_count() > source.page_count() {
        return Err(GlyphreelError::validation(format!(
            "occurrence table describes {} pages but '{}' has {}",
            table.page_count(),
            cfg.input.display(),
            source.page_count()
        )));
    }

    let targets = if cfg.parallel {
        let pool = build_thread_pool(Target::ALL.len())?;
        pool.install(|| {
            Target::ALL
                .par_iter()
                .map(|&t| process_target(cfg, table, source, grid, t, stage))
                .collect::<GlyphreelResult<Vec<_>>>()
        })?
    } else {
        Target::ALL
            .iter()
            .map(|&t| process_target(cfg, table, source, grid, t, stage))
            .collect::<GlyphreelResult<Vec<_>>>()?
    };

    Ok(RunSummary {
        source_pages: source.page_count(),
        vertical_cells: grid.vertical_cells,
        horizontal_cells: grid.horizontal_cells(),
        totals: table.totals(),
        targets,
    })
}

/// Extract one target and, for [`Stage::Video`], render, annotate and encode it.
#[tracing::instrument(skip(cfg, table, source, grid))]
pub fn process_target(
    cfg: &PipelineConfig,
    table: &OccurrenceTable,
    source: &SourceDocument,
    grid: &GridGeometry,
    target: Target,
    stage: Stage,
) -> GlyphreelResult<TargetSummary> {
    let mut summary = TargetSummary {
        target,
        occurrences: table.total(target),
        pages_written: 0,
        images_rendered: 0,
        pdf_path: None,
        video_path: None,
        skipped: false,
    };

    let mut doc = source.build_target_document(table, target, grid)?;
    if doc.is_empty() {
        tracing::warn!(character = %target, "no occurrences, skipping");
        summary.skipped = true;
        return Ok(summary);
    }

    let pdf_path = cfg.out_dir.join(doc.file_name());
    let pdf_path = doc.save(&pdf_path)?;
    summary.pages_written = doc.page_count();
    summary.pdf_path = Some(pdf_path.clone());
    if stage == Stage::Extract {
        return Ok(summary);
    }

    let video = render_video(cfg, target, &pdf_path, summary.pages_written)?;
    summary.images_rendered = video.frames;
    summary.video_path = Some(video.path);
    Ok(summary)
}

struct RenderedVideo {
    frames: usize,
    path: PathBuf,
}

fn render_video(
    cfg: &PipelineConfig,
    target: Target,
    pdf_path: &Path,
    expected_pages: usize,
) -> GlyphreelResult<RenderedVideo> {
    let mut images = rasterize_pdf(pdf_path, &cfg.raster_opts())?;
    if images.len() != expected_pages {
        return Err(GlyphreelError::raster(format!(
            "'{}' has {expected_pages} pages but {} images were rendered",
            pdf_path.display(),
            images.len()
        )));
    }
    tracing::info!(character = %target, images = images.len(), "rendered pages");

    annotate_sequence(&mut images, cfg.bar_thickness);
    save_frames(&images, &cfg.out_dir, target)?;

    let encode = cfg.encode_config(target, images.len());
    encode_image_sequence(&encode)?;
    Ok(RenderedVideo {
        frames: images.len(),
        path: encode.out_path,
    })
}

fn build_thread_pool(threads: usize) -> GlyphreelResult<rayon::ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|e| {
            GlyphreelError::validation(format!("failed to build rayon thread pool: {e}"))
        })
}

#[cfg(test)]
#[path = "../tests/unit/pipeline/pipeline.rs"]
mod tests;
