use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::Context as _;
use image::RgbImage;

use crate::foundation::error::{GlyphreelError, GlyphreelResult};

/// Rendering resolution used for every cropped page.
pub const DEFAULT_DPI: u32 = 500;

/// Options for [`rasterize_pdf`].
#[derive(Clone, Debug)]
pub struct RasterOpts {
    /// Output resolution in dots per inch.
    pub dpi: u32,
    /// Render the crop box instead of the media box.
    pub use_cropbox: bool,
}

impl Default for RasterOpts {
    fn default() -> Self {
        Self {
            dpi: DEFAULT_DPI,
            use_cropbox: true,
        }
    }
}

/// `true` when poppler's `pdftoppm` can be spawned from PATH.
pub fn is_pdftoppm_on_path() -> bool {
    Command::new("pdftoppm")
        .arg("-v")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok()
}

/// Render every page of `pdf` to an RGB image, in document page order.
///
/// Pages are rasterized by the system `pdftoppm` into a scratch directory that is removed
/// before returning.
#[tracing::instrument(skip(opts), fields(dpi = opts.dpi))]
pub fn rasterize_pdf(pdf: &Path, opts: &RasterOpts) -> GlyphreelResult<Vec<RgbImage>> {
    if opts.dpi == 0 {
        return Err(GlyphreelError::validation("raster dpi must be non-zero"));
    }
    if !pdf.is_file() {
        return Err(GlyphreelError::raster(format!(
            "'{}' is not a readable file",
            pdf.display()
        )));
    }
    if !is_pdftoppm_on_path() {
        return Err(GlyphreelError::raster(
            "pdftoppm (poppler) is required for rasterization, but was not found on PATH",
        ));
    }

    let scratch = tempfile::Builder::new()
        .prefix("glyphreel-raster")
        .tempdir()
        .context("create raster scratch directory")?;
    let prefix = scratch.path().join("page");

    let mut cmd = Command::new("pdftoppm");
    cmd.args(["-png", "-r", &opts.dpi.to_string()]);
    if opts.use_cropbox {
        cmd.arg("-cropbox");
    }
    cmd.arg(pdf).arg(&prefix);

    let output = cmd.output().map_err(|e| {
        GlyphreelError::raster(format!(
            "failed to spawn pdftoppm (is it installed and on PATH?): {e}"
        ))
    })?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(GlyphreelError::raster(format!(
            "pdftoppm exited with status {}: {}",
            output.status,
            stderr.trim()
        )));
    }

    let pages = rendered_pages(scratch.path())?;
    let mut images = Vec::with_capacity(pages.len());
    for path in &pages {
        let img = image::open(path)
            .with_context(|| format!("decode rendered page '{}'", path.display()))?;
        images.push(img.to_rgb8());
    }
    tracing::debug!(pages = images.len(), "rasterized");
    Ok(images)
}

/// `pdftoppm` names pages `<prefix>-<n>.png`, zero-padding `n` to the page count's width.
fn rendered_pages(dir: &Path) -> GlyphreelResult<Vec<PathBuf>> {
    let mut pages = Vec::new();
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("list raster scratch directory '{}'", dir.display()))?
    {
        let path = entry.context("read raster scratch entry")?.path();
        if let Some(n) = page_number(&path) {
            pages.push((n, path));
        }
    }
    pages.sort_by_key(|(n, _)| *n);
    Ok(pages.into_iter().map(|(_, path)| path).collect())
}

fn page_number(path: &Path) -> Option<u32> {
    if path.extension()? != "png" {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    let (_, n) = stem.rsplit_once('-')?;
    n.parse().ok()
}

#[cfg(test)]
#[path = "../../tests/unit/raster/pdftoppm.rs"]
mod tests;
