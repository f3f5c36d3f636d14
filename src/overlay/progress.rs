use std::path::{Path, PathBuf};

use anyhow::Context as _;
use image::{Rgb as Pixel, RgbImage};

use crate::foundation::core::{Rgb, Target};
use crate::foundation::error::GlyphreelResult;

/// Half-height of the progress bar, in pixels.
pub const BAR_THICKNESS: u32 = 11;

/// Position of frame `k` in a sequence of `n`, as a fraction in `0..=1`.
///
/// A single-frame sequence counts as complete (`1.0`).
pub fn progress_fraction(k: usize, n: usize) -> f64 {
    if n <= 1 {
        return 1.0;
    }
    (k as f64 / (n - 1) as f64).clamp(0.0, 1.0)
}

/// `len` evenly spaced samples of a straight-line RGB ramp between two colors.
#[derive(Clone, Debug, PartialEq)]
pub struct Gradient {
    start: Rgb,
    end: Rgb,
    len: usize,
}

impl Gradient {
    pub fn new(start: Rgb, end: Rgb, len: usize) -> Self {
        Self { start, end, len }
    }

    /// Red to green, one sample per frame.
    pub fn progress(len: usize) -> Self {
        Self::new(Rgb::RED, Rgb::GREEN, len)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The `k`-th sample. A one-sample gradient is just the end color.
    pub fn sample(&self, k: usize) -> Rgb {
        if self.len <= 1 {
            return self.end;
        }
        let steps = (self.len - 1) as f64;
        let k = k.min(self.len - 1) as f64;
        self.start.lerp(self.end, k / steps)
    }

    pub fn colors(&self) -> Vec<Rgb> {
        (0..self.len).map(|k| self.sample(k)).collect()
    }
}

/// Bar length in pixels for an image `width` wide at `fraction` progress.
pub fn bar_length(width: u32, fraction: f64) -> u32 {
    ((f64::from(width) * fraction.clamp(0.0, 1.0)).round() as u32).min(width)
}

/// Paint the progress bar along the bottom edge: a band `2 * thickness` rows tall centred
/// on row `height - thickness`, clipped to the image, from column 0 to the bar length.
pub fn draw_progress_bar(img: &mut RgbImage, fraction: f64, color: Rgb, thickness: u32) {
    let (width, height) = img.dimensions();
    let len = bar_length(width, fraction);
    let top = height.saturating_sub(2 * thickness);
    let px = Pixel(color.to_rgb8());
    for y in top..height {
        for x in 0..len {
            img.put_pixel(x, y, px);
        }
    }
}

/// Overlay every frame of a sequence with its progress bar, in place.
pub fn annotate_sequence(images: &mut [RgbImage], thickness: u32) {
    let n = images.len();
    let gradient = Gradient::progress(n);
    for (k, img) in images.iter_mut().enumerate() {
        draw_progress_bar(img, progress_fraction(k, n), gradient.sample(k), thickness);
    }
}

/// Zero-padded width of frame numbers for an `n`-frame sequence (at least one digit).
pub fn frame_digits(n: usize) -> usize {
    n.saturating_sub(1).max(1).to_string().len()
}

/// `<target>.<k>.png`, with `k` zero-padded to `digits`.
pub fn frame_file_name(target: Target, k: usize, digits: usize) -> String {
    format!("{}.{:0digits$}.png", target.name(), k)
}

/// printf-style pattern matching [`frame_file_name`], as understood by ffmpeg's image2 demuxer.
pub fn frame_pattern(target: Target, digits: usize) -> String {
    format!("{}.%0{}d.png", target.name(), digits)
}

/// Write each frame to `out_dir` under its [`frame_file_name`].
#[tracing::instrument(skip(images))]
pub fn save_frames(
    images: &[RgbImage],
    out_dir: &Path,
    target: Target,
) -> GlyphreelResult<Vec<PathBuf>> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create output directory '{}'", out_dir.display()))?;

    let digits = frame_digits(images.len());
    let mut paths = Vec::with_capacity(images.len());
    for (k, img) in images.iter().enumerate() {
        let path = out_dir.join(frame_file_name(target, k, digits));
        img.save(&path)
            .with_context(|| format!("write png '{}'", path.display()))?;
        paths.push(path);
    }
    Ok(paths)
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/progress.rs"]
mod tests;
